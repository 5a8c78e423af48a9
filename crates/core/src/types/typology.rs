//! Product typologies and the category-key map.
//!
//! Typology names shown to the user ("Bowls Set", "Cups / Mugs") map to
//! internal category keys used by the product-listing endpoint. The map is
//! fixed configuration: a typology name that is missing from it is a
//! configuration error, not something a user can recover from by retrying.

use serde::{Deserialize, Serialize};

/// The typology handled by the cutlery flow rather than the general one.
pub const CUTLERY_TYPOLOGY: &str = "Cutlery";

/// A product typology (shape/category) with its SKU abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typology {
    /// Display name, e.g. "Bowls Set".
    pub name: String,
    /// Short code used inside SKU codes and as the catalog filter key.
    pub code: String,
}

impl Typology {
    /// Create a typology.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Whether this typology belongs to the cutlery flow.
    #[must_use]
    pub fn is_cutlery(&self) -> bool {
        self.name == CUTLERY_TYPOLOGY
    }
}

/// Resolve the internal category key for a typology name.
///
/// Returns `None` for names absent from the map; callers must treat that as
/// a fatal configuration error rather than an empty product list.
#[must_use]
pub fn category_key(typology_name: &str) -> Option<&'static str> {
    let key = match typology_name {
        "Accessories" => "Accessories",
        "Accessories Set" => "accessories_set",
        "Bowls" => "Bowls",
        "Bowls Set" => "bowls_set",
        "Cups / Mugs" => "cups",
        "Cups / Mugs Set" => "cups_set",
        "Plates" => "Plates",
        "Plates Set" => "plates_set",
        "Platter" => "platter",
        "Platter Sets" => "platter_sets",
        "Table Linens" => "tablinen",
        "Table Linens Set" => "table_linens_set",
        "Table Settings" => "table_settings",
        "Vases" => "vases",
        "Vases Set" => "vases_set",
        "Candle Stand" => "candlestand",
        "Candle Stand Set" => "candle_stand_set",
        "Trinket" => "trinket",
        "Trinket Set" => "trinket_set",
        "Tissue Box" => "tissuebox",
        CUTLERY_TYPOLOGY => "cutlery",
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key_known_names() {
        assert_eq!(category_key("Bowls"), Some("Bowls"));
        assert_eq!(category_key("Bowls Set"), Some("bowls_set"));
        assert_eq!(category_key("Cups / Mugs"), Some("cups"));
        assert_eq!(category_key("Table Linens"), Some("tablinen"));
        assert_eq!(category_key("Cutlery"), Some("cutlery"));
    }

    #[test]
    fn test_category_key_unmapped_name() {
        assert_eq!(category_key("Chandeliers"), None);
        assert_eq!(category_key(""), None);
    }

    #[test]
    fn test_is_cutlery() {
        assert!(Typology::new("Cutlery", "CU").is_cutlery());
        assert!(!Typology::new("Bowls", "BO").is_cutlery());
    }
}
