//! Product designs.

use serde::{Deserialize, Serialize};

/// A specific product design within one typology category.
///
/// Renaming a design keeps its `design_code`; the code is minted once by the
/// backend when the design is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDesign {
    /// Server-assigned record id.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Display name, unique within its category.
    pub name: String,
    /// Stable design abbreviation used inside SKU codes.
    pub design_code: String,
    /// Internal category key of the owning typology.
    #[serde(default)]
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_shape() {
        let p: ProductDesign = serde_json::from_str(
            r#"{"_id":"65a1","name":"Ramen Bowl","design_code":"RB","category":"Bowls"}"#,
        )
        .expect("valid product json");
        assert_eq!(p.id, "65a1");
        assert_eq!(p.design_code, "RB");
    }

    #[test]
    fn test_deserialize_tolerates_missing_id_and_category() {
        let p: ProductDesign =
            serde_json::from_str(r#"{"name":"Bud Vase","design_code":"BV"}"#).expect("valid json");
        assert!(p.id.is_empty());
        assert!(p.category.is_empty());
    }
}
