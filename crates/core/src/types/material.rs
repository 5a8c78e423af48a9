//! Materials and their category tags.
//!
//! The upstream data store only knows a material's name and short code; the
//! category that decides which colour inputs a SKU submission needs was
//! historically derived by string membership tests scattered through the UI.
//! Here the category is resolved once, when the material is loaded, and
//! carried as an explicit enum so every downstream dispatch is on a tag
//! rather than a string literal.

use serde::{Deserialize, Serialize};

/// Material names that take a single colour from their own vocabulary.
const SINGLE_COLOUR_MATERIALS: &[&str] = &["Marble", "Cement", "Cork"];

/// Material name that uses the handle/finish cutlery colour scheme.
const CUTLERY_MATERIAL: &str = "Cutlery";

/// The colour-input scheme a material requires.
///
/// Decides which [`crate::strategy::ColourStrategy`] applies to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Three independent glazes (outer/inner/rim) from the shared palette.
    #[default]
    Ceramic,
    /// One colour from the material's own vocabulary (Marble, Cement, Cork).
    SingleColour,
    /// Handle + finish colours from the cutlery vocabulary.
    Cutlery,
}

impl MaterialCategory {
    /// Resolve the category for a material name.
    ///
    /// Any name not recognised as a single-colour or cutlery material falls
    /// into the general ceramic/glazed scheme, matching how the allocation
    /// backend treats unknown materials.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        if SINGLE_COLOUR_MATERIALS.contains(&name) {
            Self::SingleColour
        } else if name == CUTLERY_MATERIAL {
            Self::Cutlery
        } else {
            Self::Ceramic
        }
    }
}

/// A physical material (e.g. "Ceramic", "Marble") with its SKU abbreviation.
///
/// Immutable once created; renames are not supported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Unique human label, e.g. "Marble".
    pub name: String,
    /// Short uppercase abbreviation used inside SKU codes.
    pub code: String,
    /// Colour-input scheme, resolved from `name` at load time.
    pub category: MaterialCategory,
}

impl Material {
    /// Create a material, attaching its category tag.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        let name = name.into();
        let category = MaterialCategory::classify(&name);
        Self {
            name,
            code: code.into(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_colour_materials() {
        assert_eq!(
            MaterialCategory::classify("Marble"),
            MaterialCategory::SingleColour
        );
        assert_eq!(
            MaterialCategory::classify("Cement"),
            MaterialCategory::SingleColour
        );
        assert_eq!(
            MaterialCategory::classify("Cork"),
            MaterialCategory::SingleColour
        );
    }

    #[test]
    fn test_classify_cutlery() {
        assert_eq!(
            MaterialCategory::classify("Cutlery"),
            MaterialCategory::Cutlery
        );
    }

    #[test]
    fn test_classify_defaults_to_ceramic() {
        assert_eq!(
            MaterialCategory::classify("Ceramic"),
            MaterialCategory::Ceramic
        );
        assert_eq!(
            MaterialCategory::classify("Stoneware"),
            MaterialCategory::Ceramic
        );
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        // Vocabulary names are exact labels from the data store; "marble" is
        // not a recognised single-colour material.
        assert_eq!(
            MaterialCategory::classify("marble"),
            MaterialCategory::Ceramic
        );
    }

    #[test]
    fn test_material_new_attaches_category() {
        let m = Material::new("Cement", "CE");
        assert_eq!(m.category, MaterialCategory::SingleColour);
        assert_eq!(m.code, "CE");
    }
}
