//! Colour vocabularies: glaze palettes, material colours, cutlery colours.

use serde::{Deserialize, Serialize};

/// The three base-colour lists offered by the ceramic glaze pickers.
///
/// The same vocabulary backs all three zones; nothing prevents a product
/// from using the same colour for outer, inner and rim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlazePalette {
    #[serde(rename = "outerColors")]
    pub outer: Vec<String>,
    #[serde(rename = "innerColors")]
    pub inner: Vec<String>,
    #[serde(rename = "rimColors")]
    pub rim: Vec<String>,
}

impl GlazePalette {
    /// Whether every zone's list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outer.is_empty() && self.inner.is_empty() && self.rim.is_empty()
    }
}

/// A registered outer/inner/rim glaze combination.
///
/// Registration is idempotent by content: submitting an existing triple
/// returns the code it already has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColourCombination {
    pub outer_color: String,
    pub inner_color: String,
    pub rim_color: String,
    /// Combination code, present once the backend has resolved the triple.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A colour in a single-colour material's vocabulary (Marble, Cement, Cork).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialColour {
    #[serde(rename = "color")]
    pub colour: String,
    pub code: String,
}

/// A handle/finish colour pairing for cutlery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutleryColour {
    pub handle_color: String,
    pub finish_color: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wire_shape() {
        let p: GlazePalette = serde_json::from_str(
            r#"{"outerColors":["Fog"],"innerColors":["Fog","Moss"],"rimColors":[]}"#,
        )
        .expect("valid palette json");
        assert_eq!(p.outer, vec!["Fog"]);
        assert_eq!(p.inner.len(), 2);
        assert!(!p.is_empty());
    }

    #[test]
    fn test_material_colour_wire_shape() {
        let c: MaterialColour =
            serde_json::from_str(r#"{"color":"Verde","code":"VR"}"#).expect("valid colour json");
        assert_eq!(c.colour, "Verde");
    }

    #[test]
    fn test_cutlery_colour_wire_shape() {
        let c: CutleryColour = serde_json::from_str(
            r#"{"handleColor":"Walnut","finishColor":"Matte Gold","code":"WG"}"#,
        )
        .expect("valid cutlery json");
        assert_eq!(c.handle_color, "Walnut");
        assert_eq!(c.finish_color, "Matte Gold");
    }
}
