//! Submission gating and SKU request construction.
//!
//! [`build_request`] is the single place where a selection becomes an
//! outbound allocation request; [`can_submit`] is the same decision asked as
//! a yes/no question, so the two can never disagree.

use serde::Serialize;
use thiserror::Error;

use crate::cascade::ConfigurationState;
use crate::strategy::{self, ColourPayload};
use crate::types::material::MaterialCategory;
use crate::types::typology::CUTLERY_TYPOLOGY;

/// Submission policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkuPolicy {
    /// Whether cutlery SKU generation is accepted. Off by default: the
    /// allocation backend historically rejected the cutlery flow, but the
    /// contract stays honoured so re-enabling is a configuration change.
    pub cutlery_enabled: bool,
}

/// Why a selection cannot be submitted.
///
/// Validation-class errors: recoverable by completing the selection, except
/// [`GateError::CutleryDisabled`] which is a policy rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Material, typology or product is missing.
    #[error("missing required selection: {0}")]
    MissingSelection(&'static str),
    /// The active colour scheme has unfilled fields.
    #[error("missing colour selection: {0}")]
    MissingColours(&'static str),
    /// Cutlery SKU generation is not enabled.
    #[error("cutlery SKU generation is not currently supported")]
    CutleryDisabled,
}

/// A fully validated SKU allocation request.
///
/// The variant decides the endpoint; the serialized shape is exactly what
/// the backend expects, including the `colour` vs three-glaze-keys
/// asymmetry between the two live schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuRequest {
    pub material_name: String,
    pub typology: String,
    pub product_name: String,
    #[serde(flatten)]
    pub colours: ColourPayload,
}

impl SkuRequest {
    /// The allocation endpoint this request must be posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self.colours {
            ColourPayload::Glazed { .. } => "get-sku",
            ColourPayload::Single { .. } => "get-msku",
            ColourPayload::Cutlery { .. } => "cutlery-sku",
        }
    }
}

/// Whether the current selection is complete enough to submit.
#[must_use]
pub fn can_submit(state: &ConfigurationState, policy: &SkuPolicy) -> bool {
    build_request(state, policy).is_ok()
}

/// Validate the selection and build the allocation request.
///
/// # Errors
///
/// Returns a [`GateError`] naming the first missing piece, or
/// [`GateError::CutleryDisabled`] when the selection belongs to the gated
/// cutlery flow.
pub fn build_request(
    state: &ConfigurationState,
    policy: &SkuPolicy,
) -> Result<SkuRequest, GateError> {
    let material = state
        .material
        .as_ref()
        .ok_or(GateError::MissingSelection("material"))?;
    let typology = state
        .typology
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(GateError::MissingSelection("typology"))?;
    let product = state
        .product
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or(GateError::MissingSelection("product"))?;

    let cutlery_flow =
        typology == CUTLERY_TYPOLOGY || material.category == MaterialCategory::Cutlery;
    if cutlery_flow && !policy.cutlery_enabled {
        return Err(GateError::CutleryDisabled);
    }

    let strategy = strategy::for_category(material.category);
    let colours = strategy.payload(state).ok_or_else(|| {
        // Name the whole scheme rather than a single field: partial colour
        // input is invalid as a unit.
        GateError::MissingColours(match material.category {
            MaterialCategory::Ceramic => "outer, inner and rim glazes",
            MaterialCategory::SingleColour => "material colour",
            MaterialCategory::Cutlery => "handle and finish colours",
        })
    })?;

    Ok(SkuRequest {
        material_name: material.name.clone(),
        typology: typology.to_string(),
        product_name: product.to_string(),
        colours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::material::Material;

    fn ceramic_state() -> ConfigurationState {
        ConfigurationState {
            material: Some(Material::new("Ceramic", "CE")),
            typology: Some("Bowls".to_string()),
            product: Some("Ramen Bowl".to_string()),
            outer_glaze: Some("Fog".to_string()),
            inner_glaze: Some("Moss".to_string()),
            rim_glaze: Some("Clay".to_string()),
            ..ConfigurationState::default()
        }
    }

    fn marble_state() -> ConfigurationState {
        ConfigurationState {
            material: Some(Material::new("Marble", "MA")),
            typology: Some("Vases".to_string()),
            product: Some("Bud Vase".to_string()),
            material_colour: Some("Verde".to_string()),
            ..ConfigurationState::default()
        }
    }

    #[test]
    fn test_ceramic_request_shape_and_endpoint() {
        let request =
            build_request(&ceramic_state(), &SkuPolicy::default()).expect("complete selection");
        assert_eq!(request.endpoint(), "get-sku");

        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["materialName"], "Ceramic");
        assert_eq!(json["typology"], "Bowls");
        assert_eq!(json["productName"], "Ramen Bowl");
        assert_eq!(json["outerColor"], "Fog");
        assert_eq!(json["innerColor"], "Moss");
        assert_eq!(json["rimColor"], "Clay");
        assert!(json.get("colour").is_none());
    }

    #[test]
    fn test_single_colour_request_shape_and_endpoint() {
        let request =
            build_request(&marble_state(), &SkuPolicy::default()).expect("complete selection");
        assert_eq!(request.endpoint(), "get-msku");

        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["materialName"], "Marble");
        assert_eq!(json["colour"], "Verde");
        assert!(json.get("outerColor").is_none());
    }

    #[test]
    fn test_cutlery_rejected_by_default_policy() {
        let state = ConfigurationState {
            material: Some(Material::new("Cutlery", "CU")),
            typology: Some("Cutlery".to_string()),
            product: Some("Serving Spoon".to_string()),
            handle_colour: Some("Walnut".to_string()),
            finish_colour: Some("Matte Gold".to_string()),
            ..ConfigurationState::default()
        };
        assert_eq!(
            build_request(&state, &SkuPolicy::default()),
            Err(GateError::CutleryDisabled)
        );
        assert!(!can_submit(&state, &SkuPolicy::default()));
    }

    #[test]
    fn test_cutlery_honoured_when_enabled() {
        let state = ConfigurationState {
            material: Some(Material::new("Cutlery", "CU")),
            typology: Some("Cutlery".to_string()),
            product: Some("Serving Spoon".to_string()),
            handle_colour: Some("Walnut".to_string()),
            finish_colour: Some("Matte Gold".to_string()),
            ..ConfigurationState::default()
        };
        let policy = SkuPolicy {
            cutlery_enabled: true,
        };
        let request = build_request(&state, &policy).expect("cutlery enabled");
        assert_eq!(request.endpoint(), "cutlery-sku");

        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["handleColor"], "Walnut");
        assert_eq!(json["finishColor"], "Matte Gold");
    }

    #[test]
    fn test_can_submit_over_presence_cartesian_product() {
        // can_submit must be true iff material, typology, product and all
        // three glaze fields are present, across every combination.
        let policy = SkuPolicy::default();
        for mask in 0u32..64 {
            let state = ConfigurationState {
                material: (mask & 1 != 0).then(|| Material::new("Ceramic", "CE")),
                typology: (mask & 2 != 0).then(|| "Bowls".to_string()),
                product: (mask & 4 != 0).then(|| "Ramen Bowl".to_string()),
                outer_glaze: (mask & 8 != 0).then(|| "Fog".to_string()),
                inner_glaze: (mask & 16 != 0).then(|| "Moss".to_string()),
                rim_glaze: (mask & 32 != 0).then(|| "Clay".to_string()),
                ..ConfigurationState::default()
            };
            let expected = mask == 63;
            assert_eq!(
                can_submit(&state, &policy),
                expected,
                "presence mask {mask:#08b}"
            );
        }
    }

    #[test]
    fn test_single_colour_cartesian_product() {
        let policy = SkuPolicy::default();
        for mask in 0u32..16 {
            let state = ConfigurationState {
                material: (mask & 1 != 0).then(|| Material::new("Cement", "CT")),
                typology: (mask & 2 != 0).then(|| "Plates".to_string()),
                product: (mask & 4 != 0).then(|| "Dinner Plate".to_string()),
                material_colour: (mask & 8 != 0).then(|| "Slate".to_string()),
                ..ConfigurationState::default()
            };
            assert_eq!(can_submit(&state, &policy), mask == 15, "mask {mask:#06b}");
        }
    }

    #[test]
    fn test_stray_other_scheme_fields_do_not_satisfy() {
        // A marble selection with only ceramic glazes filled in is not
        // submittable; schemes never mix.
        let mut state = marble_state();
        state.material_colour = None;
        state.outer_glaze = Some("Fog".to_string());
        state.inner_glaze = Some("Moss".to_string());
        state.rim_glaze = Some("Clay".to_string());
        assert_eq!(
            build_request(&state, &SkuPolicy::default()),
            Err(GateError::MissingColours("material colour"))
        );
    }

    #[test]
    fn test_missing_selection_errors_name_the_level() {
        let policy = SkuPolicy::default();
        let mut state = ceramic_state();
        state.typology = None;
        assert_eq!(
            build_request(&state, &policy),
            Err(GateError::MissingSelection("typology"))
        );

        let mut state = ceramic_state();
        state.product = Some(String::new());
        assert_eq!(
            build_request(&state, &policy),
            Err(GateError::MissingSelection("product"))
        );
    }
}
