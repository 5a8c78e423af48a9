//! The dependent-selection state machine as a pure reducer.
//!
//! The selection chain is `material → typology → product → colour fields`.
//! Every transition replaces the whole [`ConfigurationState`] atomically and
//! prunes everything downstream of the changed level; there is no "remember
//! the previous child selection" behaviour. A transition may additionally
//! request a follow-up [`Command`] (a reference-data fetch) that the caller
//! executes; the reducer itself performs no I/O.
//!
//! Option lists (products, colour vocabularies) are owned by the caller;
//! the state here is the user's selections only, so the reducer stays a
//! value-in/value-out function that can be tested exhaustively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::material::{Material, MaterialCategory};
use crate::types::sku::SkuCode;
use crate::types::typology::{self, CUTLERY_TYPOLOGY};

/// A fatal configuration problem detected during a transition.
///
/// Not a validation error: the user cannot fix an unmapped typology by
/// choosing differently, so callers must halt the flow and say so.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The typology name has no entry in the category-key map.
    #[error("no category mapping for typology: {0}")]
    UnmappedTypology(String),
}

/// A reference-data fetch requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the product designs for a typology's category key.
    LoadProducts { category_key: &'static str },
    /// Load the colour vocabulary of a single-colour material.
    LoadMaterialColours { material: String },
    /// Load the cutlery handle/finish colour list.
    LoadCutleryColours,
}

/// A state transition requested by the user.
///
/// `None` payloads model clearing a selection back to its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SelectMaterial(Option<Material>),
    SelectTypology(Option<String>),
    SelectProduct(Option<String>),
    SetOuterGlaze(Option<String>),
    SetInnerGlaze(Option<String>),
    SetRimGlaze(Option<String>),
    SetMaterialColour(Option<String>),
    SetHandleColour(Option<String>),
    SetFinishColour(Option<String>),
}

/// The result of a successful transition: the next state plus an optional
/// follow-up fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: ConfigurationState,
    pub command: Option<Command>,
}

/// The complete selection state of the configurator.
///
/// Immutable value type; [`ConfigurationState::apply`] returns a fresh state
/// rather than mutating in place, which keeps every reset path in one
/// function instead of scattered across handlers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationState {
    pub material: Option<Material>,
    pub typology: Option<String>,
    pub product: Option<String>,
    pub outer_glaze: Option<String>,
    pub inner_glaze: Option<String>,
    pub rim_glaze: Option<String>,
    pub material_colour: Option<String>,
    pub handle_colour: Option<String>,
    pub finish_colour: Option<String>,
    pub generated_sku: Option<SkuCode>,
}

impl ConfigurationState {
    /// Apply a transition, producing the next state and any follow-up fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnmappedTypology`] when a typology name
    /// is selected that the category-key map does not know; the current
    /// state is left untouched in that case.
    pub fn apply(&self, transition: Transition) -> Result<Step, ConfigurationError> {
        match transition {
            Transition::SelectMaterial(material) => Ok(self.select_material(material)),
            Transition::SelectTypology(typology) => self.select_typology(typology),
            Transition::SelectProduct(product) => Ok(Step {
                state: Self {
                    product,
                    generated_sku: None,
                    ..self.clone()
                },
                command: None,
            }),
            Transition::SetOuterGlaze(value) => Ok(self.with_colour_field(|s| s.outer_glaze = value)),
            Transition::SetInnerGlaze(value) => Ok(self.with_colour_field(|s| s.inner_glaze = value)),
            Transition::SetRimGlaze(value) => Ok(self.with_colour_field(|s| s.rim_glaze = value)),
            Transition::SetMaterialColour(value) => {
                Ok(self.with_colour_field(|s| s.material_colour = value))
            }
            Transition::SetHandleColour(value) => {
                Ok(self.with_colour_field(|s| s.handle_colour = value))
            }
            Transition::SetFinishColour(value) => {
                Ok(self.with_colour_field(|s| s.finish_colour = value))
            }
        }
    }

    /// Record a freshly allocated SKU code.
    #[must_use]
    pub fn with_generated_sku(self, code: SkuCode) -> Self {
        Self {
            generated_sku: Some(code),
            ..self
        }
    }

    /// Drop any previously allocated SKU code.
    #[must_use]
    pub fn without_generated_sku(self) -> Self {
        Self {
            generated_sku: None,
            ..self
        }
    }

    fn select_material(&self, material: Option<Material>) -> Step {
        let command = material.as_ref().and_then(|m| {
            (m.category == MaterialCategory::SingleColour).then(|| Command::LoadMaterialColours {
                material: m.name.clone(),
            })
        });

        // A material change invalidates every colour field of every scheme
        // and any code generated from the old selection. Typology and
        // product survive: they sit above colours in the chain.
        let state = Self {
            material,
            typology: self.typology.clone(),
            product: self.product.clone(),
            ..Self::default()
        };

        Step { state, command }
    }

    fn select_typology(&self, typology: Option<String>) -> Result<Step, ConfigurationError> {
        let command = match typology.as_deref() {
            None => None,
            Some(CUTLERY_TYPOLOGY) => Some(Command::LoadCutleryColours),
            Some(name) => {
                let category_key = typology::category_key(name)
                    .ok_or_else(|| ConfigurationError::UnmappedTypology(name.to_string()))?;
                Some(Command::LoadProducts { category_key })
            }
        };

        // Product and all colour fields hang below the typology level.
        let state = Self {
            material: self.material.clone(),
            typology,
            ..Self::default()
        };

        Ok(Step {
            state,
            command,
        })
    }

    fn with_colour_field(&self, set: impl FnOnce(&mut Self)) -> Step {
        let mut state = Self {
            generated_sku: None,
            ..self.clone()
        };
        set(&mut state);
        Step {
            state,
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MaterialCategory;

    fn ceramic() -> Material {
        Material::new("Ceramic", "CE")
    }

    fn marble() -> Material {
        Material::new("Marble", "MA")
    }

    fn populated_state() -> ConfigurationState {
        ConfigurationState {
            material: Some(ceramic()),
            typology: Some("Bowls".to_string()),
            product: Some("Ramen Bowl".to_string()),
            outer_glaze: Some("Fog".to_string()),
            inner_glaze: Some("Moss".to_string()),
            rim_glaze: Some("Fog".to_string()),
            material_colour: Some("Verde".to_string()),
            handle_colour: None,
            finish_colour: None,
            generated_sku: Some(SkuCode::from("CEBORB-FGMS")),
        }
    }

    #[test]
    fn test_select_material_clears_all_colour_fields_and_sku() {
        let step = populated_state()
            .apply(Transition::SelectMaterial(Some(marble())))
            .expect("material transition");

        assert_eq!(
            step.state.material.as_ref().map(|m| m.category),
            Some(MaterialCategory::SingleColour)
        );
        assert_eq!(step.state.typology.as_deref(), Some("Bowls"));
        assert_eq!(step.state.product.as_deref(), Some("Ramen Bowl"));
        assert!(step.state.outer_glaze.is_none());
        assert!(step.state.inner_glaze.is_none());
        assert!(step.state.rim_glaze.is_none());
        assert!(step.state.material_colour.is_none());
        assert!(step.state.generated_sku.is_none());
    }

    #[test]
    fn test_select_single_colour_material_requests_vocabulary() {
        let step = ConfigurationState::default()
            .apply(Transition::SelectMaterial(Some(marble())))
            .expect("material transition");
        assert_eq!(
            step.command,
            Some(Command::LoadMaterialColours {
                material: "Marble".to_string()
            })
        );
    }

    #[test]
    fn test_select_ceramic_material_requests_nothing() {
        let step = ConfigurationState::default()
            .apply(Transition::SelectMaterial(Some(ceramic())))
            .expect("material transition");
        assert_eq!(step.command, None);
    }

    #[test]
    fn test_clearing_material_keeps_no_stale_colours() {
        let step = populated_state()
            .apply(Transition::SelectMaterial(None))
            .expect("material transition");
        assert!(step.state.material.is_none());
        assert!(step.state.material_colour.is_none());
        assert!(step.state.outer_glaze.is_none());
    }

    #[test]
    fn test_select_typology_clears_product_and_colours_immediately() {
        let step = populated_state()
            .apply(Transition::SelectTypology(Some("Plates".to_string())))
            .expect("typology transition");

        // Downstream state is empty before any fetch resolves.
        assert!(step.state.product.is_none());
        assert!(step.state.outer_glaze.is_none());
        assert!(step.state.material_colour.is_none());
        assert!(step.state.generated_sku.is_none());
        assert_eq!(
            step.command,
            Some(Command::LoadProducts {
                category_key: "Plates"
            })
        );
    }

    #[test]
    fn test_unmapped_typology_is_fatal_and_leaves_state_unchanged() {
        let before = populated_state();
        let err = before
            .apply(Transition::SelectTypology(Some("Chandeliers".to_string())))
            .expect_err("unmapped typology must fail");
        assert_eq!(
            err,
            ConfigurationError::UnmappedTypology("Chandeliers".to_string())
        );
        // `apply` borrows immutably; the caller's state is untouched.
        assert_eq!(before, populated_state());
    }

    #[test]
    fn test_cutlery_typology_requests_cutlery_colours_not_products() {
        let step = ConfigurationState::default()
            .apply(Transition::SelectTypology(Some("Cutlery".to_string())))
            .expect("typology transition");
        assert_eq!(step.command, Some(Command::LoadCutleryColours));
    }

    #[test]
    fn test_select_product_clears_only_generated_sku() {
        let step = populated_state()
            .apply(Transition::SelectProduct(Some("Bud Vase".to_string())))
            .expect("product transition");
        assert_eq!(step.state.product.as_deref(), Some("Bud Vase"));
        assert_eq!(step.state.outer_glaze.as_deref(), Some("Fog"));
        assert!(step.state.generated_sku.is_none());
        assert_eq!(step.command, None);
    }

    #[test]
    fn test_colour_setters_are_independent() {
        let step = populated_state()
            .apply(Transition::SetInnerGlaze(Some("Clay".to_string())))
            .expect("glaze transition");
        assert_eq!(step.state.inner_glaze.as_deref(), Some("Clay"));
        assert_eq!(step.state.outer_glaze.as_deref(), Some("Fog"));
        assert_eq!(step.state.rim_glaze.as_deref(), Some("Fog"));
        assert!(step.state.generated_sku.is_none());
    }

    #[test]
    fn test_sku_bookkeeping_helpers() {
        let state = ConfigurationState::default().with_generated_sku(SkuCode::from("X1"));
        assert!(state.generated_sku.is_some());
        assert!(state.without_generated_sku().generated_sku.is_none());
    }
}
