//! Colour resolution strategies.
//!
//! Each material category needs a different colour input shape on a SKU
//! submission. The three schemes are interchangeable behind
//! [`ColourStrategy`]; selection is by [`MaterialCategory`] tag, never by
//! material name string.

use serde::Serialize;

use crate::cascade::ConfigurationState;
use crate::types::material::MaterialCategory;

/// The colour portion of a SKU request, in the exact wire shape the
/// allocation backend expects for each scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColourPayload {
    /// Three-glaze ceramic scheme.
    #[serde(rename_all = "camelCase")]
    Glazed {
        outer_color: String,
        inner_color: String,
        rim_color: String,
    },
    /// Single material colour. The backend expects the British spelling for
    /// this scheme only; the asymmetry is part of the contract.
    Single { colour: String },
    /// Cutlery handle/finish scheme.
    #[serde(rename_all = "camelCase")]
    Cutlery {
        handle_color: String,
        finish_color: String,
    },
}

/// A colour input scheme: which fields it needs, whether the current
/// selection satisfies it, and how it maps onto the request payload.
pub trait ColourStrategy {
    /// The selection fields this scheme requires, for display and
    /// diagnostics.
    fn required_fields(&self) -> &'static [&'static str];

    /// Whether every required field holds a non-empty value.
    fn is_satisfied(&self, state: &ConfigurationState) -> bool;

    /// Build the colour payload, or `None` while unsatisfied.
    fn payload(&self, state: &ConfigurationState) -> Option<ColourPayload>;
}

/// Look up the strategy for a material category.
#[must_use]
pub fn for_category(category: MaterialCategory) -> &'static dyn ColourStrategy {
    match category {
        MaterialCategory::Ceramic => &GlazedStrategy,
        MaterialCategory::SingleColour => &SingleColourStrategy,
        MaterialCategory::Cutlery => &CutleryStrategy,
    }
}

fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Outer/inner/rim glazes from the shared base-colour palette.
///
/// All three pickers draw from the same vocabulary; outer, inner and rim may
/// legitimately be the same colour.
struct GlazedStrategy;

impl ColourStrategy for GlazedStrategy {
    fn required_fields(&self) -> &'static [&'static str] {
        &["outer glaze", "inner glaze", "rim colour"]
    }

    fn is_satisfied(&self, state: &ConfigurationState) -> bool {
        self.payload(state).is_some()
    }

    fn payload(&self, state: &ConfigurationState) -> Option<ColourPayload> {
        Some(ColourPayload::Glazed {
            outer_color: filled(&state.outer_glaze)?,
            inner_color: filled(&state.inner_glaze)?,
            rim_color: filled(&state.rim_glaze)?,
        })
    }
}

/// One colour from the material's own vocabulary (Marble, Cement, Cork).
struct SingleColourStrategy;

impl ColourStrategy for SingleColourStrategy {
    fn required_fields(&self) -> &'static [&'static str] {
        &["material colour"]
    }

    fn is_satisfied(&self, state: &ConfigurationState) -> bool {
        self.payload(state).is_some()
    }

    fn payload(&self, state: &ConfigurationState) -> Option<ColourPayload> {
        Some(ColourPayload::Single {
            colour: filled(&state.material_colour)?,
        })
    }
}

/// Handle and finish colours, drawn independently from the same cutlery
/// list; handle and finish need not come from the same catalog row.
struct CutleryStrategy;

impl ColourStrategy for CutleryStrategy {
    fn required_fields(&self) -> &'static [&'static str] {
        &["handle colour", "finish colour"]
    }

    fn is_satisfied(&self, state: &ConfigurationState) -> bool {
        self.payload(state).is_some()
    }

    fn payload(&self, state: &ConfigurationState) -> Option<ColourPayload> {
        Some(ColourPayload::Cutlery {
            handle_color: filled(&state.handle_colour)?,
            finish_color: filled(&state.finish_colour)?,
        })
    }
}
