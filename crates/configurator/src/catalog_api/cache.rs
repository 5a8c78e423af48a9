//! Cache types for reference-data responses.

use atelier_core::types::{CutleryColour, GlazePalette, Material, MaterialColour, Typology};

/// Cache key for reference data.
///
/// Product lists are deliberately not cached: they are refetched on every
/// typology change and mutate through the product CRUD operations.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Materials,
    Typologies,
    GlazePalette,
    MaterialColours(String),
    CutleryColours,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Materials(Vec<Material>),
    Typologies(Vec<Typology>),
    GlazePalette(GlazePalette),
    MaterialColours(Vec<MaterialColour>),
    CutleryColours(Vec<CutleryColour>),
}
