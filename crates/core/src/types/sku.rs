//! SKU codes and the two persisted record shapes.
//!
//! The data store holds SKUs in two generations: "current" records written
//! by the allocator, and "legacy" records imported from the previous system
//! with different field names. Both shapes normalise to [`CatalogEntry`]
//! before any display or search.

use serde::{Deserialize, Serialize};

/// A structured SKU code, e.g. `CEBORB-FGMS`.
///
/// Opaque to this system; the allocation backend owns its format and
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuCode(String);

impl SkuCode {
    /// Wrap a code string.
    #[must_use]
    pub const fn new(code: String) -> Self {
        Self(code)
    }

    /// The underlying code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkuCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SkuCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for SkuCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// A SKU record in the current schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSku {
    pub sku_code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub type_code: Option<String>,
}

/// A SKU record in the legacy schema.
///
/// Field names differ from [`CurrentSku`] (`code`/`name`), colour may live in
/// `colour` or `innerColor`, and records carry the store id used for edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySku {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(rename = "innerColor", default)]
    pub inner_color: Option<String>,
    #[serde(rename = "typeCode", default)]
    pub type_code: Option<String>,
}

/// The normalised shape every SKU record takes for display and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub sku_code: SkuCode,
    pub product_name: String,
    pub colour: String,
    pub type_code: String,
}

impl From<CurrentSku> for CatalogEntry {
    fn from(sku: CurrentSku) -> Self {
        Self {
            sku_code: SkuCode::new(sku.sku_code),
            product_name: sku.product_name.unwrap_or_default(),
            colour: sku.color.unwrap_or_default(),
            type_code: sku.type_code.unwrap_or_default(),
        }
    }
}

impl From<LegacySku> for CatalogEntry {
    fn from(sku: LegacySku) -> Self {
        Self {
            sku_code: SkuCode::new(sku.code),
            product_name: sku.name.unwrap_or_default(),
            colour: sku.inner_color.or(sku.colour).unwrap_or_default(),
            type_code: sku.type_code.unwrap_or_default(),
        }
    }
}

/// The product-name/colour pair joined onto pricing rows by SKU code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuSummary {
    pub product_name: String,
    pub colour: String,
}
