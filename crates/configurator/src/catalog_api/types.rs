//! Wire types for the catalog API and their conversions to domain types.
//!
//! The backend is loose about envelopes (some endpoints wrap lists in
//! `{data: ...}`, some return them bare) and about numbers (prices arrive as
//! strings or JSON numbers depending on the endpoint). Everything is made
//! strict here, at the boundary, so the rest of the workspace never sees a
//! stringly-typed amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atelier_core::pricing::{self, DerivedPrices, PriceInputs, PricingRecord};
use atelier_core::types::{Material, SkuCode, Typology};

// =============================================================================
// Envelopes
// =============================================================================

/// The `{data: ...}` wrapper most reference endpoints use.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// A list that may arrive bare or wrapped in `{data: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// A product list that may arrive as `{products: [...]}` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductsEnvelope<T> {
    Wrapped { products: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ProductsEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { products } | Self::Bare(products) => products,
        }
    }
}

// =============================================================================
// Reference data
// =============================================================================

/// The `{name, code}` pair used by both materials and typologies.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedCodeDto {
    pub name: String,
    pub code: String,
}

impl NamedCodeDto {
    /// Convert to a [`Material`], attaching its category tag.
    pub fn into_material(self) -> Material {
        Material::new(self.name, self.code)
    }

    /// Convert to a [`Typology`].
    pub fn into_typology(self) -> Typology {
        Typology::new(self.name, self.code)
    }
}

/// Body for `POST add-material`.
#[derive(Debug, Serialize)]
pub struct AddMaterialBody<'a> {
    pub material: &'a str,
    pub code: &'a str,
}

/// Body for `POST add-product`.
#[derive(Debug, Serialize)]
pub struct AddProductBody<'a> {
    pub name: &'a str,
    pub category: &'a str,
}

/// Body for `PUT products/{id}` (rename only; the design code is immutable).
#[derive(Debug, Serialize)]
pub struct RenameProductBody<'a> {
    pub name: &'a str,
}

/// Body for `POST design-code`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignCodeBody<'a> {
    pub product_name: &'a str,
}

/// Response of `POST design-code`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignCodeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub design_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Colours
// =============================================================================

/// Body for `POST colors` (register a material colour).
#[derive(Debug, Serialize)]
pub struct AddMaterialColourBody<'a> {
    pub material: &'a str,
    pub color: &'a str,
}

/// Body for `POST cutlery` (register a cutlery colour pairing).
#[derive(Debug, Serialize)]
pub struct AddCutleryColourBody<'a> {
    pub handle: &'a str,
    pub finish: &'a str,
}

/// Body for `POST add-color` (register a glaze combination).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColourCombinationBody<'a> {
    pub outer_color: &'a str,
    pub inner_color: &'a str,
    pub rim_color: &'a str,
}

/// Raw response of `POST add-color`.
///
/// A fresh triple answers `{colorCode}`; a known triple answers
/// `{message: "Color code already exists!", data: <existing code>}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColourCodeResponse {
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Outcome of registering a glaze combination.
///
/// Registration is idempotent by content; both outcomes carry the one code
/// the triple resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColourCodeOutcome {
    /// The combination was new and a code was minted.
    Created(String),
    /// The combination already existed under this code.
    Existing(String),
}

impl ColourCodeOutcome {
    /// The combination code, whichever way it was obtained.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Created(code) | Self::Existing(code) => code,
        }
    }
}

// =============================================================================
// SKU allocation
// =============================================================================

/// Raw response of the SKU allocation endpoints.
///
/// The code has been observed under `skuCode`, under `newSKU.skuCode`, and
/// under `data`; anything else is a failure even on HTTP 200.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuResponse {
    #[serde(default)]
    pub sku_code: Option<String>,
    #[serde(rename = "newSKU", default)]
    pub new_sku: Option<NewSkuDto>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSkuDto {
    pub sku_code: String,
}

impl SkuResponse {
    /// Extract the allocated code, if any success marker is present.
    pub fn into_sku_code(self) -> Option<SkuCode> {
        self.sku_code
            .or(self.new_sku.map(|n| n.sku_code))
            .or(self.data)
            .filter(|code| !code.trim().is_empty())
            .map(SkuCode::new)
    }
}

/// Body for `PUT old-skus/{id}`.
#[derive(Debug, Serialize)]
pub struct EditLegacySkuBody<'a> {
    pub code: &'a str,
}

// =============================================================================
// Pricing
// =============================================================================

/// A pricing record as stored by the backend.
///
/// Every amount tolerates string-or-number encoding; the derived fields may
/// be absent on records written before they were persisted, and are
/// recomputed on conversion in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecordDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub sku_code: String,
    #[serde(with = "flexible_decimal")]
    pub making_price_excl_gst: Decimal,
    #[serde(default, with = "flexible_decimal_opt")]
    pub making_price_incl_gst: Option<Decimal>,
    #[serde(with = "flexible_decimal")]
    pub delivery_charges: Decimal,
    #[serde(with = "flexible_decimal")]
    pub selling_price_excl_gst: Decimal,
    #[serde(default, with = "flexible_decimal_opt")]
    pub selling_price_incl_gst: Option<Decimal>,
    #[serde(default, with = "flexible_decimal_opt")]
    pub gst_rate: Option<Decimal>,
    #[serde(default, with = "flexible_decimal_opt")]
    pub total_cost: Option<Decimal>,
    #[serde(default, with = "flexible_decimal_opt")]
    pub cogs: Option<Decimal>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PricingRecordDto {
    /// Convert to the domain record.
    ///
    /// Stored derived values win where present (older records may carry
    /// figures from a previous derivation rule); missing ones are filled
    /// from a fresh derivation of the raw inputs.
    pub fn into_record(self) -> PricingRecord {
        let inputs = PriceInputs {
            making_excl_gst: self.making_price_excl_gst,
            delivery_charges: self.delivery_charges,
            selling_excl_gst: self.selling_price_excl_gst,
            gst_rate: self.gst_rate.unwrap_or_else(pricing::default_gst_rate),
        };
        let fresh = inputs.derive();
        let derived = DerivedPrices {
            making_incl_gst: self.making_price_incl_gst.unwrap_or(fresh.making_incl_gst),
            selling_incl_gst: self
                .selling_price_incl_gst
                .unwrap_or(fresh.selling_incl_gst),
            total_cost: self.total_cost.unwrap_or(fresh.total_cost),
            cogs_pct: self.cogs.unwrap_or(fresh.cogs_pct),
        };

        PricingRecord {
            id: self.id,
            sku_code: SkuCode::new(self.sku_code),
            inputs,
            derived,
        }
    }
}

/// Body for `POST pricing` and `PUT pricing/{id}`: the full raw + derived
/// set, so the stored record always satisfies the derivation invariants at
/// the moment of save.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingWriteBody<'a> {
    pub sku_code: &'a str,
    pub making_price_excl_gst: Decimal,
    pub making_price_incl_gst: Decimal,
    pub delivery_charges: Decimal,
    pub selling_price_excl_gst: Decimal,
    pub selling_price_incl_gst: Decimal,
    pub gst_rate: Decimal,
    pub total_cost: Decimal,
    pub cogs: Decimal,
}

impl<'a> PricingWriteBody<'a> {
    /// Derive the write body from raw inputs.
    #[must_use]
    pub fn new(sku_code: &'a str, inputs: &PriceInputs) -> Self {
        let derived = inputs.derive();
        Self {
            sku_code,
            making_price_excl_gst: inputs.making_excl_gst,
            making_price_incl_gst: derived.making_incl_gst,
            delivery_charges: inputs.delivery_charges,
            selling_price_excl_gst: inputs.selling_excl_gst,
            selling_price_incl_gst: derived.selling_incl_gst,
            gst_rate: inputs.gst_rate,
            total_cost: derived.total_cost,
            cogs: derived.cogs_pct,
        }
    }
}

// =============================================================================
// String-or-number decimals
// =============================================================================

/// Serde adapter for amounts the backend sends as either JSON numbers or
/// strings. Serializes as a string, which every endpoint accepts.
pub mod flexible_decimal {
    use rust_decimal::Decimal;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    pub(super) struct DecimalVisitor;

    impl Visitor<'_> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a decimal number or numeric string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            v.trim().parse().map_err(de::Error::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Decimal::try_from(v).map_err(de::Error::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }
    }
}

/// [`flexible_decimal`] for optional fields.
pub mod flexible_decimal_opt {
    use rust_decimal::Decimal;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        deserializer.deserialize_option(OptVisitor)
    }

    struct OptVisitor;

    impl<'de> Visitor<'de> for OptVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a decimal number, numeric string, or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer
                .deserialize_any(super::flexible_decimal::DecimalVisitor)
                .map(Some)
        }
    }
}
