//! Pricing derivation engine.
//!
//! Three independently editable base numbers (making price excl. GST,
//! delivery charges, selling price excl. GST) plus a GST rate derive four
//! values: both GST-inclusive prices, the total landed cost, and the COGS
//! percentage. Derivation is a pure function so re-deriving after an edit
//! can never drift from the original computation.
//!
//! All arithmetic is `Decimal`; the raw user input is free text and parses
//! with an explicit zero fallback. The COGS divisor falls back to 1 when the
//! selling price is zero or absent - a documented degenerate-case default,
//! not a silently "correct" answer.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::sku::SkuCode;

/// The default GST rate multiplier (18%).
#[must_use]
pub fn default_gst_rate() -> Decimal {
    Decimal::new(118, 2)
}

/// The alternative GST rate multiplier offered by the rate picker (12%).
#[must_use]
pub fn reduced_gst_rate() -> Decimal {
    Decimal::new(112, 2)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn round1(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a free-text amount; blank or unparseable input counts as zero.
#[must_use]
pub fn parse_amount(input: &str) -> Decimal {
    input.trim().parse().unwrap_or(Decimal::ZERO)
}

/// The three base numbers and the GST rate a record derives from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInputs {
    pub making_excl_gst: Decimal,
    pub delivery_charges: Decimal,
    pub selling_excl_gst: Decimal,
    pub gst_rate: Decimal,
}

impl PriceInputs {
    /// Build inputs from free-text fields, with blank/invalid text parsing
    /// to zero.
    #[must_use]
    pub fn parse(cp: &str, dc: &str, sp: &str, gst_rate: Decimal) -> Self {
        Self {
            making_excl_gst: parse_amount(cp),
            delivery_charges: parse_amount(dc),
            selling_excl_gst: parse_amount(sp),
            gst_rate,
        }
    }

    /// Derive the four computed values.
    ///
    /// Both inclusive prices use the one selected `gst_rate`; COGS divides
    /// by 1 instead of a zero selling price.
    #[must_use]
    pub fn derive(&self) -> DerivedPrices {
        let divisor = if self.selling_excl_gst.is_zero() {
            Decimal::ONE
        } else {
            self.selling_excl_gst
        };

        DerivedPrices {
            making_incl_gst: round2(self.making_excl_gst * self.gst_rate),
            selling_incl_gst: round2(self.selling_excl_gst * self.gst_rate),
            total_cost: round2(self.making_excl_gst + self.delivery_charges),
            cogs_pct: round1(self.making_excl_gst / divisor * Decimal::ONE_HUNDRED),
        }
    }
}

/// The four derived values of a pricing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedPrices {
    pub making_incl_gst: Decimal,
    pub selling_incl_gst: Decimal,
    pub total_cost: Decimal,
    pub cogs_pct: Decimal,
}

/// A persisted pricing record: raw inputs plus the derived set.
///
/// One record per SKU in principle, but uniqueness is not enforced by the
/// store; duplicate codes must be tolerated downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRecord {
    pub id: String,
    pub sku_code: SkuCode,
    pub inputs: PriceInputs,
    pub derived: DerivedPrices,
}

impl PricingRecord {
    /// Whether the stored derived values match a fresh derivation of the
    /// stored inputs. Persisted records must satisfy this at save time.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.inputs.derive() == self.derived
    }
}

/// An in-place edit of one pricing record.
///
/// Holds the raw text the user is typing, so the stored record and the
/// buffer may transiently diverge; committing re-derives everything from
/// the buffer and cancelling discards it without touching the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    record_id: String,
    sku_code: SkuCode,
    cp: String,
    dc: String,
    sp: String,
    gst_rate: Decimal,
}

impl EditBuffer {
    /// Start editing a record, hydrating the buffer from its raw inputs.
    #[must_use]
    pub fn from_record(record: &PricingRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            sku_code: record.sku_code.clone(),
            cp: record.inputs.making_excl_gst.to_string(),
            dc: record.inputs.delivery_charges.to_string(),
            sp: record.inputs.selling_excl_gst.to_string(),
            gst_rate: record.inputs.gst_rate,
        }
    }

    /// Id of the record being edited.
    #[must_use]
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// SKU code of the record being edited.
    #[must_use]
    pub const fn sku_code(&self) -> &SkuCode {
        &self.sku_code
    }

    pub fn set_making_excl_gst(&mut self, text: impl Into<String>) {
        self.cp = text.into();
    }

    pub fn set_delivery_charges(&mut self, text: impl Into<String>) {
        self.dc = text.into();
    }

    pub fn set_selling_excl_gst(&mut self, text: impl Into<String>) {
        self.sp = text.into();
    }

    pub fn set_gst_rate(&mut self, rate: Decimal) {
        self.gst_rate = rate;
    }

    /// The inputs the buffer currently describes.
    #[must_use]
    pub fn inputs(&self) -> PriceInputs {
        PriceInputs::parse(&self.cp, &self.dc, &self.sp, self.gst_rate)
    }

    /// Live derivation of the buffer, for display while editing.
    #[must_use]
    pub fn preview(&self) -> DerivedPrices {
        self.inputs().derive()
    }
}
