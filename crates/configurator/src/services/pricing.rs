//! The pricing desk: saved pricing records and their in-place edits.
//!
//! Mutations return the refreshed collection instead of poking a display
//! component through a side channel, and only one edit buffer may be open at
//! a time - switching rows mid-edit must be an explicit cancel, never a
//! silent swap that discards typed values.

use std::collections::HashMap;

use thiserror::Error;

use atelier_core::catalog;
use atelier_core::pricing::{EditBuffer, PriceInputs, PricingRecord};
use atelier_core::types::SkuSummary;

use crate::catalog_api::{CatalogApiClient, CatalogApiError};

/// Errors from pricing operations.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Api(#[from] CatalogApiError),
    /// `begin_edit` while another record's buffer is open.
    #[error("another pricing record is already being edited")]
    EditInProgress,
    /// A commit with no open buffer.
    #[error("no pricing edit is in progress")]
    NoOpenEdit,
    #[error("pricing record not found: {0}")]
    UnknownRecord(String),
}

/// One displayable pricing row: the record plus its SKU annotation.
#[derive(Debug, Clone)]
pub struct PricingRow<'a> {
    pub record: &'a PricingRecord,
    pub summary: Option<&'a SkuSummary>,
}

/// The pricing desk.
pub struct PricingDesk {
    client: CatalogApiClient,
    records: Vec<PricingRecord>,
    metadata: HashMap<String, SkuSummary>,
    open_edit: Option<EditBuffer>,
}

impl PricingDesk {
    /// Create an empty desk; call [`Self::reload`] before reading rows.
    #[must_use]
    pub fn new(client: CatalogApiClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            metadata: HashMap::new(),
            open_edit: None,
        }
    }

    /// Fetch the pricing records and the SKU metadata they join against.
    ///
    /// # Errors
    ///
    /// Returns an error if any fetch fails; the previous rows are kept.
    pub async fn reload(&mut self) -> Result<(), PricingError> {
        let (records, current, legacy) = tokio::try_join!(
            self.client.pricing_records(),
            self.client.current_skus(),
            self.client.legacy_skus(),
        )?;

        self.records = records;
        self.metadata = catalog::metadata_map(&catalog::merge_catalog(current, legacy));
        Ok(())
    }

    /// The loaded records.
    #[must_use]
    pub fn records(&self) -> &[PricingRecord] {
        &self.records
    }

    /// All rows with their SKU annotations.
    #[must_use]
    pub fn rows(&self) -> Vec<PricingRow<'_>> {
        self.records
            .iter()
            .map(|record| PricingRow {
                record,
                summary: self.metadata.get(record.sku_code.as_str()),
            })
            .collect()
    }

    /// Rows whose SKU code or product name contains the term
    /// (case-insensitive).
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<PricingRow<'_>> {
        let term = term.trim().to_lowercase();
        self.rows()
            .into_iter()
            .filter(|row| {
                row.record
                    .sku_code
                    .as_str()
                    .to_lowercase()
                    .contains(&term)
                    || row.summary.is_some_and(|s| {
                        s.product_name.to_lowercase().contains(&term)
                    })
            })
            .collect()
    }

    /// Save a new record and return the refreshed collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the save or the reload fails.
    pub async fn save_new(
        &mut self,
        sku_code: &str,
        inputs: &PriceInputs,
    ) -> Result<&[PricingRecord], PricingError> {
        self.client.save_pricing(sku_code, inputs).await?;
        self.reload().await?;
        Ok(&self.records)
    }

    /// Open an edit buffer for one record.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::EditInProgress`] if another record's buffer
    /// is already open, or [`PricingError::UnknownRecord`] for an unknown
    /// id.
    pub fn begin_edit(&mut self, record_id: &str) -> Result<&mut EditBuffer, PricingError> {
        if let Some(open) = self.open_edit.as_ref() {
            // Re-opening the same record hands back the live buffer.
            if open.record_id() != record_id {
                return Err(PricingError::EditInProgress);
            }
        } else {
            let record = self
                .records
                .iter()
                .find(|r| r.id == record_id)
                .ok_or_else(|| PricingError::UnknownRecord(record_id.to_string()))?;
            self.open_edit = Some(EditBuffer::from_record(record));
        }

        self.open_edit.as_mut().ok_or(PricingError::NoOpenEdit)
    }

    /// The open edit buffer, if any.
    #[must_use]
    pub fn open_edit(&mut self) -> Option<&mut EditBuffer> {
        self.open_edit.as_mut()
    }

    /// Persist the open buffer: re-derive everything from it, overwrite the
    /// record, and return the refreshed collection.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NoOpenEdit`] without a buffer, or the API
    /// error if the write fails - the buffer stays open in that case so the
    /// typed values are not lost.
    pub async fn commit_edit(&mut self) -> Result<&[PricingRecord], PricingError> {
        let buffer = self.open_edit.as_ref().ok_or(PricingError::NoOpenEdit)?;
        let record_id = buffer.record_id().to_string();
        let sku_code = buffer.sku_code().as_str().to_string();
        let inputs = buffer.inputs();

        self.client
            .update_pricing(&record_id, &sku_code, &inputs)
            .await?;

        self.open_edit = None;
        self.reload().await?;
        Ok(&self.records)
    }

    /// Discard the open buffer without touching the stored record.
    pub fn cancel_edit(&mut self) {
        self.open_edit = None;
    }

    /// Delete a record outright and return the refreshed collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete or the reload fails.
    pub async fn delete(&mut self, record_id: &str) -> Result<&[PricingRecord], PricingError> {
        if !self.records.iter().any(|r| r.id == record_id) {
            return Err(PricingError::UnknownRecord(record_id.to_string()));
        }

        self.client.delete_pricing(record_id).await?;

        // An open edit of the deleted record has nothing left to commit to.
        if self
            .open_edit
            .as_ref()
            .is_some_and(|b| b.record_id() == record_id)
        {
            self.open_edit = None;
        }

        self.reload().await?;
        Ok(&self.records)
    }
}
