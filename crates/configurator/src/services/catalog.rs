//! Catalog browsing: the merged current + legacy SKU list.

use std::collections::HashMap;

use atelier_core::catalog::{self, CatalogView, SearchMode};
use atelier_core::types::{SkuSummary, Typology};

use crate::catalog_api::{CatalogApiClient, CatalogApiError};

/// Read side of the SKU catalog plus the two record mutations it offers.
#[derive(Clone)]
pub struct CatalogBrowser {
    client: CatalogApiClient,
}

impl CatalogBrowser {
    /// Create a browser.
    #[must_use]
    pub const fn new(client: CatalogApiClient) -> Self {
        Self { client }
    }

    /// Fetch both record generations and build a merged view.
    ///
    /// # Errors
    ///
    /// Returns an error if either fetch fails; a half-merged catalog is
    /// never shown.
    pub async fn load(&self, mode: SearchMode) -> Result<CatalogView, CatalogApiError> {
        let (current, legacy) =
            tokio::try_join!(self.client.current_skus(), self.client.legacy_skus())?;
        Ok(CatalogView::new(catalog::merge_catalog(current, legacy), mode))
    }

    /// The code → product-name/colour map used to annotate pricing rows.
    ///
    /// # Errors
    ///
    /// Returns an error if either fetch fails.
    pub async fn metadata_map(&self) -> Result<HashMap<String, SkuSummary>, CatalogApiError> {
        let (current, legacy) =
            tokio::try_join!(self.client.current_skus(), self.client.legacy_skus())?;
        Ok(catalog::metadata_map(&catalog::merge_catalog(
            current, legacy,
        )))
    }

    /// The typology list backing the filter picker.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    pub async fn typologies(&self) -> Result<Vec<Typology>, CatalogApiError> {
        self.client.typologies().await
    }

    /// Overwrite the code of a legacy record, returning the reloaded view.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit or the reload fails.
    pub async fn edit_legacy_sku(
        &self,
        id: &str,
        code: &str,
        mode: SearchMode,
    ) -> Result<CatalogView, CatalogApiError> {
        self.client.edit_legacy_sku(id, code).await?;
        self.load(mode).await
    }

    /// Delete a record by code, returning the reloaded view.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete or the reload fails.
    pub async fn delete_sku(
        &self,
        code: &str,
        mode: SearchMode,
    ) -> Result<CatalogView, CatalogApiError> {
        self.client.delete_sku(code).await?;
        self.load(mode).await
    }
}
