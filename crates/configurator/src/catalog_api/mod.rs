//! Catalog / SKU allocation API client.
//!
//! # Architecture
//!
//! - Plain REST+JSON over `reqwest`; the SKU allocation algorithm itself is
//!   a black box behind `get-sku` / `get-msku`
//! - Reference data (materials, typologies, colour vocabularies) cached
//!   in-memory via `moka` with a configurable TTL; mutations invalidate the
//!   affected key
//! - Responses are read as text first, then parsed, so malformed bodies are
//!   logged with context instead of vanishing into a parse error
//! - A 200 response without its success marker is treated as a failure;
//!   the client never invents a fallback value
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_configurator::catalog_api::CatalogApiClient;
//!
//! let client = CatalogApiClient::new(&config.api)?;
//!
//! let materials = client.materials().await?;
//! let products = client.products("bowls_set").await?;
//! let sku = client.request_sku(&request).await?;
//! ```

mod cache;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use atelier_core::gate::SkuRequest;
use atelier_core::pricing::{PriceInputs, PricingRecord};
use atelier_core::types::{
    ColourCombination, CurrentSku, CutleryColour, GlazePalette, LegacySku, Material,
    MaterialColour, ProductDesign, SkuCode, Typology,
};

use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};
use types::{
    AddColourCombinationBody, AddCutleryColourBody, AddMaterialBody, AddMaterialColourBody,
    AddProductBody, ColourCodeOutcome, ColourCodeResponse, DataEnvelope, DesignCodeBody,
    DesignCodeResponse, EditLegacySkuBody, ListEnvelope, NamedCodeDto, PricingRecordDto,
    PricingWriteBody, ProductsEnvelope, RenameProductBody, SkuResponse,
};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("remote error ({status}): {body}")]
    Remote { status: StatusCode, body: String },

    /// A 2xx response without the expected success marker.
    #[error("response missing expected data: {0}")]
    MissingData(String),
}

/// Client for the catalog / SKU allocation API.
///
/// Cheaply cloneable via `Arc`; reference data is cached per the configured
/// TTL.
#[derive(Clone)]
pub struct CatalogApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, CatalogApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                cache,
            }),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut parts) = url.path_segments_mut() {
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }
        url
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogApiError> {
        let request = match &self.inner.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogApiError::Remote {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse catalog API response"
                );
                Err(CatalogApiError::Parse(e))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CatalogApiError> {
        self.execute(self.inner.http.get(self.endpoint(segments)))
            .await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, CatalogApiError> {
        self.execute(self.inner.http.post(self.endpoint(segments)).json(body))
            .await
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, CatalogApiError> {
        self.execute(self.inner.http.put(self.endpoint(segments)).json(body))
            .await
    }

    /// Fire-and-forget mutations: only the status is checked, so endpoints
    /// that answer with an empty body still count as success.
    async fn execute_unit(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(), CatalogApiError> {
        let request = match &self.inner.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogApiError::Remote {
                status,
                body: body.chars().take(200).collect(),
            });
        }
        Ok(())
    }

    async fn post_unit<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), CatalogApiError> {
        self.execute_unit(self.inner.http.post(self.endpoint(segments)).json(body))
            .await
    }

    async fn put_unit<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), CatalogApiError> {
        self.execute_unit(self.inner.http.put(self.endpoint(segments)).json(body))
            .await
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), CatalogApiError> {
        self.execute_unit(self.inner.http.delete(self.endpoint(segments)))
            .await
    }

    // =========================================================================
    // Reference Data (cached)
    // =========================================================================

    /// Get all materials, with category tags attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn materials(&self) -> Result<Vec<Material>, CatalogApiError> {
        if let Some(CacheValue::Materials(materials)) =
            self.inner.cache.get(&CacheKey::Materials).await
        {
            debug!("Cache hit for materials");
            return Ok(materials);
        }

        let envelope: DataEnvelope<Vec<NamedCodeDto>> = self.get_json(&["materials"]).await?;
        let materials: Vec<Material> = envelope
            .data
            .into_iter()
            .map(NamedCodeDto::into_material)
            .collect();

        self.inner
            .cache
            .insert(CacheKey::Materials, CacheValue::Materials(materials.clone()))
            .await;

        Ok(materials)
    }

    /// Get all typologies.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn typologies(&self) -> Result<Vec<Typology>, CatalogApiError> {
        if let Some(CacheValue::Typologies(typologies)) =
            self.inner.cache.get(&CacheKey::Typologies).await
        {
            debug!("Cache hit for typologies");
            return Ok(typologies);
        }

        let envelope: DataEnvelope<Vec<NamedCodeDto>> = self.get_json(&["types"]).await?;
        let typologies: Vec<Typology> = envelope
            .data
            .into_iter()
            .map(NamedCodeDto::into_typology)
            .collect();

        self.inner
            .cache
            .insert(
                CacheKey::Typologies,
                CacheValue::Typologies(typologies.clone()),
            )
            .await;

        Ok(typologies)
    }

    /// Get the shared base-colour palette for the ceramic glaze pickers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn glaze_palette(&self) -> Result<GlazePalette, CatalogApiError> {
        if let Some(CacheValue::GlazePalette(palette)) =
            self.inner.cache.get(&CacheKey::GlazePalette).await
        {
            debug!("Cache hit for glaze palette");
            return Ok(palette);
        }

        let envelope: DataEnvelope<GlazePalette> = self.get_json(&["colors"]).await?;

        self.inner
            .cache
            .insert(
                CacheKey::GlazePalette,
                CacheValue::GlazePalette(envelope.data.clone()),
            )
            .await;

        Ok(envelope.data)
    }

    /// Get the colour vocabulary of a single-colour material.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(material = %material))]
    pub async fn material_colours(
        &self,
        material: &str,
    ) -> Result<Vec<MaterialColour>, CatalogApiError> {
        let key = CacheKey::MaterialColours(material.to_string());
        if let Some(CacheValue::MaterialColours(colours)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for material colours");
            return Ok(colours);
        }

        let envelope: ListEnvelope<MaterialColour> =
            self.get_json(&["colors", material]).await?;
        let colours = envelope.into_items();

        self.inner
            .cache
            .insert(key, CacheValue::MaterialColours(colours.clone()))
            .await;

        Ok(colours)
    }

    /// Get the cutlery handle/finish colour list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cutlery_colours(&self) -> Result<Vec<CutleryColour>, CatalogApiError> {
        if let Some(CacheValue::CutleryColours(colours)) =
            self.inner.cache.get(&CacheKey::CutleryColours).await
        {
            debug!("Cache hit for cutlery colours");
            return Ok(colours);
        }

        let envelope: ListEnvelope<CutleryColour> = self.get_json(&["cutlery"]).await?;
        let colours = envelope.into_items();

        self.inner
            .cache
            .insert(
                CacheKey::CutleryColours,
                CacheValue::CutleryColours(colours.clone()),
            )
            .await;

        Ok(colours)
    }

    /// Get the product designs for a typology category key. Not cached:
    /// the list changes through the product CRUD operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_key = %category_key))]
    pub async fn products(&self, category_key: &str) -> Result<Vec<ProductDesign>, CatalogApiError> {
        let envelope: ProductsEnvelope<ProductDesign> =
            self.get_json(&["products", category_key]).await?;
        Ok(envelope.into_items())
    }

    // =========================================================================
    // Reference Data Mutations
    // =========================================================================

    /// Register a new material.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(material = %name))]
    pub async fn add_material(&self, name: &str, code: &str) -> Result<(), CatalogApiError> {
        let body = AddMaterialBody {
            material: name,
            code,
        };
        self.post_unit(&["add-material"], &body).await?;
        self.inner.cache.invalidate(&CacheKey::Materials).await;
        Ok(())
    }

    /// Register a new product design under a category key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product = %name, category = %category))]
    pub async fn add_product(&self, name: &str, category: &str) -> Result<(), CatalogApiError> {
        let body = AddProductBody { name, category };
        self.post_unit(&["add-product"], &body).await?;
        Ok(())
    }

    /// Rename a product design. The design code never changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn rename_product(&self, id: &str, name: &str) -> Result<(), CatalogApiError> {
        let body = RenameProductBody { name };
        self.put_unit(&["products", id], &body).await?;
        Ok(())
    }

    /// Delete a product design.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogApiError> {
        self.delete(&["products", id]).await
    }

    /// Look up the design code for a product name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend reports no code.
    #[instrument(skip(self), fields(product = %product_name))]
    pub async fn design_code(&self, product_name: &str) -> Result<String, CatalogApiError> {
        let body = DesignCodeBody { product_name };
        let response: DesignCodeResponse = self.post_json(&["design-code"], &body).await?;

        if !response.success {
            return Err(CatalogApiError::Remote {
                status: StatusCode::OK,
                body: response
                    .message
                    .unwrap_or_else(|| "design code lookup failed".to_string()),
            });
        }
        response
            .design_code
            .ok_or_else(|| CatalogApiError::MissingData("designCode".to_string()))
    }

    /// Register a material colour.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(material = %material, colour = %colour))]
    pub async fn add_material_colour(
        &self,
        material: &str,
        colour: &str,
    ) -> Result<(), CatalogApiError> {
        let body = AddMaterialColourBody {
            material,
            color: colour,
        };
        self.post_unit(&["colors"], &body).await?;
        self.inner
            .cache
            .invalidate(&CacheKey::MaterialColours(material.to_string()))
            .await;
        Ok(())
    }

    /// Register a cutlery colour pairing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn add_cutlery_colour(
        &self,
        handle: &str,
        finish: &str,
    ) -> Result<(), CatalogApiError> {
        let body = AddCutleryColourBody { handle, finish };
        self.post_unit(&["cutlery"], &body).await?;
        self.inner.cache.invalidate(&CacheKey::CutleryColours).await;
        Ok(())
    }

    /// Register a glaze combination. Idempotent by content: an existing
    /// triple answers with its existing code instead of minting a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no code.
    #[instrument(skip(self))]
    pub async fn add_colour_combination(
        &self,
        outer: &str,
        inner: &str,
        rim: &str,
    ) -> Result<ColourCodeOutcome, CatalogApiError> {
        let body = AddColourCombinationBody {
            outer_color: outer,
            inner_color: inner,
            rim_color: rim,
        };
        let response: ColourCodeResponse = self.post_json(&["add-color"], &body).await?;

        if let Some(code) = response.color_code {
            return Ok(ColourCodeOutcome::Created(code));
        }
        if let Some(existing) = response.data {
            return Ok(ColourCodeOutcome::Existing(existing));
        }
        Err(CatalogApiError::MissingData(
            response
                .message
                .unwrap_or_else(|| "colorCode".to_string()),
        ))
    }

    /// Get all registered glaze combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn colour_combinations(&self) -> Result<Vec<ColourCombination>, CatalogApiError> {
        let envelope: ListEnvelope<ColourCombination> =
            self.get_json(&["color-entries"]).await?;
        Ok(envelope.into_items())
    }

    // =========================================================================
    // SKU Allocation
    // =========================================================================

    /// Submit a validated SKU request to its allocation endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response lacks every
    /// success marker - an HTTP 200 without a code is still a failure.
    #[instrument(skip(self, request), fields(endpoint = request.endpoint()))]
    pub async fn request_sku(&self, request: &SkuRequest) -> Result<SkuCode, CatalogApiError> {
        let response: SkuResponse = self.post_json(&[request.endpoint()], request).await?;
        response
            .into_sku_code()
            .ok_or_else(|| CatalogApiError::MissingData("skuCode".to_string()))
    }

    /// Get all current-generation SKU records.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn current_skus(&self) -> Result<Vec<CurrentSku>, CatalogApiError> {
        let envelope: ListEnvelope<CurrentSku> = self.get_json(&["all-codes"]).await?;
        Ok(envelope.into_items())
    }

    /// Get all legacy-generation SKU records.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn legacy_skus(&self) -> Result<Vec<LegacySku>, CatalogApiError> {
        let envelope: ListEnvelope<LegacySku> = self.get_json(&["old-skus"]).await?;
        Ok(envelope.into_items())
    }

    /// Overwrite the code of a legacy SKU record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(record_id = %id))]
    pub async fn edit_legacy_sku(&self, id: &str, code: &str) -> Result<(), CatalogApiError> {
        let body = EditLegacySkuBody { code };
        self.put_unit(&["old-skus", id], &body).await?;
        Ok(())
    }

    /// Delete a SKU record (either generation) by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn delete_sku(&self, code: &str) -> Result<(), CatalogApiError> {
        self.delete(&["skus", code]).await
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Get all pricing records.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn pricing_records(&self) -> Result<Vec<PricingRecord>, CatalogApiError> {
        let envelope: ListEnvelope<PricingRecordDto> = self.get_json(&["pricing"]).await?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(PricingRecordDto::into_record)
            .collect())
    }

    /// Save a new pricing record with its full derived set.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, inputs), fields(sku = %sku_code))]
    pub async fn save_pricing(
        &self,
        sku_code: &str,
        inputs: &PriceInputs,
    ) -> Result<(), CatalogApiError> {
        let body = PricingWriteBody::new(sku_code, inputs);
        self.post_unit(&["pricing"], &body).await?;
        Ok(())
    }

    /// Overwrite a pricing record, re-deriving the full set from `inputs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, inputs), fields(record_id = %id, sku = %sku_code))]
    pub async fn update_pricing(
        &self,
        id: &str,
        sku_code: &str,
        inputs: &PriceInputs,
    ) -> Result<(), CatalogApiError> {
        let body = PricingWriteBody::new(sku_code, inputs);
        self.put_unit(&["pricing", id], &body).await?;
        Ok(())
    }

    /// Delete a pricing record outright. There is no soft-delete or undo.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(record_id = %id))]
    pub async fn delete_pricing(&self, id: &str) -> Result<(), CatalogApiError> {
        self.delete(&["pricing", id]).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached reference data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_client() -> CatalogApiClient {
        let config = ApiConfig {
            base_url: Url::parse("https://example.com/api/sku/").expect("test url"),
            api_token: None,
            cache_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(5),
        };
        CatalogApiClient::new(&config).expect("client builds")
    }

    #[test]
    fn test_endpoint_joins_onto_base_path() {
        let client = test_client();
        assert_eq!(
            client.endpoint(&["materials"]).as_str(),
            "https://example.com/api/sku/materials"
        );
        assert_eq!(
            client.endpoint(&["products", "bowls_set"]).as_str(),
            "https://example.com/api/sku/products/bowls_set"
        );
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = test_client();
        // Material names can contain spaces; they must travel as one segment.
        let url = client.endpoint(&["colors", "Pale Marble"]);
        assert_eq!(url.as_str(), "https://example.com/api/sku/colors/Pale%20Marble");
    }

    #[test]
    fn test_error_display() {
        let err = CatalogApiError::MissingData("skuCode".to_string());
        assert_eq!(err.to_string(), "response missing expected data: skuCode");

        let err = CatalogApiError::Remote {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote error (502 Bad Gateway): upstream down"
        );
    }
}
