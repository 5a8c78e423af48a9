//! Async selection controller.
//!
//! Owns the pure [`ConfigurationState`] from `atelier-core`, executes the
//! fetch [`Command`]s its transitions emit, and keeps the fetched option
//! lists alongside the selections. Each fetch slot carries a generation
//! counter: a response whose generation no longer matches the latest issued
//! request is discarded, so rapid re-selection can never let an older
//! response overwrite a newer one.
//!
//! Remote failures while loading option lists are not fatal - the list stays
//! empty and the caller receives a [`Warning`] to surface. Configuration
//! errors (an unmapped typology) abort the transition with the state
//! unchanged.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use atelier_core::cascade::{Command, ConfigurationError, ConfigurationState, Transition};
use atelier_core::gate::{self, GateError, SkuPolicy, SkuRequest};
use atelier_core::types::{
    CutleryColour, GlazePalette, Material, MaterialColour, ProductDesign, SkuCode, Typology,
};

use crate::catalog_api::{CatalogApiClient, CatalogApiError};

/// A non-fatal problem the user should see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("failed to load {material} colours: {reason}")]
    MaterialColoursUnavailable { material: String, reason: String },
    #[error("failed to load products for {typology}: {reason}")]
    ProductsUnavailable { typology: String, reason: String },
    #[error("failed to load cutlery colours: {reason}")]
    CutleryColoursUnavailable { reason: String },
    #[error("failed to load the glaze palette: {reason}")]
    GlazePaletteUnavailable { reason: String },
}

/// A selection transition failed outright; the state is unchanged.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Fatal configuration problem (unmapped typology).
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The named material is not in the loaded vocabulary.
    #[error("unknown material: {0}")]
    UnknownMaterial(String),
    /// The named product is not in the loaded product list.
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    /// Loading the core reference data failed.
    #[error(transparent)]
    Api(#[from] CatalogApiError),
}

/// SKU generation failed; any previously shown code has been cleared.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The selection does not satisfy the active strategy.
    #[error(transparent)]
    Gate(#[from] GateError),
    /// The allocation call failed or returned no code.
    #[error(transparent)]
    Api(#[from] CatalogApiError),
    /// The selection changed while the request was in flight.
    #[error("selection changed while the SKU request was in flight")]
    SelectionChanged,
}

/// The option lists backing each picker.
#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    pub materials: Vec<Material>,
    pub typologies: Vec<Typology>,
    pub glaze_palette: GlazePalette,
    pub products: Vec<ProductDesign>,
    pub material_colours: Vec<MaterialColour>,
    pub cutlery_colours: Vec<CutleryColour>,
}

/// A consistent view of selections and options at one moment.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: ConfigurationState,
    pub options: SelectionOptions,
    pub can_submit: bool,
}

#[derive(Debug, Default)]
struct ControllerInner {
    state: ConfigurationState,
    options: SelectionOptions,
    /// Generation of the latest product-list request.
    product_generation: u64,
    /// Generation of the latest colour-vocabulary request (material or
    /// cutlery; the slots reset together on every upstream change).
    colour_generation: u64,
}

/// The selection controller.
///
/// Cheaply cloneable; all clones share one state. The internal lock is never
/// held across a network call, so overlapping transitions interleave and are
/// serialised only at commit time, where the generation check applies.
#[derive(Clone)]
pub struct SelectionController {
    client: CatalogApiClient,
    policy: SkuPolicy,
    inner: Arc<Mutex<ControllerInner>>,
}

impl SelectionController {
    /// Create a controller with an empty selection.
    #[must_use]
    pub fn new(client: CatalogApiClient, policy: SkuPolicy) -> Self {
        Self {
            client,
            policy,
            inner: Arc::new(Mutex::new(ControllerInner::default())),
        }
    }

    /// Load the session reference data: materials, typologies and the glaze
    /// palette.
    ///
    /// Materials and typologies are required - nothing works without them.
    /// A missing glaze palette only degrades the ceramic pickers, so it is
    /// reported as a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if materials or typologies cannot be loaded.
    pub async fn init(&self) -> Result<Vec<Warning>, SelectionError> {
        let (materials, typologies) =
            tokio::try_join!(self.client.materials(), self.client.typologies())?;

        let mut warnings = Vec::new();
        let glaze_palette = match self.client.glaze_palette().await {
            Ok(palette) => palette,
            Err(e) => {
                warnings.push(Warning::GlazePaletteUnavailable {
                    reason: e.to_string(),
                });
                GlazePalette::default()
            }
        };

        let mut inner = self.inner.lock().await;
        inner.options.materials = materials;
        inner.options.typologies = typologies;
        inner.options.glaze_palette = glaze_palette;
        Ok(warnings)
    }

    /// Select a material by name (`None` clears the selection).
    ///
    /// Clears all colour fields and any generated SKU; for a single-colour
    /// material the colour vocabulary is fetched, and a fetch failure leaves
    /// the vocabulary empty with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownMaterial`] if the name is not in the
    /// loaded material list.
    pub async fn select_material(&self, name: Option<&str>) -> Result<Vec<Warning>, SelectionError> {
        let (generation, command) = {
            let mut inner = self.inner.lock().await;

            let material = match name {
                None => None,
                Some(name) => Some(
                    inner
                        .options
                        .materials
                        .iter()
                        .find(|m| m.name == name)
                        .cloned()
                        .ok_or_else(|| SelectionError::UnknownMaterial(name.to_string()))?,
                ),
            };

            let step = inner.state.apply(Transition::SelectMaterial(material))?;
            inner.state = step.state;
            // The old vocabularies are invalid the moment the material
            // changes, before any fetch resolves.
            inner.options.material_colours.clear();
            inner.options.cutlery_colours.clear();
            inner.colour_generation += 1;
            (inner.colour_generation, step.command)
        };

        let mut warnings = Vec::new();
        if let Some(Command::LoadMaterialColours { material }) = command {
            match self.client.material_colours(&material).await {
                Ok(colours) => {
                    let mut inner = self.inner.lock().await;
                    if inner.colour_generation == generation {
                        inner.options.material_colours = colours;
                    } else {
                        debug!(%material, "Discarding stale material-colour response");
                    }
                }
                Err(e) => warnings.push(Warning::MaterialColoursUnavailable {
                    material,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(warnings)
    }

    /// Select a typology by name (`None` clears the selection).
    ///
    /// Clears the product list, the product selection, all colour fields and
    /// any generated SKU before the product fetch is issued.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Configuration`] for a typology name missing
    /// from the category-key map - a fatal configuration problem, not a
    /// loading failure. The state is unchanged in that case.
    pub async fn select_typology(&self, name: Option<&str>) -> Result<Vec<Warning>, SelectionError> {
        let (product_generation, colour_generation, command) = {
            let mut inner = self.inner.lock().await;
            let step = inner
                .state
                .apply(Transition::SelectTypology(name.map(str::to_string)))?;
            inner.state = step.state;
            inner.options.products.clear();
            inner.options.material_colours.clear();
            inner.options.cutlery_colours.clear();
            inner.product_generation += 1;
            inner.colour_generation += 1;
            (
                inner.product_generation,
                inner.colour_generation,
                step.command,
            )
        };

        let mut warnings = Vec::new();
        match command {
            Some(Command::LoadProducts { category_key }) => {
                match self.client.products(category_key).await {
                    Ok(products) => {
                        let mut inner = self.inner.lock().await;
                        if inner.product_generation == product_generation {
                            inner.options.products = products;
                        } else {
                            debug!(category_key, "Discarding stale product-list response");
                        }
                    }
                    Err(e) => warnings.push(Warning::ProductsUnavailable {
                        typology: name.unwrap_or_default().to_string(),
                        reason: e.to_string(),
                    }),
                }
            }
            Some(Command::LoadCutleryColours) if self.policy.cutlery_enabled => {
                match self.client.cutlery_colours().await {
                    Ok(colours) => {
                        let mut inner = self.inner.lock().await;
                        if inner.colour_generation == colour_generation {
                            inner.options.cutlery_colours = colours;
                        } else {
                            debug!("Discarding stale cutlery-colour response");
                        }
                    }
                    Err(e) => warnings.push(Warning::CutleryColoursUnavailable {
                        reason: e.to_string(),
                    }),
                }
                // The enabled cutlery flow still needs its product list.
                match self.client.products("cutlery").await {
                    Ok(products) => {
                        let mut inner = self.inner.lock().await;
                        if inner.product_generation == product_generation {
                            inner.options.products = products;
                        } else {
                            debug!("Discarding stale cutlery product-list response");
                        }
                    }
                    Err(e) => warnings.push(Warning::ProductsUnavailable {
                        typology: name.unwrap_or_default().to_string(),
                        reason: e.to_string(),
                    }),
                }
            }
            Some(Command::LoadCutleryColours) => {
                debug!("Cutlery flow disabled; skipping cutlery colour fetch");
            }
            _ => {}
        }

        Ok(warnings)
    }

    /// Select a product by name (`None` clears the selection).
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownProduct`] if the name is not in the
    /// loaded product list.
    pub async fn select_product(&self, name: Option<&str>) -> Result<(), SelectionError> {
        let mut inner = self.inner.lock().await;
        if let Some(name) = name
            && !inner.options.products.iter().any(|p| p.name == name)
        {
            return Err(SelectionError::UnknownProduct(name.to_string()));
        }
        let step = inner
            .state
            .apply(Transition::SelectProduct(name.map(str::to_string)))?;
        inner.state = step.state;
        Ok(())
    }

    /// Set the outer glaze.
    pub async fn set_outer_glaze(&self, value: Option<&str>) {
        self.apply_colour(Transition::SetOuterGlaze(value.map(str::to_string)))
            .await;
    }

    /// Set the inner glaze.
    pub async fn set_inner_glaze(&self, value: Option<&str>) {
        self.apply_colour(Transition::SetInnerGlaze(value.map(str::to_string)))
            .await;
    }

    /// Set the rim colour.
    pub async fn set_rim_glaze(&self, value: Option<&str>) {
        self.apply_colour(Transition::SetRimGlaze(value.map(str::to_string)))
            .await;
    }

    /// Set the single material colour.
    pub async fn set_material_colour(&self, value: Option<&str>) {
        self.apply_colour(Transition::SetMaterialColour(value.map(str::to_string)))
            .await;
    }

    /// Set the cutlery handle colour.
    pub async fn set_handle_colour(&self, value: Option<&str>) {
        self.apply_colour(Transition::SetHandleColour(value.map(str::to_string)))
            .await;
    }

    /// Set the cutlery finish colour.
    pub async fn set_finish_colour(&self, value: Option<&str>) {
        self.apply_colour(Transition::SetFinishColour(value.map(str::to_string)))
            .await;
    }

    async fn apply_colour(&self, transition: Transition) {
        let mut inner = self.inner.lock().await;
        // Colour transitions emit no command and cannot fail.
        if let Ok(step) = inner.state.apply(transition) {
            inner.state = step.state;
        }
    }

    /// Whether the current selection is complete enough to submit.
    pub async fn can_submit(&self) -> bool {
        let inner = self.inner.lock().await;
        gate::can_submit(&inner.state, &self.policy)
    }

    /// The request the current selection would submit, for inspection.
    ///
    /// # Errors
    ///
    /// Returns the gate error naming what is missing.
    pub async fn pending_request(&self) -> Result<SkuRequest, GateError> {
        let inner = self.inner.lock().await;
        gate::build_request(&inner.state, &self.policy)
    }

    /// Submit the current selection to the allocation backend.
    ///
    /// On success the code is stored in the state and returned; on any
    /// failure a previously shown code is cleared and no fallback is
    /// invented. If the selection changes while the request is in flight,
    /// the response is discarded.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] for gate failures, remote failures, or a
    /// selection change during the request.
    pub async fn generate_sku(&self) -> Result<SkuCode, GenerateError> {
        let (request, issued_from) = {
            let mut inner = self.inner.lock().await;
            // A stale code must not survive a failed attempt.
            inner.state = inner.state.clone().without_generated_sku();
            let request = gate::build_request(&inner.state, &self.policy)?;
            (request, inner.state.clone())
        };

        let result = self.client.request_sku(&request).await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(code) => {
                if inner.state == issued_from {
                    inner.state = inner.state.clone().with_generated_sku(code.clone());
                    Ok(code)
                } else {
                    debug!("Discarding SKU allocated for a superseded selection");
                    Err(GenerateError::SelectionChanged)
                }
            }
            Err(e) => {
                inner.state = inner.state.clone().without_generated_sku();
                Err(e.into())
            }
        }
    }

    /// A consistent snapshot of the current selections and options.
    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock().await;
        Snapshot {
            state: inner.state.clone(),
            options: inner.options.clone(),
            can_submit: gate::can_submit(&inner.state, &self.policy),
        }
    }
}
