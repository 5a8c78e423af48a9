//! Atelier Configurator - application library.
//!
//! Everything that talks to the remote catalog API lives here, layered on
//! the pure rules in `atelier-core`:
//!
//! - [`config`] - Environment configuration (base URL, token, policy knobs)
//! - [`catalog_api`] - REST client with reference-data caching
//! - [`controller`] - Async selection controller: runs the cascade reducer,
//!   executes its fetch commands, and discards stale responses
//! - [`services`] - Pricing desk and catalog browser built on the client
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_configurator::config::StudioConfig;
//! use atelier_configurator::catalog_api::CatalogApiClient;
//! use atelier_configurator::controller::SelectionController;
//!
//! let config = StudioConfig::from_env()?;
//! let client = CatalogApiClient::new(&config.api)?;
//! let controller = SelectionController::new(client, config.policy());
//!
//! controller.init().await?;
//! controller.select_material(Some("Ceramic")).await?;
//! controller.select_typology(Some("Bowls")).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog_api;
pub mod config;
pub mod controller;
pub mod services;

pub use catalog_api::{CatalogApiClient, CatalogApiError};
pub use config::{ConfigError, StudioConfig};
pub use controller::SelectionController;
