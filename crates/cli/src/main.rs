//! Atelier CLI - SKU generation, pricing and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # List reference data
//! atelier refdata materials
//! atelier refdata typologies
//!
//! # Generate a ceramic SKU
//! atelier sku generate --material Ceramic --typology Bowls --product "Ramen Bowl" \
//!     --outer Fog --inner Moss --rim Fog
//!
//! # Generate a marble SKU
//! atelier sku generate --material Marble --typology Vases --product "Bud Vase" \
//!     --colour Verde
//!
//! # Browse the merged catalog
//! atelier sku list --type BO
//! atelier sku list --search "ramen"
//!
//! # Pricing
//! atelier pricing add --sku CEBORB-FGMS --cp 100 --dc 20 --sp 150
//! atelier pricing edit --id 65fa0c --cp 110
//! ```
//!
//! # Commands
//!
//! - `refdata` - List materials, typologies and the glaze palette
//! - `material` - Register materials
//! - `product` - Manage product designs
//! - `colour` - Register colour combinations and vocabularies
//! - `sku` - Generate SKUs and browse/maintain the catalog
//! - `pricing` - Pricing records and their derived values

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI's job is to print to stdout.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use atelier_configurator::catalog_api::CatalogApiClient;
use atelier_configurator::config::StudioConfig;

mod commands;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier SKU Studio CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List reference data
    Refdata {
        #[command(subcommand)]
        target: commands::refdata::RefdataTarget,
    },
    /// Register materials
    Material {
        #[command(subcommand)]
        action: commands::refdata::MaterialAction,
    },
    /// Manage product designs
    Product {
        #[command(subcommand)]
        action: commands::product::ProductAction,
    },
    /// Register colour combinations and vocabularies
    Colour {
        #[command(subcommand)]
        action: commands::colour::ColourAction,
    },
    /// Generate SKUs and browse the catalog
    Sku {
        #[command(subcommand)]
        action: commands::sku::SkuAction,
    },
    /// Pricing records and their derived values
    Pricing {
        #[command(subcommand)]
        action: commands::pricing::PricingAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StudioConfig::from_env()?;
    let client = CatalogApiClient::new(&config.api)?;

    match cli.command {
        Commands::Refdata { target } => commands::refdata::list(&client, target).await?,
        Commands::Material { action } => commands::refdata::material(&client, action).await?,
        Commands::Product { action } => commands::product::run(&client, action).await?,
        Commands::Colour { action } => commands::colour::run(&client, action).await?,
        Commands::Sku { action } => commands::sku::run(&client, &config, action).await?,
        Commands::Pricing { action } => commands::pricing::run(&client, action).await?,
    }

    Ok(())
}
