//! Product design management.

use clap::Subcommand;

use atelier_configurator::catalog_api::CatalogApiClient;
use atelier_core::types::typology;

#[derive(Subcommand)]
pub enum ProductAction {
    /// List the product designs of one typology
    List {
        /// Typology name (e.g. "Bowls Set")
        #[arg(short, long)]
        typology: String,
    },
    /// Register a new product design
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Typology name the design belongs to
        #[arg(short, long)]
        typology: String,
    },
    /// Rename a product design (the design code never changes)
    Rename {
        /// Record id of the design
        #[arg(short, long)]
        id: String,

        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a product design
    Delete {
        /// Record id of the design
        #[arg(short, long)]
        id: String,
    },
    /// Look up the design code for a product name
    DesignCode {
        /// Product name
        #[arg(short, long)]
        name: String,
    },
}

/// Resolve a typology display name to its category key, failing loudly on
/// unmapped names.
fn resolve_category(typology_name: &str) -> Result<&'static str, Box<dyn std::error::Error>> {
    typology::category_key(typology_name)
        .ok_or_else(|| format!("no category mapping for typology: {typology_name}").into())
}

pub async fn run(
    client: &CatalogApiClient,
    action: ProductAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProductAction::List { typology } => {
            let category = resolve_category(&typology)?;
            for product in client.products(category).await? {
                println!("{} - {} [{}]", product.name, product.design_code, product.id);
            }
        }
        ProductAction::Add { name, typology } => {
            let category = resolve_category(&typology)?;
            client.add_product(name.trim(), category).await?;
            println!("Registered product {} under {typology}", name.trim());
        }
        ProductAction::Rename { id, name } => {
            client.rename_product(&id, name.trim()).await?;
            println!("Renamed product {id} to {}", name.trim());
        }
        ProductAction::Delete { id } => {
            client.delete_product(&id).await?;
            println!("Deleted product {id}");
        }
        ProductAction::DesignCode { name } => {
            let code = client.design_code(name.trim()).await?;
            println!("{code}");
        }
    }
    Ok(())
}
