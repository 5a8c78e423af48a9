//! Reference-data listing and material registration.

use clap::Subcommand;

use atelier_configurator::catalog_api::CatalogApiClient;

#[derive(Subcommand)]
pub enum RefdataTarget {
    /// List materials with their category tags
    Materials,
    /// List typologies
    Typologies,
    /// Show the ceramic glaze palette
    Glazes,
}

#[derive(Subcommand)]
pub enum MaterialAction {
    /// Register a new material
    Add {
        /// Material name (e.g. "Terracotta")
        #[arg(short, long)]
        name: String,

        /// Short uppercase SKU abbreviation (e.g. "TC")
        #[arg(short, long)]
        code: String,
    },
}

pub async fn list(
    client: &CatalogApiClient,
    target: RefdataTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    match target {
        RefdataTarget::Materials => {
            for material in client.materials().await? {
                println!(
                    "{} - {} ({:?})",
                    material.name, material.code, material.category
                );
            }
        }
        RefdataTarget::Typologies => {
            for typology in client.typologies().await? {
                println!("{} - {}", typology.name, typology.code);
            }
        }
        RefdataTarget::Glazes => {
            let palette = client.glaze_palette().await?;
            println!("Outer: {}", palette.outer.join(", "));
            println!("Inner: {}", palette.inner.join(", "));
            println!("Rim:   {}", palette.rim.join(", "));
        }
    }
    Ok(())
}

pub async fn material(
    client: &CatalogApiClient,
    action: MaterialAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MaterialAction::Add { name, code } => {
            if name.trim().is_empty() || code.trim().is_empty() {
                return Err("material name and code are both required".into());
            }
            client.add_material(name.trim(), code.trim()).await?;
            println!("Registered material {} ({})", name.trim(), code.trim());
        }
    }
    Ok(())
}
