//! Colour registration: glaze combinations and per-material vocabularies.

use clap::Subcommand;

use atelier_configurator::catalog_api::CatalogApiClient;
use atelier_configurator::catalog_api::types::ColourCodeOutcome;

#[derive(Subcommand)]
pub enum ColourAction {
    /// Register an outer/inner/rim glaze combination (idempotent)
    Add {
        /// Outer glaze colour
        #[arg(long)]
        outer: String,

        /// Inner glaze colour
        #[arg(long)]
        inner: String,

        /// Rim colour
        #[arg(long)]
        rim: String,
    },
    /// List all registered glaze combinations
    List,
    /// Register a colour in a single-colour material's vocabulary
    AddMaterial {
        /// Material name (Marble, Cement, Cork)
        #[arg(short, long)]
        material: String,

        /// Colour name
        #[arg(short, long)]
        colour: String,
    },
    /// List a single-colour material's vocabulary
    ListMaterial {
        /// Material name (Marble, Cement, Cork)
        #[arg(short, long)]
        material: String,
    },
    /// Register a cutlery handle/finish colour pairing
    AddCutlery {
        /// Handle colour
        #[arg(long)]
        handle: String,

        /// Finish colour
        #[arg(long)]
        finish: String,
    },
}

pub async fn run(
    client: &CatalogApiClient,
    action: ColourAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ColourAction::Add { outer, inner, rim } => {
            let outcome = client
                .add_colour_combination(outer.trim(), inner.trim(), rim.trim())
                .await?;
            match outcome {
                ColourCodeOutcome::Created(code) => {
                    println!("New colour code generated: {code}");
                }
                ColourCodeOutcome::Existing(code) => {
                    println!("This combination already exists with code: {code}");
                }
            }
        }
        ColourAction::List => {
            for combo in client.colour_combinations().await? {
                println!(
                    "{} / {} / {} -> {}",
                    combo.outer_color,
                    combo.inner_color,
                    combo.rim_color,
                    combo.code.as_deref().unwrap_or("-")
                );
            }
        }
        ColourAction::AddMaterial { material, colour } => {
            client
                .add_material_colour(material.trim(), colour.trim())
                .await?;
            println!("Added new {} colour: {}", material.trim(), colour.trim());
        }
        ColourAction::ListMaterial { material } => {
            for entry in client.material_colours(material.trim()).await? {
                println!("{} - {}", entry.colour, entry.code);
            }
        }
        ColourAction::AddCutlery { handle, finish } => {
            client
                .add_cutlery_colour(handle.trim(), finish.trim())
                .await?;
            println!(
                "Added cutlery colour pairing {} / {}",
                handle.trim(),
                finish.trim()
            );
        }
    }
    Ok(())
}
