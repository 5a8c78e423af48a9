//! SKU generation and catalog browsing.

use clap::Subcommand;

use atelier_configurator::catalog_api::CatalogApiClient;
use atelier_configurator::config::StudioConfig;
use atelier_configurator::controller::SelectionController;
use atelier_configurator::services::CatalogBrowser;
use atelier_core::catalog::{self, SearchMode, TypeFilter};

#[derive(Subcommand)]
pub enum SkuAction {
    /// Drive the configurator and allocate a SKU
    Generate {
        /// Material name
        #[arg(short, long)]
        material: String,

        /// Typology name
        #[arg(short, long)]
        typology: String,

        /// Product name
        #[arg(short, long)]
        product: String,

        /// Outer glaze (ceramic materials)
        #[arg(long)]
        outer: Option<String>,

        /// Inner glaze (ceramic materials)
        #[arg(long)]
        inner: Option<String>,

        /// Rim colour (ceramic materials)
        #[arg(long)]
        rim: Option<String>,

        /// Material colour (Marble/Cement/Cork)
        #[arg(long)]
        colour: Option<String>,

        /// Handle colour (cutlery)
        #[arg(long)]
        handle: Option<String>,

        /// Finish colour (cutlery)
        #[arg(long)]
        finish: Option<String>,
    },
    /// Browse the merged current + legacy catalog
    List {
        /// Filter by typology code ("all" shows everything)
        #[arg(short, long, default_value = "all")]
        r#type: String,

        /// Search term (at least 2 characters) over name, colour and code
        #[arg(short, long)]
        search: Option<String>,

        /// Show every matching row instead of the first page
        #[arg(long)]
        all: bool,
    },
    /// Overwrite the code of a legacy record
    EditLegacy {
        /// Record id of the legacy SKU
        #[arg(short, long)]
        id: String,

        /// New code
        #[arg(short, long)]
        code: String,
    },
    /// Delete a SKU record by code
    Delete {
        /// SKU code
        #[arg(short, long)]
        code: String,
    },
}

pub async fn run(
    client: &CatalogApiClient,
    config: &StudioConfig,
    action: SkuAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SkuAction::Generate {
            material,
            typology,
            product,
            outer,
            inner,
            rim,
            colour,
            handle,
            finish,
        } => {
            let controller = SelectionController::new(client.clone(), config.policy());

            let mut warnings = controller.init().await?;
            warnings.extend(controller.select_material(Some(&material)).await?);
            warnings.extend(controller.select_typology(Some(&typology)).await?);
            controller.select_product(Some(&product)).await?;

            controller.set_outer_glaze(outer.as_deref()).await;
            controller.set_inner_glaze(inner.as_deref()).await;
            controller.set_rim_glaze(rim.as_deref()).await;
            controller.set_material_colour(colour.as_deref()).await;
            controller.set_handle_colour(handle.as_deref()).await;
            controller.set_finish_colour(finish.as_deref()).await;

            for warning in &warnings {
                tracing::warn!("{warning}");
            }

            let code = controller.generate_sku().await?;
            println!("Generated SKU: {code}");
        }
        SkuAction::List {
            r#type,
            search,
            all,
        } => {
            let browser = CatalogBrowser::new(client.clone());
            let mut view = browser.load(SearchMode::ExplicitSubmit).await?;

            if r#type != "all" {
                view.set_type_filter(TypeFilter::Code(r#type));
            }
            if let Some(term) = search {
                view.set_search_term(term);
                if !view.submit_search() {
                    return Err(format!(
                        "search terms need at least {} characters",
                        catalog::MIN_QUERY_LEN
                    )
                    .into());
                }
            }

            let typologies = browser.typologies().await?;
            let rows = if all { view.filtered() } else { view.visible() };
            if rows.is_empty() {
                println!("No results found");
                return Ok(());
            }

            for entry in &rows {
                let type_name = typologies
                    .iter()
                    .find(|t| t.code == entry.type_code)
                    .map_or(entry.type_code.as_str(), |t| t.name.as_str());
                println!(
                    "{:<14} {} {} [{}] ({:?})",
                    entry.sku_code,
                    entry.product_name,
                    entry.colour,
                    type_name,
                    catalog::badge_colour(&entry.type_code)
                );
            }
            if !all && view.has_more() {
                println!("... more rows match; rerun with --all");
            }
        }
        SkuAction::EditLegacy { id, code } => {
            client.edit_legacy_sku(&id, code.trim()).await?;
            println!("Updated legacy SKU {id} to {}", code.trim());
        }
        SkuAction::Delete { code } => {
            client.delete_sku(code.trim()).await?;
            println!("Deleted SKU {}", code.trim());
        }
    }
    Ok(())
}
