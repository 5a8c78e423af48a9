//! Pricing records and their derived values.

use clap::Subcommand;
use rust_decimal::Decimal;

use atelier_configurator::catalog_api::CatalogApiClient;
use atelier_configurator::services::PricingDesk;
use atelier_core::pricing::{self, PriceInputs};

#[derive(Subcommand)]
pub enum PricingAction {
    /// Save a new pricing record
    Add {
        /// SKU code the record belongs to
        #[arg(short, long)]
        sku: String,

        /// Making price excluding GST
        #[arg(long)]
        cp: String,

        /// Delivery charges
        #[arg(long, default_value = "0")]
        dc: String,

        /// Selling price excluding GST
        #[arg(long)]
        sp: String,

        /// GST rate multiplier (1.18 = 18%, 1.12 = 12%)
        #[arg(long)]
        gst: Option<Decimal>,
    },
    /// List saved pricing records with derived values
    List {
        /// Filter by SKU code or product name substring
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Edit a record in place; omitted fields keep their stored values
    Edit {
        /// Record id
        #[arg(short, long)]
        id: String,

        /// New making price excluding GST
        #[arg(long)]
        cp: Option<String>,

        /// New delivery charges
        #[arg(long)]
        dc: Option<String>,

        /// New selling price excluding GST
        #[arg(long)]
        sp: Option<String>,

        /// New GST rate multiplier
        #[arg(long)]
        gst: Option<Decimal>,
    },
    /// Delete a pricing record (no undo)
    Delete {
        /// Record id
        #[arg(short, long)]
        id: String,
    },
}

pub async fn run(
    client: &CatalogApiClient,
    action: PricingAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut desk = PricingDesk::new(client.clone());

    match action {
        PricingAction::Add {
            sku,
            cp,
            dc,
            sp,
            gst,
        } => {
            let inputs = PriceInputs::parse(
                &cp,
                &dc,
                &sp,
                gst.unwrap_or_else(pricing::default_gst_rate),
            );
            let derived = inputs.derive();
            desk.save_new(sku.trim(), &inputs).await?;
            println!(
                "Saved pricing for {}: incl GST {}, total cost {}, COGS {}%",
                sku.trim(),
                derived.making_incl_gst,
                derived.total_cost,
                derived.cogs_pct
            );
        }
        PricingAction::List { search } => {
            desk.reload().await?;
            let rows = match &search {
                Some(term) => desk.search(term),
                None => desk.rows(),
            };
            if rows.is_empty() {
                println!("No pricing records found");
                return Ok(());
            }
            for row in rows {
                let name = row.summary.map_or("-", |s| s.product_name.as_str());
                let record = row.record;
                println!(
                    "{} [{}] {} | cp {} | incl {} | dc {} | total {} | sp {} | incl {} | COGS {}%",
                    record.id,
                    record.sku_code,
                    name,
                    record.inputs.making_excl_gst,
                    record.derived.making_incl_gst,
                    record.inputs.delivery_charges,
                    record.derived.total_cost,
                    record.inputs.selling_excl_gst,
                    record.derived.selling_incl_gst,
                    record.derived.cogs_pct
                );
            }
        }
        PricingAction::Edit {
            id,
            cp,
            dc,
            sp,
            gst,
        } => {
            desk.reload().await?;
            {
                let buffer = desk.begin_edit(&id)?;
                if let Some(cp) = cp {
                    buffer.set_making_excl_gst(cp);
                }
                if let Some(dc) = dc {
                    buffer.set_delivery_charges(dc);
                }
                if let Some(sp) = sp {
                    buffer.set_selling_excl_gst(sp);
                }
                if let Some(gst) = gst {
                    buffer.set_gst_rate(gst);
                }
            }
            desk.commit_edit().await?;
            println!("Updated pricing record {id}");
        }
        PricingAction::Delete { id } => {
            desk.reload().await?;
            desk.delete(&id).await?;
            println!("Deleted pricing record {id}");
        }
    }
    Ok(())
}
