use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use cart_client::{
    CartBackend, CartController, DecreaseOutcome, HttpCartBackend, OfflineCartBackend,
};
use clap::{Parser, Subcommand};
use shared::{domain::CartItemId, pricing::format_rupees};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod snapshot;

use config::load_settings;
use snapshot::{load_snapshot, save_snapshot, CartSnapshot};

#[derive(Parser, Debug)]
#[command(about = "Storefront cart controls and messaging checkout")]
struct Args {
    /// Settings file; missing files fall back to defaults and environment.
    #[arg(long, default_value = "cart.toml")]
    config: PathBuf,
    /// Cart snapshot (JSON) read before and written after each command.
    #[arg(long, default_value = "cart.json")]
    cart: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the rows and totals.
    Show,
    /// Press the increase control of a row.
    Increase {
        #[arg(long)]
        item: i64,
    },
    /// Press the decrease control of a row.
    Decrease {
        #[arg(long)]
        item: i64,
    },
    /// Type a value into a row's quantity field.
    Set {
        #[arg(long)]
        item: i64,
        #[arg(long)]
        quantity: String,
    },
    /// Build the order summary and print the messaging URL.
    Checkout {
        /// Also write the structured checkout form as JSON.
        #[arg(long)]
        form_out: Option<PathBuf>,
    },
    /// Print the messaging URL without an order attached.
    Greeting,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let settings = load_settings(&args.config)?;

    let backend: Arc<dyn CartBackend> = match &settings.base_url {
        Some(base_url) => Arc::new(HttpCartBackend::new(base_url.clone())),
        None => {
            warn!("no storefront base url configured; deletes and syncs will fail");
            Arc::new(OfflineCartBackend)
        }
    };

    let snapshot = load_snapshot(&args.cart)?;
    let mut controller =
        CartController::new(snapshot.into_lines()?, backend, settings.checkout_config()?)?
            .with_cookies(settings.cookies.clone())
            .with_options(settings.controller_options());

    let mut changed = true;
    match args.command {
        Command::Show => changed = false,
        Command::Increase { item } => {
            let quantity = controller.increase(CartItemId(item)).await?;
            info!(item_id = item, quantity, "increased");
        }
        Command::Decrease { item } => match controller.decrease(CartItemId(item)).await? {
            DecreaseOutcome::Updated(quantity) => info!(item_id = item, quantity, "decreased"),
            DecreaseOutcome::Removed => info!(item_id = item, "removed from cart"),
            DecreaseOutcome::RemovalFailed => {
                changed = false;
                warn!(item_id = item, "item kept; storefront did not confirm removal");
            }
        },
        Command::Set { item, quantity } => {
            let stored = controller
                .edit_quantity(CartItemId(item), &quantity)
                .await?;
            info!(item_id = item, quantity = stored, "quantity set");
        }
        Command::Checkout { form_out } => {
            let handoff = controller.prepare_checkout()?;
            if let Some(path) = form_out {
                std::fs::write(&path, serde_json::to_string_pretty(&handoff.form)?)?;
            }
            println!("{}", handoff.url);
            return Ok(());
        }
        Command::Greeting => {
            println!("{}", controller.greeting_url()?);
            return Ok(());
        }
    }

    print_cart(&controller);
    for notification in controller.notifications().active() {
        eprintln!("[{}] {}", notification.element.class, notification.element.text);
    }

    if changed {
        save_snapshot(
            &args.cart,
            &CartSnapshot {
                lines: controller.into_lines(),
                rows: Vec::new(),
            },
        )?;
    }
    Ok(())
}

fn print_cart(controller: &CartController) {
    for line in controller.lines() {
        let pack = line
            .pack_size
            .map(|size| format!(" ({size})"))
            .unwrap_or_default();
        let increase = if line.increase_enabled { "" } else { " [max]" };
        println!(
            "#{} {}{pack}: {} x {} = {}{increase}",
            line.item_id,
            line.product_name,
            line.quantity,
            format_rupees(line.unit_price),
            line.line_total_display(),
        );
    }
    let totals = controller.recompute_aggregate();
    println!("Subtotal: {}", totals.subtotal_display());
    println!("Total: {}", totals.total_display());
}
