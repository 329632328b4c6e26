//! `grocery`: drive the storefront against a running grocery API from the
//! command line.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grocery_core::render::format::{format_currency, format_datetime};
use grocery_core::storefront::containers;
use grocery_core::{ClientConfig, DeleteOutcome, Storefront, UiService, UreqTransport};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Grocery store client: lists, exports, receipts and deletes")]
struct Cli {
    /// Root URL of the grocery API.
    #[arg(long, env = "GROCERY_API_URL", default_value = grocery_core::config::DEFAULT_BASE_URL)]
    api_url: String,

    /// Attempts per list load before giving up.
    #[arg(long, env = "GROCERY_RETRIES", default_value_t = 3)]
    retries: u32,

    /// Backoff step in milliseconds; attempt n waits n times this.
    #[arg(long, env = "GROCERY_BACKOFF_MS", default_value_t = 1000)]
    backoff_ms: u64,

    /// Per-request timeout in seconds.
    #[arg(long, env = "GROCERY_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a list.
    List {
        #[arg(value_enum)]
        entity: ListTarget,
        /// Print the rendered HTML instead of a text table.
        #[arg(long)]
        html: bool,
    },
    /// Write a CSV export.
    Export {
        #[arg(value_enum)]
        entity: ExportTarget,
        /// Output file; defaults to the export's own file name.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Write the printable receipt of an order.
    Receipt {
        order_id: u64,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete a customer or product.
    Delete {
        #[arg(value_enum)]
        entity: DeleteTarget,
        id: u64,
        /// Name used in messages; defaults to `#<id>`.
        #[arg(long)]
        name: Option<String>,
        /// Skip the confirmation prompt. Required when stdin is not a terminal.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListTarget {
    Customers,
    Products,
    Orders,
    Uom,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportTarget {
    Customers,
    Products,
    Orders,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DeleteTarget {
    Customer,
    Product,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            retries: self.retries,
            backoff_base_ms: self.backoff_ms,
            timeout_secs: self.timeout_secs,
        }
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let config = cli.config();
    tracing::debug!(?config, "client configuration");

    let store = Storefront::from_config(
        &config,
        UreqTransport::new(config.timeout()),
        UiService::default(),
    );

    match cli.command {
        Command::List { entity, html } => list(&store, entity, html).await,
        Command::Export { entity, out } => {
            let export = match entity {
                ExportTarget::Customers => store.export_customers().await,
                ExportTarget::Products => store.export_products().await,
                ExportTarget::Orders => store.export_orders().await,
            }
            .context("export failed")?;
            let path = out.unwrap_or_else(|| PathBuf::from(export.filename));
            std::fs::write(&path, export.contents)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Receipt { order_id, out } => {
            let now = chrono::Local::now().naive_local();
            let receipt = store
                .print_receipt(order_id, now)
                .await
                .with_context(|| format!("could not load order #{order_id}"))?;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("receipt-{order_id}.html")));
            std::fs::write(&path, receipt).with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Delete { entity, id, name, yes } => {
            let name = name.unwrap_or_else(|| format!("#{id}"));
            if !yes {
                let stdin = std::io::stdin();
                if !stdin.is_terminal() {
                    bail!("refusing to delete {name} without --yes");
                }
                let question = format!("Are you sure you want to delete \"{name}\"? [y/N] ");
                if !confirm(&question, stdin.lock(), std::io::stderr())? {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            let outcome = match entity {
                DeleteTarget::Customer => store.delete_customer(id, &name).await,
                DeleteTarget::Product => store.delete_product(id, &name).await,
            };
            match outcome {
                DeleteOutcome::Deleted { message } => {
                    println!("{}", message.unwrap_or_else(|| format!("Deleted {name}")));
                    Ok(())
                }
                DeleteOutcome::Conflict { reason } => bail!("{name} is still used by orders: {reason}"),
                DeleteOutcome::Failed { error } => Err(error).context(format!("deleting {name}")),
            }
        }
    }
}

/// Ask a yes/no question; anything but `y`/`yes` declines.
fn confirm(question: &str, mut input: impl BufRead, mut output: impl Write) -> Result<bool> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer).context("reading confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn list(store: &Storefront<UreqTransport>, entity: ListTarget, html: bool) -> Result<()> {
    // Order timestamps arrive in UTC.
    let now = chrono::Utc::now().naive_utc();
    let (container, rows) = match entity {
        ListTarget::Customers => {
            let customers = store.load_customers().await;
            let rows = customers.map(|list| {
                list.iter()
                    .map(|c| {
                        format!(
                            "{:>5}  {:<30} {:<16} {}",
                            c.customer_id,
                            c.name,
                            c.phone.as_deref().unwrap_or("-"),
                            c.email.as_deref().unwrap_or("-")
                        )
                    })
                    .collect::<Vec<_>>()
            });
            (containers::CUSTOMERS, rows)
        }
        ListTarget::Products => {
            let products = store.load_products().await;
            let rows = products.map(|list| {
                list.iter()
                    .map(|p| {
                        format!(
                            "{:>5}  {:<30} {:>12} / {:<6} stock {}",
                            p.product_id,
                            p.name,
                            format_currency(p.price_per_unit),
                            p.uom_name,
                            p.stock()
                        )
                    })
                    .collect::<Vec<_>>()
            });
            (containers::PRODUCTS, rows)
        }
        ListTarget::Orders => {
            let orders = store.load_orders(now).await;
            let rows = orders.map(|list| {
                list.iter()
                    .map(|o| {
                        format!(
                            "{:>5}  {:<30} {:<22} {:>12}",
                            o.order_id,
                            o.customer_name,
                            format_datetime(&o.datetime),
                            format_currency(o.total)
                        )
                    })
                    .collect::<Vec<_>>()
            });
            (containers::ORDERS, rows)
        }
        ListTarget::Uom => {
            let units = store.load_uom_options(None).await;
            let rows = units.map(|list| {
                list.iter()
                    .map(|u| format!("{:>5}  {}", u.uom_id, u.uom_name))
                    .collect::<Vec<_>>()
            });
            (containers::UOM_SELECT, rows)
        }
    };

    if html {
        println!("{}", store.page().html(container).unwrap_or_default());
    }
    let Some(rows) = rows else {
        bail!("could not load {entity:?} from {}", store.client().base_url());
    };
    if !html {
        for row in rows {
            println!("{row}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_into_config() {
        let cli = Cli::try_parse_from([
            "grocery",
            "--api-url",
            "http://shop.local:8080",
            "--retries",
            "5",
            "--backoff-ms",
            "250",
            "list",
            "products",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.base_url, "http://shop.local:8080");
        assert_eq!(config.retry_policy().max_attempts, 5);
        assert_eq!(config.retry_policy().delay_after(2).as_millis(), 500);
        assert!(matches!(cli.command, Command::List { entity: ListTarget::Products, html: false }));
    }

    #[test]
    fn delete_takes_entity_and_id() {
        let cli = Cli::try_parse_from(["grocery", "delete", "product", "7", "--name", "Rice"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Delete { entity: DeleteTarget::Product, id: 7, yes: false, .. }
        ));

        let cli = Cli::try_parse_from(["grocery", "delete", "customer", "3", "-y"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { yes: true, .. }));
    }

    #[test]
    fn confirm_accepts_only_yes() {
        let mut prompt = Vec::new();
        assert!(confirm("Delete? ", "y\n".as_bytes(), &mut prompt).unwrap());
        assert_eq!(prompt, b"Delete? ");
        assert!(confirm("Delete? ", " YES \n".as_bytes(), std::io::sink()).unwrap());
        assert!(!confirm("Delete? ", "n\n".as_bytes(), std::io::sink()).unwrap());
        assert!(!confirm("Delete? ", "".as_bytes(), std::io::sink()).unwrap());
    }
}
