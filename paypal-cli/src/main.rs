//! `paypal`: authenticate against PayPal and run read-only calls.
//!
//! # Usage
//!
//! ```bash
//! # Credentials from the environment or a .env file
//! PAYPAL_CLIENT_ID=... PAYPAL_CLIENT_SECRET=... paypal token
//!
//! paypal invoices list --page-size 5
//! paypal orders get 5O190127TN364715T
//! paypal --environment live disputes list
//! ```
//!
//! # Environment Variables
//!
//! - `PAYPAL_CLIENT_ID`: REST app client id
//! - `PAYPAL_CLIENT_SECRET`: REST app secret
//! - `PAYPAL_ENVIRONMENT`: `sandbox` (default), `live` or a base URL
//! - `PAYPAL_TIMEOUT_SECS`: per-request timeout
//! - `RUST_LOG`: log filter (default: `info`)

use std::time::Duration;

use clap::{Parser, Subcommand};
use paypal::{Configuration, Environment, QueryParameters};
use paypal_http::{ClientConfig, PayPalClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "paypal", version, about = "Smoke-test the PayPal REST APIs")]
struct Cli {
    /// REST app client id.
    #[arg(long, env = "PAYPAL_CLIENT_ID")]
    client_id: String,
    /// REST app secret.
    #[arg(long, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,
    /// `sandbox`, `live` or a base URL.
    #[arg(long, env = "PAYPAL_ENVIRONMENT", default_value = "sandbox")]
    environment: Environment,
    /// Per-request timeout in seconds.
    #[arg(long, env = "PAYPAL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Authenticate and print the token's app id, scopes and expiry.
    Token,
    /// v1 Invoicing.
    Invoices {
        #[command(subcommand)]
        command: InvoicesCommand,
    },
    /// v2 Checkout orders.
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
    /// v1 Customer disputes.
    Disputes {
        #[command(subcommand)]
        command: DisputesCommand,
    },
    /// v1 Vault credit cards.
    Vault {
        #[command(subcommand)]
        command: VaultCommand,
    },
}

#[derive(Debug, Subcommand)]
enum InvoicesCommand {
    /// List invoices.
    List {
        /// Zero-based page.
        #[arg(long)]
        page: Option<u32>,
        /// Invoices per page.
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show one invoice.
    Get {
        /// Invoice id, `INV2-...`.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum OrdersCommand {
    /// Show one order.
    Get {
        /// Order id.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum DisputesCommand {
    /// List disputes.
    List {
        /// Disputes per page.
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show one dispute.
    Get {
        /// Dispute id, `PP-D-...`.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum VaultCommand {
    /// Show one stored card.
    Get {
        /// Card id, `CARD-...`.
        id: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("paypal command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::new();
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let configuration = Configuration::new(cli.client_id, cli.client_secret, cli.environment);
    let client = PayPalClient::with_config(configuration, config);

    let info = client.authenticate().await?;
    tracing::info!(
        environment = %client.configuration().environment(),
        app_id = info.app_id().unwrap_or_default(),
        "Authenticated"
    );

    match cli.command {
        Command::Token => emit(&serde_json::json!({
            "app_id": info.app_id(),
            "token_type": info.token_type(),
            "scopes": info.scopes(),
            "expires_at": info.expires_at().map(|at| at.to_rfc3339()),
        })),
        Command::Invoices { command } => match command {
            InvoicesCommand::List { page, page_size } => {
                let mut query = QueryParameters::new().with_total_count();
                if let Some(page) = page {
                    // v1 invoicing pages on `page`, not the token key.
                    query = query.with_custom("page", page.to_string());
                }
                if let Some(page_size) = page_size {
                    query = query.with_page_size(page_size);
                }
                emit(&client.invoices().list(&query).await?)
            }
            InvoicesCommand::Get { id } => emit(&client.invoices().get(&id).await?),
        },
        Command::Orders { command } => match command {
            OrdersCommand::Get { id } => emit(&client.orders().get(&id).await?),
        },
        Command::Disputes { command } => match command {
            DisputesCommand::List { page_size } => {
                let mut query = QueryParameters::new();
                if let Some(page_size) = page_size {
                    query = query.with_page_size(page_size);
                }
                emit(&client.disputes().list(&query).await?)
            }
            DisputesCommand::Get { id } => emit(&client.disputes().get(&id).await?),
        },
        Command::Vault { command } => match command {
            VaultCommand::Get { id } => emit(&client.vault().get(&id).await?),
        },
    }
}

#[allow(clippy::print_stdout)]
fn emit<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_nested_subcommands() {
        let cli = Cli::try_parse_from([
            "paypal",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--environment",
            "live",
            "invoices",
            "list",
            "--page-size",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.environment, Environment::Live);
        assert!(matches!(
            cli.command,
            Command::Invoices {
                command: InvoicesCommand::List { page: None, page_size: Some(5) }
            }
        ));
    }

    #[test]
    fn test_cli_accepts_custom_environment() {
        let cli = Cli::try_parse_from([
            "paypal",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--environment",
            "http://127.0.0.1:8080",
            "vault",
            "get",
            "CARD-1",
        ])
        .unwrap();
        assert_eq!(cli.environment.base_url().as_str(), "http://127.0.0.1:8080/");
    }
}
