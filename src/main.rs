//! Bostrom transaction CLI
//!
//! Command-line front end over the transaction core.

use bostrom_tx_core::amount::parse_amount;
use bostrom_tx_core::registry::proto::{Coin, MsgSend};
use bostrom_tx_core::{ChainMessage, ClientHandle, Config, Credentials, Error, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bostrom-tx")]
#[command(about = "Sign and broadcast Bostrom transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signer address
    Address,

    /// Show current configuration
    Config,

    /// Price a swap without submitting it
    Quote {
        /// Denom offered
        #[arg(long)]
        offer: String,

        /// Offered amount in base units
        #[arg(long)]
        amount: String,

        /// Denom wanted
        #[arg(long)]
        demand: String,

        /// Slippage tolerance in percent
        #[arg(long)]
        slippage: Option<Decimal>,

        /// Use this pool instead of the first one trading the pair
        #[arg(long)]
        pool_id: Option<u64>,
    },

    /// Quote and submit a swap order
    Swap {
        #[arg(long)]
        offer: String,

        #[arg(long)]
        amount: String,

        #[arg(long)]
        demand: String,

        #[arg(long)]
        slippage: Option<Decimal>,

        #[arg(long)]
        pool_id: Option<u64>,
    },

    /// Send tokens
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in base units
        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "boot")]
        denom: String,
    },

    /// Simulate a send and show the fee without broadcasting
    Fee {
        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "boot")]
        denom: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    if cli.json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let handle = ClientHandle::from_config(config, Credentials::from_env())?;

    match cli.command {
        Commands::Config => print_json(handle.config())?,
        Commands::Address => {
            println!("{}", handle.address().await?);
        }
        Commands::Quote {
            offer,
            amount,
            demand,
            slippage,
            pool_id,
        } => {
            let amount = parse_amount(&amount)?;
            let quote = match pool_id {
                Some(id) => {
                    handle
                        .quote_swap_in_pool(id, &offer, amount, &demand, slippage)
                        .await?
                }
                None => handle.quote_swap(&offer, amount, &demand, slippage).await?,
            };
            print_json(&quote)?;
        }
        Commands::Swap {
            offer,
            amount,
            demand,
            slippage,
            pool_id,
        } => {
            let amount = parse_amount(&amount)?;
            let result = match pool_id {
                Some(id) => {
                    handle
                        .swap_in_pool(id, &offer, amount, &demand, slippage)
                        .await?
                }
                None => handle.swap_tokens(&offer, amount, &demand, slippage).await?,
            };
            print_json(&result)?;
        }
        Commands::Send { to, amount, denom } => {
            let amount = parse_amount(&amount)?;
            let result = handle.send_tokens(&to, amount, &denom).await?;
            print_json(&result)?;
        }
        Commands::Fee { to, amount, denom } => {
            let amount = parse_amount(&amount)?;
            let from = handle.address().await?;
            let message = ChainMessage::Send(MsgSend {
                from_address: from,
                to_address: to,
                amount: vec![Coin::new(denom, amount)],
            });
            let fee = handle.estimate(&[message], "").await?;
            print_json(&fee)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(Error::from)?;
    println!("{}", text);
    Ok(())
}
