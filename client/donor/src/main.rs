//! Charity donor CLI — entry point.
//!
//! Wires the wallet signing seam, the Soroban RPC adapter, and the log API
//! client into the orchestrator, and renders its cached state. All the
//! donation sequencing lives in [`orchestrator`]; this file is glue.

mod chain;
mod config;
mod errors;
mod logs;
mod orchestrator;
mod rpc;
mod units;
mod wallet;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chain::{ChainClient, DepositSigner};
use config::Config;
use logs::LogApiClient;
use orchestrator::Orchestrator;
use rpc::SorobanRpcClient;
use wallet::{UnconfiguredSigner, WalletCommandSigner};

#[derive(Parser)]
#[command(name = "donor")]
#[command(about = "Charity fund donor client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show contract stats and connection status
    Stats,
    /// Donate an amount in display units (e.g. 0.05)
    Donate { amount: String },
    /// Show the recorded donation and transfer history
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let signer: Arc<dyn DepositSigner> = match &config.wallet_sign_cmd {
        Some(cmd) => Arc::new(WalletCommandSigner::new(cmd.clone())),
        None => Arc::new(UnconfiguredSigner),
    };

    let chain = SorobanRpcClient::new(
        http.clone(),
        config.rpc_url.clone(),
        config.contract_id.clone(),
        signer,
        Duration::from_secs(config.confirm_interval_secs),
        Duration::from_secs(config.confirm_timeout_secs),
    );
    let logs = LogApiClient::new(http, config.log_api_url.clone());

    let donor = config.donor_address.clone().unwrap_or_default();
    let mut orch = Orchestrator::new(chain, logs, donor);

    match cli.command {
        Commands::Stats => {
            let network = orch.chain().network().await?;
            orch.refresh().await;
            let view = orch
                .cache
                .contract
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("could not read contract state"))?;

            println!(
                "Network:      {} (ledger {})",
                network.passphrase, network.latest_ledger
            );
            println!("Contract:     {}", config.contract_id);
            println!("Owner:        {}", view.owner);
            println!("Threshold:    {}", units::format_amount(view.threshold));
            println!("Accumulated:  {}", units::format_amount(view.total_amount));
            println!("Held balance: {}", units::format_amount(view.balance));
        }

        Commands::Donate { amount } => {
            if config.donor_address.is_none() {
                anyhow::bail!("DONOR_ADDRESS is required for donate");
            }

            let outcome = orch.donate(&amount).await?;

            println!(
                "Donation confirmed: {} ({})",
                units::format_amount(outcome.amount),
                outcome.tx_hash
            );
            if let Some(t) = &outcome.transfer {
                println!(
                    "Threshold reached: {} transferred to {}",
                    units::format_amount(t.amount),
                    t.recipient
                );
            }
            // Replication problems are reported, but the donation stands.
            for w in &outcome.warnings {
                eprintln!("warning: {:?} record not replicated: {}", w.stage, w.detail);
            }
        }

        Commands::History => {
            orch.refresh().await;
            let history = &orch.cache.history;

            println!("Donations ({}):", history.donations.len());
            for d in &history.donations {
                println!(
                    "  {}  {}  {} from {}",
                    format_ts(d.timestamp),
                    d.tx_hash,
                    d.amount,
                    d.donor
                );
            }
            println!("Transfers ({}):", history.transfers.len());
            for t in &history.transfers {
                println!(
                    "  {}  {}  {} to {}",
                    format_ts(t.timestamp),
                    t.tx_hash,
                    t.total_transferred,
                    t.recipient
                );
            }
        }
    }

    Ok(())
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
