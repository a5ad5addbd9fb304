//! cNFT scenario driver
//!
//! Runs one create-tree / create-collection / mint-to-collection scenario
//! against a Solana cluster and prints the resulting signatures.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cnft_driver::config::ENV_RPC_URL;
use cnft_driver::program::TokenProgram;
use cnft_driver::rpc::SolanaRpc;
use cnft_driver::{Config, ContinuationPolicy, ScenarioDriver, ScenarioReport, StepOutcome};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Ledger RPC endpoint (overrides the config file)
    #[arg(long, env = ENV_RPC_URL)]
    rpc_url: Option<String>,

    /// Attach a priority fee to every transaction
    #[arg(long)]
    priority_fee: bool,

    /// Use the Token-2022 program for the collection mint
    #[arg(long)]
    token_2022: bool,

    /// Skip the compressed mint when the collection step fails
    #[arg(long)]
    stop_on_failure: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    info!("Starting cNFT scenario driver v{}", env!("CARGO_PKG_VERSION"));

    info!("Loading configuration from: {}", args.config);
    let mut config = load_config(&args.config)?;
    apply_args(&mut config, &args);

    let rpc = SolanaRpc::new(
        &config.rpc.url,
        Duration::from_secs(config.rpc.timeout_secs),
        config.commitment()?,
        config.blockhash_commitment()?,
    );
    info!(endpoint = %config.rpc.url, "Ledger RPC client ready");

    let mut driver =
        ScenarioDriver::new(config, Arc::new(rpc)).context("Invalid configuration")?;
    info!(run_id = %driver.logger().run_id(), "Running scenario");

    let report = driver
        .run_from_config()
        .await
        .context("Scenario aborted")?;

    print_summary(&report);

    if !report.is_complete() {
        warn!("Scenario finished with failed or skipped steps");
    }
    Ok(())
}

/// Initialize logging
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "cnft_driver=debug,compute=debug,tx_id=debug,log=debug,info"
    } else {
        "cnft_driver=info,compute=info,tx_id=info,log=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file or use defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        dotenvy::dotenv().ok();
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(url) = &args.rpc_url {
        config.rpc.url = url.clone();
    }
    if args.priority_fee {
        config.priority_fee.enabled = true;
    }
    if args.token_2022 {
        config.token_program = TokenProgram::Token2022;
    }
    if args.stop_on_failure {
        config.continuation = ContinuationPolicy::StopOnFailure;
    }
}

fn print_summary(report: &ScenarioReport) {
    println!("run id:            {}", report.run_id);
    println!("merkle tree:       {}", report.merkle_tree);
    println!("tree authority:    {}", report.tree_authority);
    println!("tree size (bytes): {}", report.tree_size);
    println!("collection mint:   {}", report.collection.mint);
    println!("create_tree:       {}", report.create_tree);
    println!("create_collection: {}", describe(&report.create_collection));
    println!("mint_to_collection: {}", describe(&report.mint_to_collection));

    if let Some(err) = report.create_collection.error() {
        error!(category = err.category(), "create_collection_nft failed: {}", err);
    }
    if let Some(err) = report.mint_to_collection.error() {
        error!(category = err.category(), "mint_comp_nft_to_collection failed: {}", err);
    }
}

fn describe(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Succeeded(sig) => sig.to_string(),
        StepOutcome::Failed(err) => format!("failed ({})", err.category()),
        StepOutcome::Skipped => "skipped".to_string(),
    }
}
