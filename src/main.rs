//! FlareScan Gateway - AI-assisted explorer for the Flare network family
//!
//! Hosts an OpenAI-compatible chat loop whose tools analyze Flare
//! transactions, wallets and ecosystem state, streamed to clients as SSE.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use flarescan_gateway::{
    analysis::{analyze_transaction, analyze_wallet},
    chain::ChainRegistry,
    cli::{Cli, Command},
    config::Config,
    server::Gateway,
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Chains { json }) => run_chains(&config, json),
        Some(Command::Analyze { tx_hash, chain_id }) => {
            run_analyze(&config, &tx_hash, chain_id).await
        }
        Some(Command::Wallet { address, chain_id }) => {
            run_wallet(&config, &address, chain_id).await
        }
        Some(Command::Serve) | None => run_server(config).await,
    }
}

fn run_chains(config: &Config, json: bool) -> ExitCode {
    let registry = ChainRegistry::new(&config.rpc);

    if json {
        match serde_json::to_string_pretty(registry.all()) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to serialize chains: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    for chain in registry.all() {
        let kind = if chain.testnet { "testnet" } else { "mainnet" };
        println!(
            "{:>5}  {}  ({}, {})",
            chain.chain_id, chain.name, chain.native_currency.symbol, kind
        );
        println!("       features: {}", chain.features.join(", "));
    }
    ExitCode::SUCCESS
}

async fn run_analyze(config: &Config, tx_hash: &str, chain_id: u64) -> ExitCode {
    let registry = Arc::new(ChainRegistry::new(&config.rpc));
    match analyze_transaction(&registry, tx_hash, chain_id).await {
        Ok(analysis) => print_json(&analysis),
        Err(e) => {
            error!(tx_hash, chain_id, error = %e, "Transaction analysis failed");
            ExitCode::FAILURE
        }
    }
}

async fn run_wallet(config: &Config, address: &str, chain_id: u64) -> ExitCode {
    let registry = Arc::new(ChainRegistry::new(&config.rpc));
    match analyze_wallet(&registry, address, chain_id).await {
        Ok(analysis) => print_json(&analysis),
        Err(e) => {
            error!(address, chain_id, error = %e, "Wallet analysis failed");
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(config: Config) -> ExitCode {
    let gateway = match Gateway::new(config) {
        Ok(gateway) => gateway,
        Err(e) => {
            error!(error = %e, "Failed to create gateway");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = gateway.run().await {
        error!(error = %e, "Gateway failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
