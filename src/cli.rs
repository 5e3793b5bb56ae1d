//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FlareScan Gateway - AI-assisted explorer for the Flare network family
#[derive(Parser, Debug)]
#[command(name = "flarescan-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "FLARESCAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "FLARESCAN_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "FLARESCAN_HOST")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "FLARESCAN_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "FLARESCAN_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway server (default)
    Serve,

    /// List the supported Flare-family chains
    Chains {
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Analyze a transaction from the command line
    Analyze {
        /// Transaction hash
        #[arg(required = true)]
        tx_hash: String,

        /// Chain ID (14=Flare, 19=Songbird, 114=Coston2, 16=Coston)
        #[arg(short = 'C', long, default_value_t = 14)]
        chain_id: u64,
    },

    /// Analyze a wallet address from the command line
    Wallet {
        /// Wallet address
        #[arg(required = true)]
        address: String,

        /// Chain ID (14=Flare, 19=Songbird, 114=Coston2, 16=Coston)
        #[arg(short = 'C', long, default_value_t = 14)]
        chain_id: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults_to_flare_mainnet() {
        let cli = Cli::parse_from(["flarescan-gateway", "analyze", "0xabc"]);
        match cli.command {
            Some(Command::Analyze { tx_hash, chain_id }) => {
                assert_eq!(tx_hash, "0xabc");
                assert_eq!(chain_id, 14);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::parse_from(["flarescan-gateway"]);
        assert!(cli.command.is_none());
    }
}
