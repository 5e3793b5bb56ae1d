//! Flare chain registry and RPC provider fallback
//!
//! The registry is a static, immutable table of the four Flare-family
//! networks. It is constructed once at startup and shared via `Arc`;
//! callers never reach for a process-wide singleton.

use std::time::Duration;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::RpcConfig;
use crate::{Error, Result};

/// Native currency descriptor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    /// Currency name
    pub name: &'static str,
    /// Ticker symbol
    pub symbol: &'static str,
    /// Decimal places
    pub decimals: u8,
}

/// Static descriptor of a Flare-family chain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Chain name
    pub name: &'static str,
    /// EVM chain id
    pub chain_id: u64,
    /// Short ticker-style name
    pub short_name: &'static str,
    /// Native currency descriptor
    pub native_currency: NativeCurrency,
    /// RPC endpoints, tried in order
    pub rpc: &'static [&'static str],
    /// Block explorer base URL
    pub block_explorer: &'static str,
    /// Whether this is a testnet
    pub testnet: bool,
    /// Human-readable description
    pub description: &'static str,
    /// Supported ecosystem features
    pub features: &'static [&'static str],
}

/// FTSO price pairs available on mainnets; testnets expose the first 8.
pub const MAINNET_FEEDS: [&str; 18] = [
    "FLR/USD", "SGB/USD", "BTC/USD", "ETH/USD", "XRP/USD", "LTC/USD", "ADA/USD", "ALGO/USD",
    "DOGE/USD", "FIL/USD", "ARB/USD", "AVAX/USD", "BNB/USD", "MATIC/USD", "SOL/USD", "USDC/USD",
    "USDT/USD", "XLM/USD",
];

const CHAINS: [Chain; 4] = [
    Chain {
        name: "Flare Mainnet",
        chain_id: 14,
        short_name: "flare",
        native_currency: NativeCurrency {
            name: "Flare",
            symbol: "FLR",
            decimals: 18,
        },
        rpc: &[
            "https://flare-api.flare.network/ext/C/rpc",
            "https://rpc.ankr.com/flare",
            "https://flare.public-rpc.com",
        ],
        block_explorer: "https://flare-explorer.flare.network",
        testnet: false,
        description: "Flare is the blockchain for data - a full-stack layer 1 solution designed for data intensive use cases.",
        features: &[
            "FTSO",
            "FAssets",
            "FDC",
            "Data Oracles",
            "Cross-chain Interoperability",
        ],
    },
    Chain {
        name: "Songbird",
        chain_id: 19,
        short_name: "sgb",
        native_currency: NativeCurrency {
            name: "Songbird",
            symbol: "SGB",
            decimals: 18,
        },
        rpc: &[
            "https://songbird-api.flare.network/ext/C/rpc",
            "https://songbird.public-rpc.com",
        ],
        block_explorer: "https://songbird-explorer.flare.network",
        testnet: false,
        description: "Songbird is the canary network for Flare, used for testing and experimentation.",
        features: &["FTSO Testing", "Experimental Features", "Community Governance"],
    },
    Chain {
        name: "Flare Testnet Coston2",
        chain_id: 114,
        short_name: "c2flr",
        native_currency: NativeCurrency {
            name: "Coston2 Flare",
            symbol: "C2FLR",
            decimals: 18,
        },
        rpc: &[
            "https://coston2-api.flare.network/ext/C/rpc",
            "https://coston2.enosys.global/ext/C/rpc",
        ],
        block_explorer: "https://coston2-explorer.flare.network",
        testnet: true,
        description: "Coston2 is the official testnet for Flare Mainnet development and testing.",
        features: &["FTSO Testing", "Free Test Tokens", "Development Environment"],
    },
    Chain {
        name: "Songbird Testnet Coston",
        chain_id: 16,
        short_name: "cflr",
        native_currency: NativeCurrency {
            name: "Coston Flare",
            symbol: "CFLR",
            decimals: 18,
        },
        rpc: &["https://coston-api.flare.network/ext/C/rpc"],
        block_explorer: "https://coston-explorer.flare.network",
        testnet: true,
        description: "Coston is the testnet for Songbird canary network.",
        features: &["Canary Testing", "Free Test Tokens"],
    },
];

/// Registry of supported Flare-family chains
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    probe_timeout: Duration,
}

impl ChainRegistry {
    /// Create a registry with the built-in chain table
    #[must_use]
    pub fn new(rpc: &RpcConfig) -> Self {
        Self {
            probe_timeout: rpc.probe_timeout,
        }
    }

    /// Look up a chain by id
    #[must_use]
    pub fn get(&self, chain_id: u64) -> Option<&'static Chain> {
        CHAINS.iter().find(|chain| chain.chain_id == chain_id)
    }

    /// All supported chains
    #[must_use]
    pub fn all(&self) -> &'static [Chain] {
        &CHAINS
    }

    /// Production chains only
    pub fn mainnets(&self) -> impl Iterator<Item = &'static Chain> {
        CHAINS.iter().filter(|chain| !chain.testnet)
    }

    /// Test chains only
    pub fn testnets(&self) -> impl Iterator<Item = &'static Chain> {
        CHAINS.iter().filter(|chain| chain.testnet)
    }

    /// FTSO data feeds available on a chain.
    ///
    /// Mainnet and Songbird carry the full feed set; testnets a limited one.
    #[must_use]
    pub fn ftso_feeds(&self, chain_id: u64) -> &'static [&'static str] {
        if chain_id == 14 || chain_id == 19 {
            &MAINNET_FEEDS
        } else {
            &MAINNET_FEEDS[..8]
        }
    }

    /// Check if a chain supports a specific Flare feature
    #[must_use]
    pub fn supports_feature(&self, chain_id: u64, feature: &str) -> bool {
        self.get(chain_id)
            .is_some_and(|chain| chain.features.contains(&feature))
    }

    /// Connect an RPC provider for a chain.
    ///
    /// Endpoints are tried in list order; each is probed with
    /// `eth_blockNumber` and the first responsive one wins. There is no
    /// retry or backoff; if every endpoint fails, the aggregated error names
    /// each failure.
    pub async fn provider(&self, chain_id: u64) -> Result<DynProvider> {
        let chain = self.get(chain_id).ok_or(Error::ChainNotFound(chain_id))?;
        if chain.rpc.is_empty() {
            return Err(Error::NoRpcEndpoints(chain_id));
        }

        let mut attempts = Vec::new();
        for rpc in chain.rpc {
            debug!(chain_id, rpc, "Trying RPC endpoint");
            let url: Url = match rpc.parse() {
                Ok(u) => u,
                Err(e) => {
                    attempts.push(format!("{rpc}: invalid URL: {e}"));
                    continue;
                }
            };

            let provider = ProviderBuilder::new().connect_http(url);
            match tokio::time::timeout(self.probe_timeout, provider.get_block_number()).await {
                Ok(Ok(block)) => {
                    debug!(chain_id, rpc, block, "Connected to RPC endpoint");
                    return Ok(provider.erased());
                }
                Ok(Err(e)) => {
                    warn!(chain_id, rpc, error = %e, "RPC endpoint failed");
                    attempts.push(format!("{rpc}: {e}"));
                }
                Err(_) => {
                    warn!(chain_id, rpc, "RPC endpoint timed out");
                    attempts.push(format!("{rpc}: probe timed out"));
                }
            }
        }

        Err(Error::AllRpcFailed { chain_id, attempts })
    }
}
