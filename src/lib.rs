//! FlareScan Gateway Library
//!
//! AI-assisted blockchain explorer gateway for the Flare network family
//! (Flare, Songbird, Coston2, Coston).
//!
//! # Features
//!
//! - **Chain Registry**: static table of the four Flare-family chains with
//!   ordered RPC endpoint fallback
//! - **Transaction Analysis**: receipt log classification, ecosystem tagging,
//!   complexity and risk scoring
//! - **FTSO / FAssets / FDC**: price feed reads, asset bridging records and
//!   cross-chain attestation lookups
//! - **LLM Tool Bridge**: OpenAI-compatible chat loop exposing the analysis
//!   helpers as callable tools, streamed to clients over SSE

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod fassets;
pub mod fdc;
pub mod ftso;
pub mod llm;
pub mod server;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber.with(fmt::layer().json()).init();
        }
        _ => {
            subscriber.with(fmt::layer()).init();
        }
    }

    Ok(())
}
