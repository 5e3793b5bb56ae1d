//! Transaction and wallet analysis for the Flare network family.
//!
//! The pipeline is linear: fetch ([`tx`]), classify receipt logs
//! ([`events`]), tag ecosystem contracts ([`ecosystem`]), score
//! ([`scoring`]). All aggregates are request-scoped and serialized
//! camelCase for the LLM tool contract.

pub mod ecosystem;
pub mod events;
pub mod scoring;
pub mod tx;
pub mod types;
pub mod wallet;

pub use scoring::{complexity_score, risk_level, Complexity, RiskLevel};
pub use tx::analyze_transaction;
pub use types::TransactionAnalysis;
pub use wallet::{analyze_wallet, WalletAnalysis};
