//! Error types for the FlareScan gateway

use std::io;

use thiserror::Error;

/// Result type alias for the FlareScan gateway
pub type Result<T> = std::result::Result<T, Error>;

/// FlareScan gateway errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chain id not present in the registry
    #[error("Flare chain {0} not found")]
    ChainNotFound(u64),

    /// Chain has no RPC endpoints configured
    #[error("No RPC endpoints found for chain {0}")]
    NoRpcEndpoints(u64),

    /// Every RPC endpoint for a chain failed the connection probe
    #[error("All RPCs failed for chain {chain_id}. Errors: {}", attempts.join(", "))]
    AllRpcFailed {
        /// Chain that was probed
        chain_id: u64,
        /// One failure message per endpoint, in probe order
        attempts: Vec<String>,
    },

    /// Transaction hash unknown to the node
    #[error("Transaction not found: {0}")]
    TxNotFound(String),

    /// Address failed to parse
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    /// A contract view call failed
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// FDC verifier endpoint error
    #[error("Verifier error: {0}")]
    Verifier(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Tool invoked with bad parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// JSON-RPC transport error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<alloy::transports::TransportError> for Error {
    fn from(e: alloy::transports::TransportError) -> Self {
        Self::Rpc(e.to_string())
    }
}

impl Error {
    /// True when the error reflects caller input rather than gateway state.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ChainNotFound(_)
                | Self::TxNotFound(_)
                | Self::InvalidAddress(_)
                | Self::InvalidParams(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rpc_failed_lists_every_attempt() {
        let err = Error::AllRpcFailed {
            chain_id: 14,
            attempts: vec!["rpc-a: refused".to_string(), "rpc-b: timeout".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("chain 14"));
        assert!(msg.contains("rpc-a: refused"));
        assert!(msg.contains("rpc-b: timeout"));
    }

    #[test]
    fn user_errors_classified() {
        assert!(Error::ChainNotFound(7).is_user_error());
        assert!(Error::TxNotFound("0xabc".to_string()).is_user_error());
        assert!(!Error::Internal("boom".to_string()).is_user_error());
    }
}
