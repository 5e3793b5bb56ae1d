//! Request-scoped transaction analysis aggregate
//!
//! These types are built per incoming request, serialized camelCase to match
//! the tool-output contract consumed by the LLM, and discarded afterwards.

use serde::Serialize;
use serde_json::Value;

use crate::analysis::scoring::{Complexity, RiskLevel};

/// Network context for an analyzed transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Chain name
    pub name: String,
    /// EVM chain id
    pub chain_id: u64,
    /// Native currency symbol
    pub currency: String,
    /// Block the transaction was mined in
    pub block_number: Option<u64>,
    /// ISO-8601 block timestamp, or "unknown"
    pub block_timestamp: String,
    /// Chain feature tags
    pub features: Vec<String>,
    /// Chain description
    pub description: String,
    /// Whether this is a testnet
    pub testnet: bool,
}

/// Core transaction fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    /// Transaction hash
    pub hash: String,
    /// Sender address
    pub from: String,
    /// Recipient address, `None` for contract creation
    pub to: Option<String>,
    /// Value in native units
    pub value: String,
    /// Sender nonce
    pub nonce: u64,
    /// "Success" or "Failed"
    pub status: String,
    /// Gas used by the receipt
    pub gas_used: Option<String>,
    /// Gas price in gwei, or "unknown"
    pub gas_price: String,
    /// EIP-1559 max fee in gwei
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    /// EIP-1559 priority fee in gwei
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    /// Total gas cost in native units, or "unknown"
    pub total_cost: String,
    /// First four calldata bytes, set for contract interactions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_selector: Option<String>,
}

/// Token metadata attached to a transfer record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Token contract address, `None` for the native asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Token symbol
    pub symbol: String,
    /// Token decimals
    pub decimals: u8,
    /// Token name
    pub name: String,
}

/// A detected value transfer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// "Native", "ERC-20", "ERC-721" or "ERC-1155"
    pub token_type: String,
    /// Token metadata
    pub token: TokenInfo,
    /// Sender
    pub from: String,
    /// Recipient, or "Contract Creation"
    pub to: String,
    /// Decimal-formatted amount (token id for ERC-721)
    pub value: String,
}

/// A security observation about an interacted contract
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityNote {
    /// "Info" or "Warning"
    pub note_type: String,
    /// Human-readable message
    pub message: String,
    /// Contract the note refers to
    pub contract_address: String,
}

impl SecurityNote {
    /// True if this note is a warning
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.note_type == "Warning"
    }
}

/// Flare-ecosystem flags derived by the tagger
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlareSpecific {
    /// FTSO oracle interaction detected
    pub is_ftso_related: bool,
    /// FAssets bridge interaction detected
    pub is_fassets_related: bool,
    /// FDC data connector interaction detected
    pub is_fdc_related: bool,
    /// Staking/delegation interaction detected
    pub is_staking_related: bool,
    /// Named data feeds touched by the transaction
    pub data_feeds_interacted: Vec<String>,
}

impl FlareSpecific {
    /// Number of distinct ecosystem categories flagged
    #[must_use]
    pub fn flag_count(&self) -> usize {
        [
            self.is_ftso_related,
            self.is_fassets_related,
            self.is_fdc_related,
            self.is_staking_related,
        ]
        .iter()
        .filter(|&&f| f)
        .count()
    }

    /// True if any ecosystem category is flagged
    #[must_use]
    pub fn any(&self) -> bool {
        self.flag_count() > 0
    }
}

/// Roll-up scores for the analysis
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Total transfer count (native + token)
    pub total_transfers: usize,
    /// Distinct token contracts (native counted once)
    pub unique_tokens: usize,
    /// Distinct interacted contracts
    pub unique_contracts: usize,
    /// Complexity bucket
    pub complexity_score: Complexity,
    /// Risk bucket
    pub risk_level: RiskLevel,
    /// Whether any Flare ecosystem component was touched
    pub flare_ecosystem_interaction: bool,
}

/// Full per-request analysis aggregate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalysis {
    /// Network context
    pub network: NetworkInfo,
    /// Transaction fields
    pub transaction: TransactionInfo,
    /// Coarse action labels, in detection order
    pub action_types: Vec<String>,
    /// Detected transfers
    pub transfers: Vec<Transfer>,
    /// Non-transfer actions (approvals, deposits, mints, ...)
    pub actions: Vec<Value>,
    /// Addresses of contracts whose logs were not classified
    pub interactions: Vec<String>,
    /// Security observations
    pub security_info: Vec<SecurityNote>,
    /// Unclassified log records
    pub other_events: Vec<Value>,
    /// Ecosystem flags
    pub flare_specific: FlareSpecific,
    /// Roll-up summary
    pub summary: AnalysisSummary,
}

impl TransactionAnalysis {
    /// Start an analysis with empty lists and a zeroed summary.
    #[must_use]
    pub fn new(network: NetworkInfo, transaction: TransactionInfo) -> Self {
        Self {
            network,
            transaction,
            action_types: vec![],
            transfers: vec![],
            actions: vec![],
            interactions: vec![],
            security_info: vec![],
            other_events: vec![],
            flare_specific: FlareSpecific::default(),
            summary: AnalysisSummary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flare_specific_flag_count() {
        let mut flags = FlareSpecific::default();
        assert_eq!(flags.flag_count(), 0);
        assert!(!flags.any());

        flags.is_ftso_related = true;
        flags.is_fdc_related = true;
        assert_eq!(flags.flag_count(), 2);
        assert!(flags.any());
    }

    #[test]
    fn serializes_camel_case() {
        let note = SecurityNote {
            note_type: "Info".to_string(),
            message: "ok".to_string(),
            contract_address: "0xabc".to_string(),
        };
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("noteType").is_some());
        assert!(json.get("contractAddress").is_some());
    }
}
