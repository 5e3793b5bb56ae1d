//! Wallet analysis
//!
//! Balance, nonce and code are fetched concurrently; everything derived
//! from them is a pure function so the categorization rules stay testable
//! without a node.

use std::str::FromStr;

use alloy::primitives::utils::format_ether;
use alloy::primitives::Address;
use alloy::providers::Provider;
use serde::Serialize;
use tracing::info;

use crate::chain::ChainRegistry;
use crate::{Error, Result};

/// Ecosystem participation hints for a wallet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemParticipation {
    /// FTSO data-provider hint
    pub ftso_participation: String,
    /// Staking hint derived from the nonce
    pub staking_activity: String,
    /// FAssets usage hint
    pub fassets_usage: String,
}

/// Derived wallet categorization
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletProfile {
    /// None, Low, Medium or High
    pub activity_level: String,
    /// Dust, Low, Medium, High or Whale
    pub balance_category: String,
    /// Standard, High Value Target or Smart Contract Risk
    pub risk_profile: String,
}

/// Full wallet analysis record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAnalysis {
    /// The analyzed address
    pub address: String,
    /// Chain name
    pub chain: String,
    /// Chain id
    pub chain_id: u64,
    /// Balance in native units
    pub balance: String,
    /// Native currency symbol
    pub currency: String,
    /// Sender nonce
    pub transaction_count: u64,
    /// Whether the address holds code
    pub is_contract: bool,
    /// "Smart Contract" or "EOA (Externally Owned Account)"
    pub contract_type: String,
    /// Participation hints
    pub ecosystem: EcosystemParticipation,
    /// Derived categorization
    pub analysis: WalletProfile,
    /// Static guidance strings
    pub recommendations: Vec<String>,
}

/// Analyze a wallet address on a Flare-family chain.
pub async fn analyze_wallet(
    registry: &ChainRegistry,
    address: &str,
    chain_id: u64,
) -> Result<WalletAnalysis> {
    info!(address, chain_id, "analyzing wallet");

    let chain = registry.get(chain_id).ok_or(Error::ChainNotFound(chain_id))?;
    let parsed = Address::from_str(address)
        .map_err(|_| Error::InvalidAddress(address.to_string()))?;
    let provider = registry.provider(chain_id).await?;

    let (balance, nonce, code) = tokio::join!(
        provider.get_balance(parsed),
        provider.get_transaction_count(parsed),
        provider.get_code_at(parsed),
    );
    let balance = balance?;
    let nonce = nonce?;
    let code = code?;

    let is_contract = !code.is_empty();
    let balance_str = format_ether(balance);
    let balance_ether: f64 = balance_str.parse().unwrap_or(0.0);

    Ok(WalletAnalysis {
        address: parsed.to_string(),
        chain: chain.name.to_string(),
        chain_id: chain.chain_id,
        balance: balance_str,
        currency: chain.native_currency.symbol.to_string(),
        transaction_count: nonce,
        is_contract,
        contract_type: if is_contract {
            "Smart Contract".to_string()
        } else {
            "EOA (Externally Owned Account)".to_string()
        },
        ecosystem: EcosystemParticipation {
            ftso_participation: if is_contract {
                "Potential Data Provider".to_string()
            } else {
                "Unknown".to_string()
            },
            staking_activity: if nonce > 0 {
                "Likely Active".to_string()
            } else {
                "No Activity".to_string()
            },
            fassets_usage: "Unknown - requires deeper analysis".to_string(),
        },
        analysis: WalletProfile {
            activity_level: activity_level(nonce).to_string(),
            balance_category: balance_category(balance_ether).to_string(),
            risk_profile: risk_profile(is_contract, balance_ether).to_string(),
        },
        recommendations: recommendations(is_contract, balance_ether),
    })
}

fn activity_level(nonce: u64) -> &'static str {
    match nonce {
        0 => "None",
        1..=10 => "Low",
        11..=100 => "Medium",
        _ => "High",
    }
}

fn balance_category(balance_ether: f64) -> &'static str {
    if balance_ether > 10_000.0 {
        "Whale"
    } else if balance_ether > 1_000.0 {
        "High"
    } else if balance_ether > 100.0 {
        "Medium"
    } else if balance_ether > 1.0 {
        "Low"
    } else {
        "Dust"
    }
}

fn risk_profile(is_contract: bool, balance_ether: f64) -> &'static str {
    if is_contract {
        "Smart Contract Risk"
    } else if balance_ether > 10_000.0 {
        "High Value Target"
    } else {
        "Standard"
    }
}

fn recommendations(is_contract: bool, balance_ether: f64) -> Vec<String> {
    vec![
        if is_contract {
            "Verify contract code and audit reports".to_string()
        } else {
            "Consider staking for rewards".to_string()
        },
        if balance_ether > 100.0 {
            "Consider diversifying across multiple addresses".to_string()
        } else {
            "Accumulate more for staking opportunities".to_string()
        },
        "Participate in FTSO delegation for passive income".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn activity_levels_follow_nonce_breakpoints() {
        assert_eq!(activity_level(0), "None");
        assert_eq!(activity_level(1), "Low");
        assert_eq!(activity_level(10), "Low");
        assert_eq!(activity_level(11), "Medium");
        assert_eq!(activity_level(100), "Medium");
        assert_eq!(activity_level(101), "High");
    }

    #[test]
    fn balance_categories_follow_breakpoints() {
        assert_eq!(balance_category(0.0), "Dust");
        assert_eq!(balance_category(1.0), "Dust");
        assert_eq!(balance_category(1.5), "Low");
        assert_eq!(balance_category(100.5), "Medium");
        assert_eq!(balance_category(1_000.5), "High");
        assert_eq!(balance_category(10_000.5), "Whale");
    }

    #[test]
    fn contracts_carry_contract_risk_regardless_of_balance() {
        assert_eq!(risk_profile(true, 50_000.0), "Smart Contract Risk");
        assert_eq!(risk_profile(false, 50_000.0), "High Value Target");
        assert_eq!(risk_profile(false, 10.0), "Standard");
    }

    #[test]
    fn recommendations_always_include_delegation() {
        for (is_contract, balance) in [(true, 0.0), (false, 0.0), (false, 500.0)] {
            let recs = recommendations(is_contract, balance);
            assert_eq!(recs.len(), 3);
            assert_eq!(recs[2], "Participate in FTSO delegation for passive income");
        }
    }
}
