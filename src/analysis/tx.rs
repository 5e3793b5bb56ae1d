//! Transaction fetch and analysis
//!
//! Fetches a transaction, its receipt and its block, runs the log
//! classifier and the ecosystem tagger, and assembles the full
//! [`TransactionAnalysis`] aggregate.

use std::collections::HashSet;
use std::str::FromStr;

use alloy::consensus::Transaction as _;
use alloy::hex;
use alloy::network::TransactionResponse as _;
use alloy::primitives::utils::{format_ether, format_units};
use alloy::primitives::{B256, U256};
use alloy::providers::Provider;
use chrono::DateTime;
use tracing::info;

use crate::analysis::ecosystem::tag_interactions;
use crate::analysis::events::classify_logs;
use crate::analysis::scoring::{complexity_score, risk_level};
use crate::analysis::types::{
    AnalysisSummary, NetworkInfo, TokenInfo, TransactionAnalysis, TransactionInfo, Transfer,
};
use crate::chain::ChainRegistry;
use crate::{Error, Result};

/// Analyze a transaction on a Flare-family chain.
pub async fn analyze_transaction(
    registry: &ChainRegistry,
    tx_hash: &str,
    chain_id: u64,
) -> Result<TransactionAnalysis> {
    info!(tx_hash, chain_id, "analyzing transaction");

    let chain = registry.get(chain_id).ok_or(Error::ChainNotFound(chain_id))?;
    let provider = registry.provider(chain_id).await?;

    let hash = B256::from_str(tx_hash)
        .map_err(|_| Error::InvalidParams(format!("invalid transaction hash: {tx_hash}")))?;

    let tx = provider
        .get_transaction_by_hash(hash)
        .await?
        .ok_or_else(|| Error::TxNotFound(tx_hash.to_string()))?;

    let block_number = tx.block_number;
    let (receipt, block) = tokio::join!(provider.get_transaction_receipt(hash), async {
        match block_number {
            Some(n) => provider.get_block_by_number(n.into()).await,
            None => Ok(None),
        }
    });
    let receipt = receipt?;
    let block = block?;

    let block_timestamp = block
        .as_ref()
        .and_then(|b| DateTime::from_timestamp(i64::try_from(b.header.timestamp).ok()?, 0))
        .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());

    // Both the consensus and rpc transaction traits expose fee accessors;
    // qualify to the consensus ones.
    let gas_price = alloy::consensus::Transaction::gas_price(&tx);
    let total_cost = match (&receipt, gas_price) {
        (Some(r), Some(gp)) => format_ether(U256::from(r.gas_used) * U256::from(gp)),
        _ => "unknown".to_string(),
    };

    let (max_fee, priority_fee) = dynamic_fee_fields(
        tx.max_priority_fee_per_gas(),
        alloy::consensus::Transaction::max_fee_per_gas(&tx),
    );

    let network = NetworkInfo {
        name: chain.name.to_string(),
        chain_id: chain.chain_id,
        currency: chain.native_currency.symbol.to_string(),
        block_number,
        block_timestamp,
        features: chain.features.iter().map(ToString::to_string).collect(),
        description: chain.description.to_string(),
        testnet: chain.testnet,
    };
    let transaction = TransactionInfo {
        hash: tx.tx_hash().to_string(),
        from: tx.from().to_string(),
        to: tx.to().map(|a| a.to_string()),
        value: format_ether(tx.value()),
        nonce: tx.nonce(),
        status: receipt
            .as_ref()
            .map_or("Failed", |r| if r.status() { "Success" } else { "Failed" })
            .to_string(),
        gas_used: receipt.as_ref().map(|r| r.gas_used.to_string()),
        gas_price: gas_price.map_or_else(|| "unknown".to_string(), gwei),
        max_fee_per_gas: max_fee,
        max_priority_fee_per_gas: priority_fee,
        total_cost,
        function_selector: None,
    };
    let mut analysis = TransactionAnalysis::new(network, transaction);

    if tx.value() > U256::ZERO {
        analysis.action_types.push("Native Transfer".to_string());
        analysis.transfers.push(Transfer {
            token_type: "Native".to_string(),
            token: TokenInfo {
                address: None,
                symbol: chain.native_currency.symbol.to_string(),
                decimals: chain.native_currency.decimals,
                name: chain.native_currency.name.to_string(),
            },
            from: tx.from().to_string(),
            to: tx
                .to()
                .map_or_else(|| "Contract Creation".to_string(), |a| a.to_string()),
            value: format_ether(tx.value()),
        });
    }

    if let Some(receipt) = &receipt {
        let extracted = classify_logs(receipt.logs(), &provider).await;
        analysis.action_types.extend(extracted.action_types);
        analysis.transfers.extend(extracted.transfers);
        analysis.actions.extend(extracted.actions);
        analysis.interactions.extend(extracted.interactions);
        analysis.other_events.extend(extracted.other_events);
    }

    tag_interactions(&mut analysis, &provider).await;

    let input = tx.input();
    if tx.to().is_none() {
        analysis.action_types.push("Contract Deployment".to_string());
    } else if !input.is_empty() {
        analysis.action_types.push("Contract Interaction".to_string());
        if input.len() >= 4 {
            analysis.transaction.function_selector =
                Some(format!("0x{}", hex::encode(&input[..4])));
        }
    }

    finalize_summary(&mut analysis);
    Ok(analysis)
}

/// Recompute the roll-up summary from the collected lists and flags.
pub fn finalize_summary(analysis: &mut TransactionAnalysis) {
    let unique_tokens: HashSet<&str> = analysis
        .transfers
        .iter()
        .map(|t| t.token.address.as_deref().unwrap_or("native"))
        .collect();

    analysis.summary = AnalysisSummary {
        total_transfers: analysis.transfers.len(),
        unique_tokens: unique_tokens.len(),
        unique_contracts: analysis.interactions.len(),
        complexity_score: complexity_score(analysis),
        risk_level: risk_level(analysis),
        flare_ecosystem_interaction: analysis.flare_specific.any(),
    };
}

fn gwei(value: u128) -> String {
    format_units(U256::from(value), "gwei").unwrap_or_else(|_| value.to_string())
}

/// EIP-1559 fee fields, present only for dynamic-fee transactions.
/// The consensus accessor reports a max fee for legacy transactions too,
/// so presence is keyed on the priority fee.
fn dynamic_fee_fields(
    priority_fee: Option<u128>,
    max_fee: u128,
) -> (Option<String>, Option<String>) {
    match priority_fee {
        Some(p) => (Some(gwei(max_fee)), Some(gwei(p))),
        None => (None, None),
    }
}
