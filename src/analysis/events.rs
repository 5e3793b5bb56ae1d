//! Receipt log classification
//!
//! A single linear pass over receipt logs. Known topic-0 hashes become
//! typed transfer or action records; everything else is recorded as a
//! generic contract interaction plus a raw event entry. Log order is
//! preserved throughout.

use std::sync::LazyLock;

use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::primitives::utils::format_units;
use alloy::providers::DynProvider;
use alloy::rpc::types::Log;
use alloy::sol;
use serde_json::{json, Value};
use tracing::debug;

use crate::analysis::types::{TokenInfo, Transfer};

sol! {
    #[sol(rpc)]
    interface IErc20Metadata {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

static TRANSFER: LazyLock<B256> =
    LazyLock::new(|| keccak256("Transfer(address,address,uint256)"));
static TRANSFER_SINGLE: LazyLock<B256> =
    LazyLock::new(|| keccak256("TransferSingle(address,address,address,uint256,uint256)"));
static TRANSFER_BATCH: LazyLock<B256> =
    LazyLock::new(|| keccak256("TransferBatch(address,address,address,uint256[],uint256[])"));
static APPROVAL: LazyLock<B256> =
    LazyLock::new(|| keccak256("Approval(address,address,uint256)"));
static APPROVAL_FOR_ALL: LazyLock<B256> =
    LazyLock::new(|| keccak256("ApprovalForAll(address,address,bool)"));
static DEPOSIT: LazyLock<B256> = LazyLock::new(|| keccak256("Deposit(address,uint256)"));
static WITHDRAWAL: LazyLock<B256> = LazyLock::new(|| keccak256("Withdrawal(address,uint256)"));
static MINTED: LazyLock<B256> = LazyLock::new(|| keccak256("Minted(address,address,uint256)"));
static REDEEMED: LazyLock<B256> = LazyLock::new(|| keccak256("Redeemed(address,uint256)"));

/// Result of one classification pass over a receipt's logs
#[derive(Debug, Default)]
pub struct ExtractedEvents {
    /// Coarse action labels, one per recognized event kind
    pub action_types: Vec<String>,
    /// Typed transfer records
    pub transfers: Vec<Transfer>,
    /// Non-transfer actions (approvals, wraps, mints)
    pub actions: Vec<Value>,
    /// Addresses that emitted unrecognized logs, first-seen order
    pub interactions: Vec<String>,
    /// Raw records of unrecognized logs
    pub other_events: Vec<Value>,
}

impl ExtractedEvents {
    fn push_action_type(&mut self, label: &str) {
        if !self.action_types.iter().any(|t| t == label) {
            self.action_types.push(label.to_string());
        }
    }

    fn push_interaction(&mut self, address: Address) {
        let addr = address.to_string();
        if !self.interactions.contains(&addr) {
            self.interactions.push(addr);
        }
    }
}

/// Classify every log of a receipt.
///
/// Token metadata for ERC-20 transfers is read from the emitting contract;
/// failures fall back to placeholder metadata rather than aborting the
/// pass.
pub async fn classify_logs(logs: &[Log], provider: &DynProvider) -> ExtractedEvents {
    let mut out = ExtractedEvents::default();

    for log in logs {
        let Some(topic0) = log.topic0() else {
            out.push_interaction(log.address());
            out.other_events.push(raw_event(log));
            continue;
        };

        if *topic0 == *TRANSFER {
            match log.topics().len() {
                3 => classify_erc20_transfer(log, provider, &mut out).await,
                4 => classify_erc721_transfer(log, &mut out),
                n => {
                    debug!(topics = n, address = %log.address(), "malformed Transfer log");
                    out.push_interaction(log.address());
                    out.other_events.push(raw_event(log));
                }
            }
        } else if *topic0 == *TRANSFER_SINGLE {
            classify_erc1155_single(log, &mut out);
        } else if *topic0 == *TRANSFER_BATCH {
            out.push_action_type("NFT Batch Transfer");
            out.actions.push(json!({
                "type": "ERC-1155 Batch Transfer",
                "contract": log.address().to_string(),
                "operator": indexed_address(log, 1),
                "from": indexed_address(log, 2),
                "to": indexed_address(log, 3),
            }));
        } else if *topic0 == *APPROVAL {
            out.push_action_type("Token Approval");
            out.actions.push(json!({
                "type": "Approval",
                "token": log.address().to_string(),
                "owner": indexed_address(log, 1),
                "spender": indexed_address(log, 2),
                "amount": data_amount(log).to_string(),
            }));
        } else if *topic0 == *APPROVAL_FOR_ALL {
            out.push_action_type("NFT Approval");
            out.actions.push(json!({
                "type": "Approval For All",
                "collection": log.address().to_string(),
                "owner": indexed_address(log, 1),
                "operator": indexed_address(log, 2),
            }));
        } else if *topic0 == *DEPOSIT {
            out.push_action_type("Wrap Native Token");
            out.actions.push(json!({
                "type": "Deposit",
                "contract": log.address().to_string(),
                "account": indexed_address(log, 1),
                "amount": format_wei(data_amount(log)),
            }));
        } else if *topic0 == *WITHDRAWAL {
            out.push_action_type("Unwrap Native Token");
            out.actions.push(json!({
                "type": "Withdrawal",
                "contract": log.address().to_string(),
                "account": indexed_address(log, 1),
                "amount": format_wei(data_amount(log)),
            }));
        } else if *topic0 == *MINTED {
            out.push_action_type("FAsset Minting");
            out.actions.push(json!({
                "type": "FAsset Minted",
                "contract": log.address().to_string(),
                "minter": indexed_address(log, 1),
                "amount": data_amount(log).to_string(),
            }));
        } else if *topic0 == *REDEEMED {
            out.push_action_type("FAsset Redemption");
            out.actions.push(json!({
                "type": "FAsset Redeemed",
                "contract": log.address().to_string(),
                "redeemer": indexed_address(log, 1),
                "amount": data_amount(log).to_string(),
            }));
        } else {
            out.push_interaction(log.address());
            out.other_events.push(raw_event(log));
        }
    }

    out
}

async fn classify_erc20_transfer(log: &Log, provider: &DynProvider, out: &mut ExtractedEvents) {
    let token = erc20_metadata(log.address(), provider).await;
    let value = data_amount(log);
    let formatted = format_units(value, token.decimals).unwrap_or_else(|_| value.to_string());

    out.push_action_type("Token Transfer");
    out.transfers.push(Transfer {
        token_type: "ERC-20".to_string(),
        token,
        from: indexed_address(log, 1),
        to: indexed_address(log, 2),
        value: formatted,
    });
}

fn classify_erc721_transfer(log: &Log, out: &mut ExtractedEvents) {
    let token_id = log
        .topics()
        .get(3)
        .map_or_else(String::new, |t| U256::from_be_bytes(t.0).to_string());

    out.push_action_type("NFT Transfer");
    out.transfers.push(Transfer {
        token_type: "ERC-721".to_string(),
        token: TokenInfo {
            address: Some(log.address().to_string()),
            symbol: "NFT".to_string(),
            decimals: 0,
            name: "Unknown Collection".to_string(),
        },
        from: indexed_address(log, 1),
        to: indexed_address(log, 2),
        value: token_id,
    });
}

fn classify_erc1155_single(log: &Log, out: &mut ExtractedEvents) {
    // data = (uint256 id, uint256 value)
    let data = log.data().data.as_ref();
    let (id, value) = if data.len() >= 64 {
        (
            U256::from_be_slice(&data[..32]),
            U256::from_be_slice(&data[32..64]),
        )
    } else {
        (U256::ZERO, U256::ZERO)
    };

    out.push_action_type("NFT Transfer");
    out.transfers.push(Transfer {
        token_type: "ERC-1155".to_string(),
        token: TokenInfo {
            address: Some(log.address().to_string()),
            symbol: "NFT".to_string(),
            decimals: 0,
            name: format!("Token #{id}"),
        },
        from: indexed_address(log, 2),
        to: indexed_address(log, 3),
        value: value.to_string(),
    });
}

async fn erc20_metadata(address: Address, provider: &DynProvider) -> TokenInfo {
    let contract = IErc20Metadata::new(address, provider);

    let symbol = contract.symbol().call().await.ok();
    let decimals = contract.decimals().call().await.ok();
    let name = contract.name().call().await.ok();

    if symbol.is_none() {
        debug!(%address, "token metadata unavailable");
    }

    TokenInfo {
        address: Some(address.to_string()),
        symbol: symbol.unwrap_or_else(|| "UNKNOWN".to_string()),
        decimals: decimals.unwrap_or(18),
        name: name.unwrap_or_else(|| "Unknown Token".to_string()),
    }
}

fn indexed_address(log: &Log, index: usize) -> String {
    log.topics()
        .get(index)
        .map_or_else(String::new, |t| Address::from_word(*t).to_string())
}

fn data_amount(log: &Log) -> U256 {
    let data = log.data().data.as_ref();
    if data.len() >= 32 {
        U256::from_be_slice(&data[..32])
    } else {
        U256::from_be_slice(data)
    }
}

fn format_wei(value: U256) -> String {
    alloy::primitives::utils::format_ether(value)
}

fn raw_event(log: &Log) -> Value {
    json!({
        "address": log.address().to_string(),
        "topics": log.topics().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "data": log.data().data.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, bytes, Bytes, LogData};
    use alloy::providers::Provider;
    use pretty_assertions::assert_eq;

    fn make_log(address: Address, topics: Vec<B256>, data: Bytes) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address,
                data: LogData::new_unchecked(topics, data),
            },
            ..Default::default()
        }
    }

    fn addr_topic(a: Address) -> B256 {
        a.into_word()
    }

    #[test]
    fn transfer_topic_matches_canonical_hash() {
        // Well-known ERC-20 Transfer topic
        assert_eq!(
            *TRANSFER,
            b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }

    #[test]
    fn erc721_transfer_extracts_token_id() {
        let collection = address!("1111111111111111111111111111111111111111");
        let from = address!("2222222222222222222222222222222222222222");
        let to = address!("3333333333333333333333333333333333333333");
        let token_id = B256::from(U256::from(42u64));

        let log = make_log(
            collection,
            vec![*TRANSFER, addr_topic(from), addr_topic(to), token_id],
            Bytes::new(),
        );

        let mut out = ExtractedEvents::default();
        classify_erc721_transfer(&log, &mut out);

        assert_eq!(out.transfers.len(), 1);
        assert_eq!(out.transfers[0].token_type, "ERC-721");
        assert_eq!(out.transfers[0].value, "42");
        assert_eq!(out.action_types, vec!["NFT Transfer"]);
    }

    #[test]
    fn erc1155_single_decodes_id_and_value() {
        let contract = address!("4444444444444444444444444444444444444444");
        let operator = address!("5555555555555555555555555555555555555555");
        let from = address!("6666666666666666666666666666666666666666");
        let to = address!("7777777777777777777777777777777777777777");

        let mut data = [0u8; 64];
        data[..32].copy_from_slice(&B256::from(U256::from(7u64)).0);
        data[32..].copy_from_slice(&B256::from(U256::from(500u64)).0);

        let log = make_log(
            contract,
            vec![
                *TRANSFER_SINGLE,
                addr_topic(operator),
                addr_topic(from),
                addr_topic(to),
            ],
            Bytes::copy_from_slice(&data),
        );

        let mut out = ExtractedEvents::default();
        classify_erc1155_single(&log, &mut out);

        assert_eq!(out.transfers[0].token_type, "ERC-1155");
        assert_eq!(out.transfers[0].token.name, "Token #7");
        assert_eq!(out.transfers[0].value, "500");
    }

    #[tokio::test]
    async fn erc20_transfer_formats_with_fallback_decimals() {
        use alloy::providers::ProviderBuilder;

        let token = address!("8888888888888888888888888888888888888888");
        let from = address!("2222222222222222222222222222222222222222");
        let to = address!("3333333333333333333333333333333333333333");
        // 1 token at the 18-decimal fallback
        let amount = B256::from(U256::from(10u64).pow(U256::from(18u64)));

        let log = make_log(
            token,
            vec![*TRANSFER, addr_topic(from), addr_topic(to)],
            Bytes::copy_from_slice(&amount.0),
        );

        // Unreachable endpoint; metadata calls fail and defaults apply
        let provider = ProviderBuilder::new()
            .connect_http("http://127.0.0.1:9".parse().unwrap())
            .erased();
        let out = classify_logs(std::slice::from_ref(&log), &provider).await;

        assert_eq!(out.transfers.len(), 1);
        assert_eq!(out.transfers[0].token_type, "ERC-20");
        assert_eq!(out.transfers[0].token.decimals, 18);
        assert_eq!(out.transfers[0].value, "1.000000000000000000");
    }

    #[test]
    fn data_amount_handles_short_data() {
        let log = make_log(
            address!("1111111111111111111111111111111111111111"),
            vec![*DEPOSIT],
            bytes!("05"),
        );
        assert_eq!(data_amount(&log), U256::from(5u64));
    }

    #[test]
    fn interactions_dedupe_preserving_first_seen_order() {
        let mut out = ExtractedEvents::default();
        let a = address!("1111111111111111111111111111111111111111");
        let b = address!("2222222222222222222222222222222222222222");
        out.push_interaction(a);
        out.push_interaction(b);
        out.push_interaction(a);
        assert_eq!(out.interactions.len(), 2);
        assert_eq!(out.interactions[0], a.to_string());
    }

    #[test]
    fn action_types_do_not_repeat() {
        let mut out = ExtractedEvents::default();
        out.push_action_type("Token Transfer");
        out.push_action_type("Token Transfer");
        assert_eq!(out.action_types.len(), 1);
    }
}
