//! Flare ecosystem tagging
//!
//! Matches interaction addresses against a table of known ecosystem
//! contracts and applies bytecode marker heuristics. The addresses are
//! documentation-grade stand-ins, not live deployments; the matching
//! logic is what matters here.

use std::str::FromStr;

use alloy::hex;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use tracing::{debug, warn};

use crate::analysis::types::{SecurityNote, TransactionAnalysis};

/// A known ecosystem contract and the tag it carries
struct KnownContract {
    address: &'static str,
    tag: Tag,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tag {
    FtsoV2,
    FAssets,
    Fdc,
    Staking,
    PriceSubmitter,
    RewardManager,
    WrappedNative,
    Delegation,
}

const KNOWN_CONTRACTS: [KnownContract; 8] = [
    KnownContract {
        address: "0x3d1E88F3b8fc32DB6d71C82F2e9c44DeBe01d796",
        tag: Tag::FtsoV2,
    },
    KnownContract {
        address: "0x7c2C195CD6D34B8F845992d380aADB2730bB9C6F",
        tag: Tag::FAssets,
    },
    KnownContract {
        address: "0x8912AECD8e9e0c7e94c4D36b67e08FaF6b3E5A2D",
        tag: Tag::Fdc,
    },
    KnownContract {
        address: "0x1234567890123456789012345678901234567890",
        tag: Tag::Staking,
    },
    KnownContract {
        address: "0x1000000000000000000000000000000000000001",
        tag: Tag::PriceSubmitter,
    },
    KnownContract {
        address: "0x2000000000000000000000000000000000000002",
        tag: Tag::RewardManager,
    },
    KnownContract {
        address: "0x3000000000000000000000000000000000000003",
        tag: Tag::WrappedNative,
    },
    KnownContract {
        address: "0x4000000000000000000000000000000000000004",
        tag: Tag::Delegation,
    },
];

/// Bytecode markers hinting at FTSO-style contracts
const FTSO_MARKERS: [&str; 2] = ["ftso", "getFeedById"];
/// Bytecode markers hinting at FAssets/bridge contracts
const FASSET_MARKERS: [&str; 2] = ["fasset", "bridge"];

/// Tag every interaction address with ecosystem flags and security notes.
///
/// Address comparison is canonical `Address` equality, so mixed-case hex
/// classifies identically to lowercase. Bytecode fetch failures downgrade
/// to a warning note instead of aborting the pass.
pub async fn tag_interactions(analysis: &mut TransactionAnalysis, provider: &DynProvider) {
    let interactions = analysis.interactions.clone();

    for raw in &interactions {
        let Ok(address) = Address::from_str(raw) else {
            debug!(address = raw, "skipping unparseable interaction address");
            continue;
        };

        apply_known_tags(analysis, address);

        match provider.get_code_at(address).await {
            Ok(code) if !code.is_empty() => {
                apply_bytecode_heuristics(analysis, &hex::encode(&code), raw);
                analysis.security_info.push(SecurityNote {
                    note_type: "Info".to_string(),
                    message: format!("Contract at {raw} is verified and has bytecode"),
                    contract_address: raw.clone(),
                });
            }
            Ok(_) => {
                // EOA or self-destructed contract; nothing to inspect
            }
            Err(err) => {
                warn!(address = raw, error = %err, "contract code fetch failed");
                analysis.security_info.push(SecurityNote {
                    note_type: "Warning".to_string(),
                    message: format!("Could not verify contract at {raw}"),
                    contract_address: raw.clone(),
                });
            }
        }
    }
}

fn apply_known_tags(analysis: &mut TransactionAnalysis, address: Address) {
    for known in &KNOWN_CONTRACTS {
        let Ok(known_addr) = Address::from_str(known.address) else {
            continue;
        };
        if address != known_addr {
            continue;
        }

        let flags = &mut analysis.flare_specific;
        match known.tag {
            Tag::FtsoV2 => {
                flags.is_ftso_related = true;
                analysis.action_types.push("FTSO Data Feed Interaction".to_string());
                flags.data_feeds_interacted.push("FTSO V2 Oracle".to_string());
            }
            Tag::FAssets => {
                flags.is_fassets_related = true;
                analysis.action_types.push("FAssets Bridge Interaction".to_string());
            }
            Tag::Fdc => {
                flags.is_fdc_related = true;
                analysis.action_types.push("FDC Data Connector Interaction".to_string());
            }
            Tag::Staking | Tag::Delegation => {
                flags.is_staking_related = true;
                analysis.action_types.push("Flare Staking/Delegation".to_string());
            }
            Tag::PriceSubmitter => {
                flags.is_ftso_related = true;
                analysis.action_types.push("FTSO Price Submission".to_string());
                flags.data_feeds_interacted.push("Price Submitter".to_string());
            }
            Tag::RewardManager => {
                flags.is_ftso_related = true;
                analysis.action_types.push("FTSO Reward Management".to_string());
            }
            Tag::WrappedNative => {
                analysis
                    .action_types
                    .push("Wrapped Native Token Interaction".to_string());
            }
        }
    }
}

/// Marker search over hex-encoded bytecode. The markers are matched as
/// their hex-encoded ASCII bytes, since the code string itself is hex.
fn apply_bytecode_heuristics(analysis: &mut TransactionAnalysis, code_hex: &str, address: &str) {
    let flags = &mut analysis.flare_specific;

    if FTSO_MARKERS.iter().any(|m| contains_marker(code_hex, m)) {
        flags.is_ftso_related = true;
        analysis.action_types.push("Potential FTSO Contract".to_string());
        debug!(address, "bytecode matched FTSO marker");
    }

    if FASSET_MARKERS.iter().any(|m| contains_marker(code_hex, m)) {
        flags.is_fassets_related = true;
        analysis.action_types.push("Potential FAssets Contract".to_string());
        debug!(address, "bytecode matched FAssets marker");
    }
}

fn contains_marker(code_hex: &str, marker: &str) -> bool {
    code_hex.contains(&hex::encode(marker.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{NetworkInfo, TransactionInfo};
    use pretty_assertions::assert_eq;

    fn empty_analysis() -> TransactionAnalysis {
        TransactionAnalysis::new(
            NetworkInfo {
                name: "Flare Mainnet".to_string(),
                chain_id: 14,
                currency: "FLR".to_string(),
                block_number: None,
                block_timestamp: "unknown".to_string(),
                features: vec![],
                description: String::new(),
                testnet: false,
            },
            TransactionInfo {
                hash: "0x0".to_string(),
                from: "0x1".to_string(),
                to: None,
                value: "0.0".to_string(),
                nonce: 0,
                status: "Success".to_string(),
                gas_used: None,
                gas_price: "unknown".to_string(),
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                total_cost: "unknown".to_string(),
                function_selector: None,
            },
        )
    }

    #[test]
    fn known_table_addresses_all_parse() {
        for known in &KNOWN_CONTRACTS {
            assert!(Address::from_str(known.address).is_ok(), "{}", known.address);
        }
    }

    #[test]
    fn ftso_tagging_is_case_insensitive() {
        let mut upper = empty_analysis();
        let addr = Address::from_str("0x3D1E88F3B8FC32DB6D71C82F2E9C44DEBE01D796").unwrap();
        apply_known_tags(&mut upper, addr);

        let mut lower = empty_analysis();
        let addr = Address::from_str("0x3d1e88f3b8fc32db6d71c82f2e9c44debe01d796").unwrap();
        apply_known_tags(&mut lower, addr);

        assert!(upper.flare_specific.is_ftso_related);
        assert_eq!(
            upper.flare_specific.is_ftso_related,
            lower.flare_specific.is_ftso_related
        );
        assert_eq!(upper.action_types, lower.action_types);
    }

    #[test]
    fn staking_and_delegation_share_a_flag() {
        let mut a = empty_analysis();
        apply_known_tags(
            &mut a,
            Address::from_str("0x1234567890123456789012345678901234567890").unwrap(),
        );
        assert!(a.flare_specific.is_staking_related);

        let mut b = empty_analysis();
        apply_known_tags(
            &mut b,
            Address::from_str("0x4000000000000000000000000000000000000004").unwrap(),
        );
        assert!(b.flare_specific.is_staking_related);
    }

    #[test]
    fn unknown_address_sets_nothing() {
        let mut a = empty_analysis();
        apply_known_tags(
            &mut a,
            Address::from_str("0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef").unwrap(),
        );
        assert!(!a.flare_specific.any());
        assert!(a.action_types.is_empty());
    }

    #[test]
    fn bytecode_marker_matches_hex_encoded_ascii() {
        // "ftso" = 6674736f in hex
        let code = format!("6080604052{}60405260", hex::encode("ftso"));
        let mut a = empty_analysis();
        apply_bytecode_heuristics(&mut a, &code, "0xabc");
        assert!(a.flare_specific.is_ftso_related);
        assert!(a.action_types.contains(&"Potential FTSO Contract".to_string()));
    }

    #[test]
    fn bytecode_without_markers_sets_nothing() {
        let mut a = empty_analysis();
        apply_bytecode_heuristics(&mut a, "6080604052348015600e575f5ffd5b50", "0xabc");
        assert!(!a.flare_specific.any());
    }

    #[test]
    fn bridge_marker_sets_fassets_flag() {
        let code = hex::encode("some bridge code");
        let mut a = empty_analysis();
        apply_bytecode_heuristics(&mut a, &code, "0xabc");
        assert!(a.flare_specific.is_fassets_related);
        assert!(!a.flare_specific.is_ftso_related);
    }
}
