//! Integration tests for the gateway's public API
//!
//! These cover the pieces that work without a live RPC endpoint or LLM
//! provider: the chain registry, feed id handling, collateral math,
//! attestation routing, configuration loading, and tool schemas.

use std::io::Write as _;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use flarescan_gateway::chain::ChainRegistry;
use flarescan_gateway::config::{Config, RpcConfig};
use flarescan_gateway::fassets::{FASSET_SYMBOLS, collateralization_health};
use flarescan_gateway::fdc::{AttestationType, ExternalChain};
use flarescan_gateway::ftso::{feed_id, symbol_for};
use flarescan_gateway::llm::{ToolContext, dispatch, tool_specs};

fn registry() -> ChainRegistry {
    ChainRegistry::new(&RpcConfig::default())
}

#[test]
fn registry_covers_the_flare_family() {
    let reg = registry();
    assert_eq!(reg.all().len(), 4);
    assert_eq!(reg.get(14).unwrap().name, "Flare Mainnet");
    assert_eq!(reg.get(19).unwrap().name, "Songbird");
    assert!(reg.get(1).is_none());

    assert_eq!(reg.mainnets().count(), 2);
    assert_eq!(reg.testnets().count(), 2);
}

#[test]
fn mainnet_feed_ids_round_trip() {
    for symbol in registry().ftso_feeds(14) {
        let id = feed_id(symbol).unwrap();
        assert_eq!(id.as_slice()[0], 0x01);
        assert_eq!(symbol_for(id), Some(*symbol));
    }
}

#[test]
fn collateral_health_buckets() {
    assert_eq!(collateralization_health(2.4, 1.0, 150.0).health, "healthy");
    assert_eq!(collateralization_health(2.0, 1.0, 150.0).health, "warning");
    assert_eq!(collateralization_health(1.7, 1.0, 150.0).health, "danger");

    // Nothing minted means nothing at risk
    let idle = collateralization_health(100.0, 0.0, 150.0);
    assert_eq!(idle.health, "healthy");
    assert_eq!(idle.current_ratio, None);
    assert!((idle.buffer - 100.0).abs() < f64::EPSILON);
}

#[test]
fn fasset_symbols_are_stable() {
    assert_eq!(FASSET_SYMBOLS, ["FBTC", "FXRP", "FLTC", "FDOGE"]);
}

#[test]
fn attestation_routing_basics() {
    assert_eq!(ExternalChain::ETH.verifier_path(), "evm");
    assert_eq!(ExternalChain::BTC.verifier_path(), "btc");
    assert_eq!(ExternalChain::BTC.confirmations(), 6);
    assert_eq!(ExternalChain::XRP.confirmations(), 1);
    assert_eq!(AttestationType::Payment.to_string(), "Payment");
}

#[test]
fn config_loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "server:\n  port: 9090\nllm:\n  model: test-model\n  temperature: 0.2"
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.llm.model, "test-model");
    assert!((config.llm.temperature - 0.2).abs() < f64::EPSILON);
    // Untouched sections keep their defaults
    assert_eq!(config.llm.max_steps, 20);
}

#[test]
fn config_defaults_without_a_file() {
    let config = Config::load(None).unwrap();
    assert_eq!(config.server.port, 8787);
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
}

#[tokio::test]
async fn tool_dispatch_answers_registry_questions_offline() {
    let ctx = ToolContext {
        registry: Arc::new(registry()),
    };

    let info = dispatch("get_flare_network_info", r#"{"chain_id": 19}"#, &ctx).await;
    assert_eq!(info["success"], true);
    assert_eq!(info["data"]["name"], "Songbird");
    assert_eq!(info["data"]["ecosystem"]["fassetsSupported"], false);

    let overview = dispatch("get_flare_ecosystem_overview", "{}", &ctx).await;
    assert_eq!(overview["success"], true);
    assert_eq!(overview["data"]["overview"]["totalNetworks"], 4);

    let unknown = dispatch("no_such_tool", "{}", &ctx).await;
    assert_eq!(unknown["success"], false);
}

#[test]
fn every_declared_tool_is_dispatchable_by_name() {
    let names: Vec<String> = tool_specs()
        .iter()
        .map(|spec| spec.function["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names.len(), 8);
    for expected in [
        "analyze_flare_transaction",
        "flare_data_analysis",
        "get_ftso_data_feeds",
        "get_flare_network_info",
        "get_wallet_analysis",
        "get_flare_ecosystem_overview",
        "compare_flare_networks",
        "fallback_analyze_tx",
    ] {
        assert!(names.contains(&expected.to_string()), "{expected} missing");
    }
}
