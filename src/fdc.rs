//! Flare Data Connector verifier client
//!
//! Thin reqwest client for the third-party attestation verifier
//! endpoints. Every failure path collapses to `None` so attestation
//! lookups degrade instead of failing a chat request.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, warn};

/// Attestation request types understood by the verifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttestationType {
    /// Payment proof
    Payment,
    /// Balance-decreasing transaction proof
    BalanceDecreasingTransaction,
    /// Confirmed block height proof
    ConfirmedBlockHeightExists,
    /// Non-existence proof for a referenced payment
    ReferencedPaymentNonexistence,
    /// Address validity proof
    AddressValidity,
}

impl fmt::Display for AttestationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Payment => "Payment",
            Self::BalanceDecreasingTransaction => "BalanceDecreasingTransaction",
            Self::ConfirmedBlockHeightExists => "ConfirmedBlockHeightExists",
            Self::ReferencedPaymentNonexistence => "ReferencedPaymentNonexistence",
            Self::AddressValidity => "AddressValidity",
        };
        f.write_str(name)
    }
}

/// External chains with verifier coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalChain {
    /// Bitcoin
    BTC,
    /// Dogecoin
    DOGE,
    /// XRP Ledger
    XRP,
    /// Ethereum
    ETH,
}

impl ExternalChain {
    /// Path segment used by the hosted verifier for this chain.
    #[must_use]
    pub fn verifier_path(self) -> &'static str {
        match self {
            Self::BTC => "btc",
            Self::DOGE => "doge",
            Self::XRP => "xrp",
            Self::ETH => "evm",
        }
    }

    /// Display-only confirmation counts per chain.
    #[must_use]
    pub fn confirmations(self) -> u32 {
        match self {
            Self::BTC => 6,
            Self::XRP => 1,
            Self::ETH => 12,
            Self::DOGE => 20,
        }
    }
}

impl fmt::Display for ExternalChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BTC => "BTC",
            Self::DOGE => "DOGE",
            Self::XRP => "XRP",
            Self::ETH => "ETH",
        };
        f.write_str(name)
    }
}

/// Payment attestation returned by a verifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAttestation {
    /// Block number on the external chain
    pub block_number: u64,
    /// Block timestamp on the external chain
    pub block_timestamp: u64,
    /// External transaction hash
    pub transaction_hash: String,
    /// Source address
    pub source_address: String,
    /// Receiving address
    pub receiving_address: String,
    /// Spent amount in the chain's smallest unit
    pub spent_amount: String,
    /// Standard payment reference
    #[serde(default)]
    pub payment_reference: String,
    /// Whether the payment maps one-to-one
    #[serde(default)]
    pub one_to_one: bool,
    /// Verifier status string
    #[serde(default)]
    pub status: String,
}

/// Balance attestation returned by a verifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAttestation {
    /// Block number on the external chain
    pub block_number: u64,
    /// Block timestamp on the external chain
    pub block_timestamp: u64,
    /// Hashed external address
    pub address_hash: String,
    /// Balance in the chain's smallest unit
    pub balance: String,
}

/// Cross-chain transaction record derived from a payment attestation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainTransaction {
    /// External chain
    pub chain: ExternalChain,
    /// External transaction hash
    pub tx_hash: String,
    /// Source address
    pub from: String,
    /// Receiving address
    pub to: String,
    /// Amount in the chain's smallest unit
    pub amount: String,
    /// External block timestamp
    pub timestamp: u64,
    /// Display confirmation count
    pub confirmations: u32,
    /// "pending", "confirmed" or "failed"
    pub status: String,
}

/// Bridge monitoring snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStatus {
    /// Whether the source payment verified
    pub source_verified: bool,
    /// Whether the destination leg verified
    pub dest_verified: bool,
    /// "pending", "completed" or "failed"
    pub bridge_status: String,
}

#[derive(Debug, Deserialize)]
struct VerifierResponse {
    status: String,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default, rename = "attestationHash")]
    attestation_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProofResponse {
    proof: String,
}

/// Verifier endpoint client bound to one Flare chain
pub struct FdcService {
    client: Client,
    chain_id: u64,
    api_key: String,
}

impl FdcService {
    /// Bind the service to a Flare chain id and verifier API key.
    #[must_use]
    pub fn new(client: Client, chain_id: u64, api_key: impl Into<String>) -> Self {
        Self {
            client,
            chain_id,
            api_key: api_key.into(),
        }
    }

    /// Verifier base URL for an external chain. Only mainnet (14) and
    /// Coston2 (114) have verifier deployments.
    #[must_use]
    pub fn verifier_url(&self, chain: ExternalChain) -> Option<String> {
        let host = match self.chain_id {
            14 => "fdc-verifiers-mainnet.flare.network",
            114 => "fdc-verifiers-testnet.flare.network",
            _ => return None,
        };
        Some(format!("https://{host}/verifier/{}", chain.verifier_path()))
    }

    async fn prepare_request(
        &self,
        chain: ExternalChain,
        attestation_type: AttestationType,
        body: &Value,
    ) -> Option<VerifierResponse> {
        let base = self.verifier_url(chain)?;
        let url = format!("{base}/{attestation_type}/prepareRequest");

        let result = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(body)
            .send()
            .await;

        match result {
            Ok(response) => match response.json::<VerifierResponse>().await {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(url, error = %err, "verifier response parse failed");
                    None
                }
            },
            Err(err) => {
                warn!(url, error = %err, "verifier request failed");
                None
            }
        }
    }

    /// Verify a payment on an external chain.
    pub async fn verify_payment(
        &self,
        chain: ExternalChain,
        tx_hash: &str,
    ) -> Option<PaymentAttestation> {
        let body = json!({
            "transactionHash": tx_hash,
            "chainId": chain.to_string(),
        });
        let response = self.prepare_request(chain, AttestationType::Payment, &body).await?;

        if response.status != "VALID" {
            debug!(%chain, tx_hash, status = response.status, "payment not attested");
            return None;
        }
        serde_json::from_value(response.response?).ok()
    }

    /// Verify a balance on an external chain.
    pub async fn verify_balance(
        &self,
        chain: ExternalChain,
        address: &str,
        block_number: Option<u64>,
    ) -> Option<BalanceAttestation> {
        let body = json!({
            "addressHash": address,
            "blockNumber": block_number.map_or_else(|| json!("latest"), |n| json!(n)),
            "chainId": chain.to_string(),
        });
        let response = self
            .prepare_request(chain, AttestationType::BalanceDecreasingTransaction, &body)
            .await?;

        if response.status != "VALID" {
            return None;
        }
        serde_json::from_value(response.response?).ok()
    }

    /// Prepare an attestation request, then fetch its Merkle proof.
    pub async fn attestation_proof(
        &self,
        attestation_type: AttestationType,
        chain: ExternalChain,
        request_data: &Value,
    ) -> Option<String> {
        let response = self.prepare_request(chain, attestation_type, request_data).await?;
        if response.status != "VALID" {
            return None;
        }

        let base = self.verifier_url(chain)?;
        let url = format!("{base}/proof/{}", response.attestation_hash?);
        let proof = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .send()
            .await
            .ok()?
            .json::<ProofResponse>()
            .await
            .ok()?;

        Some(proof.proof)
    }

    /// Payment attestation dressed up with per-chain confirmation
    /// placeholders.
    pub async fn cross_chain_transaction(
        &self,
        chain: ExternalChain,
        tx_hash: &str,
    ) -> Option<CrossChainTransaction> {
        let payment = self.verify_payment(chain, tx_hash).await?;
        Some(CrossChainTransaction {
            chain,
            tx_hash: tx_hash.to_string(),
            from: payment.source_address,
            to: payment.receiving_address,
            amount: payment.spent_amount,
            timestamp: payment.block_timestamp,
            confirmations: chain.confirmations(),
            status: "confirmed".to_string(),
        })
    }

    /// Source-leg bridge status. The destination leg is not yet checked;
    /// a verified source reads as pending.
    pub async fn monitor_bridge(&self, source_chain: ExternalChain, tx_hash: &str) -> BridgeStatus {
        let source_verified = self.verify_payment(source_chain, tx_hash).await.is_some();
        BridgeStatus {
            source_verified,
            dest_verified: false,
            bridge_status: if source_verified { "pending" } else { "failed" }.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service(chain_id: u64) -> FdcService {
        FdcService::new(Client::new(), chain_id, "test_key")
    }

    #[test]
    fn verifier_urls_cover_mainnet_and_coston2() {
        assert_eq!(
            service(14).verifier_url(ExternalChain::BTC).as_deref(),
            Some("https://fdc-verifiers-mainnet.flare.network/verifier/btc")
        );
        assert_eq!(
            service(114).verifier_url(ExternalChain::ETH).as_deref(),
            Some("https://fdc-verifiers-testnet.flare.network/verifier/evm")
        );
    }

    #[test]
    fn songbird_has_no_verifier() {
        assert!(service(19).verifier_url(ExternalChain::BTC).is_none());
        assert!(service(0).verifier_url(ExternalChain::XRP).is_none());
    }

    #[test]
    fn eth_maps_to_evm_verifier_path() {
        assert_eq!(ExternalChain::ETH.verifier_path(), "evm");
        assert_eq!(ExternalChain::DOGE.verifier_path(), "doge");
    }

    #[test]
    fn attestation_types_render_as_verifier_segments() {
        assert_eq!(AttestationType::Payment.to_string(), "Payment");
        assert_eq!(
            AttestationType::BalanceDecreasingTransaction.to_string(),
            "BalanceDecreasingTransaction"
        );
    }

    #[test]
    fn payment_attestation_parses_verifier_shape() {
        let raw = json!({
            "blockNumber": 840000,
            "blockTimestamp": 1714000000,
            "transactionHash": "0xabc",
            "sourceAddress": "bc1qsource",
            "receivingAddress": "bc1qdest",
            "spentAmount": "150000",
        });
        let parsed: PaymentAttestation = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.block_number, 840_000);
        assert_eq!(parsed.spent_amount, "150000");
        assert_eq!(parsed.payment_reference, "");
        assert!(!parsed.one_to_one);
    }

    #[tokio::test]
    async fn bridge_status_fails_without_verifier() {
        // Chain 19 has no verifier table, so the source leg cannot verify
        let status = service(19).monitor_bridge(ExternalChain::BTC, "0xabc").await;
        assert_eq!(
            status,
            BridgeStatus {
                source_verified: false,
                dest_verified: false,
                bridge_status: "failed".to_string(),
            }
        );
    }
}
