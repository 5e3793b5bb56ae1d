//! FTSO v2 price feed reads
//!
//! Feed ids are 21 bytes: a 0x01 category prefix, the ASCII pair name,
//! zero padding. Contract reads go through `sol!` bindings against the
//! FTSO v2 address; any call failure degrades to `None` or an empty list
//! so price display never takes a request down.

use std::str::FromStr;

use alloy::primitives::{Address, FixedBytes};
use alloy::providers::DynProvider;
use alloy::sol;
use serde::Serialize;
use tracing::warn;

use crate::chain::MAINNET_FEEDS;
use crate::{Error, Result};

sol! {
    #[sol(rpc)]
    interface IFtsoV2 {
        struct Feed {
            uint256 value;
            int8 decimals;
            uint64 timestamp;
        }

        function getFeedById(bytes21 feedId)
            external
            view
            returns (uint256 value, int8 decimals, uint64 timestamp);
        function getFeedsById(bytes21[] calldata feedIds) external view returns (Feed[] memory);
        function getSupportedFeedIds() external view returns (bytes21[] memory);
    }
}

/// FTSO v2 contract address, shared across the Flare-family networks.
const FTSO_V2_ADDRESS: &str = "0x3d1E88F3b8fc32DB6d71C82F2e9c44DeBe01d796";

/// A 21-byte FTSO feed identifier
pub type FeedId = FixedBytes<21>;

/// One decoded price feed reading
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeedData {
    /// Hex feed id
    pub feed_id: String,
    /// Pair name, e.g. `BTC/USD`
    pub symbol: String,
    /// Decimal-scaled value
    pub value: f64,
    /// Feed decimals as reported by the contract (may be negative)
    pub decimals: i8,
    /// Voting-round timestamp
    pub timestamp: u64,
    /// Value rendered with at least two decimal places
    pub formatted_value: String,
}

/// Build the 21-byte feed id for a pair name.
pub fn feed_id(symbol: &str) -> Result<FeedId> {
    let bytes = symbol.as_bytes();
    if bytes.is_empty() || bytes.len() > 20 {
        return Err(Error::InvalidParams(format!("invalid feed symbol: {symbol}")));
    }
    let mut id = [0u8; 21];
    id[0] = 0x01;
    id[1..=bytes.len()].copy_from_slice(bytes);
    Ok(FixedBytes(id))
}

/// Reverse lookup of a feed id against the known pair table.
#[must_use]
pub fn symbol_for(id: FeedId) -> Option<&'static str> {
    MAINNET_FEEDS
        .iter()
        .find(|symbol| feed_id(symbol).is_ok_and(|known| known == id))
        .copied()
}

/// Price feed reader bound to one chain's provider
pub struct FtsoService {
    provider: DynProvider,
    address: Address,
    chain_id: u64,
}

impl FtsoService {
    /// Bind the service to a provider. The same deployment address is
    /// used on all four networks.
    pub fn new(provider: DynProvider, chain_id: u64) -> Result<Self> {
        let address = Address::from_str(FTSO_V2_ADDRESS)
            .map_err(|e| Error::ContractCall(e.to_string()))?;
        Ok(Self {
            provider,
            address,
            chain_id,
        })
    }

    fn contract(&self) -> IFtsoV2::IFtsoV2Instance<&DynProvider> {
        IFtsoV2::new(self.address, &self.provider)
    }

    /// Read one feed by pair name. `None` when the read fails.
    pub async fn price(&self, symbol: &str) -> Option<PriceFeedData> {
        let id = feed_id(symbol).ok()?;
        match self.contract().getFeedById(id).call().await {
            Ok(feed) => Some(decode_feed(
                id,
                symbol,
                feed.value.to_string().parse().unwrap_or(0.0),
                feed.decimals,
                feed.timestamp,
            )),
            Err(err) => {
                warn!(symbol, chain_id = self.chain_id, error = %err, "FTSO read failed");
                None
            }
        }
    }

    /// Read several feeds in one call. Empty when the read fails.
    pub async fn prices(&self, symbols: &[&str]) -> Vec<PriceFeedData> {
        let ids: Vec<(FeedId, &str)> = symbols
            .iter()
            .filter_map(|s| feed_id(s).ok().map(|id| (id, *s)))
            .collect();
        if ids.is_empty() {
            return vec![];
        }

        let feed_ids: Vec<FeedId> = ids.iter().map(|(id, _)| *id).collect();
        match self.contract().getFeedsById(feed_ids).call().await {
            Ok(feeds) => ids
                .iter()
                .zip(feeds)
                .map(|(&(id, symbol), feed)| {
                    decode_feed(
                        id,
                        symbol,
                        feed.value.to_string().parse().unwrap_or(0.0),
                        feed.decimals,
                        feed.timestamp,
                    )
                })
                .collect(),
            Err(err) => {
                warn!(chain_id = self.chain_id, error = %err, "FTSO batch read failed");
                vec![]
            }
        }
    }

    /// Feed ids the contract reports as supported. Empty on failure.
    pub async fn supported_feeds(&self) -> Vec<FeedId> {
        match self.contract().getSupportedFeedIds().call().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(chain_id = self.chain_id, error = %err, "supported feed query failed");
                vec![]
            }
        }
    }

    /// USD value of an amount of an asset, via its `SYMBOL/USD` feed.
    pub async fn usd_value(&self, amount: &str, asset: &str) -> Option<f64> {
        let price = self.price(&format!("{asset}/USD")).await?;
        let amount: f64 = amount.parse().ok()?;
        Some(amount * price.value)
    }
}

fn decode_feed(id: FeedId, symbol: &str, raw: f64, decimals: i8, timestamp: u64) -> PriceFeedData {
    let value = scale(raw, decimals);
    let precision = usize::from(decimals.unsigned_abs()).max(2);
    PriceFeedData {
        feed_id: id.to_string(),
        symbol: symbol.to_string(),
        value,
        decimals,
        timestamp,
        formatted_value: format!("{value:.precision$}"),
    }
}

// Negative decimals mean the raw value is already scaled up.
fn scale(raw: f64, decimals: i8) -> f64 {
    if decimals < 0 {
        raw * 10f64.powi(i32::from(decimals.unsigned_abs()))
    } else {
        raw / 10f64.powi(i32::from(decimals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn feed_ids_are_21_bytes_with_category_prefix() {
        for symbol in MAINNET_FEEDS {
            let id = feed_id(symbol).unwrap();
            assert_eq!(id.len(), 21);
            assert_eq!(id[0], 0x01, "{symbol}");
        }
    }

    #[test]
    fn flr_usd_feed_id_layout() {
        let id = feed_id("FLR/USD").unwrap();
        assert_eq!(&id[1..8], b"FLR/USD");
        assert!(id[8..].iter().all(|&b| b == 0));
        assert_eq!(id.to_string(), "0x01464c522f55534400000000000000000000000000");
    }

    #[test]
    fn symbol_reverse_lookup_round_trips() {
        for symbol in MAINNET_FEEDS {
            let id = feed_id(symbol).unwrap();
            assert_eq!(symbol_for(id), Some(symbol));
        }
        assert_eq!(symbol_for(FixedBytes([0xff; 21])), None);
    }

    #[test]
    fn oversized_symbol_is_rejected() {
        assert!(feed_id("THIS/SYMBOL/IS/TOO/LONG/USD").is_err());
        assert!(feed_id("").is_err());
    }

    #[test]
    fn positive_decimals_divide() {
        assert_eq!(scale(4_300_000.0, 2), 43_000.0);
        assert_eq!(scale(62.0, 2), 0.62);
    }

    #[test]
    fn negative_decimals_multiply() {
        assert_eq!(scale(43.0, -3), 43_000.0);
    }

    #[test]
    fn formatted_value_has_at_least_two_decimals() {
        let id = feed_id("BTC/USD").unwrap();
        let feed = decode_feed(id, "BTC/USD", 4_300_000.0, 2, 0);
        assert_eq!(feed.formatted_value, "43000.00");

        let feed = decode_feed(id, "BTC/USD", 43.0, -3, 0);
        assert_eq!(feed.formatted_value, "43000.000");
    }
}
