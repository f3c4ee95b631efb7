//! Market data types, feed abstractions and the aggregation service

use crate::core::cache::FeedCache;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// How long a fetched feed value is served without a new upstream call.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

/// Gold quote served when the feed fails before any data ever arrived.
pub const GOLD_BASELINE: GoldQuote = GoldQuote {
    price: 2650.0,
    change: 0.0,
    change_percent: 0.0,
};

/// One listed crypto asset. Listings keep the upstream market-cap rank
/// order; numeric fields may be absent and are rendered as placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoQuote {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub image: String,
}

/// Derived currency rates keyed by pair label, e.g. "USD/TRY".
pub type ForexTable = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldQuote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Combined view over all three feeds. Each field degrades to its own
/// default when the source fails cold, so the shape is always complete.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub crypto: Vec<CryptoQuote>,
    pub forex: ForexTable,
    pub gold: GoldQuote,
}

#[async_trait]
pub trait CryptoFeed: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<CryptoQuote>>;
}

#[async_trait]
pub trait ForexFeed: Send + Sync {
    async fn fetch_rates(&self) -> Result<ForexTable>;
}

#[async_trait]
pub trait GoldFeed: Send + Sync {
    async fn fetch_spot(&self) -> Result<GoldQuote>;
}

/// Front door for market data. Each feed sits behind its own freshness
/// cache; refresh failures fall back to stale data, and gold additionally
/// falls back to [`GOLD_BASELINE`] so it can never fail.
pub struct MarketService {
    crypto_feed: Arc<dyn CryptoFeed>,
    forex_feed: Arc<dyn ForexFeed>,
    gold_feed: Arc<dyn GoldFeed>,
    crypto_cache: FeedCache<Vec<CryptoQuote>>,
    forex_cache: FeedCache<ForexTable>,
    gold_cache: FeedCache<GoldQuote>,
}

impl MarketService {
    pub fn new(
        crypto_feed: Arc<dyn CryptoFeed>,
        forex_feed: Arc<dyn ForexFeed>,
        gold_feed: Arc<dyn GoldFeed>,
    ) -> Self {
        Self::with_freshness(crypto_feed, forex_feed, gold_feed, FRESHNESS_WINDOW)
    }

    /// Same as [`MarketService::new`] with a custom freshness window.
    pub fn with_freshness(
        crypto_feed: Arc<dyn CryptoFeed>,
        forex_feed: Arc<dyn ForexFeed>,
        gold_feed: Arc<dyn GoldFeed>,
        window: Duration,
    ) -> Self {
        Self {
            crypto_feed,
            forex_feed,
            gold_feed,
            crypto_cache: FeedCache::new("crypto", window),
            forex_cache: FeedCache::new("forex", window),
            gold_cache: FeedCache::new("gold", window),
        }
    }

    /// Crypto listings, fresh or stale. Errors only when the feed fails
    /// before any data was ever cached.
    pub async fn crypto(&self) -> Result<Vec<CryptoQuote>> {
        self.crypto_cache
            .get_or_refresh(|| self.crypto_feed.fetch_listings())
            .await
    }

    /// Derived currency rates, fresh or stale. Errors only on a cold feed.
    pub async fn forex(&self) -> Result<ForexTable> {
        self.forex_cache
            .get_or_refresh(|| self.forex_feed.fetch_rates())
            .await
    }

    /// Spot gold. Never fails: a cold feed failure yields the baseline.
    pub async fn gold(&self) -> GoldQuote {
        match self
            .gold_cache
            .get_or_refresh(|| self.gold_feed.fetch_spot())
            .await
        {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Gold feed unavailable, serving baseline quote: {e:#}");
                GOLD_BASELINE
            }
        }
    }

    /// Gathers all three feeds concurrently. A failing feed degrades to its
    /// empty default instead of poisoning the others, so the snapshot itself
    /// never fails.
    pub async fn snapshot(&self) -> MarketSnapshot {
        let (crypto, forex, gold) = futures::join!(self.crypto(), self.forex(), self.gold());

        let crypto = crypto.unwrap_or_else(|e| {
            warn!("Crypto feed unavailable: {e:#}");
            Vec::new()
        });
        let forex = forex.unwrap_or_else(|e| {
            warn!("Forex feed unavailable: {e:#}");
            ForexTable::new()
        });

        MarketSnapshot { crypto, forex, gold }
    }
}
