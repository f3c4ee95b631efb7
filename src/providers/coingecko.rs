use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::market::{CryptoFeed, CryptoQuote};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracked asset ids, requested in a single listings call.
const COIN_IDS: &str = "bitcoin,ethereum,solana,avalanche-2,ripple,cardano,dogecoin,polkadot,tron,chainlink,matic-network,shiba-inu,litecoin,bitcoin-cash,uniswap,stellar,cosmos,monero,ethereum-classic,internet-computer,filecoin,hedera-hashgraph,aptos,arbitrum,optimism,near,kaspa,render-token,pepe,bonk,dogwifhat,floki,injective-protocol,theta-token,fantom,the-graph,maker,aave";

/// Crypto listings via the CoinGecko markets endpoint.
pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl CryptoFeed for CoinGeckoProvider {
    #[instrument(name = "CryptoListingsFetch", skip(self))]
    async fn fetch_listings(&self) -> Result<Vec<CryptoQuote>> {
        let url = format!(
            "{}/api/v3/coins/markets?vs_currency=usd&ids={}&order=market_cap_desc&per_page=50&page=1&sparkline=false",
            self.base_url, COIN_IDS
        );
        debug!("Requesting crypto listings from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fintick/1.0")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Crypto listings request failed for URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from crypto listings endpoint",
                response.status()
            ));
        }

        // The quote struct mirrors the wire shape, listings pass through as-is
        let listings = response
            .json::<Vec<CryptoQuote>>()
            .await
            .context("Failed to parse crypto listings response")?;

        debug!("Received {} crypto listings", listings.len());
        Ok(listings)
    }
}
