use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::market::{ForexFeed, ForexTable};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Currencies requested against a USD base, in one call.
const RATE_SYMBOLS: &str = "TRY,EUR,GBP,JPY,CAD,AUD,CHF,CNY,NZD,SEK,KRW,SGD,NOK,MXN,INR,ZAR,BRL";

// Pairs quoted directly as USD/CCY
const DIRECT: [&str; 13] = [
    "TRY", "JPY", "CAD", "CHF", "CNY", "SEK", "KRW", "SGD", "NOK", "MXN", "INR", "ZAR", "BRL",
];
// Pairs conventionally quoted the other way around, as CCY/USD
const INVERTED: [&str; 4] = ["EUR", "GBP", "AUD", "NZD"];
// Cross rates against the lira
const CROSS_TRY: [&str; 2] = ["EUR", "GBP"];

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Currency rates via a frankfurter-style base-USD endpoint.
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.to_string(),
        }
    }
}

/// Expands the raw base-USD rate table into display pairs. A currency
/// missing upstream drops only the pairs that need it.
fn derive_pairs(rates: &HashMap<String, f64>) -> ForexTable {
    let mut table = ForexTable::new();

    for ccy in DIRECT {
        if let Some(rate) = rates.get(ccy) {
            table.insert(format!("USD/{ccy}"), *rate);
        }
    }

    for ccy in INVERTED {
        if let Some(rate) = rates.get(ccy) {
            if *rate > 0.0 {
                table.insert(format!("{ccy}/USD"), 1.0 / *rate);
            }
        }
    }

    if let Some(try_rate) = rates.get("TRY") {
        for ccy in CROSS_TRY {
            if let Some(rate) = rates.get(ccy) {
                if *rate > 0.0 {
                    table.insert(format!("{ccy}/TRY"), *try_rate / *rate);
                }
            }
        }
    }

    table
}

#[async_trait]
impl ForexFeed for FrankfurterProvider {
    #[instrument(name = "ForexRatesFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<ForexTable> {
        let url = format!("{}/latest?from=USD&to={}", self.base_url, RATE_SYMBOLS);
        debug!("Requesting currency rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fintick/1.0")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Currency rates request failed for URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from currency rates endpoint",
                response.status()
            ));
        }

        let text = response.text().await?;
        let data: RatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse currency rates response: {e}"))?;

        let table = derive_pairs(&data.rates);
        debug!("Derived {} currency pairs", table.len());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_derive_direct_inverted_and_cross_pairs() {
        let rates = HashMap::from([("TRY".to_string(), 30.0), ("EUR".to_string(), 0.9)]);

        let table = derive_pairs(&rates);
        assert_eq!(table["USD/TRY"], 30.0);
        assert!((table["EUR/USD"] - 1.0 / 0.9).abs() < 1e-9);
        assert!((table["EUR/TRY"] - 30.0 / 0.9).abs() < 1e-9);
        // No GBP upstream, so no GBP pairs
        assert!(!table.contains_key("GBP/USD"));
        assert!(!table.contains_key("GBP/TRY"));
    }

    #[test]
    fn test_derive_skips_pairs_with_missing_inputs() {
        let rates = HashMap::from([("EUR".to_string(), 0.9), ("JPY".to_string(), 150.0)]);

        let table = derive_pairs(&rates);
        assert_eq!(table["USD/JPY"], 150.0);
        assert!(table.contains_key("EUR/USD"));
        // Lira is absent, so direct and cross lira pairs are dropped
        assert!(!table.contains_key("USD/TRY"));
        assert!(!table.contains_key("EUR/TRY"));
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "amount": 1.0,
            "base": "USD",
            "date": "2026-08-21",
            "rates": {
                "TRY": 34.5, "EUR": 0.92, "GBP": 0.79, "JPY": 149.8,
                "CAD": 1.36, "AUD": 1.52, "CHF": 0.88, "CNY": 7.24,
                "NZD": 1.66, "SEK": 10.5, "KRW": 1370.0, "SGD": 1.34,
                "NOK": 10.6, "MXN": 17.1, "INR": 83.9, "ZAR": 18.2, "BRL": 5.6
            }
        }"#;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .and(query_param("to", RATE_SYMBOLS))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let table = provider.fetch_rates().await.unwrap();

        // 13 direct + 4 inverted + 2 lira crosses
        assert_eq!(table.len(), 19);
        assert_eq!(table["USD/TRY"], 34.5);
        assert!((table["EUR/USD"] - 1.0 / 0.92).abs() < 1e-9);
        assert!((table["GBP/TRY"] - 34.5 / 0.79).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.fetch_rates().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 503 Service Unavailable from currency rates endpoint"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ratez": {}}"#))
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.fetch_rates().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse currency rates response")
        );
    }
}
