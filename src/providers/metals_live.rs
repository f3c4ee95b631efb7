use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::market::{GoldFeed, GoldQuote};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SpotItem {
    price: f64,
    #[serde(default)]
    ch: f64,
    #[serde(default)]
    chp: f64,
}

/// Spot gold via a metals.live-style endpoint. The response is an array of
/// spot entries; only the first one matters.
pub struct MetalsLiveProvider {
    base_url: String,
}

impl MetalsLiveProvider {
    pub fn new(base_url: &str) -> Self {
        MetalsLiveProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl GoldFeed for MetalsLiveProvider {
    #[instrument(name = "GoldSpotFetch", skip(self))]
    async fn fetch_spot(&self) -> Result<GoldQuote> {
        let url = format!("{}/v1/spot/gold", self.base_url);
        debug!("Requesting gold spot price from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fintick/1.0")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Gold spot request failed for URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from gold spot endpoint",
                response.status()
            ));
        }

        let items = response
            .json::<Vec<SpotItem>>()
            .await
            .context("Failed to parse gold spot response")?;
        let spot = items
            .first()
            .ok_or_else(|| anyhow!("Empty gold spot response"))?;

        Ok(GoldQuote {
            price: spot.price,
            change: spot.ch,
            change_percent: spot.chp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/spot/gold"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_spot_fetch() {
        let mock_server =
            create_mock_server(r#"[{"price": 2714.3, "ch": 12.4, "chp": 0.46}]"#).await;
        let provider = MetalsLiveProvider::new(&mock_server.uri());

        let quote = provider.fetch_spot().await.unwrap();
        assert_eq!(quote.price, 2714.3);
        assert_eq!(quote.change, 12.4);
        assert_eq!(quote.change_percent, 0.46);
    }

    #[tokio::test]
    async fn test_missing_change_fields_default_to_zero() {
        let mock_server = create_mock_server(r#"[{"price": 2714.3}]"#).await;
        let provider = MetalsLiveProvider::new(&mock_server.uri());

        let quote = provider.fetch_spot().await.unwrap();
        assert_eq!(quote.price, 2714.3);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[tokio::test]
    async fn test_empty_spot_array() {
        let mock_server = create_mock_server("[]").await;
        let provider = MetalsLiveProvider::new(&mock_server.uri());

        let result = provider.fetch_spot().await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Empty gold spot response");
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/spot/gold"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let provider = MetalsLiveProvider::new(&mock_server.uri());
        let result = provider.fetch_spot().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 502 Bad Gateway from gold spot endpoint"
        );
    }
}
