//! CoinGecko price feed client
//!
//! Thin upstream collaborator: fetches the two spot quotes the daily
//! pipeline turns into prompt text. Failures here are transport errors and
//! abort the run.

use crate::config::FeedConfig;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Spot quotes for the two tracked assets, in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub btc: f64,
    pub eth: f64,
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: UsdPrice,
    ethereum: UsdPrice,
}

#[derive(Debug, Deserialize)]
struct UsdPrice {
    usd: f64,
}

pub struct PriceFeed {
    client: reqwest::Client,
    api_url: String,
}

impl PriceFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    /// Fetch current BTC and ETH spot prices.
    pub async fn fetch_prices(&self) -> Result<PriceQuote> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("ids", "bitcoin,ethereum"), ("vs_currencies", "usd")])
            .send()
            .await
            .context("Failed to fetch crypto prices")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Price feed returned {status}"));
        }

        let parsed: SimplePriceResponse = response
            .json()
            .await
            .context("Unexpected price feed response format")?;

        Ok(PriceQuote {
            btc: parsed.bitcoin.usd,
            eth: parsed.ethereum.usd,
        })
    }
}
