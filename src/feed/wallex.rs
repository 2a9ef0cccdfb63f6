//! Wallex client for the USDT to Iranian toman conversion rate.
//!
//! The rate comes from the exchange's public market listing; the quote of
//! interest is the `USDTTMN` symbol's last trade price, which the API
//! encodes as a string.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::FiatRateSource;

const WALLEX_API_BASE: &str = "https://api.wallex.ir";
const USDT_TMN_SYMBOL: &str = "USDTTMN";

/// Response for `/v1/markets`. Every level is optional so a reshaped
/// payload surfaces as a fetch failure instead of a panic or a bogus
/// zero rate.
#[derive(Debug, Deserialize)]
struct MarketsResponse {
    result: Option<MarketsResult>,
}

#[derive(Debug, Deserialize)]
struct MarketsResult {
    symbols: Option<HashMap<String, SymbolEntry>>,
}

#[derive(Debug, Deserialize)]
struct SymbolEntry {
    stats: Option<SymbolStats>,
}

#[derive(Debug, Deserialize)]
struct SymbolStats {
    #[serde(rename = "lastPrice")]
    last_price: Option<String>,
}

impl MarketsResponse {
    fn usdt_last_price(self) -> Option<String> {
        let mut symbols = self.result?.symbols?;
        symbols.remove(USDT_TMN_SYMBOL)?.stats?.last_price
    }
}

/// Wallex API client.
pub struct WallexClient {
    client: reqwest::Client,
    base_url: String,
}

impl WallexClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: WALLEX_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (configuration or mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for WallexClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FiatRateSource for WallexClient {
    async fn fetch_usdt_rate(&self) -> Result<f64> {
        let url = format!("{}/v1/markets", self.base_url);
        debug!(url = %url, "Wallex request");

        let response: MarketsResponse = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let raw = response
            .usdt_last_price()
            .ok_or_else(|| anyhow!("Wallex response has no {USDT_TMN_SYMBOL} last price"))?;

        let rate: f64 = raw
            .parse()
            .with_context(|| format!("Wallex {USDT_TMN_SYMBOL} last price is not numeric: {raw}"))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(anyhow!("Wallex {USDT_TMN_SYMBOL} rate out of range: {rate}"));
        }

        Ok(rate)
    }

    fn name(&self) -> &str {
        "wallex"
    }
}
