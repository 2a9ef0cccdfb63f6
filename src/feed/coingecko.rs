//! CoinGecko client: spot prices, logo URLs, and per-coin market detail.
//!
//! Uses three of CoinGecko's free endpoints: `/simple/price` for the
//! tracked list's quotes, `/coins/markets` for logo image URLs, and
//! `/coins/{id}` for the detail view. No API key is required, though
//! rate limits apply.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::debug;

use super::{CoinDetail, CoinDetailSource, LogoSource, PriceRecord, SpotPriceSource};

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
const USER_AGENT: &str = concat!("coinwatch/", env!("CARGO_PKG_VERSION"));

/// One row of the `/coins/markets` listing. Only the fields the logo
/// facet consumes are modeled.
#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: String,
    image: Option<String>,
}

/// Response for `/coins/{id}`.
#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    name: String,
    symbol: String,
    market_data: Option<MarketData>,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: Option<HashMap<String, f64>>,
    price_change_percentage_24h: Option<f64>,
    high_24h: Option<HashMap<String, f64>>,
    low_24h: Option<HashMap<String, f64>>,
    total_volume: Option<HashMap<String, f64>>,
    market_cap: Option<HashMap<String, f64>>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    max_supply: Option<f64>,
}

fn usd(map: &Option<HashMap<String, f64>>) -> Option<f64> {
    map.as_ref().and_then(|m| m.get("usd")).copied()
}

impl CoinResponse {
    /// Convert into the domain detail type, failing closed when a field
    /// the detail view depends on is missing. Total and max supply are
    /// genuinely absent for some coins and default to zero.
    fn into_detail(self) -> Result<CoinDetail> {
        let id = self.id;
        let market_data = self
            .market_data
            .ok_or_else(|| anyhow!("CoinGecko detail for {id} has no market data"))?;

        fn required(value: Option<f64>, id: &str, field: &str) -> Result<f64> {
            value.ok_or_else(|| anyhow!("CoinGecko detail for {id} is missing {field}"))
        }

        let price_usd = required(usd(&market_data.current_price), &id, "current_price.usd")?;
        let change_24h = required(
            market_data.price_change_percentage_24h,
            &id,
            "price_change_percentage_24h",
        )?;
        let high_24h = required(usd(&market_data.high_24h), &id, "high_24h.usd")?;
        let low_24h = required(usd(&market_data.low_24h), &id, "low_24h.usd")?;
        let volume_24h = required(usd(&market_data.total_volume), &id, "total_volume.usd")?;
        let market_cap = required(usd(&market_data.market_cap), &id, "market_cap.usd")?;
        let circulating_supply =
            required(market_data.circulating_supply, &id, "circulating_supply")?;

        Ok(CoinDetail {
            id,
            name: self.name,
            symbol: self.symbol.to_uppercase(),
            price_usd,
            change_24h,
            high_24h,
            low_24h,
            volume_24h,
            market_cap,
            circulating_supply,
            total_supply: market_data.total_supply.unwrap_or(0.0),
            max_supply: market_data.max_supply.unwrap_or(0.0),
        })
    }
}

/// CoinGecko API client.
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: COINGECKO_API_BASE.to_string(),
        }
    }

    /// Creates a client with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: COINGECKO_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (configuration or mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "CoinGecko request");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("CoinGecko API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SpotPriceSource for CoinGeckoClient {
    async fn fetch_spot_prices(&self, ids: &[&str]) -> Result<HashMap<String, PriceRecord>> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            self.base_url,
            ids.join(",")
        );
        self.get_json(&url).await
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}

#[async_trait::async_trait]
impl LogoSource for CoinGeckoClient {
    async fn fetch_logos(&self, ids: &[&str]) -> Result<HashMap<String, String>> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&ids={}&order=market_cap_desc&per_page=100&page=1&sparkline=false&price_change_percentage=24h",
            self.base_url,
            ids.join(",")
        );
        let entries: Vec<MarketEntry> = self.get_json(&url).await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| entry.image.map(|image| (entry.id, image)))
            .collect())
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}

#[async_trait::async_trait]
impl CoinDetailSource for CoinGeckoClient {
    async fn fetch_detail(&self, id: &str) -> Result<CoinDetail> {
        let url = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false",
            self.base_url, id
        );
        let response: CoinResponse = self.get_json(&url).await?;
        response.into_detail()
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}
