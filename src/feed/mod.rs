mod coingecko;
mod wallex;

pub use coingecko::CoinGeckoClient;
pub use wallex::WallexClient;

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Per-asset spot quote as returned by the prices endpoint.
///
/// Both fields can be absent for thinly traded coins; consumers render a
/// placeholder rather than treating absence as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_24h_change: Option<f64>,
}

/// Per-asset market statistics for the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price_usd: f64,
    pub change_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    pub max_supply: f64,
}

#[async_trait::async_trait]
pub trait SpotPriceSource: Send + Sync {
    async fn fetch_spot_prices(&self, ids: &[&str]) -> Result<HashMap<String, PriceRecord>>;

    fn name(&self) -> &str;
}

#[async_trait::async_trait]
pub trait LogoSource: Send + Sync {
    /// Fetch image URLs keyed by coin id.
    async fn fetch_logos(&self, ids: &[&str]) -> Result<HashMap<String, String>>;

    fn name(&self) -> &str;
}

#[async_trait::async_trait]
pub trait FiatRateSource: Send + Sync {
    /// Fetch the USDT to local-fiat conversion rate.
    async fn fetch_usdt_rate(&self) -> Result<f64>;

    fn name(&self) -> &str;
}

#[async_trait::async_trait]
pub trait CoinDetailSource: Send + Sync {
    async fn fetch_detail(&self, id: &str) -> Result<CoinDetail>;

    fn name(&self) -> &str;
}
