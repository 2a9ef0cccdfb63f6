//! The data-refresh core: three independently refreshed facets (spot
//! prices, logo URLs, fiat rate), each governed by the same
//! fetch-or-fallback discipline.
//!
//! Invariants:
//! - the cache is written only after a successful, non-empty fetch; a
//!   failed refresh never clobbers the last good value,
//! - no facet failure escapes `refresh` — failures become the facet's
//!   offline flag,
//! - facets are independent; one can be fresh while another is stale.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::coins::TRACKED_COINS;
use crate::feed::{
    CoinDetail, CoinDetailSource, FiatRateSource, LogoSource, PriceRecord, SpotPriceSource,
};
use crate::storage::KeyValueStore;

pub const PRICES_CACHE_KEY: &str = "CACHED_PRICES";
pub const LOGOS_CACHE_KEY: &str = "CACHED_LOGOS";
pub const USDT_CACHE_KEY: &str = "CACHED_USDT";

/// Rate used when neither the network nor the cache has ever produced
/// one. Never persisted.
pub const DEFAULT_USDT_RATE: f64 = 105_000.0;

/// Per-facet offline flags plus the freshest price timestamp, for the
/// presentation layer's stale-data markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStatus {
    pub prices_offline: bool,
    pub logos_offline: bool,
    pub rate_offline: bool,
    pub prices_updated_at: Option<DateTime<Utc>>,
}

struct Facet<T> {
    value: T,
    offline: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl<T: Default> Default for Facet<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            offline: false,
            updated_at: None,
        }
    }
}

impl<T> Facet<T> {
    fn apply(&mut self, value: T, now: DateTime<Utc>) {
        self.value = value;
        self.offline = false;
        self.updated_at = Some(now);
    }
}

pub struct PriceDataStore {
    cache: Arc<dyn KeyValueStore>,
    spot_source: Arc<dyn SpotPriceSource>,
    logo_source: Arc<dyn LogoSource>,
    rate_source: Arc<dyn FiatRateSource>,
    detail_source: Arc<dyn CoinDetailSource>,
    coin_ids: Vec<String>,
    fallback_rate: f64,
    clock: Arc<dyn Clock>,

    prices: RwLock<Facet<HashMap<String, PriceRecord>>>,
    logos: RwLock<Facet<HashMap<String, String>>>,
    rate: RwLock<Facet<Option<f64>>>,
    // Per-coin detail, memory-only: the cache layout stays three keys.
    details: RwLock<HashMap<String, CoinDetail>>,
}

impl PriceDataStore {
    pub fn new(
        cache: Arc<dyn KeyValueStore>,
        spot_source: Arc<dyn SpotPriceSource>,
        logo_source: Arc<dyn LogoSource>,
        rate_source: Arc<dyn FiatRateSource>,
        detail_source: Arc<dyn CoinDetailSource>,
    ) -> Self {
        Self {
            cache,
            spot_source,
            logo_source,
            rate_source,
            detail_source,
            coin_ids: TRACKED_COINS.iter().map(|id| id.to_string()).collect(),
            fallback_rate: DEFAULT_USDT_RATE,
            clock: Arc::new(SystemClock),
            prices: RwLock::default(),
            logos: RwLock::default(),
            rate: RwLock::default(),
            details: RwLock::default(),
        }
    }

    pub fn with_coins(mut self, ids: Vec<String>) -> Self {
        self.coin_ids = ids;
        self
    }

    pub fn with_fallback_rate(mut self, rate: f64) -> Self {
        self.fallback_rate = rate;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Ids this store refreshes, in display order.
    pub fn coin_ids(&self) -> &[String] {
        &self.coin_ids
    }

    /// One-time startup: install whatever the cache holds so the first
    /// render has data, then refresh from the network.
    ///
    /// An empty or unreadable cache entry is not an error; the facet
    /// simply starts absent.
    pub async fn bootstrap(&self) {
        self.restore_from_cache().await;
        self.refresh().await;
    }

    /// Refresh all three facets concurrently. Each facet settles on its
    /// own; a failure marks that facet offline and leaves its value and
    /// cache entry untouched. Never fails.
    pub async fn refresh(&self) {
        debug!("refreshing facets");
        tokio::join!(self.refresh_prices(), self.refresh_logos(), self.refresh_rate());
    }

    async fn restore_from_cache(&self) {
        if let Some(raw) = self.read_cache(PRICES_CACHE_KEY).await {
            match serde_json::from_str::<HashMap<String, PriceRecord>>(&raw) {
                Ok(map) if !map.is_empty() => {
                    debug!(coins = map.len(), "restored cached prices");
                    self.prices.write().await.value = map;
                }
                Ok(_) => {}
                Err(err) => warn!(error = %err, "ignoring unparseable cached prices"),
            }
        }

        if let Some(raw) = self.read_cache(LOGOS_CACHE_KEY).await {
            match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) if !map.is_empty() => {
                    debug!(coins = map.len(), "restored cached logos");
                    self.logos.write().await.value = map;
                }
                Ok(_) => {}
                Err(err) => warn!(error = %err, "ignoring unparseable cached logos"),
            }
        }

        if let Some(raw) = self.read_cache(USDT_CACHE_KEY).await {
            match raw.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate > 0.0 => {
                    debug!(rate, "restored cached usdt rate");
                    self.rate.write().await.value = Some(rate);
                }
                _ => warn!(raw = %raw, "ignoring unparseable cached usdt rate"),
            }
        }
    }

    async fn read_cache(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(raw)) if !raw.is_empty() => Some(raw),
            Ok(_) => None,
            Err(err) => {
                warn!(key, error = %err, "cache read failed");
                None
            }
        }
    }

    /// Persist a facet payload. A cache write failure is logged and
    /// otherwise ignored: the fetch itself succeeded, so the in-memory
    /// value is fresh and the offline flag stays clear.
    async fn write_cache(&self, key: &str, value: &str) {
        if let Err(err) = self.cache.set(key, value).await {
            warn!(key, error = %err, "cache write failed");
        }
    }

    async fn refresh_prices(&self) {
        let ids: Vec<&str> = self.coin_ids.iter().map(String::as_str).collect();
        match self.spot_source.fetch_spot_prices(&ids).await {
            Ok(map) if !map.is_empty() => {
                let serialized = serde_json::to_string(&map);
                let count = map.len();
                self.prices.write().await.apply(map, self.clock.now());
                info!(coins = count, source = self.spot_source.name(), "spot prices refreshed");
                match serialized {
                    Ok(raw) => self.write_cache(PRICES_CACHE_KEY, &raw).await,
                    Err(err) => warn!(error = %err, "failed to serialize price map"),
                }
            }
            Ok(_) => {
                warn!(source = self.spot_source.name(), "empty price payload, keeping last known");
                self.prices.write().await.offline = true;
            }
            Err(err) => {
                warn!(source = self.spot_source.name(), error = %err, "spot price fetch failed");
                self.prices.write().await.offline = true;
            }
        }
    }

    async fn refresh_logos(&self) {
        let ids: Vec<&str> = self.coin_ids.iter().map(String::as_str).collect();
        match self.logo_source.fetch_logos(&ids).await {
            Ok(map) if !map.is_empty() => {
                let serialized = serde_json::to_string(&map);
                let count = map.len();
                self.logos.write().await.apply(map, self.clock.now());
                info!(coins = count, source = self.logo_source.name(), "logos refreshed");
                match serialized {
                    Ok(raw) => self.write_cache(LOGOS_CACHE_KEY, &raw).await,
                    Err(err) => warn!(error = %err, "failed to serialize logo map"),
                }
            }
            Ok(_) => {
                warn!(source = self.logo_source.name(), "empty logo payload, keeping last known");
                self.logos.write().await.offline = true;
            }
            Err(err) => {
                warn!(source = self.logo_source.name(), error = %err, "logo fetch failed");
                self.logos.write().await.offline = true;
            }
        }
    }

    async fn refresh_rate(&self) {
        match self.rate_source.fetch_usdt_rate().await {
            Ok(rate) => {
                self.rate.write().await.apply(Some(rate), self.clock.now());
                info!(rate, source = self.rate_source.name(), "usdt rate refreshed");
                self.write_cache(USDT_CACHE_KEY, &rate.to_string()).await;
            }
            Err(err) => {
                warn!(source = self.rate_source.name(), error = %err, "usdt rate fetch failed");
                let mut facet = self.rate.write().await;
                facet.offline = true;
                // With nothing cached and nothing fetched the UI still
                // needs a rate; the constant stays out of the cache.
                if facet.value.is_none() {
                    facet.value = Some(self.fallback_rate);
                }
            }
        }
    }

    /// Spot quote for a coin. Absent for unknown ids and before the
    /// first successful refresh; never an error.
    pub async fn price(&self, id: &str) -> Option<PriceRecord> {
        self.prices.read().await.value.get(id).copied()
    }

    pub async fn prices(&self) -> HashMap<String, PriceRecord> {
        self.prices.read().await.value.clone()
    }

    pub async fn logo(&self, id: &str) -> Option<String> {
        self.logos.read().await.value.get(id).cloned()
    }

    pub async fn logos(&self) -> HashMap<String, String> {
        self.logos.read().await.value.clone()
    }

    /// USDT to toman rate: last fetched, else last cached, else the
    /// fallback constant once a refresh has been attempted.
    pub async fn usdt_rate(&self) -> Option<f64> {
        self.rate.read().await.value
    }

    /// Price of a coin in toman (`usd × rate`). Absent while either
    /// side is missing.
    pub async fn toman_price(&self, id: &str) -> Option<f64> {
        let usd = self.price(id).await?.usd?;
        let rate = self.usdt_rate().await?;
        Some(usd * rate)
    }

    /// Drop a single logo entry after the rendering layer found its URL
    /// unreachable. Other entries and the cache stay untouched; the next
    /// successful refresh restores it.
    pub async fn evict_logo(&self, id: &str) {
        let mut logos = self.logos.write().await;
        if logos.value.remove(id).is_some() {
            debug!(coin = id, "evicted broken logo");
        }
    }

    /// True once any price data exists (fetched or restored). When false
    /// after a refresh, the presentation layer shows the blocking
    /// error-with-retry screen.
    pub async fn has_price_data(&self) -> bool {
        !self.prices.read().await.value.is_empty()
    }

    pub async fn status(&self) -> StoreStatus {
        let prices = self.prices.read().await;
        let logos = self.logos.read().await;
        let rate = self.rate.read().await;
        StoreStatus {
            prices_offline: prices.offline,
            logos_offline: logos.offline,
            rate_offline: rate.offline,
            prices_updated_at: prices.updated_at,
        }
    }

    /// Market detail for one coin, fetched on demand. Falls back to the
    /// last successful in-memory detail when the fetch fails; errors only
    /// when there is nothing at all to show.
    pub async fn coin_detail(&self, id: &str) -> Result<CoinDetail> {
        match self.detail_source.fetch_detail(id).await {
            Ok(detail) => {
                self.details
                    .write()
                    .await
                    .insert(id.to_string(), detail.clone());
                Ok(detail)
            }
            Err(err) => {
                if let Some(last_known) = self.details.read().await.get(id).cloned() {
                    debug!(coin = id, error = %err, "detail fetch failed, serving last known");
                    return Ok(last_known);
                }
                Err(err).with_context(|| format!("No detail available for {id}"))
            }
        }
    }
}
