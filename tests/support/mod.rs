//! Shared fixtures for the integration tests: programmable feed sources
//! whose health can be toggled between calls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use coinwatch::feed::{
    CoinDetail, CoinDetailSource, FiatRateSource, LogoSource, PriceRecord, SpotPriceSource,
};

pub fn price_record(usd: f64, change: f64) -> PriceRecord {
    PriceRecord {
        usd: Some(usd),
        usd_24h_change: Some(change),
    }
}

pub fn price_map(entries: &[(&str, f64, f64)]) -> HashMap<String, PriceRecord> {
    entries
        .iter()
        .map(|(id, usd, change)| (id.to_string(), price_record(*usd, *change)))
        .collect()
}

pub fn logo_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(id, url)| (id.to_string(), url.to_string()))
        .collect()
}

pub fn detail(id: &str, price: f64) -> CoinDetail {
    CoinDetail {
        id: id.to_string(),
        name: id.to_string(),
        symbol: id.to_uppercase(),
        price_usd: price,
        change_24h: 1.0,
        high_24h: price * 1.1,
        low_24h: price * 0.9,
        volume_24h: 1_000.0,
        market_cap: 10_000.0,
        circulating_supply: 100.0,
        total_supply: 100.0,
        max_supply: 100.0,
    }
}

/// Spot source with togglable health and a call counter.
pub struct ToggleSpot {
    prices: Mutex<HashMap<String, PriceRecord>>,
    healthy: AtomicBool,
    calls: AtomicUsize,
}

impl ToggleSpot {
    pub fn healthy(prices: HashMap<String, PriceRecord>) -> Self {
        Self {
            prices: Mutex::new(prices),
            healthy: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let source = Self::healthy(HashMap::new());
        source.healthy.store(false, Ordering::SeqCst);
        source
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_prices(&self, prices: HashMap<String, PriceRecord>) {
        *self.prices.lock().unwrap() = prices;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SpotPriceSource for ToggleSpot {
    async fn fetch_spot_prices(&self, _ids: &[&str]) -> Result<HashMap<String, PriceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy.load(Ordering::SeqCst) {
            Ok(self.prices.lock().unwrap().clone())
        } else {
            Err(anyhow!("prices endpoint unreachable"))
        }
    }

    fn name(&self) -> &str {
        "toggle-spot"
    }
}

/// Spot source that answers queued responses in order, each after its own
/// delay, to pin down settle ordering in concurrency tests.
pub struct SequencedSpot {
    responses: Mutex<Vec<(Duration, HashMap<String, PriceRecord>)>>,
}

impl SequencedSpot {
    pub fn new(responses: Vec<(Duration, HashMap<String, PriceRecord>)>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait::async_trait]
impl SpotPriceSource for SequencedSpot {
    async fn fetch_spot_prices(&self, _ids: &[&str]) -> Result<HashMap<String, PriceRecord>> {
        let (delay, prices) = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(anyhow!("no responses left"));
            }
            responses.remove(0)
        };
        tokio::time::sleep(delay).await;
        Ok(prices)
    }

    fn name(&self) -> &str {
        "sequenced-spot"
    }
}

/// Logo source with togglable health.
pub struct ToggleLogos {
    logos: Mutex<HashMap<String, String>>,
    healthy: AtomicBool,
}

impl ToggleLogos {
    pub fn healthy(logos: HashMap<String, String>) -> Self {
        Self {
            logos: Mutex::new(logos),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn failing() -> Self {
        let source = Self::healthy(HashMap::new());
        source.healthy.store(false, Ordering::SeqCst);
        source
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_logos(&self, logos: HashMap<String, String>) {
        *self.logos.lock().unwrap() = logos;
    }
}

#[async_trait::async_trait]
impl LogoSource for ToggleLogos {
    async fn fetch_logos(&self, _ids: &[&str]) -> Result<HashMap<String, String>> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(self.logos.lock().unwrap().clone())
        } else {
            Err(anyhow!("markets endpoint unreachable"))
        }
    }

    fn name(&self) -> &str {
        "toggle-logos"
    }
}

/// Fiat-rate source with togglable health.
pub struct ToggleRate {
    rate: Mutex<f64>,
    healthy: AtomicBool,
}

impl ToggleRate {
    pub fn healthy(rate: f64) -> Self {
        Self {
            rate: Mutex::new(rate),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn failing() -> Self {
        let source = Self::healthy(0.0);
        source.healthy.store(false, Ordering::SeqCst);
        source
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_rate(&self, rate: f64) {
        *self.rate.lock().unwrap() = rate;
    }
}

#[async_trait::async_trait]
impl FiatRateSource for ToggleRate {
    async fn fetch_usdt_rate(&self) -> Result<f64> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(*self.rate.lock().unwrap())
        } else {
            Err(anyhow!("rate endpoint unreachable"))
        }
    }

    fn name(&self) -> &str {
        "toggle-rate"
    }
}

/// Detail source with togglable health.
pub struct ToggleDetail {
    detail: Mutex<CoinDetail>,
    healthy: AtomicBool,
}

impl ToggleDetail {
    pub fn healthy(detail: CoinDetail) -> Self {
        Self {
            detail: Mutex::new(detail),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn failing() -> Self {
        let source = Self::healthy(detail("none", 0.0));
        source.healthy.store(false, Ordering::SeqCst);
        source
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl CoinDetailSource for ToggleDetail {
    async fn fetch_detail(&self, id: &str) -> Result<CoinDetail> {
        if self.healthy.load(Ordering::SeqCst) {
            let mut detail = self.detail.lock().unwrap().clone();
            detail.id = id.to_string();
            Ok(detail)
        } else {
            Err(anyhow!("detail endpoint unreachable"))
        }
    }

    fn name(&self) -> &str {
        "toggle-detail"
    }
}
