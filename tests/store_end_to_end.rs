//! Full-stack bootstrap against mock HTTP endpoints: real clients, real
//! disk cache, one mock server playing both APIs.

use std::sync::Arc;

use anyhow::Result;
use coinwatch::feed::{CoinGeckoClient, WallexClient};
use coinwatch::storage::{JsonFileStore, KeyValueStore};
use coinwatch::store::{PriceDataStore, PRICES_CACHE_KEY};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_all(server: &MockServer) {
    let prices = r#"{ "bitcoin": { "usd": 50000.0, "usd_24h_change": 2.5 } }"#;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(prices, "application/json"))
        .mount(server)
        .await;

    let markets = r#"[ { "id": "bitcoin", "image": "https://img.example/btc.png" } ]"#;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(markets, "application/json"))
        .mount(server)
        .await;

    let rate = r#"{ "result": { "symbols": { "USDTTMN": { "stats": { "lastPrice": "105000" } } } } }"#;
    Mock::given(method("GET"))
        .and(path("/v1/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(rate, "application/json"))
        .mount(server)
        .await;
}

fn build_store(server: &MockServer, dir: &TempDir) -> PriceDataStore {
    let coingecko = Arc::new(CoinGeckoClient::new().with_base_url(server.uri()));
    let wallex = Arc::new(WallexClient::new().with_base_url(server.uri()));
    let cache = Arc::new(JsonFileStore::new(dir.path()));

    PriceDataStore::new(cache, coingecko.clone(), coingecko.clone(), wallex, coingecko)
}

#[tokio::test]
async fn bootstrap_fetches_all_facets_and_fills_the_disk_cache() -> Result<()> {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let dir = TempDir::new()?;

    let store = build_store(&server, &dir);
    store.bootstrap().await;

    assert_eq!(store.price("bitcoin").await.and_then(|r| r.usd), Some(50_000.0));
    assert_eq!(store.logo("bitcoin").await.as_deref(), Some("https://img.example/btc.png"));
    assert_eq!(store.usdt_rate().await, Some(105_000.0));
    assert_eq!(store.toman_price("bitcoin").await, Some(5_250_000_000.0));

    let status = store.status().await;
    assert!(!status.prices_offline && !status.logos_offline && !status.rate_offline);

    // The disk cache now holds the payloads.
    let cache = JsonFileStore::new(dir.path());
    assert!(cache.get(PRICES_CACHE_KEY).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn second_run_serves_the_disk_cache_when_endpoints_die() -> Result<()> {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let dir = TempDir::new()?;

    // First run populates the cache.
    let store = build_store(&server, &dir);
    store.bootstrap().await;
    drop(store);
    drop(server);

    // Second run: a fresh server that only answers errors.
    let dead = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&dead)
        .await;

    let store = build_store(&dead, &dir);
    store.bootstrap().await;

    assert_eq!(store.price("bitcoin").await.and_then(|r| r.usd), Some(50_000.0));
    assert_eq!(store.usdt_rate().await, Some(105_000.0));
    assert!(store.status().await.prices_offline);

    Ok(())
}
