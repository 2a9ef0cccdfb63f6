use anyhow::Result;
use coinwatch::storage::{JsonFileStore, KeyValueStore};
use tempfile::TempDir;

#[tokio::test]
async fn set_then_get_roundtrips() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());

    store.set("CACHED_USDT", "105000").await?;
    assert_eq!(store.get("CACHED_USDT").await?.as_deref(), Some("105000"));

    Ok(())
}

#[tokio::test]
async fn missing_file_reads_as_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());

    assert_eq!(store.get("CACHED_PRICES").await?, None);

    Ok(())
}

#[tokio::test]
async fn values_survive_reopening_the_store() -> Result<()> {
    let dir = TempDir::new()?;

    {
        let store = JsonFileStore::new(dir.path());
        store.set("CACHED_PRICES", r#"{"bitcoin":{"usd":1.0}}"#).await?;
        store.set("CACHED_USDT", "105000").await?;
    }

    let reopened = JsonFileStore::new(dir.path());
    assert_eq!(
        reopened.get("CACHED_PRICES").await?.as_deref(),
        Some(r#"{"bitcoin":{"usd":1.0}}"#)
    );
    assert_eq!(reopened.get("CACHED_USDT").await?.as_deref(), Some("105000"));

    Ok(())
}

#[tokio::test]
async fn overwrite_replaces_only_that_key() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());

    store.set("CACHED_USDT", "105000").await?;
    store.set("CACHED_PRICES", "{}").await?;
    store.set("CACHED_USDT", "98000").await?;

    assert_eq!(store.get("CACHED_USDT").await?.as_deref(), Some("98000"));
    assert_eq!(store.get("CACHED_PRICES").await?.as_deref(), Some("{}"));

    Ok(())
}

#[tokio::test]
async fn corrupt_cache_file_reads_empty_and_recovers() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("cache.json"), "{definitely not json")?;

    let store = JsonFileStore::new(dir.path());
    assert_eq!(store.get("CACHED_USDT").await?, None);

    store.set("CACHED_USDT", "105000").await?;
    assert_eq!(store.get("CACHED_USDT").await?.as_deref(), Some("105000"));

    Ok(())
}

#[tokio::test]
async fn missing_base_directory_is_created_on_first_set() -> Result<()> {
    let dir = TempDir::new()?;
    let nested = dir.path().join("data").join("coinwatch");
    let store = JsonFileStore::new(&nested);

    store.set("CACHED_USDT", "105000").await?;
    assert_eq!(store.get("CACHED_USDT").await?.as_deref(), Some("105000"));

    Ok(())
}
