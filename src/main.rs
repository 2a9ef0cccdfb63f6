use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use coinwatch::coins::{self, display_name};
use coinwatch::config::{default_config_path, ResolvedConfig};
use coinwatch::duration::format_duration;
use coinwatch::feed::{CoinGeckoClient, WallexClient};
use coinwatch::format::{format_change, format_toman, format_usd, PLACEHOLDER};
use coinwatch::prefs::{Language, Preferences, Theme};
use coinwatch::storage::JsonFileStore;
use coinwatch::store::{Poller, PriceDataStore};
use coinwatch::update::UpdateChecker;

#[derive(Parser)]
#[command(name = "coinwatch")]
#[command(about = "Crypto price tracker with offline fallback")]
struct Cli {
    /// Path to config file (defaults to ./coinwatch.toml, then the XDG
    /// data directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and show the tracked coins with USD and toman prices
    Prices,
    /// Keep refreshing at the configured interval until interrupted
    Watch,
    /// Show market detail for one coin id (e.g. "bitcoin")
    Detail { coin: String },
    /// Filter the tracked coin list by substring
    Search { query: String },
    /// Check whether a newer release is published
    CheckUpdate,
    /// Set the display language ("en" or "fa")
    SetLanguage { language: String },
    /// Set the theme ("light" or "dark")
    SetTheme { theme: String },
    /// Show current configuration
    Config,
}

fn build_store(config: &ResolvedConfig, cache: Arc<JsonFileStore>) -> Arc<PriceDataStore> {
    let coingecko = Arc::new(
        CoinGeckoClient::new().with_base_url(config.endpoints.coingecko_base.clone()),
    );
    let wallex = Arc::new(WallexClient::new().with_base_url(config.endpoints.wallex_base.clone()));

    Arc::new(
        PriceDataStore::new(
            cache,
            coingecko.clone(),
            coingecko.clone(),
            wallex,
            coingecko,
        )
        .with_fallback_rate(config.fallback_usdt_rate),
    )
}

async fn render_prices(store: &PriceDataStore, language: Language) -> Result<()> {
    let status = store.status().await;

    if !store.has_price_data().await {
        anyhow::bail!(
            "No price data available yet — check the connection and run again to retry"
        );
    }

    if status.prices_offline {
        eprintln!("offline — showing last known prices");
    }

    if let Some(rate) = store.usdt_rate().await {
        let marker = if status.rate_offline { " (cached)" } else { "" };
        println!("USDT = {} toman{marker}\n", format_toman(rate));
    }

    println!("{:<18} {:>14} {:>10} {:>18}", "Coin", "USD", "24h", "Toman");
    for id in store.coin_ids() {
        let Some(record) = store.price(id).await else {
            continue;
        };
        let Some(usd) = record.usd else {
            continue;
        };
        let toman = store
            .toman_price(id)
            .await
            .map(format_toman)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        println!(
            "{:<18} {:>14} {:>10} {:>18}",
            display_name(id, language),
            format_usd(usd),
            format_change(record.usd_24h_change),
            toman
        );
    }

    if let Some(ts) = status.prices_updated_at {
        println!("\nupdated {}", ts.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}

async fn render_detail(store: &PriceDataStore, coin: &str) -> Result<()> {
    let detail = store.coin_detail(coin).await?;

    println!("{} ({})", detail.name, detail.symbol);
    println!("  Price           ${}", format_usd(detail.price_usd));
    println!("  Change 24h      {}", format_change(Some(detail.change_24h)));
    println!("  24h High        ${}", format_usd(detail.high_24h));
    println!("  24h Low         ${}", format_usd(detail.low_24h));
    println!("  Volume 24h      ${}", format_usd(detail.volume_24h));
    println!("  Market Cap      ${}", format_usd(detail.market_cap));
    println!("  Circulating     {}", format_usd(detail.circulating_supply));
    println!("  Total Supply    {}", format_usd(detail.total_supply));
    println!("  Max Supply      {}", format_usd(detail.max_supply));
    println!("  Chart           {}", coins::chart_url(coin));

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)?;

    let cache = Arc::new(JsonFileStore::new(&config.data_dir));
    let prefs = Preferences::load(cache.as_ref()).await;

    match cli.command {
        Some(Command::Prices) => {
            let store = build_store(&config, cache);
            store.bootstrap().await;
            render_prices(&store, prefs.language).await?;
        }
        Some(Command::Watch) => {
            let store = build_store(&config, cache);
            store.bootstrap().await;
            render_prices(&store, prefs.language).await?;

            let poller = Poller::start(store.clone(), config.refresh_interval);
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(config.refresh_interval) => {
                        println!();
                        if let Err(err) = render_prices(&store, prefs.language).await {
                            eprintln!("{err:#}");
                        }
                    }
                }
            }
            poller.stop();
        }
        Some(Command::Detail { coin }) => {
            let store = build_store(&config, cache);
            render_detail(&store, &coin).await?;
        }
        Some(Command::Search { query }) => {
            let matches = coins::search(&query, prefs.language);
            if matches.is_empty() {
                println!("No coin matching \"{query}\" found");
            } else {
                for id in matches {
                    println!("{:<18} {}", id, display_name(id, prefs.language));
                }
            }
        }
        Some(Command::CheckUpdate) => {
            let checker = UpdateChecker::new().with_url(config.endpoints.version_url.clone());
            match checker.check(env!("CARGO_PKG_VERSION")).await? {
                Some(info) => {
                    println!("New version available: {}", info.latest_version);
                    if !info.change_log.is_empty() {
                        println!("  Changes:  {}", info.change_log);
                    }
                    if !info.release_date.is_empty() {
                        println!("  Released: {}", info.release_date);
                    }
                    println!("  Download: {}", info.download_url);
                }
                None => println!("Up to date ({})", env!("CARGO_PKG_VERSION")),
            }
        }
        Some(Command::SetLanguage { language }) => {
            let language: Language = language.parse()?;
            let mut prefs = prefs;
            prefs.set_language(cache.as_ref(), language).await?;
            println!("Language set to {}", language.as_str());
        }
        Some(Command::SetTheme { theme }) => {
            let theme: Theme = theme.parse()?;
            let mut prefs = prefs;
            prefs.set_theme(cache.as_ref(), theme).await?;
            println!("Theme set to {}", theme.as_str());
        }
        Some(Command::Config) => {
            println!("Config file:      {}", config_path.display());
            println!("Data directory:   {}", config.data_dir.display());
            println!("Refresh interval: {}", format_duration(config.refresh_interval));
            println!("Fallback rate:    {}", format_toman(config.fallback_usdt_rate));
            println!("CoinGecko:        {}", config.endpoints.coingecko_base);
            println!("Wallex:           {}", config.endpoints.wallex_base);
            println!("Language:         {}", prefs.language.as_str());
            println!("Theme:            {}", prefs.theme.as_str());
        }
        None => {
            println!("coinwatch - crypto price tracker\n");
            println!("Config: {}", config_path.display());
            println!("Data directory: {}\n", config.data_dir.display());
            println!("Commands:");
            println!("  prices        Fetch and show tracked coin prices");
            println!("  watch         Refresh continuously at the configured interval");
            println!("  detail        Market detail for one coin");
            println!("  search        Filter the tracked coin list");
            println!("  check-update  Check for a newer release");
            println!("  set-language  Choose display language (en/fa)");
            println!("  set-theme     Choose theme (light/dark)");
            println!("  config        Show current configuration\n");
            println!("Run 'coinwatch --help' for more options.");
        }
    }

    Ok(())
}
