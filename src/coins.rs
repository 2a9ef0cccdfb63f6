//! The fixed registry of tracked coins.
//!
//! Coin identifiers are CoinGecko ids. The list, its ordering, and the
//! localized display names are part of the product definition: screens
//! render the coins in exactly this order.

use crate::prefs::Language;

/// Tracked coin ids, in display order.
pub const TRACKED_COINS: [&str; 40] = [
    "bitcoin",
    "ethereum",
    "binancecoin",
    "ripple",
    "dogecoin",
    "solana",
    "cardano",
    "tron",
    "polkadot",
    "matic-network",
    "hyperliquid",
    "sui",
    "stellar",
    "litecoin",
    "whitebit",
    "uniswap",
    "mantle",
    "monero",
    "ethena",
    "pepe",
    "aave",
    "okb",
    "memecore",
    "near",
    "bittensor",
    "aptos",
    "arbitrum",
    "kaspa",
    "cosmos",
    "algorand",
    "vechain",
    "susds",
    "bonk",
    "fasttoken",
    "sky",
    "filecoin",
    "optimism",
    "celestia",
    "render-token",
    "fartcoin",
];

/// Localized display name for a coin id.
///
/// Coins without a translation entry fall back to their raw id.
pub fn display_name(id: &str, language: Language) -> &str {
    match language {
        Language::English => display_name_en(id),
        Language::Persian => display_name_fa(id),
    }
}

fn display_name_en(id: &str) -> &str {
    match id {
        "bitcoin" => "Bitcoin",
        "ethereum" => "Ethereum",
        "binancecoin" => "Binance Coin",
        "ripple" => "Ripple",
        "dogecoin" => "Dogecoin",
        "solana" => "Solana",
        "cardano" => "Cardano",
        "tron" => "Tron",
        "polkadot" => "Polkadot",
        "matic-network" => "Polygon",
        "hyperliquid" => "Hyperliquid",
        "sui" => "Sui",
        "stellar" => "Stellar",
        "litecoin" => "Litecoin",
        "whitebit" => "Whitebit",
        "uniswap" => "Uniswap",
        "mantle" => "Mantle",
        "monero" => "Monero",
        "ethena" => "Ethena",
        "pepe" => "Pepe",
        "aave" => "Aave",
        "okb" => "OKB",
        "near" => "Near",
        "bittensor" => "Bittensor",
        "aptos" => "Aptos",
        "arbitrum" => "Arbitrum",
        "kaspa" => "Kaspa",
        "cosmos" => "Cosmos",
        "algorand" => "Algorand",
        "vechain" => "Vechain",
        "bonk" => "Bonk",
        "fasttoken" => "Fasttoken",
        "sky" => "Sky",
        "filecoin" => "Filecoin",
        "optimism" => "Optimism",
        "celestia" => "Celestia",
        "render-token" => "Render",
        "fartcoin" => "Fartcoin",
        "usdt" => "Tether",
        other => other,
    }
}

fn display_name_fa(id: &str) -> &str {
    match id {
        "bitcoin" => "بیت‌کوین",
        "ethereum" => "اتریوم",
        "binancecoin" => "بایننس کوین",
        "ripple" => "ریپل",
        "dogecoin" => "دوج کوین",
        "solana" => "سولانا",
        "cardano" => "کاردانو",
        "tron" => "ترون",
        "polkadot" => "پولکادات",
        "matic-network" => "پالیگان",
        "hyperliquid" => "هایپرلیکوئید",
        "sui" => "سویی",
        "stellar" => "استلار",
        "litecoin" => "لایت کوین",
        "whitebit" => "وایت بیت",
        "uniswap" => "یونی‌سواپ",
        "mantle" => "منتل",
        "monero" => "مونرو",
        "ethena" => "اتنا",
        "pepe" => "پپه",
        "aave" => "آوه",
        "okb" => "اوکی بی",
        "near" => "نیر",
        "bittensor" => "بیت تنسور",
        "aptos" => "آپتوس",
        "arbitrum" => "آربیتروم",
        "kaspa" => "کاسپا",
        "cosmos" => "کازماس",
        "algorand" => "الگورند",
        "vechain" => "وی چین",
        "bonk" => "بونک",
        "fasttoken" => "فست توکن",
        "sky" => "اسکای",
        "filecoin" => "فایل کوین",
        "optimism" => "اپتیمیسم",
        "celestia" => "سلستیا",
        "render-token" => "رندر",
        "fartcoin" => "فارت کوین",
        "usdt" => "تتر",
        other => other,
    }
}

/// Binance trading pair symbol for a coin, used to build chart URLs.
///
/// Coins without an explicit mapping use the uppercased id against USDT,
/// which is what Binance names most of its listings.
pub fn binance_symbol(id: &str) -> String {
    let symbol = match id {
        "bitcoin" => "BTCUSDT",
        "ethereum" => "ETHUSDT",
        "binancecoin" => "BNBUSDT",
        "ripple" => "XRPUSDT",
        "dogecoin" => "DOGEUSDT",
        "solana" => "SOLUSDT",
        "cardano" => "ADAUSDT",
        "tron" => "TRXUSDT",
        "polkadot" => "DOTUSDT",
        "matic-network" => "MATICUSDT",
        "stellar" => "XLMUSDT",
        "litecoin" => "LTCUSDT",
        "uniswap" => "UNIUSDT",
        "chainlink" => "LINKUSDT",
        "bitcoin-cash" => "BCHUSDT",
        "monero" => "XMRUSDT",
        "ethereum-classic" => "ETCUSDT",
        "tezos" => "XTZUSDT",
        "eos" => "EOSUSDT",
        "aave" => "AAVEUSDT",
        "compound" => "COMPUSDT",
        "synthetix" => "SNXUSDT",
        "yearn-finance" => "YFIUSDT",
        "usdt" => "USDTUSDT",
        _ => return format!("{}USDT", id.to_uppercase()),
    };
    symbol.to_string()
}

/// TradingView chart URL for a coin.
pub fn chart_url(id: &str) -> String {
    format!(
        "https://www.tradingview.com/chart/?symbol=BINANCE:{}",
        binance_symbol(id)
    )
}

/// Filter the tracked list by a case-insensitive substring of the coin id
/// or its display name for the active language, preserving list order.
///
/// An empty query returns the whole list.
pub fn search(query: &str, language: Language) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return TRACKED_COINS.to_vec();
    }

    TRACKED_COINS
        .iter()
        .copied()
        .filter(|id| {
            id.contains(&needle) || display_name(id, language).to_lowercase().contains(&needle)
        })
        .collect()
}
