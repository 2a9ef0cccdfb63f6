mod poller;
mod price_store;

pub use poller::Poller;
pub use price_store::{
    PriceDataStore, StoreStatus, DEFAULT_USDT_RATE, LOGOS_CACHE_KEY, PRICES_CACHE_KEY,
    USDT_CACHE_KEY,
};
