pub mod caching;
pub mod open_exchange_rates;

pub use caching::RateCacheManager;
pub use open_exchange_rates::OpenExchangeRatesProvider;
