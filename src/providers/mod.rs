pub mod coingecko;
pub mod frankfurter;
pub mod metals_live;

// Re-export providers for wiring in run_command
pub use coingecko::CoinGeckoProvider;
pub use frankfurter::FrankfurterProvider;
pub use metals_live::MetalsLiveProvider;
