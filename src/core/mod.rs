//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod ledger;
pub mod log;
pub mod market;
pub mod savings;
pub mod subs;

// Re-export main types for cleaner imports
pub use market::{
    CryptoFeed, CryptoQuote, ForexFeed, ForexTable, GoldFeed, GoldQuote, MarketService,
    MarketSnapshot,
};
