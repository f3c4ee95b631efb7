pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

// Re-export for cleaner imports in main and the integration tests
pub use crate::core::config;

use crate::core::MarketService;
use crate::providers::{CoinGeckoProvider, FrankfurterProvider, MetalsLiveProvider};
use crate::store::disk::DiskStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Application commands, decoupled from the clap surface in main.
pub enum AppCommand {
    Ticker {
        watch: bool,
    },
    Markets {
        filter: Option<String>,
        watch: bool,
    },
    Buy {
        symbol: String,
        amount: f64,
        price: Option<f64>,
    },
    Portfolio {
        sell: Option<String>,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    Loan {
        principal: f64,
        rate: f64,
        years: u32,
    },
    Subs(SubsCommand),
    Vault(VaultCommand),
}

pub enum SubsCommand {
    List,
    Add {
        name: String,
        amount: f64,
        cycle: String,
        due: String,
        category: Option<String>,
    },
    Remove {
        id: String,
    },
}

pub enum VaultCommand {
    List,
    Add {
        name: String,
        target: f64,
        deadline: Option<String>,
    },
    Deposit {
        id: String,
        amount: f64,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fintick starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let market = build_market_service(&config);

    match command {
        AppCommand::Ticker { watch } => cli::ticker::run(&market, watch).await,
        AppCommand::Markets { filter, watch } => {
            cli::markets::run(&market, filter.as_deref(), watch).await
        }
        AppCommand::Buy {
            symbol,
            amount,
            price,
        } => {
            let store = open_store(&config)?;
            cli::buy::run(&market, &store, &symbol, amount, price).await
        }
        AppCommand::Portfolio { sell } => {
            let store = open_store(&config)?;
            cli::portfolio::run(&market, &store, sell.as_deref()).await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&market, amount, &from, &to).await
        }
        AppCommand::Loan {
            principal,
            rate,
            years,
        } => cli::loan::run(principal, rate, years),
        AppCommand::Subs(command) => {
            let store = open_store(&config)?;
            cli::subs::run(&store, command).await
        }
        AppCommand::Vault(command) => {
            let store = open_store(&config)?;
            cli::vault::run(&store, command).await
        }
    }
}

fn build_market_service(config: &config::AppConfig) -> MarketService {
    let coingecko_url = config
        .providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com", |p| &p.base_url);
    let frankfurter_url = config
        .providers
        .frankfurter
        .as_ref()
        .map_or("https://api.frankfurter.app", |p| &p.base_url);
    let metals_url = config
        .providers
        .metals
        .as_ref()
        .map_or("https://api.metals.live", |p| &p.base_url);

    MarketService::new(
        Arc::new(CoinGeckoProvider::new(coingecko_url)),
        Arc::new(FrankfurterProvider::new(frankfurter_url)),
        Arc::new(MetalsLiveProvider::new(metals_url)),
    )
}

fn open_store(config: &config::AppConfig) -> Result<DiskStore> {
    let data_path = config.default_data_path()?;
    DiskStore::open(&data_path)
}
