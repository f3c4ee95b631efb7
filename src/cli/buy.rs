use super::ui;
use crate::core::MarketService;
use crate::core::ledger::{Holding, Ledger};
use crate::store::Store;
use anyhow::{Context, Result, bail};
use tracing::info;

pub async fn run(
    market: &MarketService,
    store: &dyn Store,
    symbol: &str,
    amount: f64,
    price: Option<f64>,
) -> Result<()> {
    if amount <= 0.0 {
        bail!("Amount must be positive, got {amount}");
    }

    let pb = ui::new_spinner("Fetching market data...");
    let listings = market.crypto().await;
    pb.finish_and_clear();
    let listings = listings.context("Could not fetch crypto listings to record the purchase")?;

    let quote = listings
        .iter()
        .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
        .with_context(|| format!("Unknown asset symbol: {symbol}"))?;

    let buy_price = match price {
        Some(price) => price,
        None => quote
            .current_price
            .with_context(|| format!("No live price for {symbol}, pass --price"))?,
    };
    if buy_price <= 0.0 {
        bail!("Price must be positive, got {buy_price}");
    }

    let holding = Holding::new(&quote.name, &quote.symbol, amount, buy_price, "crypto");
    info!("Recording purchase: {holding:?}");

    let ledger = Ledger::new(store)?;
    ledger.add(&holding).await?;

    println!(
        "Recorded purchase of {} {} at {} (id {})",
        amount,
        holding.symbol.to_uppercase(),
        ui::format_usd(buy_price),
        holding.id
    );
    Ok(())
}
