use super::ui;
use crate::core::{MarketService, MarketSnapshot};
use anyhow::Result;
use console::{Term, style};

/// Forex pairs pinned to the tape next to the coins.
const TAPE_PAIRS: [&str; 2] = ["USD/TRY", "EUR/TRY"];

pub async fn run(market: &MarketService, watch: bool) -> Result<()> {
    if !watch {
        return render(market).await;
    }

    let term = Term::stdout();
    let mut interval = tokio::time::interval(super::REFRESH_INTERVAL);
    loop {
        interval.tick().await;
        term.clear_screen()?;
        render(market).await?;
    }
}

async fn render(market: &MarketService) -> Result<()> {
    let snapshot = market.snapshot().await;
    println!("{}", ticker_line(&snapshot));
    Ok(())
}

fn ticker_line(snapshot: &MarketSnapshot) -> String {
    let mut items = Vec::new();

    for quote in &snapshot.crypto {
        let price = quote
            .current_price
            .map_or_else(|| "---".to_string(), ui::format_usd);
        items.push(ticker_item(
            &quote.symbol.to_uppercase(),
            &price,
            quote.price_change_percentage_24h.unwrap_or(0.0),
        ));
    }

    for pair in TAPE_PAIRS {
        if let Some(rate) = snapshot.forex.get(pair) {
            items.push(ticker_item(pair, &format!("{rate:.2}"), 0.0));
        }
    }

    items.push(ticker_item(
        "XAU/USD",
        &ui::format_usd(snapshot.gold.price),
        snapshot.gold.change_percent,
    ));

    items.join("   ")
}

fn ticker_item(label: &str, price: &str, change: f64) -> String {
    let label = style(label).bold();
    // A flat quote shows no move at all
    if change == 0.0 {
        format!("{label} {price}")
    } else {
        format!("{label} {price} {}", ui::change_text(change))
    }
}
