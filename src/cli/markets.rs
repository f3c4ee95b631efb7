use super::ui;
use crate::core::{CryptoQuote, GoldQuote, MarketService, MarketSnapshot};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use console::Term;

pub async fn run(market: &MarketService, filter: Option<&str>, watch: bool) -> Result<()> {
    if !watch {
        return render(market, filter).await;
    }

    let term = Term::stdout();
    let mut interval = tokio::time::interval(super::REFRESH_INTERVAL);
    loop {
        interval.tick().await;
        term.clear_screen()?;
        render(market, filter).await?;
    }
}

async fn render(market: &MarketService, filter: Option<&str>) -> Result<()> {
    let pb = ui::new_spinner("Fetching market data...");
    let snapshot = market.snapshot().await;
    pb.finish_and_clear();

    display_cards(&snapshot);
    display_crypto(&snapshot.crypto, filter);
    display_forex(&snapshot, filter);
    display_commodities(&snapshot.gold);
    Ok(())
}

/// Headline cards for the assets the dashboard pins at the top.
fn display_cards(snapshot: &MarketSnapshot) {
    let mut cards = Vec::new();
    for (symbol, label) in [("btc", "Bitcoin"), ("eth", "Ethereum")] {
        cards.push(crypto_card(&snapshot.crypto, symbol, label));
    }

    cards.push(format!(
        "{} {} {}",
        ui::style_text("Gold", ui::StyleType::TotalLabel),
        ui::format_usd(snapshot.gold.price),
        ui::change_text(snapshot.gold.change_percent),
    ));

    let usd_try = snapshot.forex.get("USD/TRY").map_or_else(
        || ui::style_text("unavailable", ui::StyleType::Error),
        |rate| format!("{rate:.4}"),
    );
    cards.push(format!(
        "{} {}",
        ui::style_text("USD/TRY", ui::StyleType::TotalLabel),
        usd_try
    ));

    println!("{}\n", cards.join("   "));
}

fn crypto_card(quotes: &[CryptoQuote], symbol: &str, label: &str) -> String {
    let quote = quotes.iter().find(|q| q.symbol.eq_ignore_ascii_case(symbol));
    let body = match quote {
        Some(quote) => {
            let price = quote
                .current_price
                .map_or_else(|| "---".to_string(), ui::format_usd);
            format!(
                "{price} {}",
                ui::change_text(quote.price_change_percentage_24h.unwrap_or(0.0))
            )
        }
        None => ui::style_text("unavailable", ui::StyleType::Error),
    };
    format!("{} {body}", ui::style_text(label, ui::StyleType::TotalLabel))
}

fn display_crypto(quotes: &[CryptoQuote], filter: Option<&str>) {
    println!("{}", ui::style_text("Crypto", ui::StyleType::Title));

    let quotes = filter_crypto(quotes, filter);
    if quotes.is_empty() {
        let message = if filter.is_some() {
            "No assets match the filter."
        } else {
            "No crypto data available."
        };
        println!("{}", ui::style_text(message, ui::StyleType::Subtle));
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Name"),
        ui::header_cell("Price"),
        ui::header_cell("24h"),
        ui::header_cell("Market Cap"),
        ui::header_cell("Volume (24h)"),
    ]);

    for (i, quote) in quotes.iter().enumerate() {
        let change = match quote.price_change_percentage_24h {
            Some(change) => ui::change_cell(change),
            None => ui::na_cell(false),
        };

        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} ({})", quote.name, quote.symbol.to_uppercase())),
            ui::format_optional_cell(quote.current_price, ui::format_usd),
            change,
            ui::format_optional_cell(quote.market_cap, |v| format!("${:.2}B", v / 1e9)),
            ui::format_optional_cell(quote.total_volume, |v| format!("${:.2}M", v / 1e6)),
        ]);
    }

    println!("{table}");
}

fn display_forex(snapshot: &MarketSnapshot, filter: Option<&str>) {
    println!("\n{}", ui::style_text("Forex", ui::StyleType::Title));

    let pairs = filter_forex(snapshot, filter);
    if pairs.is_empty() {
        let message = if filter.is_some() {
            "No pairs match the filter."
        } else {
            "No forex data available."
        };
        println!("{}", ui::style_text(message, ui::StyleType::Subtle));
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Pair"), ui::header_cell("Rate")]);
    for (pair, rate) in pairs {
        table.add_row(vec![
            Cell::new(pair),
            Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

fn display_commodities(gold: &GoldQuote) {
    println!("\n{}", ui::style_text("Commodities", ui::StyleType::Title));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metal"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("24h"),
    ]);
    table.add_row(vec![
        Cell::new("Gold (XAU/USD)"),
        Cell::new(ui::format_usd(gold.price)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:+.2}", gold.change)).set_alignment(CellAlignment::Right),
        ui::change_cell(gold.change_percent),
    ]);
    println!("{table}");
}

fn filter_crypto<'a>(quotes: &'a [CryptoQuote], filter: Option<&str>) -> Vec<&'a CryptoQuote> {
    let Some(needle) = filter else {
        return quotes.iter().collect();
    };

    let needle = needle.to_lowercase();
    quotes
        .iter()
        .filter(|q| {
            q.name.to_lowercase().contains(&needle) || q.symbol.to_lowercase().contains(&needle)
        })
        .collect()
}

fn filter_forex<'a>(snapshot: &'a MarketSnapshot, filter: Option<&str>) -> Vec<(&'a str, f64)> {
    let needle = filter.map(str::to_lowercase);
    snapshot
        .forex
        .iter()
        .filter(|(pair, _)| match &needle {
            Some(needle) => pair.to_lowercase().contains(needle),
            None => true,
        })
        .map(|(pair, rate)| (pair.as_str(), *rate))
        .collect()
}
