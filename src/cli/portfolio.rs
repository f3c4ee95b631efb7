use super::ui;
use crate::core::ledger::{self, Holding, Ledger};
use crate::core::{CryptoQuote, MarketService};
use crate::store::Store;
use anyhow::{Result, bail};
use chrono::Utc;
use comfy_table::{Cell, CellAlignment, Color};
use tracing::warn;

pub async fn run(market: &MarketService, store: &dyn Store, sell: Option<&str>) -> Result<()> {
    let ledger = Ledger::new(store)?;

    if let Some(id) = sell {
        if !ledger.remove(id).await? {
            bail!("No holding with id {id}");
        }
        println!("Removed holding {id}");
        return Ok(());
    }

    let holdings = ledger.list().await?;
    if holdings.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No holdings recorded yet. Use `fintick buy` to add one.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching market data...");
    let quotes = market.crypto().await;
    pb.finish_and_clear();

    // Without live listings every holding is valued at cost
    let quotes = quotes.unwrap_or_else(|e| {
        warn!("Crypto feed unavailable, valuing holdings at cost: {e:#}");
        Vec::new()
    });

    display_holdings(&holdings, &quotes);
    Ok(())
}

fn live_price(holding: &Holding, quotes: &[CryptoQuote]) -> f64 {
    quotes
        .iter()
        .find(|q| q.symbol.eq_ignore_ascii_case(&holding.symbol))
        .and_then(|q| q.current_price)
        .unwrap_or(holding.buy_price)
}

fn display_holdings(holdings: &[Holding], quotes: &[CryptoQuote]) {
    let now = Utc::now();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Asset"),
        ui::header_cell("Amount"),
        ui::header_cell("Buy Price"),
        ui::header_cell("Price"),
        ui::header_cell("Value"),
        ui::header_cell("P&L"),
        ui::header_cell("CAGR"),
    ]);

    let mut total_invested = 0.0;
    let mut total_value = 0.0;

    for holding in holdings {
        let price = live_price(holding, quotes);
        let pnl = ledger::calculate_pnl(holding.buy_price, price, holding.amount);
        total_invested += pnl.invested;
        total_value += pnl.current_value;

        let cagr = match ledger::annualized_return(holding, price, now) {
            Some(rate) => ui::change_cell(rate),
            None => ui::na_cell(false),
        };

        table.add_row(vec![
            Cell::new(&holding.id),
            Cell::new(format!(
                "{} ({})",
                holding.asset_name,
                holding.symbol.to_uppercase()
            )),
            Cell::new(format!("{:.4}", holding.amount)).set_alignment(CellAlignment::Right),
            Cell::new(ui::format_usd(holding.buy_price)).set_alignment(CellAlignment::Right),
            Cell::new(ui::format_usd(price)).set_alignment(CellAlignment::Right),
            Cell::new(ui::format_usd(pnl.current_value)).set_alignment(CellAlignment::Right),
            pnl_cell(&pnl),
            cagr,
        ]);
    }

    println!("{table}");

    let total_pnl = total_value - total_invested;
    let total_pct = if total_invested > 0.0 {
        (total_pnl / total_invested) * 100.0
    } else {
        0.0
    };
    println!(
        "\n{} {}   {} {}   {} {}",
        ui::style_text("Invested:", ui::StyleType::TotalLabel),
        ui::format_usd(total_invested),
        ui::style_text("Value:", ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_usd(total_value), ui::StyleType::TotalValue),
        ui::style_text("P&L:", ui::StyleType::TotalLabel),
        format!("{} ({})", ui::format_usd(total_pnl), ui::change_text(total_pct)),
    );
}

fn pnl_cell(pnl: &ledger::PnL) -> Cell {
    let text = format!("{:+.2} ({:+.2}%)", pnl.pnl, pnl.pnl_pct);
    let color = if pnl.pnl >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(text)
        .fg(color)
        .set_alignment(CellAlignment::Right)
}
