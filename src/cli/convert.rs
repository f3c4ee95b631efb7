use super::ui;
use crate::core::{ForexTable, MarketService};
use anyhow::{Result, bail};

pub async fn run(market: &MarketService, amount: f64, from: &str, to: &str) -> Result<()> {
    if amount < 0.0 {
        bail!("Amount must not be negative, got {amount}");
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = market.forex().await;
    pb.finish_and_clear();
    let rates = rates?;

    let converted = convert(&rates, amount, from, to)?;
    println!(
        "{:.2} {} = {} {}",
        amount,
        from.to_uppercase(),
        ui::style_text(&format!("{converted:.2}"), ui::StyleType::TotalValue),
        to.to_uppercase()
    );
    Ok(())
}

/// Converts through a listed pair, in either direction.
fn convert(rates: &ForexTable, amount: f64, from: &str, to: &str) -> Result<f64> {
    let from = from.to_uppercase();
    let to = to.to_uppercase();
    if from == to {
        return Ok(amount);
    }

    if let Some(rate) = rates.get(&format!("{from}/{to}")) {
        return Ok(amount * rate);
    }
    if let Some(rate) = rates.get(&format!("{to}/{from}")) {
        if *rate > 0.0 {
            return Ok(amount / rate);
        }
    }

    bail!("No exchange rate available for {from}/{to}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> ForexTable {
        ForexTable::from([
            ("USD/TRY".to_string(), 30.0),
            ("EUR/USD".to_string(), 1.1),
        ])
    }

    #[test]
    fn test_direct_pair_multiplies() {
        let converted = convert(&rates(), 100.0, "usd", "try").unwrap();
        assert!((converted - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_pair_divides() {
        let converted = convert(&rates(), 3000.0, "TRY", "USD").unwrap();
        assert!((converted - 100.0).abs() < 1e-9);

        let converted = convert(&rates(), 110.0, "usd", "eur").unwrap();
        assert!((converted - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_currency_is_identity() {
        let converted = convert(&rates(), 42.0, "USD", "usd").unwrap();
        assert_eq!(converted, 42.0);
    }

    #[test]
    fn test_unlisted_pair_is_an_error() {
        assert!(convert(&rates(), 100.0, "USD", "GBP").is_err());
    }
}
