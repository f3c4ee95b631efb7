use super::ui;
use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment};

pub fn run(principal: f64, rate: f64, years: u32) -> Result<()> {
    let payment = monthly_payment(principal, rate, years)?;
    let months = f64::from(years * 12);
    let total = payment * months;
    let interest = total - principal;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Monthly Payment"),
        ui::header_cell("Total Payment"),
        ui::header_cell("Total Interest"),
    ]);
    table.add_row(vec![
        Cell::new(ui::format_usd(payment)).set_alignment(CellAlignment::Right),
        Cell::new(ui::format_usd(total)).set_alignment(CellAlignment::Right),
        Cell::new(ui::format_usd(interest)).set_alignment(CellAlignment::Right),
    ]);
    println!("{table}");
    Ok(())
}

/// Standard amortization formula, with a flat split for interest-free loans.
fn monthly_payment(principal: f64, annual_rate_pct: f64, years: u32) -> Result<f64> {
    if principal <= 0.0 {
        bail!("Principal must be positive, got {principal}");
    }
    if annual_rate_pct < 0.0 {
        bail!("Rate must not be negative, got {annual_rate_pct}");
    }
    if years == 0 {
        bail!("Term must be at least one year");
    }

    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let months = f64::from(years * 12);
    if monthly_rate == 0.0 {
        return Ok(principal / months);
    }

    let growth = (1.0 + monthly_rate).powf(months);
    Ok(principal * monthly_rate * growth / (growth - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_year_mortgage() {
        let payment = monthly_payment(300_000.0, 6.0, 30).unwrap();
        assert!((payment - 1798.65).abs() < 0.01);
    }

    #[test]
    fn test_interest_free_loan_splits_evenly() {
        let payment = monthly_payment(12_000.0, 0.0, 10).unwrap();
        assert_eq!(payment, 100.0);
    }

    #[test]
    fn test_rejects_degenerate_terms() {
        assert!(monthly_payment(0.0, 6.0, 30).is_err());
        assert!(monthly_payment(-5.0, 6.0, 30).is_err());
        assert!(monthly_payment(300_000.0, -1.0, 30).is_err());
        assert!(monthly_payment(300_000.0, 6.0, 0).is_err());
    }
}
