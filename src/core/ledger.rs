//! Portfolio ledger records and profit/loss math

use crate::store::{Collection, Store};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const COLLECTION: &str = "portfolio";

/// One recorded purchase. The id is the creation time in milliseconds, so
/// ids sort chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub asset_name: String,
    pub symbol: String,
    pub amount: f64,
    pub buy_price: f64,
    pub asset_type: String,
    pub purchased_at: DateTime<Utc>,
}

impl Holding {
    pub fn new(
        asset_name: &str,
        symbol: &str,
        amount: f64,
        buy_price: f64,
        asset_type: &str,
    ) -> Self {
        let now = Utc::now();
        Holding {
            id: now.timestamp_millis().to_string(),
            asset_name: asset_name.to_string(),
            symbol: symbol.to_string(),
            amount,
            buy_price,
            asset_type: asset_type.to_string(),
            purchased_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PnL {
    pub invested: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

pub fn calculate_pnl(buy_price: f64, current_price: f64, amount: f64) -> PnL {
    let invested = buy_price * amount;
    let current_value = current_price * amount;
    let pnl = current_value - invested;
    let pnl_pct = if invested > 0.0 {
        (pnl / invested) * 100.0
    } else {
        0.0
    };

    PnL {
        invested,
        current_value,
        pnl,
        pnl_pct,
    }
}

/// Annualized growth rate of a holding, as a percentage. Only meaningful
/// after a full year; younger holdings return None.
pub fn annualized_return(
    holding: &Holding,
    current_price: f64,
    now: DateTime<Utc>,
) -> Option<f64> {
    let days = (now - holding.purchased_at).num_days();
    if days < 365 || holding.buy_price <= 0.0 || current_price <= 0.0 {
        return None;
    }

    let begin_bal = Decimal::from_f64(holding.buy_price)?;
    let end_bal = Decimal::from_f64(current_price)?;
    let n_years = Decimal::from_f64(days as f64 / 365.0)?;
    if n_years.is_zero() {
        return None;
    }

    let rate = cagr(begin_bal, end_bal, n_years);
    (rate * Decimal::from(100)).to_f64()
}

/// Typed access to the stored holdings.
pub struct Ledger {
    records: Arc<dyn Collection>,
}

impl Ledger {
    pub fn new(store: &dyn Store) -> Result<Self> {
        Ok(Ledger {
            records: store.collection(COLLECTION)?,
        })
    }

    pub async fn add(&self, holding: &Holding) -> Result<()> {
        let encoded = serde_json::to_vec(holding).context("Failed to encode holding")?;
        self.records.put(&holding.id, &encoded).await
    }

    pub async fn list(&self) -> Result<Vec<Holding>> {
        let mut holdings = Vec::new();
        for value in self.records.list().await? {
            let holding: Holding =
                serde_json::from_slice(&value).context("Failed to decode holding")?;
            holdings.push(holding);
        }
        Ok(holdings)
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.records.remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    #[test]
    fn test_pnl_for_a_winning_position() {
        let pnl = calculate_pnl(100.0, 150.0, 2.0);

        assert_eq!(pnl.invested, 200.0);
        assert_eq!(pnl.current_value, 300.0);
        assert_eq!(pnl.pnl, 100.0);
        assert!((pnl.pnl_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pnl_for_a_losing_position() {
        let pnl = calculate_pnl(200.0, 150.0, 1.5);

        assert_eq!(pnl.invested, 300.0);
        assert_eq!(pnl.current_value, 225.0);
        assert_eq!(pnl.pnl, -75.0);
        assert!((pnl.pnl_pct + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_pnl_with_nothing_invested() {
        let pnl = calculate_pnl(0.0, 150.0, 0.0);
        assert_eq!(pnl.pnl_pct, 0.0);
    }

    #[test]
    fn test_annualized_return_after_two_years() {
        let now = Utc::now();
        let mut holding = Holding::new("Bitcoin", "btc", 1.0, 100.0, "crypto");
        holding.purchased_at = now - Duration::days(730);

        // 100 -> 144 over two years is 20% a year
        let rate = annualized_return(&holding, 144.0, now).unwrap();
        assert!((rate - 20.0).abs() < 0.1);
    }

    #[test]
    fn test_annualized_return_needs_a_full_year() {
        let now = Utc::now();
        let mut holding = Holding::new("Bitcoin", "btc", 1.0, 100.0, "crypto");
        holding.purchased_at = now - Duration::days(200);

        assert!(annualized_return(&holding, 150.0, now).is_none());
    }

    #[tokio::test]
    async fn test_ledger_add_list_remove() {
        let store = MemoryStore::new();
        let ledger = Ledger::new(&store).unwrap();

        assert!(ledger.list().await.unwrap().is_empty());

        let holding = Holding::new("Bitcoin", "btc", 0.5, 95000.0, "crypto");
        ledger.add(&holding).await.unwrap();

        let listed = ledger.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], holding);

        assert!(ledger.remove(&holding.id).await.unwrap());
        assert!(ledger.list().await.unwrap().is_empty());
    }
}
