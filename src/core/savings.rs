//! Savings vault records and progress tracking

use crate::store::{Collection, Store};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const COLLECTION: &str = "savings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsVault {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SavingsVault {
    pub fn new(name: &str, target_amount: f64, deadline: Option<NaiveDate>) -> Self {
        let now = Utc::now();
        SavingsVault {
            id: now.timestamp_millis().to_string(),
            name: name.to_string(),
            target_amount,
            current_amount: 0.0,
            deadline,
            created_at: now,
        }
    }

    /// Progress towards the target as a percentage, capped at 100.
    pub fn progress_pct(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        ((self.current_amount / self.target_amount) * 100.0).min(100.0)
    }

    pub fn deposit(&mut self, amount: f64) -> Result<()> {
        if amount <= 0.0 {
            bail!("Deposit amount must be positive, got {amount}");
        }
        self.current_amount += amount;
        Ok(())
    }

    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.deadline.map(|deadline| (deadline - today).num_days())
    }
}

/// Typed access to the stored vaults.
pub struct VaultBook {
    records: Arc<dyn Collection>,
}

impl VaultBook {
    pub fn new(store: &dyn Store) -> Result<Self> {
        Ok(VaultBook {
            records: store.collection(COLLECTION)?,
        })
    }

    /// Writes a vault under its id, replacing any previous state.
    pub async fn save(&self, vault: &SavingsVault) -> Result<()> {
        let encoded = serde_json::to_vec(vault).context("Failed to encode savings vault")?;
        self.records.put(&vault.id, &encoded).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<SavingsVault>> {
        match self.records.get(id).await? {
            Some(value) => {
                let vault =
                    serde_json::from_slice(&value).context("Failed to decode savings vault")?;
                Ok(Some(vault))
            }
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<SavingsVault>> {
        let mut vaults = Vec::new();
        for value in self.records.list().await? {
            let vault: SavingsVault =
                serde_json::from_slice(&value).context("Failed to decode savings vault")?;
            vaults.push(vault);
        }
        Ok(vaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_progress_caps_at_one_hundred() {
        let mut vault = SavingsVault::new("Vacation", 1000.0, None);
        assert_eq!(vault.progress_pct(), 0.0);

        vault.current_amount = 250.0;
        assert!((vault.progress_pct() - 25.0).abs() < 1e-9);

        vault.current_amount = 1500.0;
        assert_eq!(vault.progress_pct(), 100.0);
    }

    #[test]
    fn test_progress_with_no_target() {
        let mut vault = SavingsVault::new("Misc", 0.0, None);
        vault.current_amount = 50.0;
        assert_eq!(vault.progress_pct(), 0.0);
    }

    #[test]
    fn test_deposit_rejects_nonpositive_amounts() {
        let mut vault = SavingsVault::new("Vacation", 1000.0, None);

        assert!(vault.deposit(0.0).is_err());
        assert!(vault.deposit(-10.0).is_err());
        assert_eq!(vault.current_amount, 0.0);

        vault.deposit(100.0).unwrap();
        vault.deposit(50.0).unwrap();
        assert_eq!(vault.current_amount, 150.0);
    }

    #[test]
    fn test_days_left_needs_a_deadline() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

        let open_ended = SavingsVault::new("Vacation", 1000.0, None);
        assert!(open_ended.days_left(today).is_none());

        let dated = SavingsVault::new("Vacation", 1000.0, Some(deadline));
        assert_eq!(dated.days_left(today), Some(131));
    }

    #[tokio::test]
    async fn test_vault_book_save_get_and_update() {
        let store = MemoryStore::new();
        let book = VaultBook::new(&store).unwrap();

        let mut vault = SavingsVault::new("Vacation", 1000.0, None);
        book.save(&vault).await.unwrap();

        assert_eq!(book.get(&vault.id).await.unwrap(), Some(vault.clone()));
        assert!(book.get("missing").await.unwrap().is_none());

        vault.deposit(300.0).unwrap();
        book.save(&vault).await.unwrap();

        let listed = book.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].current_amount, 300.0);
    }
}
