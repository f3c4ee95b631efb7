//! Recurring subscription records and billing totals

use crate::store::{Collection, Store};
use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const COLLECTION: &str = "subscriptions";
const DEFAULT_CATEGORY: &str = "Entertainment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl FromStr for BillingCycle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => bail!("Unknown billing cycle: {other}"),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingCycle::Monthly => write!(f, "monthly"),
            BillingCycle::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub billing_cycle: BillingCycle,
    pub next_due_date: NaiveDate,
    pub category: String,
    pub active: bool,
}

impl Subscription {
    pub fn new(
        name: &str,
        amount: f64,
        billing_cycle: BillingCycle,
        next_due_date: NaiveDate,
        category: Option<&str>,
    ) -> Self {
        Subscription {
            id: Utc::now().timestamp_millis().to_string(),
            name: name.to_string(),
            amount,
            billing_cycle,
            next_due_date,
            category: category.unwrap_or(DEFAULT_CATEGORY).to_string(),
            active: true,
        }
    }
}

/// Combined cost of the active subscriptions billed monthly. Yearly
/// plans are summed separately, never converted between cycles.
pub fn monthly_total(subscriptions: &[Subscription]) -> f64 {
    subscriptions
        .iter()
        .filter(|s| s.active && s.billing_cycle == BillingCycle::Monthly)
        .map(|s| s.amount)
        .sum()
}

pub fn yearly_total(subscriptions: &[Subscription]) -> f64 {
    subscriptions
        .iter()
        .filter(|s| s.active && s.billing_cycle == BillingCycle::Yearly)
        .map(|s| s.amount)
        .sum()
}

pub fn days_until_due(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Typed access to the stored subscriptions.
pub struct SubsBook {
    records: Arc<dyn Collection>,
}

impl SubsBook {
    pub fn new(store: &dyn Store) -> Result<Self> {
        Ok(SubsBook {
            records: store.collection(COLLECTION)?,
        })
    }

    pub async fn add(&self, subscription: &Subscription) -> Result<()> {
        let encoded =
            serde_json::to_vec(subscription).context("Failed to encode subscription")?;
        self.records.put(&subscription.id, &encoded).await
    }

    pub async fn list(&self) -> Result<Vec<Subscription>> {
        let mut subscriptions = Vec::new();
        for value in self.records.list().await? {
            let subscription: Subscription =
                serde_json::from_slice(&value).context("Failed to decode subscription")?;
            subscriptions.push(subscription);
        }
        Ok(subscriptions)
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.records.remove(id).await
    }
}
