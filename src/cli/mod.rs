//! Command line interface modules

pub mod buy;
pub mod convert;
pub mod loan;
pub mod markets;
pub mod portfolio;
pub mod subs;
pub mod ticker;
pub mod ui;
pub mod vault;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::time::Duration;

/// Redraw interval for watch mode, aligned with the feed freshness window.
pub(crate) const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {value}, expected YYYY-MM-DD"))
}
