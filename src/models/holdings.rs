//! Structural disclosure data models: holdings and shareholder counts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One holder's position within a reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderPosition {
    pub holder_name: String,
    /// Fraction of float held, e.g. 0.045 for 4.5%.
    pub hold_ratio: f64,
    /// Shares held.
    pub hold_amount: f64,
}

/// Top-holder disclosure for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingsSnapshot {
    pub end_date: NaiveDate,
    pub positions: Vec<HolderPosition>,
}

impl HoldingsSnapshot {
    pub fn position(&self, holder_name: &str) -> Option<&HolderPosition> {
        self.positions.iter().find(|p| p.holder_name == holder_name)
    }
}

/// Aggregate shareholder count for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareholderCount {
    pub end_date: NaiveDate,
    pub holder_num: u64,
}
