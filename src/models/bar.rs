//! Daily bar data model with derived indicator fields

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day: OHLCV plus the derived indicators the detectors read.
///
/// Derived fields stay `None` until `indicators::enrich` (or the caller's own
/// pipeline) fills them; detectors that need a missing field simply report
/// nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Turnover in currency units.
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma60: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma120: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_hist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfi: Option<f64>,
}

impl Bar {
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            amount: 0.0,
            ma20: None,
            ma60: None,
            ma120: None,
            obv: None,
            rsi: None,
            macd: None,
            macd_signal: None,
            macd_hist: None,
            mfi: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// Moving-average value for a configured support period, if computed.
    pub fn ma(&self, period: usize) -> Option<f64> {
        match period {
            20 => self.ma20,
            60 => self.ma60,
            120 => self.ma120,
            _ => None,
        }
    }
}
