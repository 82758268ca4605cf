//! Signal data models shared by the detectors and the aggregator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How strongly a detector considers its pattern confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Medium,
    High,
    Critical,
}

/// Polarity of a signal: institutional buying vs. selling pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Accumulation,
    Distribution,
}

/// The atomic detectable event. Created fresh by each detector call and never
/// mutated afterwards; the `details` payload carries detector-specific facts.
/// Serialize-only: the static name ties signals to the compiled-in registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub name: &'static str,
    pub detected: bool,
    pub severity: Severity,
    pub kind: SignalKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_date: Option<NaiveDate>,
    pub details: Value,
}

impl Signal {
    /// An undetected signal for `name`, used when data is missing or the
    /// pattern gate fails.
    pub fn not_detected(name: &'static str, kind: SignalKind) -> Self {
        Self {
            name,
            detected: false,
            severity: Severity::None,
            kind,
            description: String::new(),
            signal_date: None,
            details: Value::Null,
        }
    }
}

/// A triggered signal paired with its configured weight.
///
/// By configuration convention the weight sign matches the polarity
/// (positive = accumulation, negative = distribution); the engine does not
/// enforce this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedSignal {
    pub weight: i32,
    pub signal: Signal,
}
