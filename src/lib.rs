//! Smart-money flow detection and scoring over daily bar history and
//! structural disclosures.
//!
//! The crate is a library first: feed [`scanner::Scanner`] enriched bars
//! (see [`indicators::enrich`]) plus optional benchmark and disclosure data,
//! and it returns triggered signals with a bounded composite score and a
//! rating.

pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod scanner;

pub use aggregator::{AggregateResult, Rating, SignalAggregator};
pub use config::Config;
pub use models::{Bar, Severity, Signal, SignalKind};
pub use scanner::{ScanInput, ScanReport, Scanner};
