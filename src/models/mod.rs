//! Shared data models spanning the engine layers.

pub mod bar;
pub mod holdings;
pub mod signal;

pub use bar::Bar;
pub use holdings::{HolderPosition, HoldingsSnapshot, ShareholderCount};
pub use signal::{Severity, Signal, SignalKind, WeightedSignal};
