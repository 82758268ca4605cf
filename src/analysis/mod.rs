//! Signal detectors grouped by data family: price/volume action, derived
//! indicators, structural disclosures and benchmark-relative strength.

pub mod divergence;
pub mod extrema;
pub mod indicator_signals;
pub mod price_volume;
pub mod relative_strength;
pub mod structural;

pub use divergence::{match_divergence, Direction, DivergenceResult};
pub use extrema::{find_extrema, find_peaks, find_troughs, ExtremumRole};
pub use indicator_signals::{IndicatorSignals, IndicatorSource};
pub use price_volume::PriceVolumeSignals;
pub use relative_strength::RelativeStrength;
pub use structural::{
    CountDirection, DataError, StructuralDataSource, StructuralSignals,
};
