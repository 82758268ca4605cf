//! Score aggregation: weighted signal sums, rating bands and
//! recommendations.

pub mod scorer;

pub use scorer::{AggregateResult, Rating, SignalAggregator, SCORE_MAX, SCORE_MIN};
