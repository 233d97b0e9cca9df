//! # zone-demand
//!
//! Short-horizon transportation demand prediction for geographic zones.
//!
//! A pretrained sequence regressor scores the last 24 hours of zone demand
//! together with calendar features; a gradient-boosted residual corrector
//! adjusts that score; the sum is mapped back to demand units through the
//! training scaler. Zones without usable history get a synthetic,
//! seed-reproducible demand window instead. Interval forecasts evaluate a
//! fixed set of offsets around a base time and keep going when one fails.

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod forecast;
pub mod models;
pub mod sequence;
pub mod transform;

pub use error::{DemandError, Result};

pub mod prelude {
    pub use crate::config::PredictorConfig;
    pub use crate::core::{parse_timestamp, DemandSequence, ZoneId};
    pub use crate::error::{DemandError, Result};
    pub use crate::features::{extract, TemporalFeatures};
    pub use crate::forecast::{DemandPredictor, IntervalForecast, IntervalOutcome, PointPredictor};
    pub use crate::models::{ResidualCorrector, SequenceRegressor};
    pub use crate::sequence::SequenceProvider;
    pub use crate::transform::{Denormalizer, FittedScaler};
}
