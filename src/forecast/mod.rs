//! Point and interval demand prediction.

pub mod intervals;
pub mod predictor;

pub use intervals::{
    forecast_intervals, offset_label, IntervalEntry, IntervalForecast, IntervalOutcome,
    PointPredictor, DEFAULT_VISIBLE_LABELS, OFFSETS_MINUTES,
};
pub use predictor::DemandPredictor;
