//! Calendar features for a prediction target time.
//!
//! Raw hour, weekday (Monday = 0), day-of-month and month, followed by
//! cyclic sin/cos encodings of the hour-of-day and weekday.

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::f64::consts::PI;

/// Number of temporal features.
pub const TEMPORAL_FEATURES: usize = 8;

/// Feature names in vector order.
pub const TEMPORAL_FEATURE_NAMES: [&str; TEMPORAL_FEATURES] = [
    "hour",
    "weekday",
    "day",
    "month",
    "hour_sin",
    "hour_cos",
    "weekday_sin",
    "weekday_cos",
];

/// Ordered 8-element temporal feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalFeatures([f64; TEMPORAL_FEATURES]);

impl TemporalFeatures {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn hour(&self) -> f64 {
        self.0[0]
    }

    pub fn weekday(&self) -> f64 {
        self.0[1]
    }

    pub fn day(&self) -> f64 {
        self.0[2]
    }

    pub fn month(&self) -> f64 {
        self.0[3]
    }

    /// (sin, cos) of the hour-of-day angle.
    pub fn hour_cycle(&self) -> (f64, f64) {
        (self.0[4], self.0[5])
    }

    /// (sin, cos) of the weekday angle.
    pub fn weekday_cycle(&self) -> (f64, f64) {
        (self.0[6], self.0[7])
    }
}

impl AsRef<[f64]> for TemporalFeatures {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Extract temporal features from a timestamp.
pub fn extract(timestamp: &NaiveDateTime) -> TemporalFeatures {
    let hour = timestamp.hour() as f64;
    let weekday = timestamp.weekday().num_days_from_monday() as f64;
    let hour_angle = 2.0 * PI * hour / 24.0;
    let weekday_angle = 2.0 * PI * weekday / 7.0;

    TemporalFeatures([
        hour,
        weekday,
        timestamp.day() as f64,
        timestamp.month() as f64,
        hour_angle.sin(),
        hour_angle.cos(),
        weekday_angle.sin(),
        weekday_angle.cos(),
    ])
}
