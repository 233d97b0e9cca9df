//! Multi-offset forecasting around a base time.
//!
//! Every offset in [`OFFSETS_MINUTES`] is predicted independently; a failure
//! is recorded on that entry only and the remaining offsets still run.

use crate::core::{format_timestamp, ZoneId};
use crate::error::{DemandError, Result};
use chrono::{Duration, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::warn;

/// Minute offsets forecast around the base time.
pub const OFFSETS_MINUTES: [i64; 7] = [-60, -30, -15, 0, 15, 30, 60];

/// Labels exposed to end users by default.
pub const DEFAULT_VISIBLE_LABELS: [&str; 3] = ["-30min", "+0min", "+30min"];

/// Label for an offset, always signed: `-60min`, `+0min`, `+15min`.
pub fn offset_label(minutes: i64) -> String {
    format!("{minutes:+}min")
}

/// Anything that can produce a point prediction for a zone at a time.
pub trait PointPredictor {
    fn predict_at(&self, zone: ZoneId, target: &NaiveDateTime) -> Result<f64>;
}

/// Outcome of one offset.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalOutcome {
    Predicted(f64),
    Failed(String),
}

/// Prediction (or failure) for one offset.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalEntry {
    offset_minutes: i64,
    target: NaiveDateTime,
    outcome: IntervalOutcome,
}

impl IntervalEntry {
    pub fn new(offset_minutes: i64, target: NaiveDateTime, outcome: IntervalOutcome) -> Self {
        Self {
            offset_minutes,
            target,
            outcome,
        }
    }

    pub fn offset_minutes(&self) -> i64 {
        self.offset_minutes
    }

    pub fn label(&self) -> String {
        offset_label(self.offset_minutes)
    }

    pub fn target(&self) -> &NaiveDateTime {
        &self.target
    }

    /// Target as `YYYY-MM-DD HH:MM:SS`.
    pub fn target_string(&self) -> String {
        format_timestamp(&self.target)
    }

    pub fn outcome(&self) -> &IntervalOutcome {
        &self.outcome
    }

    pub fn prediction(&self) -> Option<f64> {
        match self.outcome {
            IntervalOutcome::Predicted(v) => Some(v),
            IntervalOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            IntervalOutcome::Predicted(_) => None,
            IntervalOutcome::Failed(msg) => Some(msg),
        }
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self.outcome, IntervalOutcome::Predicted(_))
    }
}

/// Two-decimal rounding with exact halves going to the even digit.
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

impl Serialize for IntervalEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IntervalEntry", 2)?;
        state.serialize_field("datetime", &self.target_string())?;
        match &self.outcome {
            IntervalOutcome::Predicted(v) => state.serialize_field("predicted_demand", &round2(*v))?,
            IntervalOutcome::Failed(msg) => {
                state.serialize_field("predicted_demand", &format!("Error: {msg}"))?
            }
        }
        state.end()
    }
}

/// Labeled per-offset forecasts, in offset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalForecast {
    entries: Vec<IntervalEntry>,
}

impl IntervalForecast {
    pub fn new(entries: Vec<IntervalEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IntervalEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntervalEntry> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&IntervalEntry> {
        self.entries.iter().find(|e| e.label() == label)
    }

    /// Keep only entries whose label is in `labels`.
    pub fn subset(&self, labels: &[&str]) -> IntervalForecast {
        let entries = self
            .entries
            .iter()
            .filter(|e| labels.contains(&e.label().as_str()))
            .cloned()
            .collect();
        IntervalForecast { entries }
    }

    /// Entries that failed.
    pub fn failures(&self) -> impl Iterator<Item = &IntervalEntry> {
        self.entries.iter().filter(|e| !e.is_predicted())
    }
}

impl Serialize for IntervalForecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|e| (e.label(), e)))
    }
}

/// Predict every offset around `base`, isolating per-offset failures.
///
/// Only an unrepresentable target time fails the whole call.
pub fn forecast_intervals<P: PointPredictor + ?Sized>(
    predictor: &P,
    zone: ZoneId,
    base: &NaiveDateTime,
) -> Result<IntervalForecast> {
    let targets = OFFSETS_MINUTES
        .iter()
        .map(|&offset| {
            base.checked_add_signed(Duration::minutes(offset))
                .map(|target| (offset, target))
                .ok_or_else(|| {
                    DemandError::Prediction(format!("{base} {} is out of range", offset_label(offset)))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let entries = targets
        .into_iter()
        .map(|(offset, target)| {
            let outcome = match predictor.predict_at(zone, &target) {
                Ok(value) => IntervalOutcome::Predicted(value),
                Err(e) => {
                    warn!(zone, target = %target, error = %e, "interval prediction failed");
                    IntervalOutcome::Failed(e.to_string())
                }
            };
            IntervalEntry::new(offset, target, outcome)
        })
        .collect();

    Ok(IntervalForecast::new(entries))
}
