//! Per-zone historical demand records.

use crate::core::{parse_timestamp, DemandSequence, SequenceSource, ZoneId, SEQUENCE_LENGTH};
use crate::error::{DemandError, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Ordered hourly demand observations for one zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneHistory {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl ZoneHistory {
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(DemandError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        Ok(Self { timestamps, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The `len` most recent values strictly before `target`.
    pub fn window_before(&self, target: &NaiveDateTime, len: usize) -> Result<Vec<f64>> {
        if self.timestamps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DemandError::HistoricalDataUnavailable(
                "timestamps are not strictly increasing".to_string(),
            ));
        }

        let end = self.timestamps.partition_point(|t| t < target);
        if end < len {
            return Err(DemandError::HistoricalDataUnavailable(format!(
                "need {len} observations before {target}, got {end}"
            )));
        }

        let window = &self.values[end - len..end];
        if window.iter().any(|v| !v.is_finite()) {
            return Err(DemandError::HistoricalDataUnavailable(format!(
                "non-finite demand in window ending {target}"
            )));
        }

        Ok(window.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    timestamp: String,
    demand: f64,
}

/// Read-only collection of zone histories keyed by zone id.
#[derive(Debug, Clone, Default)]
pub struct HistoricalDataset {
    zones: HashMap<ZoneId, ZoneHistory>,
}

impl HistoricalDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, zone: ZoneId, history: ZoneHistory) -> Self {
        self.insert(zone, history);
        self
    }

    pub fn insert(&mut self, zone: ZoneId, history: ZoneHistory) {
        self.zones.insert(zone, history);
    }

    pub fn get(&self, zone: ZoneId) -> Option<&ZoneHistory> {
        self.zones.get(&zone)
    }

    pub fn contains(&self, zone: ZoneId) -> bool {
        self.zones.contains_key(&zone)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Parse `{ "<zone>": [{ "timestamp": "...", "demand": ... }, ...], ... }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<RawObservation>> = serde_json::from_str(json)
            .map_err(|e| DemandError::artifact("historical dataset", e))?;

        let mut dataset = Self::new();
        for (key, observations) in raw {
            let zone: ZoneId = key
                .trim()
                .parse()
                .map_err(|e| DemandError::artifact("historical dataset", format!("zone '{key}': {e}")))?;

            let mut timestamps = Vec::with_capacity(observations.len());
            let mut values = Vec::with_capacity(observations.len());
            for obs in observations {
                let ts = parse_timestamp(&obs.timestamp)
                    .map_err(|e| DemandError::artifact("historical dataset", e))?;
                timestamps.push(ts);
                values.push(obs.demand);
            }
            dataset.insert(zone, ZoneHistory::new(timestamps, values)?);
        }
        Ok(dataset)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DemandError::artifact(format!("historical dataset {}", path.display()), e))?;
        Self::from_json_str(&json)
    }

    /// The [`SEQUENCE_LENGTH`] most recent observations for `zone` before `target`.
    pub fn sequence_before(&self, zone: ZoneId, target: &NaiveDateTime) -> Result<DemandSequence> {
        let history = self.get(zone).ok_or_else(|| {
            DemandError::HistoricalDataUnavailable(format!("no history for zone {zone}"))
        })?;
        let values = history.window_before(target, SEQUENCE_LENGTH)?;
        DemandSequence::new(values, SequenceSource::Historical)
    }
}
