//! Fixed-length hourly demand window.

use crate::error::{DemandError, Result};

/// Number of hourly steps fed to the models.
pub const SEQUENCE_LENGTH: usize = 24;

/// Where a demand sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSource {
    /// Most recent observations from the historical dataset.
    Historical,
    /// Heuristic stand-in generated from the hour-of-day profile.
    Synthetic,
}

/// Exactly [`SEQUENCE_LENGTH`] hourly demand values ending just before a target time.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSequence {
    values: Vec<f64>,
    source: SequenceSource,
}

impl DemandSequence {
    /// Wrap values, rejecting anything that is not exactly [`SEQUENCE_LENGTH`] long.
    pub fn new(values: Vec<f64>, source: SequenceSource) -> Result<Self> {
        if values.len() != SEQUENCE_LENGTH {
            return Err(DemandError::DimensionMismatch {
                expected: SEQUENCE_LENGTH,
                got: values.len(),
            });
        }
        Ok(Self { values, source })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn source(&self) -> SequenceSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
