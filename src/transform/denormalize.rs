//! Mapping a combined scaled score back to demand units.
//!
//! The scaler was fitted on a multi-column matrix, so a single score is
//! placed into a zero row at column `min(zone, W - 1)` and read back after
//! the inverse transform. Every zone id `>= W - 1` shares the last column's
//! parameters, meaning high-numbered zones are denormalized with statistics
//! of an unrelated column. This is the behavior the models were deployed
//! with and is kept as-is.

use crate::core::ZoneId;
use crate::error::{DemandError, Result};
use crate::transform::scale::FittedScaler;

/// Inverse-scales combined model scores.
#[derive(Debug, Clone)]
pub struct Denormalizer {
    scaler: FittedScaler,
}

impl Denormalizer {
    pub fn new(scaler: FittedScaler) -> Self {
        Self { scaler }
    }

    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    /// Scaler column used for `zone`.
    pub fn column_for(&self, zone: ZoneId) -> usize {
        let last = self.scaler.n_features() - 1;
        (zone as usize).min(last)
    }

    /// Denormalize `scaled` for `zone`, floor-clamped at zero.
    pub fn denormalize(&self, scaled: f64, zone: ZoneId) -> Result<f64> {
        if !scaled.is_finite() {
            return Err(DemandError::Prediction(format!(
                "cannot denormalize non-finite score {scaled}"
            )));
        }

        let column = self.column_for(zone);
        let mut row = vec![0.0; self.scaler.n_features()];
        row[column] = scaled;

        let value = self.scaler.inverse_transform(&row)?[column];
        if !value.is_finite() {
            return Err(DemandError::Prediction(format!(
                "denormalized value {value} for zone {zone} is not finite"
            )));
        }
        Ok(value.max(0.0))
    }
}
