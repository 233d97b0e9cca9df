//! Evaluation interfaces for the pretrained components.

use crate::core::{DemandSequence, ZoneId, SEQUENCE_LENGTH};
use crate::error::Result;
use crate::features::{TemporalFeatures, TEMPORAL_FEATURES};
use std::sync::Arc;

/// Width of the residual corrector input: sequence, temporal features, zone id.
pub const RESIDUAL_FEATURES: usize = SEQUENCE_LENGTH + TEMPORAL_FEATURES + 1;

/// Pretrained model producing a base demand score in scaled units.
///
/// Implementations are immutable after loading and must be safe to share
/// across threads for read-only inference.
pub trait SequenceRegressor: Send + Sync {
    /// Score a demand window with its temporal context and zone scalar.
    fn predict(
        &self,
        sequence: &DemandSequence,
        temporal: &TemporalFeatures,
        zone: f64,
    ) -> Result<f64>;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Pretrained model predicting the regressor's leftover error.
pub trait ResidualCorrector: Send + Sync {
    /// Score a flattened [`RESIDUAL_FEATURES`]-wide feature row.
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Shared handle to a sequence regressor.
pub type SharedRegressor = Arc<dyn SequenceRegressor>;

/// Shared handle to a residual corrector.
pub type SharedCorrector = Arc<dyn ResidualCorrector>;

/// Concatenate sequence, temporal features and raw zone id, in that order.
pub fn residual_features(
    sequence: &DemandSequence,
    temporal: &TemporalFeatures,
    zone: ZoneId,
) -> Vec<f64> {
    let mut row = Vec::with_capacity(RESIDUAL_FEATURES);
    row.extend_from_slice(sequence.values());
    row.extend_from_slice(temporal.as_slice());
    row.push(zone as f64);
    row
}
