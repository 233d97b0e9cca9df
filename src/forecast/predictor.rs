//! Single-point demand prediction pipeline.
//!
//! temporal features + demand window -> regressor + residual corrector
//! (summed in scaled units) -> denormalize -> clamp at zero.

use crate::config::PredictorConfig;
use crate::core::{parse_timestamp, ZoneId};
use crate::error::{DemandError, Result};
use crate::features::extract;
use crate::forecast::intervals::{forecast_intervals, IntervalForecast, PointPredictor};
use crate::models::{
    residual_features, LstmRegressor, SharedCorrector, SharedRegressor, TreeEnsemble,
    RESIDUAL_FEATURES,
};
use crate::sequence::{HistoricalDataset, SequenceProvider};
use crate::transform::{Denormalizer, FittedScaler};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Demand predictor combining the pretrained components.
///
/// All components are immutable after construction; the predictor can be
/// shared across threads.
pub struct DemandPredictor {
    regressor: SharedRegressor,
    corrector: SharedCorrector,
    denormalizer: Denormalizer,
    sequences: SequenceProvider,
}

impl std::fmt::Debug for DemandPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemandPredictor")
            .field("regressor", &self.regressor.name())
            .field("corrector", &self.corrector.name())
            .field("scaler_columns", &self.denormalizer.scaler().n_features())
            .field("has_history", &self.sequences.history().is_some())
            .finish()
    }
}

impl DemandPredictor {
    pub fn new(
        regressor: SharedRegressor,
        corrector: SharedCorrector,
        scaler: FittedScaler,
        sequences: SequenceProvider,
    ) -> Self {
        Self {
            regressor,
            corrector,
            denormalizer: Denormalizer::new(scaler),
            sequences,
        }
    }

    /// Load every artifact named in `config`.
    ///
    /// Model, corrector and scaler failures are fatal. An unreadable
    /// historical dataset is logged and the predictor runs on synthetic
    /// sequences alone.
    pub fn from_config(config: &PredictorConfig) -> Result<Self> {
        let regressor = LstmRegressor::from_file(&config.regressor_path)?;
        info!(
            path = %config.regressor_path.display(),
            hidden = regressor.hidden_size(),
            "loaded sequence regressor"
        );

        let corrector = TreeEnsemble::from_file(&config.corrector_path)?;
        if corrector.n_features() != RESIDUAL_FEATURES {
            return Err(DemandError::artifact(
                "residual corrector",
                format!(
                    "expects {} features, pipeline provides {RESIDUAL_FEATURES}",
                    corrector.n_features()
                ),
            ));
        }
        info!(
            path = %config.corrector_path.display(),
            trees = corrector.n_trees(),
            "loaded residual corrector"
        );

        let scaler = FittedScaler::from_file(&config.scaler_path)?;
        info!(
            path = %config.scaler_path.display(),
            columns = scaler.n_features(),
            "loaded scaler"
        );

        let history = config.historical_data_path.as_ref().and_then(|path| {
            match HistoricalDataset::from_file(path) {
                Ok(dataset) => {
                    info!(path = %path.display(), zones = dataset.len(), "loaded historical data");
                    Some(dataset)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not load historical data");
                    None
                }
            }
        });

        let sequences = SequenceProvider::new(history, config.seed)?;
        Ok(Self::new(
            Arc::new(regressor),
            Arc::new(corrector),
            scaler,
            sequences,
        ))
    }

    pub fn denormalizer(&self) -> &Denormalizer {
        &self.denormalizer
    }

    pub fn sequences(&self) -> &SequenceProvider {
        &self.sequences
    }

    /// Predict demand for `zone` at a `YYYY-MM-DD HH:MM:SS` timestamp.
    pub fn predict_single(&self, zone: ZoneId, datetime: &str) -> Result<f64> {
        let target = parse_timestamp(datetime)?;
        self.predict_at(zone, &target)
    }

    /// Predict the fixed offsets around a `YYYY-MM-DD HH:MM:SS` base time.
    pub fn predict_with_intervals(&self, zone: ZoneId, datetime: &str) -> Result<IntervalForecast> {
        let base = parse_timestamp(datetime)?;
        forecast_intervals(self, zone, &base)
    }

    /// Combined scaled score: regressor output plus residual correction.
    pub fn scaled_score(&self, zone: ZoneId, target: &NaiveDateTime) -> Result<f64> {
        let sequence = self.sequences.get_sequence(zone, target)?;
        let temporal = extract(target);

        let base = self.regressor.predict(&sequence, &temporal, zone as f64)?;
        let residual = self
            .corrector
            .predict(&residual_features(&sequence, &temporal, zone))?;

        debug!(
            zone,
            target = %target,
            source = ?sequence.source(),
            base,
            residual,
            "scored demand window"
        );
        Ok(base + residual)
    }
}

impl PointPredictor for DemandPredictor {
    fn predict_at(&self, zone: ZoneId, target: &NaiveDateTime) -> Result<f64> {
        let scaled = self.scaled_score(zone, target)?;
        let demand = self.denormalizer.denormalize(scaled, zone)?;
        debug!(zone, target = %target, scaled, demand, "predicted demand");
        Ok(demand)
    }
}
