//! Predictor configuration.
//!
//! ```toml
//! regressor_path = "models/global_lstm.json"
//! corrector_path = "models/global_gbdt.json"
//! scaler_path = "models/scaler.json"
//! historical_data_path = "data/history.json"
//! seed = 42
//! ```

use crate::error::{DemandError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Artifact locations and synthetic-sequence seeding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictorConfig {
    /// Sequence regressor weights.
    pub regressor_path: PathBuf,
    /// Residual corrector trees.
    pub corrector_path: PathBuf,
    /// Fitted scaler parameters.
    pub scaler_path: PathBuf,
    /// Optional per-zone demand history.
    #[serde(default)]
    pub historical_data_path: Option<PathBuf>,
    /// Seed for synthetic sequences (None for entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            regressor_path: PathBuf::from("models/global_lstm.json"),
            corrector_path: PathBuf::from("models/global_gbdt.json"),
            scaler_path: PathBuf::from("models/scaler.json"),
            historical_data_path: None,
            seed: None,
        }
    }
}

impl PredictorConfig {
    /// Create a config with explicit artifact paths.
    pub fn new(
        regressor_path: impl Into<PathBuf>,
        corrector_path: impl Into<PathBuf>,
        scaler_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            regressor_path: regressor_path.into(),
            corrector_path: corrector_path.into(),
            scaler_path: scaler_path.into(),
            ..Default::default()
        }
    }

    /// Consult a historical dataset before synthesizing sequences.
    pub fn with_historical_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.historical_data_path = Some(path.into());
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| DemandError::InvalidParameter(format!("config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            DemandError::InvalidParameter(format!("config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }
}
