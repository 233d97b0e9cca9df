//! Per-column affine scaling fitted during training.
//!
//! Each column stores a center and a scale with
//! `scaled = (x - center) / scale` and `x = scaled * scale + center`.

use crate::error::{DemandError, Result};
use serde::Deserialize;
use std::path::Path;

const ARTIFACT: &str = "scaler";

/// Affine parameters for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScale {
    /// Value mapped to zero (mean, or the min-max offset).
    pub center: f64,
    /// Spread mapped to one (std dev, or the min-max range).
    pub scale: f64,
}

impl ColumnScale {
    pub fn new(center: f64, scale: f64) -> Result<Self> {
        if !center.is_finite() || !scale.is_finite() || scale == 0.0 {
            return Err(DemandError::InvalidParameter(format!(
                "column scale requires finite center and non-zero finite scale, got ({center}, {scale})"
            )));
        }
        Ok(Self { center, scale })
    }

    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled * self.scale + self.center
    }
}

/// Scaler parameters as exported by the training pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerParams {
    /// `scaled = (x - mean) / scale`.
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `scaled = x * scale + min`.
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// A multi-column scaler with fixed column count `W`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedScaler {
    columns: Vec<ColumnScale>,
}

impl FittedScaler {
    pub fn new(columns: Vec<ColumnScale>) -> Result<Self> {
        if columns.is_empty() {
            return Err(DemandError::InvalidParameter(
                "scaler needs at least one column".to_string(),
            ));
        }
        Ok(Self { columns })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: ScalerParams =
            serde_json::from_str(json).map_err(|e| DemandError::artifact(ARTIFACT, e))?;
        Self::from_params(params).map_err(|e| DemandError::artifact(ARTIFACT, e))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DemandError::artifact(format!("{ARTIFACT} {}", path.display()), e))?;
        Self::from_json_str(&json)
    }

    fn from_params(params: ScalerParams) -> Result<Self> {
        let columns = match params {
            ScalerParams::Standard { mean, scale } => {
                check_lengths(mean.len(), scale.len())?;
                mean.iter()
                    .zip(&scale)
                    .map(|(&m, &s)| ColumnScale::new(m, s))
                    .collect::<Result<Vec<_>>>()?
            }
            ScalerParams::MinMax { min, scale } => {
                check_lengths(min.len(), scale.len())?;
                // x * s + m = (x - c) / k  with  k = 1 / s, c = -m / s
                min.iter()
                    .zip(&scale)
                    .map(|(&m, &s)| {
                        if s == 0.0 {
                            return Err(DemandError::InvalidParameter(
                                "min-max scale of zero".to_string(),
                            ));
                        }
                        ColumnScale::new(-m / s, 1.0 / s)
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };
        Self::new(columns)
    }

    /// Number of columns `W`.
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnScale> {
        self.columns.get(index)
    }

    pub fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row)?;
        Ok(row
            .iter()
            .zip(&self.columns)
            .map(|(&x, c)| c.inverse(x))
            .collect())
    }

    fn check_width(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DemandError::DimensionMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        Ok(())
    }
}

fn check_lengths(offsets: usize, scales: usize) -> Result<()> {
    if offsets != scales {
        return Err(DemandError::DimensionMismatch {
            expected: offsets,
            got: scales,
        });
    }
    Ok(())
}
