//! Recurrent sequence regressor loaded from exported weights.
//!
//! Single-layer LSTM (input size 1) summarizing the demand window, followed
//! by a dense head over `[hidden, temporal features, zone]`:
//! ReLU(fc1) -> ReLU(fc2) -> fc3. Dropout used in training is inactive here.
//!
//! Weights are read from a JSON object keyed like a PyTorch state dict
//! (`lstm.weight_ih_l0`, `lstm.weight_hh_l0`, `lstm.bias_ih_l0`,
//! `lstm.bias_hh_l0`, `fc{1,2,3}.weight`, `fc{1,2,3}.bias`), with LSTM
//! gates stacked in i, f, g, o order.

use crate::core::DemandSequence;
use crate::error::{DemandError, Result};
use crate::features::{TemporalFeatures, TEMPORAL_FEATURES};
use crate::models::traits::SequenceRegressor;
use serde::Deserialize;
use std::path::Path;

const ARTIFACT: &str = "sequence regressor";

#[derive(Debug, Deserialize)]
struct StateDict {
    #[serde(rename = "lstm.weight_ih_l0")]
    weight_ih: Vec<Vec<f64>>,
    #[serde(rename = "lstm.weight_hh_l0")]
    weight_hh: Vec<Vec<f64>>,
    #[serde(rename = "lstm.bias_ih_l0")]
    bias_ih: Vec<f64>,
    #[serde(rename = "lstm.bias_hh_l0")]
    bias_hh: Vec<f64>,
    #[serde(rename = "fc1.weight")]
    fc1_weight: Vec<Vec<f64>>,
    #[serde(rename = "fc1.bias")]
    fc1_bias: Vec<f64>,
    #[serde(rename = "fc2.weight")]
    fc2_weight: Vec<Vec<f64>>,
    #[serde(rename = "fc2.bias")]
    fc2_bias: Vec<f64>,
    #[serde(rename = "fc3.weight")]
    fc3_weight: Vec<Vec<f64>>,
    #[serde(rename = "fc3.bias")]
    fc3_bias: Vec<f64>,
}

fn shape_error(name: &str, expected: String, got: String) -> DemandError {
    DemandError::artifact(ARTIFACT, format!("{name}: expected shape {expected}, got {got}"))
}

fn check_matrix(name: &str, m: &[Vec<f64>], rows: usize, cols: usize) -> Result<()> {
    if m.len() != rows || m.iter().any(|r| r.len() != cols) {
        let got_cols = m.first().map(|r| r.len()).unwrap_or(0);
        return Err(shape_error(
            name,
            format!("[{rows}, {cols}]"),
            format!("[{}, {got_cols}]", m.len()),
        ));
    }
    Ok(())
}

fn check_vector(name: &str, v: &[f64], len: usize) -> Result<()> {
    if v.len() != len {
        return Err(shape_error(name, format!("[{len}]"), format!("[{}]", v.len())));
    }
    Ok(())
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Fully connected layer, weights stored `[outputs][inputs]`.
#[derive(Debug, Clone)]
struct Dense {
    weight: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl Dense {
    fn new(name: &str, weight: Vec<Vec<f64>>, bias: Vec<f64>, inputs: usize) -> Result<Self> {
        if weight.is_empty() {
            return Err(DemandError::artifact(ARTIFACT, format!("{name}.weight is empty")));
        }
        check_matrix(&format!("{name}.weight"), &weight, weight.len(), inputs)?;
        check_vector(&format!("{name}.bias"), &bias, weight.len())?;
        Ok(Self { weight, bias })
    }

    fn outputs(&self) -> usize {
        self.weight.len()
    }

    fn forward(&self, x: &[f64]) -> Vec<f64> {
        self.weight
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(x).map(|(w, xi)| w * xi).sum::<f64>() + b)
            .collect()
    }

    fn forward_relu(&self, x: &[f64]) -> Vec<f64> {
        self.forward(x).into_iter().map(|v| v.max(0.0)).collect()
    }
}

#[derive(Debug, Clone)]
struct LstmCell {
    /// Input weights per gate row (input size is 1).
    weight_ih: Vec<f64>,
    weight_hh: Vec<Vec<f64>>,
    /// `bias_ih + bias_hh`.
    bias: Vec<f64>,
    hidden: usize,
}

impl LstmCell {
    fn step(&self, x: f64, h: &[f64], c: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = self.hidden;
        let gates: Vec<f64> = (0..4 * n)
            .map(|row| {
                let recurrent: f64 = self.weight_hh[row].iter().zip(h).map(|(w, hi)| w * hi).sum();
                self.weight_ih[row] * x + recurrent + self.bias[row]
            })
            .collect();

        let mut h_next = Vec::with_capacity(n);
        let mut c_next = Vec::with_capacity(n);
        for j in 0..n {
            let input = sigmoid(gates[j]);
            let forget = sigmoid(gates[n + j]);
            let cell = gates[2 * n + j].tanh();
            let output = sigmoid(gates[3 * n + j]);
            let c_j = forget * c[j] + input * cell;
            c_next.push(c_j);
            h_next.push(output * c_j.tanh());
        }
        (h_next, c_next)
    }

    /// Final hidden state after consuming `inputs` from a zero state.
    fn summarize(&self, inputs: &[f64]) -> Vec<f64> {
        let mut h = vec![0.0; self.hidden];
        let mut c = vec![0.0; self.hidden];
        for &x in inputs {
            let (h_next, c_next) = self.step(x, &h, &c);
            h = h_next;
            c = c_next;
        }
        h
    }
}

/// LSTM + dense-head regressor.
#[derive(Debug, Clone)]
pub struct LstmRegressor {
    cell: LstmCell,
    fc1: Dense,
    fc2: Dense,
    fc3: Dense,
}

impl LstmRegressor {
    /// Parse and validate exported weights.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dict: StateDict =
            serde_json::from_str(json).map_err(|e| DemandError::artifact(ARTIFACT, e))?;
        Self::from_state_dict(dict)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DemandError::artifact(format!("{ARTIFACT} {}", path.display()), e))?;
        Self::from_json_str(&json)
    }

    fn from_state_dict(dict: StateDict) -> Result<Self> {
        let gate_rows = dict.weight_hh.len();
        if gate_rows == 0 || gate_rows % 4 != 0 {
            return Err(DemandError::artifact(
                ARTIFACT,
                format!("lstm.weight_hh_l0 has {gate_rows} rows, expected a positive multiple of 4"),
            ));
        }
        let hidden = gate_rows / 4;

        check_matrix("lstm.weight_ih_l0", &dict.weight_ih, gate_rows, 1)?;
        check_matrix("lstm.weight_hh_l0", &dict.weight_hh, gate_rows, hidden)?;
        check_vector("lstm.bias_ih_l0", &dict.bias_ih, gate_rows)?;
        check_vector("lstm.bias_hh_l0", &dict.bias_hh, gate_rows)?;

        let cell = LstmCell {
            weight_ih: dict.weight_ih.iter().map(|r| r[0]).collect(),
            weight_hh: dict.weight_hh,
            bias: dict.bias_ih.iter().zip(&dict.bias_hh).map(|(a, b)| a + b).collect(),
            hidden,
        };

        let fc1 = Dense::new("fc1", dict.fc1_weight, dict.fc1_bias, hidden + TEMPORAL_FEATURES + 1)?;
        let fc2 = Dense::new("fc2", dict.fc2_weight, dict.fc2_bias, fc1.outputs())?;
        let fc3 = Dense::new("fc3", dict.fc3_weight, dict.fc3_bias, fc2.outputs())?;
        if fc3.outputs() != 1 {
            return Err(shape_error("fc3.weight", "[1, _]".to_string(), format!("[{}, _]", fc3.outputs())));
        }

        Ok(Self { cell, fc1, fc2, fc3 })
    }

    /// Size of the recurrent summary.
    pub fn hidden_size(&self) -> usize {
        self.cell.hidden
    }

    /// Widths of the two dense hidden layers.
    pub fn head_widths(&self) -> (usize, usize) {
        (self.fc1.outputs(), self.fc2.outputs())
    }
}

impl SequenceRegressor for LstmRegressor {
    fn predict(
        &self,
        sequence: &DemandSequence,
        temporal: &TemporalFeatures,
        zone: f64,
    ) -> Result<f64> {
        let mut combined = self.cell.summarize(sequence.values());
        combined.extend_from_slice(temporal.as_slice());
        combined.push(zone);

        let x = self.fc1.forward_relu(&combined);
        let x = self.fc2.forward_relu(&x);
        let score = self.fc3.forward(&x)[0];

        if !score.is_finite() {
            return Err(DemandError::Prediction(format!(
                "{} produced non-finite score {score}",
                self.name()
            )));
        }
        Ok(score)
    }

    fn name(&self) -> &str {
        "LSTM"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_timestamp, SequenceSource, SEQUENCE_LENGTH};
    use crate::features::extract;
    use approx::assert_relative_eq;
    use serde_json::{json, Value};

    /// Hidden size 1, only the cell-gate bias set, head reading h and the zone.
    fn weights(cell_bias: f64, zone_weight: f64) -> Value {
        let mut fc1_row = vec![0.0; 1 + TEMPORAL_FEATURES + 1];
        fc1_row[0] = 1.0;
        let mut fc1_zone_row = vec![0.0; 1 + TEMPORAL_FEATURES + 1];
        fc1_zone_row[1 + TEMPORAL_FEATURES] = zone_weight;
        json!({
            "lstm.weight_ih_l0": [[0.0], [0.0], [0.0], [0.0]],
            "lstm.weight_hh_l0": [[0.0], [0.0], [0.0], [0.0]],
            "lstm.bias_ih_l0": [0.0, 0.0, cell_bias, 0.0],
            "lstm.bias_hh_l0": [0.0, 0.0, 0.0, 0.0],
            "fc1.weight": [fc1_row, fc1_zone_row],
            "fc1.bias": [0.0, 0.0],
            "fc2.weight": [[1.0, 0.0], [0.0, 1.0]],
            "fc2.bias": [0.0, 0.0],
            "fc3.weight": [[2.0, 1.0]],
            "fc3.bias": [0.1]
        })
    }

    fn inputs() -> (DemandSequence, TemporalFeatures) {
        let seq = DemandSequence::new(vec![0.5; SEQUENCE_LENGTH], SequenceSource::Synthetic).unwrap();
        let temporal = extract(&parse_timestamp("2024-01-01 12:00:00").unwrap());
        (seq, temporal)
    }

    #[test]
    fn forward_matches_closed_form() {
        let model = LstmRegressor::from_json_str(&weights(0.8, 0.0).to_string()).unwrap();
        assert_eq!(model.hidden_size(), 1);
        assert_eq!(model.head_widths(), (2, 2));

        // i = f = o = 0.5, g = tanh(0.8): c_t = 0.5 c_{t-1} + 0.5 g
        let g = 0.8_f64.tanh();
        let c = g * (1.0 - 0.5_f64.powi(SEQUENCE_LENGTH as i32));
        let h = 0.5 * c.tanh();

        let (seq, temporal) = inputs();
        let score = model.predict(&seq, &temporal, 10.0).unwrap();
        assert_relative_eq!(score, 2.0 * h + 0.1, epsilon = 1e-12);
    }

    #[test]
    fn relu_clips_negative_hidden_units() {
        let model = LstmRegressor::from_json_str(&weights(0.0, -1.0).to_string()).unwrap();
        let (seq, temporal) = inputs();
        let score = model.predict(&seq, &temporal, 50.0).unwrap();
        assert_relative_eq!(score, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn zone_scalar_feeds_head() {
        let model = LstmRegressor::from_json_str(&weights(0.0, 0.01).to_string()).unwrap();
        let (seq, temporal) = inputs();
        let score = model.predict(&seq, &temporal, 50.0).unwrap();
        assert_relative_eq!(score, 0.5 + 0.1, epsilon = 1e-12);
    }

    #[test]
    fn rejects_mismatched_head() {
        let mut w = weights(0.0, 0.0);
        w["fc1.weight"] = json!([[0.0, 0.0]]);
        w["fc1.bias"] = json!([0.0]);
        let err = LstmRegressor::from_json_str(&w.to_string()).unwrap_err();
        assert!(matches!(err, DemandError::ArtifactLoad { .. }));
    }

    #[test]
    fn rejects_bad_gate_count() {
        let mut w = weights(0.0, 0.0);
        w["lstm.weight_hh_l0"] = json!([[0.0], [0.0], [0.0]]);
        assert!(LstmRegressor::from_json_str(&w.to_string()).is_err());
    }

    #[test]
    fn rejects_missing_tensor() {
        let mut w = weights(0.0, 0.0);
        w.as_object_mut().unwrap().remove("fc3.bias");
        assert!(matches!(
            LstmRegressor::from_json_str(&w.to_string()),
            Err(DemandError::ArtifactLoad { .. })
        ));
    }

    #[test]
    fn missing_file_is_artifact_error() {
        let err = LstmRegressor::from_file("/nonexistent/regressor.json").unwrap_err();
        assert!(matches!(err, DemandError::ArtifactLoad { .. }));
    }
}
