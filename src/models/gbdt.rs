//! Gradient-boosted regression tree ensemble used as the residual corrector.
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "base_score": 0.0,
//!   "n_features": 33,
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 32, "threshold": 100.0, "left": 1, "right": 2, "default_left": true },
//!         { "leaf": -0.02 },
//!         { "leaf": 0.03 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A split sends `x[feature] < threshold` left; NaN follows `default_left`.
//! Child indices must point forward, so traversal always terminates.

use crate::error::{DemandError, Result};
use crate::models::traits::ResidualCorrector;
use serde::Deserialize;
use std::path::Path;

const ARTIFACT: &str = "residual corrector";

/// A node of a regression tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

/// A single regression tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Build a tree, checking that it is non-empty and every child index
    /// points forward to an existing node.
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        let tree = Self { nodes };
        tree.check(None).map_err(DemandError::InvalidParameter)?;
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn validate(&self, index: usize, n_features: usize) -> Result<()> {
        self.check(Some(n_features))
            .map_err(|reason| DemandError::artifact(ARTIFACT, format!("tree {index}: {reason}")))
    }

    fn check(&self, n_features: Option<usize>) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = *node
            {
                if let Some(n) = n_features.filter(|&n| feature >= n) {
                    return Err(format!("node {i}: feature {feature} >= {n}"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {i}: non-finite threshold"));
                }
                for child in [left, right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {i}: invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `features`.
    pub(crate) fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { leaf } => return leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[feature];
                    idx = if x.is_nan() {
                        if default_left {
                            left
                        } else {
                            right
                        }
                    } else if x < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnsemble {
    #[serde(default)]
    base_score: f64,
    n_features: usize,
    trees: Vec<Tree>,
}

/// Additive tree ensemble: `base_score + sum(tree leaves)`.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    base_score: f64,
    n_features: usize,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Build and validate an ensemble.
    pub fn new(base_score: f64, n_features: usize, trees: Vec<Tree>) -> Result<Self> {
        if !base_score.is_finite() {
            return Err(DemandError::artifact(ARTIFACT, "non-finite base_score"));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(i, n_features)?;
        }
        Ok(Self {
            base_score,
            n_features,
            trees,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawEnsemble =
            serde_json::from_str(json).map_err(|e| DemandError::artifact(ARTIFACT, e))?;
        Self::new(raw.base_score, raw.n_features, raw.trees)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DemandError::artifact(format!("{ARTIFACT} {}", path.display()), e))?;
        Self::from_json_str(&json)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl ResidualCorrector for TreeEnsemble {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(DemandError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        let score = self.base_score + self.trees.iter().map(|t| t.predict(features)).sum::<f64>();
        Ok(score)
    }

    fn name(&self) -> &str {
        "GBDT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64, default_left: bool) -> Tree {
        Tree::new(vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
                default_left,
            },
            Node::Leaf { leaf: low },
            Node::Leaf { leaf: high },
        ])
        .unwrap()
    }

    #[test]
    fn stump_routes_on_threshold() {
        let tree = stump(0, 1.0, -1.0, 1.0, false);
        assert_eq!(tree.predict(&[0.5]), -1.0);
        assert_eq!(tree.predict(&[1.0]), 1.0);
        assert_eq!(tree.predict(&[2.0]), 1.0);
    }

    #[test]
    fn nan_follows_default_direction() {
        assert_eq!(stump(0, 1.0, -1.0, 1.0, true).predict(&[f64::NAN]), -1.0);
        assert_eq!(stump(0, 1.0, -1.0, 1.0, false).predict(&[f64::NAN]), 1.0);
    }

    #[test]
    fn ensemble_sums_trees_and_base() {
        let ensemble = TreeEnsemble::new(
            0.5,
            2,
            vec![stump(0, 0.0, -0.1, 0.1, false), stump(1, 10.0, 0.2, -0.2, false)],
        )
        .unwrap();
        assert_eq!(ensemble.n_trees(), 2);
        assert_relative_eq!(ensemble.predict(&[1.0, 5.0]).unwrap(), 0.5 + 0.1 + 0.2);
        assert_relative_eq!(ensemble.predict(&[-1.0, 50.0]).unwrap(), 0.5 - 0.1 - 0.2);
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let ensemble = TreeEnsemble::new(0.0, 33, vec![]).unwrap();
        assert_eq!(
            ensemble.predict(&[0.0; 32]).unwrap_err(),
            DemandError::DimensionMismatch {
                expected: 33,
                got: 32
            }
        );
    }

    #[test]
    fn parse_json_ensemble() {
        let json = r#"{
            "base_score": 0.25,
            "n_features": 33,
            "trees": [
                {"nodes": [
                    {"feature": 32, "threshold": 100.0, "left": 1, "right": 2, "default_left": true},
                    {"leaf": -0.5},
                    {"leaf": 0.5}
                ]}
            ]
        }"#;
        let ensemble = TreeEnsemble::from_json_str(json).unwrap();
        let mut row = vec![0.0; 33];
        row[32] = 132.0;
        assert_relative_eq!(ensemble.predict(&row).unwrap(), 0.75);
        row[32] = 4.0;
        assert_relative_eq!(ensemble.predict(&row).unwrap(), -0.25);
    }

    #[test]
    fn rejects_backward_child() {
        let nodes = vec![
            Node::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 1,
                default_left: false,
            },
            Node::Leaf { leaf: 0.0 },
        ];
        assert!(matches!(
            Tree::new(nodes.clone()),
            Err(DemandError::InvalidParameter(_))
        ));
        assert!(matches!(
            TreeEnsemble::new(0.0, 1, vec![Tree { nodes }]),
            Err(DemandError::ArtifactLoad { .. })
        ));
    }

    #[test]
    fn rejects_empty_tree() {
        assert!(Tree::new(vec![]).is_err());
        let json = r#"{"n_features": 1, "trees": [{"nodes": []}]}"#;
        assert!(matches!(
            TreeEnsemble::from_json_str(json),
            Err(DemandError::ArtifactLoad { .. })
        ));
    }

    #[test]
    fn rejects_child_past_end() {
        let nodes = vec![Node::Split {
            feature: 0,
            threshold: 0.0,
            left: 1,
            right: 2,
            default_left: false,
        }];
        assert!(Tree::new(nodes).is_err());
    }

    #[test]
    fn rejects_out_of_range_feature() {
        assert!(TreeEnsemble::new(0.0, 3, vec![stump(3, 0.0, 0.0, 0.0, false)]).is_err());
    }
}
