//! Pretrained model components.
//!
//! The pipeline depends only on [`SequenceRegressor`] and
//! [`ResidualCorrector`]; [`LstmRegressor`] and [`TreeEnsemble`] are the
//! artifact-backed implementations loaded at startup.

pub mod gbdt;
pub mod lstm;
pub mod traits;

pub use gbdt::{Node, Tree, TreeEnsemble};
pub use lstm::LstmRegressor;
pub use traits::{
    residual_features, ResidualCorrector, SequenceRegressor, SharedCorrector, SharedRegressor,
    RESIDUAL_FEATURES,
};
