//! Feature extraction for demand models.
//!
//! # Example
//!
//! ```
//! use zone_demand::core::parse_timestamp;
//! use zone_demand::features::{extract, TEMPORAL_FEATURES};
//!
//! let ts = parse_timestamp("2024-01-01 12:00:00").unwrap();
//! let features = extract(&ts);
//! assert_eq!(features.as_slice().len(), TEMPORAL_FEATURES);
//! ```

pub mod temporal;

pub use temporal::{extract, TemporalFeatures, TEMPORAL_FEATURES, TEMPORAL_FEATURE_NAMES};
