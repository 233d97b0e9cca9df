//! Scaling transforms between model units and demand units.
//!
//! # Example
//!
//! ```
//! use zone_demand::transform::{ColumnScale, Denormalizer, FittedScaler};
//!
//! let scaler = FittedScaler::new(vec![
//!     ColumnScale::new(5.0, 5.0).unwrap(),
//!     ColumnScale::new(200.0, 100.0).unwrap(),
//! ])
//! .unwrap();
//! let denormalizer = Denormalizer::new(scaler);
//!
//! // Zone 1 uses column 1: 1.0 * 100 + 200
//! assert_eq!(denormalizer.denormalize(1.0, 1).unwrap(), 300.0);
//! ```

pub mod denormalize;
pub mod scale;

pub use denormalize::Denormalizer;
pub use scale::{ColumnScale, FittedScaler};
