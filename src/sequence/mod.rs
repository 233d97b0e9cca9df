//! Historical and synthetic demand sequences.
//!
//! # Example
//!
//! ```
//! use zone_demand::core::{parse_timestamp, SEQUENCE_LENGTH};
//! use zone_demand::sequence::SequenceProvider;
//!
//! let provider = SequenceProvider::synthetic_only(Some(42)).unwrap();
//! let target = parse_timestamp("2024-01-01 12:00:00").unwrap();
//! let sequence = provider.get_sequence(132, &target).unwrap();
//! assert_eq!(sequence.len(), SEQUENCE_LENGTH);
//! ```

pub mod history;
pub mod provider;
pub mod synthetic;

pub use history::{HistoricalDataset, ZoneHistory};
pub use provider::SequenceProvider;
pub use synthetic::{fnv1a_64, zone_scale_factor, SyntheticSequencer};
