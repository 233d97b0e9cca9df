//! Core data structures shared by the prediction pipeline.

mod sequence;
mod timestamp;

pub use sequence::{DemandSequence, SequenceSource, SEQUENCE_LENGTH};
pub use timestamp::{format_timestamp, parse_timestamp, ZoneId, TIMESTAMP_FORMAT};
