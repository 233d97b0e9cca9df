//! Sequence retrieval with synthetic fallback.

use crate::core::{DemandSequence, ZoneId};
use crate::error::Result;
use crate::sequence::history::HistoricalDataset;
use crate::sequence::synthetic::SyntheticSequencer;
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Supplies the 24-step demand window for a zone and target time.
///
/// History is consulted first when present; any lookup failure falls back
/// to [`SyntheticSequencer`]. The random source is the only mutable state
/// and is serialized behind a mutex.
#[derive(Debug)]
pub struct SequenceProvider {
    history: Option<HistoricalDataset>,
    sequencer: SyntheticSequencer,
    rng: Mutex<StdRng>,
}

impl SequenceProvider {
    /// Create a provider. `seed` of `None` seeds from OS entropy.
    pub fn new(history: Option<HistoricalDataset>, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(history, rng)
    }

    /// Create a provider that draws synthetic values from `rng`.
    pub fn with_rng(history: Option<HistoricalDataset>, rng: StdRng) -> Result<Self> {
        Ok(Self {
            history,
            sequencer: SyntheticSequencer::new()?,
            rng: Mutex::new(rng),
        })
    }

    /// Provider without a historical dataset.
    pub fn synthetic_only(seed: Option<u64>) -> Result<Self> {
        Self::new(None, seed)
    }

    pub fn history(&self) -> Option<&HistoricalDataset> {
        self.history.as_ref()
    }

    /// Historical window if available, otherwise a synthetic one.
    pub fn get_sequence(&self, zone: ZoneId, target: &NaiveDateTime) -> Result<DemandSequence> {
        if let Some(history) = &self.history {
            match history.sequence_before(zone, target) {
                Ok(sequence) => return Ok(sequence),
                Err(e) if history.contains(zone) => {
                    warn!(zone, target = %target, error = %e, "unusable history, using synthetic sequence");
                }
                Err(e) => {
                    warn!(zone, error = %e, "no history for zone, using synthetic sequence");
                }
            }
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.sequencer.generate(zone, target, &mut *rng)
    }
}
