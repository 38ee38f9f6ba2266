//! Error types for lesson selection.

use tactica_core::lesson::DifficultyBand;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The criteria cannot be met from the pool even after borrowing between
  /// bands. Reported per lesson; never silently degraded.
  #[error(
    "insufficient candidates: {band} band short by {shortfall} \
     ({qualifying} qualifying puzzles)"
  )]
  InsufficientCandidates {
    band:       DifficultyBand,
    shortfall:  usize,
    qualifying: usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
