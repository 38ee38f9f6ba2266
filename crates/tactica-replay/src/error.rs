//! Error types for board replay.
//!
//! Any of these on a corpus record means the source data is corrupt; callers
//! must surface them rather than skip the record.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid FEN {fen:?}: {reason}")]
  InvalidFen { fen: String, reason: String },

  #[error("illegal starting position: {0}")]
  InvalidPosition(String),

  #[error("malformed UCI move {uci:?} at ply {ply}")]
  MalformedMove { ply: usize, uci: String },

  #[error("illegal move {uci:?} at ply {ply}")]
  IllegalMove { ply: usize, uci: String },

  #[error("ply {requested} out of range: line has {available} half-moves")]
  PlyOutOfRange { requested: usize, available: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
