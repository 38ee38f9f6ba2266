//! Error types for `tactica-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown theme name: {0:?}")]
  UnknownTheme(String),

  #[error("unknown piece kind: {0:?}")]
  UnknownPiece(String),

  #[error("puzzle {id}: {reason}")]
  InvalidRecord { id: String, reason: String },

  #[error("corpus line {line}: {source}")]
  CorpusLine {
    line:   usize,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
