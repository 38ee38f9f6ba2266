//! Error types for `tactica-classify`.
//!
//! Every variant describes a structurally invalid hierarchy table. These are
//! fatal configuration errors.

use tactica_core::theme::{Theme, ThemeLevel};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("unknown theme name in hierarchy config: {0:?}")]
  UnknownTheme(String),

  #[error("theme {0} has no hierarchy level; no rule can reach it")]
  Unreachable(Theme),

  #[error("mechanism {0} is missing from the canonical priority list")]
  MissingPriority(Theme),

  #[error("theme {0} appears more than once in the canonical priority list")]
  DuplicatePriority(Theme),

  #[error("priority list entry {theme} is a {level}, not a MECHANISM")]
  PriorityNotMechanism { theme: Theme, level: ThemeLevel },

  #[error("named pattern {theme} is a {level}, not an OUTCOME")]
  NamedPatternNotOutcome { theme: Theme, level: ThemeLevel },

  #[error("synonym {alias:?} points at unknown theme {target:?}")]
  DanglingSynonym { alias: String, target: String },

  #[error("synonym {alias:?} shadows canonical theme {canonical}")]
  SynonymShadowsCanonical { alias: String, canonical: Theme },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
