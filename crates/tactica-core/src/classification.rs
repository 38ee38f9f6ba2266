//! Primary-theme classification results.
//!
//! A classification is derived data: it can always be recomputed from the
//! record and the hierarchy table. The `reasoning` trace lists every rule
//! that fired, in order, so a classification can be audited offline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  puzzle::{PieceKind, RawPuzzleRecord},
  theme::{Theme, ThemeLevel},
};

// ─── Primary theme ───────────────────────────────────────────────────────────

/// The single theme a puzzle is considered to be "about".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PrimaryTheme {
  Theme(Theme),
  Unknown,
}

impl PrimaryTheme {
  pub const UNKNOWN_NAME: &'static str = "unknown";

  pub fn theme(&self) -> Option<Theme> {
    match self {
      Self::Theme(t) => Some(*t),
      Self::Unknown => None,
    }
  }

  pub fn is_unknown(&self) -> bool { matches!(self, Self::Unknown) }
}

impl fmt::Display for PrimaryTheme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Theme(t) => f.write_str(t.as_str()),
      Self::Unknown => f.write_str(Self::UNKNOWN_NAME),
    }
  }
}

impl From<PrimaryTheme> for String {
  fn from(p: PrimaryTheme) -> Self { p.to_string() }
}

impl TryFrom<String> for PrimaryTheme {
  type Error = Error;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    if s == Self::UNKNOWN_NAME {
      return Ok(Self::Unknown);
    }
    Ok(Self::Theme(s.parse()?))
  }
}

// ─── Reasoning trace ─────────────────────────────────────────────────────────

/// One rule firing in the classification trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ReasoningStep {
  /// The record violates a structural invariant; nothing else was tried.
  MalformedRecord { reason: String },
  /// The move list could not be replayed; the record is corrupt.
  ReplayFailed { error: String },
  /// A raw tag outside the known vocabulary was ignored.
  UnrecognizedTag { tag: String },
  /// META tags present on the record; never candidates for primary.
  MetaIgnored { themes: Vec<Theme> },
  /// Mate was tagged but the replayed line does not end in checkmate.
  /// The tags are trusted; this is an audit note.
  MateNotConfirmed { themes: Vec<Theme> },
  /// An outcome is present, so every mechanism was demoted.
  Absorption {
    outcome: Theme,
    demoted: Vec<Theme>,
  },
  /// Enablers kept as supporting themes because a mechanism or outcome
  /// co-occurs.
  EnablerRetained { enablers: Vec<Theme> },
  /// Bare enablers with nothing to enable.
  EnablerRejected { enablers: Vec<Theme> },
  /// Single-ply solution with several mechanisms: only the highest in the
  /// canonical priority order survives.
  SinglePlyTieBreak {
    kept:    Theme,
    dropped: Vec<Theme>,
  },
  /// A named mate pattern outranked generic mate labels.
  NamedPatternPriority {
    pattern:   Theme,
    outranked: Vec<Theme>,
  },
  /// A more specific outcome outranked less specific ones.
  OutcomeSpecificity {
    chosen:    Theme,
    outranked: Vec<Theme>,
  },
  /// Equally plausible candidates; resolved by corpus frequency, then
  /// canonical order.
  Ambiguity {
    candidates: Vec<Theme>,
    chosen:     Theme,
  },
  /// The final primary theme and the level it came from.
  Selected { theme: Theme, level: ThemeLevel },
  /// No tag survived the rules.
  NoClassifiableTheme,
}

// ─── Classification ──────────────────────────────────────────────────────────

/// The derived classification of one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleClassification {
  pub puzzle_id:               String,
  pub predicted_primary_theme: PrimaryTheme,
  pub reasoning:               Vec<ReasoningStep>,
  /// Piece moved by the solver's first ply, from replay.
  pub involved_piece_type:     Option<PieceKind>,
  /// Enablers retained alongside the primary theme.
  #[serde(default)]
  pub supporting_themes:       Vec<Theme>,
  /// Every raw tag that resolved to a known theme, in record order.
  #[serde(default)]
  pub recognized_themes:       Vec<Theme>,
}

impl PuzzleClassification {
  pub fn primary(&self) -> Option<Theme> {
    self.predicted_primary_theme.theme()
  }

  /// True when the primary theme or a retained enabler is `theme`.
  pub fn covers(&self, theme: Theme) -> bool {
    self.primary() == Some(theme) || self.supporting_themes.contains(&theme)
  }

  /// True when a tie-break had to choose between equally plausible primaries.
  pub fn is_ambiguous(&self) -> bool {
    self
      .reasoning
      .iter()
      .any(|s| matches!(s, ReasoningStep::Ambiguity { .. }))
  }

  /// The replay error message, if the record could not be replayed.
  pub fn replay_failure(&self) -> Option<&str> {
    self.reasoning.iter().find_map(|s| match s {
      ReasoningStep::ReplayFailed { error } => Some(error.as_str()),
      _ => None,
    })
  }
}

/// A record paired with its classification; the element of a classified
/// pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedPuzzle {
  pub record:         RawPuzzleRecord,
  pub classification: PuzzleClassification,
}
