//! Lesson selection criteria and the slot assignments a lesson produces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{puzzle::PieceKind, theme::Theme};

/// Number of puzzles in every generated lesson.
pub const LESSON_SIZE: usize = 6;

/// Puzzles drawn per difficulty band before borrowing.
pub const PER_BAND: usize = 2;

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Authored filter describing which puzzles may fill a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSelectionCriteria {
  pub rating_min:        u32,
  pub rating_max:        u32,
  /// All must be covered. Empty for mixed practice.
  #[serde(default)]
  pub required_themes:   Vec<Theme>,
  /// None may appear among the record's raw tags.
  #[serde(default)]
  pub excluded_themes:   Vec<Theme>,
  #[serde(default)]
  pub piece_filter:      Option<PieceKind>,
  #[serde(default)]
  pub minimum_plays:     u32,
  /// Any-of match on the primary theme, for mixed practice.
  #[serde(default)]
  pub mixed_themes:      Vec<Theme>,
  /// Defaults to the midpoint of the rating band.
  #[serde(default)]
  pub target_difficulty: Option<u32>,
}

impl LessonSelectionCriteria {
  /// The rating the core band is centred on.
  pub fn target(&self) -> u32 {
    self
      .target_difficulty
      .unwrap_or_else(|| self.rating_min + self.rating_span() / 2)
  }

  pub fn rating_span(&self) -> u32 {
    self.rating_max.saturating_sub(self.rating_min)
  }

  /// Mixed practice draws on any of `mixed_themes` rather than a fixed set.
  pub fn is_mixed(&self) -> bool {
    self.required_themes.is_empty() && !self.mixed_themes.is_empty()
  }
}

// ─── Difficulty bands ────────────────────────────────────────────────────────

/// A candidate's rating position relative to the lesson target.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
  Warmup,
  Core,
  Stretch,
}

impl DifficultyBand {
  pub const ALL: [DifficultyBand; 3] = [Self::Warmup, Self::Core, Self::Stretch];

  /// Bands a short band may borrow from, nearest first.
  pub fn neighbours(&self) -> &'static [DifficultyBand] {
    match self {
      Self::Warmup => &[Self::Core, Self::Stretch],
      Self::Core => &[Self::Warmup, Self::Stretch],
      Self::Stretch => &[Self::Core, Self::Warmup],
    }
  }
}

impl fmt::Display for DifficultyBand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Warmup => "warmup",
      Self::Core => "core",
      Self::Stretch => "stretch",
    };
    f.write_str(s)
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// One puzzle placed in a lesson slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSlotAssignment {
  pub puzzle_id:           String,
  /// 1-based presentation order.
  pub slot:                u8,
  pub assigned_difficulty: u32,
  /// The band the puzzle was drawn for.
  pub band:                DifficultyBand,
}

/// The persisted selection for one authored lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPuzzleSet {
  pub lesson_id:   String,
  pub lesson_name: String,
  pub puzzles:     Vec<PuzzleSlotAssignment>,
}
