//! The `PuzzleIndex` trait and its in-memory implementation.
//!
//! The selector never reaches for a global cache of loaded puzzles; callers
//! build an index once and pass it in by reference. Implementations must be
//! read-only after construction so one index can be shared across worker
//! threads.

use std::collections::HashMap;

use crate::classification::ClassifiedPuzzle;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only lookup over a classified puzzle pool.
pub trait PuzzleIndex: Send + Sync {
  /// All puzzles with `min <= rating <= max`, ordered by rating then id.
  fn in_rating_range(&self, min: u32, max: u32) -> &[ClassifiedPuzzle];

  /// Look up a puzzle by id.
  fn get(&self, id: &str) -> Option<&ClassifiedPuzzle>;

  /// Number of puzzles in the index.
  fn len(&self) -> usize;

  fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── In-memory index ─────────────────────────────────────────────────────────

/// A rating-sorted vector with an id lookup table.
#[derive(Debug, Default)]
pub struct MemoryIndex {
  puzzles: Vec<ClassifiedPuzzle>,
  by_id:   HashMap<String, usize>,
}

impl MemoryIndex {
  /// Build an index. If two puzzles share an id, the later one wins.
  pub fn new(puzzles: impl IntoIterator<Item = ClassifiedPuzzle>) -> Self {
    let mut latest: HashMap<String, ClassifiedPuzzle> = HashMap::new();
    for p in puzzles {
      if let Some(prev) = latest.insert(p.record.id.clone(), p) {
        tracing::warn!(id = %prev.record.id, "duplicate puzzle id in pool");
      }
    }

    let mut puzzles: Vec<ClassifiedPuzzle> = latest.into_values().collect();
    puzzles.sort_by(|a, b| {
      a.record
        .rating
        .cmp(&b.record.rating)
        .then_with(|| a.record.id.cmp(&b.record.id))
    });
    let by_id = puzzles
      .iter()
      .enumerate()
      .map(|(i, p)| (p.record.id.clone(), i))
      .collect();

    Self { puzzles, by_id }
  }
}

impl PuzzleIndex for MemoryIndex {
  fn in_rating_range(&self, min: u32, max: u32) -> &[ClassifiedPuzzle] {
    if min > max {
      return &[];
    }
    let start = self.puzzles.partition_point(|p| p.record.rating < min);
    let end = self.puzzles.partition_point(|p| p.record.rating <= max);
    &self.puzzles[start..end]
  }

  fn get(&self, id: &str) -> Option<&ClassifiedPuzzle> {
    self.by_id.get(id).map(|&i| &self.puzzles[i])
  }

  fn len(&self) -> usize { self.puzzles.len() }
}
