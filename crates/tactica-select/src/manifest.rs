//! Curriculum-wide lesson generation and the persisted manifest.
//!
//! The manifest version is a SHA-256 over the sorted (lesson_id, slot,
//! puzzle_id) triples, so it depends only on what was selected, never on the
//! order lessons were processed in or when they were generated.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tactica_core::{
  curriculum::Curriculum, index::PuzzleIndex, lesson::LessonPuzzleSet,
};

use crate::{error::Error, select::Selector};

/// Every generated lesson with a content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonManifest {
  pub version:      String,
  pub generated_at: DateTime<Utc>,
  pub lessons:      Vec<LessonPuzzleSet>,
}

impl LessonManifest {
  pub fn new(lessons: Vec<LessonPuzzleSet>, generated_at: DateTime<Utc>) -> Self {
    Self {
      version: fingerprint(&lessons),
      generated_at,
      lessons,
    }
  }

  pub fn lesson(&self, lesson_id: &str) -> Option<&LessonPuzzleSet> {
    self.lessons.iter().find(|l| l.lesson_id == lesson_id)
  }
}

/// Content hash over the selected puzzles of `lessons`.
pub fn fingerprint(lessons: &[LessonPuzzleSet]) -> String {
  let mut triples: Vec<(&str, u8, &str)> = lessons
    .iter()
    .flat_map(|l| {
      l.puzzles
        .iter()
        .map(move |p| (l.lesson_id.as_str(), p.slot, p.puzzle_id.as_str()))
    })
    .collect();
  triples.sort();

  let mut hasher = Sha256::new();
  for (lesson, slot, puzzle) in triples {
    hasher.update(lesson.as_bytes());
    hasher.update([0u8]);
    hasher.update([slot]);
    hasher.update(puzzle.as_bytes());
    hasher.update([0u8]);
  }
  hex::encode(hasher.finalize())
}

// ─── Generation ──────────────────────────────────────────────────────────────

/// A lesson whose criteria could not be met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonFailure {
  pub lesson_id: String,
  /// Display form of the lesson's location in the tree.
  pub location:  String,
  pub error:     Error,
}

/// Result of generating every lesson in a curriculum.
#[derive(Debug, Clone)]
pub struct GenerationReport {
  pub manifest: LessonManifest,
  pub failures: Vec<LessonFailure>,
}

impl GenerationReport {
  pub fn is_complete(&self) -> bool { self.failures.is_empty() }
}

/// Select puzzles for every lesson in `curriculum`, in parallel.
///
/// Lessons that cannot be filled are reported in `failures` and left out of
/// the manifest; the remaining lessons are kept in tree order.
pub fn generate_lessons<I: PuzzleIndex + ?Sized>(
  curriculum: &Curriculum,
  index: &I,
  selector: &Selector,
  generated_at: DateTime<Utc>,
) -> GenerationReport {
  let lessons: Vec<_> = curriculum.lessons().collect();

  let outcomes: Vec<Result<LessonPuzzleSet, LessonFailure>> = lessons
    .par_iter()
    .map(|(path, lesson)| {
      selector
        .select(&lesson.id, &lesson.criteria, index)
        .map(|puzzles| LessonPuzzleSet {
          lesson_id: lesson.id.clone(),
          lesson_name: lesson.name.clone(),
          puzzles,
        })
        .map_err(|error| LessonFailure {
          lesson_id: lesson.id.clone(),
          location: path.to_string(),
          error,
        })
    })
    .collect();

  let mut sets = Vec::new();
  let mut failures = Vec::new();
  for outcome in outcomes {
    match outcome {
      Ok(set) => sets.push(set),
      Err(failure) => {
        tracing::warn!(
          lesson = %failure.lesson_id,
          location = %failure.location,
          error = %failure.error,
          "lesson could not be filled"
        );
        failures.push(failure);
      }
    }
  }

  tracing::info!(
    lessons = sets.len(),
    failures = failures.len(),
    "generated lessons"
  );

  GenerationReport {
    manifest: LessonManifest::new(sets, generated_at),
    failures,
  }
}

#[cfg(test)]
mod tests {
  use tactica_core::lesson::{DifficultyBand, PuzzleSlotAssignment};

  use super::*;

  fn set(lesson: &str, ids: &[&str]) -> LessonPuzzleSet {
    LessonPuzzleSet {
      lesson_id:   lesson.into(),
      lesson_name: lesson.into(),
      puzzles:     ids
        .iter()
        .zip(1u8..)
        .map(|(id, slot)| PuzzleSlotAssignment {
          puzzle_id: id.to_string(),
          slot,
          assigned_difficulty: 1000,
          band: DifficultyBand::Core,
        })
        .collect(),
    }
  }

  #[test]
  fn fingerprint_ignores_lesson_order() {
    let a = vec![set("a", &["p1", "p2"]), set("b", &["p3"])];
    let b = vec![set("b", &["p3"]), set("a", &["p1", "p2"])];
    assert_eq!(fingerprint(&a), fingerprint(&b));
    assert_eq!(fingerprint(&a).len(), 64);
  }

  #[test]
  fn fingerprint_changes_with_selection() {
    let a = vec![set("a", &["p1", "p2"])];
    let b = vec![set("a", &["p2", "p1"])];
    let c = vec![set("a", &["p1", "p9"])];
    assert_ne!(fingerprint(&a), fingerprint(&b));
    assert_ne!(fingerprint(&a), fingerprint(&c));
  }
}
