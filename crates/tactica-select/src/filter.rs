//! Candidate qualification.
//!
//! A puzzle qualifies for a lesson only if it satisfies every criterion. The
//! selector never substitutes a non-qualifying puzzle, so this is the single
//! place the criteria are interpreted.

use tactica_core::{
  classification::ClassifiedPuzzle, index::PuzzleIndex,
  lesson::LessonSelectionCriteria,
};

/// Whether `puzzle` satisfies all of `criteria`.
pub fn qualifies(
  criteria: &LessonSelectionCriteria,
  puzzle: &ClassifiedPuzzle,
) -> bool {
  let record = &puzzle.record;
  let class = &puzzle.classification;

  if record.rating < criteria.rating_min || record.rating > criteria.rating_max
  {
    return false;
  }
  if record.times_played < criteria.minimum_plays {
    return false;
  }

  let Some(primary) = class.primary() else {
    return false;
  };

  let themes_ok = if criteria.is_mixed() {
    criteria.mixed_themes.contains(&primary)
  } else {
    criteria.required_themes.iter().all(|t| class.covers(*t))
  };
  if !themes_ok {
    return false;
  }

  if criteria
    .excluded_themes
    .iter()
    .any(|t| class.recognized_themes.contains(t))
  {
    return false;
  }

  match criteria.piece_filter {
    Some(piece) => class.involved_piece_type == Some(piece),
    None => true,
  }
}

/// Every qualifying puzzle in `index`, ordered by rating then id.
pub fn qualifying<'a, I: PuzzleIndex + ?Sized>(
  criteria: &LessonSelectionCriteria,
  index: &'a I,
) -> Vec<&'a ClassifiedPuzzle> {
  index
    .in_rating_range(criteria.rating_min, criteria.rating_max)
    .iter()
    .filter(|p| qualifies(criteria, p))
    .collect()
}
