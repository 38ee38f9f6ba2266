//! Six-slot lesson selection.
//!
//! Qualifying puzzles are split into warmup, core and stretch bands around the
//! lesson target. Two are drawn from each band, preferring variety of
//! (piece, primary theme). A short band borrows from its neighbours, nearest
//! ratings first. The six picks are then presented in ascending rating.

use std::collections::BTreeMap;

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tactica_core::{
  classification::ClassifiedPuzzle,
  index::PuzzleIndex,
  lesson::{
    DifficultyBand, LESSON_SIZE, LessonSelectionCriteria, PER_BAND,
    PuzzleSlotAssignment,
  },
  puzzle::PieceKind,
  theme::Theme,
};

use crate::{
  config::SelectorConfig,
  error::{Error, Result},
  filter,
};

type VarietyKey = (Option<PieceKind>, Option<Theme>);

fn variety_key(p: &ClassifiedPuzzle) -> VarietyKey {
  (
    p.classification.involved_piece_type,
    p.classification.primary(),
  )
}

/// Picks lessons from a classified pool.
///
/// Holds no mutable state; one selector serves any number of lessons, in
/// parallel if desired.
#[derive(Debug, Clone, Default)]
pub struct Selector {
  config: SelectorConfig,
}

impl Selector {
  pub fn new(config: SelectorConfig) -> Self { Self { config } }

  /// Half-width of the core band for `criteria`.
  pub fn core_window(&self, criteria: &LessonSelectionCriteria) -> u32 {
    let scaled =
      (criteria.rating_span() as f64 * self.config.core_window_ratio).round();
    (scaled as u32).max(self.config.min_core_window)
  }

  /// The band `rating` falls in for `criteria`.
  pub fn band_of(
    &self,
    criteria: &LessonSelectionCriteria,
    rating: u32,
  ) -> DifficultyBand {
    let target = i64::from(criteria.target());
    let window = i64::from(self.core_window(criteria));
    let rating = i64::from(rating);
    if rating < target - window {
      DifficultyBand::Warmup
    } else if rating > target + window {
      DifficultyBand::Stretch
    } else {
      DifficultyBand::Core
    }
  }

  /// Select exactly six puzzles for one lesson.
  ///
  /// `lesson_id` salts the shuffle seed so that lessons with identical
  /// criteria do not receive identical puzzles. The same inputs always
  /// produce the same selection.
  pub fn select<I: PuzzleIndex + ?Sized>(
    &self,
    lesson_id: &str,
    criteria: &LessonSelectionCriteria,
    index: &I,
  ) -> Result<Vec<PuzzleSlotAssignment>> {
    let qualifying = filter::qualifying(criteria, index);
    let total = qualifying.len();

    let mut rng = ChaCha8Rng::seed_from_u64(self.seed_for(lesson_id));
    let mut pools: BTreeMap<DifficultyBand, Vec<&ClassifiedPuzzle>> =
      DifficultyBand::ALL.iter().map(|b| (*b, Vec::new())).collect();
    for p in qualifying {
      let band = self.band_of(criteria, p.record.rating);
      pools.entry(band).or_default().push(p);
    }
    for pool in pools.values_mut() {
      pool.shuffle(&mut rng);
    }

    tracing::debug!(
      lesson = lesson_id,
      qualifying = total,
      warmup = pools[&DifficultyBand::Warmup].len(),
      core = pools[&DifficultyBand::Core].len(),
      stretch = pools[&DifficultyBand::Stretch].len(),
      "partitioned candidates"
    );

    // Own-band draws.
    let mut seen: Vec<VarietyKey> = Vec::new();
    let mut picks: Vec<(DifficultyBand, &ClassifiedPuzzle)> = Vec::new();
    for band in DifficultyBand::ALL {
      let pool = pools.entry(band).or_default();
      for p in draw(pool, PER_BAND, &mut seen, lesson_id, band) {
        picks.push((band, p));
      }
    }

    // Borrowing for short bands.
    for band in DifficultyBand::ALL {
      let mut short = PER_BAND - count_in(&picks, band);
      for neighbour in band.neighbours() {
        if short == 0 {
          break;
        }
        let pool = pools.entry(*neighbour).or_default();
        // Nearest ratings first: the low end of a harder band, the high end
        // of an easier one.
        if neighbour > &band {
          pool.sort_by_key(|p| (p.record.rating, p.record.id.clone()));
        } else {
          pool.sort_by_key(|p| {
            (std::cmp::Reverse(p.record.rating), p.record.id.clone())
          });
        }
        let borrowed = draw(pool, short, &mut seen, lesson_id, band);
        if !borrowed.is_empty() {
          tracing::debug!(
            lesson = lesson_id,
            %band,
            from = %neighbour,
            count = borrowed.len(),
            "borrowed candidates"
          );
        }
        short -= borrowed.len();
        picks.extend(borrowed.into_iter().map(|p| (band, p)));
      }
    }

    if picks.len() < LESSON_SIZE {
      let band = DifficultyBand::ALL
        .into_iter()
        .find(|b| count_in(&picks, *b) < PER_BAND)
        .unwrap_or(DifficultyBand::Core);
      return Err(Error::InsufficientCandidates {
        band,
        shortfall: LESSON_SIZE - picks.len(),
        qualifying: total,
      });
    }

    picks.sort_by(|(_, a), (_, b)| {
      a.record
        .rating
        .cmp(&b.record.rating)
        .then_with(|| a.record.id.cmp(&b.record.id))
    });

    Ok(
      picks
        .into_iter()
        .zip(1u8..)
        .map(|((band, p), slot)| PuzzleSlotAssignment {
          puzzle_id: p.record.id.clone(),
          slot,
          assigned_difficulty: p.record.rating,
          band,
        })
        .collect(),
    )
  }

  fn seed_for(&self, lesson_id: &str) -> u64 {
    let digest = Sha256::digest(lesson_id.as_bytes());
    let mut salt = [0u8; 8];
    salt.copy_from_slice(&digest[..8]);
    self.config.seed ^ u64::from_le_bytes(salt)
  }
}

/// Free-function form of [`Selector::select`].
pub fn select_lesson_puzzles<I: PuzzleIndex + ?Sized>(
  criteria: &LessonSelectionCriteria,
  index: &I,
  config: &SelectorConfig,
  lesson_id: &str,
) -> Result<Vec<PuzzleSlotAssignment>> {
  Selector::new(config.clone()).select(lesson_id, criteria, index)
}

fn count_in(
  picks: &[(DifficultyBand, &ClassifiedPuzzle)],
  band: DifficultyBand,
) -> usize {
  picks.iter().filter(|(b, _)| *b == band).count()
}

/// Take up to `n` puzzles from the front of `pool`, skipping any whose
/// variety key has already been used. Falls back to repeats when nothing
/// fresh remains.
fn draw<'a>(
  pool: &mut Vec<&'a ClassifiedPuzzle>,
  n: usize,
  seen: &mut Vec<VarietyKey>,
  lesson_id: &str,
  band: DifficultyBand,
) -> Vec<&'a ClassifiedPuzzle> {
  let mut out = Vec::with_capacity(n);
  while out.len() < n && !pool.is_empty() {
    let pos = match pool.iter().position(|p| !seen.contains(&variety_key(p))) {
      Some(pos) => pos,
      None => {
        tracing::debug!(
          lesson = lesson_id,
          %band,
          "variety relaxed: only repeated piece/theme pairs remain"
        );
        0
      }
    };
    let p = pool.remove(pos);
    seen.push(variety_key(p));
    out.push(p);
  }
  out
}
