//! Selection scenarios against an in-memory pool.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::{prelude::*, sample::select};
use tactica_core::{
  classification::{ClassifiedPuzzle, PrimaryTheme, PuzzleClassification},
  curriculum::{Block, Curriculum, Lesson, Level, Section},
  index::MemoryIndex,
  lesson::{DifficultyBand, LessonSelectionCriteria, PuzzleSlotAssignment},
  puzzle::{PieceKind, RawPuzzleRecord},
  theme::Theme,
};

use crate::{
  Error, Selector, SelectorConfig, filter, generate_lessons,
  select_lesson_puzzles,
};

fn puzzle(
  id: &str,
  rating: u32,
  plays: u32,
  piece: Option<PieceKind>,
  primary: Theme,
) -> ClassifiedPuzzle {
  ClassifiedPuzzle {
    record:         RawPuzzleRecord {
      id:                id.into(),
      starting_position: String::new(),
      move_list:         vec![],
      rating,
      times_played:      plays,
      raw_themes:        vec![primary.as_str().to_string()],
      source_url:        String::new(),
    },
    classification: PuzzleClassification {
      puzzle_id:               id.into(),
      predicted_primary_theme: PrimaryTheme::Theme(primary),
      reasoning:               vec![],
      involved_piece_type:     piece,
      supporting_themes:       vec![],
      recognized_themes:       vec![primary],
    },
  }
}

fn pin(id: &str, rating: u32) -> ClassifiedPuzzle {
  puzzle(id, rating, 5000, None, Theme::Pin)
}

fn pin_criteria() -> LessonSelectionCriteria {
  LessonSelectionCriteria {
    rating_min:        1000,
    rating_max:        1100,
    required_themes:   vec![Theme::Pin],
    excluded_themes:   vec![],
    piece_filter:      None,
    minimum_plays:     3000,
    mixed_themes:      vec![],
    target_difficulty: None,
  }
}

/// Nine qualifying pins spread over 1010..=1095 plus three that fail a
/// criterion.
fn pin_pool() -> MemoryIndex {
  let mut pool: Vec<ClassifiedPuzzle> = [
    1010, 1020, 1040, 1050, 1060, 1070, 1080, 1090, 1095,
  ]
  .iter()
  .map(|r| pin(&format!("pin{r}"), *r))
  .collect();
  pool.push(puzzle("quiet", 1050, 100, None, Theme::Pin));
  pool.push(puzzle("fork", 1050, 5000, None, Theme::Fork));
  pool.push(pin("high", 1300));
  MemoryIndex::new(pool)
}

fn ratings(picks: &[PuzzleSlotAssignment]) -> Vec<u32> {
  picks.iter().map(|p| p.assigned_difficulty).collect()
}

// ─── Slot layout ─────────────────────────────────────────────────────────────

#[test]
fn six_slots_follow_the_difficulty_curve() {
  let picks = Selector::default()
    .select("pins-1", &pin_criteria(), &pin_pool())
    .unwrap();

  assert_eq!(picks.len(), 6);
  let slots: Vec<u8> = picks.iter().map(|p| p.slot).collect();
  assert_eq!(slots, vec![1, 2, 3, 4, 5, 6]);

  let r = ratings(&picks);
  assert_eq!(&r[..2], &[1010, 1020]);
  assert!(r[2..4].iter().all(|x| (1040..=1060).contains(x)));
  assert!(r[4..].iter().all(|x| *x >= 1070));
  assert!(r.windows(2).all(|w| w[0] <= w[1]));

  assert_eq!(picks[0].band, DifficultyBand::Warmup);
  assert_eq!(picks[2].band, DifficultyBand::Core);
  assert_eq!(picks[5].band, DifficultyBand::Stretch);
}

#[test]
fn every_pick_is_distinct_and_qualifies() {
  let index = pin_pool();
  let criteria = pin_criteria();
  let picks = Selector::default()
    .select("pins-1", &criteria, &index)
    .unwrap();

  let ids: HashSet<&str> = picks.iter().map(|p| p.puzzle_id.as_str()).collect();
  assert_eq!(ids.len(), 6);
  for id in ids {
    let p = tactica_core::index::PuzzleIndex::get(&index, id).unwrap();
    assert!(filter::qualifies(&criteria, p), "{id} does not qualify");
  }
}

#[test]
fn same_inputs_same_selection() {
  let index = pin_pool();
  let selector = Selector::new(SelectorConfig {
    seed: 42,
    ..SelectorConfig::default()
  });
  let a = selector.select("pins-1", &pin_criteria(), &index).unwrap();
  let b = selector.select("pins-1", &pin_criteria(), &index).unwrap();
  assert_eq!(a, b);
}

#[test]
fn core_window_has_a_floor() {
  let selector = Selector::default();
  let mut c = pin_criteria();
  assert_eq!(selector.core_window(&c), 10);
  c.rating_max = 1400;
  assert_eq!(selector.core_window(&c), 40);
  c.rating_max = 1020;
  assert_eq!(selector.core_window(&c), 10);
}

// ─── Borrowing and variety ───────────────────────────────────────────────────

#[test]
fn empty_warmup_borrows_from_neighbours() {
  let index = MemoryIndex::new(
    [1045, 1050, 1055, 1070, 1080, 1090]
      .iter()
      .map(|r| pin(&format!("pin{r}"), *r)),
  );
  let picks = Selector::default()
    .select("pins-2", &pin_criteria(), &index)
    .unwrap();

  assert_eq!(picks.len(), 6);
  let warmups = picks
    .iter()
    .filter(|p| p.band == DifficultyBand::Warmup)
    .count();
  assert_eq!(warmups, 2);
  assert!(ratings(&picks).windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn prefers_unused_piece_and_theme() {
  let index = MemoryIndex::new(vec![
    puzzle("w1", 1010, 5000, Some(PieceKind::Queen), Theme::Pin),
    puzzle("w2", 1020, 5000, Some(PieceKind::Queen), Theme::Pin),
    puzzle("c1", 1045, 5000, Some(PieceKind::Knight), Theme::Pin),
    puzzle("c2", 1050, 5000, Some(PieceKind::Knight), Theme::Pin),
    puzzle("c3", 1055, 5000, Some(PieceKind::Bishop), Theme::Pin),
    puzzle("s1", 1080, 5000, Some(PieceKind::Rook), Theme::Pin),
    puzzle("s2", 1090, 5000, Some(PieceKind::Rook), Theme::Pin),
  ]);

  for seed in 0..8 {
    let selector = Selector::new(SelectorConfig {
      seed,
      ..SelectorConfig::default()
    });
    let picks = selector.select("pins-3", &pin_criteria(), &index).unwrap();
    let core: Vec<&str> = picks
      .iter()
      .filter(|p| p.band == DifficultyBand::Core)
      .map(|p| p.puzzle_id.as_str())
      .collect();
    assert_eq!(core.len(), 2);
    assert!(core.contains(&"c3"), "seed {seed}: {core:?}");
  }
}

#[test]
fn too_few_candidates_is_an_error() {
  let index = MemoryIndex::new(
    [1010, 1040, 1050, 1070, 1080]
      .iter()
      .map(|r| pin(&format!("pin{r}"), *r)),
  );
  let err = Selector::default()
    .select("pins-4", &pin_criteria(), &index)
    .unwrap_err();
  assert_eq!(
    err,
    Error::InsufficientCandidates {
      band:       DifficultyBand::Warmup,
      shortfall:  1,
      qualifying: 5,
    }
  );
}

#[test]
fn free_function_matches_selector() {
  let index = pin_pool();
  let config = SelectorConfig {
    seed: 9,
    ..SelectorConfig::default()
  };
  let free =
    select_lesson_puzzles(&pin_criteria(), &index, &config, "pins-1").unwrap();
  let method = Selector::new(config)
    .select("pins-1", &pin_criteria(), &index)
    .unwrap();
  assert_eq!(free, method);
}

// ─── Properties ──────────────────────────────────────────────────────────────

const PIECES: [Option<PieceKind>; 7] = [
  None,
  Some(PieceKind::Pawn),
  Some(PieceKind::Knight),
  Some(PieceKind::Bishop),
  Some(PieceKind::Rook),
  Some(PieceKind::Queen),
  Some(PieceKind::King),
];

/// Two to five qualifying pins per band (warmup below 1040, core 1040..=1060,
/// stretch above 1060), plus puzzles that miss the plays floor.
fn banded_pool() -> impl Strategy<Value = Vec<ClassifiedPuzzle>> {
  let band = |lo: u32, hi: u32| {
    prop::collection::vec((lo..=hi, select(PIECES.to_vec())), 2..=5)
  };
  let noise =
    prop::collection::vec((1000u32..=1100, 0u32..3000), 0..=6);
  (band(1000, 1039), band(1040, 1060), band(1061, 1100), noise).prop_map(
    |(warmup, core, stretch, noise)| {
      let mut pool = Vec::new();
      for (tag, members) in [("w", warmup), ("c", core), ("s", stretch)] {
        for (i, (rating, piece)) in members.into_iter().enumerate() {
          pool.push(puzzle(&format!("{tag}{i}"), rating, 5000, piece, Theme::Pin));
        }
      }
      for (i, (rating, plays)) in noise.into_iter().enumerate() {
        pool.push(puzzle(&format!("n{i}"), rating, plays, None, Theme::Pin));
      }
      pool
    },
  )
}

proptest! {
  #[test]
  fn banded_pools_always_fill_six_qualifying_slots(
    pool in banded_pool(),
    seed in any::<u64>(),
  ) {
    let index = MemoryIndex::new(pool);
    let criteria = pin_criteria();
    let config = SelectorConfig { seed, ..SelectorConfig::default() };
    let picks =
      select_lesson_puzzles(&criteria, &index, &config, "pins-p").unwrap();

    prop_assert_eq!(picks.len(), 6);
    let slots: Vec<u8> = picks.iter().map(|p| p.slot).collect();
    prop_assert_eq!(slots, vec![1, 2, 3, 4, 5, 6]);

    let ids: HashSet<&str> =
      picks.iter().map(|p| p.puzzle_id.as_str()).collect();
    prop_assert_eq!(ids.len(), 6);

    let r = ratings(&picks);
    prop_assert!(r.windows(2).all(|w| w[0] <= w[1]), "{:?}", r);

    for band in DifficultyBand::ALL {
      let n = picks.iter().filter(|p| p.band == band).count();
      prop_assert_eq!(n, 2, "band {}", band);
    }

    for id in ids {
      let p = tactica_core::index::PuzzleIndex::get(&index, id).unwrap();
      prop_assert!(filter::qualifies(&criteria, p), "{} does not qualify", id);
    }
  }
}

// ─── Generation ──────────────────────────────────────────────────────────────

fn lesson(id: &str, criteria: LessonSelectionCriteria) -> Lesson {
  Lesson {
    id: id.into(),
    name: id.into(),
    is_review: false,
    criteria,
  }
}

fn curriculum(lessons: Vec<Lesson>) -> Curriculum {
  Curriculum {
    levels: vec![Level {
      id:     "l1".into(),
      name:   "Level 1".into(),
      blocks: vec![Block {
        id:       "b1".into(),
        name:     "Block 1".into(),
        sections: vec![Section {
          id: "s1".into(),
          name: "Section 1".into(),
          lessons,
        }],
      }],
    }],
  }
}

#[test]
fn generation_reports_unfillable_lessons() {
  let mut forks = pin_criteria();
  forks.required_themes = vec![Theme::Fork];
  let tree = curriculum(vec![
    lesson("pins", pin_criteria()),
    lesson("forks", forks),
  ]);
  let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

  let report =
    generate_lessons(&tree, &pin_pool(), &Selector::default(), at);

  assert!(!report.is_complete());
  assert_eq!(report.manifest.lessons.len(), 1);
  assert!(report.manifest.lesson("pins").is_some());
  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].lesson_id, "forks");
  assert_eq!(report.failures[0].location, "l1/b1/s1/forks");
  assert_eq!(report.manifest.version.len(), 64);
  assert_eq!(report.manifest.generated_at, at);
}

#[test]
fn manifest_version_is_stable_across_runs() {
  let tree =
    curriculum(vec![lesson("a", pin_criteria()), lesson("b", pin_criteria())]);
  let index = pin_pool();
  let selector = Selector::default();
  let first = generate_lessons(
    &tree,
    &index,
    &selector,
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
  );
  let second = generate_lessons(
    &tree,
    &index,
    &selector,
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
  );
  assert_eq!(first.manifest.version, second.manifest.version);
  assert_eq!(first.manifest.lessons, second.manifest.lessons);

  let json = serde_json::to_string(&first.manifest).unwrap();
  assert!(json.contains("\"generated_at\""));
}
