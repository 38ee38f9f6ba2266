//! Structural checks over an authored curriculum.
//!
//! The walk reads the tree in presentation order and never mutates it; the
//! same tree always yields the same report, violations in tree order.

use std::{collections::HashMap, fmt, ops::Range};

use serde::{Deserialize, Serialize};
use tactica_core::{
  curriculum::{Curriculum, Lesson, NodePath, Section},
  puzzle::PieceKind,
  theme::Theme,
};

/// Limits applied by [`validate`], read from the `[validator]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorRules {
  /// Longest allowed run of consecutive lessons with one piece filter.
  pub max_same_piece_run:              usize,
  /// Longest allowed run of consecutive lessons with one required set.
  pub max_same_theme_run:              usize,
  /// Fewest distinct piece filters a section must exercise.
  pub min_distinct_pieces_per_section: usize,
}

impl Default for ValidatorRules {
  fn default() -> Self {
    Self {
      max_same_piece_run:              2,
      max_same_theme_run:              2,
      min_distinct_pieces_per_section: 2,
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationKind {
  SamePieceRun {
    piece:   PieceKind,
    lessons: Vec<String>,
    max:     usize,
  },
  SameThemeRun {
    themes:  Vec<Theme>,
    lessons: Vec<String>,
    max:     usize,
  },
  TooFewPieces {
    distinct: usize,
    min:      usize,
  },
  ReviewNotMixed,
  DuplicateLessonId {
    first: NodePath,
  },
  InvertedRatingBand {
    min: u32,
    max: u32,
  },
  RequiredAndExcluded {
    themes: Vec<Theme>,
  },
}

impl fmt::Display for ViolationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::SamePieceRun { piece, lessons, max } => write!(
        f,
        "{} consecutive {piece} lessons (max {max}): {}",
        lessons.len(),
        lessons.join(", ")
      ),
      Self::SameThemeRun {
        themes,
        lessons,
        max,
      } => write!(
        f,
        "{} consecutive lessons require [{}] (max {max}): {}",
        lessons.len(),
        join(themes),
        lessons.join(", ")
      ),
      Self::TooFewPieces { distinct, min } => {
        write!(f, "section uses {distinct} distinct pieces (min {min})")
      }
      Self::ReviewNotMixed => {
        f.write_str("review lesson does not draw from a mixed-theme pool")
      }
      Self::DuplicateLessonId { first } => {
        write!(f, "lesson id already used at {first}")
      }
      Self::InvertedRatingBand { min, max } => {
        write!(f, "rating band is inverted ({min} > {max})")
      }
      Self::RequiredAndExcluded { themes } => {
        write!(f, "themes both required and excluded: {}", join(themes))
      }
    }
  }
}

fn join(themes: &[Theme]) -> String {
  themes
    .iter()
    .map(|t| t.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub location: NodePath,
  #[serde(flatten)]
  pub kind:     ViolationKind,
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.location, self.kind)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
  pub violations: Vec<Violation>,
}

impl ValidationReport {
  pub fn passed(&self) -> bool { self.violations.is_empty() }
}

// ─── Walk ────────────────────────────────────────────────────────────────────

/// Check `curriculum` against `rules`.
pub fn validate(
  curriculum: &Curriculum,
  rules: &ValidatorRules,
) -> ValidationReport {
  let mut violations = Vec::new();
  let mut seen_ids: HashMap<&str, NodePath> = HashMap::new();

  for (section_path, section) in curriculum.sections() {
    for lesson in &section.lessons {
      let path = section_path.with_lesson(lesson);
      if let Some(first) = seen_ids.get(lesson.id.as_str()) {
        violations.push(Violation {
          location: path.clone(),
          kind:     ViolationKind::DuplicateLessonId {
            first: first.clone(),
          },
        });
      } else {
        seen_ids.insert(&lesson.id, path.clone());
      }
      check_lesson(&path, lesson, &mut violations);
    }
    check_runs(&section_path, section, rules, &mut violations);
    check_variety(&section_path, section, rules, &mut violations);
  }

  tracing::debug!(violations = violations.len(), "validated curriculum");
  ValidationReport { violations }
}

fn check_lesson(path: &NodePath, lesson: &Lesson, out: &mut Vec<Violation>) {
  let criteria = &lesson.criteria;
  let mut push = |kind| {
    out.push(Violation {
      location: path.clone(),
      kind,
    })
  };

  if criteria.rating_min > criteria.rating_max {
    push(ViolationKind::InvertedRatingBand {
      min: criteria.rating_min,
      max: criteria.rating_max,
    });
  }

  let mut clash: Vec<Theme> = criteria
    .required_themes
    .iter()
    .filter(|t| criteria.excluded_themes.contains(t))
    .copied()
    .collect();
  if !clash.is_empty() {
    clash.sort();
    clash.dedup();
    push(ViolationKind::RequiredAndExcluded { themes: clash });
  }

  if lesson.is_review && !criteria.is_mixed() {
    push(ViolationKind::ReviewNotMixed);
  }
}

fn check_runs(
  section_path: &NodePath,
  section: &Section,
  rules: &ValidatorRules,
  out: &mut Vec<Violation>,
) {
  let lessons = &section.lessons;
  let at = |range: &Range<usize>| section_path.with_lesson(&lessons[range.start]);
  let ids = |range: &Range<usize>| -> Vec<String> {
    lessons[range.clone()].iter().map(|l| l.id.clone()).collect()
  };

  let pieces: Vec<Option<PieceKind>> =
    lessons.iter().map(|l| l.criteria.piece_filter).collect();
  for (piece, range) in runs(&pieces) {
    if range.len() > rules.max_same_piece_run {
      out.push(Violation {
        location: at(&range),
        kind:     ViolationKind::SamePieceRun {
          piece,
          lessons: ids(&range),
          max: rules.max_same_piece_run,
        },
      });
    }
  }

  let theme_sets: Vec<Option<Vec<Theme>>> = lessons
    .iter()
    .map(|l| {
      let mut set = l.criteria.required_themes.clone();
      set.sort();
      set.dedup();
      (!set.is_empty()).then_some(set)
    })
    .collect();
  for (themes, range) in runs(&theme_sets) {
    if range.len() > rules.max_same_theme_run {
      out.push(Violation {
        location: at(&range),
        kind:     ViolationKind::SameThemeRun {
          themes,
          lessons: ids(&range),
          max: rules.max_same_theme_run,
        },
      });
    }
  }
}

fn check_variety(
  section_path: &NodePath,
  section: &Section,
  rules: &ValidatorRules,
  out: &mut Vec<Violation>,
) {
  let mut pieces: Vec<PieceKind> = section
    .lessons
    .iter()
    .filter_map(|l| l.criteria.piece_filter)
    .collect();
  pieces.sort();
  pieces.dedup();

  if pieces.len() < rules.min_distinct_pieces_per_section {
    out.push(Violation {
      location: section_path.clone(),
      kind:     ViolationKind::TooFewPieces {
        distinct: pieces.len(),
        min:      rules.min_distinct_pieces_per_section,
      },
    });
  }
}

/// Maximal runs of equal `Some` keys. `None` never joins a run.
fn runs<K: Clone + PartialEq>(keys: &[Option<K>]) -> Vec<(K, Range<usize>)> {
  let mut out: Vec<(K, Range<usize>)> = Vec::new();
  for (i, key) in keys.iter().enumerate() {
    let Some(key) = key else { continue };
    match out.last_mut() {
      Some((prev, range)) if range.end == i && prev == key => range.end = i + 1,
      _ => out.push((key.clone(), i..i + 1)),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use tactica_core::{
    curriculum::{Block, Level},
    lesson::LessonSelectionCriteria,
  };

  use super::*;

  fn criteria() -> LessonSelectionCriteria {
    LessonSelectionCriteria {
      rating_min:        800,
      rating_max:        1000,
      required_themes:   vec![],
      excluded_themes:   vec![],
      piece_filter:      None,
      minimum_plays:     0,
      mixed_themes:      vec![],
      target_difficulty: None,
    }
  }

  fn lesson(id: &str, piece: Option<PieceKind>, themes: &[Theme]) -> Lesson {
    let mut c = criteria();
    c.piece_filter = piece;
    c.required_themes = themes.to_vec();
    Lesson {
      id:        id.into(),
      name:      id.into(),
      is_review: false,
      criteria:  c,
    }
  }

  fn tree(sections: Vec<Vec<Lesson>>) -> Curriculum {
    Curriculum {
      levels: vec![Level {
        id:     "l1".into(),
        name:   "Level".into(),
        blocks: vec![Block {
          id:       "b1".into(),
          name:     "Block".into(),
          sections: sections
            .into_iter()
            .enumerate()
            .map(|(i, lessons)| Section {
              id: format!("s{}", i + 1),
              name: format!("Section {}", i + 1),
              lessons,
            })
            .collect(),
        }],
      }],
    }
  }

  fn kinds(report: &ValidationReport) -> Vec<&ViolationKind> {
    report.violations.iter().map(|v| &v.kind).collect()
  }

  #[test]
  fn well_formed_section_passes() {
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("b", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("c", Some(PieceKind::Bishop), &[Theme::Pin]),
    ]]);
    let report = validate(&c, &ValidatorRules::default());
    assert!(report.passed(), "{:?}", report.violations);
  }

  #[test]
  fn long_piece_run_is_reported_once_at_its_start() {
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("b", Some(PieceKind::Knight), &[Theme::Pin]),
      lesson("c", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("d", Some(PieceKind::Rook), &[Theme::Skewer]),
    ]]);
    let report = validate(&c, &ValidatorRules::default());
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.location.to_string(), "l1/b1/s1/a");
    assert_eq!(
      v.kind,
      ViolationKind::SamePieceRun {
        piece:   PieceKind::Knight,
        lessons: vec!["a".into(), "b".into(), "c".into()],
        max:     2,
      }
    );
  }

  #[test]
  fn unfiltered_lessons_break_piece_runs() {
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("b", Some(PieceKind::Knight), &[Theme::Pin]),
      lesson("c", None, &[Theme::Skewer]),
      lesson("d", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("e", Some(PieceKind::Bishop), &[Theme::Pin]),
    ]]);
    assert!(validate(&c, &ValidatorRules::default()).passed());
  }

  #[test]
  fn theme_runs_compare_sets_not_order() {
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork, Theme::Pin]),
      lesson("b", Some(PieceKind::Bishop), &[Theme::Pin, Theme::Fork]),
      lesson("c", Some(PieceKind::Rook), &[Theme::Fork, Theme::Pin]),
    ]]);
    let report = validate(&c, &ValidatorRules::default());
    assert!(matches!(
      kinds(&report)[..],
      [ViolationKind::SameThemeRun { .. }]
    ));
  }

  #[test]
  fn section_needs_distinct_pieces() {
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("b", None, &[Theme::Pin]),
    ]]);
    let report = validate(&c, &ValidatorRules::default());
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].location.to_string(), "l1/b1/s1");
    assert_eq!(
      report.violations[0].kind,
      ViolationKind::TooFewPieces {
        distinct: 1,
        min:      2,
      }
    );
  }

  #[test]
  fn review_must_be_mixed() {
    let mut review = lesson("r", None, &[Theme::Fork]);
    review.is_review = true;
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("b", Some(PieceKind::Bishop), &[Theme::Pin]),
      review,
    ]]);
    let report = validate(&c, &ValidatorRules::default());
    assert_eq!(kinds(&report), vec![&ViolationKind::ReviewNotMixed]);
    assert_eq!(report.violations[0].location.to_string(), "l1/b1/s1/r");
  }

  #[test]
  fn sanity_checks_on_criteria_and_ids() {
    let mut bad = lesson("a", Some(PieceKind::Bishop), &[Theme::Pin]);
    bad.criteria.rating_min = 1200;
    bad.criteria.excluded_themes = vec![Theme::Pin];
    let c = tree(vec![
      vec![
        lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
        lesson("b", Some(PieceKind::Rook), &[Theme::Skewer]),
      ],
      vec![bad, lesson("c", Some(PieceKind::Queen), &[Theme::Fork])],
    ]);
    let report = validate(&c, &ValidatorRules::default());
    assert_eq!(
      kinds(&report),
      vec![
        &ViolationKind::DuplicateLessonId {
          first: NodePath {
            level:   "l1".into(),
            block:   Some("b1".into()),
            section: Some("s1".into()),
            lesson:  Some("a".into()),
          },
        },
        &ViolationKind::InvertedRatingBand {
          min: 1200,
          max: 1000,
        },
        &ViolationKind::RequiredAndExcluded {
          themes: vec![Theme::Pin],
        },
      ]
    );
  }

  #[test]
  fn validation_is_idempotent() {
    let c = tree(vec![vec![
      lesson("a", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("b", Some(PieceKind::Knight), &[Theme::Fork]),
      lesson("c", Some(PieceKind::Knight), &[Theme::Fork]),
    ]]);
    let rules = ValidatorRules::default();
    let first = validate(&c, &rules);
    let second = validate(&c, &rules);
    assert!(!first.passed());
    assert_eq!(first, second);
  }

  #[test]
  fn report_serializes_with_rule_tag() {
    let c = tree(vec![vec![lesson("a", Some(PieceKind::Knight), &[])]]);
    let report = validate(&c, &ValidatorRules::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["violations"][0]["rule"], "too_few_pieces");
    assert_eq!(json["violations"][0]["location"]["section"], "s1");
  }
}
