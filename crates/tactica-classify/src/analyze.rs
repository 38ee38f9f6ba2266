//! The theme classification engine.
//!
//! `analyze` is total: it never fails. Malformed records and lines that do
//! not replay come back as UNKNOWN with the reason in the trace.
//!
//! Rule passes, in order:
//!   raw tags
//!     └─ resolve + partition by level    (unrecognized → ignored, logged)
//!          └─ enabler validity           (bare enablers rejected)
//!               └─ outcome present?
//!                    ├─ yes: absorption, then outcome specificity
//!                    └─ no:  single-ply tie-break over mechanisms
//!                         └─ fallback: corpus frequency, canonical order

use std::cmp::Reverse;

use tactica_core::{
  classification::{PrimaryTheme, PuzzleClassification, ReasoningStep},
  puzzle::RawPuzzleRecord,
  theme::{Theme, ThemeLevel},
};

use crate::{frequency::TagFrequencies, hierarchy::HierarchyTable};

/// Recognized tags split by hierarchy level.
#[derive(Debug, Default)]
struct Partition {
  mechanisms: Vec<Theme>,
  enablers:   Vec<Theme>,
  outcomes:   Vec<Theme>,
  metas:      Vec<Theme>,
}

/// Classifies records against one hierarchy table.
///
/// Holds no mutable state; one analyzer can be shared across threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
  table:       HierarchyTable,
  frequencies: TagFrequencies,
}

impl Analyzer {
  pub fn new(table: HierarchyTable) -> Self {
    Self {
      table,
      frequencies: TagFrequencies::default(),
    }
  }

  /// Use corpus frequencies for the fallback tie-break.
  pub fn with_frequencies(mut self, frequencies: TagFrequencies) -> Self {
    self.frequencies = frequencies;
    self
  }

  /// Classify one record.
  pub fn analyze(&self, record: &RawPuzzleRecord) -> PuzzleClassification {
    let mut trace = Vec::new();
    let recognized = self.recognize(record, &mut trace);

    let mut result = PuzzleClassification {
      puzzle_id:               record.id.clone(),
      predicted_primary_theme: PrimaryTheme::Unknown,
      reasoning:               Vec::new(),
      involved_piece_type:     None,
      supporting_themes:       Vec::new(),
      recognized_themes:       recognized.clone(),
    };

    if let Err(e) = record.validate() {
      trace.push(ReasoningStep::MalformedRecord {
        reason: e.to_string(),
      });
      result.reasoning = trace;
      return result;
    }

    let line = match tactica_replay::replay_line(
      &record.starting_position,
      &record.move_list,
    ) {
      Ok(line) => line,
      Err(e) => {
        tracing::warn!(puzzle = %record.id, error = %e, "replay failed");
        trace.push(ReasoningStep::ReplayFailed {
          error: e.to_string(),
        });
        result.reasoning = trace;
        return result;
      }
    };
    result.involved_piece_type = line.first_solution_piece();

    let parts = self.partition(&recognized);
    if !parts.metas.is_empty() {
      trace.push(ReasoningStep::MetaIgnored {
        themes: parts.metas.clone(),
      });
    }

    let mates: Vec<Theme> = parts
      .outcomes
      .iter()
      .copied()
      .filter(|t| self.table.is_mate(*t))
      .collect();
    if !mates.is_empty() && !line.is_checkmate {
      trace.push(ReasoningStep::MateNotConfirmed { themes: mates });
    }

    result.supporting_themes = self.check_enablers(&parts, &mut trace);

    match self.choose_primary(record, &parts, &mut trace) {
      Some((theme, level)) => {
        trace.push(ReasoningStep::Selected { theme, level });
        result.predicted_primary_theme = PrimaryTheme::Theme(theme);
      }
      None => trace.push(ReasoningStep::NoClassifiableTheme),
    }

    result.reasoning = trace;
    result
  }

  // ── Passes ──────────────────────────────────────────────────────────────

  /// Resolve raw tags, dropping duplicates and logging unknown names.
  fn recognize(
    &self,
    record: &RawPuzzleRecord,
    trace: &mut Vec<ReasoningStep>,
  ) -> Vec<Theme> {
    let mut recognized = Vec::new();
    for tag in &record.raw_themes {
      match self.table.resolve(tag) {
        Some(theme) => {
          if !recognized.contains(&theme) {
            recognized.push(theme);
          }
        }
        None => {
          tracing::debug!(
            puzzle = %record.id,
            tag = %tag,
            "ignoring unrecognized tag"
          );
          trace.push(ReasoningStep::UnrecognizedTag { tag: tag.clone() });
        }
      }
    }
    recognized
  }

  fn partition(&self, recognized: &[Theme]) -> Partition {
    let mut parts = Partition::default();
    for theme in recognized {
      let bucket = match self.table.level(*theme) {
        Some(ThemeLevel::Mechanism) => &mut parts.mechanisms,
        Some(ThemeLevel::Enabler) => &mut parts.enablers,
        Some(ThemeLevel::Outcome) => &mut parts.outcomes,
        Some(ThemeLevel::Meta) | None => &mut parts.metas,
      };
      bucket.push(*theme);
    }
    parts
  }

  /// Enablers describe how, never what: keep them only as supporting themes,
  /// and only when there is something for them to enable.
  fn check_enablers(
    &self,
    parts: &Partition,
    trace: &mut Vec<ReasoningStep>,
  ) -> Vec<Theme> {
    if parts.enablers.is_empty() {
      return Vec::new();
    }
    if parts.mechanisms.is_empty() && parts.outcomes.is_empty() {
      trace.push(ReasoningStep::EnablerRejected {
        enablers: parts.enablers.clone(),
      });
      return Vec::new();
    }
    trace.push(ReasoningStep::EnablerRetained {
      enablers: parts.enablers.clone(),
    });
    parts.enablers.clone()
  }

  fn choose_primary(
    &self,
    record: &RawPuzzleRecord,
    parts: &Partition,
    trace: &mut Vec<ReasoningStep>,
  ) -> Option<(Theme, ThemeLevel)> {
    if !parts.outcomes.is_empty() {
      let mut ranking = Vec::new();
      let outcome = self.choose_outcome(&parts.outcomes, &mut ranking)?;
      if !parts.mechanisms.is_empty() {
        trace.push(ReasoningStep::Absorption {
          outcome,
          demoted: parts.mechanisms.clone(),
        });
      }
      trace.extend(ranking);
      return Some((outcome, ThemeLevel::Outcome));
    }

    if parts.mechanisms.len() > 1 && record.player_move_count() == 1 {
      let kept = parts
        .mechanisms
        .iter()
        .copied()
        .min_by_key(|t| self.table.priority_rank(*t))?;
      trace.push(ReasoningStep::SinglePlyTieBreak {
        kept,
        dropped: parts
          .mechanisms
          .iter()
          .copied()
          .filter(|t| *t != kept)
          .collect(),
      });
      return Some((kept, ThemeLevel::Mechanism));
    }

    let mechanism = self.break_tie(&parts.mechanisms, trace)?;
    Some((mechanism, ThemeLevel::Mechanism))
  }

  /// Named pattern over "mate in N" over bare mate over non-mate payoffs.
  fn choose_outcome(
    &self,
    outcomes: &[Theme],
    trace: &mut Vec<ReasoningStep>,
  ) -> Option<Theme> {
    let best = outcomes
      .iter()
      .map(|t| self.table.outcome_rank(*t))
      .min()?;
    let top: Vec<Theme> = outcomes
      .iter()
      .copied()
      .filter(|t| self.table.outcome_rank(*t) == best)
      .collect();
    let outranked: Vec<Theme> = outcomes
      .iter()
      .copied()
      .filter(|t| self.table.outcome_rank(*t) > best)
      .collect();

    let chosen = self.break_tie(&top, trace)?;
    if !outranked.is_empty() {
      if self.table.is_named_pattern(chosen)
        && outranked.iter().any(|t| t.is_generic_mate())
      {
        trace.push(ReasoningStep::NamedPatternPriority {
          pattern: chosen,
          outranked,
        });
      } else {
        trace.push(ReasoningStep::OutcomeSpecificity { chosen, outranked });
      }
    }
    Some(chosen)
  }

  /// Pick among equally ranked candidates: highest corpus frequency, then
  /// canonical order. Records an ambiguity whenever there was a choice.
  fn break_tie(
    &self,
    candidates: &[Theme],
    trace: &mut Vec<ReasoningStep>,
  ) -> Option<Theme> {
    if let [only] = candidates {
      return Some(*only);
    }
    let chosen = candidates.iter().copied().min_by_key(|t| {
      (Reverse(self.frequencies.get(*t)), self.table.priority_rank(*t), *t)
    })?;
    tracing::debug!(?candidates, %chosen, "ambiguous primary theme");
    trace.push(ReasoningStep::Ambiguity {
      candidates: candidates.to_vec(),
      chosen,
    });
    Some(chosen)
  }
}
