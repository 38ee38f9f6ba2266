//! Whole-corpus classification.
//!
//! Each record is classified independently, so the corpus is split across
//! the rayon pool. Per-record failures are collected, never fatal.

use rayon::prelude::*;
use serde::Serialize;
use tactica_core::{
  classification::{ClassifiedPuzzle, PuzzleClassification, ReasoningStep},
  puzzle::RawPuzzleRecord,
};

use crate::analyze::Analyzer;

/// A record that could not be classified because its data is corrupt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
  pub puzzle_id: String,
  pub error:     String,
}

/// Classifications in input order, plus every per-record failure.
#[derive(Debug, Clone, Default)]
pub struct ClassificationBatch {
  pub classifications: Vec<PuzzleClassification>,
  pub failures:        Vec<RecordFailure>,
}

impl ClassificationBatch {
  /// Pair each classification with its record.
  ///
  /// `records` must be the slice the batch was computed from.
  pub fn into_classified(
    self,
    records: Vec<RawPuzzleRecord>,
  ) -> Vec<ClassifiedPuzzle> {
    records
      .into_iter()
      .zip(self.classifications)
      .map(|(record, classification)| ClassifiedPuzzle {
        record,
        classification,
      })
      .collect()
  }
}

/// Classify every record in parallel.
pub fn classify_corpus(
  analyzer: &Analyzer,
  records: &[RawPuzzleRecord],
) -> ClassificationBatch {
  let classifications: Vec<PuzzleClassification> =
    records.par_iter().map(|r| analyzer.analyze(r)).collect();

  let failures: Vec<RecordFailure> = classifications
    .iter()
    .filter_map(failure_of)
    .collect();

  tracing::info!(
    records = records.len(),
    failures = failures.len(),
    "classified corpus"
  );

  ClassificationBatch {
    classifications,
    failures,
  }
}

fn failure_of(c: &PuzzleClassification) -> Option<RecordFailure> {
  c.reasoning.iter().find_map(|step| {
    let error = match step {
      ReasoningStep::ReplayFailed { error } => error.clone(),
      ReasoningStep::MalformedRecord { reason } => reason.clone(),
      _ => return None,
    };
    Some(RecordFailure {
      puzzle_id: c.puzzle_id.clone(),
      error,
    })
  })
}
