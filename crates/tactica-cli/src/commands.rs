//! Subcommand bodies. Each returns `Ok(false)` when it ran to completion but
//! found problems that should fail the run.

use std::{
  fs,
  io::{BufWriter, Write},
  path::Path,
};

use anyhow::Context as _;
use chrono::Utc;
use tactica_classify::{
  Analyzer, ClassificationBatch, HierarchyTable, TagFrequencies,
  ThemeStatistics, classify_corpus,
};
use tactica_core::{
  index::{MemoryIndex, PuzzleIndex as _},
  puzzle::{RawPuzzleRecord, parse_corpus},
};
use tactica_curriculum::load_curriculum;
use tactica_select::{Selector, generate_lessons};

use crate::settings::Settings;

pub fn classify(
  settings: &Settings,
  corpus: &Path,
  out: Option<&Path>,
) -> anyhow::Result<bool> {
  let records = read_corpus(corpus)?;
  let batch = run_classifier(settings, &records)?;

  if let Some(out) = out {
    write_classifications(&batch, out)?;
  }

  let stats = ThemeStatistics::collect(
    records.iter().zip(&batch.classifications),
    &settings.stats,
  );
  println!("{}", serde_json::to_string_pretty(&stats)?);

  report_record_failures(&batch);
  Ok(batch.failures.is_empty())
}

pub fn generate(
  settings: &Settings,
  corpus: &Path,
  curriculum: &Path,
  out: &Path,
) -> anyhow::Result<bool> {
  let tree = {
    let raw = fs::read_to_string(curriculum)
      .with_context(|| format!("failed to read {}", curriculum.display()))?;
    load_curriculum(&raw)
      .with_context(|| format!("failed to load {}", curriculum.display()))?
  };

  let records = read_corpus(corpus)?;
  let batch = run_classifier(settings, &records)?;
  report_record_failures(&batch);

  let index = MemoryIndex::new(batch.into_classified(records));
  tracing::info!(puzzles = index.len(), "built puzzle index");

  let selector = Selector::new(settings.selector.clone());
  let report = generate_lessons(&tree, &index, &selector, Utc::now());

  let json = serde_json::to_string_pretty(&report.manifest)
    .context("failed to serialise manifest")?;
  fs::write(out, json)
    .with_context(|| format!("failed to write {}", out.display()))?;
  tracing::info!(
    path = %out.display(),
    version = %report.manifest.version,
    "wrote lesson manifest"
  );

  for failure in &report.failures {
    eprintln!("{}: {}", failure.location, failure.error);
  }
  Ok(report.is_complete())
}

pub fn validate(
  settings: &Settings,
  curriculum: &Path,
  json: bool,
) -> anyhow::Result<bool> {
  let raw = fs::read_to_string(curriculum)
    .with_context(|| format!("failed to read {}", curriculum.display()))?;
  let tree = load_curriculum(&raw)
    .with_context(|| format!("failed to load {}", curriculum.display()))?;

  let report = tactica_curriculum::validate(&tree, &settings.validator);

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else if report.passed() {
    println!("ok: no violations");
  } else {
    for violation in &report.violations {
      println!("{violation}");
    }
    println!("{} violation(s)", report.violations.len());
  }
  Ok(report.passed())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn write_classifications(
  batch: &ClassificationBatch,
  out: &Path,
) -> anyhow::Result<()> {
  let file = fs::File::create(out)
    .with_context(|| format!("failed to create {}", out.display()))?;
  let mut writer = BufWriter::new(file);
  for classification in &batch.classifications {
    serde_json::to_writer(&mut writer, classification)
      .context("failed to serialise classification")?;
    writer.write_all(b"\n")?;
  }
  writer
    .flush()
    .with_context(|| format!("failed to write {}", out.display()))?;
  tracing::info!(path = %out.display(), "wrote classifications");
  Ok(())
}

fn read_corpus(path: &Path) -> anyhow::Result<Vec<RawPuzzleRecord>> {
  let raw = fs::read_to_string(path)
    .with_context(|| format!("failed to read {}", path.display()))?;
  let records = parse_corpus(&raw)
    .with_context(|| format!("failed to parse {}", path.display()))?;
  tracing::info!(
    path = %path.display(),
    records = records.len(),
    "loaded corpus"
  );
  Ok(records)
}

/// Build the hierarchy from settings and classify `records`. An invalid
/// hierarchy aborts before any record is touched.
fn run_classifier(
  settings: &Settings,
  records: &[RawPuzzleRecord],
) -> anyhow::Result<ClassificationBatch> {
  let table = HierarchyTable::from_config(&settings.hierarchy)
    .context("invalid theme hierarchy")?;
  let frequencies = TagFrequencies::from_records(records, &table);
  let analyzer = Analyzer::new(table).with_frequencies(frequencies);
  Ok(classify_corpus(&analyzer, records))
}

fn report_record_failures(batch: &ClassificationBatch) {
  for failure in &batch.failures {
    tracing::error!(
      puzzle = %failure.puzzle_id,
      error = %failure.error,
      "record could not be classified"
    );
  }
}
