//! Theme hierarchy and primary-theme classification.
//!
//! Maps a raw, multiply-tagged puzzle to the single theme a learner actually
//! practises. Pure synchronous; the only chess knowledge comes from
//! `tactica-replay`.
//!
//! # Quick start
//!
//! ```no_run
//! use tactica_classify::{Analyzer, HierarchyTable};
//! # let record: tactica_core::puzzle::RawPuzzleRecord = todo!();
//!
//! let analyzer = Analyzer::new(HierarchyTable::standard());
//! let classification = analyzer.analyze(&record);
//! println!("{}", classification.predicted_primary_theme);
//! ```

mod analyze;
pub mod batch;
pub mod error;
pub mod frequency;
pub mod hierarchy;
pub mod stats;

pub use analyze::Analyzer;
pub use batch::{ClassificationBatch, RecordFailure, classify_corpus};
pub use error::{Error, Result};
pub use frequency::TagFrequencies;
pub use hierarchy::{
  HierarchyConfig, HierarchyTable, LevelOverride, SynonymEntry,
};
pub use stats::{StatsConfig, ThemeStatistics};
