//! Lesson puzzle selection for the Tactica curator.
//!
//! Given a classified pool behind a [`PuzzleIndex`](tactica_core::index::PuzzleIndex)
//! and a lesson's criteria, picks exactly six puzzles: two warmup, two core
//! and two stretch, presented in ascending difficulty.

pub mod config;
pub mod error;
pub mod filter;
pub mod manifest;
pub mod select;

pub use config::SelectorConfig;
pub use error::{Error, Result};
pub use manifest::{
  GenerationReport, LessonFailure, LessonManifest, generate_lessons,
};
pub use select::{Selector, select_lesson_puzzles};

#[cfg(test)]
mod tests;
