//! Curriculum loading and the sequence validator.
//!
//! Runs as a pre-publish gate over authored lesson metadata; it never looks
//! at puzzles.

pub mod error;
pub mod load;
pub mod validate;

pub use error::{Error, Result};
pub use load::load_curriculum;
pub use validate::{
  ValidationReport, ValidatorRules, Violation, ViolationKind, validate,
};
