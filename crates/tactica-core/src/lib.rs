//! Core types and trait definitions for the Tactica puzzle curator.
//!
//! This crate is deliberately free of chess-rules, filesystem, and threading
//! dependencies. Every other crate depends on it.

pub mod classification;
pub mod curriculum;
pub mod error;
pub mod index;
pub mod lesson;
pub mod puzzle;
pub mod theme;

pub use error::{Error, Result};
