//! Curriculum loading from TOML.
//!
//! Theme and piece names are parsed strictly; an unknown name fails the load
//! with the position of the offending value.

use tactica_core::curriculum::Curriculum;

use crate::error::Result;

pub fn load_curriculum(input: &str) -> Result<Curriculum> {
  let curriculum: Curriculum = toml::from_str(input)?;
  tracing::debug!(
    levels = curriculum.levels.len(),
    lessons = curriculum.lessons().count(),
    "loaded curriculum"
  );
  Ok(curriculum)
}
