//! The authored curriculum tree: level → block → section → lesson.
//!
//! The tree is authored content and is only ever read. Child collections are
//! ordered; sibling order is the presentation order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lesson::LessonSelectionCriteria;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Curriculum {
  #[serde(default, rename = "level")]
  pub levels: Vec<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
  pub id:     String,
  pub name:   String,
  #[serde(default, rename = "block")]
  pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
  pub id:       String,
  pub name:     String,
  #[serde(default, rename = "section")]
  pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  pub id:      String,
  pub name:    String,
  #[serde(default, rename = "lesson")]
  pub lessons: Vec<Lesson>,
}

/// A lesson owns exactly one set of selection criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
  pub id:        String,
  pub name:      String,
  /// Review lessons must draw from a mixed-theme pool.
  #[serde(default)]
  pub is_review: bool,
  pub criteria:  LessonSelectionCriteria,
}

// ─── Locations ───────────────────────────────────────────────────────────────

/// Where a node lives in the tree. Deeper components are `None` for nodes
/// above lesson level.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
  Deserialize,
)]
pub struct NodePath {
  pub level:   String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub block:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub section: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lesson:  Option<String>,
}

impl NodePath {
  pub fn section(level: &Level, block: &Block, section: &Section) -> Self {
    Self {
      level:   level.id.clone(),
      block:   Some(block.id.clone()),
      section: Some(section.id.clone()),
      lesson:  None,
    }
  }

  pub fn with_lesson(&self, lesson: &Lesson) -> Self {
    Self {
      lesson: Some(lesson.id.clone()),
      ..self.clone()
    }
  }
}

impl fmt::Display for NodePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.level)?;
    for part in [&self.block, &self.section, &self.lesson].into_iter().flatten() {
      write!(f, "/{part}")?;
    }
    Ok(())
  }
}

impl Curriculum {
  /// Every section in tree order, with its location.
  pub fn sections(&self) -> impl Iterator<Item = (NodePath, &Section)> {
    self.levels.iter().flat_map(|level| {
      level.blocks.iter().flat_map(move |block| {
        block
          .sections
          .iter()
          .map(move |section| (NodePath::section(level, block, section), section))
      })
    })
  }

  /// Every lesson in tree order, with its location.
  pub fn lessons(&self) -> impl Iterator<Item = (NodePath, &Lesson)> {
    self.sections().flat_map(|(path, section)| {
      section
        .lessons
        .iter()
        .map(move |lesson| (path.with_lesson(lesson), lesson))
    })
  }
}
