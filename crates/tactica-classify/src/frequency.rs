//! Corpus-wide tag frequencies, used by the classification fallback.

use std::collections::HashMap;

use tactica_core::{puzzle::RawPuzzleRecord, theme::Theme};

use crate::hierarchy::HierarchyTable;

/// How many records carry each known theme. A tag repeated within one record
/// counts once.
#[derive(Debug, Clone, Default)]
pub struct TagFrequencies {
  counts: HashMap<Theme, usize>,
}

impl TagFrequencies {
  pub fn from_records<'a>(
    records: impl IntoIterator<Item = &'a RawPuzzleRecord>,
    table: &HierarchyTable,
  ) -> Self {
    let mut counts: HashMap<Theme, usize> = HashMap::new();
    for record in records {
      let mut themes: Vec<Theme> = record
        .raw_themes
        .iter()
        .filter_map(|tag| table.resolve(tag))
        .collect();
      themes.sort();
      themes.dedup();
      for theme in themes {
        *counts.entry(theme).or_default() += 1;
      }
    }
    Self { counts }
  }

  pub fn get(&self, theme: Theme) -> usize {
    self.counts.get(&theme).copied().unwrap_or(0)
  }
}
