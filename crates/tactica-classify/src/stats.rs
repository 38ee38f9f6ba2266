//! Aggregate primary-theme statistics by rating band.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactica_core::{
  classification::PuzzleClassification, puzzle::RawPuzzleRecord,
};

/// Settings for the `[stats]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
  /// Width of each rating bucket.
  pub rating_bucket_width: u32,
}

impl Default for StatsConfig {
  fn default() -> Self {
    Self {
      rating_bucket_width: 200,
    }
  }
}

/// Primary-theme counts, overall and per rating bucket.
///
/// Buckets are keyed by their lower bound; theme keys are the primary theme
/// names, `unknown` included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThemeStatistics {
  pub bucket_width:    u32,
  pub total:           usize,
  pub unknown:         usize,
  pub ambiguous:       usize,
  pub replay_failures: usize,
  pub totals:          BTreeMap<String, usize>,
  pub by_rating:       BTreeMap<u32, BTreeMap<String, usize>>,
}

impl ThemeStatistics {
  pub fn collect<'a>(
    pairs: impl IntoIterator<Item = (&'a RawPuzzleRecord, &'a PuzzleClassification)>,
    config: &StatsConfig,
  ) -> Self {
    let width = config.rating_bucket_width.max(1);
    let mut stats = Self {
      bucket_width: width,
      ..Self::default()
    };

    for (record, classification) in pairs {
      let name = classification.predicted_primary_theme.to_string();
      let bucket = record.rating / width * width;

      stats.total += 1;
      if classification.predicted_primary_theme.is_unknown() {
        stats.unknown += 1;
      }
      if classification.is_ambiguous() {
        stats.ambiguous += 1;
      }
      if classification.replay_failure().is_some() {
        stats.replay_failures += 1;
      }
      *stats.totals.entry(name.clone()).or_default() += 1;
      *stats
        .by_rating
        .entry(bucket)
        .or_default()
        .entry(name)
        .or_default() += 1;
    }

    stats
  }
}

#[cfg(test)]
mod tests {
  use tactica_core::{classification::PrimaryTheme, theme::Theme};

  use super::*;

  fn pair(rating: u32, primary: PrimaryTheme) -> (RawPuzzleRecord, PuzzleClassification) {
    (
      RawPuzzleRecord {
        id: format!("p{rating}"),
        starting_position: String::new(),
        move_list: vec![],
        rating,
        times_played: 0,
        raw_themes: vec![],
        source_url: String::new(),
      },
      PuzzleClassification {
        puzzle_id:               format!("p{rating}"),
        predicted_primary_theme: primary,
        reasoning:               vec![],
        involved_piece_type:     None,
        supporting_themes:       vec![],
        recognized_themes:       vec![],
      },
    )
  }

  #[test]
  fn buckets_by_lower_bound() {
    let data = vec![
      pair(1010, PrimaryTheme::Theme(Theme::Fork)),
      pair(1190, PrimaryTheme::Theme(Theme::Fork)),
      pair(1200, PrimaryTheme::Theme(Theme::Pin)),
      pair(1250, PrimaryTheme::Unknown),
    ];
    let stats = ThemeStatistics::collect(
      data.iter().map(|(r, c)| (r, c)),
      &StatsConfig::default(),
    );

    assert_eq!(stats.total, 4);
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.totals["fork"], 2);
    assert_eq!(stats.by_rating[&1000]["fork"], 2);
    assert_eq!(stats.by_rating[&1200]["pin"], 1);
    assert_eq!(stats.by_rating[&1200]["unknown"], 1);
  }

  #[test]
  fn zero_width_is_treated_as_one() {
    let data = vec![pair(7, PrimaryTheme::Theme(Theme::Fork))];
    let stats = ThemeStatistics::collect(
      data.iter().map(|(r, c)| (r, c)),
      &StatsConfig {
        rating_bucket_width: 0,
      },
    );
    assert_eq!(stats.bucket_width, 1);
    assert!(stats.by_rating.contains_key(&7));
  }
}
