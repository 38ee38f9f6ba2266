//! Selector settings, read from the `[selector]` section.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
  /// Base seed for tie-breaking shuffles. Combined with the lesson id so
  /// lessons with identical criteria still differ.
  pub seed:              u64,
  /// Half-width of the core band as a fraction of the rating span.
  pub core_window_ratio: f64,
  /// Lower bound on the core half-width, in rating points.
  pub min_core_window:   u32,
}

impl Default for SelectorConfig {
  fn default() -> Self {
    Self {
      seed:              0x7AC7_1CA5,
      core_window_ratio: 0.1,
      min_core_window:   10,
    }
  }
}
