//! Layered settings: optional TOML file, then `TACTICA__*` environment
//! variables. Every section falls back to its defaults.

use std::path::Path;

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use tactica_classify::{HierarchyConfig, StatsConfig};
use tactica_curriculum::ValidatorRules;
use tactica_select::SelectorConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub selector:  SelectorConfig,
  pub validator: ValidatorRules,
  pub hierarchy: HierarchyConfig,
  pub stats:     StatsConfig,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let builder =
      Config::builder().add_source(File::from(path).required(false));
    Self::finish(builder).with_context(|| {
      format!("failed to load settings from {}", path.display())
    })
  }

  #[cfg(test)]
  fn from_toml(input: &str) -> anyhow::Result<Self> {
    Self::finish(
      Config::builder()
        .add_source(File::from_str(input, config::FileFormat::Toml)),
    )
  }

  fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    let settings = builder
      .add_source(
        Environment::with_prefix("TACTICA")
          .prefix_separator("__")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")?;
    Ok(settings)
  }
}
