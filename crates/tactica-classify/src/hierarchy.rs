//! The theme hierarchy table.
//!
//! A pure tag → level mapping, plus the two authored orderings the engine
//! needs: the canonical mechanism priority (single-ply tie-break) and the set
//! of named mate patterns (which outrank generic "mate in N" labels).
//!
//! The table starts from a built-in standard and may be adjusted through
//! [`HierarchyConfig`]. Either way it is validated before use; a table that
//! fails validation is a fatal configuration error.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;
use tactica_core::theme::{Theme, ThemeLevel};

use crate::error::{Error, Result};

// ─── Built-in standard ───────────────────────────────────────────────────────

/// Canonical mechanism priority, most forcing first.
pub const MECHANISM_PRIORITY: &[Theme] = &[
  Theme::DoubleCheck,
  Theme::DiscoveredAttack,
  Theme::Fork,
  Theme::Skewer,
  Theme::Pin,
  Theme::XRayAttack,
  Theme::TrappedPiece,
];

/// Mate patterns specific enough to outrank a generic mate label.
pub const NAMED_PATTERNS: &[Theme] = &[
  Theme::AnastasiaMate,
  Theme::ArabianMate,
  Theme::BackRankMate,
  Theme::BalestraMate,
  Theme::BlindSwineMate,
  Theme::BodenMate,
  Theme::CornerMate,
  Theme::DoubleBishopMate,
  Theme::DovetailMate,
  Theme::EpauletteMate,
  Theme::HookMate,
  Theme::KillBoxMate,
  Theme::MorphysMate,
  Theme::OperaMate,
  Theme::PillsburysMate,
  Theme::SmotheredMate,
  Theme::SwallowstailMate,
  Theme::TriangleMate,
  Theme::VukovicMate,
];

const ENABLERS: &[Theme] = &[
  Theme::Deflection,
  Theme::Attraction,
  Theme::Clearance,
  Theme::Interference,
  Theme::Sacrifice,
  Theme::QuietMove,
  Theme::CapturingDefender,
  Theme::Intermezzo,
  Theme::Zugzwang,
];

const OTHER_OUTCOMES: &[Theme] = &[
  Theme::Mate,
  Theme::MateIn1,
  Theme::MateIn2,
  Theme::MateIn3,
  Theme::MateIn4,
  Theme::MateIn5,
  Theme::Crushing,
  Theme::Promotion,
  Theme::UnderPromotion,
];

const META: &[Theme] = &[
  Theme::Opening,
  Theme::Middlegame,
  Theme::Endgame,
  Theme::RookEndgame,
  Theme::BishopEndgame,
  Theme::PawnEndgame,
  Theme::KnightEndgame,
  Theme::QueenEndgame,
  Theme::QueenRookEndgame,
  Theme::OneMove,
  Theme::Short,
  Theme::Long,
  Theme::VeryLong,
  Theme::Master,
  Theme::MasterVsMaster,
  Theme::SuperGm,
  Theme::Advantage,
  Theme::Equality,
  Theme::HangingPiece,
  Theme::ExposedKing,
  Theme::KingsideAttack,
  Theme::QueensideAttack,
  Theme::AttackingF2F7,
  Theme::AdvancedPawn,
  Theme::DefensiveMove,
  Theme::Castling,
  Theme::EnPassant,
];

/// Spelling variants seen in authored material and older exports.
const SYNONYMS: &[(&str, Theme)] = &[
  ("checkmate", Theme::Mate),
  ("mate-in-1", Theme::MateIn1),
  ("mate-in-2", Theme::MateIn2),
  ("mate-in-3", Theme::MateIn3),
  ("mate-in-4", Theme::MateIn4),
  ("mate-in-5", Theme::MateIn5),
  ("discovered-attack", Theme::DiscoveredAttack),
  ("double-check", Theme::DoubleCheck),
  ("x-ray", Theme::XRayAttack),
  ("xray", Theme::XRayAttack),
  ("x-ray-attack", Theme::XRayAttack),
  ("trapped-piece", Theme::TrappedPiece),
  ("quiet-move", Theme::QuietMove),
  ("removal-of-defender", Theme::CapturingDefender),
  ("remove-the-defender", Theme::CapturingDefender),
  ("back-rank-mate", Theme::BackRankMate),
  ("smothered-mate", Theme::SmotheredMate),
  ("under-promotion", Theme::UnderPromotion),
];

// ─── Configuration ───────────────────────────────────────────────────────────

/// Adjustments to the standard table, read from the `[hierarchy]` section of
/// the settings file.
///
/// Theme names only ever appear as values, never as table keys, so their
/// case survives the config layer:
///
/// ```toml
/// [[hierarchy.level_overrides]]
/// theme = "hangingPiece"
/// level = "OUTCOME"
///
/// [[hierarchy.synonyms]]
/// alias = "Knight-Fork"
/// theme = "fork"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
  /// Replaces the canonical mechanism priority when set.
  pub mechanism_priority: Option<Vec<String>>,
  /// Move individual themes to a different level.
  pub level_overrides:    Vec<LevelOverride>,
  /// Extra alias entries.
  pub synonyms:           Vec<SynonymEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LevelOverride {
  pub theme: String,
  pub level: ThemeLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynonymEntry {
  pub alias: String,
  /// Canonical name the alias resolves to.
  pub theme: String,
}

// ─── Table ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HierarchyTable {
  levels:             BTreeMap<Theme, ThemeLevel>,
  mechanism_priority: Vec<Theme>,
  named_patterns:     BTreeSet<Theme>,
  synonyms:           BTreeMap<String, Theme>,
}

impl HierarchyTable {
  /// The built-in table. Always valid; see the `standard_table_is_valid`
  /// test.
  pub fn standard() -> Self {
    let mut levels = BTreeMap::new();
    let groups: [(&[Theme], ThemeLevel); 5] = [
      (MECHANISM_PRIORITY, ThemeLevel::Mechanism),
      (ENABLERS, ThemeLevel::Enabler),
      (NAMED_PATTERNS, ThemeLevel::Outcome),
      (OTHER_OUTCOMES, ThemeLevel::Outcome),
      (META, ThemeLevel::Meta),
    ];
    for (themes, level) in groups {
      for theme in themes {
        levels.insert(*theme, level);
      }
    }

    Self {
      levels,
      mechanism_priority: MECHANISM_PRIORITY.to_vec(),
      named_patterns: NAMED_PATTERNS.iter().copied().collect(),
      synonyms: SYNONYMS
        .iter()
        .map(|(alias, theme)| (alias.to_string(), *theme))
        .collect(),
    }
  }

  /// The standard table with `config` applied, validated.
  pub fn from_config(config: &HierarchyConfig) -> Result<Self> {
    let mut table = Self::standard();

    for entry in &config.level_overrides {
      let theme = parse_theme(&entry.theme)?;
      table.levels.insert(theme, entry.level);
    }

    if let Some(priority) = &config.mechanism_priority {
      table.mechanism_priority = priority
        .iter()
        .map(|name| parse_theme(name))
        .collect::<Result<_>>()?;
    }

    for entry in &config.synonyms {
      let theme = Theme::from_name(&entry.theme).ok_or_else(|| {
        Error::DanglingSynonym {
          alias:  entry.alias.clone(),
          target: entry.theme.clone(),
        }
      })?;
      table.synonyms.insert(entry.alias.clone(), theme);
    }

    table.validate()?;
    Ok(table)
  }

  /// Check that every known theme is reachable and the authored orderings
  /// are consistent with the levels.
  pub fn validate(&self) -> Result<()> {
    for theme in Theme::ALL {
      if !self.levels.contains_key(theme) {
        return Err(Error::Unreachable(*theme));
      }
    }

    let mut seen = HashSet::new();
    for theme in &self.mechanism_priority {
      if !seen.insert(*theme) {
        return Err(Error::DuplicatePriority(*theme));
      }
      let level = self.levels[theme];
      if level != ThemeLevel::Mechanism {
        return Err(Error::PriorityNotMechanism {
          theme: *theme,
          level,
        });
      }
    }
    for (theme, level) in &self.levels {
      if *level == ThemeLevel::Mechanism && !seen.contains(theme) {
        return Err(Error::MissingPriority(*theme));
      }
    }

    for theme in &self.named_patterns {
      let level = self.levels[theme];
      if level != ThemeLevel::Outcome {
        return Err(Error::NamedPatternNotOutcome {
          theme: *theme,
          level,
        });
      }
    }

    for (alias, target) in &self.synonyms {
      if let Some(canonical) = Theme::from_name(alias)
        && canonical != *target
      {
        return Err(Error::SynonymShadowsCanonical {
          alias: alias.clone(),
          canonical,
        });
      }
    }

    Ok(())
  }

  // ── Lookups ─────────────────────────────────────────────────────────────

  /// Exact lookup: canonical name first, then the synonym table.
  pub fn resolve(&self, tag: &str) -> Option<Theme> {
    Theme::from_name(tag).or_else(|| self.synonyms.get(tag).copied())
  }

  pub fn level(&self, theme: Theme) -> Option<ThemeLevel> {
    self.levels.get(&theme).copied()
  }

  /// Position in the canonical mechanism priority; non-mechanisms sort last.
  pub fn priority_rank(&self, theme: Theme) -> usize {
    self
      .mechanism_priority
      .iter()
      .position(|t| *t == theme)
      .unwrap_or(usize::MAX)
  }

  pub fn is_named_pattern(&self, theme: Theme) -> bool {
    self.named_patterns.contains(&theme)
  }

  /// Outcome specificity; lower is more specific.
  ///
  /// Named pattern, then "mate in N", then bare mate, then the non-mate
  /// payoffs.
  pub fn outcome_rank(&self, theme: Theme) -> u8 {
    if self.is_named_pattern(theme) {
      return 0;
    }
    match theme {
      t if t.mate_in().is_some() => 1,
      Theme::Mate => 2,
      Theme::UnderPromotion => 3,
      Theme::Promotion => 4,
      Theme::Crushing => 5,
      _ => 6,
    }
  }

  /// True for every mate label, generic or named.
  pub fn is_mate(&self, theme: Theme) -> bool {
    theme.is_generic_mate() || self.is_named_pattern(theme)
  }
}

fn parse_theme(name: &str) -> Result<Theme> {
  Theme::from_name(name).ok_or_else(|| Error::UnknownTheme(name.to_string()))
}
