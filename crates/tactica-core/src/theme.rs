//! The closed vocabulary of puzzle theme tags.
//!
//! Tag names follow the Lichess puzzle-theme naming (`discoveredAttack`,
//! `mateIn2`, `backRankMate`, ...). Lookup is exact; spelling variants are
//! resolved by the synonym table in `tactica-classify`, never by fuzzy
//! matching.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Hierarchy level ─────────────────────────────────────────────────────────

/// Where a theme sits in the instructional hierarchy.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThemeLevel {
  /// A concrete tactical device: fork, pin, skewer, ...
  Mechanism,
  /// A preparatory idea describing *how*, never *what*.
  Enabler,
  /// The payoff: mate patterns, decisive material gain, promotion.
  Outcome,
  /// Phase, length, and strength descriptors. Never a primary theme.
  Meta,
}

impl fmt::Display for ThemeLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Mechanism => "MECHANISM",
      Self::Enabler => "ENABLER",
      Self::Outcome => "OUTCOME",
      Self::Meta => "META",
    };
    f.write_str(s)
  }
}

// ─── Theme ───────────────────────────────────────────────────────────────────

macro_rules! themes {
  ($( $variant:ident => $name:literal ),* $(,)?) => {
    /// A known puzzle theme tag.
    ///
    /// The derived ordering is declaration order and carries no meaning
    /// beyond giving maps a stable iteration order.
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    pub enum Theme {
      $( #[serde(rename = $name)] $variant, )*
    }

    impl Theme {
      /// Every known theme, in declaration order.
      pub const ALL: &'static [Theme] = &[ $( Theme::$variant, )* ];

      /// The canonical tag name.
      pub fn as_str(&self) -> &'static str {
        match self {
          $( Self::$variant => $name, )*
        }
      }

      /// Exact lookup by canonical tag name.
      pub fn from_name(name: &str) -> Option<Self> {
        match name {
          $( $name => Some(Self::$variant), )*
          _ => None,
        }
      }
    }
  };
}

themes! {
  // ── Mechanisms ──────────────────────────────────────────────────────────
  Fork => "fork",
  Pin => "pin",
  Skewer => "skewer",
  DiscoveredAttack => "discoveredAttack",
  DoubleCheck => "doubleCheck",
  XRayAttack => "xRayAttack",
  TrappedPiece => "trappedPiece",

  // ── Enablers ────────────────────────────────────────────────────────────
  Deflection => "deflection",
  Attraction => "attraction",
  Clearance => "clearance",
  Interference => "interference",
  Sacrifice => "sacrifice",
  QuietMove => "quietMove",
  CapturingDefender => "capturingDefender",
  Intermezzo => "intermezzo",
  Zugzwang => "zugzwang",

  // ── Outcomes ────────────────────────────────────────────────────────────
  Mate => "mate",
  MateIn1 => "mateIn1",
  MateIn2 => "mateIn2",
  MateIn3 => "mateIn3",
  MateIn4 => "mateIn4",
  MateIn5 => "mateIn5",
  AnastasiaMate => "anastasiaMate",
  ArabianMate => "arabianMate",
  BackRankMate => "backRankMate",
  BalestraMate => "balestraMate",
  BlindSwineMate => "blindSwineMate",
  BodenMate => "bodenMate",
  CornerMate => "cornerMate",
  DoubleBishopMate => "doubleBishopMate",
  DovetailMate => "dovetailMate",
  EpauletteMate => "epauletteMate",
  HookMate => "hookMate",
  KillBoxMate => "killBoxMate",
  MorphysMate => "morphysMate",
  OperaMate => "operaMate",
  PillsburysMate => "pillsburysMate",
  SmotheredMate => "smotheredMate",
  SwallowstailMate => "swallowstailMate",
  TriangleMate => "triangleMate",
  VukovicMate => "vukovicMate",
  Crushing => "crushing",
  Promotion => "promotion",
  UnderPromotion => "underPromotion",

  // ── Meta ────────────────────────────────────────────────────────────────
  Opening => "opening",
  Middlegame => "middlegame",
  Endgame => "endgame",
  RookEndgame => "rookEndgame",
  BishopEndgame => "bishopEndgame",
  PawnEndgame => "pawnEndgame",
  KnightEndgame => "knightEndgame",
  QueenEndgame => "queenEndgame",
  QueenRookEndgame => "queenRookEndgame",
  OneMove => "oneMove",
  Short => "short",
  Long => "long",
  VeryLong => "veryLong",
  Master => "master",
  MasterVsMaster => "masterVsMaster",
  SuperGm => "superGM",
  Advantage => "advantage",
  Equality => "equality",
  HangingPiece => "hangingPiece",
  ExposedKing => "exposedKing",
  KingsideAttack => "kingsideAttack",
  QueensideAttack => "queensideAttack",
  AttackingF2F7 => "attackingF2F7",
  AdvancedPawn => "advancedPawn",
  DefensiveMove => "defensiveMove",
  Castling => "castling",
  EnPassant => "enPassant",
}

impl Theme {
  /// `Some(n)` for the generic "mate in N" labels.
  pub fn mate_in(&self) -> Option<u8> {
    match self {
      Self::MateIn1 => Some(1),
      Self::MateIn2 => Some(2),
      Self::MateIn3 => Some(3),
      Self::MateIn4 => Some(4),
      Self::MateIn5 => Some(5),
      _ => None,
    }
  }

  /// True for `mate` and every `mateInN` label.
  pub fn is_generic_mate(&self) -> bool {
    matches!(self, Self::Mate) || self.mate_in().is_some()
  }
}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Theme {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_name(s).ok_or_else(|| Error::UnknownTheme(s.to_string()))
  }
}
