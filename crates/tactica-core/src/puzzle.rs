//! Raw puzzle records, the immutable input to every stage.
//!
//! A record is created once by corpus ingestion and never mutated. The
//! first half-move of `move_list` is the opponent's setup move; the solver's
//! moves are the odd-indexed plies that follow.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Piece kind ──────────────────────────────────────────────────────────────

/// The type of piece that made a move.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
  Pawn,
  Knight,
  Bishop,
  Rook,
  Queen,
  King,
}

impl PieceKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pawn => "pawn",
      Self::Knight => "knight",
      Self::Bishop => "bishop",
      Self::Rook => "rook",
      Self::Queen => "queen",
      Self::King => "king",
    }
  }
}

impl fmt::Display for PieceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PieceKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "pawn" => Ok(Self::Pawn),
      "knight" => Ok(Self::Knight),
      "bishop" => Ok(Self::Bishop),
      "rook" => Ok(Self::Rook),
      "queen" => Ok(Self::Queen),
      "king" => Ok(Self::King),
      other => Err(Error::UnknownPiece(other.to_string())),
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One pre-tagged tactical puzzle as delivered by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPuzzleRecord {
  pub id:                String,
  /// FEN of the position before the setup move.
  pub starting_position: String,
  /// UCI half-moves: setup move, then the expected solution.
  pub move_list:         Vec<String>,
  pub rating:            u32,
  /// Popularity / confidence proxy.
  pub times_played:      u32,
  /// Unordered tags; may be empty and may contain names outside the
  /// known vocabulary.
  #[serde(default)]
  pub raw_themes:        Vec<String>,
  #[serde(default)]
  pub source_url:        String,
}

impl RawPuzzleRecord {
  /// Minimum number of half-moves: one setup move plus one solution move.
  pub const MIN_MOVES: usize = 2;

  /// The expected solution: every half-move after the setup move.
  pub fn solution_moves(&self) -> &[String] {
    self.move_list.get(1..).unwrap_or(&[])
  }

  /// Number of half-moves the solver plays (plies 1, 3, 5, ...).
  pub fn player_move_count(&self) -> usize {
    self.solution_moves().len().div_ceil(2)
  }

  /// Check the structural invariant on `move_list`.
  pub fn validate(&self) -> Result<()> {
    if self.move_list.len() < Self::MIN_MOVES {
      return Err(Error::InvalidRecord {
        id:     self.id.clone(),
        reason: format!(
          "move list has {} half-moves, need at least {}",
          self.move_list.len(),
          Self::MIN_MOVES
        ),
      });
    }
    Ok(())
  }
}

// ─── Corpus reader ───────────────────────────────────────────────────────────

/// Parse a JSON Lines corpus. Blank lines are skipped; line numbers in errors
/// are 1-based.
pub fn parse_corpus(input: &str) -> Result<Vec<RawPuzzleRecord>> {
  let mut records = Vec::new();
  for (i, line) in input.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let record = serde_json::from_str(line)
      .map_err(|source| Error::CorpusLine { line: i + 1, source })?;
    records.push(record);
  }
  tracing::debug!(count = records.len(), "parsed puzzle corpus");
  Ok(records)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(moves: &[&str]) -> RawPuzzleRecord {
    RawPuzzleRecord {
      id:                "abc12".into(),
      starting_position: "8/8/8/8/8/8/8/8 w - - 0 1".into(),
      move_list:         moves.iter().map(|m| m.to_string()).collect(),
      rating:            1500,
      times_played:      100,
      raw_themes:        vec![],
      source_url:        String::new(),
    }
  }

  #[test]
  fn player_moves_are_odd_plies() {
    assert_eq!(record(&["e2e4", "e7e5"]).player_move_count(), 1);
    assert_eq!(record(&["e2e4", "e7e5", "g1f3"]).player_move_count(), 1);
    assert_eq!(
      record(&["e2e4", "e7e5", "g1f3", "b8c6"]).player_move_count(),
      2
    );
  }

  #[test]
  fn short_move_list_is_invalid() {
    assert!(record(&["e2e4"]).validate().is_err());
    assert!(record(&[]).solution_moves().is_empty());
    assert!(record(&["e2e4", "e7e5"]).validate().is_ok());
  }

  #[test]
  fn corpus_skips_blank_lines_and_reports_line_numbers() {
    let input = concat!(
      r#"{"id":"a","starting_position":"x","move_list":["a","b"],"rating":1,"times_played":2}"#,
      "\n\n",
      r#"{"id":"b"}"#,
      "\n"
    );
    let err = parse_corpus(input).unwrap_err();
    assert!(matches!(err, Error::CorpusLine { line: 3, .. }));

    let ok = parse_corpus(input.lines().next().unwrap()).unwrap();
    assert_eq!(ok.len(), 1);
    assert!(ok[0].raw_themes.is_empty());
  }

  #[test]
  fn piece_kind_parses_lowercase_names() {
    assert_eq!("knight".parse::<PieceKind>().unwrap(), PieceKind::Knight);
    assert!("Knight".parse::<PieceKind>().is_err());
  }
}
