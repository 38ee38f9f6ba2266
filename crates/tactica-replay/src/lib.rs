//! Board replay for puzzle move lists.
//!
//! Replays a puzzle's setup move and solution from its starting FEN to answer
//! positional questions: which piece moved, and whether the line ends in
//! checkmate. Pure synchronous; the solution is trusted, never searched.
//!
//! # Quick start
//!
//! ```no_run
//! use tactica_replay::{is_checkmate, piece_type_of_move};
//!
//! let fen = "6k1/5ppp/8/8/8/8/5PPP/R5K1 b - - 0 1";
//! let moves = ["g8h8", "a1a8"];
//! assert!(is_checkmate(fen, &moves, 2).unwrap());
//! println!("{}", piece_type_of_move(fen, &moves, 1).unwrap());
//! ```

pub mod error;
mod replay;

pub use error::{Error, Result};
use tactica_core::puzzle::PieceKind;

// ─── Public types ────────────────────────────────────────────────────────────

/// The outcome of replaying an entire line once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedLine {
  /// FEN after the last half-move.
  pub final_position: String,
  /// The piece kind that moved at each ply, setup move first.
  pub moved_pieces:   Vec<PieceKind>,
  /// Whether the side to move in the final position is checkmated.
  pub is_checkmate:   bool,
}

impl ReplayedLine {
  /// Piece moved by the solver's first ply (the ply after the setup move).
  pub fn first_solution_piece(&self) -> Option<PieceKind> {
    self.moved_pieces.get(1).copied()
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Replay every half-move of `moves` from `start`.
pub fn replay_line<S: AsRef<str>>(start: &str, moves: &[S]) -> Result<ReplayedLine> {
  replay::replay(start, moves, moves.len())
}

/// FEN of the position after the first `plies` half-moves.
pub fn resulting_position<S: AsRef<str>>(
  start: &str,
  moves: &[S],
  plies: usize,
) -> Result<String> {
  Ok(replay::replay(start, moves, plies)?.final_position)
}

/// The kind of piece that makes half-move `ply` (0 is the setup move).
pub fn piece_type_of_move<S: AsRef<str>>(
  start: &str,
  moves: &[S],
  ply: usize,
) -> Result<PieceKind> {
  let out_of_range = || Error::PlyOutOfRange {
    requested: ply,
    available: moves.len(),
  };
  if ply >= moves.len() {
    return Err(out_of_range());
  }
  let line = replay::replay(start, moves, ply + 1)?;
  line.moved_pieces.get(ply).copied().ok_or_else(out_of_range)
}

/// Whether the position after the first `plies` half-moves is checkmate.
pub fn is_checkmate<S: AsRef<str>>(
  start: &str,
  moves: &[S],
  plies: usize,
) -> Result<bool> {
  Ok(replay::replay(start, moves, plies)?.is_checkmate)
}
