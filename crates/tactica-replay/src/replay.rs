//! Line replay on top of `shakmaty`.
//!
//! Pipeline:
//!   FEN &str
//!     └─ setup()          → Chess
//!          └─ play_uci()  → per ply: parse, check legality, apply
//!               └─ ReplayedLine

use shakmaty::{
  CastlingMode, Chess, EnPassantMode, Position, Role, fen::Fen, uci::Uci,
};
use tactica_core::puzzle::PieceKind;

use crate::{
  ReplayedLine,
  error::{Error, Result},
};

fn setup(fen: &str) -> Result<Chess> {
  let parsed: Fen = fen.trim().parse().map_err(|e: shakmaty::fen::ParseFenError| {
    Error::InvalidFen {
      fen:    fen.to_string(),
      reason: e.to_string(),
    }
  })?;
  parsed
    .into_position(CastlingMode::Standard)
    .map_err(|e| Error::InvalidPosition(e.to_string()))
}

/// Apply one UCI half-move, returning the role of the piece that moved.
fn play_uci(pos: &mut Chess, ply: usize, uci: &str) -> Result<Role> {
  let parsed: Uci = uci.trim().parse().map_err(|_| Error::MalformedMove {
    ply,
    uci: uci.to_string(),
  })?;
  let m = parsed.to_move(&*pos).map_err(|_| Error::IllegalMove {
    ply,
    uci: uci.to_string(),
  })?;
  let role = m.role();
  pos.play_unchecked(&m);
  Ok(role)
}

fn piece_kind(role: Role) -> PieceKind {
  match role {
    Role::Pawn => PieceKind::Pawn,
    Role::Knight => PieceKind::Knight,
    Role::Bishop => PieceKind::Bishop,
    Role::Rook => PieceKind::Rook,
    Role::Queen => PieceKind::Queen,
    Role::King => PieceKind::King,
  }
}

/// Replay the first `plies` half-moves of `moves`.
pub(crate) fn replay<S: AsRef<str>>(
  start: &str,
  moves: &[S],
  plies: usize,
) -> Result<ReplayedLine> {
  if plies > moves.len() {
    return Err(Error::PlyOutOfRange {
      requested: plies,
      available: moves.len(),
    });
  }

  let mut pos = setup(start)?;
  let mut moved_pieces = Vec::with_capacity(plies);
  for (ply, uci) in moves[..plies].iter().enumerate() {
    let role = play_uci(&mut pos, ply, uci.as_ref())?;
    moved_pieces.push(piece_kind(role));
  }

  let is_checkmate = pos.is_checkmate();
  let final_position =
    Fen::from_position(pos, EnPassantMode::Legal).to_string();

  Ok(ReplayedLine {
    final_position,
    moved_pieces,
    is_checkmate,
  })
}
