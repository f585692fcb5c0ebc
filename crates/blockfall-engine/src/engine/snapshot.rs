use serde::Serialize;

use crate::core::{
    field::Field,
    piece::{Piece, PieceKind},
};

use super::{game_engine::GameState, game_stats::GameStats};

/// Read-only, serializable view of a game at one point in time.
///
/// The field is given as one string per row, top to bottom, using
/// [`Block::as_char`](crate::Block::as_char). The falling piece is kept separate
/// rather than drawn into the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub field: Vec<String>,
    pub piece: Option<PieceSnapshot>,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    pub completed_pieces: usize,
    pub state: GameState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    /// Mask rows, `#` for an occupied cell and `.` otherwise.
    pub mask: [String; 4],
}

impl GameSnapshot {
    pub(crate) fn new(
        field: &Field,
        piece: Option<&Piece>,
        stats: &GameStats,
        state: GameState,
    ) -> Self {
        Self {
            field: field.row_strings().collect(),
            piece: piece.map(PieceSnapshot::new),
            score: stats.score(),
            level: stats.level(),
            lines: stats.total_cleared_lines(),
            completed_pieces: stats.completed_pieces(),
            state,
        }
    }
}

impl PieceSnapshot {
    fn new(piece: &Piece) -> Self {
        let mask = piece
            .mask()
            .map(|row| row.iter().map(|&cell| if cell { '#' } else { '.' }).collect());
        Self {
            kind: piece.kind(),
            x: piece.x(),
            y: piece.y(),
            mask,
        }
    }
}
