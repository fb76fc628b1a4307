// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Piece movement rules. The board core never walks the board itself; it
//! asks the variant's [`PieceRules`] for pseudo-legal targets and attack
//! squares and layers legality (pins, check, castling) on top.
use crate::board::Board;
use crate::types::{
    Color, Direction, Indexed, PieceKind, Square, BISHOP_DIRECTIONS, DIRECTIONS, ROOK_DIRECTIONS,
};
use crate::variant::Geometry;

/// Per-kind movement and attack rules for one variant.
///
/// `move_squares` answers "where may the piece on this square go", ignoring
/// pins and checks; castling is a king-and-rook compound handled by the board
/// itself and never appears here. `attack_squares` answers "which squares
/// does this piece bear on right now" and differs from movement only for
/// pawns, whose pushes do not attack and whose diagonals always do.
pub trait PieceRules: Send + Sync {
    /// Pseudo-legal destination squares for the piece on `sq`.
    fn move_squares(&self, board: &Board, sq: Square) -> Vec<Square>;

    /// Squares the piece on `sq` currently attacks.
    fn attack_squares(&self, board: &Board, sq: Square) -> Vec<Square>;

    /// Squares strictly between a sliding piece on `from` and `to`, along
    /// the ray it attacks `to` on. Empty when `from` does not hold a slider
    /// or the squares do not share a ray.
    fn line_of_attack(&self, board: &Board, from: Square, to: Square) -> Vec<Square>;

    /// Whether a pawn of `color` arriving on `sq` promotes.
    fn promotes_on(&self, geometry: Geometry, color: Color, sq: Square) -> bool;
}

static KNIGHT_JUMPS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

static KING_STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// The classical movement rules: the reference [`PieceRules`] instance.
pub struct ClassicPieces;

impl ClassicPieces {
    /// Walks each direction until the edge of the board or a blocker. The
    /// blocker square itself is included when `include_own` is set or the
    /// blocker belongs to the other side.
    fn slide(
        &self,
        board: &Board,
        sq: Square,
        color: Color,
        dirs: &[Direction],
        include_own: bool,
    ) -> Vec<Square> {
        let mut out = Vec::new();
        for &dir in dirs {
            let (df, dr) = dir.as_deltas();
            let mut cursor = sq;
            while let Some(next) = cursor.offset(df, dr) {
                if !board.geometry().contains(next) {
                    break;
                }

                match board.piece_at(next) {
                    Some(blocker) => {
                        if include_own || blocker.color != color {
                            out.push(next);
                        }
                        break;
                    }
                    None => {
                        out.push(next);
                        cursor = next;
                    }
                }
            }
        }

        out
    }

    /// Fixed-offset movement for knights and kings.
    fn steps(
        &self,
        board: &Board,
        sq: Square,
        color: Color,
        jumps: &[(i32, i32)],
        include_own: bool,
    ) -> Vec<Square> {
        let mut out = Vec::new();
        for &(df, dr) in jumps {
            if let Some(next) = sq.offset(df, dr) {
                if !board.geometry().contains(next) {
                    continue;
                }

                match board.piece_at(next) {
                    Some(blocker) if !include_own && blocker.color == color => {}
                    _ => out.push(next),
                }
            }
        }

        out
    }

    fn pawn_moves(&self, board: &Board, sq: Square, color: Color) -> Vec<Square> {
        let dr: i32 = match color {
            Color::White => 1,
            Color::Black => -1,
        };

        let mut out = Vec::new();

        // Pushes: one square always, two from the pawn rank, both only onto
        // empty squares.
        if let Some(one) = sq.offset(0, dr) {
            if board.geometry().contains(one) && board.piece_at(one).is_none() {
                out.push(one);
                if sq.rank().index() == board.geometry().pawn_rank(color) {
                    if let Some(two) = one.offset(0, dr) {
                        if board.geometry().contains(two) && board.piece_at(two).is_none() {
                            out.push(two);
                        }
                    }
                }
            }
        }

        // Diagonals: onto an enemy piece, or onto the en passant target.
        for &df in &[-1, 1] {
            if let Some(diag) = sq.offset(df, dr) {
                if !board.geometry().contains(diag) {
                    continue;
                }

                match board.piece_at(diag) {
                    Some(enemy) if enemy.color != color => out.push(diag),
                    None if board.en_passant() == Some(diag) => out.push(diag),
                    _ => {}
                }
            }
        }

        out
    }

    fn pawn_attacks(&self, board: &Board, sq: Square, color: Color) -> Vec<Square> {
        let dr: i32 = match color {
            Color::White => 1,
            Color::Black => -1,
        };

        let mut out = Vec::new();
        for &df in &[-1, 1] {
            if let Some(diag) = sq.offset(df, dr) {
                if board.geometry().contains(diag) {
                    out.push(diag);
                }
            }
        }

        out
    }
}

impl PieceRules for ClassicPieces {
    fn move_squares(&self, board: &Board, sq: Square) -> Vec<Square> {
        let piece = match board.piece_at(sq) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(board, sq, piece.color),
            PieceKind::Knight => self.steps(board, sq, piece.color, &KNIGHT_JUMPS, false),
            PieceKind::Bishop => self.slide(board, sq, piece.color, &BISHOP_DIRECTIONS, false),
            PieceKind::Rook => self.slide(board, sq, piece.color, &ROOK_DIRECTIONS, false),
            PieceKind::Queen => self.slide(board, sq, piece.color, &DIRECTIONS, false),
            PieceKind::King => self.steps(board, sq, piece.color, &KING_STEPS, false),
        }
    }

    fn attack_squares(&self, board: &Board, sq: Square) -> Vec<Square> {
        let piece = match board.piece_at(sq) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        match piece.kind {
            PieceKind::Pawn => self.pawn_attacks(board, sq, piece.color),
            PieceKind::Knight => self.steps(board, sq, piece.color, &KNIGHT_JUMPS, true),
            PieceKind::Bishop => self.slide(board, sq, piece.color, &BISHOP_DIRECTIONS, true),
            PieceKind::Rook => self.slide(board, sq, piece.color, &ROOK_DIRECTIONS, true),
            PieceKind::Queen => self.slide(board, sq, piece.color, &DIRECTIONS, true),
            PieceKind::King => self.steps(board, sq, piece.color, &KING_STEPS, true),
        }
    }

    fn line_of_attack(&self, board: &Board, from: Square, to: Square) -> Vec<Square> {
        let piece = match board.piece_at(from) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        if !piece.is_sliding() {
            return Vec::new();
        }

        let df = (to.file().index() as i32 - from.file().index() as i32).signum();
        let dr = (to.rank().index() as i32 - from.rank().index() as i32).signum();
        let file_span = (to.file().index() as i32 - from.file().index() as i32).abs();
        let rank_span = (to.rank().index() as i32 - from.rank().index() as i32).abs();

        // The squares must share a rank, a file, or a diagonal, and the
        // piece must be able to slide that way.
        let diagonal = df != 0 && dr != 0;
        if diagonal && file_span != rank_span {
            return Vec::new();
        }
        let capable = match piece.kind {
            PieceKind::Rook => !diagonal,
            PieceKind::Bishop => diagonal,
            _ => true,
        };
        if !capable {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut cursor = from;
        loop {
            cursor = match cursor.offset(df, dr) {
                Some(next) => next,
                None => return Vec::new(),
            };
            if cursor == to {
                return out;
            }
            out.push(cursor);
        }
    }

    fn promotes_on(&self, geometry: Geometry, color: Color, sq: Square) -> bool {
        sq.rank().index() == geometry.promotion_rank(color)
    }
}
