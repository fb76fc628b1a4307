// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The pluggable ruleset surface. A [`Variant`] bundles everything the board
//! core does not decide for itself: the board geometry, the castling square
//! tables, the set of legal promotion targets and the piece movement rules.
//! Boards hold a shared handle to their variant and pass it along to every
//! clone and replay.
use std::fmt;
use std::sync::Arc;

use crate::rules::{ClassicPieces, PieceRules};
use crate::types::{CastleStatus, Color, Indexed, PieceKind, Square, Wing};

/// The playing surface, in files and ranks. Movement, pawn ranks and FEN
/// emission all consult this rather than assuming eight by eight, though the
/// square space caps a variant at 8×8.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub files: usize,
    pub ranks: usize,
}

impl Geometry {
    pub const STANDARD: Geometry = Geometry { files: 8, ranks: 8 };

    pub fn contains(self, sq: Square) -> bool {
        sq.file().index() < self.files && sq.rank().index() < self.ranks
    }

    /// The rank index a pawn of this color promotes on.
    pub fn promotion_rank(self, color: Color) -> usize {
        match color {
            Color::White => self.ranks - 1,
            Color::Black => 0,
        }
    }

    /// The rank index a pawn of this color double-pushes from.
    pub fn pawn_rank(self, color: Color) -> usize {
        match color {
            Color::White => 1,
            Color::Black => self.ranks - 2,
        }
    }
}

/// The squares one castle touches: where the king and its partner rook
/// stand, and where both land.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CastleLane {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// Castling square tables, indexed by color and wing.
#[derive(Clone, Debug)]
pub struct CastlingRules {
    lanes: [[CastleLane; 2]; 2],
}

impl CastlingRules {
    pub const STANDARD: CastlingRules = CastlingRules {
        lanes: [
            [
                CastleLane {
                    king_from: Square::E1,
                    king_to: Square::G1,
                    rook_from: Square::H1,
                    rook_to: Square::F1,
                },
                CastleLane {
                    king_from: Square::E1,
                    king_to: Square::C1,
                    rook_from: Square::A1,
                    rook_to: Square::D1,
                },
            ],
            [
                CastleLane {
                    king_from: Square::E8,
                    king_to: Square::G8,
                    rook_from: Square::H8,
                    rook_to: Square::F8,
                },
                CastleLane {
                    king_from: Square::E8,
                    king_to: Square::C8,
                    rook_from: Square::A8,
                    rook_to: Square::D8,
                },
            ],
        ],
    };

    pub fn lane(&self, color: Color, wing: Wing) -> CastleLane {
        self.lanes[color.index()][wing.index()]
    }

    /// The rights flag for one castle of one color.
    pub fn rights(color: Color, wing: Wing) -> CastleStatus {
        match (color, wing) {
            (Color::White, Wing::Kingside) => CastleStatus::WHITE_KINGSIDE,
            (Color::White, Wing::Queenside) => CastleStatus::WHITE_QUEENSIDE,
            (Color::Black, Wing::Kingside) => CastleStatus::BLACK_KINGSIDE,
            (Color::Black, Wing::Queenside) => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    /// Both rights flags of one color.
    pub fn rights_of(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE,
            Color::Black => CastleStatus::BLACK,
        }
    }
}

/// A complete ruleset instance. The board core consumes this surface and
/// nothing else about the game being played on it.
pub struct Variant {
    pub name: &'static str,
    pub geometry: Geometry,
    pub castling: CastlingRules,
    /// Kinds a pawn may promote to.
    pub promotions: &'static [PieceKind],
    /// Per-kind movement and attack rules.
    pub pieces: Box<dyn PieceRules>,
}

impl Variant {
    /// Classical chess on the standard board.
    pub fn standard() -> Variant {
        Variant {
            name: "standard",
            geometry: Geometry::STANDARD,
            castling: CastlingRules::STANDARD,
            promotions: &[
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen,
            ],
            pieces: Box::new(ClassicPieces),
        }
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Variant")
            .field("name", &self.name)
            .field("geometry", &self.geometry)
            .finish()
    }
}

lazy_static! {
    /// The shared classical ruleset. Boards constructed by
    /// [`Board::standard`](crate::Board::standard) hang off this instance.
    pub static ref STANDARD: Arc<Variant> = Arc::new(Variant::standard());
}
