// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Position predicates: check, mate, stalemate and the automatic draw
//! conditions, plus a single `outcome` summary over all of them.
use hashbrown::HashMap;

use crate::board::Board;
use crate::types::{Color, PieceKind, Square};

/// How a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Checkmate; the named color delivered it.
    Mate(Color),
    Draw(DrawKind),
}

/// Which automatic draw ended the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawKind {
    Stalemate,
    FivefoldRepetition,
    FiftyMove,
    DeadPosition,
}

impl Board {
    /// The pieces of `by` currently attacking `target`.
    pub(crate) fn attackers_of(&self, target: Square, by: Color) -> Vec<Square> {
        self.pieces_of(by)
            .into_iter()
            .filter(|placed| {
                self.variant
                    .pieces
                    .attack_squares(self, placed.square)
                    .contains(&target)
            })
            .map(|placed| placed.square)
            .collect()
    }

    /// Whether the king of `color` is attacked. A board without that king
    /// answers `false`.
    pub(crate) fn king_attacked(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => !self.attackers_of(king, color.toggle()).is_empty(),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.king_attacked(self.side_to_move)
    }

    /// Whether the side to move is checkmated. Under a single check the
    /// defence may capture the checker, block its line, or move the king;
    /// under a double check only the king move counts.
    pub fn is_mate(&self) -> bool {
        let color = self.side_to_move;
        let king = match self.king_square(color) {
            Some(king) => king,
            None => return false,
        };

        let attackers = self.attackers_of(king, color.toggle());
        if attackers.is_empty() {
            return false;
        }

        if !self.legal(king).is_empty() {
            return false;
        }

        if attackers.len() >= 2 {
            return true;
        }

        let attacker = attackers[0];

        // Can anyone capture the checker? The king's own captures were
        // covered by its legal squares above. An en passant capture lands
        // beside its victim, so it is matched against the victim square.
        for placed in self.pieces_of(color) {
            if placed.piece.kind == PieceKind::King {
                continue;
            }

            for to in self.legal(placed.square) {
                if to == attacker {
                    return false;
                }
                if placed.piece.kind == PieceKind::Pawn
                    && self.en_passant() == Some(to)
                    && Square::of(placed.square.rank(), to.file()) == attacker
                {
                    return false;
                }
            }
        }

        // Can anyone interpose on the checker's line of attack?
        let line = self.variant.pieces.line_of_attack(self, attacker, king);
        if !line.is_empty() {
            for placed in self.pieces_of(color) {
                if placed.piece.kind == PieceKind::King {
                    continue;
                }

                if self
                    .legal(placed.square)
                    .iter()
                    .any(|sq| line.contains(sq))
                {
                    return false;
                }
            }
        }

        true
    }

    /// Whether the side to move is stalemated: not in check, with no legal
    /// move anywhere.
    pub fn is_stalemate(&self) -> bool {
        if self.is_check() {
            return false;
        }

        self.pieces_of(self.side_to_move)
            .iter()
            .all(|placed| self.legal(placed.square).is_empty())
    }

    /// Whether any position has occurred five or more times over the
    /// recorded history.
    pub fn is_fivefold_repetition(&self) -> bool {
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for entry in &self.history {
            let count = seen.entry(entry.fen.as_str()).or_insert(0);
            *count += 1;
            if *count >= 5 {
                return true;
            }
        }

        false
    }

    /// Draw by the fifty-move count: one hundred half-moves recorded on
    /// this board. The count runs from construction and does not reset on
    /// captures or pawn moves, a known deviation from the classical rule.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.history.len() >= 100
    }

    /// Whether the material on the board cannot mate by any sequence of
    /// legal moves: bare kings, a single minor piece, or one same-shaded
    /// bishop on each side.
    pub fn is_dead_position_draw(&self) -> bool {
        match self.occupied_count {
            2 => true,
            3 => self.pieces().iter().any(|placed| {
                placed.piece.kind == PieceKind::Knight || placed.piece.kind == PieceKind::Bishop
            }),
            4 => {
                let minors: Vec<_> = self
                    .pieces()
                    .into_iter()
                    .filter(|placed| placed.piece.kind != PieceKind::King)
                    .collect();
                if minors.len() != 2 {
                    return false;
                }

                minors[0].piece.kind == PieceKind::Bishop
                    && minors[1].piece.kind == PieceKind::Bishop
                    && minors[0].piece.color != minors[1].piece.color
                    && minors[0].square.shade() == minors[1].square.shade()
            }
            _ => false,
        }
    }

    /// The terminal state of the game, if it has one.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_mate() {
            return Some(Outcome::Mate(self.side_to_move.toggle()));
        }
        if self.is_stalemate() {
            return Some(Outcome::Draw(DrawKind::Stalemate));
        }
        if self.is_fivefold_repetition() {
            return Some(Outcome::Draw(DrawKind::FivefoldRepetition));
        }
        if self.is_fifty_move_draw() {
            return Some(Outcome::Draw(DrawKind::FiftyMove));
        }
        if self.is_dead_position_draw() {
            return Some(Outcome::Draw(DrawKind::DeadPosition));
        }

        None
    }
}
