// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The move pipeline. A SAN string is parsed into a descriptor, the
//! descriptor is screened for capture validity and ambiguity, a single
//! unpinned candidate piece is chosen, and the move is applied in a fixed
//! order: capture, detach, attach, promote, castle bookkeeping, history,
//! refresh. Illegal input is answered with `false` and an untouched board,
//! never with an error.
use crate::board::{Board, CaptureRecord, HistoryEntry, Placed};
use crate::san::{self, San, SanShape};
use crate::types::{Color, Indexed, Piece, PieceKind, Square, Wing, WINGS};
use crate::variant::{CastleLane, CastlingRules};

impl Board {
    /// Plays one SAN half-move for the given side. Returns `true` exactly
    /// when the move was legal and has been applied.
    pub fn play(&mut self, color: Color, input: &str) -> bool {
        let san = match san::parse(color, input, &self.variant) {
            Some(san) => san,
            None => {
                debug!("play: not a half-move: {:?}", input);
                return false;
            }
        };

        match san.shape {
            SanShape::CastleKingside => self.play_castle(&san, Wing::Kingside),
            SanShape::CastleQueenside => self.play_castle(&san, Wing::Queenside),
            _ => self.play_standard(&san),
        }
    }

    /// Plays one half-move given in long algebraic notation, e.g. `e2e4` or
    /// `e7e8Q`. The SAN candidates for the move are tried in order until one
    /// plays. Unlike `play`, the side is checked against the turn.
    pub fn play_lan(&mut self, color: Color, lan: &str) -> bool {
        if color != self.side_to_move {
            debug!("play_lan: it is not {}'s turn", color);
            return false;
        }

        for candidate in self.lan_to_san(color, lan) {
            if self.play(color, &candidate) {
                return true;
            }
        }

        false
    }

    /// The SAN candidates for a long-algebraic move, least disambiguated
    /// first. The caller tries them in order; the first one the pipeline
    /// accepts is the move.
    pub fn lan_to_san(&self, color: Color, lan: &str) -> Vec<String> {
        let (from, to, promotion) = match san::explode_lan(lan) {
            Some(parts) => parts,
            None => return Vec::new(),
        };

        let piece = match self.piece_at(from) {
            Some(piece) if piece.color == color => piece,
            _ => return Vec::new(),
        };
        let occupied = self.piece_at(to).is_some();

        match piece.kind {
            PieceKind::King => {
                for &wing in &WINGS {
                    let lane = self.variant.castling.lane(color, wing);
                    if from == lane.king_from
                        && to == lane.king_to
                        && self.castle_status.contains(CastlingRules::rights(color, wing))
                    {
                        let text = match wing {
                            Wing::Kingside => "O-O",
                            Wing::Queenside => "O-O-O",
                        };
                        return vec![text.to_owned()];
                    }
                }

                if occupied {
                    vec![format!("Kx{}", to)]
                } else {
                    vec![format!("K{}", to)]
                }
            }
            PieceKind::Pawn => {
                let diagonal = from.file() != to.file();
                let mut text = if diagonal {
                    format!("{}x{}", from.file(), to)
                } else {
                    format!("{}", to)
                };
                if let Some(kind) = promotion {
                    text.push('=');
                    text.push(kind.letter());
                }
                vec![text]
            }
            kind => {
                let letter = kind.letter();
                let hints = [
                    String::new(),
                    format!("{}", from.file()),
                    format!("{}", from.rank()),
                    format!("{}", from),
                ];
                let mut out = Vec::new();
                for hint in &hints {
                    if occupied {
                        out.push(format!("{}{}x{}", letter, hint, to));
                    }
                    out.push(format!("{}{}{}", letter, hint, to));
                }
                out
            }
        }
    }

    /// Legal destination squares for the piece on `sq`. Always a subset of
    /// the variant's pseudo-legal `move_squares`; castling is a
    /// king-and-rook compound and is reported by [`Board::castles`]
    /// instead.
    pub fn legal(&self, sq: Square) -> Vec<Square> {
        let piece = match self.piece_at(sq) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        self.variant
            .pieces
            .move_squares(self, sq)
            .into_iter()
            .filter(|&to| !self.exposes_king(sq, to, piece.color))
            .collect()
    }

    /// The castle destinations available to the king on `sq`, fully
    /// legality-checked.
    pub fn castles(&self, sq: Square) -> Vec<Square> {
        let piece = match self.piece_at(sq) {
            Some(piece) if piece.kind == PieceKind::King => piece,
            _ => return Vec::new(),
        };

        let mut out = Vec::new();
        for &wing in &WINGS {
            let lane = self.variant.castling.lane(piece.color, wing);
            if lane.king_from == sq && self.castle_viable(piece.color, wing).is_some() {
                out.push(lane.king_to);
            }
        }

        out
    }
}

//
// Pipeline internals
//

impl Board {
    fn play_standard(&mut self, san: &San) -> bool {
        // A promotion must actually be a promoting pawn move, to a kind the
        // variant allows.
        if let Some(promotion) = san.promotion {
            if !self.variant.promotions.contains(&promotion) {
                debug!("play: {} is not a promotion target here", promotion);
                return false;
            }
            if san.kind != PieceKind::Pawn
                || !self
                    .variant
                    .pieces
                    .promotes_on(self.geometry(), san.color, san.dest)
            {
                debug!("play: {} does not promote", san.text);
                return false;
            }
        }

        // Captures need something to capture: a piece of the other side on
        // the destination, or the en passant target for a pawn. Quiet moves
        // need the destination vacant.
        match self.piece_at(san.dest) {
            Some(victim) => {
                if !san.is_capture {
                    debug!("play: {} is occupied and {} is no capture", san.dest, san.text);
                    return false;
                }
                if victim.color == san.color {
                    debug!("play: {} would capture its own piece", san.text);
                    return false;
                }
            }
            None => {
                if san.is_capture {
                    let en_passant = san.kind == PieceKind::Pawn
                        && self.en_passant() == Some(san.dest);
                    if !en_passant {
                        debug!("play: {} captures an empty square", san.text);
                        return false;
                    }
                }
            }
        }

        // Candidate selection: pieces of the right kind whose square text
        // contains the origin hint and which can reach the destination. Of
        // those, only the ones whose king survives the move count; two or
        // more of them make the move ambiguous.
        let candidates = self.candidates(san);
        let mut movable = candidates
            .into_iter()
            .filter(|&from| !self.exposes_king(from, san.dest, san.color));
        let chosen = match movable.next() {
            Some(from) => from,
            None => {
                debug!("play: no piece can make {}", san.text);
                return false;
            }
        };
        if movable.next().is_some() {
            debug!("play: {} is ambiguous", san.text);
            return false;
        }

        self.apply(chosen, san);
        true
    }

    fn candidates(&self, san: &San) -> Vec<Square> {
        self.pieces_of(san.color)
            .into_iter()
            .filter(|placed| placed.piece.kind == san.kind)
            .filter(|placed| placed.square.to_string().contains(san.disambig.as_str()))
            .filter(|placed| {
                self.variant
                    .pieces
                    .move_squares(self, placed.square)
                    .contains(&san.dest)
            })
            .map(|placed| placed.square)
            .collect()
    }

    /// The pin test: execute the move on a clone and ask whether the
    /// mover's own king ends up attacked.
    pub(crate) fn exposes_king(&self, from: Square, to: Square, color: Color) -> bool {
        let mut probe = self.clone();
        probe.execute(from, to);
        probe.king_attacked(color)
    }

    /// The bare mutation shared by the pin test and `legal`: capture (en
    /// passant aware), detach, attach. No history, no refresh, no
    /// promotion; a promoted piece covers its king exactly as the pawn
    /// standing there would.
    fn execute(&mut self, from: Square, to: Square) {
        let mover = match self.pieces.remove(&from) {
            Some(piece) => piece,
            None => return,
        };

        if self.pieces.remove(&to).is_none()
            && mover.kind == PieceKind::Pawn
            && from.file() != to.file()
        {
            // A diagonal pawn move onto an empty square is en passant; the
            // victim stands beside the destination square.
            self.pieces.remove(&Square::of(from.rank(), to.file()));
        }

        self.pieces.insert(to, mover);
    }

    /// Applies a validated non-castling move in the fixed order: capture,
    /// detach, attach, promote, castle bookkeeping, history, refresh.
    fn apply(&mut self, from: Square, san: &San) {
        let mover = self
            .piece_at(from)
            .expect("apply: chosen candidate vanished");

        if san.is_capture {
            self.record_capture(from, mover, san.dest);
        }

        self.pieces.remove(&from);
        self.pieces.insert(san.dest, mover);

        if mover.kind == PieceKind::Pawn
            && self
                .variant
                .pieces
                .promotes_on(self.geometry(), mover.color, san.dest)
        {
            // Promotion detaches the pawn and attaches the new piece on the
            // same square; a promoted rook services no castle.
            let target = san.promotion.unwrap_or(PieceKind::Queen);
            self.pieces.insert(san.dest, Piece::new(target, mover.color));
        }

        self.update_castle(mover, san.dest, san.is_capture);
        self.push_history(&san.text, mover.color, mover.kind, from, san.dest);
        self.refresh();
        self.stamp_suffix();
    }

    /// Detaches the captured piece and records the capture. For an en
    /// passant capture the victim is the pawn beside the destination.
    fn record_capture(&mut self, from: Square, capturing: Piece, dest: Square) {
        let victim_square = if self.piece_at(dest).is_some() {
            dest
        } else {
            Square::of(from.rank(), dest.file())
        };

        if let Some(victim) = self.pieces.remove(&victim_square) {
            self.captures[capturing.color.index()].push(CaptureRecord {
                capturing: Placed {
                    piece: capturing,
                    square: from,
                },
                captured: Placed {
                    piece: victim,
                    square: victim_square,
                },
            });
        }
    }

    /// Castling-right maintenance after a non-castling move, computed
    /// against the pre-refresh turn. A king move forfeits both rights, a
    /// tagged rook move the right of its wing, and a capture landing on an
    /// opposing rook's home square the opponent's right on that wing.
    fn update_castle(&mut self, mover: Piece, to: Square, was_capture: bool) {
        let color = mover.color;
        if self.castle_status.intersects(CastlingRules::rights_of(color)) {
            match mover.kind {
                PieceKind::King => {
                    self.castle_status &= !CastlingRules::rights_of(color);
                }
                PieceKind::Rook => {
                    if let Some(wing) = mover.wing {
                        self.castle_status &= !CastlingRules::rights(color, wing);
                    }
                }
                _ => {}
            }
        }

        let opponent = color.toggle();
        if was_capture
            && self
                .castle_status
                .intersects(CastlingRules::rights_of(opponent))
        {
            for &wing in &WINGS {
                if to == self.variant.castling.lane(opponent, wing).rook_from {
                    self.castle_status &= !CastlingRules::rights(opponent, wing);
                }
            }
        }
    }

    fn push_history(&mut self, text: &str, color: Color, kind: PieceKind, from: Square, to: Square) {
        self.history.push(HistoryEntry {
            san: text.to_owned(),
            fen: String::new(),
            castle_status: self.castle_status,
            color,
            kind,
            from,
            to,
        });
    }

    /// Post-move bookkeeping: the turn flips, the derived caches are
    /// recomputed, and the trailing history entry is stamped with the FEN
    /// of the new position.
    fn refresh(&mut self) {
        self.side_to_move = self.side_to_move.toggle();
        self.occupied_count = self.pieces.len();
        let fen = self.to_fen();
        if let Some(last) = self.history.last_mut() {
            last.fen = fen;
        }
    }

    /// Appends `#` or `+` to the SAN just recorded when the move delivered
    /// mate or check.
    fn stamp_suffix(&mut self) {
        let suffix = if self.is_check() {
            if self.is_mate() {
                Some('#')
            } else {
                Some('+')
            }
        } else {
            None
        };

        if let Some(c) = suffix {
            if let Some(last) = self.history.last_mut() {
                last.san.push(c);
            }
        }
    }
}

//
// Castling
//

impl Board {
    /// Checks one castle end to end and hands back the lane and the partner
    /// rook's square when every condition holds: the right is still
    /// available, the king stands on its source square, the partner rook
    /// resolves by its wing tag, the lane between them is clear, and the
    /// king neither starts, crosses nor lands on an attacked square.
    pub(crate) fn castle_viable(&self, color: Color, wing: Wing) -> Option<(CastleLane, Square)> {
        if !self
            .castle_status
            .contains(CastlingRules::rights(color, wing))
        {
            return None;
        }

        let lane = self.variant.castling.lane(color, wing);
        match self.piece_at(lane.king_from) {
            Some(piece) if piece.kind == PieceKind::King && piece.color == color => {}
            _ => return None,
        }

        let rook_square = self.castle_rook(color, wing)?;

        for sq in between_on_rank(lane.king_from, rook_square) {
            if self.piece_at(sq).is_some() {
                return None;
            }
        }

        let opponent = color.toggle();
        for sq in king_path(lane.king_from, lane.king_to) {
            if !self.attackers_of(sq, opponent).is_empty() {
                return None;
            }
        }

        Some((lane, rook_square))
    }

    /// The square of the rook still servicing the given wing, if it is on
    /// the board.
    fn castle_rook(&self, color: Color, wing: Wing) -> Option<Square> {
        self.pieces
            .iter()
            .find(|(_, piece)| {
                piece.color == color
                    && piece.kind == PieceKind::Rook
                    && piece.wing == Some(wing)
            })
            .map(|(&square, _)| square)
    }

    fn play_castle(&mut self, san: &San, wing: Wing) -> bool {
        let color = san.color;
        let (lane, rook_square) = match self.castle_viable(color, wing) {
            Some(found) => found,
            None => {
                debug!("play: {} may not castle {:?}", color, wing);
                return false;
            }
        };

        let rook = self
            .pieces
            .remove(&rook_square)
            .expect("castle: partner rook vanished");
        self.pieces.remove(&lane.king_from);
        self.pieces.insert(lane.king_to, Piece::new(PieceKind::King, color));
        self.pieces.insert(lane.rook_to, rook);
        self.castle_status &= !CastlingRules::rights_of(color);

        self.push_history(&san.text, color, PieceKind::King, lane.king_from, lane.king_to);
        self.refresh();
        self.stamp_suffix();
        true
    }
}

/// The squares strictly between two squares on the same rank.
fn between_on_rank(a: Square, b: Square) -> Vec<Square> {
    let rank = a.rank();
    let (low, high) = if a.file().index() < b.file().index() {
        (a.file().index(), b.file().index())
    } else {
        (b.file().index(), a.file().index())
    };

    ((low + 1)..high)
        .map(|file| Square::of(rank, crate::types::File::from_index(file)))
        .collect()
}

/// The squares a castling king occupies on its way, source and target
/// included.
fn king_path(from: Square, to: Square) -> Vec<Square> {
    let step: i32 = if to.file().index() > from.file().index() {
        1
    } else {
        -1
    };

    let mut path = vec![from];
    let mut cursor = from;
    while cursor != to {
        cursor = cursor.offset(step, 0).expect("castle path left the board");
        path.push(cursor);
    }

    path
}
