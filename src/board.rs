// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::types::{
    CastleStatus, Color, File, Indexed, Piece, PieceKind, Rank, Square, Wing, COLORS, WINGS,
};
use crate::variant::{CastlingRules, Geometry, Variant};

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToWidth,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            FenParseError::UnexpectedChar(c) => return write!(f, "unexpected character: {}", c),
            FenParseError::UnexpectedEnd => "unexpected end of input",
            FenParseError::InvalidDigit => "invalid digit in piece placement",
            FenParseError::FileDoesNotSumToWidth => "rank does not span the board",
            FenParseError::UnknownPiece => "unknown piece character",
            FenParseError::InvalidSideToMove => "invalid side to move",
            FenParseError::InvalidCastle => "invalid castling availability",
            FenParseError::InvalidEnPassant => "invalid en passant square",
            FenParseError::InvalidHalfmove => "invalid halfmove clock",
            FenParseError::InvalidFullmove => "invalid fullmove clock",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for FenParseError {}

/// A piece together with the square it stands on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placed {
    pub piece: Piece,
    pub square: Square,
}

/// A capture as recorded in the per-color capture log: who took, who was
/// taken, and where both stood when it happened. These are plain data
/// copies; the captured piece is no longer on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureRecord {
    pub capturing: Placed,
    pub captured: Placed,
}

/// One successful half-move in play order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The normalised SAN, check or mate suffix included.
    pub san: String,
    /// FEN of the position after the move.
    pub fen: String,
    /// Castling rights in force after the move.
    pub castle_status: CastleStatus,
    pub color: Color,
    pub kind: PieceKind,
    pub from: Square,
    pub to: Square,
}

/// A chess position with its play history: the aggregate root of the crate.
///
/// Boards are constructed from FEN and mutated only through the move
/// pipeline (`play`, `play_lan`). A failed move leaves the board untouched.
/// `Clone` is the sanctioned way to branch; clones share the immutable
/// variant handle and nothing else.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: HashMap<Square, Piece>,
    pub(crate) side_to_move: Color,
    pub(crate) castle_status: CastleStatus,
    pub(crate) start_fen: String,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) captures: [Vec<CaptureRecord>; 2],
    pub(crate) occupied_count: usize,
    pub(crate) variant: Arc<Variant>,
}

//
// Construction and FEN parsing
//

impl Board {
    /// The classical start position on the standard variant.
    pub fn standard() -> Board {
        Board::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            crate::variant::STANDARD.clone(),
        )
        .unwrap()
    }

    /// Constructs a board from a FEN string under the given variant. The
    /// halfmove and fullmove counters are accepted and ignored, so both the
    /// four-field form this crate emits and the six-field classical form
    /// parse.
    pub fn from_fen<S: AsRef<str>>(fen: S, variant: Arc<Variant>) -> Result<Board, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream<'_>) {
            let _ = iter.next();
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        let trimmed = fen.as_ref().trim();
        let mut fields = trimmed.split_whitespace();

        // Field one: piece placement, top rank first.
        let geometry = variant.geometry;
        let mut pieces: HashMap<Square, Piece> = HashMap::new();
        {
            let placement = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
            let iter = &mut placement.chars().peekable();
            for rank in (0..geometry.ranks).rev() {
                let mut file = 0;
                while file < geometry.files {
                    let c = peek(iter)?;
                    // Digits name a run of empty squares.
                    if c.is_digit(10) {
                        if c < '1' || c > '8' {
                            return Err(FenParseError::InvalidDigit);
                        }

                        file += c as usize - 48;
                        if file > geometry.files {
                            return Err(FenParseError::FileDoesNotSumToWidth);
                        }

                        advance(iter);
                        continue;
                    }

                    let piece =
                        Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                    let square = Square::of(Rank::from_index(rank), File::from_index(file));
                    pieces.insert(square, piece);
                    advance(iter);
                    file += 1;
                }

                if rank != 0 {
                    eat(iter, '/')?;
                }
            }

            if iter.peek().is_some() {
                return Err(FenParseError::FileDoesNotSumToWidth);
            }
        }

        // Field two: side to move.
        let side_to_move = match fields.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(FenParseError::InvalidSideToMove),
            None => return Err(FenParseError::UnexpectedEnd),
        };

        // Field three: castling availability.
        let castle_field = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        let mut castle_status = CastleStatus::NONE;
        if castle_field != "-" {
            for c in castle_field.chars() {
                match c {
                    'K' => castle_status |= CastleStatus::WHITE_KINGSIDE,
                    'Q' => castle_status |= CastleStatus::WHITE_QUEENSIDE,
                    'k' => castle_status |= CastleStatus::BLACK_KINGSIDE,
                    'q' => castle_status |= CastleStatus::BLACK_QUEENSIDE,
                    _ => return Err(FenParseError::InvalidCastle),
                }
            }
        }

        // Field four: en passant target. The square is validated here and
        // re-read from the stored start FEN on demand.
        let ep_field = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        if ep_field != "-" {
            let mut chars = ep_field.chars();
            let file = chars
                .next()
                .and_then(|c| File::try_from(c).ok())
                .ok_or(FenParseError::InvalidEnPassant)?;
            let rank = chars
                .next()
                .and_then(|c| Rank::try_from(c).ok())
                .ok_or(FenParseError::InvalidEnPassant)?;
            if chars.next().is_some() || !geometry.contains(Square::of(rank, file)) {
                return Err(FenParseError::InvalidEnPassant);
            }
        }

        // Fields five and six, when present: the clocks. Ignored, but they
        // must at least be numbers.
        if let Some(halfmove) = fields.next() {
            halfmove
                .parse::<u32>()
                .map_err(|_| FenParseError::InvalidHalfmove)?;
            let fullmove = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
            fullmove
                .parse::<u32>()
                .map_err(|_| FenParseError::InvalidFullmove)?;
        }

        // Rooks standing on their castling source squares service that
        // wing; every other rook is a plain rook.
        for &color in &COLORS {
            for &wing in &WINGS {
                let lane = variant.castling.lane(color, wing);
                if let Some(piece) = pieces.get_mut(&lane.rook_from) {
                    if piece.kind == PieceKind::Rook && piece.color == color {
                        piece.wing = Some(wing);
                    }
                }
            }
        }

        let occupied_count = pieces.len();
        Ok(Board {
            pieces,
            side_to_move,
            castle_status,
            start_fen: trimmed.to_owned(),
            history: Vec::new(),
            captures: [Vec::new(), Vec::new()],
            occupied_count,
            variant,
        })
    }
}

//
// Board state getters
//

impl Board {
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status
            .contains(CastlingRules::rights(color, Wing::Kingside))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status
            .contains(CastlingRules::rights(color, Wing::Queenside))
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn geometry(&self) -> Geometry {
        self.variant.geometry
    }

    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The captures made by the given color, in play order.
    pub fn captures(&self, color: Color) -> &[CaptureRecord] {
        &self.captures[color.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces.get(&square).copied()
    }

    /// Every piece on the board.
    pub fn pieces(&self) -> Vec<Placed> {
        self.pieces
            .iter()
            .map(|(&square, &piece)| Placed { piece, square })
            .collect()
    }

    /// Every piece of one color.
    pub fn pieces_of(&self, color: Color) -> Vec<Placed> {
        self.pieces
            .iter()
            .filter(|(_, piece)| piece.color == color)
            .map(|(&square, &piece)| Placed { piece, square })
            .collect()
    }

    /// The first piece of the given color and kind, if any.
    pub fn piece(&self, color: Color, kind: PieceKind) -> Option<Placed> {
        self.pieces
            .iter()
            .find(|(_, piece)| piece.color == color && piece.kind == kind)
            .map(|(&square, &piece)| Placed { piece, square })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.piece(color, PieceKind::King).map(|placed| placed.square)
    }
}

//
// Derived state: en passant, serialisation, movetext
//

impl Board {
    /// The current en passant target square, if the previous half-move was
    /// a double pawn push. On a board with no history yet, the start FEN's
    /// en passant field answers instead.
    pub fn en_passant(&self) -> Option<Square> {
        match self.history.last() {
            Some(entry) => {
                if entry.kind != PieceKind::Pawn {
                    return None;
                }

                let from_rank = entry.from.rank().index() as i32;
                let to_rank = entry.to.rank().index() as i32;
                if (from_rank - to_rank).abs() != 2 {
                    return None;
                }

                let jumped = Rank::from_index(((from_rank + to_rank) / 2) as usize);
                Some(Square::of(jumped, entry.to.file()))
            }
            None => {
                let field = self.start_fen.split_whitespace().nth(3)?;
                if field == "-" {
                    return None;
                }

                let mut chars = field.chars();
                let file = File::try_from(chars.next()?).ok()?;
                let rank = Rank::try_from(chars.next()?).ok()?;
                Some(Square::of(rank, file))
            }
        }
    }

    /// Serialises the position: placement, side to move, castling
    /// availability and en passant target.
    pub fn to_fen(&self) -> String {
        let geometry = self.geometry();
        let mut buf = String::new();
        for rank in (0..geometry.ranks).rev() {
            let mut empty_squares = 0;
            for file in 0..geometry.files {
                let square = Square::of(Rank::from_index(rank), File::from_index(file));
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != 0 {
                buf.push('/');
            }
        }

        buf.push(' ');
        write!(&mut buf, "{}", self.side_to_move).unwrap();
        buf.push(' ');
        if self.castle_status == CastleStatus::NONE {
            buf.push('-');
        } else {
            if self.can_castle_kingside(Color::White) {
                buf.push('K');
            }
            if self.can_castle_queenside(Color::White) {
                buf.push('Q');
            }
            if self.can_castle_kingside(Color::Black) {
                buf.push('k');
            }
            if self.can_castle_queenside(Color::Black) {
                buf.push('q');
            }
        }
        buf.push(' ');
        if let Some(ep_square) = self.en_passant() {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }

        buf
    }

    /// The position as rows of optional pieces, top rank first.
    pub fn to_array(&self) -> Vec<Vec<Option<Piece>>> {
        let geometry = self.geometry();
        let mut rows = Vec::with_capacity(geometry.ranks);
        for rank in (0..geometry.ranks).rev() {
            let mut row = Vec::with_capacity(geometry.files);
            for file in 0..geometry.files {
                row.push(self.piece_at(Square::of(
                    Rank::from_index(rank),
                    File::from_index(file),
                )));
            }
            rows.push(row);
        }

        rows
    }

    /// Standard movetext for the game so far: numbered SAN half-moves,
    /// `1...` first when the recorded game opens with a Black move.
    pub fn movetext(&self) -> String {
        let mut buf = String::new();
        let mut number = 1;
        for (i, entry) in self.history.iter().enumerate() {
            match entry.color {
                Color::White => {
                    write!(&mut buf, "{}. ", number).unwrap();
                }
                Color::Black => {
                    if i == 0 {
                        buf.push_str("1... ");
                    }
                }
            }

            buf.push_str(&entry.san);
            if entry.color == Color::Black {
                number += 1;
            }
            if i + 1 != self.history.len() {
                buf.push(' ');
            }
        }

        buf
    }

    /// A new board one half-move earlier, rebuilt by replaying the history
    /// from the start FEN. On a board with no history this is the start
    /// position again.
    pub fn undo(&self) -> Board {
        let mut replayed = Board::from_fen(&self.start_fen, self.variant.clone())
            .expect("start FEN parsed once already");
        let keep = self.history.len().saturating_sub(1);
        for entry in &self.history[..keep] {
            let replayed_ok = replayed.play(entry.color, &entry.san);
            debug_assert!(replayed_ok, "history replay rejected {}", entry.san);
        }

        replayed
    }
}

//
// Trait implementations
//

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let geometry = self.geometry();
        for rank in (0..geometry.ranks).rev() {
            for file in 0..geometry.files {
                let sq = Square::of(Rank::from_index(rank), File::from_index(file));
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", Rank::from_index(rank))?;
        }

        for _ in 0..geometry.files {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 0..geometry.files {
            write!(f, " {} ", File::from_index(file))?;
        }

        writeln!(f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen, variant::STANDARD.clone()).unwrap()
    }

    mod fen {
        use super::*;

        #[test]
        fn fen_smoke() {
            let b = board("8/8/8/8/8/8/8/8 w - - 0 0");

            // white's turn to move.
            assert_eq!(Color::White, b.side_to_move());

            // no castling.
            assert!(!b.can_castle_kingside(Color::White));
            assert!(!b.can_castle_kingside(Color::Black));
            assert!(!b.can_castle_queenside(Color::White));
            assert!(!b.can_castle_queenside(Color::Black));

            // no en passant.
            assert!(b.en_passant().is_none());

            // nothing on the board.
            assert!(b.pieces().is_empty());
        }

        #[test]
        fn four_field_fen_parses() {
            let b = board("8/8/8/8/8/8/8/8 b kq e3");
            assert_eq!(Color::Black, b.side_to_move());
            assert!(b.can_castle_kingside(Color::Black));
            assert!(b.can_castle_queenside(Color::Black));
            assert_eq!(Some(Square::E3), b.en_passant());
        }

        #[test]
        fn starting_position() {
            let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");

            let check_square = |name: &str, kind: PieceKind, color: Color| {
                let chars: Vec<_> = name.chars().collect();
                let file = File::try_from(chars[0]).unwrap();
                let rank = Rank::try_from(chars[1]).unwrap();
                let piece = b.piece_at(Square::of(rank, file)).unwrap();
                assert_eq!(kind, piece.kind);
                assert_eq!(color, piece.color);
            };

            check_square("a1", PieceKind::Rook, Color::White);
            check_square("b1", PieceKind::Knight, Color::White);
            check_square("c1", PieceKind::Bishop, Color::White);
            check_square("d1", PieceKind::Queen, Color::White);
            check_square("e1", PieceKind::King, Color::White);
            check_square("e2", PieceKind::Pawn, Color::White);
            check_square("e7", PieceKind::Pawn, Color::Black);
            check_square("d8", PieceKind::Queen, Color::Black);
            check_square("e8", PieceKind::King, Color::Black);
            check_square("h8", PieceKind::Rook, Color::Black);
            assert!(b.piece_at(Square::E4).is_none());

            assert!(b.can_castle_kingside(Color::White));
            assert!(b.can_castle_queenside(Color::White));
            assert!(b.can_castle_kingside(Color::Black));
            assert!(b.can_castle_queenside(Color::Black));
        }

        #[test]
        fn rooks_get_their_wings() {
            let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
            assert_eq!(Some(Wing::Kingside), b.piece_at(Square::H1).unwrap().wing);
            assert_eq!(Some(Wing::Queenside), b.piece_at(Square::A1).unwrap().wing);
            assert_eq!(Some(Wing::Kingside), b.piece_at(Square::H8).unwrap().wing);

            // A rook away from home is a plain rook.
            let b = board("8/8/8/3r4/8/8/8/8 w - - 0 1");
            assert_eq!(None, b.piece_at(Square::D5).unwrap().wing);
        }

        #[test]
        fn empty() {
            let err = Board::from_fen("", variant::STANDARD.clone()).unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn unknown_piece() {
            let err =
                Board::from_fen("z7/8/8/8/8/8/8/8 w - - 0 0", variant::STANDARD.clone())
                    .unwrap_err();
            assert_eq!(FenParseError::UnknownPiece, err);
        }

        #[test]
        fn invalid_digit() {
            let err =
                Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 0", variant::STANDARD.clone())
                    .unwrap_err();
            assert_eq!(FenParseError::InvalidDigit, err);
        }

        #[test]
        fn not_sum_to_width() {
            let err = Board::from_fen(
                "pppp5/8/8/8/8/8/8/8 w - - 0 0",
                variant::STANDARD.clone(),
            )
            .unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToWidth, err);
        }

        #[test]
        fn bad_side_to_move() {
            let err =
                Board::from_fen("8/8/8/8/8/8/8/8 c - - 0 0", variant::STANDARD.clone())
                    .unwrap_err();
            assert_eq!(FenParseError::InvalidSideToMove, err);
        }

        #[test]
        fn bad_castle_status() {
            let err =
                Board::from_fen("8/8/8/8/8/8/8/8 w a - 0 0", variant::STANDARD.clone())
                    .unwrap_err();
            assert_eq!(FenParseError::InvalidCastle, err);
        }

        #[test]
        fn bad_en_passant() {
            let err =
                Board::from_fen("8/8/8/8/8/8/8/8 w - 88 0 0", variant::STANDARD.clone())
                    .unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn bad_halfmove() {
            let err =
                Board::from_fen("8/8/8/8/8/8/8/8 w - - q 0", variant::STANDARD.clone())
                    .unwrap_err();
            assert_eq!(FenParseError::InvalidHalfmove, err);
        }

        #[test]
        fn missing_fullmove() {
            let err = Board::from_fen("8/8/8/8/8/8/8/8 w - - 0", variant::STANDARD.clone())
                .unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn emit_four_fields() {
            let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
            assert_eq!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -", b.to_fen());
        }

        #[test]
        fn emit_dash_without_rights() {
            let b = board("8/8/8/8/8/8/8/8 w - - 0 0");
            assert_eq!("8/8/8/8/8/8/8/8 w - -", b.to_fen());
        }

        #[test]
        fn round_trip() {
            let fens = [
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
                "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ -",
                "8/P7/8/8/8/8/8/k6K w - -",
            ];
            for fen in &fens {
                let b = board(fen);
                assert_eq!(*fen, b.to_fen());
            }
        }
    }

    #[test]
    fn to_array_orientation() {
        let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let rows = b.to_array();
        // Top rank first: a black rook in the corner, a white one at the
        // other end.
        assert_eq!(PieceKind::Rook, rows[0][0].unwrap().kind);
        assert_eq!(Color::Black, rows[0][0].unwrap().color);
        assert_eq!(Color::White, rows[7][0].unwrap().color);
        assert!(rows[4][4].is_none());
    }

    #[test]
    fn piece_lookup() {
        let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(16, b.pieces_of(Color::White).len());
        assert_eq!(16, b.pieces_of(Color::Black).len());
        assert_eq!(32, b.pieces().len());
        assert_eq!(Some(Square::E1), b.king_square(Color::White));
        assert_eq!(Some(Square::E8), b.king_square(Color::Black));
        let queen = b.piece(Color::Black, PieceKind::Queen).unwrap();
        assert_eq!(Square::D8, queen.square);
    }

    #[test]
    fn start_fen_seeds_en_passant() {
        let b = board("8/8/8/3pP3/8/8/8/8 w - d6 0 1");
        assert_eq!(Some(Square::D6), b.en_passant());
    }
}
