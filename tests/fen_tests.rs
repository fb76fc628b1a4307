// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tabula::{Board, Color, FenParseError, PieceKind, Square, STANDARD};

#[test]
fn emitted_fen_reconstructs_the_same_position() {
    let mut b = Board::standard();
    let mover = [
        (Color::White, "e4"),
        (Color::Black, "c5"),
        (Color::White, "Nf3"),
        (Color::Black, "d6"),
        (Color::White, "d4"),
        (Color::Black, "cxd4"),
        (Color::White, "Nxd4"),
    ];
    for (color, mv) in mover.iter() {
        assert!(b.play(*color, mv));
    }

    let rebuilt = Board::from_fen(b.to_fen(), STANDARD.clone()).unwrap();
    assert_eq!(b.to_fen(), rebuilt.to_fen());
    assert_eq!(b.side_to_move(), rebuilt.side_to_move());
    assert_eq!(b.castle_status(), rebuilt.castle_status());
    assert_eq!(b.en_passant(), rebuilt.en_passant());
    for placed in b.pieces() {
        let other = rebuilt.piece_at(placed.square).unwrap();
        assert_eq!(placed.piece.kind, other.kind);
        assert_eq!(placed.piece.color, other.color);
    }
}

#[test]
fn en_passant_field_round_trips() {
    let mut b = Board::standard();
    assert!(b.play(Color::White, "e4"));

    let fen = b.to_fen();
    assert_eq!("e3", fen.split_whitespace().nth(3).unwrap());

    // the rebuilt board still honors the capture window.
    let mut rebuilt = Board::from_fen(
        "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        STANDARD.clone(),
    )
    .unwrap();
    assert_eq!(Some(Square::E3), rebuilt.en_passant());
    assert!(rebuilt.play(Color::Black, "dxe3"));
    assert!(rebuilt.piece_at(Square::E4).is_none());
}

#[test]
fn parse_errors_name_their_cause() {
    let cases: Vec<(&str, FenParseError)> = vec![
        ("", FenParseError::UnexpectedEnd),
        ("z7/8/8/8/8/8/8/8 w - -", FenParseError::UnknownPiece),
        ("9/8/8/8/8/8/8/8 w - -", FenParseError::InvalidDigit),
        ("ppppp4/8/8/8/8/8/8/8 w - -", FenParseError::FileDoesNotSumToWidth),
        ("8/8/8/8/8/8/8/8 c - -", FenParseError::InvalidSideToMove),
        ("8/8/8/8/8/8/8/8 w x -", FenParseError::InvalidCastle),
        ("8/8/8/8/8/8/8/8 w - e9", FenParseError::InvalidEnPassant),
        ("8/8/8/8/8/8/8/8 w - - x 1", FenParseError::InvalidHalfmove),
        ("8/8/8/8/8/8/8/8 w - - 0 x", FenParseError::InvalidFullmove),
    ];

    for (fen, expected) in cases {
        let err = Board::from_fen(fen, STANDARD.clone()).unwrap_err();
        assert_eq!(expected, err, "for {:?}", fen);
        // every error renders a human-readable cause.
        assert!(!err.to_string().is_empty());
    }
}

#[test]
fn kingless_analysis_boards_are_usable() {
    let b = Board::from_fen("8/8/8/3q4/8/8/3R4/8 w - -", STANDARD.clone()).unwrap();
    assert!(!b.is_check());
    assert!(!b.is_mate());
    assert!(b.king_square(Color::White).is_none());
    assert!(!b.legal(Square::D2).is_empty());
}

#[test]
fn display_draws_the_diagram() {
    let b = Board::standard();
    let diagram = b.to_string();
    assert!(diagram.contains("r  n  b  q  k  b  n  r"));
    assert!(diagram.contains(" a  b  c  d  e  f  g  h"));
}

#[test]
fn to_array_matches_piece_lookup() {
    let b = Board::standard();
    let rows = b.to_array();
    assert_eq!(8, rows.len());
    assert_eq!(PieceKind::King, rows[0][4].unwrap().kind);
    assert_eq!(Color::Black, rows[0][4].unwrap().color);
    assert_eq!(PieceKind::King, rows[7][4].unwrap().kind);
    assert_eq!(Color::White, rows[7][4].unwrap().color);
}
