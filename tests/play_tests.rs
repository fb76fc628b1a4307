// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tabula::{Board, Color, PieceKind, Square, STANDARD};

fn play_all(board: &mut Board, moves: &[&str]) {
    let mut color = board.side_to_move();
    for mv in moves {
        assert!(board.play(color, mv), "move {} was rejected", mv);
        color = color.toggle();
    }
}

#[test]
fn fools_mate() {
    let mut b = Board::standard();
    play_all(&mut b, &["f3", "e5", "g4", "Qh4"]);

    assert!(b.is_mate());
    assert!(b.is_check());
    assert_eq!("1. f3 e5 2. g4 Qh4#", b.movetext());

    // nobody castled or moved a king or rook, so all four rights survive.
    let fen = b.to_fen();
    assert_eq!("KQkq", fen.split_whitespace().nth(2).unwrap());
}

#[test]
fn scholars_mate() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7"]);

    assert!(b.is_mate());
    assert!(b.movetext().ends_with("Qxf7#"));

    // the queen took a pawn on f7.
    let record = b.captures(Color::White).last().unwrap();
    assert_eq!(PieceKind::Queen, record.capturing.piece.kind);
    assert_eq!(PieceKind::Pawn, record.captured.piece.kind);
    assert_eq!(Square::F7, record.captured.square);
}

#[test]
fn en_passant_through_lan() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "Nf6", "e5", "d5"]);

    // the double push left its target behind it.
    assert_eq!(Some(Square::D6), b.en_passant());

    assert!(b.play_lan(Color::White, "e5d6"));

    // the captured pawn is the black d5 pawn.
    let record = b.captures(Color::White).last().unwrap();
    assert_eq!(Square::D5, record.captured.square);
    assert_eq!(PieceKind::Pawn, record.captured.piece.kind);
    assert_eq!(Color::Black, record.captured.piece.color);
    assert!(b.piece_at(Square::D5).is_none());

    // and the en passant window is closed again.
    let fen = b.to_fen();
    assert_eq!("-", fen.split_whitespace().nth(3).unwrap());
}

#[test]
fn kingside_castle_line() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]);

    assert_eq!(Some(PieceKind::King), b.piece_at(Square::G1).map(|p| p.kind));
    assert_eq!(Some(PieceKind::Rook), b.piece_at(Square::F1).map(|p| p.kind));

    let fen = b.to_fen();
    assert_eq!("kq", fen.split_whitespace().nth(2).unwrap());
}

#[test]
fn promotion_to_knight() {
    let mut b = Board::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1", STANDARD.clone()).unwrap();
    assert!(b.play(Color::White, "a8=N"));

    let knight = b.piece_at(Square::A8).unwrap();
    assert_eq!(PieceKind::Knight, knight.kind);
    assert_eq!(Color::White, knight.color);
}

#[test]
fn turn_alternates_on_every_half_move() {
    let mut b = Board::standard();
    for mv in &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"] {
        let mover = b.side_to_move();
        assert!(b.play(mover, mv));
        assert_eq!(mover.toggle(), b.side_to_move());
    }
}

#[test]
fn trailing_history_fen_matches_the_board() {
    let mut b = Board::standard();
    play_all(&mut b, &["d4", "d5", "c4", "e6", "Nc3", "Nf6"]);
    assert_eq!(b.history().last().unwrap().fen, b.to_fen());
}

#[test]
fn castling_rights_only_ever_shrink() {
    let mut b = Board::standard();
    play_all(
        &mut b,
        &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O", "Nf6", "d3", "O-O"],
    );

    let mut rights = tabula::CastleStatus::all();
    for entry in b.history() {
        assert!(
            rights.contains(entry.castle_status),
            "rights grew back after {}",
            entry.san
        );
        rights = entry.castle_status;
    }
    assert_eq!(tabula::CastleStatus::NONE, rights);
}

#[test]
fn legal_targets_are_a_subset_of_pseudo_legal_ones() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);

    for placed in b.pieces_of(b.side_to_move()) {
        let pseudo = b.variant().pieces.move_squares(&b, placed.square);
        for target in b.legal(placed.square) {
            assert!(pseudo.contains(&target));
        }
    }
}

#[test]
fn undo_after_play_restores_the_fen() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "c5", "Nf3"]);
    let before = b.to_fen();

    assert!(b.play(Color::Black, "d6"));
    assert_eq!(before, b.undo().to_fen());
}

#[test]
fn undo_replays_castles_and_captures() {
    let mut b = Board::standard();
    play_all(
        &mut b,
        &["e4", "e5", "Nf3", "Nc6", "Bc4", "Nf6", "O-O", "Nxe4"],
    );
    let before = b.to_fen();

    assert!(b.play(Color::White, "Re1"));
    let undone = b.undo();
    assert_eq!(before, undone.to_fen());
    assert_eq!(8, undone.history().len());
    assert_eq!(1, undone.captures(Color::Black).len());
}

#[test]
fn clone_round_trips_the_fen() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "e5", "Nf3", "Nc6"]);
    assert_eq!(b.to_fen(), b.clone().to_fen());
}

#[test]
fn black_to_start_movetext_uses_an_ellipsis() {
    let mut b = Board::from_fen(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        STANDARD.clone(),
    )
    .unwrap();
    assert!(b.play(Color::Black, "e5"));
    assert!(b.play(Color::White, "Nf3"));
    assert_eq!("1... e5 2. Nf3", b.movetext());
}

#[test]
fn a_failed_move_is_atomic() {
    let mut b = Board::standard();
    play_all(&mut b, &["e4", "e5"]);
    let fen = b.to_fen();
    let history_len = b.history().len();

    // unreachable, wrong piece square, capture of nothing, occupied
    // destination.
    assert!(!b.play(Color::White, "Nd4"));
    assert!(!b.play(Color::White, "Qh5xe5"));
    assert!(!b.play(Color::White, "exd5"));
    assert!(!b.play(Color::White, "e5"));

    assert_eq!(fen, b.to_fen());
    assert_eq!(history_len, b.history().len());
    assert!(b.captures(Color::White).is_empty());
}
