// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A variant-parameterised chess board engine.
//!
//! The heart of the crate is [`Board`]: a rules-correct state machine that
//! holds a position, accepts half-moves in SAN (`play`) or long algebraic
//! notation (`play_lan`), validates them under the full classical ruleset and
//! serialises to and from FEN. The ruleset itself (board geometry, castling
//! squares, piece movement, promotion targets) is supplied by a [`Variant`]
//! handle shared between a board and everything cloned or replayed from it;
//! [`STANDARD`] is the classical 8x8 instance.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate num_derive;

mod board;
mod play;
mod rules;
mod san;
mod status;
mod types;
mod variant;

pub use board::{Board, CaptureRecord, FenParseError, HistoryEntry, Placed};
pub use rules::{ClassicPieces, PieceRules};
pub use san::{San, SanShape};
pub use status::{DrawKind, Outcome};
pub use types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square, Wing};
pub use variant::{CastleLane, CastlingRules, Geometry, Variant, STANDARD};
