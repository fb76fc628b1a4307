// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Half-move notation. `parse` turns a SAN string like `Nbd2`, `exd6`,
//! `e8=Q` or `O-O` into a structured [`San`] descriptor; the board decides
//! what the descriptor means against the current position. `explode_lan`
//! splits a long-algebraic move like `e7e8q` into its squares.
use std::convert::TryFrom;
use std::fmt::Write;

use crate::types::{Color, File, PieceKind, Rank, Square, Wing};
use crate::variant::Variant;

/// What kind of half-move a SAN string describes, before the board has
/// looked at it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SanShape {
    Pawn,
    PawnCapture,
    PawnPromotion,
    Officer,
    OfficerCapture,
    King,
    KingCapture,
    CastleKingside,
    CastleQueenside,
}

/// A parsed SAN half-move.
///
/// `disambig` is the origin hint between the piece letter and the
/// destination. It is kept as the literal substring (empty, a file, a rank,
/// or a whole square): a piece is a candidate for the move when the text of
/// its current square contains this substring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct San {
    pub color: Color,
    pub kind: PieceKind,
    pub disambig: String,
    pub dest: Square,
    pub is_capture: bool,
    pub promotion: Option<PieceKind>,
    pub shape: SanShape,
    /// The normalised text, check and mate suffixes stripped.
    pub text: String,
}

fn promotion_kind(c: char) -> Option<PieceKind> {
    let kind = match c {
        'N' => PieceKind::Knight,
        'B' => PieceKind::Bishop,
        'R' => PieceKind::Rook,
        'Q' => PieceKind::Queen,
        _ => return None,
    };
    Some(kind)
}

/// Parses one SAN half-move for the given side. Returns `None` for anything
/// that is not syntactically a half-move; whether the move is playable is
/// the board's business.
pub fn parse(color: Color, input: &str, variant: &Variant) -> Option<San> {
    let stripped = input.trim().trim_end_matches(|c| c == '+' || c == '#');
    if stripped.is_empty() {
        return None;
    }

    // Castles first; both the letter-O and the digit-0 spellings are
    // accepted and normalised to the letter form.
    let wing = match stripped {
        "O-O" | "0-0" => Some(Wing::Kingside),
        "O-O-O" | "0-0-0" => Some(Wing::Queenside),
        _ => None,
    };
    if let Some(wing) = wing {
        let lane = variant.castling.lane(color, wing);
        let (shape, text) = match wing {
            Wing::Kingside => (SanShape::CastleKingside, "O-O"),
            Wing::Queenside => (SanShape::CastleQueenside, "O-O-O"),
        };
        return Some(San {
            color,
            kind: PieceKind::King,
            disambig: String::new(),
            dest: lane.king_to,
            is_capture: false,
            promotion: None,
            shape,
            text: text.to_owned(),
        });
    }

    let chars: Vec<char> = stripped.chars().collect();

    // A leading uppercase letter names the moving piece; everything else is
    // a pawn move.
    let kind = match chars[0] {
        'N' => PieceKind::Knight,
        'B' => PieceKind::Bishop,
        'R' => PieceKind::Rook,
        'Q' => PieceKind::Queen,
        'K' => PieceKind::King,
        _ => PieceKind::Pawn,
    };
    let mut body: &[char] = if kind == PieceKind::Pawn {
        &chars[..]
    } else {
        &chars[1..]
    };

    // Promotion suffix, `=Q` style.
    let mut promotion = None;
    if body.len() >= 2 && body[body.len() - 2] == '=' {
        promotion = Some(promotion_kind(body[body.len() - 1])?);
        body = &body[..body.len() - 2];
    }
    if promotion.is_some() && kind != PieceKind::Pawn {
        return None;
    }

    // The last two characters of what remains are the destination square.
    if body.len() < 2 {
        return None;
    }
    let file = File::try_from(body[body.len() - 2]).ok()?;
    let rank = Rank::try_from(body[body.len() - 1]).ok()?;
    let dest = Square::of(rank, file);
    let mut rest = &body[..body.len() - 2];

    let is_capture = rest.last() == Some(&'x');
    if is_capture {
        rest = &rest[..rest.len() - 1];
    }

    // Whatever is left is the origin hint: empty, a file, a rank, or a
    // whole square.
    let disambig: String = rest.iter().collect();
    let well_formed = match rest.len() {
        0 => true,
        1 => File::try_from(rest[0]).is_ok() || Rank::try_from(rest[0]).is_ok(),
        2 => File::try_from(rest[0]).is_ok() && Rank::try_from(rest[1]).is_ok(),
        _ => false,
    };
    if !well_formed {
        return None;
    }

    let shape = match kind {
        PieceKind::Pawn if promotion.is_some() => SanShape::PawnPromotion,
        PieceKind::Pawn if is_capture => SanShape::PawnCapture,
        PieceKind::Pawn => SanShape::Pawn,
        PieceKind::King if is_capture => SanShape::KingCapture,
        PieceKind::King => SanShape::King,
        _ if is_capture => SanShape::OfficerCapture,
        _ => SanShape::Officer,
    };

    let mut text = String::new();
    if kind != PieceKind::Pawn {
        text.push(kind.letter());
    }
    text.push_str(&disambig);
    if is_capture {
        text.push('x');
    }
    write!(&mut text, "{}", dest).unwrap();
    if let Some(promo) = promotion {
        text.push('=');
        text.push(promo.letter());
    }

    Some(San {
        color,
        kind,
        disambig,
        dest,
        is_capture,
        promotion,
        shape,
        text,
    })
}

/// Splits a long-algebraic move into origin, destination and an optional
/// promotion kind. `e2e4`, `e7e8q` and `e7e8Q` are all well formed.
pub fn explode_lan(lan: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    let chars: Vec<char> = lan.trim().chars().collect();
    if chars.len() < 4 || chars.len() > 5 {
        return None;
    }

    let from_file = File::try_from(chars[0]).ok()?;
    let from_rank = Rank::try_from(chars[1]).ok()?;
    let to_file = File::try_from(chars[2]).ok()?;
    let to_rank = Rank::try_from(chars[3]).ok()?;
    let promotion = if chars.len() == 5 {
        Some(promotion_kind(chars[4].to_ascii_uppercase())?)
    } else {
        None
    };

    Some((
        Square::of(from_rank, from_file),
        Square::of(to_rank, to_file),
        promotion,
    ))
}
