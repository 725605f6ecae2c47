//! Standard Algebraic Notation (SAN) for the move log.
//!
//! Castling is written as `O-O`/`O-O-O`, pawn captures carry the origin file
//! (`exd5`), promotions the chosen piece (`e8=Q`) and piece moves are
//! disambiguated by file, rank or both when another piece of the same kind
//! can reach the same square. Checks and mates get `+` and `#` suffixes.

use crate::chess::attacks;
use crate::chess::core::{Piece, PieceKind};
use crate::chess::moves::{Move, MoveKind};
use crate::chess::movegen;
use crate::chess::position::Position;

/// Formats `next_move`, which has to be legal in `before`, the position it is
/// played from.
#[must_use]
pub fn format(next_move: &Move, before: &Position) -> String {
    let Some(piece) = before.board().at(next_move.from()) else {
        return next_move.to_string();
    };
    let mut result = String::new();
    match next_move.kind() {
        MoveKind::KingSideCastle => result.push_str("O-O"),
        MoveKind::QueenSideCastle => result.push_str("O-O-O"),
        _ => match piece.kind.notation_letter() {
            None => {
                if next_move.is_capture() {
                    result.push(next_move.from().file_char());
                    result.push('x');
                }
                result.push_str(&next_move.to().to_string());
                if let Some(promotion) = next_move.promotion() {
                    result.push('=');
                    if let Some(letter) = PieceKind::from(promotion).notation_letter() {
                        result.push(letter);
                    }
                }
            },
            Some(letter) => {
                result.push(letter);
                result.push_str(&disambiguation(next_move, piece, before));
                if next_move.is_capture() {
                    result.push('x');
                }
                result.push_str(&next_move.to().to_string());
            },
        },
    }
    let mut after = *before;
    after.make_move(next_move);
    if attacks::is_in_check(after.board(), after.side_to_move()) {
        if movegen::legal_moves(&after).is_empty() {
            result.push('#');
        } else {
            result.push('+');
        }
    }
    result
}

// File if it tells the rivals apart, otherwise rank, otherwise both.
fn disambiguation(next_move: &Move, piece: Piece, before: &Position) -> String {
    let from = next_move.from();
    let rivals: Vec<_> = movegen::legal_moves(before)
        .into_iter()
        .filter(|other| {
            other.to() == next_move.to()
                && other.from() != from
                && before.board().at(other.from()) == Some(piece)
        })
        .map(|other| other.from())
        .collect();
    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|rival| rival.col() != from.col()) {
        from.file_char().to_string()
    } else if rivals.iter().all(|rival| rival.row() != from.row()) {
        from.rank_char().to_string()
    } else {
        from.to_string()
    }
}
