//! Attack detection: whether a square is attacked by a player and whether a
//! player's king is in check. Used by the legality filter and by end-of-game
//! detection.
//!
//! Pawns only attack diagonally here, which differs from their non-capturing
//! moves.

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, Square};

/// Offsets of a knight jump.
pub(super) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Offsets of the squares adjacent to the king.
pub(super) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Directions a rook slides in.
pub(super) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Directions a bishop slides in.
pub(super) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

fn attacked_by_leaper(
    board: &Board,
    square: Square,
    by: Player,
    offsets: &[(i8, i8)],
    kind: PieceKind,
) -> bool {
    offsets.iter().any(|&(d_row, d_col)| {
        square
            .offset(d_row, d_col)
            .and_then(|source| board.at(source))
            .is_some_and(|piece| piece.owner == by && piece.kind == kind)
    })
}

// Walks each direction until the first occupied square and checks whether it
// holds one of the given slider kinds.
fn attacked_by_slider(
    board: &Board,
    square: Square,
    by: Player,
    directions: &[(i8, i8)],
    kinds: [PieceKind; 2],
) -> bool {
    directions.iter().any(|&(d_row, d_col)| {
        let mut current = square;
        while let Some(next) = current.offset(d_row, d_col) {
            if let Some(piece) = board.at(next) {
                return piece.owner == by && kinds.contains(&piece.kind);
            }
            current = next;
        }
        false
    })
}

/// Returns true if any piece of `by` attacks `square`.
#[must_use]
pub fn is_square_attacked(board: &Board, square: Square, by: Player) -> bool {
    // A pawn of `by` attacks diagonally forward, so it sits one row "behind"
    // the target from its own point of view.
    let pawn_row = -by.pawn_push();
    let pawn_attack = [(pawn_row, -1), (pawn_row, 1)];
    attacked_by_leaper(board, square, by, &pawn_attack, PieceKind::Pawn)
        || attacked_by_leaper(board, square, by, &KNIGHT_OFFSETS, PieceKind::Knight)
        || attacked_by_leaper(board, square, by, &KING_OFFSETS, PieceKind::King)
        || attacked_by_slider(
            board,
            square,
            by,
            &ROOK_DIRECTIONS,
            [PieceKind::Rook, PieceKind::Queen],
        )
        || attacked_by_slider(
            board,
            square,
            by,
            &BISHOP_DIRECTIONS,
            [PieceKind::Bishop, PieceKind::Queen],
        )
}

/// Returns true if the king of `player` is attacked by the opponent. A board
/// without that king is never in check.
#[must_use]
pub fn is_in_check(board: &Board, player: Player) -> bool {
    board
        .king_square(player)
        .is_some_and(|king| is_square_attacked(board, king, player.opponent()))
}
