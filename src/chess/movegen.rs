//! Move generation: pseudo-legal candidates following the piece movement rules
//! and the legality filter on top of them.
//!
//! Pseudo-legal moves may leave the mover's own king attacked. The filter
//! plays each candidate on a scratch copy of the position and discards the
//! ones after which the king is in check, so it also covers pins, moving into
//! check and castling onto an attacked square.

use crate::chess::attacks::{
    self, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Promotion, Square};
use crate::chess::moves::{Move, MoveKind, Snapshot};
use crate::chess::position::Position;

/// Column of both kings at the start of the game.
const KING_COL: u8 = 4;

struct Generator<'a> {
    board: &'a Board,
    us: Player,
    castling: CastleRights,
    en_passant: Option<Square>,
    prior: Snapshot,
    moves: Vec<Move>,
}

impl Generator<'_> {
    fn add(&mut self, from: Square, to: Square, piece: Piece, captured: Option<Piece>, kind: MoveKind) {
        self.moves
            .push(Move::generated(from, to, piece, captured, kind, self.prior));
    }

    fn enemy_at(&self, square: Square) -> Option<Piece> {
        self.board.at(square).filter(|piece| piece.owner != self.us)
    }

    // Single step moves into empty or enemy-occupied squares.
    fn leaper_moves(&mut self, from: Square, piece: Piece, offsets: &[(i8, i8)]) {
        for &(d_row, d_col) in offsets {
            let Some(to) = from.offset(d_row, d_col) else {
                continue;
            };
            match self.board.at(to) {
                None => self.add(from, to, piece, None, MoveKind::Normal),
                Some(target) if target.owner != self.us => {
                    self.add(from, to, piece, Some(target), MoveKind::Normal);
                },
                Some(_) => {},
            }
        }
    }

    // Rays stop at the first occupied square, which is included if it holds
    // an enemy piece.
    fn slider_moves(&mut self, from: Square, piece: Piece, directions: &[(i8, i8)]) {
        for &(d_row, d_col) in directions {
            let mut current = from;
            while let Some(to) = current.offset(d_row, d_col) {
                match self.board.at(to) {
                    None => self.add(from, to, piece, None, MoveKind::Normal),
                    Some(target) => {
                        if target.owner != self.us {
                            self.add(from, to, piece, Some(target), MoveKind::Normal);
                        }
                        break;
                    },
                }
                current = to;
            }
        }
    }

    // Reaching the last row always yields all four promotion choices.
    fn add_pawn_move(&mut self, from: Square, to: Square, piece: Piece, captured: Option<Piece>) {
        if to.row() == self.us.promotion_row() {
            for promotion in Promotion::ALL {
                self.add(from, to, piece, captured, MoveKind::Promotion(promotion));
            }
        } else {
            self.add(from, to, piece, captured, MoveKind::Normal);
        }
    }

    fn pawn_moves(&mut self, from: Square, piece: Piece) {
        let push = self.us.pawn_push();
        if let Some(one) = from.offset(push, 0) {
            if self.board.at(one).is_none() {
                self.add_pawn_move(from, one, piece, None);
                if from.row() == self.us.pawn_row() {
                    if let Some(two) = one.offset(push, 0) {
                        if self.board.at(two).is_none() {
                            self.add(from, two, piece, None, MoveKind::DoublePawnPush);
                        }
                    }
                }
            }
        }
        for d_col in [-1, 1] {
            let Some(to) = from.offset(push, d_col) else {
                continue;
            };
            if let Some(target) = self.enemy_at(to) {
                self.add_pawn_move(from, to, piece, Some(target));
            } else if self.board.at(to).is_none() && self.en_passant == Some(to) {
                // The pawn that has just been pushed stands next to ours.
                let victim = self
                    .enemy_at(Square::at(from.row(), to.col()))
                    .filter(|victim| victim.kind == PieceKind::Pawn);
                if victim.is_some() {
                    self.add(from, to, piece, victim, MoveKind::EnPassant);
                }
            }
        }
    }

    // The king may not castle out of or through check. Landing on an attacked
    // square is rejected by the legality filter like any other king move.
    fn castle_moves(&mut self, from: Square, piece: Piece) {
        let row = self.us.back_row();
        if from != Square::at(row, KING_COL) {
            return;
        }
        let they = self.us.opponent();
        let rook = Some(Piece::new(self.us, PieceKind::Rook));
        let can_castle = |right: CastleRights, rook_col: u8, between: &[u8], transit: u8| {
            self.castling.contains(right)
                && self.board.at(Square::at(row, rook_col)) == rook
                && between
                    .iter()
                    .all(|&col| self.board.at(Square::at(row, col)).is_none())
                && !attacks::is_square_attacked(self.board, Square::at(row, transit), they)
        };
        if attacks::is_square_attacked(self.board, from, they) {
            return;
        }
        let short = can_castle(CastleRights::short(self.us), 7, &[5, 6], 5);
        let long = can_castle(CastleRights::long(self.us), 0, &[1, 2, 3], 3);
        if short {
            self.add(from, Square::at(row, 6), piece, None, MoveKind::KingSideCastle);
        }
        if long {
            self.add(from, Square::at(row, 2), piece, None, MoveKind::QueenSideCastle);
        }
    }
}

/// Generates all moves of the side to move that obey the piece movement rules
/// but may leave its own king in check.
#[must_use]
pub fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let mut generator = Generator {
        board: position.board(),
        us: position.side_to_move(),
        castling: position.castling(),
        en_passant: position.en_passant_square(),
        prior: position.snapshot(),
        moves: Vec::with_capacity(64),
    };
    for (from, piece) in position.board().player_pieces(generator.us) {
        match piece.kind {
            PieceKind::Pawn => generator.pawn_moves(from, piece),
            PieceKind::Knight => generator.leaper_moves(from, piece, &KNIGHT_OFFSETS),
            PieceKind::Bishop => generator.slider_moves(from, piece, &BISHOP_DIRECTIONS),
            PieceKind::Rook => generator.slider_moves(from, piece, &ROOK_DIRECTIONS),
            PieceKind::Queen => {
                generator.slider_moves(from, piece, &ROOK_DIRECTIONS);
                generator.slider_moves(from, piece, &BISHOP_DIRECTIONS);
            },
            PieceKind::King => {
                generator.leaper_moves(from, piece, &KING_OFFSETS);
                generator.castle_moves(from, piece);
            },
        }
    }
    generator.moves
}

/// Generates the legal moves of the side to move: the pseudo-legal ones after
/// which its king is not attacked.
#[must_use]
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move();
    let mut moves = pseudo_legal_moves(position);
    moves.retain(|candidate| {
        let mut scratch = *position;
        scratch.make_move(candidate);
        !attacks::is_in_check(scratch.board(), us)
    });
    log::trace!("{} legal moves in {position}", moves.len());
    moves
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn sorted_moves(moves: &[Move]) -> Vec<String> {
        moves.iter().map(Move::to_string).sorted().collect()
    }

    #[test]
    fn starting_moves() {
        let position = Position::starting();
        assert_eq!(
            sorted_moves(&legal_moves(&position)),
            [
                "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4",
                "e2e3", "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4",
            ]
        );
        assert_eq!(pseudo_legal_moves(&position).len(), 20);
    }

    #[test]
    fn pinned_piece_stays() {
        // The knight on e2 shields its king from the rook.
        let position = setup("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let pseudo_legal = pseudo_legal_moves(&position);
        let legal = legal_moves(&position);
        assert!(pseudo_legal.iter().any(|m| m.from().to_string() == "e2"));
        assert!(legal.iter().all(|m| m.from().to_string() != "e2"));
        assert_eq!(
            sorted_moves(&legal),
            ["e1d1", "e1d2", "e1f1", "e1f2"]
        );
    }

    #[test]
    fn double_push_is_blocked() {
        let position = setup("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        let moves = sorted_moves(&legal_moves(&position));
        assert!(!moves.contains(&"e2e3".to_string()));
        assert!(!moves.contains(&"e2e4".to_string()));

        let position = setup("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        let moves = sorted_moves(&legal_moves(&position));
        assert!(moves.contains(&"e2e3".to_string()));
        assert!(!moves.contains(&"e2e4".to_string()));
    }

    #[test]
    fn promotions() {
        let position = setup("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(|m| m.from().to_string() == "a7")
            .collect();
        assert_eq!(
            sorted_moves(&moves),
            ["a7a8b", "a7a8n", "a7a8q", "a7a8r", "a7b8b", "a7b8n", "a7b8q", "a7b8r"]
        );
        assert!(moves
            .iter()
            .filter(|m| m.to().to_string() == "b8")
            .all(Move::is_capture));
    }

    #[test]
    fn en_passant() {
        let position = setup("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let capture = legal_moves(&position)
            .into_iter()
            .find(|m| m.kind() == MoveKind::EnPassant)
            .unwrap();
        assert_eq!(capture.to_string(), "e5d6");
        assert_eq!(
            capture.captured(),
            Some(Piece::new(Player::Black, PieceKind::Pawn))
        );

        // Without the target square there is no capture.
        let position = setup("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2");
        assert!(legal_moves(&position)
            .iter()
            .all(|m| m.kind() != MoveKind::EnPassant));
    }

    #[test]
    fn en_passant_exposing_king() {
        // Both pawns leave the fifth rank and the rook reaches the king.
        let position = setup("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 2");
        assert!(pseudo_legal_moves(&position)
            .iter()
            .any(|m| m.kind() == MoveKind::EnPassant));
        assert!(legal_moves(&position)
            .iter()
            .all(|m| m.kind() != MoveKind::EnPassant));
    }

    #[test]
    fn castling() {
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(Move::is_castle)
            .collect();
        assert_eq!(sorted_moves(&castles), ["e1c1", "e1g1"]);

        // Rights are gone.
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1");
        assert!(legal_moves(&position).iter().all(|m| !m.is_castle()));

        // Pieces in between.
        let position = setup("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
        assert!(legal_moves(&position).iter().all(|m| !m.is_castle()));

        // Queen side only needs b1 to be empty, not safe.
        let position = setup("r3k2r/8/8/8/8/8/1r6/R3K2R w KQ - 0 1");
        let castles: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(Move::is_castle)
            .collect();
        assert_eq!(sorted_moves(&castles), ["e1c1", "e1g1"]);
    }

    #[test]
    fn no_castling_through_check() {
        // f1 is attacked.
        let position = setup("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let castles: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(Move::is_castle)
            .collect();
        assert_eq!(sorted_moves(&castles), ["e1c1"]);

        // g1 is attacked: generated, then filtered.
        let position = setup("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(pseudo_legal_moves(&position)
            .iter()
            .any(|m| m.kind() == MoveKind::KingSideCastle));
        assert!(legal_moves(&position)
            .iter()
            .all(|m| m.kind() != MoveKind::KingSideCastle));

        // Out of check.
        let position = setup("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(pseudo_legal_moves(&position).iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn castling_requires_rook() {
        // The right is still recorded but the rook has been captured.
        let position = setup("4k3/8/8/8/8/8/8/R3K3 w KQ - 0 1");
        let castles: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(Move::is_castle)
            .collect();
        assert_eq!(sorted_moves(&castles), ["e1c1"]);
    }

    #[test]
    fn checkmate_has_no_moves() {
        let position = setup("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(position.in_check());
        assert!(legal_moves(&position).is_empty());
    }
}
