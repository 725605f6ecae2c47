//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, en passant and the move
//! counters.
//!
//! [`Position`] is a plain value. Applying a move with
//! [`Position::make_move`] only performs board mechanics and assumes the move
//! was generated for this position; [`crate::chess::game::GameState`] is the
//! checked interface on top of it.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Square, BOARD_WIDTH};
use crate::chess::movegen;
use crate::chess::moves::{Move, MoveKind, Snapshot};

/// Home squares of the castling rooks and the right each one guards.
const ROOK_HOMES: [(Square, CastleRights); 4] = [
    (Square::at(BOARD_WIDTH - 1, BOARD_WIDTH - 1), CastleRights::WHITE_SHORT),
    (Square::at(BOARD_WIDTH - 1, 0), CastleRights::WHITE_LONG),
    (Square::at(0, BOARD_WIDTH - 1), CastleRights::BLACK_SHORT),
    (Square::at(0, 0), CastleRights::BLACK_LONG),
];

/// Rook relocation `(from, to)` that accompanies a castling king move.
pub(super) const fn castling_rook(next_move: &Move) -> Option<(Square, Square)> {
    let row = next_move.from.row();
    match next_move.kind {
        MoveKind::KingSideCastle => Some((
            Square::at(row, BOARD_WIDTH - 1),
            Square::at(row, BOARD_WIDTH - 3),
        )),
        MoveKind::QueenSideCastle => Some((Square::at(row, 0), Square::at(row, 3))),
        _ => None,
    }
}

/// Square of the pawn removed by an en passant capture: next to the capturing
/// pawn, on the destination file.
pub(super) const fn en_passant_victim(next_move: &Move) -> Square {
    Square::at(next_move.from.row(), next_move.to.col())
}

/// State of the chess game: board, side to move, castling rights, en passant
/// target and move counters. It has 1:1 relationship with [Forsyth-Edwards
/// Notation] (FEN).
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use duel::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::all(),
            ..Self::empty()
        }
    }

    // Creates an empty board to be filled by parser.
    const fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Square skipped by a pawn that advanced two squares on the previous ply.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter.get()
    }

    /// The parts of the position each generated move records so that it can
    /// be taken back.
    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot {
            castling: self.castling,
            en_passant: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
        }
    }

    /// Returns true if the player to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        attacks::is_in_check(&self.board, self.side_to_move)
    }

    /// Calculates the list of legal moves (i.e. the moves that do not leave
    /// our king in check). See [`movegen::legal_moves`].
    #[must_use]
    pub fn generate_moves(&self) -> Vec<Move> {
        movegen::legal_moves(self)
    }

    /// Applies a move generated for this position: relocates the pieces
    /// (including the castling rook and the pawn captured en passant),
    /// performs promotion, updates castling rights, en passant target and the
    /// move counters and passes the turn.
    ///
    /// Legality is not checked here.
    pub fn make_move(&mut self, next_move: &Move) {
        let Some(piece) = self.board.at(next_move.from) else {
            log::error!(
                "{next_move} does not belong to {self}: {} is empty",
                next_move.from
            );
            return;
        };
        let us = self.side_to_move;
        self.board.put(next_move.from, None);
        match next_move.kind {
            MoveKind::EnPassant => {
                self.board.put(en_passant_victim(next_move), None);
                self.board.put(next_move.to, Some(piece));
            },
            MoveKind::KingSideCastle | MoveKind::QueenSideCastle => {
                self.board.put(next_move.to, Some(piece));
                if let Some((rook_from, rook_to)) = castling_rook(next_move) {
                    let rook = self.board.at(rook_from);
                    self.board.put(rook_from, None);
                    self.board.put(rook_to, rook);
                }
            },
            MoveKind::Promotion(promotion) => {
                self.board
                    .put(next_move.to, Some(Piece::new(us, promotion.into())));
            },
            MoveKind::Normal | MoveKind::DoublePawnPush => {
                self.board.put(next_move.to, Some(piece));
            },
        }

        if piece.kind == PieceKind::King {
            self.castling.remove(CastleRights::both(us));
        }
        // Moving away from a rook home square or capturing on it means the
        // rook that guarded the right is gone.
        for (home, right) in ROOK_HOMES {
            if next_move.from == home || next_move.to == home {
                self.castling.remove(right);
            }
        }

        self.en_passant_square = match next_move.kind {
            MoveKind::DoublePawnPush => Some(Square::at(
                (next_move.from.row() + next_move.to.row()) / 2,
                next_move.from.col(),
            )),
            _ => None,
        };

        if piece.kind == PieceKind::Pawn || next_move.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = us.opponent();
    }

    /// Reverts [`Position::make_move`] for the last move played in this
    /// position. Castling rights, en passant target and the halfmove clock are
    /// restored from the snapshot carried by the move.
    pub fn unmake_move(&mut self, last_move: &Move) {
        let us = self.side_to_move.opponent();
        let Some(moved) = self.board.at(last_move.to) else {
            log::error!(
                "{last_move} was not the last move in {self}: {} is empty",
                last_move.to
            );
            return;
        };
        let piece = match last_move.kind {
            MoveKind::Promotion(_) => Piece::new(us, PieceKind::Pawn),
            _ => moved,
        };
        self.board.put(last_move.from, Some(piece));
        match last_move.kind {
            MoveKind::EnPassant => {
                self.board.put(last_move.to, None);
                self.board
                    .put(en_passant_victim(last_move), last_move.captured);
            },
            MoveKind::KingSideCastle | MoveKind::QueenSideCastle => {
                self.board.put(last_move.to, None);
                if let Some((rook_from, rook_to)) = castling_rook(last_move) {
                    let rook = self.board.at(rook_to);
                    self.board.put(rook_to, None);
                    self.board.put(rook_from, rook);
                }
            },
            MoveKind::Normal | MoveKind::DoublePawnPush | MoveKind::Promotion(_) => {
                self.board.put(last_move.to, last_move.captured);
            },
        }

        let prior = last_move.prior;
        self.castling = prior.castling;
        self.en_passant_square = prior.en_passant;
        self.halfmove_clock = prior.halfmove_clock;
        if us == Player::Black {
            if let Some(previous) = NonZeroU16::new(self.fullmove_counter.get() - 1) {
                self.fullmove_counter = previous;
            }
        }
        self.side_to_move = us;
    }

    /// Returns true if neither side has enough material to deliver mate:
    /// bare kings or a single minor piece against a bare king.
    #[must_use]
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors = 0;
        for (_, piece) in self.board.pieces() {
            match piece.kind {
                PieceKind::King => {},
                PieceKind::Bishop | PieceKind::Knight => minors += 1,
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }
        minors <= 1
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// The position is validated: both players need exactly one king, pawns
    /// can not stand on the back ranks, the en passant square has to be behind
    /// a pawn that has just been pushed and the player who just moved can not
    /// be in check.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] describing the first problem found.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.trim().split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let ranks: Vec<&str> = pieces_placement.split('/').collect();
        if ranks.len() != usize::from(BOARD_WIDTH) {
            bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
        }
        // The first rank in FEN is the eighth one, which is row 0.
        for (row, rank_fen) in (0..BOARD_WIDTH).zip(ranks) {
            let mut col: u8 = 0;
            for symbol in rank_fen.chars() {
                if col >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} is longer than {BOARD_WIDTH}");
                }
                if let Some(increment) = symbol.to_digit(10) {
                    if !(1..=8).contains(&increment) {
                        bail!("incorrect FEN: increment should be within 1..=8, got {increment}");
                    }
                    col += u8::try_from(increment)?;
                    continue;
                }
                let piece = Piece::try_from(symbol)?;
                result.board.put(Square::new(row, col)?, Some(piece));
                col += 1;
            }
            if col != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {col}");
            }
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        match (parts.next(), parts.next()) {
            (Some(halfmove_clock), Some(fullmove_counter)) => {
                if !halfmove_clock.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("halfmove clock can not contain anything other than digits");
                }
                result.halfmove_clock = halfmove_clock.parse().with_context(|| {
                    format!("incorrect FEN: halfmove clock can not be parsed {halfmove_clock}")
                })?;
                if !fullmove_counter.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("fullmove counter can not contain anything other than digits");
                }
                result.fullmove_counter = fullmove_counter.parse().with_context(|| {
                    format!("incorrect FEN: fullmove counter can not be parsed {fullmove_counter}")
                })?;
            },
            // This is a correct EPD.
            (None, None) => {},
            _ => bail!("incorrect FEN: missing fullmove counter"),
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let kings = self
                .board
                .player_pieces(player)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if kings != 1 {
                bail!("expected 1 {} king, got {kings}", player.name().to_lowercase());
            }
        }
        if self.board.pieces().any(|(square, piece)| {
            piece.kind == PieceKind::Pawn && (square.row() == 0 || square.row() == BOARD_WIDTH - 1)
        }) {
            bail!("pawns can not be placed on backranks");
        }
        if let Some(en_passant_square) = self.en_passant_square {
            let they = self.side_to_move.opponent();
            // The square is right behind their pushed pawn, seen from our side
            // of the board.
            let expected_row = they.pawn_row().wrapping_add_signed(they.pawn_push());
            if en_passant_square.row() != expected_row {
                bail!(
                    "expected en passant square to be on rank {}, got {}",
                    Square::at(expected_row, 0).rank_char(),
                    en_passant_square.rank_char()
                );
            }
            let pushed_pawn = en_passant_square.offset(they.pawn_push(), 0);
            if pushed_pawn.and_then(|square| self.board.at(square))
                != Some(Piece::new(they, PieceKind::Pawn))
            {
                bail!("en passant square is not beyond pushed pawn");
            }
        }
        if attacks::is_in_check(&self.board, self.side_to_move.opponent()) {
            bail!("the player who just moved can not be in check");
        }
        Ok(())
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input (surrounding whitespace, optional `fen ` or `epd `
    /// prefix) and parses it with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {self}")
    }
}

/// [Perft] (*per*formance *t*esting) counts the leaf nodes of the legal move
/// tree of the given depth. It exercises move generation, make and unmake
/// together and is the standard way of checking their correctness.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    let mut scratch = *position;
    perft_from(&mut scratch, depth)
}

fn perft_from(position: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for next_move in &moves {
        position.make_move(next_move);
        nodes += perft_from(position, depth - 1);
        position.unmake_move(next_move);
    }
    nodes
}
