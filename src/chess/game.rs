//! Game state: the current [`Position`], the history of played moves and the
//! terminal status derived after every change.
//!
//! [`GameState`] is the interface used by front ends. It only accepts moves
//! that are legal in the current position and keeps the list of legal moves
//! cached between calls.

use std::fmt;

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Player, Square};
use crate::chess::error::ChessError;
use crate::chess::moves::Move;
use crate::chess::notation;
use crate::chess::position::Position;

/// Whether the game can continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The side to move has at least one legal move.
    InProgress,
    /// The side to move is in check and has no legal moves: it lost.
    Checkmate,
    /// The side to move is not in check and has no legal moves: draw.
    Stalemate,
}

/// A played move together with its notation in the position it was played
/// from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggedMove {
    played: Move,
    notation: String,
}

impl LoggedMove {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn played(&self) -> &Move {
        &self.played
    }

    /// Standard algebraic notation, e.g. `Nxe5+`.
    #[must_use]
    pub fn notation(&self) -> &str {
        &self.notation
    }
}

/// Position plus history. Invariants maintained between calls:
///
/// - the cached legal moves belong to the current position,
/// - the status is derived from them and the check state,
/// - the log holds every applied move in order, so that undoing them all
///   returns to the root position.
#[derive(Clone, Debug)]
pub struct GameState {
    root: Position,
    position: Position,
    moves: Vec<Move>,
    log: Vec<LoggedMove>,
    status: Status,
}

impl GameState {
    /// Creates a game in the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// Starts a game from an arbitrary valid position.
    #[must_use]
    pub fn from_position(root: Position) -> Self {
        let mut game = Self {
            root,
            position: root,
            moves: Vec::new(),
            log: Vec::new(),
            status: Status::InProgress,
        };
        game.refresh();
        game
    }

    /// Starts a game from the position described by FEN (or EPD).
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if the input is not a valid position.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        Ok(Self::from_position(Position::try_from(input)?))
    }

    // Regenerates the cached legal moves and derives the status from them.
    fn refresh(&mut self) {
        self.moves = self.position.generate_moves();
        self.status = match (self.moves.is_empty(), self.position.in_check()) {
            (false, _) => Status::InProgress,
            (true, true) => Status::Checkmate,
            (true, false) => Status::Stalemate,
        };
        if self.status != Status::InProgress {
            log::debug!("{}", self.outcome().unwrap_or_default());
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        self.position.board()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.position.side_to_move()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.position.castling()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.position.en_passant_square()
    }

    /// Legal moves in the current position. Empty once the game is over.
    #[must_use]
    pub fn valid_moves(&self) -> &[Move] {
        &self.moves
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.status == Status::Checkmate
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.status == Status::Stalemate
    }

    /// Returns true if the side to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.position.in_check()
    }

    /// Plays a move given as a candidate (origin, destination, promotion).
    /// The candidate is looked up among the legal moves and the generated
    /// version is played, so it does not need to know the moving piece or
    /// the special rule it follows.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::IllegalMove`] if the candidate is not legal in
    /// the current position, including any move after the game has ended. The
    /// game is not modified in that case.
    pub fn make_move(&mut self, candidate: &Move) -> Result<(), ChessError> {
        let Some(next_move) = self.moves.iter().find(|m| *m == candidate).copied() else {
            log::warn!("rejected {candidate}: not legal in {}", self.position);
            return Err(ChessError::IllegalMove(candidate.to_string()));
        };
        let notation = notation::format(&next_move, &self.position);
        self.position.make_move(&next_move);
        log::debug!("played {notation} ({next_move}), now {}", self.position);
        self.log.push(LoggedMove {
            played: next_move,
            notation,
        });
        self.refresh();
        Ok(())
    }

    /// Takes back the last played move and returns it. The game is in progress
    /// again afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::NoMoveToUndo`] if no moves were played since the
    /// root position.
    pub fn undo_move(&mut self) -> Result<Move, ChessError> {
        let Some(last) = self.log.pop() else {
            log::warn!("nothing to undo");
            return Err(ChessError::NoMoveToUndo);
        };
        self.position.unmake_move(&last.played);
        log::debug!("took back {}, now {}", last.notation, self.position);
        self.refresh();
        Ok(last.played)
    }

    /// Played moves in order.
    #[must_use]
    pub fn move_log(&self) -> &[LoggedMove] {
        &self.log
    }

    /// The log grouped by full moves, e.g. `1. e4 e5`. A game started with
    /// Black to move opens with `1... e5`.
    #[must_use]
    pub fn move_log_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut number = self.root.fullmove_counter();
        let mut notations = self.log.iter().map(LoggedMove::notation);
        if self.root.side_to_move() == Player::Black {
            if let Some(first) = notations.next() {
                lines.push(format!("{number}... {first}"));
                number += 1;
            }
        }
        let notations: Vec<_> = notations.collect();
        for pair in notations.chunks(2) {
            lines.push(format!("{number}. {}", pair.join(" ")));
            number += 1;
        }
        lines
    }

    /// Current position in FEN.
    #[must_use]
    pub fn fen(&self) -> String {
        self.position.to_string()
    }

    /// Returns true once 50 full moves were played without a capture or a pawn
    /// move. The rule has to be claimed, so the game is not over by itself.
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.position.halfmove_clock() >= 100
    }

    /// See [`Position::has_insufficient_material`].
    #[must_use]
    pub fn has_insufficient_material(&self) -> bool {
        self.position.has_insufficient_material()
    }

    /// Describes the end of the game, e.g. "White wins by checkmate". `None`
    /// while the game is in progress.
    #[must_use]
    pub fn outcome(&self) -> Option<String> {
        match self.status {
            Status::InProgress => None,
            Status::Checkmate => Some(format!(
                "{} wins by checkmate",
                self.side_to_move().opponent().name()
            )),
            Status::Stalemate => Some("Draw by stalemate".to_string()),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    /// Draws the board followed by the side to move and the game status.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.board())?;
        match self.outcome() {
            Some(outcome) => write!(f, "{outcome}"),
            None if self.in_check() => write!(f, "{} to move, in check", self.side_to_move().name()),
            None => write!(f, "{} to move", self.side_to_move().name()),
        }
    }
}
