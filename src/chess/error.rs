//! Failures reported by the rules engine.
//!
//! Every failure is local to a single call: an operation that returns an error
//! has not modified the game it was called on.

/// Errors produced by [`crate::chess::board::Board`] accessors and
/// [`crate::chess::game::GameState`] operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// Square coordinates outside of the 8x8 board. Callers that build squares
    /// from validated input never see this.
    #[error("square (row {row}, col {col}) is outside of the board")]
    InvalidSquare {
        #[allow(missing_docs)]
        row: u8,
        #[allow(missing_docs)]
        col: u8,
    },
    /// The move is not in the current set of legal moves.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// Undo was requested before any move was played.
    #[error("no move to undo")]
    NoMoveToUndo,
}
