//! Square-centric ("mailbox") board: each of the 64 cells holds either a
//! [`Piece`] or nothing. The board has no knowledge of the rules.

use std::fmt::{self, Write};

use crate::chess::core::{Piece, PieceKind, Player, Square, BOARD_WIDTH};
use crate::chess::error::ChessError;

/// Code of an empty cell in the two-character encoding (see [`Piece::code`]).
pub const EMPTY_CODE: &str = "--";

const WIDTH: usize = BOARD_WIDTH as usize;

/// Piece placement on the 8x8 grid, indexed by [`Square`] coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; WIDTH]; WIDTH],
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [[None; WIDTH]; WIDTH],
        }
    }

    /// Creates the piece placement of the standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; WIDTH] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (col, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                board.put(
                    Square::at(player.back_row(), col),
                    Some(Piece::new(player, kind)),
                );
                board.put(
                    Square::at(player.pawn_row(), col),
                    Some(Piece::new(player, PieceKind::Pawn)),
                );
            }
        }
        board
    }

    /// Returns the contents of the cell.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize]
    }

    /// Replaces the contents of the cell.
    pub fn put(&mut self, square: Square, cell: Option<Piece>) {
        self.cells[square.row() as usize][square.col() as usize] = cell;
    }

    /// Coordinate-based accessor for callers holding raw indices.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::InvalidSquare`] if the coordinates are off the
    /// board.
    pub fn get(&self, row: u8, col: u8) -> Result<Option<Piece>, ChessError> {
        Ok(self.at(Square::new(row, col)?))
    }

    /// Coordinate-based mutator for callers holding raw indices.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::InvalidSquare`] if the coordinates are off the
    /// board. The board is not modified in that case.
    pub fn set(&mut self, row: u8, col: u8, cell: Option<Piece>) -> Result<(), ChessError> {
        self.put(Square::new(row, col)?, cell);
        Ok(())
    }

    /// Two-character code of the cell, [`EMPTY_CODE`] if it is empty.
    #[must_use]
    pub const fn code(&self, square: Square) -> &'static str {
        match self.at(square) {
            Some(piece) => piece.code(),
            None => EMPTY_CODE,
        }
    }

    /// Read-only view of the whole grid in two-character codes, row 0 first.
    /// This is what a renderer consumes.
    #[must_use]
    pub fn codes(&self) -> [[&'static str; WIDTH]; WIDTH] {
        self.cells.map(|row| {
            row.map(|cell| match cell {
                Some(piece) => piece.code(),
                None => EMPTY_CODE,
            })
        })
    }

    /// Iterates over the occupied cells.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Iterates over the pieces of the given player.
    pub fn player_pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.owner == player)
    }

    /// Location of the player's king. During normal play there is always
    /// exactly one.
    #[must_use]
    pub fn king_square(&self, player: Player) -> Option<Square> {
        self.player_pieces(player)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Board {
    /// Prints the piece placement part of the FEN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            let mut empty_squares = 0;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if row + 1 != WIDTH {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Draws the grid in two-character codes with rank and file labels.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, codes) in self.codes().iter().enumerate() {
            write!(f, "{} ", WIDTH - row)?;
            writeln!(f, "{}", codes.join(" "))?;
        }
        write!(f, " ")?;
        for col in 0..BOARD_WIDTH {
            write!(f, "  {}", Square::at(0, col).file_char())?;
        }
        Ok(())
    }
}
