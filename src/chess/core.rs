//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};

use anyhow::bail;
use itertools::Itertools;

use crate::chess::error::ChessError;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A square of the board addressed by `(row, col)`.
///
/// The coordinate system is fixed: row 0 is the eighth rank (Black's back
/// rank, drawn at the top), row 7 is the first rank. Column 0 is the a-file.
/// How the board is oriented on screen is not the engine's concern.
///
/// ```
/// use duel::chess::core::Square;
///
/// let square = Square::try_from("e4").unwrap();
/// assert_eq!((square.row(), square.col()), (4, 4));
/// assert_eq!(Square::new(0, 0).unwrap().to_string(), "a8");
/// assert!(Square::new(8, 0).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Connects row and column to form a full square.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::InvalidSquare`] if either coordinate is outside
    /// `0..BOARD_WIDTH`.
    pub fn new(row: u8, col: u8) -> Result<Self, ChessError> {
        if row < BOARD_WIDTH && col < BOARD_WIDTH {
            Ok(Self { row, col })
        } else {
            Err(ChessError::InvalidSquare { row, col })
        }
    }

    /// Unchecked constructor for coordinates that are known to be in range.
    pub(crate) const fn at(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_WIDTH && col < BOARD_WIDTH);
        Self { row, col }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the square `d_row` rows and `d_col` columns away or `None` if
    /// it falls off the board.
    #[must_use]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = u8::try_from(i16::from(self.row) + i16::from(d_row)).ok()?;
        let col = u8::try_from(i16::from(self.col) + i16::from(d_col)).ok()?;
        Self::new(row, col).ok()
    }

    /// Iterates over all squares, row by row starting from the eighth rank.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..BOARD_WIDTH)
            .cartesian_product(0..BOARD_WIDTH)
            .map(|(row, col)| Self { row, col })
    }

    /// File letter (`a` to `h`) of the square.
    #[must_use]
    pub const fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Rank digit (`1` to `8`) of the square.
    #[must_use]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Parses a square in algebraic form, e.g. `e4`.
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self::at(row, col))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.file_char())?;
        f.write_char(self.rank_char())
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Capitalized color name for human-readable messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }

    /// Row delta of a single pawn push. White pawns walk towards row 0.
    pub(crate) const fn pawn_push(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row holding the king and rooks in the initial position.
    pub(crate) const fn back_row(self) -> u8 {
        match self {
            Self::White => BOARD_WIDTH - 1,
            Self::Black => 0,
        }
    }

    /// Row the pawns start on and can advance two squares from.
    pub(crate) const fn pawn_row(self) -> u8 {
        match self {
            Self::White => BOARD_WIDTH - 2,
            Self::Black => 1,
        }
    }

    /// Row where the pawns of this player promote.
    pub(crate) const fn promotion_row(self) -> u8 {
        self.opponent().back_row()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Letter used in the two-character cell codes: `p` for pawns, uppercase
    /// letters for everything else.
    #[must_use]
    pub const fn code_letter(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'p',
        }
    }

    /// Letter used in algebraic notation. Pawns do not have one.
    #[must_use]
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            Self::Pawn => None,
            _ => Some(self.code_letter()),
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    /// Two-character code: color letter (`w`/`b`) followed by the kind letter,
    /// e.g. `wp` or `bQ`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match (self.owner, self.kind) {
            (Player::White, PieceKind::King) => "wK",
            (Player::White, PieceKind::Queen) => "wQ",
            (Player::White, PieceKind::Rook) => "wR",
            (Player::White, PieceKind::Bishop) => "wB",
            (Player::White, PieceKind::Knight) => "wN",
            (Player::White, PieceKind::Pawn) => "wp",
            (Player::Black, PieceKind::King) => "bK",
            (Player::Black, PieceKind::Queen) => "bQ",
            (Player::Black, PieceKind::Rook) => "bR",
            (Player::Black, PieceKind::Bishop) => "bB",
            (Player::Black, PieceKind::Knight) => "bN",
            (Player::Black, PieceKind::Pawn) => "bp",
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses a FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    /// Prints the FEN symbol of the piece.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Every promotion choice, strongest first.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    /// Accepts both the coordinate notation suffix (`q`) and the letter a
    /// player would pick from a menu (`Q`).
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured on its original square, player loses ability to
    /// castle its corresponding side. Rights are never regained during play.
    ///
    /// The full rules are:
    ///
    /// - The king and the castling rook must not have previously moved.
    /// - No square from the king's initial square to its final square may be
    ///   under attack by an enemy piece.
    /// - All the squares between the king and the castling rook must be
    ///   vacant.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
    }
}

impl CastleRights {
    /// King-side right of the given player.
    #[must_use]
    pub const fn short(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    /// Queen-side right of the given player.
    #[must_use]
    pub const fn long(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }

    /// Both rights of the given player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format:
    ///
    /// [`CastleRights`] := `-` | (K)? (Q)? (k)? (q)?
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if the input does not match the pattern above.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        // Symbols must follow this order, each appearing at most once.
        let order = [
            ('K', Self::WHITE_SHORT),
            ('Q', Self::WHITE_LONG),
            ('k', Self::BLACK_SHORT),
            ('q', Self::BLACK_LONG),
        ];
        let mut rights = Self::empty();
        let mut expected = order.iter();
        for symbol in input.chars() {
            match expected.find(|(candidate, _)| *candidate == symbol) {
                Some((_, right)) => rights |= *right,
                None => bail!("unknown castle rights: {input}"),
            }
        }
        if rights.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}
