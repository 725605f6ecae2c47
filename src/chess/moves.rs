//! Description of a single ply.
//!
//! A [`Move`] coming out of the move generator knows everything needed to
//! apply it and to take it back: the moving and captured pieces, which special
//! rule it follows and the parts of the position that can not be recovered
//! from the board after the move is played (see [`Snapshot`]).
//!
//! Two moves are equal when they share origin, destination and promotion
//! choice. This allows a bare candidate built from user input with
//! [`Move::new`] to be looked up in the set of generated legal moves.

use std::fmt;
use std::hash::{Hash, Hasher};

use anyhow::bail;

use crate::chess::core::{CastleRights, Piece, Promotion, Square};

/// Which rule a move follows. Captures are not a separate kind: any kind of
/// move except castling may capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move without special side effects.
    Normal,
    /// Pawn advancement by 2 squares from its original row. Opens an en
    /// passant window for exactly one ply.
    DoublePawnPush,
    /// Capture of a pawn "in passing": the captured pawn is not on the
    /// destination square.
    EnPassant,
    /// Short castle or O-O. Encoded as a king move, the rook follows.
    KingSideCastle,
    /// Long castle or O-O-O. Encoded as a king move, the rook follows.
    QueenSideCastle,
    /// Pawn reaching the last row and turning into the chosen piece.
    Promotion(Promotion),
}

/// Parts of the position overwritten by a move that can not be derived from
/// the board when the move is taken back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    #[allow(missing_docs)]
    pub castling: CastleRights,
    #[allow(missing_docs)]
    pub en_passant: Option<Square>,
    #[allow(missing_docs)]
    pub halfmove_clock: u8,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            castling: CastleRights::empty(),
            en_passant: None,
            halfmove_clock: 0,
        }
    }
}

/// Represents a chess move. See the module documentation for the equality
/// rules.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub(super) from: Square,
    pub(super) to: Square,
    pub(super) piece: Option<Piece>,
    pub(super) captured: Option<Piece>,
    pub(super) kind: MoveKind,
    pub(super) prior: Snapshot,
}

impl Move {
    /// Creates a candidate move from two squares and an optional promotion
    /// choice. Construction performs no legality check: the candidate has to
    /// be matched against the generated legal moves before it can be played.
    #[must_use]
    pub fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            piece: None,
            captured: None,
            kind: promotion.map_or(MoveKind::Normal, MoveKind::Promotion),
            prior: Snapshot::default(),
        }
    }

    /// Fully described move produced by the move generator.
    pub(super) const fn generated(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        kind: MoveKind,
        prior: Snapshot,
    ) -> Self {
        Self {
            from,
            to,
            piece: Some(piece),
            captured,
            kind,
            prior,
        }
    }

    /// Parses a candidate move in coordinate (UCI) notation, e.g. `e2e4` or
    /// `e7e8q`.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if the input is not two valid squares
    /// optionally followed by a promotion letter.
    pub fn from_uci(input: &str) -> anyhow::Result<Self> {
        if !input.is_ascii() || !(4..=5).contains(&input.len()) {
            bail!("move should be 4 or 5 ASCII chars in coordinate notation, got '{input}'");
        }
        let from = Square::try_from(&input[0..2])?;
        let to = Square::try_from(&input[2..4])?;
        let promotion = match input[4..].chars().next() {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        Ok(Self::new(from, to, promotion))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Moving piece. Only known for generated moves.
    #[must_use]
    pub const fn piece(&self) -> Option<Piece> {
        self.piece
    }

    /// Captured piece, including the pawn taken en passant.
    #[must_use]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        match self.kind {
            MoveKind::Promotion(promotion) => Some(promotion),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_castle(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::KingSideCastle | MoveKind::QueenSideCastle
        )
    }

    /// Castling rights, en passant target and halfmove clock as they were
    /// before the move.
    #[must_use]
    pub const fn prior(&self) -> Snapshot {
        self.prior
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.promotion() == other.promotion()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.promotion().hash(state);
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{PieceKind, Player};

    fn square(input: &str) -> Square {
        Square::try_from(input).unwrap()
    }

    #[test]
    fn uci_round_trip() {
        for input in ["e2e4", "g8f6", "e7e8q", "a2a1n", "e1g1"] {
            assert_eq!(Move::from_uci(input).unwrap().to_string(), input);
        }
        // Uppercase promotion letters are accepted as well.
        assert_eq!(Move::from_uci("b7b8R").unwrap().to_string(), "b7b8r");
    }

    #[test]
    fn malformed_uci() {
        for input in ["", "e2", "e2e", "e2e4qq", "i2e4", "e2e9", "e7e8k", "e2é4"] {
            assert!(Move::from_uci(input).is_err(), "input: {input}");
        }
    }

    #[test]
    fn equality_ignores_context() {
        let pawn = Piece::new(Player::White, PieceKind::Pawn);
        let generated = Move::generated(
            square("e2"),
            square("e4"),
            pawn,
            None,
            MoveKind::DoublePawnPush,
            Snapshot {
                castling: CastleRights::all(),
                en_passant: None,
                halfmove_clock: 3,
            },
        );
        let candidate = Move::new(square("e2"), square("e4"), None);
        assert_eq!(generated, candidate);
        assert_eq!(candidate.piece(), None);
        assert_eq!(generated.piece(), Some(pawn));

        let set: HashSet<Move> = [generated].into_iter().collect();
        assert!(set.contains(&candidate));
    }

    #[test]
    fn promotion_choice_matters() {
        let queen = Move::new(square("a7"), square("a8"), Some(Promotion::Queen));
        let knight = Move::new(square("a7"), square("a8"), Some(Promotion::Knight));
        let bare = Move::new(square("a7"), square("a8"), None);
        assert_ne!(queen, knight);
        assert_ne!(queen, bare);
        assert_eq!(queen.kind(), MoveKind::Promotion(Promotion::Queen));
        assert_eq!(bare.kind(), MoveKind::Normal);
    }
}
