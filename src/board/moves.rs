/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{PieceKind, Position, Square, MAX_NUM_MOVES};
use crate::{ChessError, Result};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// Tags a [`Move`] with how it must be carried out on the board.
///
/// Flags are assigned by the move generators: every king step is a [`MoveFlag::KingMove`],
/// every rook slide is a [`MoveFlag::RookMove`], and everything without a special effect is
/// [`MoveFlag::None`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default)]
pub enum MoveFlag {
    /// A plain relocation, possibly capturing whatever stands on the destination.
    #[default]
    None,

    /// A pawn's two-square advance from its starting rank.
    DoublePawnPush,

    /// A pawn capturing a pawn that just double-pushed past it.
    EnPassant,

    /// The king moving two squares towards the h-file rook, which jumps over it.
    CastleKingside,

    /// The king moving two squares towards the a-file rook, which jumps over it.
    CastleQueenside,

    /// Any non-castling king step.
    KingMove,

    /// Any rook slide.
    RookMove,

    PromoteKnight,
    PromoteBishop,
    PromoteRook,
    PromoteQueen,
}

impl MoveFlag {
    /// The promotion flag for `kind`, if `kind` is something a pawn may become.
    ///
    /// # Example
    /// ```
    /// # use gambit::{MoveFlag, PieceKind};
    /// assert_eq!(MoveFlag::promotion(PieceKind::Queen), Some(MoveFlag::PromoteQueen));
    /// assert_eq!(MoveFlag::promotion(PieceKind::King), None);
    /// ```
    #[inline(always)]
    pub const fn promotion(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Knight => Some(Self::PromoteKnight),
            PieceKind::Bishop => Some(Self::PromoteBishop),
            PieceKind::Rook => Some(Self::PromoteRook),
            PieceKind::Queen => Some(Self::PromoteQueen),
            _ => None,
        }
    }

    /// The piece a pawn becomes under this flag, if it is a promotion.
    #[inline(always)]
    pub const fn promoted_kind(&self) -> Option<PieceKind> {
        match self {
            Self::PromoteKnight => Some(PieceKind::Knight),
            Self::PromoteBishop => Some(PieceKind::Bishop),
            Self::PromoteRook => Some(PieceKind::Rook),
            Self::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promoted_kind().is_some()
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self, Self::CastleKingside | Self::CastleQueenside)
    }
}

/// A move from one square to another, tagged with a [`MoveFlag`].
///
/// Castling is encoded as the king's move: `e1` to `g1` or `c1` for White.
/// Two moves are equal only if their source, destination and flag all match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    from: Square,
    to: Square,
    flag: MoveFlag,
}

impl Move {
    /// Creates a new [`Move`].
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, MoveFlag, Square};
    /// let mv = Move::new(Square::E2, Square::E4, MoveFlag::DoublePawnPush);
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Self { from, to, flag }
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline(always)]
    pub const fn flag(&self) -> MoveFlag {
        self.flag
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.flag.is_promotion()
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.flag.is_castle()
    }

    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    /// Renders this move in long algebraic (UCI) notation, such as `e7e8q`.
    pub fn to_uci(&self) -> String {
        match self.flag.promoted_kind() {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.char()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses a move in long algebraic (UCI) notation, resolving its [`MoveFlag`] against `position`.
    ///
    /// The piece on the source square decides the flag: pawns may double push, capture
    /// en passant or promote, kings may castle by moving two files, and rooks always slide.
    /// The resulting move is not checked for legality.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, MoveFlag, Position, Square};
    /// let pos = Position::default();
    /// let mv = Move::from_uci(&pos, "e2e4").unwrap();
    /// assert_eq!(mv, Move::new(Square::E2, Square::E4, MoveFlag::DoublePawnPush));
    /// assert!(Move::from_uci(&pos, "e3e4").is_err());
    /// ```
    pub fn from_uci(position: &Position, uci: &str) -> Result<Self> {
        let (from, to, promotion) = match (uci.get(0..2), uci.get(2..4), uci.get(4..)) {
            (Some(from), Some(to), Some(rest)) if rest.len() <= 1 => (from, to, rest),
            _ => {
                return Err(ChessError::parse(format!(
                    "move text must look like `e2e4` or `e7e8q`, got {uci:?}"
                )))
            }
        };

        let from = Square::from_algebraic(from)?;
        let to = Square::from_algebraic(to)?;
        let promotion = promotion.chars().next().map(PieceKind::from_char).transpose()?;

        let piece = position.piece_at(from).ok_or_else(|| {
            ChessError::invalid_argument(format!("no piece on {from} to move in {uci:?}"))
        })?;

        if promotion.is_some() && !piece.is_pawn() {
            return Err(ChessError::parse(format!(
                "only pawns can promote, but {from} holds a {}",
                piece.name()
            )));
        }

        let rank_delta = to.rank().abs_diff(from.rank());
        let file_delta = to.file().abs_diff(from.file());

        let flag = match piece.kind() {
            PieceKind::Pawn => {
                let last_rank = to.rank() == 0 || to.rank() == Square::SIZE - 1;
                match promotion {
                    Some(kind) if last_rank => MoveFlag::promotion(kind).ok_or_else(|| {
                        ChessError::parse(format!("cannot promote to a {}", kind.name()))
                    })?,
                    Some(_) => {
                        return Err(ChessError::parse(format!(
                            "{uci:?} promotes before the last rank"
                        )))
                    }
                    None if last_rank => {
                        return Err(ChessError::parse(format!(
                            "{uci:?} reaches the last rank without naming a promotion"
                        )))
                    }
                    None if rank_delta == 2 => MoveFlag::DoublePawnPush,
                    None if file_delta == 1
                        && position.en_passant_target() == Some(to)
                        && position.piece_at(to).is_none() =>
                    {
                        MoveFlag::EnPassant
                    }
                    None => MoveFlag::None,
                }
            }
            PieceKind::King if rank_delta == 0 && file_delta == 2 => {
                if to.file() > from.file() {
                    MoveFlag::CastleKingside
                } else {
                    MoveFlag::CastleQueenside
                }
            }
            PieceKind::King => MoveFlag::KingMove,
            PieceKind::Rook => MoveFlag::RookMove,
            _ => MoveFlag::None,
        };

        Ok(Self::new(from, to, flag))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.to_uci(), self.flag)
    }
}
