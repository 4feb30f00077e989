/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::{ChessError, Result};

/// Represents the color of a player or piece.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Creates a new [`Color`] from a `bool`, where `false = White`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Color;
    /// assert_eq!(Color::from_bool(false), Color::White);
    /// assert_eq!(Color::from_bool(true), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn from_bool(is_black: bool) -> Self {
        if is_black {
            Self::Black
        } else {
            Self::White
        }
    }

    /// Returns `true` if this [`Color`] is Black.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns this [`Color`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use gambit::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction a pawn of this color travels, in rank indices.
    ///
    /// Rank 0 is Black's back rank, so White pawns walk towards lower ranks.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    ///
    /// Will be `0` for White, `1` for Black.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Parses the side-to-move field of a FEN string.
    ///
    /// Only the exact characters `w` and `b` are accepted.
    ///
    /// # Example
    /// ```
    /// # use gambit::Color;
    /// assert_eq!(Color::from_fen_char('w').unwrap(), Color::White);
    /// assert!(Color::from_fen_char('W').is_err());
    /// ```
    #[inline(always)]
    pub fn from_fen_char(color: char) -> Result<Self> {
        match color {
            'w' => Ok(Self::White),
            'b' => Ok(Self::Black),
            _ => Err(ChessError::parse(format!(
                "side to move must be 'w' or 'b', got {color:?}"
            ))),
        }
    }

    /// Creates a [`Color`] from the ASCII case of a piece letter: uppercase is White.
    #[inline(always)]
    pub const fn from_case(c: char) -> Self {
        Self::from_bool(c.is_ascii_lowercase())
    }

    /// Converts this [`Color`] to its FEN character.
    #[inline(always)]
    pub const fn to_fen_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// The four kinds a pawn may promote to, in the order `Knight`, `Bishop`, `Rook`, `Queen`.
    #[inline(always)]
    pub const fn promotions() -> [Self; 4] {
        use PieceKind::*;
        [Knight, Bishop, Rook, Queen]
    }

    /// Returns this [`PieceKind`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Parses a piece letter, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use gambit::PieceKind;
    /// assert_eq!(PieceKind::from_char('q').unwrap(), PieceKind::Queen);
    /// assert_eq!(PieceKind::from_char('N').unwrap(), PieceKind::Knight);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => Err(ChessError::parse(format!("unknown piece character {kind:?}"))),
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// The lowercase letter of this [`PieceKind`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

/// A chess piece: a [`PieceKind`] owned by a [`Color`].
///
/// # Example
/// ```
/// # use gambit::{Piece, PieceKind, Color};
/// let piece = Piece::new(Color::Black, PieceKind::Knight);
/// assert_eq!(piece.char(), 'n');
/// assert_eq!(piece, Piece::BLACK_KNIGHT);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);

    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns `true` if this is a pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Returns `true` if this is a rook.
    #[inline(always)]
    pub const fn is_rook(&self) -> bool {
        matches!(self.kind, PieceKind::Rook)
    }

    /// Returns `true` if this is a king.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Parses a FEN piece letter: `PNBRQK` for White, `pnbrqk` for Black.
    ///
    /// # Example
    /// ```
    /// # use gambit::Piece;
    /// assert_eq!(Piece::from_char('K').unwrap(), Piece::WHITE_KING);
    /// assert!(Piece::from_char('9').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(piece: char) -> Result<Self> {
        let kind = PieceKind::from_char(piece)?;
        Ok(Self::new(Color::from_case(piece), kind))
    }

    /// The FEN letter for this piece.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self.color {
            Color::White => self.kind.char().to_ascii_uppercase(),
            Color::Black => self.kind.char(),
        }
    }

    /// The same color, a different kind. Used for promotions.
    #[inline(always)]
    pub const fn promoted(self, promotion: PieceKind) -> Self {
        Self::new(self.color, promotion)
    }

    /// Fetches a human-readable name for this [`Piece`], such as `"white knight"`.
    #[inline(always)]
    pub fn name(&self) -> String {
        format!("{} {}", self.color.name(), self.kind.name())
    }
}

impl<T> Index<PieceKind> for [T; PieceKind::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: PieceKind) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<PieceKind> for [T; PieceKind::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: PieceKind) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

macro_rules! impl_char_traits {
    ($type:ty, $parse:path) => {
        impl FromStr for $type {
            type Err = ChessError;
            #[inline(always)]
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => $parse(c),
                    _ => Err(ChessError::parse(format!(
                        "expected a single character, got {s:?}"
                    ))),
                }
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

impl_char_traits!(Piece, Piece::from_char);
impl_char_traits!(PieceKind, PieceKind::from_char);
impl_char_traits!(Color, Color::from_fen_char);

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_chars() {
        for kind in PieceKind::all() {
            for color in Color::all() {
                let piece = Piece::new(color, kind);
                assert_eq!(Piece::from_char(piece.char()).unwrap(), piece);
            }
        }

        assert_eq!(Piece::WHITE_QUEEN.to_string(), "Q");
        assert_eq!(Piece::BLACK_PAWN.to_string(), "p");
        assert!(Piece::from_char('x').is_err());
        assert!("Kk".parse::<Piece>().is_err());
    }

    #[test]
    fn test_color() {
        assert_eq!(-Color::White, Color::Black);
        assert_eq!(Color::from_case('Q'), Color::White);
        assert_eq!(Color::from_case('q'), Color::Black);
        assert_eq!("b".parse::<Color>().unwrap(), Color::Black);
        assert!("B".parse::<Color>().is_err());
    }

    #[test]
    fn test_promotion() {
        let promoted = Piece::BLACK_PAWN.promoted(PieceKind::Rook);
        assert_eq!(promoted, Piece::BLACK_ROOK);
        assert_eq!(promoted.name(), "black rook");
    }
}
