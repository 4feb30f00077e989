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

/// Represents a single square on an `8x8` chess board.
///
/// Squares are addressed by `(rank, file)`, where rank `0` is the top row of the
/// diagram (Black's back rank, `8`) and file `0` is the a-file.
/// Internally, `square = rank * 8 + file`:
/// ```text
/// 8|  0  1  2  3  4  5  6  7
/// 7|  8  9 10 11 12 13 14 15
/// 6| 16 17 18 19 20 21 22 23
/// 5| 24 25 26 27 28 29 30 31
/// 4| 32 33 34 35 36 37 38 39
/// 3| 40 41 42 43 44 45 46 47
/// 2| 48 49 50 51 52 53 54 55
/// 1| 56 57 58 59 60 61 62 63
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

macro_rules! square_consts {
    ($($name:ident = ($rank:expr, $file:expr)),* $(,)?) => {
        impl Square {
            $(pub const $name: Self = Self::from_coords_unchecked($rank, $file);)*
        }
    };
}

#[rustfmt::skip]
square_consts!(
    A8 = (0, 0), B8 = (0, 1), C8 = (0, 2), D8 = (0, 3), E8 = (0, 4), F8 = (0, 5), G8 = (0, 6), H8 = (0, 7),
    A7 = (1, 0), B7 = (1, 1), C7 = (1, 2), D7 = (1, 3), E7 = (1, 4), F7 = (1, 5), G7 = (1, 6), H7 = (1, 7),
    A6 = (2, 0), B6 = (2, 1), C6 = (2, 2), D6 = (2, 3), E6 = (2, 4), F6 = (2, 5), G6 = (2, 6), H6 = (2, 7),
    A5 = (3, 0), B5 = (3, 1), C5 = (3, 2), D5 = (3, 3), E5 = (3, 4), F5 = (3, 5), G5 = (3, 6), H5 = (3, 7),
    A4 = (4, 0), B4 = (4, 1), C4 = (4, 2), D4 = (4, 3), E4 = (4, 4), F4 = (4, 5), G4 = (4, 6), H4 = (4, 7),
    A3 = (5, 0), B3 = (5, 1), C3 = (5, 2), D3 = (5, 3), E3 = (5, 4), F3 = (5, 5), G3 = (5, 6), H3 = (5, 7),
    A2 = (6, 0), B2 = (6, 1), C2 = (6, 2), D2 = (6, 3), E2 = (6, 4), F2 = (6, 5), G2 = (6, 6), H2 = (6, 7),
    A1 = (7, 0), B1 = (7, 1), C1 = (7, 2), D1 = (7, 3), E1 = (7, 4), F1 = (7, 5), G1 = (7, 6), H1 = (7, 7),
);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Side length of the board.
    pub const SIZE: u8 = 8;

    /// Creates a new [`Square`] from a rank and file, rejecting anything outside `0..8`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::new(0, 0).unwrap(), Square::A8);
    /// assert_eq!(Square::new(7, 4).unwrap(), Square::E1);
    /// assert!(Square::new(8, 0).is_err());
    /// assert!(Square::new(0, -1).is_err());
    /// ```
    pub fn new(rank: i32, file: i32) -> Result<Self> {
        let size = Self::SIZE as i32;
        if !(0..size).contains(&rank) || !(0..size).contains(&file) {
            return Err(ChessError::invalid_argument(format!(
                "coordinates (rank {rank}, file {file}) are off the board"
            )));
        }

        Ok(Self::from_coords_unchecked(rank as u8, file as u8))
    }

    /// Creates a new [`Square`] without checking bounds.
    #[inline(always)]
    pub(crate) const fn from_coords_unchecked(rank: u8, file: u8) -> Self {
        Self(rank * Self::SIZE + file)
    }

    /// Creates a [`Square`] from an index in `0..64`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_index(63).unwrap(), Square::H1);
    /// assert!(Square::from_index(64).is_err());
    /// ```
    pub fn from_index(index: usize) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(ChessError::invalid_argument(format!(
                "square index {index} is off the board"
            )))
        }
    }

    /// An iterator over all 64 squares, from `a8` to `h1`.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Fetches the rank of this square, where `0` is Black's back rank.
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        self.0 / Self::SIZE
    }

    /// Fetches the file of this square, where `0` is the a-file.
    #[inline(always)]
    pub const fn file(&self) -> u8 {
        self.0 % Self::SIZE
    }

    /// Returns this square as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Shifts this square by `(ranks, files)`, returning `None` if the result leaves the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::E2.offset(-2, 0), Some(Square::E4));
    /// assert_eq!(Square::H1.offset(0, 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, ranks: i8, files: i8) -> Option<Self> {
        let rank = self.rank() as i8 + ranks;
        let file = self.file() as i8 + files;
        if rank < 0 || rank >= Self::SIZE as i8 || file < 0 || file >= Self::SIZE as i8 {
            None
        } else {
            Some(Self::from_coords_unchecked(rank as u8, file as u8))
        }
    }

    /// Shifts this square one step in `dir`.
    #[inline(always)]
    pub const fn step(&self, dir: Direction) -> Option<Self> {
        self.offset(dir.ranks, dir.files)
    }

    /// Renders this square in algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::A8.to_algebraic(), "a8");
    /// assert_eq!(Square::new(7, 7).unwrap().to_algebraic(), "h1");
    /// ```
    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Parses a square from algebraic notation, such as `e4`.
    ///
    /// Only lowercase files `a`-`h` and ranks `1`-`8` are accepted.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_algebraic("c6").unwrap(), Square::C6);
    /// assert!(Square::from_algebraic("i1").is_err());
    /// assert!(Square::from_algebraic("a9").is_err());
    /// ```
    pub fn from_algebraic(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let (file, rank) = match bytes {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => (file - b'a', rank - b'1'),
            _ => {
                return Err(ChessError::parse(format!(
                    "invalid algebraic square {s:?}"
                )))
            }
        };

        Ok(Self::from_coords_unchecked(Self::SIZE - 1 - rank, file))
    }

    /// The letter of this square's file.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.file()) as char
    }

    /// The digit of this square's rank, as printed on a board.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.rank()) as char
    }
}

/// A `(ranks, files)` step on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Direction {
    pub ranks: i8,
    pub files: i8,
}

impl Direction {
    pub const NORTH: Self = Self::new(-1, 0);
    pub const SOUTH: Self = Self::new(1, 0);
    pub const EAST: Self = Self::new(0, 1);
    pub const WEST: Self = Self::new(0, -1);
    pub const NORTH_EAST: Self = Self::new(-1, 1);
    pub const NORTH_WEST: Self = Self::new(-1, -1);
    pub const SOUTH_EAST: Self = Self::new(1, 1);
    pub const SOUTH_WEST: Self = Self::new(1, -1);

    /// Rook directions.
    pub const ORTHOGONALS: [Self; 4] = [Self::NORTH, Self::SOUTH, Self::EAST, Self::WEST];

    /// Bishop directions.
    pub const DIAGONALS: [Self; 4] = [
        Self::NORTH_EAST,
        Self::NORTH_WEST,
        Self::SOUTH_EAST,
        Self::SOUTH_WEST,
    ];

    /// Queen and king directions.
    pub const ALL: [Self; 8] = [
        Self::NORTH,
        Self::SOUTH,
        Self::EAST,
        Self::WEST,
        Self::NORTH_EAST,
        Self::NORTH_WEST,
        Self::SOUTH_EAST,
        Self::SOUTH_WEST,
    ];

    /// The eight knight jumps.
    pub const KNIGHT_JUMPS: [Self; 8] = [
        Self::new(-2, -1),
        Self::new(-2, 1),
        Self::new(-1, -2),
        Self::new(-1, 2),
        Self::new(1, -2),
        Self::new(1, 2),
        Self::new(2, -1),
        Self::new(2, 1),
    ];

    #[inline(always)]
    pub const fn new(ranks: i8, files: i8) -> Self {
        Self { ranks, files }
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl FromStr for Square {
    type Err = ChessError;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_algebraic(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}, {})", self.rank(), self.file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(7, 7).is_ok());
        assert!(Square::new(8, 7).is_err());
        assert!(Square::new(7, 8).is_err());
        assert!(Square::new(-1, 0).is_err());
        assert!(matches!(
            Square::new(0, 8),
            Err(ChessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_square_algebraic() {
        for square in Square::iter() {
            let text = square.to_algebraic();
            assert_eq!(Square::from_algebraic(&text).unwrap(), square);
            assert_eq!(square.to_string(), text);
        }

        assert_eq!(Square::new(0, 0).unwrap().to_algebraic(), "a8");
        assert_eq!(Square::new(7, 7).unwrap().to_algebraic(), "h1");
        assert_eq!(Square::new(4, 4).unwrap(), Square::E4);

        assert!(Square::from_algebraic("").is_err());
        assert!(Square::from_algebraic("e").is_err());
        assert!(Square::from_algebraic("E4").is_err());
        assert!(Square::from_algebraic("e44").is_err());
        assert!(Square::from_algebraic("e0").is_err());
    }

    #[test]
    fn test_square_offset() {
        assert_eq!(Square::E2.step(Direction::NORTH), Some(Square::E3));
        assert_eq!(Square::E7.step(Direction::SOUTH), Some(Square::E6));
        assert_eq!(Square::A1.step(Direction::WEST), None);
        assert_eq!(Square::A8.step(Direction::NORTH), None);
        assert_eq!(Square::G1.offset(-2, 1), Some(Square::H3));
        assert_eq!(Square::G1.offset(-1, 2), None);
    }
}
