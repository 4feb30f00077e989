/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::Square;

/// A set of [`Square`]s, stored as one bit per square.
///
/// Bit `n` corresponds to the square with index `n`, so bit 0 is `a8` and bit 63 is `h1`.
/// Every query that answers with "a set of squares" returns one of these.
///
/// # Example
/// ```
/// # use gambit::{Bitboard, Square};
/// let set = Bitboard::from_iter([Square::E4, Square::D5]);
/// assert!(set.contains(Square::E4));
/// assert!(!set.contains(Square::E5));
/// assert_eq!(set.population(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(u64::MAX);

    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// A set holding only `square`.
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.0)
    }

    /// The raw bits of this set.
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if `square` is in this set.
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1 << square.0) != 0
    }

    /// Adds `square` to this set.
    #[inline(always)]
    pub fn set(&mut self, square: Square) {
        self.0 |= 1 << square.0;
    }

    /// Removes `square` from this set.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.0 &= !(1 << square.0);
    }

    /// Number of squares in this set.
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Removes and returns the lowest-indexed square of this set.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }
        let square = Square(self.0.trailing_zeros() as u8);
        self.0 &= self.0 - 1;
        Some(square)
    }

    /// An iterator over the squares of this set, in index order.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, |bb, sq| bb | sq)
    }
}

impl Extend<Square> for Bitboard {
    fn extend<T: IntoIterator<Item = Square>>(&mut self, iter: T) {
        for square in iter {
            self.set(square);
        }
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(self.0.$func(Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                self.0.$func_assign(Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl fmt::Display for Bitboard {
    /// Draws the set as an 8x8 grid, with `X` on member squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in Square::iter() {
            if square.file() == 0 {
                write!(f, "{}| ", square.rank_char())?;
            }

            let occupant = if self.contains(square) { 'X' } else { '.' };
            write!(f, "{occupant} ")?;

            if square.file() == Square::SIZE - 1 {
                writeln!(f)?;
            }
        }
        write!(f, " +----------------\n   a b c d e f g h")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// An iterator over all set bits in a [`Bitboard`].
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: *self }
    }
}
