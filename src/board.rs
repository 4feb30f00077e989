/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// A set of squares, packed into a `u64`.
mod bitboard;

/// Per-piece move generators, attack detection, and the legality filter.
mod movegen;

/// Moves, their flags, and UCI move text.
mod moves;

/// Move generation validation.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// The board, castling rights, FEN, and raw move application.
mod position;

/// Squares and board directions.
mod square;

/// Misc constants.
mod utils;

pub use bitboard::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use utils::*;
