/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::{Move, Square};

/// Result type alias used throughout the rules engine.
pub type Result<T> = std::result::Result<T, ChessError>;

/// Everything that can go wrong when talking to the rules engine.
///
/// Every error is reported to the immediate caller, and the operation that produced it
/// has not modified any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// A FEN string or a move string could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// An argument violated a precondition, such as an out-of-bounds coordinate or an empty source square.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed in the game's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The move is not among the legal moves of the side to move.
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// A castling move was applied, but there was no rook on its home square.
    #[error("cannot castle: no rook on {0}")]
    MissingCastlingRook(Square),
}

impl ChessError {
    /// Shorthand for building a [`ChessError::Parse`].
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Shorthand for building a [`ChessError::InvalidArgument`].
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for building a [`ChessError::InvalidState`].
    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
