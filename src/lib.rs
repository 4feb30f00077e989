/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, FEN, and move generation.
mod board;

/// Command-line interface definitions.
mod cli;

/// Error types shared by every part of the crate.
mod error;

/// The game state machine and its listeners.
mod game;

pub use board::*;
pub use cli::*;
pub use error::*;
pub use game::*;
