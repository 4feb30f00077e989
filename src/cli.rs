/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::{Square, FEN_STARTPOS};

/// A chess rules engine: FEN codec, legal move generation and game state tracking.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub global_opts: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Debug, Clone, Copy, Args)]
pub struct GlobalOpts {
    /// Enable debug mode. Logs at least at `debug` level, with timestamps and source locations.
    #[arg(global = true, long, default_value_t = false)]
    pub debug: bool,

    /// Set the log level.
    #[arg(global = true, long, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,
}

impl GlobalOpts {
    /// The effective log level, raised to `debug` if debug mode is on.
    pub fn level(&self) -> LevelFilter {
        if self.debug {
            self.log_level.max(LevelFilter::Debug)
        } else {
            self.log_level
        }
    }
}

/// A command to run against a position.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "lower")]
pub enum Command {
    /// Performs a perft on a position at the supplied depth, printing the total node count.
    Perft {
        depth: usize,

        /// Position to start from.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,

        /// If set, the node count below each root move is printed as well.
        #[arg(short, long, default_value_t = false)]
        split: bool,
    },

    /// Shows all legal moves for the side to move, or for a specific piece.
    Moves {
        /// Position to generate moves in.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,

        /// Only show moves of the piece on this square.
        #[arg(short = 'q', long)]
        square: Option<Square>,

        /// If set, moves will be printed using their debug formatter, which displays their flag.
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Validates a FEN string, then prints its canonical form and a board diagram.
    Fen { fen: String },

    /// Starts a game, applies the given moves in UCI notation, and prints where it ended up.
    Play {
        /// Position to start from.
        #[arg(short, long, default_value = FEN_STARTPOS)]
        fen: String,

        /// Moves to apply, such as `e2e4 e7e5 g1f3`.
        moves: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_perft() {
        let cli = Cli::try_parse_from(["gambit", "perft", "3", "--split"]).unwrap();
        let Command::Perft { depth, fen, split } = cli.command else {
            panic!("expected a perft command");
        };
        assert_eq!(depth, 3);
        assert_eq!(fen, FEN_STARTPOS);
        assert!(split);
    }

    #[test]
    fn test_parse_global_opts() {
        let cli = Cli::try_parse_from(["gambit", "fen", FEN_STARTPOS, "--debug"]).unwrap();
        assert_eq!(cli.global_opts.level(), LevelFilter::Debug);

        let cli =
            Cli::try_parse_from(["gambit", "--log-level", "trace", "moves", "-q", "e2"]).unwrap();
        assert_eq!(cli.global_opts.level(), LevelFilter::Trace);
        assert!(matches!(
            cli.command,
            Command::Moves {
                square: Some(Square::E2),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_play() {
        let cli = Cli::try_parse_from(["gambit", "play", "e2e4", "e7e5"]).unwrap();
        let Command::Play { moves, .. } = cli.command else {
            panic!("expected a play command");
        };
        assert_eq!(moves, ["e2e4", "e7e5"]);
    }

    #[test]
    fn test_rejects_bad_square() {
        assert!(Cli::try_parse_from(["gambit", "moves", "--square", "z9"]).is_err());
    }
}
