/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use gambit::{
    legal_moves, legal_moves_of, perft, splitperft, Cli, Command, Game, GameEvent, GlobalOpts,
    Move, Position,
};
use log::{debug, info};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

fn init_logging(opts: &GlobalOpts) -> Result<()> {
    let mut config_builder = ConfigBuilder::new();
    if opts.debug {
        config_builder.set_time_level(LevelFilter::Error);
        config_builder.set_target_level(LevelFilter::Error);
        config_builder.set_location_level(LevelFilter::Error);
    } else {
        config_builder.set_time_level(LevelFilter::Off);
        config_builder.set_target_level(LevelFilter::Off);
        config_builder.set_location_level(LevelFilter::Off);
    }
    config_builder.set_thread_level(LevelFilter::Off);

    TermLogger::init(
        opts.level(),
        config_builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialize the logger")
}

fn parse_fen(fen: &str) -> Result<Position> {
    Position::from_fen(fen).with_context(|| format!("invalid FEN {fen:?}"))
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Perft { depth, fen, split } => {
            let position = parse_fen(&fen)?;
            let start = Instant::now();

            let nodes = if split {
                let nodes = splitperft(&position, depth);
                println!();
                nodes
            } else {
                perft(&position, depth)
            };

            let elapsed = start.elapsed();
            println!("{nodes}");
            info!(
                "perft({depth}) = {nodes} in {elapsed:?} ({:.0} nodes/sec)",
                nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
            );
        }

        Command::Moves {
            fen,
            square,
            verbose,
        } => {
            let position = parse_fen(&fen)?;

            let mut moves = match square {
                Some(square) => legal_moves_of(&position, square)
                    .with_context(|| format!("no piece on {square} in {fen:?}"))?,
                None => legal_moves(&position, position.side_to_move()),
            };
            moves.sort_by_key(|mv| mv.to_uci());

            for mv in moves {
                if verbose {
                    println!("{mv:?}");
                } else {
                    println!("{mv}");
                }
            }
        }

        Command::Fen { fen } => {
            let position = parse_fen(&fen)?;
            println!("{position}");
            println!("{position:?}");
        }

        Command::Play { fen, moves } => {
            let mut game = Game::new(parse_fen(&fen)?);
            game.register_listener(Box::new(|event: GameEvent| match event {
                GameEvent::GameStarted => info!("game started"),
                GameEvent::MoveApplied(mv) => info!("applied {mv:?}"),
            }));
            game.start()?;

            for uci in &moves {
                let mv = Move::from_uci(game.position(), uci)
                    .with_context(|| format!("could not read move {uci:?} in {}", game.position()))?;
                game.apply_move(mv)
                    .with_context(|| format!("could not apply {uci:?} in {}", game.position()))?;
            }

            println!("{}", game.to_fen());
            if game.is_over()? {
                println!("{}", game.final_status()?);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.global_opts)?;
    debug!("parsed arguments: {cli:?}");

    run(cli.command)
}
