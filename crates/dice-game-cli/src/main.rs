//! Dice Game console front end
//!
//! Plays the provably fair non-transitive dice game against the computer
//! over stdin/stdout. Logs go to stderr and are controlled by `RUST_LOG`.

mod prompt;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use dice_game_core::dice::DiceSet;
use dice_game_core::game::{Game, GameConfig, GameError, Input, OpponentStrategy, Phase};
use prompt::Command;
use rand::rngs::OsRng;
use std::io::{self, BufRead};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Provably fair non-transitive dice game
#[derive(Parser)]
#[command(name = "dice-game")]
#[command(about = "Provably fair non-transitive dice game", long_about = None)]
#[command(version)]
#[command(after_help = "Example: dice-game 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3")]
struct Cli {
    /// Dice as comma separated faces, at least three of them
    #[arg(value_name = "DIE")]
    dice: Vec<String>,

    /// Skip the fair draw for who picks first; you always pick first
    #[arg(long, env = "DICE_NO_MOVE_ORDER")]
    no_move_order: bool,

    /// How the computer picks its die (random or best)
    #[arg(long, env = "DICE_OPPONENT", default_value_t = OpponentStrategy::Best)]
    opponent: OpponentStrategy,

    /// Also print every revealed draw as a JSON line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let dice = match DiceSet::parse(&cli.dice) {
        Ok(dice) => dice,
        Err(e) => {
            render::usage_hint();
            return Err(e.into());
        }
    };

    let config = GameConfig {
        move_order_draw: !cli.no_move_order,
        opponent: cli.opponent,
    };
    let mut game = Game::new(dice, config, OsRng);
    info!(session = %game.session_id(), ?config, dice = game.dice().len(), "session started");

    render::welcome(&game);
    let stdin = io::stdin();
    play(&mut game, &mut stdin.lock(), cli.json)?;

    render::goodbye(game.score());
    Ok(())
}

/// Run rounds until the user exits or input ends
fn play(game: &mut Game<OsRng>, input: &mut impl BufRead, json: bool) -> Result<()> {
    loop {
        let events = game.start_round().context("failed to start round")?;
        render::events(game, &events, json)?;

        while game.phase() != Phase::RoundResolved {
            render::prompt(game);
            let command = prompt::read_command(input).context("failed to read input")?;
            let value = match command {
                Command::Exit => return Ok(()),
                Command::Table => {
                    render::table(game.matrix());
                    continue;
                }
                Command::Help => {
                    render::help();
                    continue;
                }
                Command::Number(value) => value,
                Command::Empty | Command::Unknown(_) => {
                    render::invalid("enter a number, 'table', 'help' or 'exit'");
                    continue;
                }
            };

            let step = match game.phase() {
                Phase::AwaitingMoveOrderGuess => Input::Guess(value),
                Phase::AwaitingDieChoice => Input::ChooseDie(value as usize),
                Phase::AwaitingOffset(_) => Input::Offset(value),
                Phase::Ready | Phase::RoundResolved => break,
            };
            match game.apply(step) {
                Ok(events) => render::events(game, &events, json)?,
                Err(GameError::InvalidUserSelection(e)) => render::invalid(&e.to_string()),
                Err(e) => return Err(e.into()),
            }
        }

        render::score(game.score());
        loop {
            render::between_rounds();
            match prompt::read_command(input).context("failed to read input")? {
                Command::Exit => return Ok(()),
                Command::Table => render::table(game.matrix()),
                Command::Help => render::help(),
                _ => break,
            }
        }
    }
}
