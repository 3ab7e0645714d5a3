//! Console rendering of game events and the probability table.

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use console::style;
use dice_game_core::dice::ProbabilityMatrix;
use dice_game_core::game::{Game, Phase, RoundEvent, Score};
use dice_game_core::protocol::{DrawPurpose, Party, RoundResult};
use std::io::{self, Write};

const EXAMPLE: &str = "dice-game 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

pub fn usage_hint() {
    eprintln!("Each die needs exactly six integer faces, and at least three dice are required.");
    eprintln!("Example: {}", EXAMPLE);
}

pub fn welcome<R>(game: &Game<R>) {
    println!("{}", style("Welcome to the fair dice game!").bold());
    println!("Every random number is committed with an HMAC before you add yours,");
    println!("and the key is revealed afterwards so you can check it.");
    println!(
        "Type 'table' for win probabilities, 'help' for commands, 'exit' to quit. Session {}",
        style(game.session_id()).dim()
    );
}

pub fn help() {
    println!("Commands available at any prompt:");
    println!("  <number>  answer the prompt");
    println!("  table, ?  show the probability table");
    println!("  help      show this help");
    println!("  exit      quit the game");
}

pub fn prompt<R>(game: &Game<R>) {
    match game.phase() {
        Phase::AwaitingMoveOrderGuess => {
            println!("Try to guess my number (0 or 1) to move first:");
        }
        Phase::AwaitingDieChoice => {
            println!("Choose your die:");
            for (i, die) in game.dice().iter().enumerate() {
                if game.computer_die() == Some(i) {
                    println!("  {}", style(format!("[{}] {} (taken)", i, die)).dim());
                } else {
                    println!("  [{}] {}", i, die);
                }
            }
        }
        Phase::AwaitingOffset(party) => {
            println!("Add your number modulo 6 for {} (0-5):", roll_owner(party));
        }
        Phase::Ready | Phase::RoundResolved => return,
    }
    print!("{} ", style(">").cyan());
    let _ = io::stdout().flush();
}

pub fn invalid(message: &str) {
    println!("{} {}", style("Invalid input:").red(), message);
}

pub fn events<R>(game: &Game<R>, events: &[RoundEvent], json: bool) -> serde_json::Result<()> {
    for event in events {
        match event {
            RoundEvent::Committed {
                purpose: DrawPurpose::MoveOrder,
                modulus,
                hmac,
            } => {
                println!("Let's determine who makes the first move.");
                println!(
                    "I selected a random value in the range 0..{} (HMAC={}).",
                    modulus - 1,
                    style(hmac).yellow()
                );
            }
            RoundEvent::Committed {
                purpose,
                modulus,
                hmac,
            } => {
                let what = match purpose {
                    DrawPurpose::Roll(party) => roll_owner(*party),
                    DrawPurpose::MoveOrder => "the move order",
                };
                println!(
                    "It's time for {}. I selected a random value in the range 0..{} (HMAC={}).",
                    what,
                    modulus - 1,
                    style(hmac).yellow()
                );
            }
            RoundEvent::Revealed(record) => {
                println!("My number is {} (KEY={}).", record.value, style(&record.key).yellow());
                if let DrawPurpose::Roll(_) = record.purpose {
                    println!(
                        "The fair number generation result is {} + {} = {} (mod {}).",
                        record.value, record.offset, record.result, record.modulus
                    );
                }
                if json {
                    println!("{}", serde_json::to_string(record)?);
                }
            }
            RoundEvent::FirstMover(Party::User) => println!("You make the first move."),
            RoundEvent::FirstMover(Party::Computer) => println!("I make the first move."),
            RoundEvent::DieChosen { party, index } => {
                let who = match party {
                    Party::User => "You choose",
                    Party::Computer => "I choose",
                };
                println!("{} the [{}] die.", who, game.dice()[*index]);
            }
            RoundEvent::Rolled { party, value, .. } => {
                let who = match party {
                    Party::User => "Your roll",
                    Party::Computer => "My roll",
                };
                println!("{} is {}.", who, style(value).bold());
            }
            RoundEvent::Resolved(outcome) => {
                let (user, computer) = outcome.roll_values;
                let line = match outcome.result {
                    RoundResult::Win => style(format!("You win ({} > {})!", user, computer)).green(),
                    RoundResult::Loss => style(format!("I win ({} < {})!", user, computer)).red(),
                    RoundResult::Tie => style(format!("It's a tie ({} = {}).", user, computer)).yellow(),
                };
                println!("{}", line.bold());
            }
        }
    }
    Ok(())
}

fn roll_owner(party: Party) -> &'static str {
    match party {
        Party::User => "your roll",
        Party::Computer => "my roll",
    }
}

pub fn score(score: Score) {
    println!(
        "Score: {} wins, {} losses, {} ties",
        score.wins, score.losses, score.ties
    );
}

pub fn between_rounds() {
    println!("Press Enter for another round, 'table' for probabilities or 'exit' to quit.");
    print!("{} ", style(">").cyan());
    let _ = io::stdout().flush();
}

pub fn goodbye(score: Score) {
    if score.rounds() > 0 {
        self::score(score);
    }
    println!("Thanks for playing!");
}

pub fn table(matrix: &ProbabilityMatrix) {
    println!("{}", style("Probability of winning for the user:").yellow().bold());
    println!("{}", format_table(&matrix.win_grid()));
}

/// Lay out a grid as a bordered text table, first row as header
pub fn format_table(grid: &[Vec<String>]) -> String {
    let Some((header, rows)) = grid.split_first() else {
        return String::new();
    };
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header)
        .add_rows(rows);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_game_core::dice::DiceSet;

    #[test]
    fn test_format_table_layout() {
        let grid = vec![
            vec!["h".to_string(), "long header".to_string()],
            vec!["row".to_string(), "1".to_string()],
        ];
        let table = format_table(&grid);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with('+'));
        assert!(lines.last().unwrap().starts_with('+'));
        assert!(lines.contains(&"| h   | long header |"));
        assert!(lines.contains(&"| row | 1           |"));
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_format_probability_table() {
        let dice = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap();
        let table = format_table(&ProbabilityMatrix::build(&dice).win_grid());

        let lines: Vec<&str> = table.lines().collect();
        assert!(lines
            .iter()
            .any(|l| l.starts_with("| User die v  | 2,2,4,4,9,9 |")));
        assert!(lines
            .iter()
            .any(|l| l.contains("| 0.3333      | 0.5556      | 0.4444      |")));
        assert_eq!(lines.iter().filter(|l| l.starts_with('|')).count(), 4);
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_format_empty_table() {
        assert_eq!(format_table(&[]), "");
    }
}
