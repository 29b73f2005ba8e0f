use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use othello::{
    EvalWeights, ExternalPlayer, Game, GameError, Mode, Move, MoveSource, Player, SearchPlayer,
    Side, Turn, Winner,
};
use tracing_subscriber::EnvFilter;

/// Reads "r c" pairs from a line-based reader.
struct ConsoleMoves<R> {
    input: R,
}

impl<R: BufRead> MoveSource for ConsoleMoves<R> {
    fn next_move(&mut self, _side: Side, legal: &[Move]) -> Option<Move> {
        let listed: Vec<String> = legal.iter().map(Move::to_string).collect();
        println!("Your valid moves: [{}]", listed.join(", "));
        loop {
            println!("Enter r c:");
            let line = read_line(&mut self.input)?;
            match parse_move(&line) {
                Some(mv) => return Some(mv),
                None => println!("Invalid move. Try again."),
            }
        }
    }

    fn rejected(&mut self, _mv: Move, err: &GameError) {
        println!("Invalid move ({err}). Try again.");
    }
}

/// Exactly two whitespace-separated numbers, "row col".
fn parse_move(line: &str) -> Option<Move> {
    let mut tokens = line.split_whitespace();
    let row = tokens.next()?.parse().ok()?;
    let col = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(Move::new(row, col))
}

fn read_line(input: &mut impl BufRead) -> Option<String> {
    // Prompt only; reading goes ahead even if the flush fails.
    if let Err(err) = io::stdout().flush() {
        tracing::warn!(%err, "failed to flush prompt");
    }
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn read_number(input: &mut impl BufRead, prompt: &str) -> Result<u8, Box<dyn Error>> {
    println!("{prompt}");
    loop {
        let line = read_line(input).ok_or(GameError::InputClosed)?;
        match line.trim().parse() {
            Ok(n) => return Ok(n),
            Err(_) => println!("Please enter a number."),
        }
    }
}

/// Evaluation weights from the JSON file named by `OTHELLO_WEIGHTS`, if set.
fn load_weights() -> Result<EvalWeights, Box<dyn Error>> {
    match env::var("OTHELLO_WEIGHTS") {
        Ok(path) => Ok(EvalWeights::from_json(&fs::read_to_string(path)?)?),
        Err(_) => Ok(EvalWeights::default()),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let weights = load_weights()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Othello - Console");
    let mode = match read_number(&mut input, "Choose mode: 1) Human vs AI  2) AI vs AI")? {
        1 => Mode::HumanVsAi {
            depth: read_number(
                &mut input,
                "You play as BLACK (X) and go first. AI is WHITE (O). Depth? (e.g., 4)",
            )?,
        },
        _ => Mode::AiVsAi {
            depth: read_number(&mut input, "AI vs AI. Enter depth for AI (both):")?,
        },
    };

    let mut black: Box<dyn Player> = match mode {
        Mode::HumanVsAi { .. } => Box::new(ExternalPlayer::new("Human", ConsoleMoves { input })),
        Mode::AiVsAi { depth } => Box::new(SearchPlayer::with_weights(depth, weights)),
    };
    let mut white: Box<dyn Player> = Box::new(SearchPlayer::with_weights(mode.depth(), weights));

    let mut game = Game::new();
    loop {
        println!("{}\n", game.board());
        match game.step(black.as_mut(), white.as_mut())? {
            Turn::Moved { side, mv, .. } => {
                if mode.human_side() != Some(side) {
                    println!("{side} ({}) plays {mv}", player_name(side, &*black, &*white));
                }
            }
            Turn::Passed(side) => println!("{side} has no moves. Skipping turn."),
            Turn::Over(result) => {
                println!("Game over. Final score (Black - White): {}", result.score);
                match result.winner {
                    Winner::Black => println!("Black wins!"),
                    Winner::White => println!("White wins!"),
                    Winner::Draw => println!("Draw!"),
                }
                return Ok(());
            }
        }
    }
}

fn player_name<'a>(side: Side, black: &'a dyn Player, white: &'a dyn Player) -> &'a str {
    match side {
        Side::Black => black.name(),
        Side::White => white.name(),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_move_accepts_two_numbers() {
        assert_eq!(parse_move("2 3\n"), Some(Move::new(2, 3)));
        assert_eq!(parse_move("  7\t0 "), Some(Move::new(7, 0)));
    }

    #[test]
    fn parse_move_rejects_stray_or_missing_tokens() {
        assert_eq!(parse_move("2 x 3"), None);
        assert_eq!(parse_move("300 2 3"), None);
        assert_eq!(parse_move("2 3 4"), None);
        assert_eq!(parse_move("2"), None);
        assert_eq!(parse_move(""), None);
    }

    #[test]
    fn console_source_reprompts_until_a_well_formed_line() {
        let mut source = ConsoleMoves {
            input: "2 x 3\n300 2 3\n4 5\n".as_bytes(),
        };

        assert_eq!(source.next_move(Side::Black, &[]), Some(Move::new(4, 5)));
        assert_eq!(source.next_move(Side::Black, &[]), None);
    }
}
