#![cfg(feature = "std")]

use std::io::{self, BufRead, Write};

use rand::rngs::SmallRng;

use crate::{
    board::Board,
    common::{BoardError, GameStatus},
    player::Player,
};

/// Interactive player reading columns from stdin.
pub struct CliPlayer;

impl CliPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one trimmed line, `None` on EOF or a read error.
fn prompt(message: &str) -> Option<String> {
    std::print!("{}", message);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Parse a column entry. Accepts a bare column index.
pub fn parse_column(input: &str) -> Option<usize> {
    input.trim().parse().ok()
}

/// Parse a yes/no answer.
pub fn parse_vote(input: &str) -> Option<bool> {
    match input.trim().to_ascii_uppercase().as_str() {
        "Y" | "YES" => Some(true),
        "N" | "NO" => Some(false),
        _ => None,
    }
}

pub fn print_board(board: &Board) {
    std::println!("\n{}\n", board);
}

impl Player for CliPlayer {
    fn select_column(&mut self, _rng: &mut SmallRng, board: &Board) -> Option<usize> {
        std::println!("\nYou play {}!\nCurrent turn: {}", board.local_symbol(), board.turn());
        print_board(board);
        loop {
            let line = prompt("Enter next move (q to quit): ")?;
            if line.eq_ignore_ascii_case("q") {
                return None;
            }
            match parse_column(&line) {
                Some(column) => return Some(column),
                None => std::println!("'{}' is not a column number.", line),
            }
        }
    }

    fn wants_rematch(&mut self, _rng: &mut SmallRng, _games_played: u32) -> bool {
        loop {
            let Some(line) = prompt("\nRematch? (Y/N): ") else {
                return false;
            };
            if let Some(vote) = parse_vote(&line) {
                return vote;
            }
        }
    }

    fn handle_invalid_move(&mut self, _column: usize, err: &BoardError) {
        std::println!("Invalid move: {}. Try again.", err);
    }

    fn handle_waiting(&mut self) {
        std::println!("\nWaiting for the other player...");
    }

    fn handle_remote_move(&mut self, column: usize, _board: &Board) {
        std::println!("\nOpponent played column {}.", column);
    }

    fn handle_game_over(&mut self, status: GameStatus, board: &Board) {
        print_board(board);
        match status {
            GameStatus::LocalWin => {
                std::println!("Congrats, you won in {} turns!", board.turn() - 1)
            }
            GameStatus::RemoteWin => std::println!("Sorry, the opponent won."),
            GameStatus::Draw => std::println!("It's a draw!"),
            GameStatus::OpponentDisconnected => std::println!("The opponent disconnected."),
            GameStatus::Playing => {}
        }
    }
}
