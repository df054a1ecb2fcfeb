use rand::rngs::SmallRng;

use crate::{
    board::Board,
    common::{BoardError, GameStatus},
};

/// Interface implemented by different player types.
pub trait Player: Send {
    /// Choose the column for the next local move. `None` means the player
    /// leaves the match.
    fn select_column(&mut self, rng: &mut SmallRng, board: &Board) -> Option<usize>;

    /// Vote on a rematch after `games_played` finished games.
    fn wants_rematch(&mut self, rng: &mut SmallRng, games_played: u32) -> bool;

    /// Inform the player that its last choice was rejected locally.
    fn handle_invalid_move(&mut self, _column: usize, _err: &BoardError) {}

    /// Called before blocking on the opponent's move.
    fn handle_waiting(&mut self) {}

    /// Inform the player of the opponent's move, already applied to `board`.
    fn handle_remote_move(&mut self, _column: usize, _board: &Board) {}

    /// Inform the player that the game ended.
    fn handle_game_over(&mut self, _status: GameStatus, _board: &Board) {}
}
