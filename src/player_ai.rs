use rand::{rngs::SmallRng, Rng};

use crate::{board::Board, player::Player};

/// Computer player: takes an immediate win, otherwise blocks an immediate
/// loss, otherwise drops into a random open column.
pub struct AiPlayer {
    rematches: u32,
}

impl AiPlayer {
    /// An AI that declines every rematch.
    pub fn new() -> Self {
        Self { rematches: 0 }
    }

    /// An AI that accepts up to `rematches` rematches.
    pub fn with_rematches(rematches: u32) -> Self {
        Self { rematches }
    }

    fn winning_column(board: &Board) -> Option<usize> {
        board.playable_columns().find(|&c| {
            let mut next = *board;
            next.apply_local_move(c) && next.has_local_win()
        })
    }

    fn blocking_column(board: &Board) -> Option<usize> {
        board.playable_columns().find(|&c| {
            let mut next = *board;
            next.apply_remote_move(c) && next.has_remote_win()
        })
    }
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for AiPlayer {
    fn select_column(&mut self, rng: &mut SmallRng, board: &Board) -> Option<usize> {
        if let Some(c) = Self::winning_column(board).or_else(|| Self::blocking_column(board)) {
            return Some(c);
        }
        let open = board.playable_columns().count();
        if open == 0 {
            return None;
        }
        board.playable_columns().nth(rng.random_range(0..open))
    }

    fn wants_rematch(&mut self, _rng: &mut SmallRng, games_played: u32) -> bool {
        games_played <= self.rematches
    }
}
