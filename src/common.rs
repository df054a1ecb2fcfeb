//! Common types for the board engine: symbols, board errors and game status.

use core::fmt;

use crate::bitboard::BitBoardError;

/// One of the two piece symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The symbol used by the other player.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error (e.g., board too large).
    BitBoard(BitBoardError),
    /// Column index is not in `[0, cols)`.
    ColumnOutOfRange { column: usize, cols: usize },
    /// Every row of the column is occupied.
    ColumnFull { column: usize },
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoard(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BitBoard(e) => write!(f, "BitBoard error: {}", e),
            BoardError::ColumnOutOfRange { column, cols } => {
                write!(f, "Column {} is out of range (0..{})", column, cols)
            }
            BoardError::ColumnFull { column } => write!(f, "Column {} is full", column),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// Status of the current game from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    Playing,
    LocalWin,
    RemoteWin,
    Draw,
    OpponentDisconnected,
}

impl GameStatus {
    /// Every status except `Playing` ends the game.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}
