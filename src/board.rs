//! One player's view of the grid: gravity placement, win and full-board checks.

use core::fmt;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Symbol};
use crate::config::{DEFAULT_COLS, DEFAULT_ROWS, WIN_LENGTH};

/// Bitboard type used for occupancy tracking.
pub type BB = BitBoard<u128>;

const _: () = assert!(DEFAULT_ROWS * DEFAULT_COLS <= BB::CAPACITY);

/// Step vectors for horizontal, vertical and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// The grid as seen by one peer. Row 0 is the top row; pieces fall towards
/// row `rows - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    local: BB,
    remote: BB,
    local_symbol: Symbol,
    turn: u32,
}

impl Board {
    /// Empty board of the default size.
    pub fn new(local_symbol: Symbol) -> Self {
        let empty = BB::new(DEFAULT_ROWS, DEFAULT_COLS);
        Board {
            local: empty,
            remote: empty,
            local_symbol,
            turn: 1,
        }
    }

    /// Empty board of a custom size. Fails when the grid is empty or has more
    /// than 128 cells.
    pub fn with_size(rows: usize, cols: usize, local_symbol: Symbol) -> Result<Self, BoardError> {
        let empty = BB::try_new(rows, cols)?;
        Ok(Board {
            local: empty,
            remote: empty,
            local_symbol,
            turn: 1,
        })
    }

    pub fn rows(&self) -> usize {
        self.local.rows()
    }

    pub fn cols(&self) -> usize {
        self.local.cols()
    }

    /// 1 + the number of local moves accepted since the last restart.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn local_symbol(&self) -> Symbol {
        self.local_symbol
    }

    pub fn remote_symbol(&self) -> Symbol {
        self.local_symbol.opponent()
    }

    /// Cells holding the local symbol.
    pub fn local_mask(&self) -> BB {
        self.local
    }

    /// Cells holding the opponent's symbol.
    pub fn remote_mask(&self) -> BB {
        self.remote
    }

    /// All occupied cells.
    pub fn occupied(&self) -> BB {
        self.local | self.remote
    }

    pub fn local_pieces(&self) -> usize {
        self.local.count_ones()
    }

    pub fn remote_pieces(&self) -> usize {
        self.remote.count_ones()
    }

    /// Symbol at (row, col), `None` for an empty or off-grid cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<Symbol> {
        if self.local.get(row, col).unwrap_or(false) {
            Some(self.local_symbol)
        } else if self.remote.get(row, col).unwrap_or(false) {
            Some(self.remote_symbol())
        } else {
            None
        }
    }

    /// Number of pieces stacked in `column` (0 for an out-of-range column).
    pub fn column_height(&self, column: usize) -> usize {
        if column >= self.cols() {
            return 0;
        }
        self.occupied().count_in_column(column)
    }

    /// True if a piece can still be dropped into `column`.
    pub fn is_playable(&self, column: usize) -> bool {
        column < self.cols() && self.column_height(column) < self.rows()
    }

    /// Columns that still have room, left to right.
    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cols()).filter(move |&c| self.is_playable(c))
    }

    fn landing_row(&self, column: usize) -> Result<usize, BoardError> {
        let cols = self.cols();
        if column >= cols {
            return Err(BoardError::ColumnOutOfRange { column, cols });
        }
        let height = self.column_height(column);
        if height >= self.rows() {
            return Err(BoardError::ColumnFull { column });
        }
        Ok(self.rows() - 1 - height)
    }

    /// Drop a local piece into `column`, returning the row it landed in.
    pub fn play_local(&mut self, column: usize) -> Result<usize, BoardError> {
        let row = self.landing_row(column)?;
        self.local.set(row, column)?;
        self.turn += 1;
        Ok(row)
    }

    /// Drop an opponent piece into `column`, returning the row it landed in.
    /// The turn counter only tracks local moves and is left alone.
    pub fn play_remote(&mut self, column: usize) -> Result<usize, BoardError> {
        let row = self.landing_row(column)?;
        self.remote.set(row, column)?;
        Ok(row)
    }

    /// Boolean form of [`play_local`](Self::play_local). `false` leaves the
    /// board untouched.
    pub fn apply_local_move(&mut self, column: usize) -> bool {
        self.play_local(column).is_ok()
    }

    /// Boolean form of [`play_remote`](Self::play_remote). A `false` here on a
    /// peer-validated move means the two boards have diverged.
    pub fn apply_remote_move(&mut self, column: usize) -> bool {
        self.play_remote(column).is_ok()
    }

    /// True if the local symbol has `WIN_LENGTH` pieces in a line.
    pub fn has_local_win(&self) -> bool {
        has_line(&self.local)
    }

    /// True if the opponent symbol has `WIN_LENGTH` pieces in a line.
    pub fn has_remote_win(&self) -> bool {
        has_line(&self.remote)
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.occupied().is_full()
    }

    /// Clear every cell and reset the turn counter to 1.
    pub fn restart(&mut self) {
        self.local.clear_all();
        self.remote.clear_all();
        self.turn = 1;
    }
}

/// Scan each direction from the first cell of every run; a run is only
/// measured from a cell whose predecessor along the direction is unset.
fn has_line(mask: &BB) -> bool {
    DIRECTIONS.iter().any(|&(dr, dc)| {
        mask.iter_set_bits().any(|(r, c)| {
            let (r, c) = (r as isize, c as isize);
            if mask.is_set(r - dr, c - dc) {
                return false;
            }
            let mut run = 1;
            while run < WIN_LENGTH
                && mask.is_set(r + dr * run as isize, c + dc * run as isize)
            {
                run += 1;
            }
            run >= WIN_LENGTH
        })
    })
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in 0..self.cols() {
            write!(f, " {:^3}", c)?;
        }
        writeln!(f)?;
        for r in 0..self.rows() {
            write!(f, "|")?;
            for c in 0..self.cols() {
                let ch = self.cell(r, c).map_or(' ', Symbol::as_char);
                write!(f, " {} |", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "+")?;
        for _ in 0..self.cols() {
            write!(f, "---+")?;
        }
        Ok(())
    }
}
