//! A fixed-capacity occupancy bitboard with runtime dimensions.
//!
//! The grid is stored row-major in the unsigned integer `T`, so a board is
//! `Copy`, allocation free and usable without `std`. Dimensions are chosen at
//! construction and checked against the bit width of `T`.

use core::ops::{BitAnd, BitOr, Not};
use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBoardError {
    /// Requested `rows * cols` exceeds the capacity of `T`.
    SizeTooLarge { rows: usize, cols: usize, capacity: usize },
    /// Zero rows or zero columns.
    EmptyDimensions,
    /// Row or column index is out of bounds.
    IndexOutOfBounds { row: usize, col: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::SizeTooLarge {
                rows,
                cols,
                capacity,
            } => write!(
                f,
                "SizeTooLarge: {}x{}={} exceeds capacity {}",
                rows,
                cols,
                rows * cols,
                capacity
            ),
            BitBoardError::EmptyDimensions => write!(f, "EmptyDimensions: rows and cols must be non-zero"),
            BitBoardError::IndexOutOfBounds { row, col } => {
                write!(f, "IndexOutOfBounds: row={}, col={}", row, col)
            }
        }
    }
}

/// A `rows × cols` bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
    rows: usize,
    cols: usize,
}

impl<T> BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Number of bits available in `T`.
    pub const CAPACITY: usize = mem::size_of::<T>() * 8;

    /// Create an empty board without the capacity check. The caller
    /// guarantees `rows * cols <= CAPACITY`.
    #[inline]
    pub fn new(rows: usize, cols: usize) -> Self {
        BitBoard {
            bits: T::zero(),
            rows,
            cols,
        }
    }

    /// Create an empty board, failing if the grid does not fit in `T`.
    pub fn try_new(rows: usize, cols: usize) -> Result<Self, BitBoardError> {
        if rows == 0 || cols == 0 {
            return Err(BitBoardError::EmptyDimensions);
        }
        match rows.checked_mul(cols) {
            Some(cells) if cells <= Self::CAPACITY => Ok(BitBoard {
                bits: T::zero(),
                rows,
                cols,
            }),
            _ => Err(BitBoardError::SizeTooLarge {
                rows,
                cols,
                capacity: Self::CAPACITY,
            }),
        }
    }

    #[inline]
    fn mask(&self) -> T {
        let cells = self.rows * self.cols;
        if cells == Self::CAPACITY {
            !T::zero()
        } else {
            (T::one() << cells) - T::one()
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Result<usize, BitBoardError> {
        if row >= self.rows || col >= self.cols {
            Err(BitBoardError::IndexOutOfBounds { row, col })
        } else {
            Ok(row * self.cols + col)
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of set bits (occupied cells).
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns true if every cell of the grid is set.
    pub fn is_full(&self) -> bool {
        self.bits == self.mask()
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        let idx = self.index(row, col)?;
        Ok(((self.bits >> idx) & T::one()) != T::zero())
    }

    /// Like [`get`](Self::get) but with signed coordinates; anything off the
    /// grid reads as unset. Used when walking lines in arbitrary directions.
    #[inline]
    pub fn is_set(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        self.get(row as usize, col as usize).unwrap_or(false)
    }

    /// Sets the bit at (row, col) to 1.
    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        let idx = self.index(row, col)?;
        self.bits = self.bits | (T::one() << idx);
        Ok(())
    }

    /// Clears the bit at (row, col) to 0.
    pub fn clear(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        let idx = self.index(row, col)?;
        self.bits = self.bits & !(T::one() << idx);
        Ok(())
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        self.bits = T::zero();
    }

    /// Number of set bits in column `col`.
    pub fn count_in_column(&self, col: usize) -> usize {
        (0..self.rows)
            .filter(|&r| self.get(r, col).unwrap_or(false))
            .count()
    }

    /// Iterator over the set cells of the board, row-major.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T> {
        SetBits {
            board: self,
            idx: 0,
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

impl<T> fmt::Debug for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard {}x{}:", self.rows, self.cols)?;
        for r in 0..self.rows {
            for c in 0..self.cols {
                let bit = if self.get(r, c).unwrap_or(false) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the set cells of a bitboard.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T>,
    idx: usize,
}

impl<'a, T> Iterator for SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let cols = self.board.cols;
        while self.idx < self.board.rows * cols {
            let idx = self.idx;
            self.idx += 1;
            if ((self.board.bits >> idx) & T::one()) != T::zero() {
                return Some((idx / cols, idx % cols));
            }
        }
        None
    }
}

/// Bitwise AND of two boards of the same shape. Mismatched shapes yield the
/// left operand's shape with no bits set.
impl<T> BitAnd for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        let bits = if self.same_shape(&rhs) {
            self.bits & rhs.bits
        } else {
            T::zero()
        };
        BitBoard { bits, ..self }
    }
}

/// Bitwise OR of two boards of the same shape. Mismatched shapes keep the
/// left operand unchanged.
impl<T> BitOr for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        let bits = if self.same_shape(&rhs) {
            self.bits | rhs.bits
        } else {
            self.bits
        };
        BitBoard { bits, ..self }
    }
}

/// Bitwise NOT within board bounds.
impl<T> Not for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        BitBoard {
            bits: !self.bits & self.mask(),
            ..self
        }
    }
}
