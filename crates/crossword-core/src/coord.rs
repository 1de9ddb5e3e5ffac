//! Grid coordinates and reading directions.

use serde::{Deserialize, Serialize};

/// A grid position, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Row index (0 at the top).
    pub row: usize,
    /// Column index (0 at the left edge; across runs are read towards 0).
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate from row and column indices.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The next coordinate in reading order for `direction`.
    ///
    /// Across is read right-to-left, so the column index decreases; down is
    /// read top-to-bottom, so the row index increases. Returns `None` when
    /// the step would leave the grid on the zero side. The caller still has
    /// to check the far edge against the puzzle dimensions.
    #[must_use]
    pub const fn forward(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Across => match self.col.checked_sub(1) {
                Some(col) => Some(Self::new(self.row, col)),
                None => None,
            },
            Direction::Down => Some(Self::new(self.row + 1, self.col)),
        }
    }

    /// The previous coordinate in reading order for `direction`.
    ///
    /// Mirror image of [`Coord::forward`]: the column index increases for
    /// across, the row index decreases for down.
    #[must_use]
    pub const fn backward(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Across => Some(Self::new(self.row, self.col + 1)),
            Direction::Down => match self.row.checked_sub(1) {
                Some(row) => Some(Self::new(row, self.col)),
                None => None,
            },
        }
    }
}

/// Reading direction of a clue run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    /// Horizontal, read right-to-left.
    Across,
    /// Vertical, read top-to-bottom.
    Down,
}

impl Direction {
    /// Returns the other direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Across => Self::Down,
            Self::Down => Self::Across,
        }
    }

    /// Swaps `self` for the other direction in place.
    pub const fn toggle(&mut self) {
        *self = self.toggled();
    }
}

/// Puzzle dimensions as declared by the external definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

impl Dimensions {
    /// Whether `coord` lies inside the grid.
    #[must_use]
    pub const fn contains(self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows * self.columns
    }

    /// Row-major index of `coord`.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is out of bounds.
    #[must_use]
    pub fn index_of(self, coord: Coord) -> usize {
        assert!(self.contains(coord));
        coord.row * self.columns + coord.col
    }
}
