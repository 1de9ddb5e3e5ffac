//! Grid layout and clue index, built once per puzzle load.

use std::collections::BTreeMap;

use crate::{
    coord::{Coord, Dimensions, Direction},
    puzzle::{ClueId, PuzzleDefinition},
};

/// Marker string for a blocked cell in the definition matrix.
pub const BLOCKED_MARKER: &str = "#";

/// One grid position of the immutable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Not part of any run; never navigable, never holds a letter.
    Blocked,
    /// Holds a letter, optionally anchoring the clue with the given id.
    Open {
        /// Clue id anchored at this cell, if any.
        clue: Option<ClueId>,
    },
}

impl Cell {
    /// Whether the cell can hold a letter and be navigated to.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Anchor record for one clue id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueEntry {
    /// Cell where the clue's runs start.
    pub coord: Coord,
    /// Directions that start a run at [`ClueEntry::coord`], across before
    /// down. Always 1 or 2 elements.
    pub directions: Vec<Direction>,
}

/// Maps clue ids to their anchor cells and run directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueIndex {
    entries: BTreeMap<ClueId, ClueEntry>,
}

impl ClueIndex {
    /// Looks up the anchor record for `id`.
    #[must_use]
    pub fn entry(&self, id: ClueId) -> Option<&ClueEntry> {
        self.entries.get(&id)
    }

    /// Number of indexed clue ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no clue id is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Errors detected while building a layout from a definition.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    /// The matrix does not have the declared number of rows.
    #[display("grid has {found} rows, dimensions declare {expected}")]
    RowCountMismatch {
        /// Rows found in the matrix.
        found: usize,
        /// Rows declared by the dimensions.
        expected: usize,
    },
    /// A matrix row does not have the declared number of columns.
    #[display("row {row} has {found} cells, dimensions declare {expected}")]
    RowLengthMismatch {
        /// Index of the offending row.
        row: usize,
        /// Cells found in that row.
        found: usize,
        /// Columns declared by the dimensions.
        expected: usize,
    },
    /// A cell marker is neither empty, blocked, nor a clue id.
    #[display("cell ({row}, {col}) holds unparseable marker {marker:?}")]
    BadCellMarker {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The marker as found in the matrix.
        marker: String,
    },
    /// The same clue id is anchored at two different cells.
    #[display("clue {id} is anchored at more than one cell")]
    ClueAnchorConflict {
        /// The doubly anchored id.
        id: ClueId,
    },
    /// A cell anchors an id that no definition map mentions.
    #[display("clue {id} has no across or down definition")]
    ClueWithoutDefinition {
        /// The undefined id.
        id: ClueId,
    },
}

/// Immutable per-cell layout of one puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    dimensions: Dimensions,
    cells: Vec<Cell>,
}

impl GridLayout {
    /// Builds the layout and the clue index in one row-major pass over the
    /// definition matrix.
    ///
    /// Direction membership of an anchored id comes from the definition
    /// maps, so within each direction the index inherits the external
    /// ascending-id convention. An id may appear in both maps only when it
    /// is anchored at a single cell.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the matrix disagrees with the declared
    /// dimensions, a cell marker cannot be parsed, or the clue anchors are
    /// inconsistent with the definition maps.
    pub fn from_definition(def: &PuzzleDefinition) -> Result<(Self, ClueIndex), LayoutError> {
        let dimensions = def.dimensions;
        if def.grid.len() != dimensions.rows {
            return Err(LayoutError::RowCountMismatch {
                found: def.grid.len(),
                expected: dimensions.rows,
            });
        }

        let mut cells = Vec::with_capacity(dimensions.cell_count());
        let mut entries = BTreeMap::new();
        for (row, markers) in def.grid.iter().enumerate() {
            if markers.len() != dimensions.columns {
                return Err(LayoutError::RowLengthMismatch {
                    row,
                    found: markers.len(),
                    expected: dimensions.columns,
                });
            }
            for (col, marker) in markers.iter().enumerate() {
                let cell = match marker.as_str() {
                    BLOCKED_MARKER => Cell::Blocked,
                    "" => Cell::Open { clue: None },
                    text => {
                        let id: ClueId =
                            text.parse().map_err(|_| LayoutError::BadCellMarker {
                                row,
                                col,
                                marker: marker.clone(),
                            })?;
                        let coord = Coord::new(row, col);
                        let mut directions = Vec::with_capacity(2);
                        if def.definitions.across.contains_key(&id) {
                            directions.push(Direction::Across);
                        }
                        if def.definitions.down.contains_key(&id) {
                            directions.push(Direction::Down);
                        }
                        if directions.is_empty() {
                            return Err(LayoutError::ClueWithoutDefinition { id });
                        }
                        if entries
                            .insert(id, ClueEntry { coord, directions })
                            .is_some()
                        {
                            return Err(LayoutError::ClueAnchorConflict { id });
                        }
                        Cell::Open { clue: Some(id) }
                    }
                };
                cells.push(cell);
            }
        }

        Ok((Self { dimensions, cells }, ClueIndex { entries }))
    }

    /// Declared puzzle dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The cell at `coord`, or `None` out of bounds.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        self.dimensions
            .contains(coord)
            .then(|| self.cells[self.dimensions.index_of(coord)])
    }

    /// Whether `coord` is an in-bounds open cell.
    #[must_use]
    pub fn is_open(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(Cell::is_open)
    }

    /// The clue id anchored at `coord`, if any.
    #[must_use]
    pub fn clue_at(&self, coord: Coord) -> Option<ClueId> {
        match self.cell(coord)? {
            Cell::Blocked => None,
            Cell::Open { clue } => clue,
        }
    }

    /// The next open cell from `coord` in reading order, or `None` when the
    /// run ends there (edge or blocked cell).
    #[must_use]
    pub fn forward_open(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let next = coord.forward(direction)?;
        self.is_open(next).then_some(next)
    }

    /// The previous open cell from `coord` in reading order, or `None` when
    /// the run starts there.
    #[must_use]
    pub fn backward_open(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let prev = coord.backward(direction)?;
        self.is_open(prev).then_some(prev)
    }
}
