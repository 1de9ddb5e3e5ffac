//! View models rebuilt from scratch on every query.
//!
//! Hosts never reach into the session; after each batch of actions they ask
//! for a fresh [`GameScreenViewModel`] and paint exactly what it says.

use bitflags::bitflags;
use crossword_core::{ClueId, Coord, Dimensions, Direction};
use crossword_game::KeyValueStore;

use crate::session::{Session, SolutionCheck};

bitflags! {
    /// Render flags for one grid cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellVisual: u8 {
        /// The cell is blocked; paint it solid, accept no input.
        const BLOCKED = 1;
        /// The cell belongs to the highlighted run.
        const IN_RUN = 1 << 1;
        /// The cell is the active one; painted heavier than the run.
        const ACTIVE = 1 << 2;
    }
}

/// One cell of the grid view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCellViewModel {
    /// Letter to paint, `""` when empty.
    pub letter: String,
    /// Clue number to paint in the corner, if the cell anchors one.
    pub clue: Option<ClueId>,
    /// Render flags.
    pub visual: CellVisual,
}

/// The whole grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridViewModel {
    pub dimensions: Dimensions,
    pub cells: Vec<GridCellViewModel>,
}

impl GridViewModel {
    /// The cell view at `coord`.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is out of bounds.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> &GridCellViewModel {
        &self.cells[self.dimensions.index_of(coord)]
    }
}

/// One clue-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueViewModel {
    pub id: ClueId,
    pub direction: Direction,
    pub text: String,
    /// Painted struck-through when set.
    pub solved: bool,
}

/// Both clue lists, each in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueListViewModel {
    pub across: Vec<ClueViewModel>,
    pub down: Vec<ClueViewModel>,
}

/// Everything a host needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScreenViewModel {
    pub grid: GridViewModel,
    pub clues: ClueListViewModel,
    /// Editing is disabled; the session is a shared read-only view.
    pub read_only: bool,
    /// Show the "import to local" affordance.
    pub can_import: bool,
    pub verification: Option<SolutionCheck>,
    pub author: String,
}

/// Builds the full frame for the current session state.
#[must_use]
pub fn build_game_screen_view_model<S: KeyValueStore>(
    session: &Session<S>,
) -> GameScreenViewModel {
    GameScreenViewModel {
        grid: build_grid(session),
        clues: build_clue_lists(session),
        read_only: session.read_only(),
        can_import: session.can_import(),
        verification: session.verification(),
        author: session.definition().author.clone(),
    }
}

fn build_grid<S: KeyValueStore>(session: &Session<S>) -> GridViewModel {
    let layout = session.layout();
    let dimensions = layout.dimensions();
    let run = session.navigator().run();

    let mut cells = Vec::with_capacity(dimensions.cell_count());
    for row in 0..dimensions.rows {
        for col in 0..dimensions.columns {
            let coord = Coord::new(row, col);
            let mut visual = CellVisual::empty();
            let letter = if layout.is_open(coord) {
                session.store().letter(coord).unwrap_or_default()
            } else {
                visual.insert(CellVisual::BLOCKED);
                String::new()
            };
            if let Some(run) = run {
                if run.cells.contains(&coord) {
                    visual.insert(CellVisual::IN_RUN);
                }
                if run.anchor == coord {
                    visual.insert(CellVisual::ACTIVE);
                }
            }
            cells.push(GridCellViewModel {
                letter,
                clue: layout.clue_at(coord),
                visual,
            });
        }
    }
    GridViewModel { dimensions, cells }
}

fn build_clue_lists<S: KeyValueStore>(session: &Session<S>) -> ClueListViewModel {
    let texts = &session.definition().definitions;
    let entries = |direction: Direction, list: &std::collections::BTreeMap<ClueId, String>| {
        list.iter()
            .map(|(&id, text)| ClueViewModel {
                id,
                direction,
                text: text.clone(),
                solved: session
                    .store()
                    .clue_solved(id, direction)
                    .unwrap_or_default(),
            })
            .collect()
    };
    ClueListViewModel {
        across: entries(Direction::Across, &texts.across),
        down: entries(Direction::Down, &texts.down),
    }
}
