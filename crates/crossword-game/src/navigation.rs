//! Active-cell and active-direction state machine.

use crossword_core::{ClueId, ClueIndex, Coord, Direction, GridLayout};

/// Transient pointer state. Never persisted; every page load starts over
/// with no active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickContext {
    /// The cell input currently goes to, if any.
    pub active: Option<Coord>,
    /// The cell that was active before the last transition.
    pub previous: Option<Coord>,
    /// Direction letters are entered in.
    pub direction: Direction,
}

impl Default for ClickContext {
    fn default() -> Self {
        Self {
            active: None,
            previous: None,
            direction: Direction::Across,
        }
    }
}

/// The run of cells belonging to the active clue, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHighlight {
    /// The active cell itself; painted heavier than the rest of the run.
    pub anchor: Coord,
    /// Every cell of the run, anchor included, from run start to run end.
    pub cells: Vec<Coord>,
}

/// Tracks which cell and direction are active as the player clicks and
/// types, and keeps the highlighted run in sync.
///
/// All movement is a silent no-op when the target is blocked or off-grid;
/// there is no terminal state, the puzzle stays interactively live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    ctx: ClickContext,
    run: Option<RunHighlight>,
}

impl Navigator {
    /// A navigator with no active cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current pointer state.
    #[must_use]
    pub const fn context(&self) -> ClickContext {
        self.ctx
    }

    /// The cell input currently goes to.
    #[must_use]
    pub const fn active(&self) -> Option<Coord> {
        self.ctx.active
    }

    /// The direction letters are entered in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.ctx.direction
    }

    /// The highlighted run, when a cell is active.
    #[must_use]
    pub const fn run(&self) -> Option<&RunHighlight> {
        self.run.as_ref()
    }

    /// Jumps to the anchor of clue `id` and forces `direction`, bypassing
    /// the direction inference a click would do. Unknown ids are ignored.
    pub fn select_definition(
        &mut self,
        layout: &GridLayout,
        clues: &ClueIndex,
        id: ClueId,
        direction: Direction,
    ) {
        let Some(entry) = clues.entry(id) else {
            return;
        };
        self.ctx.previous = self.ctx.active;
        self.ctx.active = Some(entry.coord);
        self.ctx.direction = direction;
        self.refresh_highlight(layout);
    }

    /// Handles a click on `coord`.
    ///
    /// Blocked cells are ignored. Re-clicking the already active cell
    /// toggles the direction; clicking a cell that anchors exactly one clue
    /// direction snaps to that direction; any other click keeps the
    /// direction as it was.
    pub fn click(&mut self, layout: &GridLayout, clues: &ClueIndex, coord: Coord) {
        if !layout.is_open(coord) {
            return;
        }
        let last = self.ctx.active;
        self.ctx.previous = last;
        self.ctx.active = Some(coord);
        if last == Some(coord) {
            self.ctx.direction.toggle();
        } else if let Some(id) = layout.clue_at(coord)
            && let Some(entry) = clues.entry(id)
            && let [only] = entry.directions.as_slice()
        {
            self.ctx.direction = *only;
        }
        self.refresh_highlight(layout);
    }

    /// Moves one step forward in reading order after an accepted letter.
    ///
    /// Across moves the column towards 0 (right-to-left script), down moves
    /// one row further down. Stays put when the target cell is blocked or
    /// off-grid.
    pub fn advance(&mut self, layout: &GridLayout) {
        if let Some(active) = self.ctx.active
            && let Some(next) = layout.forward_open(active, self.ctx.direction)
        {
            self.ctx.previous = Some(active);
            self.ctx.active = Some(next);
            self.refresh_highlight(layout);
        }
    }

    /// Moves one step backward in reading order after a delete.
    ///
    /// Commits the move only onto a navigable cell; the caller clears the
    /// current cell's letter either way.
    pub fn retreat(&mut self, layout: &GridLayout) {
        if let Some(active) = self.ctx.active
            && let Some(prev) = layout.backward_open(active, self.ctx.direction)
        {
            self.ctx.previous = Some(active);
            self.ctx.active = Some(prev);
            self.refresh_highlight(layout);
        }
    }

    /// Recomputes the highlighted run for the active cell.
    ///
    /// With no active cell all highlighting is cleared. When the active
    /// cell has no navigable neighbor in the current direction but is part
    /// of a run the other way, the direction is swapped before the run is
    /// computed.
    pub fn refresh_highlight(&mut self, layout: &GridLayout) {
        let Some(coord) = self.ctx.active else {
            self.run = None;
            return;
        };
        if layout.forward_open(coord, self.ctx.direction).is_none()
            && layout.backward_open(coord, self.ctx.direction).is_none()
        {
            self.ctx.direction.toggle();
        }
        let direction = self.ctx.direction;

        let mut start = coord;
        while let Some(prev) = layout.backward_open(start, direction) {
            start = prev;
        }
        let mut cells = Vec::new();
        let mut cursor = Some(start);
        while let Some(cell) = cursor {
            cells.push(cell);
            cursor = layout.forward_open(cell, direction);
        }
        self.run = Some(RunHighlight {
            anchor: coord,
            cells,
        });
    }
}
