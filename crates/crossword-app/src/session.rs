use crossword_core::{
    ClueIndex, Coord, GridLayout, LayoutError, PuzzleDefinition, layout::BLOCKED_MARKER,
};
use crossword_game::{
    EMPTY_SENTINEL, KeyValueStore, Navigator, PersistenceStore, ShareCodec, SolutionDigest,
    StateShape,
};

/// Outcome of comparing the fill against the published solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SolutionCheck {
    /// The fill matches the published solution.
    Correct,
    /// The fill does not match.
    Incorrect,
    /// The definition publishes neither a hash nor a solution grid.
    Unavailable,
}

/// One loaded puzzle wired up for play: the immutable layout and clue
/// index, the navigator, and the persistence store.
#[derive(Debug)]
pub struct Session<S> {
    pub(crate) definition: PuzzleDefinition,
    pub(crate) layout: GridLayout,
    pub(crate) clues: ClueIndex,
    pub(crate) navigator: Navigator,
    pub(crate) store: PersistenceStore<S>,
    pub(crate) digest: Box<dyn SolutionDigest>,
    pub(crate) verification: Option<SolutionCheck>,
}

impl<S: KeyValueStore> Session<S> {
    /// Builds the layout and clue index from `definition` and opens the
    /// persistence store against `storage`.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the definition matrix is inconsistent.
    pub fn new(
        definition: PuzzleDefinition,
        storage: S,
        codec: &dyn ShareCodec,
        digest: Box<dyn SolutionDigest>,
        link_payload: Option<String>,
    ) -> Result<Self, LayoutError> {
        let (layout, clues) = GridLayout::from_definition(&definition)?;
        let shape = StateShape {
            dimensions: definition.dimensions,
            max_across_id: definition.definitions.max_across_id(),
            max_down_id: definition.definitions.max_down_id(),
        };
        let store = PersistenceStore::open(storage, codec, definition.id, shape, link_payload);
        Ok(Self {
            definition,
            layout,
            clues,
            navigator: Navigator::new(),
            store,
            digest,
            verification: None,
        })
    }

    #[must_use]
    pub fn definition(&self) -> &PuzzleDefinition {
        &self.definition
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[must_use]
    pub fn clues(&self) -> &ClueIndex {
        &self.clues
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn store(&self) -> &PersistenceStore<S> {
        &self.store
    }

    #[must_use]
    pub fn verification(&self) -> Option<SolutionCheck> {
        self.verification
    }

    /// Whether editing is disabled. A session whose state came out of a
    /// shareable link is a read-only view until it is imported.
    #[must_use]
    pub fn read_only(&self) -> bool {
        self.store.current_source().is_from_link()
    }

    /// Whether the import action currently has anything to do.
    #[must_use]
    pub fn can_import(&self) -> bool {
        self.read_only()
    }

    /// Serializes the current state for a shareable link.
    #[must_use]
    pub fn share_payload(&self, codec: &dyn ShareCodec) -> Option<String> {
        self.store.share_payload(codec)
    }

    /// Whether every open cell holds a letter.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.open_coords()
            .all(|coord| !self.store.letter(coord).unwrap_or_default().is_empty())
    }

    /// Compares the fill against the published solution and records the
    /// outcome for the next view-model build.
    pub fn check_solution(&mut self) {
        self.verification = Some(self.solution_check());
    }

    fn solution_check(&self) -> SolutionCheck {
        if let Some(expected) = &self.definition.sol_hash {
            let found = self.digest.digest(&self.serialized_fill());
            return if found == *expected {
                SolutionCheck::Correct
            } else {
                SolutionCheck::Incorrect
            };
        }
        if let Some(solution) = &self.definition.sol_grid {
            return if self.matches_solution_grid(solution) {
                SolutionCheck::Correct
            } else {
                SolutionCheck::Incorrect
            };
        }
        SolutionCheck::Unavailable
    }

    /// Row-major fill serialization: blocked cells contribute the blocking
    /// marker, empty cells the empty sentinel.
    fn serialized_fill(&self) -> String {
        let dims = self.layout.dimensions();
        let mut out = String::with_capacity(dims.cell_count());
        for row in 0..dims.rows {
            for col in 0..dims.columns {
                let coord = Coord::new(row, col);
                if self.layout.is_open(coord) {
                    let letter = self.store.letter(coord).unwrap_or_default();
                    if letter.is_empty() {
                        out.push(EMPTY_SENTINEL);
                    } else {
                        out.push_str(&letter);
                    }
                } else {
                    out.push_str(BLOCKED_MARKER);
                }
            }
        }
        out
    }

    fn matches_solution_grid(&self, solution: &[Vec<String>]) -> bool {
        self.open_coords().all(|coord| {
            let expected = solution
                .get(coord.row)
                .and_then(|row| row.get(coord.col))
                .map(String::as_str);
            let found = self.store.letter(coord).unwrap_or_default();
            expected == Some(found.as_str())
        })
    }

    fn open_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let dims = self.layout.dimensions();
        (0..dims.rows)
            .flat_map(move |row| (0..dims.columns).map(move |col| Coord::new(row, col)))
            .filter(|coord| self.layout.is_open(*coord))
    }
}
