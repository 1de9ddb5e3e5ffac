//! Durable store reconciling link-embedded, locally saved and fresh state.

use crossword_core::{ClueId, Coord, Direction};
use log::{error, warn};

use crate::{
    share::ShareCodec,
    state::{EMPTY_SENTINEL, PuzzleState, StateShape},
    storage::KeyValueStore,
};

/// Key prefix for per-puzzle state entries.
const STATE_KEY_PREFIX: &str = "crossword_";
/// Suffix of the safety copy written before an import overwrites local
/// state.
const BACKUP_KEY_SUFFIX: &str = "_backup";
/// Marker key checked before any load.
pub const FORMAT_MARKER_KEY: &str = "crossword_storage_version";
/// Expected marker value. Any other value (or a missing marker) clears all
/// durable state for every puzzle, then stamps the current value.
pub const FORMAT_MARKER_VALUE: &str = "2";

/// Where the state held in memory actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StorageSource {
    /// Freshly generated blank state; no prior source was valid.
    None,
    /// Decoded out of a shareable link.
    FromLink,
    /// Loaded from durable local storage.
    FromLocal,
}

/// Caller errors on store accessors. These are programming errors in the
/// caller and are never caught internally.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    /// The coordinate falls outside the puzzle grid.
    #[display("coordinate ({}, {}) is outside the puzzle grid", coord.row, coord.col)]
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: Coord,
    },
    /// A letter must be a single character (or empty, to clear).
    #[display("letter {letter:?} is longer than one character")]
    LetterTooLong {
        /// The offending input.
        letter: String,
    },
    /// The clue id has no slot in the solved-flag string.
    #[display("clue {id} has no {direction:?} solved flag")]
    ClueOutOfRange {
        /// The offending id (0, or beyond the puzzle's largest id).
        id: ClueId,
        /// Direction whose flag string was addressed.
        direction: Direction,
    },
}

/// Owns one puzzle's durable fill state and per-clue solved flags.
///
/// Opened once per puzzle load; every mutation is written back to the
/// injected [`KeyValueStore`] within the same call.
#[derive(Debug, Clone)]
pub struct PersistenceStore<S> {
    storage: S,
    puzzle_id: u32,
    shape: StateShape,
    link_payload: Option<String>,
    state: PuzzleState,
    source: StorageSource,
}

impl<S: KeyValueStore> PersistenceStore<S> {
    /// Opens the store, loading the first valid state source.
    ///
    /// Priority: `link_payload` (decoded through `codec`), then the local
    /// entry for `puzzle_id`, then a fresh blank state. A candidate that
    /// fails to decode, parse or validate is logged and skipped, never
    /// surfaced. Before anything is loaded the storage-format marker is
    /// checked; a mismatch clears all durable state for every puzzle.
    pub fn open(
        mut storage: S,
        codec: &dyn ShareCodec,
        puzzle_id: u32,
        shape: StateShape,
        link_payload: Option<String>,
    ) -> Self {
        invalidate_on_format_change(&mut storage);
        let (state, source) =
            load_candidate(&storage, codec, puzzle_id, shape, link_payload.as_deref());
        Self {
            storage,
            puzzle_id,
            shape,
            link_payload,
            state,
            source,
        }
    }

    /// The shape this store validates against.
    #[must_use]
    pub const fn shape(&self) -> StateShape {
        self.shape
    }

    /// The letter at `coord`, or `""` for an empty cell.
    ///
    /// # Errors
    ///
    /// [`StoreError::CoordOutOfBounds`] when `coord` is outside the grid.
    pub fn letter(&self, coord: Coord) -> Result<String, StoreError> {
        if !self.shape.dimensions.contains(coord) {
            return Err(StoreError::CoordOutOfBounds { coord });
        }
        let stored = self.state.letter_at(coord).unwrap_or(EMPTY_SENTINEL);
        if stored == EMPTY_SENTINEL {
            Ok(String::new())
        } else {
            Ok(stored.to_string())
        }
    }

    /// Stores `letter` at `coord` and persists. `coord == None` is the
    /// caller convention for "no active cell" and is a no-op; an empty
    /// `letter` clears the cell.
    ///
    /// The write-back always targets the local entry, whatever the current
    /// provenance.
    ///
    /// # Errors
    ///
    /// [`StoreError::CoordOutOfBounds`] or [`StoreError::LetterTooLong`].
    pub fn set_letter(&mut self, coord: Option<Coord>, letter: &str) -> Result<(), StoreError> {
        let Some(coord) = coord else {
            return Ok(());
        };
        if !self.shape.dimensions.contains(coord) {
            return Err(StoreError::CoordOutOfBounds { coord });
        }
        let mut chars = letter.chars();
        let stored = chars.next().unwrap_or(EMPTY_SENTINEL);
        if chars.next().is_some() {
            return Err(StoreError::LetterTooLong {
                letter: letter.to_string(),
            });
        }
        self.state.set_letter_at(coord, stored);
        self.persist();
        Ok(())
    }

    /// The solved flag for clue `id` in `direction`.
    ///
    /// # Errors
    ///
    /// [`StoreError::ClueOutOfRange`] when `id` has no flag slot.
    pub fn clue_solved(&self, id: ClueId, direction: Direction) -> Result<bool, StoreError> {
        self.state
            .solved_flag(direction, id)
            .ok_or(StoreError::ClueOutOfRange { id, direction })
    }

    /// Sets the solved flag for clue `id` in `direction` and persists.
    ///
    /// # Errors
    ///
    /// [`StoreError::ClueOutOfRange`] when `id` has no flag slot.
    pub fn set_clue_solved(
        &mut self,
        id: ClueId,
        direction: Direction,
        solved: bool,
    ) -> Result<(), StoreError> {
        if !self.state.set_solved_flag(direction, id, solved) {
            return Err(StoreError::ClueOutOfRange { id, direction });
        }
        self.persist();
        Ok(())
    }

    /// The current in-memory state, as it would be persisted.
    #[must_use]
    pub const fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Serializes the current state and runs it through `codec`, yielding
    /// the token a shareable link embeds.
    #[must_use]
    pub fn share_payload(&self, codec: &dyn ShareCodec) -> Option<String> {
        let text = serde_json::to_string(&self.state).ok()?;
        Some(codec.compress(&text))
    }

    /// Imports the in-memory state into durable local storage.
    ///
    /// Any existing local entry is first copied to a backup key, then
    /// overwritten. Afterwards the session counts as locally sourced, which
    /// is what re-enables editing for a state that arrived through a link.
    pub fn force_flush(&mut self) {
        let key = self.state_key();
        if let Some(existing) = self.storage.get(&key) {
            self.storage
                .set(&format!("{key}{BACKUP_KEY_SUFFIX}"), &existing);
        }
        self.persist();
        self.source = StorageSource::FromLocal;
    }

    /// What was actually loaded when the store was opened (or imported
    /// since).
    #[must_use]
    pub const fn current_source(&self) -> StorageSource {
        self.source
    }

    /// What would be loaded right now, without loading it.
    #[must_use]
    pub fn primary_source(&self, codec: &dyn ShareCodec) -> StorageSource {
        load_candidate(
            &self.storage,
            codec,
            self.puzzle_id,
            self.shape,
            self.link_payload.as_deref(),
        )
        .1
    }

    /// Hands the storage capability back, consuming the store.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn state_key(&self) -> String {
        state_key(self.puzzle_id)
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.state) {
            Ok(text) => self.storage.set(&self.state_key(), &text),
            Err(err) => error!("puzzle {}: state serialization failed: {err}", self.puzzle_id),
        }
    }
}

fn state_key(puzzle_id: u32) -> String {
    format!("{STATE_KEY_PREFIX}{puzzle_id}")
}

fn invalidate_on_format_change<S: KeyValueStore>(storage: &mut S) {
    let marker = storage.get(FORMAT_MARKER_KEY);
    if marker.as_deref() != Some(FORMAT_MARKER_VALUE) {
        if let Some(found) = marker {
            warn!("storage format marker {found:?} is stale, clearing all saved state");
        }
        storage.clear();
        storage.set(FORMAT_MARKER_KEY, FORMAT_MARKER_VALUE);
    }
}

fn load_candidate<S: KeyValueStore>(
    storage: &S,
    codec: &dyn ShareCodec,
    puzzle_id: u32,
    shape: StateShape,
    link_payload: Option<&str>,
) -> (PuzzleState, StorageSource) {
    if let Some(payload) = link_payload {
        match codec.decompress(payload) {
            Some(text) => match PuzzleState::parse_stored(&text, shape) {
                Ok(state) => return (state, StorageSource::FromLink),
                Err(err) => warn!("puzzle {puzzle_id}: shared state rejected: {err}"),
            },
            None => warn!("puzzle {puzzle_id}: shared payload failed to decompress"),
        }
    }
    if let Some(text) = storage.get(&state_key(puzzle_id)) {
        match PuzzleState::parse_stored(&text, shape) {
            Ok(state) => return (state, StorageSource::FromLocal),
            Err(err) => warn!("puzzle {puzzle_id}: saved state rejected: {err}"),
        }
    }
    (PuzzleState::fresh(shape), StorageSource::None)
}

#[cfg(test)]
mod tests {
    use crossword_core::{Coord, Dimensions, Direction};
    use proptest::prelude::*;

    use super::{
        FORMAT_MARKER_KEY, FORMAT_MARKER_VALUE, PersistenceStore, StorageSource, StoreError,
    };
    use crate::{
        share::PassthroughCodec,
        state::{PuzzleState, StateShape},
        storage::{KeyValueStore as _, MemoryStore},
    };

    const CODEC: PassthroughCodec = PassthroughCodec;

    fn shape(rows: usize, columns: usize, max_across: u16, max_down: u16) -> StateShape {
        StateShape {
            dimensions: Dimensions { rows, columns },
            max_across_id: max_across,
            max_down_id: max_down,
        }
    }

    fn open_fresh() -> PersistenceStore<MemoryStore> {
        PersistenceStore::open(MemoryStore::new(), &CODEC, 1, shape(3, 3, 2, 2), None)
    }

    #[test]
    fn fresh_open_has_no_source() {
        let store = open_fresh();
        assert_eq!(store.current_source(), StorageSource::None);
        assert_eq!(*store.state(), PuzzleState::fresh(shape(3, 3, 2, 2)));
    }

    #[test]
    fn letters_round_trip_and_clear() {
        let mut store = open_fresh();
        let coord = Coord::new(1, 2);

        store.set_letter(Some(coord), "ק").unwrap();
        assert_eq!(store.letter(coord).unwrap(), "ק");

        store.set_letter(Some(coord), "").unwrap();
        assert_eq!(store.letter(coord).unwrap(), "");
    }

    #[test]
    fn set_letter_none_is_noop() {
        let mut store = open_fresh();
        let before = store.state().clone();
        store.set_letter(None, "ק").unwrap();
        assert_eq!(*store.state(), before);
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut store = open_fresh();
        assert_eq!(
            store.letter(Coord::new(3, 0)),
            Err(StoreError::CoordOutOfBounds {
                coord: Coord::new(3, 0)
            })
        );
        assert_eq!(
            store.set_letter(Some(Coord::new(0, 3)), "ק"),
            Err(StoreError::CoordOutOfBounds {
                coord: Coord::new(0, 3)
            })
        );
        assert_eq!(
            store.set_letter(Some(Coord::new(0, 0)), "קר"),
            Err(StoreError::LetterTooLong {
                letter: "קר".to_string()
            })
        );
    }

    #[test]
    fn solved_flags_are_independent() {
        let mut store = open_fresh();

        store.set_clue_solved(1, Direction::Across, true).unwrap();
        assert_eq!(store.clue_solved(1, Direction::Across), Ok(true));
        assert_eq!(store.clue_solved(2, Direction::Across), Ok(false));
        assert_eq!(store.clue_solved(1, Direction::Down), Ok(false));

        store.set_clue_solved(1, Direction::Across, false).unwrap();
        assert_eq!(store.clue_solved(1, Direction::Across), Ok(false));

        assert_eq!(
            store.set_clue_solved(0, Direction::Down, true),
            Err(StoreError::ClueOutOfRange {
                id: 0,
                direction: Direction::Down
            })
        );
        assert_eq!(
            store.clue_solved(3, Direction::Across),
            Err(StoreError::ClueOutOfRange {
                id: 3,
                direction: Direction::Across
            })
        );
    }

    #[test]
    fn mutations_persist_immediately() {
        let mut store = open_fresh();
        store.set_letter(Some(Coord::new(0, 0)), "ק").unwrap();

        let reopened =
            PersistenceStore::open(store.into_storage(), &CODEC, 1, shape(3, 3, 2, 2), None);
        assert_eq!(reopened.current_source(), StorageSource::FromLocal);
        assert_eq!(reopened.letter(Coord::new(0, 0)).unwrap(), "ק");
    }

    #[test]
    fn link_state_wins_over_local() {
        let mut seeded = open_fresh();
        seeded.set_letter(Some(Coord::new(0, 0)), "ל").unwrap();
        let storage = seeded.into_storage();

        let mut shared = PuzzleState::fresh(shape(3, 3, 2, 2));
        shared.set_letter_at(Coord::new(0, 0), 'ק');
        let payload = serde_json::to_string(&shared).unwrap();

        let store = PersistenceStore::open(storage, &CODEC, 1, shape(3, 3, 2, 2), Some(payload));
        assert_eq!(store.current_source(), StorageSource::FromLink);
        assert_eq!(store.letter(Coord::new(0, 0)).unwrap(), "ק");
    }

    #[test]
    fn corrupted_link_falls_back_to_local() {
        let mut seeded = open_fresh();
        seeded.set_letter(Some(Coord::new(0, 0)), "ל").unwrap();
        let storage = seeded.into_storage();

        let store = PersistenceStore::open(
            storage,
            &CODEC,
            1,
            shape(3, 3, 2, 2),
            Some("{garbage".to_string()),
        );
        assert_eq!(store.current_source(), StorageSource::FromLocal);
        assert_eq!(store.letter(Coord::new(0, 0)).unwrap(), "ל");
    }

    #[test]
    fn corrupted_link_without_local_falls_back_to_fresh() {
        let store = PersistenceStore::open(
            MemoryStore::new(),
            &CODEC,
            1,
            shape(3, 3, 2, 2),
            Some("{garbage".to_string()),
        );
        assert_eq!(store.current_source(), StorageSource::None);
        assert_eq!(*store.state(), PuzzleState::fresh(shape(3, 3, 2, 2)));
    }

    #[test]
    fn mismatched_local_state_yields_fresh_none() {
        let mut seeded = PersistenceStore::open(
            MemoryStore::new(),
            &CODEC,
            1,
            shape(4, 4, 2, 2),
            None,
        );
        seeded.set_letter(Some(Coord::new(0, 0)), "ק").unwrap();
        let storage = seeded.into_storage();

        // Same puzzle id, different dimensions: the candidate is discarded.
        let store = PersistenceStore::open(storage, &CODEC, 1, shape(3, 3, 2, 2), None);
        assert_eq!(store.current_source(), StorageSource::None);
        assert_eq!(*store.state(), PuzzleState::fresh(shape(3, 3, 2, 2)));
    }

    #[test]
    fn legacy_local_state_is_migrated() {
        let mut storage = MemoryStore::new();
        storage.set(FORMAT_MARKER_KEY, FORMAT_MARKER_VALUE);
        storage.set("crossword_1", r#"[["א", "", ""], ["", "ב", ""], ["", "", "ג"]]"#);

        let store = PersistenceStore::open(storage, &CODEC, 1, shape(3, 3, 2, 2), None);
        assert_eq!(store.current_source(), StorageSource::FromLocal);
        assert_eq!(store.letter(Coord::new(0, 0)).unwrap(), "א");
        assert_eq!(store.letter(Coord::new(1, 1)).unwrap(), "ב");
        assert_eq!(store.letter(Coord::new(0, 1)).unwrap(), "");
        assert_eq!(store.clue_solved(1, Direction::Across), Ok(false));
    }

    #[test]
    fn stale_format_marker_clears_every_puzzle() {
        let mut storage = MemoryStore::new();
        storage.set(FORMAT_MARKER_KEY, "1");
        storage.set("crossword_1", "whatever");
        storage.set("crossword_2", "whatever");

        let store = PersistenceStore::open(storage, &CODEC, 1, shape(3, 3, 2, 2), None);
        assert_eq!(store.current_source(), StorageSource::None);

        let storage = store.into_storage();
        assert_eq!(
            storage.get(FORMAT_MARKER_KEY).as_deref(),
            Some(FORMAT_MARKER_VALUE)
        );
        assert_eq!(storage.get("crossword_2"), None);
    }

    #[test]
    fn force_flush_backs_up_and_promotes() {
        let mut seeded = open_fresh();
        seeded.set_letter(Some(Coord::new(0, 0)), "ל").unwrap();
        let local_before = seeded.into_storage().get("crossword_1").unwrap();

        let mut shared = PuzzleState::fresh(shape(3, 3, 2, 2));
        shared.set_letter_at(Coord::new(0, 0), 'ק');
        let payload = serde_json::to_string(&shared).unwrap();

        let mut storage = MemoryStore::new();
        storage.set(FORMAT_MARKER_KEY, FORMAT_MARKER_VALUE);
        storage.set("crossword_1", &local_before);
        let mut store =
            PersistenceStore::open(storage, &CODEC, 1, shape(3, 3, 2, 2), Some(payload));
        assert_eq!(store.current_source(), StorageSource::FromLink);

        store.force_flush();
        assert_eq!(store.current_source(), StorageSource::FromLocal);

        let storage = store.into_storage();
        assert_eq!(storage.get("crossword_1_backup"), Some(local_before));
        let imported: PuzzleState =
            serde_json::from_str(&storage.get("crossword_1").unwrap()).unwrap();
        assert_eq!(imported, shared);
    }

    #[test]
    fn primary_source_reflects_what_would_load() {
        let store = open_fresh();
        // A fresh open persisted nothing yet, so a reload would be fresh too.
        assert_eq!(store.primary_source(&CODEC), StorageSource::None);

        let mut store = store;
        store.set_letter(Some(Coord::new(0, 0)), "ק").unwrap();
        assert_eq!(store.primary_source(&CODEC), StorageSource::FromLocal);

        let shared = serde_json::to_string(&PuzzleState::fresh(shape(3, 3, 2, 2))).unwrap();
        let store = PersistenceStore::open(
            store.into_storage(),
            &CODEC,
            1,
            shape(3, 3, 2, 2),
            Some(shared),
        );
        assert_eq!(store.primary_source(&CODEC), StorageSource::FromLink);
        assert_eq!(store.current_source(), StorageSource::FromLink);
    }

    proptest! {
        #[test]
        fn letter_round_trips_everywhere(
            row in 0usize..3,
            col in 0usize..3,
            letter in proptest::char::range('א', 'ת'),
        ) {
            let mut store = open_fresh();
            let coord = Coord::new(row, col);
            store.set_letter(Some(coord), &letter.to_string()).unwrap();
            prop_assert_eq!(store.letter(coord).unwrap(), letter.to_string());
            store.set_letter(Some(coord), "").unwrap();
            prop_assert_eq!(store.letter(coord).unwrap(), "");
        }
    }
}
