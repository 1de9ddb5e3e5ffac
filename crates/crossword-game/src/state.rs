//! Persisted puzzle state: wire format, legacy migration, validation.

use crossword_core::{ClueId, Coord, Dimensions, Direction};
use serde::{Deserialize, Serialize};

/// Character standing for "no letter" inside a persisted grid row.
pub const EMPTY_SENTINEL: char = '.';

/// Version tag written into freshly created and migrated states.
pub const STATE_VERSION: &str = "2";

/// The shape a stored state must have to be accepted for the current
/// puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateShape {
    /// Grid dimensions.
    pub dimensions: Dimensions,
    /// Largest across clue id (flag strings reserve slot 0, see below).
    pub max_across_id: ClueId,
    /// Largest down clue id.
    pub max_down_id: ClueId,
}

/// One puzzle's durable fill-in state.
///
/// `grid` holds one fixed-length string per row where every character is
/// either a letter or [`EMPTY_SENTINEL`]. The solved-flag strings are
/// indexed directly by the externally 1-based clue id, so their length is
/// `max_id + 1` and index 0 is a reserved slot that is never read or
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleState {
    /// Row-major fill, one string per row.
    pub grid: Vec<String>,
    /// `'0'`/`'1'` flag per across clue id.
    pub solved_across: String,
    /// `'0'`/`'1'` flag per down clue id.
    pub solved_down: String,
    /// Struct version tag.
    pub version: String,
}

/// Reasons a stored candidate state is rejected.
///
/// These are never surfaced to the player; the store logs them and falls
/// through to the next state source.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    /// The payload is not valid JSON in either the modern or legacy shape.
    #[display("stored state is not valid JSON")]
    Malformed,
    /// The stored grid has the wrong number of rows.
    #[display("stored grid has {found} rows, puzzle has {expected}")]
    RowCountMismatch {
        /// Rows in the stored grid.
        found: usize,
        /// Rows in the current puzzle.
        expected: usize,
    },
    /// The stored grid's first row has the wrong number of cells.
    #[display("stored row holds {found} cells, puzzle has {expected} columns")]
    RowLengthMismatch {
        /// Characters in the stored first row.
        found: usize,
        /// Columns in the current puzzle.
        expected: usize,
    },
    /// A solved-flag string does not match the current clue id range.
    #[display("{direction:?} solved flags hold {found} slots, puzzle needs {expected}")]
    SolvedLengthMismatch {
        /// Direction whose flag string is off.
        direction: Direction,
        /// Slots in the stored flag string.
        found: usize,
        /// Slots the current puzzle needs (`max_id + 1`).
        expected: usize,
    },
}

/// Stored payloads are accepted in the modern struct shape or in the
/// legacy array-of-rows-of-characters shape (read only, migrated on load).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPayload {
    Modern(PuzzleState),
    Legacy(Vec<Vec<String>>),
}

impl PuzzleState {
    /// An all-empty state for a puzzle of the given shape.
    #[must_use]
    pub fn fresh(shape: StateShape) -> Self {
        let row = String::from(EMPTY_SENTINEL).repeat(shape.dimensions.columns);
        Self {
            grid: vec![row; shape.dimensions.rows],
            solved_across: "0".repeat(usize::from(shape.max_across_id) + 1),
            solved_down: "0".repeat(usize::from(shape.max_down_id) + 1),
            version: STATE_VERSION.to_string(),
        }
    }

    /// Migrates the legacy array-of-rows format into the modern struct.
    ///
    /// Each row's single-character cells are joined into one string, with
    /// the structural empty (`""`) mapped to [`EMPTY_SENTINEL`]. Solved
    /// flags did not exist in the legacy format and start out all-clear.
    /// This is a read-path-only transform; states are never written back
    /// in the legacy shape.
    #[must_use]
    pub fn from_legacy_rows(rows: &[Vec<String>], shape: StateShape) -> Self {
        let grid = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let mut chars = cell.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => c,
                            _ => EMPTY_SENTINEL,
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            grid,
            ..Self::fresh(shape)
        }
    }

    /// Parses a stored payload and validates it against `shape`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the payload is malformed or does not
    /// fit the current puzzle; the caller falls through to the next state
    /// source.
    pub fn parse_stored(text: &str, shape: StateShape) -> Result<Self, LoadError> {
        let state = match serde_json::from_str(text) {
            Ok(StoredPayload::Modern(state)) => state,
            Ok(StoredPayload::Legacy(rows)) => Self::from_legacy_rows(&rows, shape),
            Err(_) => return Err(LoadError::Malformed),
        };
        state.validate(shape)?;
        Ok(state)
    }

    /// Checks this state against the current puzzle's shape.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch found.
    pub fn validate(&self, shape: StateShape) -> Result<(), LoadError> {
        if self.grid.len() != shape.dimensions.rows {
            return Err(LoadError::RowCountMismatch {
                found: self.grid.len(),
                expected: shape.dimensions.rows,
            });
        }
        if let Some(first) = self.grid.first() {
            let found = first.chars().count();
            if found != shape.dimensions.columns {
                return Err(LoadError::RowLengthMismatch {
                    found,
                    expected: shape.dimensions.columns,
                });
            }
        }
        let expected = usize::from(shape.max_across_id) + 1;
        let found = self.solved_across.chars().count();
        if found != expected {
            return Err(LoadError::SolvedLengthMismatch {
                direction: Direction::Across,
                found,
                expected,
            });
        }
        let expected = usize::from(shape.max_down_id) + 1;
        let found = self.solved_down.chars().count();
        if found != expected {
            return Err(LoadError::SolvedLengthMismatch {
                direction: Direction::Down,
                found,
                expected,
            });
        }
        Ok(())
    }

    /// The character stored at `coord`, sentinel included. `None` when
    /// `coord` falls outside the stored grid.
    #[must_use]
    pub fn letter_at(&self, coord: Coord) -> Option<char> {
        self.grid.get(coord.row)?.chars().nth(coord.col)
    }

    /// Replaces the character stored at `coord`. Returns `false` when
    /// `coord` falls outside the stored grid.
    pub fn set_letter_at(&mut self, coord: Coord, letter: char) -> bool {
        let Some(row) = self.grid.get_mut(coord.row) else {
            return false;
        };
        let mut chars: Vec<char> = row.chars().collect();
        let Some(slot) = chars.get_mut(coord.col) else {
            return false;
        };
        *slot = letter;
        *row = chars.into_iter().collect();
        true
    }

    /// The solved flag for `id` in `direction`. `None` when `id` is 0 or
    /// beyond the flag string.
    #[must_use]
    pub fn solved_flag(&self, direction: Direction, id: ClueId) -> Option<bool> {
        if id == 0 {
            return None;
        }
        let flags = match direction {
            Direction::Across => &self.solved_across,
            Direction::Down => &self.solved_down,
        };
        flags.chars().nth(usize::from(id)).map(|flag| flag == '1')
    }

    /// Sets the solved flag for `id` in `direction`. Returns `false` when
    /// `id` is 0 or beyond the flag string.
    pub fn set_solved_flag(&mut self, direction: Direction, id: ClueId, solved: bool) -> bool {
        if id == 0 {
            return false;
        }
        let flags = match direction {
            Direction::Across => &mut self.solved_across,
            Direction::Down => &mut self.solved_down,
        };
        let mut chars: Vec<char> = flags.chars().collect();
        let Some(slot) = chars.get_mut(usize::from(id)) else {
            return false;
        };
        *slot = if solved { '1' } else { '0' };
        *flags = chars.into_iter().collect();
        true
    }
}

#[cfg(test)]
mod tests {
    use crossword_core::{Coord, Dimensions, Direction};

    use super::{LoadError, PuzzleState, StateShape, STATE_VERSION};

    fn shape(rows: usize, columns: usize, max_across: u16, max_down: u16) -> StateShape {
        StateShape {
            dimensions: Dimensions { rows, columns },
            max_across_id: max_across,
            max_down_id: max_down,
        }
    }

    #[test]
    fn fresh_state_matches_shape() {
        let state = PuzzleState::fresh(shape(2, 3, 4, 2));
        assert_eq!(state.grid, vec!["...".to_string(), "...".to_string()]);
        assert_eq!(state.solved_across, "00000");
        assert_eq!(state.solved_down, "000");
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.validate(shape(2, 3, 4, 2)), Ok(()));
    }

    #[test]
    fn wire_format_uses_camel_case_names() {
        let state = PuzzleState::fresh(shape(1, 1, 1, 1));
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"solvedAcross\""));
        assert!(json.contains("\"solvedDown\""));
        assert!(json.contains("\"grid\""));
        assert!(json.contains("\"version\""));
    }

    #[test]
    fn parses_modern_payload() {
        let json = r#"{
            "grid": ["אב", ".."],
            "solvedAcross": "01",
            "solvedDown": "00",
            "version": "2"
        }"#;
        let state = PuzzleState::parse_stored(json, shape(2, 2, 1, 1)).unwrap();
        assert_eq!(state.letter_at(Coord::new(0, 1)), Some('ב'));
        assert_eq!(state.solved_flag(Direction::Across, 1), Some(true));
    }

    #[test]
    fn migrates_legacy_rows_preserving_letters() {
        let json = r#"[["א", "", "ב"], ["", "ג", ""]]"#;
        let state = PuzzleState::parse_stored(json, shape(2, 3, 2, 1)).unwrap();
        assert_eq!(state.grid, vec!["א.ב".to_string(), ".ג.".to_string()]);
        assert_eq!(state.solved_across, "000");
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(
            PuzzleState::parse_stored("not json", shape(1, 1, 1, 1)),
            Err(LoadError::Malformed)
        );
        assert_eq!(
            PuzzleState::parse_stored("{\"grid\": 3}", shape(1, 1, 1, 1)),
            Err(LoadError::Malformed)
        );
    }

    #[test]
    fn rejects_shape_mismatches() {
        let state = PuzzleState::fresh(shape(2, 2, 2, 2));
        assert_eq!(
            state.validate(shape(3, 2, 2, 2)),
            Err(LoadError::RowCountMismatch {
                found: 2,
                expected: 3
            })
        );
        assert_eq!(
            state.validate(shape(2, 4, 2, 2)),
            Err(LoadError::RowLengthMismatch {
                found: 2,
                expected: 4
            })
        );
        assert_eq!(
            state.validate(shape(2, 2, 5, 2)),
            Err(LoadError::SolvedLengthMismatch {
                direction: Direction::Across,
                found: 3,
                expected: 6
            })
        );
        assert_eq!(
            state.validate(shape(2, 2, 2, 5)),
            Err(LoadError::SolvedLengthMismatch {
                direction: Direction::Down,
                found: 3,
                expected: 6
            })
        );
    }

    #[test]
    fn letters_round_trip_through_rows() {
        let mut state = PuzzleState::fresh(shape(2, 2, 1, 1));
        assert!(state.set_letter_at(Coord::new(1, 0), 'ש'));
        assert_eq!(state.letter_at(Coord::new(1, 0)), Some('ש'));
        assert_eq!(state.letter_at(Coord::new(1, 1)), Some('.'));
        assert!(!state.set_letter_at(Coord::new(2, 0), 'ש'));
        assert!(!state.set_letter_at(Coord::new(0, 2), 'ש'));
        assert_eq!(state.letter_at(Coord::new(0, 2)), None);
    }

    #[test]
    fn solved_flags_reserve_slot_zero() {
        let mut state = PuzzleState::fresh(shape(1, 1, 3, 3));
        assert_eq!(state.solved_flag(Direction::Across, 0), None);
        assert!(!state.set_solved_flag(Direction::Across, 0, true));

        assert!(state.set_solved_flag(Direction::Across, 3, true));
        assert_eq!(state.solved_flag(Direction::Across, 3), Some(true));
        assert_eq!(state.solved_flag(Direction::Across, 1), Some(false));
        assert_eq!(state.solved_flag(Direction::Down, 3), Some(false));
        assert_eq!(state.solved_across, "0001");

        assert!(!state.set_solved_flag(Direction::Down, 4, true));
        assert_eq!(state.solved_flag(Direction::Down, 4), None);
    }
}
