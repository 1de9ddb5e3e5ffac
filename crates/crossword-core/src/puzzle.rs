//! External puzzle definition and listing formats.
//!
//! These types mirror the JSON produced by the puzzle pipeline. They are
//! consumed as-is and never written back, so only `Deserialize` is derived.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::coord::Dimensions;

/// Externally assigned clue identifier. Ids are 1-based; 0 never names a
/// clue and is kept as a reserved slot by the persisted solved-flag strings.
pub type ClueId = u16;

/// A puzzle as delivered by the external pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleDefinition {
    /// Stable puzzle id, also the key under which progress is persisted.
    pub id: u32,
    /// Display-only author credit.
    #[serde(default)]
    pub author: String,
    /// Declared grid size; the `grid` matrix must agree with it.
    pub dimensions: Dimensions,
    /// Row-major cell markers: `""` is a plain open cell, `"#"` a blocked
    /// cell, any other string the clue id anchored at that cell.
    pub grid: Vec<Vec<String>>,
    /// Clue texts keyed by id, per direction.
    pub definitions: ClueTexts,
    /// Digest of the canonical solution serialization, when published.
    #[serde(default)]
    pub sol_hash: Option<String>,
    /// Full solution matrix, when published.
    #[serde(default)]
    pub sol_grid: Option<Vec<Vec<String>>>,
}

/// Clue texts per direction, keyed by clue id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClueTexts {
    /// Across clues.
    pub across: BTreeMap<ClueId, String>,
    /// Down clues.
    pub down: BTreeMap<ClueId, String>,
}

impl ClueTexts {
    /// Largest across clue id, or 0 when there are none.
    #[must_use]
    pub fn max_across_id(&self) -> ClueId {
        self.across.keys().next_back().copied().unwrap_or(0)
    }

    /// Largest down clue id, or 0 when there are none.
    #[must_use]
    pub fn max_down_id(&self) -> ClueId {
        self.down.keys().next_back().copied().unwrap_or(0)
    }
}

/// Index of available puzzles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PuzzleListing {
    /// Ids of the puzzles the pipeline currently serves.
    pub ids: Vec<u32>,
}
