//! Core data structures for the crossword player.
//!
//! This crate holds everything about a puzzle that is fixed once it has been
//! loaded: the external definition format, the grid layout derived from it,
//! and the clue index used for navigation. Mutable session state (the fill,
//! solved flags, the active cell) lives in `crossword-game`.
//!
//! # Overview
//!
//! 1. **Coordinates** - [`coord`]: [`Coord`], [`Dimensions`] and
//!    [`Direction`]. Across runs are read right-to-left (the column index
//!    decreases along the reading order), down runs top-to-bottom.
//! 2. **Definitions** - [`puzzle`]: serde models for the puzzle and listing
//!    JSON consumed from the outside.
//! 3. **Layout** - [`layout`]: [`GridLayout`] (blocked/open cells, clue
//!    anchors) and [`ClueIndex`], both built in a single row-major pass over
//!    the definition matrix and immutable afterwards.
//! 4. **Alphabet** - [`alphabet`]: the predicate deciding which characters
//!    may be typed into an open cell.
//!
//! # Examples
//!
//! ```
//! use crossword_core::{Coord, Direction, GridLayout, PuzzleDefinition};
//!
//! let def: PuzzleDefinition = serde_json::from_str(
//!     r##"{
//!         "id": 1,
//!         "author": "",
//!         "dimensions": {"rows": 1, "columns": 2},
//!         "grid": [["1", ""]],
//!         "definitions": {"across": {"1": "clue text"}, "down": {}}
//!     }"##,
//! )
//! .unwrap();
//! let (layout, clues) = GridLayout::from_definition(&def).unwrap();
//! assert!(layout.is_open(Coord::new(0, 1)));
//! assert_eq!(
//!     clues.entry(1).unwrap().directions,
//!     vec![Direction::Across]
//! );
//! ```

pub mod alphabet;
pub mod coord;
pub mod layout;
pub mod puzzle;

// Re-export commonly used types
pub use self::{
    coord::{Coord, Dimensions, Direction},
    layout::{Cell, ClueEntry, ClueIndex, GridLayout, LayoutError},
    puzzle::{ClueId, ClueTexts, PuzzleDefinition, PuzzleListing},
};
