//! The external puzzle-fetch collaborator and the load flow built on it.

use std::collections::BTreeMap;

use crossword_core::{PuzzleDefinition, PuzzleListing};
use crossword_game::{KeyValueStore, ShareCodec, SolutionDigest};
use log::warn;

use crate::session::Session;

/// Errors surfaced by a puzzle source.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SourceError {
    /// The fetch did not complete (network failure, missing file).
    #[display("puzzle source unavailable: {reason}")]
    Unavailable {
        reason: String,
    },
    /// The fetched payload could not be parsed.
    #[display("puzzle payload malformed: {reason}")]
    Malformed {
        reason: String,
    },
}

/// Delivers puzzle definitions and the listing of available puzzles.
///
/// Lives outside this workspace in production (a network fetch or a static
/// file); [`StaticSource`] serves tests and headless runs.
pub trait PuzzleSource {
    /// The definition of puzzle `id`.
    ///
    /// # Errors
    ///
    /// [`SourceError`] when the puzzle cannot be delivered.
    fn puzzle(&self, id: u32) -> Result<PuzzleDefinition, SourceError>;

    /// The listing of available puzzle ids.
    ///
    /// # Errors
    ///
    /// [`SourceError`] when the listing cannot be delivered.
    fn listing(&self) -> Result<PuzzleListing, SourceError>;
}

/// In-memory [`PuzzleSource`] over a fixed set of definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    puzzles: BTreeMap<u32, PuzzleDefinition>,
}

impl StaticSource {
    #[must_use]
    pub fn new(puzzles: impl IntoIterator<Item = PuzzleDefinition>) -> Self {
        Self {
            puzzles: puzzles.into_iter().map(|def| (def.id, def)).collect(),
        }
    }
}

impl PuzzleSource for StaticSource {
    fn puzzle(&self, id: u32) -> Result<PuzzleDefinition, SourceError> {
        self.puzzles
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable {
                reason: format!("no puzzle {id}"),
            })
    }

    fn listing(&self) -> Result<PuzzleListing, SourceError> {
        Ok(PuzzleListing {
            ids: self.puzzles.keys().copied().collect(),
        })
    }
}

/// What the load flow produced: a playable session, or the listing to show
/// instead.
#[derive(Debug)]
pub enum LoadedView<S> {
    Puzzle(Box<Session<S>>),
    Listing(PuzzleListing),
}

/// Loads puzzle `puzzle_id` and wires a session around it.
///
/// A failed fetch or an inconsistent definition degrades to the listing
/// view on this single attempt; nothing is retried.
///
/// # Errors
///
/// Returns an error only when the listing fallback itself fails.
pub fn load_view<S: KeyValueStore>(
    source: &dyn PuzzleSource,
    storage: S,
    codec: &dyn ShareCodec,
    digest: Box<dyn SolutionDigest>,
    puzzle_id: u32,
    link_payload: Option<String>,
) -> Result<LoadedView<S>, SourceError> {
    let definition = match source.puzzle(puzzle_id) {
        Ok(definition) => definition,
        Err(err) => {
            warn!("puzzle {puzzle_id} fetch failed ({err}), showing the listing");
            return source.listing().map(LoadedView::Listing);
        }
    };
    match Session::new(definition, storage, codec, digest, link_payload) {
        Ok(session) => Ok(LoadedView::Puzzle(Box::new(session))),
        Err(err) => {
            warn!("puzzle {puzzle_id} definition rejected ({err}), showing the listing");
            source.listing().map(LoadedView::Listing)
        }
    }
}

#[cfg(test)]
mod tests {
    use crossword_core::PuzzleDefinition;
    use crossword_game::{MemoryStore, PassthroughCodec, Sha256Digest};

    use super::{LoadedView, PuzzleSource as _, StaticSource, load_view};

    fn tiny_definition(id: u32) -> PuzzleDefinition {
        serde_json::from_str(&format!(
            r##"{{
                "id": {id},
                "dimensions": {{"rows": 1, "columns": 2}},
                "grid": [["1", ""]],
                "definitions": {{"across": {{"1": "word"}}, "down": {{}}}}
            }}"##
        ))
        .unwrap()
    }

    #[test]
    fn serves_known_puzzles_and_the_listing() {
        let source = StaticSource::new([tiny_definition(1), tiny_definition(4)]);
        assert_eq!(source.puzzle(4).unwrap().id, 4);
        assert!(source.puzzle(2).is_err());
        assert_eq!(source.listing().unwrap().ids, vec![1, 4]);
    }

    #[test]
    fn load_view_wires_a_session() {
        let source = StaticSource::new([tiny_definition(1)]);
        let view = load_view(
            &source,
            MemoryStore::new(),
            &PassthroughCodec,
            Box::new(Sha256Digest),
            1,
            None,
        )
        .unwrap();
        match view {
            LoadedView::Puzzle(session) => assert_eq!(session.definition().id, 1),
            LoadedView::Listing(_) => panic!("expected a session"),
        }
    }

    #[test]
    fn missing_puzzle_degrades_to_listing() {
        let source = StaticSource::new([tiny_definition(1)]);
        let view = load_view(
            &source,
            MemoryStore::new(),
            &PassthroughCodec,
            Box::new(Sha256Digest),
            9,
            None,
        )
        .unwrap();
        match view {
            LoadedView::Listing(listing) => assert_eq!(listing.ids, vec![1]),
            LoadedView::Puzzle(_) => panic!("expected the listing"),
        }
    }
}
