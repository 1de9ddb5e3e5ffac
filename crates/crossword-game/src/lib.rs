//! Mutable session state for the crossword player.
//!
//! Everything in this crate changes while a puzzle is being solved, in
//! contrast to the load-time structures of `crossword-core`:
//!
//! 1. **Persisted fill** - [`state`]: the [`PuzzleState`] wire struct, its
//!    legacy-format migration, and shape validation against the current
//!    puzzle.
//! 2. **Storage capability** - [`storage`]: the [`KeyValueStore`] trait the
//!    store persists through, with an in-memory implementation for tests
//!    and headless runs.
//! 3. **External collaborators** - [`share`] and [`digest`]: opaque
//!    compression and solution-hash interfaces.
//! 4. **Store** - [`store`]: [`PersistenceStore`], which reconciles
//!    link-embedded, locally saved and fresh state, tracks provenance, and
//!    writes back on every mutation.
//! 5. **Navigation** - [`navigation`]: [`Navigator`], the active-cell /
//!    active-direction state machine with run highlighting.

pub mod digest;
pub mod navigation;
pub mod share;
pub mod state;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use self::{
    digest::{Sha256Digest, SolutionDigest},
    navigation::{ClickContext, Navigator, RunHighlight},
    share::{PassthroughCodec, ShareCodec},
    state::{EMPTY_SENTINEL, LoadError, PuzzleState, StateShape},
    storage::{KeyValueStore, MemoryStore},
    store::{PersistenceStore, StorageSource, StoreError},
};
