//! Renderer-facing glue for the crossword player.
//!
//! This crate wires the load-time structures of `crossword-core` and the
//! session state of `crossword-game` behind an explicit input-event API, so
//! any host (browser shell, test harness, headless driver) can run a puzzle
//! without this workspace knowing its rendering primitives.
//!
//! Input arrives as [`action::Action`] values, is applied by
//! [`action_handler::handle_all`], and the resulting picture is re-queried
//! as view models built from scratch by [`view_model`].
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod action;
pub mod action_handler;
pub mod session;
pub mod source;
pub mod view_model;

// Re-export commonly used types
pub use self::{
    action::{Action, ActionRequestQueue},
    session::{Session, SolutionCheck},
    source::{LoadedView, PuzzleSource, SourceError, StaticSource},
    view_model::{CellVisual, GameScreenViewModel},
};
