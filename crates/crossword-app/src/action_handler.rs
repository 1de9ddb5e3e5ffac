use crossword_core::alphabet;
use crossword_game::KeyValueStore;
use log::warn;

use crate::{
    action::{Action, ActionRequestQueue},
    session::Session,
};

/// Applies every queued action in order.
pub fn handle_all<S: KeyValueStore>(session: &mut Session<S>, queue: &mut ActionRequestQueue) {
    for action in queue.take_all() {
        handle(session, action);
    }
}

/// Applies one action.
///
/// Navigation is always allowed; anything that edits the fill or the
/// solved flags is ignored while the session is a read-only shared view.
/// The import action is the one mutation that stays enabled there, since
/// it is how a shared view becomes editable.
pub fn handle<S: KeyValueStore>(session: &mut Session<S>, action: Action) {
    match action {
        Action::Click(coord) => {
            session
                .navigator
                .click(&session.layout, &session.clues, coord);
        }
        Action::SelectDefinition { id, direction } => {
            session
                .navigator
                .select_definition(&session.layout, &session.clues, id, direction);
        }
        Action::TypeLetter(letter) => type_letter(session, letter),
        Action::Delete => clear_active(session, false),
        Action::Backspace => clear_active(session, true),
        Action::SetClueSolved {
            id,
            direction,
            solved,
        } => {
            if session.read_only() {
                return;
            }
            if let Err(err) = session.store.set_clue_solved(id, direction, solved) {
                warn!("solved toggle rejected: {err}");
            }
        }
        Action::ImportSharedState => {
            if session.can_import() {
                session.store.force_flush();
            }
        }
        Action::CheckSolution => session.check_solution(),
    }
}

fn type_letter<S: KeyValueStore>(session: &mut Session<S>, letter: char) {
    if session.read_only() || !alphabet::is_grid_letter(letter) {
        return;
    }
    let active = session.navigator.active();
    if let Err(err) = session.store.set_letter(active, &letter.to_string()) {
        warn!("letter entry rejected: {err}");
        return;
    }
    session.navigator.advance(&session.layout);
}

fn clear_active<S: KeyValueStore>(session: &mut Session<S>, retreat: bool) {
    if session.read_only() {
        return;
    }
    let active = session.navigator.active();
    if let Err(err) = session.store.set_letter(active, "") {
        warn!("clear rejected: {err}");
        return;
    }
    if retreat {
        session.navigator.retreat(&session.layout);
    }
}
