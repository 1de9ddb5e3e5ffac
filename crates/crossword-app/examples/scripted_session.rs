//! Example driving a full crossword session without a UI toolkit.
//!
//! This example shows how to:
//! - Load a puzzle through a `PuzzleSource` with the listing fallback
//! - Replay clicks and keystrokes through the action handler
//! - Render the resulting view model as text
//! - Produce a share payload and import it into a second session
//!
//! # Usage
//!
//! ```sh
//! cargo run --example scripted_session
//! ```

use crossword_app::{
    Action, LoadedView, Session, StaticSource,
    action_handler::handle,
    source::load_view,
    view_model::{CellVisual, GameScreenViewModel, build_game_screen_view_model},
};
use crossword_core::{Coord, PuzzleDefinition};
use crossword_game::{MemoryStore, PassthroughCodec, Sha256Digest};

const PUZZLE_JSON: &str = r##"{
    "id": 1,
    "author": "scripted",
    "dimensions": {"rows": 3, "columns": 3},
    "grid": [["2", "", "1"], ["", "", ""], ["#", "", ""]],
    "definitions": {
        "across": {"1": "greeting, read right to left"},
        "down": {"2": "first two letters again"}
    }
}"##;

fn main() {
    env_logger::init();

    let definition: PuzzleDefinition =
        serde_json::from_str(PUZZLE_JSON).expect("bundled puzzle parses");
    let source = StaticSource::new([definition]);

    let view = load_view(
        &source,
        MemoryStore::new(),
        &PassthroughCodec,
        Box::new(Sha256Digest),
        1,
        None,
    )
    .expect("the bundled source never fails");
    let mut session = match view {
        LoadedView::Puzzle(session) => *session,
        LoadedView::Listing(listing) => {
            println!("Puzzle missing, listing instead: {:?}", listing.ids);
            return;
        }
    };

    // Click the across anchor and type a word; across runs right-to-left,
    // so the letters walk from column 2 towards column 0.
    handle(&mut session, Action::Click(Coord::new(0, 2)));
    for letter in ['ש', 'ל', 'ם'] {
        handle(&mut session, Action::TypeLetter(letter));
    }

    println!("After typing:");
    print_screen(&build_game_screen_view_model(&session));

    let payload = session
        .share_payload(&PassthroughCodec)
        .expect("state serializes");
    println!("Share payload: {payload}");
    println!();

    // Open the payload the way a link recipient would: a read-only view
    // over its own (empty) local storage.
    let definition: PuzzleDefinition =
        serde_json::from_str(PUZZLE_JSON).expect("bundled puzzle parses");
    let mut shared = Session::new(
        definition,
        MemoryStore::new(),
        &PassthroughCodec,
        Box::new(Sha256Digest),
        Some(payload),
    )
    .expect("bundled puzzle is consistent");

    println!("Shared view (read-only: {}):", shared.read_only());
    print_screen(&build_game_screen_view_model(&shared));

    handle(&mut shared, Action::ImportSharedState);
    println!("After import (read-only: {}):", shared.read_only());
}

fn print_screen(vm: &GameScreenViewModel) {
    for row in 0..vm.grid.dimensions.rows {
        let mut line = String::from("  ");
        for col in 0..vm.grid.dimensions.columns {
            let cell = vm.grid.cell(Coord::new(row, col));
            if cell.visual.contains(CellVisual::BLOCKED) {
                line.push('#');
            } else if cell.letter.is_empty() {
                line.push('.');
            } else {
                line.push_str(&cell.letter);
            }
            line.push(' ');
        }
        println!("{line}");
    }
    for clue in vm.clues.across.iter().chain(&vm.clues.down) {
        let strike = if clue.solved { "x" } else { " " };
        println!("  [{strike}] {:?} {}: {}", clue.direction, clue.id, clue.text);
    }
    println!();
}
