#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Engine for a dice rolled rectangle territory game for two to four players.
//!
//! Players take turns rolling two dice and claiming a rectangle of that size
//! on a square board. The first rectangle goes into the player's corner, every
//! later one has to rest a whole side against the player's own territory. In a
//! two player game a territory that joins two opposite borders ends the game
//! at once and its owner takes every empty cell it has sealed off. Otherwise
//! the game ends when the board is full or nobody can place again, and the
//! player owning the most cells wins.
//!
//! [session::GameSession] is the entry point. It drives the [placement] rules,
//! the [connectivity] checks and the [bot] for games against the computer.
//! ```
//! use rectangle_battles::session::{GameSession, SessionConfig};
//!
//! let mut session = GameSession::start(SessionConfig::new(50, 2).with_seed(7)).unwrap();
//! let first = *session.valid_positions().iter().next().unwrap();
//! session.place_at(first).unwrap();
//! assert_eq!(session.current_player().0, 1);
//! ```

use grid::Grid;
use wire_representation::GridFixture;

pub mod bot;
pub mod connectivity;
pub mod grid;
pub mod piece_queue;
pub mod placement;
pub mod session;
pub mod types;
pub mod wire_representation;

/// Loads a board from a JSON fixture
pub fn grid_fixture(grid_fixture: &str) -> Grid {
    let g: Result<GridFixture, _> = serde_json::from_str(grid_fixture);
    g.expect("the json literal is valid")
        .into_grid()
        .expect("the fixture describes a square board")
}
