#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod coords;
pub mod game;
pub mod players;
pub mod types;

pub use board::Board;
pub use coords::{Coord, Direction};
pub use game::{
    ACTION_SPACE, ActionSet, Game, GameError, GameState, LoggedMove, MoveAction, PLACEMENT_SPACE,
    Snapshot, replay,
};
pub use types::{Outcome, Player, WorkerId, WorkerSlot};
