use crate::types::WorkerId;

pub mod action;
pub mod game;
pub mod legal;
pub mod snapshot;
pub mod state;

pub use action::{ACTION_SPACE, ActionSet, MoveAction, PLACEMENT_SPACE};
pub use game::Game;
pub use snapshot::{LoggedMove, SNAPSHOT_VERSION, Snapshot, replay};
pub use state::{GameState, HistoryEntry};

/// Everything the engine can reject with. All variants are recoverable by
/// the caller; the engine never mutates state on a failing call.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("action {0} outside the valid range for the current phase")]
    InvalidAction(usize),
    #[error("placement {0} is not legal in the current position")]
    IllegalPlacement(usize),
    #[error("move {0} is not legal in the current position")]
    IllegalMove(usize),
    #[error("game already ended")]
    GameAlreadyEnded,
    #[error("worker {0} not found on board")]
    WorkerNotFound(WorkerId),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("malformed board: {0}")]
    MalformedBoard(&'static str),
    #[error("inconsistent history at move {index}: {reason}")]
    InconsistentHistory { index: usize, reason: String },
}
