use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{Board, MAX_LEVEL, MAX_ROUND};
use crate::coords::{Coord, GRID_SIZE};
use crate::game::GameError;
use crate::game::state::{GameState, HistoryEntry};
use crate::types::{Player, WorkerId};

/// The one wire version this build reads and writes.
pub const SNAPSHOT_VERSION: u32 = 1;

const CHANNELS: usize = 3;

/// The sole persisted/transmitted representation of engine state.
///
/// The board travels as 5x5x3 signed channels `[worker, level, meta]`, with
/// the round counter tucked into the origin cell's meta channel. History
/// entries are loosely typed on purpose: a single corrupt entry must not
/// take the whole snapshot down with it. The `outcome` and `legal_actions`
/// fields are written for collaborators to read but never trusted on load;
/// [`Snapshot::restore`] recomputes both from the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub current_player: u8,
    pub board: Vec<Vec<Vec<i8>>>,
    pub history: Vec<Value>,
    pub outcome: [i8; 2],
    pub legal_actions: Vec<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryEntryWire {
    player: u8,
    board: Vec<Vec<Vec<i8>>>,
    action: Option<u32>,
}

impl Snapshot {
    /// Pure and total: capturing never fails.
    pub fn capture(state: &GameState) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            current_player: state.current_player().index() as u8,
            board: board_to_cells(state.board()),
            history: state
                .history()
                .iter()
                .map(|entry| {
                    let wire = HistoryEntryWire {
                        player: entry.player.index() as u8,
                        board: board_to_cells(&entry.board),
                        action: entry.action.map(|action| action as u32),
                    };
                    serde_json::to_value(&wire).unwrap_or(Value::Null)
                })
                .collect(),
            outcome: state.outcome().pair(),
            legal_actions: state.legal_actions().to_mask(),
        }
    }

    /// Rebuild an engine from the snapshot.
    ///
    /// Envelope problems fail hard: a version mismatch is
    /// `UnsupportedVersion`, any board shape or value-range violation is
    /// `MalformedBoard`. Individual history entries that fail to parse are
    /// silently dropped, keeping partially-corrupt logs replayable. The
    /// legal cache and outcome are recomputed, never read back.
    pub fn restore(&self) -> Result<GameState, GameError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(GameError::UnsupportedVersion(self.version));
        }
        let current_player = Player::from_index(self.current_player as usize)
            .ok_or(GameError::MalformedBoard("current player must be 0 or 1"))?;
        let board = board_from_cells(&self.board)?;

        let mut history = Vec::with_capacity(self.history.len());
        for value in &self.history {
            let Ok(wire) = serde_json::from_value::<HistoryEntryWire>(value.clone()) else {
                continue;
            };
            let Some(player) = Player::from_index(wire.player as usize) else {
                continue;
            };
            let Ok(entry_board) = board_from_cells(&wire.board) else {
                continue;
            };
            history.push(HistoryEntry {
                player,
                board: entry_board,
                action: wire.action.map(|action| action as usize),
            });
        }

        Ok(GameState::from_parts(board, current_player, history))
    }
}

fn board_to_cells(board: &Board) -> Vec<Vec<Vec<i8>>> {
    (0..GRID_SIZE)
        .map(|row| {
            (0..GRID_SIZE)
                .map(|col| {
                    let coord = Coord::new(row, col);
                    let worker = board
                        .worker_at(coord)
                        .map(WorkerId::to_signed)
                        .unwrap_or(0);
                    let meta = if row == 0 && col == 0 {
                        board.round() as i8
                    } else {
                        0
                    };
                    vec![worker, board.level_at(coord) as i8, meta]
                })
                .collect()
        })
        .collect()
}

fn board_from_cells(cells: &[Vec<Vec<i8>>]) -> Result<Board, GameError> {
    if cells.len() != GRID_SIZE {
        return Err(GameError::MalformedBoard("expected 5 rows"));
    }
    let mut occupancy = [[None; GRID_SIZE]; GRID_SIZE];
    let mut levels = [[0u8; GRID_SIZE]; GRID_SIZE];
    let mut round = 0u8;
    for (row, cols) in cells.iter().enumerate() {
        if cols.len() != GRID_SIZE {
            return Err(GameError::MalformedBoard("expected 5 columns per row"));
        }
        for (col, channels) in cols.iter().enumerate() {
            if channels.len() != CHANNELS {
                return Err(GameError::MalformedBoard("expected 3 channels per cell"));
            }
            let (worker, level, meta) = (channels[0], channels[1], channels[2]);
            occupancy[row][col] = match worker {
                0 => None,
                value => Some(
                    WorkerId::from_signed(value)
                        .ok_or(GameError::MalformedBoard("worker id out of range"))?,
                ),
            };
            if !(0..=MAX_LEVEL as i8).contains(&level) {
                return Err(GameError::MalformedBoard("level out of range"));
            }
            levels[row][col] = level as u8;
            if row == 0 && col == 0 {
                if !(0..=MAX_ROUND as i8).contains(&meta) {
                    return Err(GameError::MalformedBoard("round counter out of range"));
                }
                round = meta as u8;
            }
        }
    }

    // Worker identities must be unique for find_worker to mean anything.
    let mut seen: Vec<WorkerId> = Vec::with_capacity(4);
    for id in occupancy.iter().flatten().flatten() {
        if seen.contains(id) {
            return Err(GameError::MalformedBoard("duplicate worker id"));
        }
        seen.push(*id);
    }

    Ok(Board::from_grids(occupancy, levels, round))
}

/// One entry of a persisted move log: the move's position in the log and
/// the action id that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedMove {
    pub index: usize,
    pub action: usize,
}

/// Replay a persisted move log on top of `start`.
///
/// Moves must arrive in strict index order with no gaps, each index equal
/// to the running move count. Any gap, and any historical action the engine
/// rejects, aborts with `InconsistentHistory`; `start` itself is never
/// touched.
pub fn replay(start: &GameState, log: &[LoggedMove]) -> Result<GameState, GameError> {
    let mut state = start.clone();
    for entry in log {
        let expected = state.move_count();
        if entry.index != expected {
            return Err(GameError::InconsistentHistory {
                index: entry.index,
                reason: format!("expected move index {expected}"),
            });
        }
        state
            .apply_action(entry.action)
            .map_err(|err| GameError::InconsistentHistory {
                index: entry.index,
                reason: err.to_string(),
            })?;
    }
    Ok(state)
}
