use serde::{Deserialize, Serialize};

use crate::coords::{Coord, GRID_SIZE};
use crate::types::{Player, WorkerId};

/// A level-4 cell is domed: nothing builds on it, nothing climbs onto it.
pub const MAX_LEVEL: u8 = 4;

/// Standing on level 3 wins the game.
pub const WIN_LEVEL: u8 = 3;

/// The round counter saturates here; it is bookkeeping and never affects
/// legality.
pub const MAX_ROUND: u8 = 127;

/// Occupancy and tower levels for the 5x5 grid, plus the round counter.
///
/// `Clone` is a deep copy: the grids are arrays of `Copy` values, so a clone
/// never shares mutable storage with its source. Mutators are crate-internal;
/// collaborators outside the crate only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    occupancy: [[Option<WorkerId>; GRID_SIZE]; GRID_SIZE],
    levels: [[u8; GRID_SIZE]; GRID_SIZE],
    round: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            occupancy: [[None; GRID_SIZE]; GRID_SIZE],
            levels: [[0; GRID_SIZE]; GRID_SIZE],
            round: 0,
        }
    }

    /// Assemble a board from already-validated grids (snapshot decode path).
    pub(crate) fn from_grids(
        occupancy: [[Option<WorkerId>; GRID_SIZE]; GRID_SIZE],
        levels: [[u8; GRID_SIZE]; GRID_SIZE],
        round: u8,
    ) -> Self {
        Self {
            occupancy,
            levels,
            round: round.min(MAX_ROUND),
        }
    }

    pub fn worker_at(&self, coord: Coord) -> Option<WorkerId> {
        self.occupancy[coord.row][coord.col]
    }

    pub fn level_at(&self, coord: Coord) -> u8 {
        self.levels[coord.row][coord.col]
    }

    pub fn is_empty(&self, coord: Coord) -> bool {
        self.worker_at(coord).is_none()
    }

    /// The unique cell occupied by `worker`, or `None` when it has not been
    /// placed yet.
    pub fn find_worker(&self, worker: WorkerId) -> Option<Coord> {
        Coord::all().find(|&coord| self.worker_at(coord) == Some(worker))
    }

    /// Cells satisfying `predicate`, in row-major order.
    pub fn cells_where<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = Coord> + 'a
    where
        F: Fn(&Board, Coord) -> bool + 'a,
    {
        Coord::all().filter(move |&coord| predicate(self, coord))
    }

    /// Highest level under any of `player`'s workers; 0 when both stand on
    /// the ground (or are not placed).
    pub fn score(&self, player: Player) -> u8 {
        Coord::all()
            .filter(|&coord| {
                self.worker_at(coord)
                    .is_some_and(|worker| worker.player == player)
            })
            .map(|coord| self.level_at(coord))
            .max()
            .unwrap_or(0)
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub(crate) fn place_worker(&mut self, coord: Coord, worker: WorkerId) {
        debug_assert!(self.is_empty(coord));
        self.occupancy[coord.row][coord.col] = Some(worker);
    }

    pub(crate) fn move_worker(&mut self, from: Coord, to: Coord) {
        let worker = self.occupancy[from.row][from.col].take();
        debug_assert!(worker.is_some());
        debug_assert!(self.is_empty(to) || from == to);
        self.occupancy[to.row][to.col] = worker;
    }

    /// Raise a tower by one level, capped at the dome.
    pub(crate) fn raise_level(&mut self, coord: Coord) {
        self.levels[coord.row][coord.col] = (self.level_at(coord) + 1).min(MAX_LEVEL);
    }

    pub(crate) fn advance_round(&mut self) {
        self.round = self.round.saturating_add(1).min(MAX_ROUND);
    }

    #[cfg(test)]
    pub(crate) fn set_level(&mut self, coord: Coord, level: u8) {
        debug_assert!(level <= MAX_LEVEL);
        self.levels[coord.row][coord.col] = level;
    }

    #[cfg(test)]
    pub(crate) fn set_round(&mut self, round: u8) {
        self.round = round.min(MAX_ROUND);
    }
}
