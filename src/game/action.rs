use serde::{Deserialize, Serialize};

use crate::coords::{Coord, Direction, GRID_SIZE};
use crate::game::GameError;
use crate::types::WorkerSlot;

pub const NUM_WORKERS: usize = 2;
/// God powers are declared in the encoding but disabled: the power axis has
/// a single value, 0.
pub const NUM_POWERS: usize = 1;
pub const NUM_DIRECTIONS: usize = 9;

/// Width of the movement-phase action space: worker x power x move x build.
pub const ACTION_SPACE: usize = NUM_WORKERS * NUM_POWERS * NUM_DIRECTIONS * NUM_DIRECTIONS;

/// Width of the placement-phase action space: one id per cell.
pub const PLACEMENT_SPACE: usize = GRID_SIZE * GRID_SIZE;

const STRIDE_WORKER: usize = NUM_POWERS * NUM_DIRECTIONS * NUM_DIRECTIONS;
const STRIDE_POWER: usize = NUM_DIRECTIONS * NUM_DIRECTIONS;

/// One movement-phase action: which worker goes where, and where it builds
/// afterwards. `build_dir == Center` means "no build", which the base game
/// never enumerates as legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub worker: WorkerSlot,
    pub power: u8,
    pub move_dir: Direction,
    pub build_dir: Direction,
}

impl MoveAction {
    /// Exact inverse of [`MoveAction::decode`]; pure integer arithmetic.
    pub fn encode(self) -> usize {
        self.worker.index() * STRIDE_WORKER
            + self.power as usize * STRIDE_POWER
            + self.move_dir.index() * NUM_DIRECTIONS
            + self.build_dir.index()
    }

    pub fn decode(action: usize) -> Result<MoveAction, GameError> {
        if action >= ACTION_SPACE {
            return Err(GameError::InvalidAction(action));
        }
        let worker = WorkerSlot::from_index(action / STRIDE_WORKER)
            .ok_or(GameError::InvalidAction(action))?;
        let rest = action % STRIDE_WORKER;
        let power = (rest / STRIDE_POWER) as u8;
        let move_dir = Direction::from_index(rest % STRIDE_POWER / NUM_DIRECTIONS)
            .ok_or(GameError::InvalidAction(action))?;
        let build_dir =
            Direction::from_index(rest % NUM_DIRECTIONS).ok_or(GameError::InvalidAction(action))?;
        Ok(MoveAction {
            worker,
            power,
            move_dir,
            build_dir,
        })
    }
}

/// Placement ids are `row*5 + col`; they share the low end of the numeric
/// range with movement ids and are told apart by phase alone.
pub fn encode_placement(coord: Coord) -> usize {
    coord.row * GRID_SIZE + coord.col
}

pub fn decode_placement(action: usize) -> Result<Coord, GameError> {
    if action >= PLACEMENT_SPACE {
        return Err(GameError::InvalidAction(action));
    }
    Ok(Coord::new(action / GRID_SIZE, action % GRID_SIZE))
}

const WORDS: usize = ACTION_SPACE.div_ceil(64);

/// Fixed-size bitset over the movement action space. Placement ids fit in
/// the same set (they only use the first 25 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionSet {
    bits: [u64; WORDS],
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: usize) {
        debug_assert!(action < ACTION_SPACE);
        self.bits[action / 64] |= 1 << (action % 64);
    }

    pub fn contains(&self, action: usize) -> bool {
        if action >= ACTION_SPACE {
            return false;
        }
        self.bits[action / 64] & (1 << (action % 64)) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// Set action ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..ACTION_SPACE).filter(move |&action| self.contains(action))
    }

    /// Wire projection: one bool per action id.
    pub fn to_mask(&self) -> Vec<bool> {
        (0..ACTION_SPACE).map(|action| self.contains(action)).collect()
    }
}
