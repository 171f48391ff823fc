use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Player {
    Zero,
    One,
}

impl Player {
    pub const ORDERED: [Player; 2] = [Player::Zero, Player::One];

    pub fn opponent(self) -> Player {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::Zero => 0,
            Player::One => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::Zero),
            1 => Some(Player::One),
            _ => None,
        }
    }
}

/// Which of a player's two workers. Magnitude 1/2 on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerSlot {
    First,
    Second,
}

impl WorkerSlot {
    pub const ORDERED: [WorkerSlot; 2] = [WorkerSlot::First, WorkerSlot::Second];

    pub fn index(self) -> usize {
        match self {
            WorkerSlot::First => 0,
            WorkerSlot::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<WorkerSlot> {
        match index {
            0 => Some(WorkerSlot::First),
            1 => Some(WorkerSlot::Second),
            _ => None,
        }
    }
}

/// Tagged worker identity. The signed-integer form (+1/+2 for player 0,
/// -1/-2 for player 1, 0 meaning "no worker") exists only at the
/// serialization boundary; everything inside the crate carries the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId {
    pub player: Player,
    pub slot: WorkerSlot,
}

impl WorkerId {
    pub fn new(player: Player, slot: WorkerSlot) -> Self {
        Self { player, slot }
    }

    pub fn to_signed(self) -> i8 {
        let magnitude = self.slot.index() as i8 + 1;
        match self.player {
            Player::Zero => magnitude,
            Player::One => -magnitude,
        }
    }

    pub fn from_signed(value: i8) -> Option<WorkerId> {
        let player = match value.signum() {
            1 => Player::Zero,
            -1 => Player::One,
            _ => return None,
        };
        let slot = WorkerSlot::from_index(value.unsigned_abs() as usize - 1)?;
        Some(WorkerId::new(player, slot))
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.to_signed())
    }
}

/// Terminal verdict. Frozen once `Won`; the engine never unfreezes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Won(Player),
}

impl Outcome {
    pub fn is_over(self) -> bool {
        matches!(self, Outcome::Won(_))
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Ongoing => None,
            Outcome::Won(player) => Some(player),
        }
    }

    /// Per-player score contribution pair: {0,0} ongoing, {1,-1} player 0
    /// wins, {-1,1} player 1 wins.
    pub fn pair(self) -> [i8; 2] {
        match self {
            Outcome::Ongoing => [0, 0],
            Outcome::Won(Player::Zero) => [1, -1],
            Outcome::Won(Player::One) => [-1, 1],
        }
    }
}
