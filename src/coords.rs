use std::collections::HashMap;

use itertools::iproduct;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Side length of the square board.
pub const GRID_SIZE: usize = 5;

/// The 3x3 neighborhood in row-major index order (0..=8). Index 4 is
/// `Center`: the null move, or "no build" on the build axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// The eight non-center directions, in index order.
    pub const MOVES: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::NorthWest => 0,
            Direction::North => 1,
            Direction::NorthEast => 2,
            Direction::West => 3,
            Direction::Center => 4,
            Direction::East => 5,
            Direction::SouthWest => 6,
            Direction::South => 7,
            Direction::SouthEast => 8,
        }
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Direction::iter().find(|dir| dir.index() == index)
    }

    pub fn delta(self) -> (i32, i32) {
        let index = self.index() as i32;
        (index / 3 - 1, index % 3 - 1)
    }
}

pub static UNIT_VECTORS: Lazy<HashMap<Direction, (i32, i32)>> =
    Lazy::new(|| Direction::iter().map(|dir| (dir, dir.delta())).collect());

/// A cell on the 5x5 grid. Row 0 is the top, column 0 the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE);
        Self { row, col }
    }

    /// Every cell of the grid in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        iproduct!(0..GRID_SIZE, 0..GRID_SIZE).map(|(row, col)| Coord::new(row, col))
    }

    /// The neighbor one step in `dir`, or `None` when that leaves the board.
    /// `Center` steps back onto the cell itself.
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if (0..GRID_SIZE as i32).contains(&row) && (0..GRID_SIZE as i32).contains(&col) {
            Some(Coord::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// In-bounds cells of the 3x3 neighborhood, the cell itself excluded.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        UNIT_VECTORS
            .iter()
            .filter(|(dir, _)| **dir != Direction::Center)
            .filter_map(move |(dir, _)| self.step(*dir))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
