use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::coords::{Coord, Direction, GRID_SIZE};
use crate::game::action::{MoveAction, decode_placement};
use crate::game::legal::placement_complete;
use crate::game::state::GameState;
use crate::types::Player;

const LEVEL_CHARS: [char; 5] = ['.', '▂', '▅', '█', 'X'];

static DIRECTION_ARROWS: Lazy<HashMap<Direction, char>> = Lazy::new(|| {
    use Direction::*;
    HashMap::from([
        (NorthWest, '↖'),
        (North, '↑'),
        (NorthEast, '↗'),
        (West, '←'),
        (Center, 'Ø'),
        (East, '→'),
        (SouthWest, '↙'),
        (South, '↓'),
        (SouthEast, '↘'),
    ])
});

/// Two characters per cell: worker mark (o/O for player 0's pair, x/X for
/// player 1's) and tower glyph.
pub fn render_board_to_string(board: &Board) -> String {
    let mut out = String::new();
    out.push_str(&format!("round {}\n", board.round()));
    for row in 0..GRID_SIZE {
        out.push_str(&"-".repeat(GRID_SIZE * 3 + 1));
        out.push('\n');
        for col in 0..GRID_SIZE {
            let coord = Coord::new(row, col);
            let mark = match board.worker_at(coord) {
                None => ' ',
                Some(worker) => {
                    let marks = match worker.player {
                        Player::Zero => ['o', 'O'],
                        Player::One => ['x', 'X'],
                    };
                    marks[worker.slot.index()]
                }
            };
            let level = LEVEL_CHARS[board.level_at(coord) as usize];
            out.push_str(&format!("|{mark}{level}"));
        }
        out.push_str("|\n");
    }
    out.push_str(&"-".repeat(GRID_SIZE * 3 + 1));
    out.push('\n');
    out
}

pub fn display_board(board: &Board) {
    println!("{}", render_board_to_string(board));
}

/// Human-readable form of an action in the context of `state` (the phase
/// decides how the id is read).
pub fn action_to_str(state: &GameState, action: usize) -> String {
    if !placement_complete(state.board()) {
        return match decode_placement(action) {
            Ok(coord) => format!("place worker at {coord}"),
            Err(_) => format!("invalid placement {action}"),
        };
    }
    match MoveAction::decode(action) {
        Ok(decoded) => {
            let arrow = |dir| DIRECTION_ARROWS.get(&dir).copied().unwrap_or('?');
            format!(
                "move worker {} {} then build {}",
                decoded.worker.index() + 1,
                arrow(decoded.move_dir),
                arrow(decoded.build_dir),
            )
        }
        Err(_) => format!("invalid action {action}"),
    }
}
