use itertools::iproduct;

use crate::board::{Board, MAX_LEVEL};
use crate::coords::{Coord, Direction};
use crate::game::action::{ActionSet, MoveAction, encode_placement};
use crate::types::{Player, WorkerId, WorkerSlot};

/// Placement runs until all four workers exist; no separate phase flag is
/// stored anywhere.
pub fn placement_complete(board: &Board) -> bool {
    Player::ORDERED.iter().all(|&player| {
        WorkerSlot::ORDERED
            .iter()
            .all(|&slot| board.find_worker(WorkerId::new(player, slot)).is_some())
    })
}

fn placed_count(board: &Board, player: Player) -> usize {
    WorkerSlot::ORDERED
        .iter()
        .filter(|&&slot| board.find_worker(WorkerId::new(player, slot)).is_some())
        .count()
}

fn missing_slot(board: &Board, player: Player) -> Option<WorkerSlot> {
    WorkerSlot::ORDERED
        .iter()
        .copied()
        .find(|&slot| board.find_worker(WorkerId::new(player, slot)).is_none())
}

/// The worker owed to the board next, derived from occupancy alone: each
/// side places its pair back to back, a side mid-pair keeps placing, and
/// `current` breaks the empty-board tie (the starting player places first).
/// `None` once placement is complete.
pub fn next_to_place(board: &Board, current: Player) -> Option<WorkerId> {
    let own = placed_count(board, current);
    let theirs = placed_count(board, current.opponent());
    match (own, theirs) {
        (2, 2) => None,
        (1, _) => Some(WorkerId::new(current, missing_slot(board, current)?)),
        (_, 1) | (2, _) => Some(WorkerId::new(
            current.opponent(),
            missing_slot(board, current.opponent())?,
        )),
        _ => Some(WorkerId::new(current, missing_slot(board, current)?)),
    }
}

/// A worker standing on `from` may step to `to` iff the target is empty,
/// not domed, and at most one level up. The null step (`from == to`) passes
/// by convention; enumeration never emits it.
pub fn can_move(board: &Board, from: Coord, to: Coord) -> bool {
    if from == to {
        return true;
    }
    if !board.is_empty(to) {
        return false;
    }
    let target = board.level_at(to);
    target < MAX_LEVEL && target <= board.level_at(from) + 1
}

/// A build on `site` is allowed iff the cell is not domed and either empty
/// or holds `mover` itself (so the mover may build on the cell it vacates).
pub fn can_build(board: &Board, site: Coord, mover: WorkerId) -> bool {
    if board.level_at(site) >= MAX_LEVEL {
        return false;
    }
    match board.worker_at(site) {
        None => true,
        Some(occupant) => occupant == mover,
    }
}

/// The complete legal-action set for `player`, valid only for the board it
/// was computed against. During placement the set holds cell ids for the
/// owed side and stays all-false for the other; during movement it holds
/// every (worker, move, build) triple passing both checks. One ply only.
pub fn legal_actions(board: &Board, player: Player) -> ActionSet {
    let mut actions = ActionSet::new();

    if let Some(owed) = next_to_place(board, player) {
        if owed.player == player {
            for coord in board.cells_where(|b, c| b.is_empty(c)) {
                actions.insert(encode_placement(coord));
            }
        }
        return actions;
    }

    for slot in WorkerSlot::ORDERED {
        let worker = WorkerId::new(player, slot);
        let Some(from) = board.find_worker(worker) else {
            continue;
        };
        for (move_dir, build_dir) in iproduct!(Direction::MOVES, Direction::MOVES) {
            let Some(to) = from.step(move_dir) else {
                continue;
            };
            if !can_move(board, from, to) {
                continue;
            }
            let Some(site) = to.step(build_dir) else {
                continue;
            };
            if !can_build(board, site, worker) {
                continue;
            }
            actions.insert(
                MoveAction {
                    worker: slot,
                    power: 0,
                    move_dir,
                    build_dir,
                }
                .encode(),
            );
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::PLACEMENT_SPACE;

    fn worker(player: Player, slot: WorkerSlot) -> WorkerId {
        WorkerId::new(player, slot)
    }

    fn board_with_all_workers() -> Board {
        let mut board = Board::new();
        board.place_worker(Coord::new(0, 0), worker(Player::Zero, WorkerSlot::First));
        board.place_worker(Coord::new(0, 2), worker(Player::Zero, WorkerSlot::Second));
        board.place_worker(Coord::new(4, 2), worker(Player::One, WorkerSlot::First));
        board.place_worker(Coord::new(4, 4), worker(Player::One, WorkerSlot::Second));
        board
    }

    #[test]
    fn empty_board_offers_all_cells_to_the_current_player() {
        let board = Board::new();
        let actions = legal_actions(&board, Player::Zero);
        assert_eq!(actions.len(), PLACEMENT_SPACE);
        assert!(actions.contains(0));
        assert!(actions.contains(24));
    }

    #[test]
    fn placement_order_follows_pairs() {
        let mut board = Board::new();
        assert_eq!(
            next_to_place(&board, Player::Zero),
            Some(worker(Player::Zero, WorkerSlot::First))
        );
        board.place_worker(Coord::new(0, 0), worker(Player::Zero, WorkerSlot::First));
        // Mid-pair: player 0 keeps placing no matter who asks.
        assert_eq!(
            next_to_place(&board, Player::Zero),
            Some(worker(Player::Zero, WorkerSlot::Second))
        );
        assert_eq!(
            next_to_place(&board, Player::One),
            Some(worker(Player::Zero, WorkerSlot::Second))
        );
        board.place_worker(Coord::new(0, 2), worker(Player::Zero, WorkerSlot::Second));
        assert_eq!(
            next_to_place(&board, Player::One),
            Some(worker(Player::One, WorkerSlot::First))
        );
        board.place_worker(Coord::new(4, 2), worker(Player::One, WorkerSlot::First));
        board.place_worker(Coord::new(4, 4), worker(Player::One, WorkerSlot::Second));
        assert_eq!(next_to_place(&board, Player::Zero), None);
        assert!(placement_complete(&board));
    }

    #[test]
    fn non_placing_player_has_no_legal_actions() {
        let mut board = Board::new();
        board.place_worker(Coord::new(0, 0), worker(Player::Zero, WorkerSlot::First));
        // Player 0 is mid-pair, so player 1's set is all-false.
        assert!(legal_actions(&board, Player::One).is_empty());
        assert_eq!(legal_actions(&board, Player::Zero).len(), 24);
    }

    #[test]
    fn movement_respects_occupancy_and_height() {
        let mut board = board_with_all_workers();
        let from = Coord::new(0, 0);
        assert!(can_move(&board, from, Coord::new(1, 1)));
        // Own other worker blocks.
        assert!(!can_move(&board, from, Coord::new(0, 2)));
        // More than one level up blocks.
        board.set_level(Coord::new(0, 1), 2);
        assert!(!can_move(&board, from, Coord::new(0, 1)));
        board.set_level(Coord::new(0, 1), 1);
        assert!(can_move(&board, from, Coord::new(0, 1)));
        // Domes never admit a worker, whatever the origin height.
        board.set_level(Coord::new(1, 0), MAX_LEVEL);
        board.set_level(from, 3);
        assert!(!can_move(&board, from, Coord::new(1, 0)));
        // Any step down is fine.
        assert!(can_move(&board, from, Coord::new(1, 1)));
    }

    #[test]
    fn build_allows_vacated_cell_but_not_domes_or_rivals() {
        let mut board = board_with_all_workers();
        let mover = worker(Player::Zero, WorkerSlot::First);
        assert!(can_build(&board, Coord::new(1, 1), mover));
        // The mover's own cell is buildable (it is being vacated).
        assert!(can_build(&board, Coord::new(0, 0), mover));
        // Another worker's cell is not.
        assert!(!can_build(&board, Coord::new(0, 2), mover));
        board.set_level(Coord::new(1, 1), MAX_LEVEL);
        assert!(!can_build(&board, Coord::new(1, 1), mover));
    }

    #[test]
    fn corner_worker_enumerates_expected_triples() {
        let mut board = Board::new();
        board.place_worker(Coord::new(0, 0), worker(Player::Zero, WorkerSlot::First));
        board.place_worker(Coord::new(4, 0), worker(Player::Zero, WorkerSlot::Second));
        board.place_worker(Coord::new(0, 4), worker(Player::One, WorkerSlot::First));
        board.place_worker(Coord::new(4, 4), worker(Player::One, WorkerSlot::Second));
        let actions = legal_actions(&board, Player::Zero);
        assert!(!actions.is_empty());
        for action in actions.iter() {
            let decoded = MoveAction::decode(action).unwrap();
            // Center never appears on either axis.
            assert_ne!(decoded.move_dir, Direction::Center);
            assert_ne!(decoded.build_dir, Direction::Center);
        }
    }

    #[test]
    fn boxed_in_player_has_empty_movement_set() {
        let mut board = Board::new();
        board.place_worker(Coord::new(0, 0), worker(Player::One, WorkerSlot::First));
        board.place_worker(Coord::new(0, 1), worker(Player::One, WorkerSlot::Second));
        board.place_worker(Coord::new(3, 3), worker(Player::Zero, WorkerSlot::First));
        board.place_worker(Coord::new(4, 4), worker(Player::Zero, WorkerSlot::Second));
        // Dome every free neighbor of both player-1 workers.
        for coord in [Coord::new(0, 0), Coord::new(0, 1)] {
            for neighbor in coord.neighbors() {
                if board.is_empty(neighbor) {
                    board.set_level(neighbor, MAX_LEVEL);
                }
            }
        }
        assert!(legal_actions(&board, Player::One).is_empty());
        assert!(!legal_actions(&board, Player::Zero).is_empty());
    }
}
