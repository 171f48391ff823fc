use crate::board::{Board, WIN_LEVEL};
use crate::coords::Direction;
use crate::game::GameError;
use crate::game::action::{ACTION_SPACE, ActionSet, MoveAction, PLACEMENT_SPACE, decode_placement};
use crate::game::legal::{can_build, can_move, legal_actions, next_to_place, placement_complete};
use crate::types::{Outcome, Player, WorkerId, WorkerSlot};

/// One applied action: who acted, the board as it stood before, and the
/// action id. `action` is `None` only for a synthetic initial entry; every
/// entry the engine appends carries an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub player: Player,
    pub board: Board,
    pub action: Option<usize>,
}

/// The engine state: board, side to move, frozen-once-won outcome, the
/// legal-action cache for the side to move, and the full action history.
///
/// A `GameState` is a synchronous, single-owner state machine. It is only
/// ever mutated by [`GameState::apply_action`], which either applies the
/// whole action or returns an error leaving the state untouched.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Outcome,
    legal: ActionSet,
    history: Vec<HistoryEntry>,
}

impl GameState {
    /// Fresh empty board; `starting` places (and later moves) first.
    pub fn new(starting: Player) -> Self {
        let board = Board::new();
        let legal = legal_actions(&board, starting);
        Self {
            board,
            current_player: starting,
            outcome: Outcome::Ongoing,
            legal,
            history: Vec::new(),
        }
    }

    /// Rebuild from decoded snapshot parts. The legal cache and outcome are
    /// always recomputed here; persisted copies are never trusted.
    pub(crate) fn from_parts(
        board: Board,
        current_player: Player,
        history: Vec<HistoryEntry>,
    ) -> Self {
        let mut state = Self {
            board,
            current_player,
            outcome: Outcome::Ongoing,
            legal: ActionSet::new(),
            history,
        };
        state.refresh();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Legal actions for the current player on the current board. Refreshed
    /// after every applied action and on snapshot load.
    pub fn legal_actions(&self) -> &ActionSet {
        &self.legal
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of actions applied so far; also the index the next applied
    /// action will occupy in a persisted move log.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn to_snapshot(&self) -> crate::game::snapshot::Snapshot {
        crate::game::snapshot::Snapshot::capture(self)
    }

    pub fn from_snapshot(
        snapshot: &crate::game::snapshot::Snapshot,
    ) -> Result<GameState, GameError> {
        snapshot.restore()
    }

    /// Validate and apply one action, advance the turn, and re-evaluate the
    /// terminal conditions. Returns the winner, if this action ended the
    /// game. All validation happens before any mutation.
    pub fn apply_action(&mut self, action: usize) -> Result<Option<Player>, GameError> {
        if self.outcome.is_over() {
            return Err(GameError::GameAlreadyEnded);
        }
        let acting = self.current_player;

        if let Some(owed) = next_to_place(&self.board, acting) {
            if action >= PLACEMENT_SPACE {
                return Err(GameError::InvalidAction(action));
            }
            if !self.legal.contains(action) {
                return Err(GameError::IllegalPlacement(action));
            }
            let cell = decode_placement(action)?;
            debug_assert_eq!(owed.player, acting);
            debug_assert!(self.board.is_empty(cell));

            let before = self.board.clone();
            self.board.place_worker(cell, owed);
            self.history.push(HistoryEntry {
                player: acting,
                board: before,
                action: Some(action),
            });
            // The placer keeps the turn after their first worker and hands
            // it over after their second.
            self.current_player = match owed.slot {
                WorkerSlot::First => acting,
                WorkerSlot::Second => acting.opponent(),
            };
        } else {
            if action >= ACTION_SPACE {
                return Err(GameError::InvalidAction(action));
            }
            if !self.legal.contains(action) {
                return Err(GameError::IllegalMove(action));
            }
            let decoded = MoveAction::decode(action)?;
            let worker = WorkerId::new(acting, decoded.worker);
            let from = self
                .board
                .find_worker(worker)
                .ok_or(GameError::WorkerNotFound(worker))?;
            // Re-checked against the pre-move board even though the cache
            // vouched for the bit; cache corruption must not corrupt the
            // board.
            let to = from
                .step(decoded.move_dir)
                .ok_or(GameError::IllegalMove(action))?;
            if !can_move(&self.board, from, to) {
                return Err(GameError::IllegalMove(action));
            }
            let site = match decoded.build_dir {
                Direction::Center => None,
                dir => {
                    let site = to.step(dir).ok_or(GameError::IllegalMove(action))?;
                    if !can_build(&self.board, site, worker) {
                        return Err(GameError::IllegalMove(action));
                    }
                    Some(site)
                }
            };

            let before = self.board.clone();
            self.board.move_worker(from, to);
            if let Some(site) = site {
                self.board.raise_level(site);
            }
            self.board.advance_round();
            self.history.push(HistoryEntry {
                player: acting,
                board: before,
                action: Some(action),
            });
            self.current_player = acting.opponent();
        }

        self.refresh();
        Ok(self.outcome.winner())
    }

    fn refresh(&mut self) {
        self.legal = legal_actions(&self.board, self.current_player);
        self.outcome = compute_outcome(&self.board, self.current_player, &self.legal);
    }
}

/// Terminal evaluation for the position with `to_move` about to act.
/// `legal` must be the legal set computed for `to_move` on this board.
///
/// Never terminal during placement. A score of 3 (a worker standing on a
/// level-3 tower) wins immediately, player 0 checked first; otherwise a
/// player to move with no legal action loses by stalemate.
pub fn compute_outcome(board: &Board, to_move: Player, legal: &ActionSet) -> Outcome {
    if !placement_complete(board) {
        return Outcome::Ongoing;
    }
    if board.score(Player::Zero) == WIN_LEVEL {
        return Outcome::Won(Player::Zero);
    }
    if board.score(Player::One) == WIN_LEVEL {
        return Outcome::Won(Player::One);
    }
    if legal.is_empty() {
        return Outcome::Won(to_move.opponent());
    }
    Outcome::Ongoing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{MAX_LEVEL, MAX_ROUND};
    use crate::coords::Coord;
    use crate::game::action::encode_placement;

    fn place_all(state: &mut GameState) {
        // Actions 0, 2, 22, 24: the canonical four-placement opening.
        for action in [0, 2, 22, 24] {
            state.apply_action(action).unwrap();
        }
    }

    fn movement_state(cells: [(usize, usize); 4]) -> GameState {
        let mut board = Board::new();
        let ids = [
            WorkerId::new(Player::Zero, WorkerSlot::First),
            WorkerId::new(Player::Zero, WorkerSlot::Second),
            WorkerId::new(Player::One, WorkerSlot::First),
            WorkerId::new(Player::One, WorkerSlot::Second),
        ];
        for (id, (row, col)) in ids.into_iter().zip(cells) {
            board.place_worker(Coord::new(row, col), id);
        }
        GameState::from_parts(board, Player::Zero, Vec::new())
    }

    fn encode(worker: WorkerSlot, move_dir: Direction, build_dir: Direction) -> usize {
        MoveAction {
            worker,
            power: 0,
            move_dir,
            build_dir,
        }
        .encode()
    }

    #[test]
    fn placement_scenario_hands_turn_back_to_player_zero() {
        let mut state = GameState::new(Player::Zero);
        assert_eq!(state.legal_actions().len(), 25);

        state.apply_action(0).unwrap();
        assert_eq!(state.current_player(), Player::Zero);
        state.apply_action(2).unwrap();
        assert_eq!(state.current_player(), Player::One);
        state.apply_action(22).unwrap();
        assert_eq!(state.current_player(), Player::One);
        state.apply_action(24).unwrap();

        assert_eq!(state.current_player(), Player::Zero);
        assert!(!state.legal_actions().is_empty());
        assert_eq!(state.move_count(), 4);
        assert_eq!(state.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn occupied_cell_placement_is_rejected_without_mutation() {
        let mut state = GameState::new(Player::Zero);
        state.apply_action(0).unwrap();
        let before = state.board().clone();
        assert!(matches!(
            state.apply_action(0),
            Err(GameError::IllegalPlacement(0))
        ));
        assert_eq!(state.board(), &before);
        assert_eq!(state.move_count(), 1);
    }

    #[test]
    fn movement_range_action_is_invalid_during_placement() {
        let mut state = GameState::new(Player::Zero);
        assert!(matches!(
            state.apply_action(30),
            Err(GameError::InvalidAction(30))
        ));
        assert!(matches!(
            state.apply_action(encode_placement(Coord::new(4, 4)) + 200),
            Err(GameError::InvalidAction(_))
        ));
    }

    #[test]
    fn player_one_can_start_a_game() {
        let mut state = GameState::new(Player::One);
        assert_eq!(state.legal_actions().len(), 25);
        state.apply_action(0).unwrap();
        assert_eq!(
            state.board().worker_at(Coord::new(0, 0)),
            Some(WorkerId::new(Player::One, WorkerSlot::First))
        );
        assert_eq!(state.current_player(), Player::One);
        state.apply_action(2).unwrap();
        assert_eq!(state.current_player(), Player::Zero);
    }

    #[test]
    fn applying_a_move_updates_board_history_and_round() {
        let mut state = GameState::new(Player::Zero);
        place_all(&mut state);
        // Worker 1 at (0,0): step East, build South-East of the new cell.
        let action = encode(WorkerSlot::First, Direction::East, Direction::South);
        state.apply_action(action).unwrap();

        assert_eq!(
            state.board().worker_at(Coord::new(0, 1)),
            Some(WorkerId::new(Player::Zero, WorkerSlot::First))
        );
        assert_eq!(state.board().level_at(Coord::new(1, 1)), 1);
        assert_eq!(state.board().round(), 1);
        assert_eq!(state.current_player(), Player::One);
        let entry = state.history().last().unwrap();
        assert_eq!(entry.player, Player::Zero);
        assert_eq!(entry.action, Some(action));
        assert!(entry.board.is_empty(Coord::new(0, 1)));
    }

    #[test]
    fn illegal_move_leaves_state_untouched() {
        let mut state = GameState::new(Player::Zero);
        place_all(&mut state);
        let action = encode(WorkerSlot::First, Direction::East, Direction::South);
        // "No build" is never cached in the base game.
        let blocked = encode(WorkerSlot::Second, Direction::South, Direction::Center);
        assert!(!state.legal_actions().contains(blocked));
        let before = state.board().clone();
        assert!(matches!(
            state.apply_action(blocked),
            Err(GameError::IllegalMove(_))
        ));
        assert_eq!(state.board(), &before);
        // A legal action still applies afterwards.
        state.apply_action(action).unwrap();
    }

    #[test]
    fn heights_never_exceed_the_dome() {
        let mut state = movement_state([(0, 0), (4, 0), (0, 4), (4, 4)]);
        state.board.set_level(Coord::new(1, 1), 3);
        state.refresh();
        // Build on the level-3 cell at (1,1): it domes at 4 and is then
        // neither climbable nor buildable.
        let action = encode(WorkerSlot::First, Direction::East, Direction::South);
        let winner = state.apply_action(action).unwrap();
        assert_eq!(winner, None);
        assert_eq!(state.board().level_at(Coord::new(1, 1)), MAX_LEVEL);
        assert!(!can_move(state.board(), Coord::new(0, 1), Coord::new(1, 1)));
        assert!(!can_build(
            state.board(),
            Coord::new(1, 1),
            WorkerId::new(Player::Zero, WorkerSlot::First)
        ));
    }

    #[test]
    fn reaching_level_three_wins_and_freezes_the_game() {
        let mut state = movement_state([(2, 2), (4, 0), (0, 0), (0, 4)]);
        state.board.set_level(Coord::new(2, 2), 2);
        state.board.set_level(Coord::new(2, 3), 3);
        state.refresh();
        assert_eq!(state.outcome(), Outcome::Ongoing);

        let action = encode(WorkerSlot::First, Direction::East, Direction::East);
        let winner = state.apply_action(action).unwrap();
        assert_eq!(winner, Some(Player::Zero));
        assert_eq!(state.outcome(), Outcome::Won(Player::Zero));
        assert!(matches!(
            state.apply_action(action),
            Err(GameError::GameAlreadyEnded)
        ));
    }

    #[test]
    fn stalemated_side_loses() {
        let mut board = Board::new();
        board.place_worker(Coord::new(0, 0), WorkerId::new(Player::One, WorkerSlot::First));
        board.place_worker(Coord::new(0, 1), WorkerId::new(Player::One, WorkerSlot::Second));
        board.place_worker(Coord::new(3, 3), WorkerId::new(Player::Zero, WorkerSlot::First));
        board.place_worker(Coord::new(4, 4), WorkerId::new(Player::Zero, WorkerSlot::Second));
        for coord in [Coord::new(0, 0), Coord::new(0, 1)] {
            for neighbor in coord.neighbors() {
                if board.is_empty(neighbor) {
                    board.set_level(neighbor, MAX_LEVEL);
                }
            }
        }
        let legal = legal_actions(&board, Player::One);
        assert_eq!(
            compute_outcome(&board, Player::One, &legal),
            Outcome::Won(Player::Zero)
        );
        // The same position loaded with player 1 to move is already decided.
        let state = GameState::from_parts(board, Player::One, Vec::new());
        assert_eq!(state.winner(), Some(Player::Zero));
    }

    #[test]
    fn round_counter_saturates_and_does_not_affect_legality() {
        let mut state = movement_state([(0, 0), (4, 0), (0, 4), (4, 4)]);
        state.board.set_round(MAX_ROUND);
        state.refresh();
        let action = encode(WorkerSlot::First, Direction::East, Direction::East);
        state.apply_action(action).unwrap();
        assert_eq!(state.board().round(), MAX_ROUND);
    }
}
