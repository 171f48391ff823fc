use uuid::Uuid;

use crate::game::GameError;
use crate::game::snapshot::Snapshot;
use crate::game::state::GameState;
use crate::players::BasePlayer;
use crate::types::Player;

/// Safety valve for driver loops; a real game finishes far earlier (every
/// movement action builds, and the board holds at most 100 levels).
const TURNS_LIMIT: usize = 256;

/// A match: an id for collaborators to key on, plus the engine state.
pub struct Game {
    pub id: Uuid,
    pub state: GameState,
}

impl Game {
    pub fn new(starting: Player) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: GameState::new(starting),
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, GameError> {
        Ok(Self {
            id: Uuid::new_v4(),
            state: snapshot.restore()?,
        })
    }

    /// The external apply contract: one action in, the post-apply snapshot
    /// and the winner indicator out.
    pub fn apply(&mut self, action: usize) -> Result<(Snapshot, Option<Player>), GameError> {
        let winner = self.state.apply_action(action)?;
        Ok((Snapshot::capture(&self.state), winner))
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn winner(&self) -> Option<Player> {
        self.state.winner()
    }

    /// Drive a full game with one decider per seat.
    pub fn play<P: BasePlayer>(&mut self, players: &[P; 2]) -> Option<Player> {
        for _ in 0..TURNS_LIMIT {
            if self.state.is_over() || self.play_tick(players).is_none() {
                break;
            }
        }
        self.winner()
    }

    /// Ask the current seat for one action and apply it. `None` when the
    /// game is over or the player declines.
    pub fn play_tick<P: BasePlayer>(&mut self, players: &[P; 2]) -> Option<usize> {
        if self.state.is_over() {
            return None;
        }
        let seat = self.state.current_player().index();
        let actions: Vec<usize> = self.state.legal_actions().iter().collect();
        if actions.is_empty() {
            return None;
        }
        let action = players[seat].decide(self, &actions)?;
        self.state.apply_action(action).ok()?;
        Some(action)
    }
}
