use rand::seq::SliceRandom;

use crate::game::game::Game;
use crate::players::BasePlayer;

/// Uniform choice over the legal set. A smoke-test device, not an AI.
#[derive(Clone)]
pub struct RandomPlayer;

impl BasePlayer for RandomPlayer {
    fn decide(&self, _game: &Game, actions: &[usize]) -> Option<usize> {
        let mut rng = rand::thread_rng();
        actions.choose(&mut rng).copied()
    }
}
