use crate::game::game::Game;

/// A seat at the table: given the game and the current legal action ids,
/// pick one (or decline, ending the drive loop).
pub trait BasePlayer {
    fn decide(&self, game: &Game, actions: &[usize]) -> Option<usize>;
}
