pub mod board_display;

pub use board_display::{action_to_str, display_board, render_board_to_string};
