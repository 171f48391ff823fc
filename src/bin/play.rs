use clap::Parser;

use santoro::cli::{action_to_str, display_board};
use santoro::game::Game;
use santoro::players::RandomPlayer;
use santoro::types::Player;

#[derive(Debug, Parser)]
#[command(name = "santoro-play")]
#[command(about = "Run random self-play games of Santorini")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 1)]
    games: u32,

    /// Which player places first (0 or 1)
    #[arg(long, default_value_t = 0)]
    start: u8,

    /// Print every action and the final board of each game
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let starting = match Player::from_index(args.start as usize) {
        Some(player) => player,
        None => {
            eprintln!("Error: --start must be 0 or 1");
            std::process::exit(1);
        }
    };

    let players = [RandomPlayer, RandomPlayer];
    let mut wins = [0u32; 2];

    for round in 0..args.games {
        let mut game = Game::new(starting);
        loop {
            if game.state.is_over() {
                break;
            }
            let mover = game.state.current_player();
            let before = args.verbose.then(|| game.state.clone());
            let Some(action) = game.play_tick(&players) else {
                break;
            };
            if let Some(before) = before {
                println!("{mover}: {}", action_to_str(&before, action));
            }
        }
        if args.verbose {
            display_board(game.state.board());
        }
        match game.winner() {
            Some(winner) => {
                wins[winner.index()] += 1;
                println!(
                    "game {} ({} moves): {winner} wins",
                    round + 1,
                    game.state.move_count()
                );
            }
            None => println!("game {} hit the turn limit", round + 1),
        }
    }

    println!(
        "totals: ZERO {} / ONE {} over {} games",
        wins[0], wins[1], args.games
    );
}
