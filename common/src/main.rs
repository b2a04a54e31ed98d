use clap::Parser;
use minesweeper_ai::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;

/// Watch a knowledge-base agent play Minesweeper.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 8)]
    height: usize,

    #[arg(long, default_value_t = 8)]
    width: usize,

    #[arg(long, default_value_t = 8)]
    mines: usize,

    /// Seed for mine placement and guesses. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, in milliseconds.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Maximum inference passes per observation.
    #[arg(long, default_value_t = DEFAULT_PASS_LIMIT)]
    pass_limit: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // --- 1. Initialization ---
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Playing with seed {seed}.");
    let mut rng = StdRng::seed_from_u64(seed);

    let board = Board::new(args.height, args.width, args.mines, &mut rng)?;
    let agent = KnowledgeBase::new(args.height, args.width).with_pass_limit(args.pass_limit);
    let mut game = Game::with_agent(board, agent);

    println!("--- Minesweeper Knowledge Base Agent ---");
    println!("Strategy: Play cells known to be safe, guess randomly otherwise.");

    // --- 2. Game Loop ---
    while game.status() == Status::Playing {
        println!("\n--- Move #{} ---", game.moves() + 1);

        match game.step(&mut rng)? {
            Turn::Safe(cell) => println!("AI making safe move {cell}."),
            Turn::Guess(cell) => println!("No known safe moves, AI making random move {cell}."),
            Turn::Exploded(cell) => println!("AI probed {cell} and hit a mine."),
            Turn::Stuck => {
                println!("No moves left to make.");
                break;
            }
        }
        print_board(&game);

        thread::sleep(Duration::from_millis(args.delay_ms));
    }

    // --- 3. Final Result ---
    println!("\n--- Game Over ---");
    print!("{}", game.board());

    match game.status() {
        Status::Won => println!("Result: The AI flagged every mine!"),
        Status::Lost => println!("Result: The AI hit a mine and lost."),
        Status::Playing => println!("Result: The game ended unexpectedly."),
    }

    Ok(())
}

/// Prints the board as the agent sees it.
fn print_board(game: &Game) {
    let board = game.board();
    let agent = game.agent();

    // Print header
    print!("   ");
    for col in 0..board.width() {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(board.width()));

    // Print rows
    for row in 0..board.height() {
        print!("{:^2}|", row);
        for col in 0..board.width() {
            let cell = Cell::new(row, col);
            let display = if agent.moves_made().contains(&cell) {
                format!(" {} ", board.neighbor_mine_count(cell))
            } else if agent.mines().contains(&cell) {
                " F ".to_string()
            } else if agent.safes().contains(&cell) {
                " . ".to_string()
            } else {
                " ■ ".to_string()
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
