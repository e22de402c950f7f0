//! Prisoner's Dilemma, solved two ways
//!
//! Run with: RUST_LOG=debug cargo run -p open-games --example prisoners_dilemma
//!
//! This example demonstrates:
//! - Describing a normal-form game and solving it by brute force
//! - Watching a solve through the logging hook
//! - Building the same game as a tensor of two open-game decisions
//!
//! Both routes agree: mutual defection is the only pure equilibrium.

use std::sync::Arc;

use open_games::{
    scalar_maximizer, utility_maximizer, LoggingHook, NashSolver, NormalFormGame, OpenGame,
    Optimizer, SolverConfig,
};
use open_games_core::{Lens, OutcomeFn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Cooperate,
    Defect,
}

use Move::{Cooperate, Defect};

fn payoff(row: Move, column: Move) -> (f64, f64) {
    match (row, column) {
        (Cooperate, Cooperate) => (2.0, 2.0),
        (Cooperate, Defect) => (0.0, 3.0),
        (Defect, Cooperate) => (3.0, 0.0),
        (Defect, Defect) => (1.0, 1.0),
    }
}

fn prisoner() -> OpenGame<Lens<(), (), Move, f64>, (), (), Move, f64> {
    OpenGame::decision(
        vec![Cooperate, Defect],
        scalar_maximizer(vec![Cooperate, Defect]),
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Prisoner's Dilemma ===\n");

    // -------------------------------------------------------------------------
    // 1. Normal form: players, options, payoff
    // -------------------------------------------------------------------------
    println!("1. Normal Form");
    println!("--------------\n");

    let game = NormalFormGame::from_constants(
        "prisoner's dilemma",
        vec!["row", "column"],
        vec![Cooperate, Defect],
        |p: &[Move]| {
            let (row, column) = payoff(p[0], p[1]);
            vec![row, column]
        },
    );

    for profile in game.all_option_profiles() {
        println!("  {:?} -> {:?}", profile, game.payoff(&profile));
    }

    let optimizers: Vec<Box<dyn Optimizer<Move, Vec<f64>>>> = vec![
        Box::new(utility_maximizer(0, vec![Cooperate, Defect])),
        Box::new(utility_maximizer(1, vec![Cooperate, Defect])),
    ];
    let solver = match NashSolver::new(SolverConfig::default().with_parallel(true)) {
        Ok(solver) => solver.with_hook(LoggingHook::verbose()),
        Err(error) => {
            eprintln!("bad solver config: {}", error);
            return;
        }
    };

    match game.solve_with(&solver, optimizers) {
        Ok(report) => {
            println!(
                "\n  {} equilibria among {} profiles ({:?}):",
                report.equilibria.len(),
                report.profiles_checked,
                report.elapsed
            );
            for profile in &report.equilibria {
                println!("    {:?}", profile);
            }
        }
        Err(error) => eprintln!("solve failed: {}", error),
    }

    // -------------------------------------------------------------------------
    // 2. Open games: two decisions side by side
    // -------------------------------------------------------------------------
    println!("\n2. Open Games");
    println!("-------------\n");

    println!("       ┌──────────┐");
    println!("  () ─▶│   row    │─▶ Move");
    println!("       └──────────┘");
    println!("            ⊗");
    println!("       ┌──────────┐");
    println!("  () ─▶│  column  │─▶ Move");
    println!("       └──────────┘\n");

    let open_game = prisoner().tensor(&prisoner());
    let context: OutcomeFn<(Move, Move), (f64, f64)> =
        Arc::new(|(row, column): &(Move, Move)| payoff(*row, *column));

    for option in &open_game.equilibria(&((), ()), &context) {
        println!("  equilibrium: {:?}", open_game.play(option).view(&((), ())));
    }

    println!("\n=== Done ===");
}
