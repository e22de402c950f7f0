//! # Open Games
//!
//! This crate builds and solves finite non-cooperative games compositionally:
//! - Small decision stages are **open games** with typed interfaces
//! - Larger games are assembled by sequential and parallel composition
//! - Best-response relations compose along with the games themselves
//! - A brute-force solver finds pure Nash equilibria
//!
//! ## Core Components
//!
//! - [`OpenGame`]: option-indexed lenses plus a best-response relation
//! - [`Optimizer`]: a player's decision procedure (`(O → P) → set of O`)
//! - [`BestResponse`]: profile-level best responses from optimizers, deviation
//!   maps and a payoff function
//! - [`NashSolver`]: enumerates a profile universe and keeps the fixed points
//! - [`NormalFormGame`]: a plain game descriptor tying the above together
//!
//! Lenses, structural sets and cartesian products live in [`open_games_core`].
//!
//! ## Example
//!
//! ```rust
//! use open_games::{utility_maximizer, NormalFormGame, Optimizer};
//!
//! let game = NormalFormGame::from_constants(
//!     "prisoner's dilemma",
//!     vec!["row", "column"],
//!     vec!['C', 'D'],
//!     |p: &[char]| match (p[0], p[1]) {
//!         ('C', 'C') => vec![2.0, 2.0],
//!         ('C', 'D') => vec![0.0, 3.0],
//!         ('D', 'C') => vec![3.0, 0.0],
//!         _ => vec![1.0, 1.0],
//!     },
//! );
//!
//! let optimizers: Vec<Box<dyn Optimizer<char, Vec<f64>>>> = vec![
//!     Box::new(utility_maximizer(0, vec!['C', 'D'])),
//!     Box::new(utility_maximizer(1, vec!['C', 'D'])),
//! ];
//! let equilibria = game.nash_equilibria(optimizers).unwrap();
//! assert_eq!(equilibria.into_vec(), vec![vec!['D', 'D']]);
//! ```
//!
//! ## Compositional Design
//!
//! ```text
//!          ┌──────────┐        ┌──────────┐
//!    X ───▶│          │── Y ──▶│          │───▶ Z
//!          │    g     │        │    h     │
//!    S ◀───│          │◀── R ──│          │◀─── Q
//!          └──────────┘        └──────────┘
//!                     g.then(&h)
//! ```
//!
//! Swap an optimizer → different player behaviour, same game
//! Swap a stage → same players, different game

pub mod best_response;
pub mod config;
pub mod deviation;
mod error;
pub mod game;
pub mod hooks;
pub mod open_game;
pub mod optimizer;
pub mod solver;

pub use best_response::{BestResponse, BestResponseFunction, PayoffFn};
pub use config::SolverConfig;
pub use deviation::{
    deviate, CausalDeviation, DeviationMap, DeviationMapGenerator, OptionProfile,
    UnilateralDeviation,
};
pub use error::GameError;
pub use game::NormalFormGame;
pub use hooks::{CompositeHook, CountingHook, LoggingHook, NullHook, SolverHook};
pub use open_game::OpenGame;
pub use optimizer::{scalar_maximizer, utility_maximizer, Argmax, Optimizer};
pub use solver::{
    find_nash_equilibria_by_brute_force, get_all_option_profiles, is_nash_equilibrium,
    CancellationToken, NashSolver, SolveReport,
};
