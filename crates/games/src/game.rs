//! Normal-form game descriptors.
//!
//! A [`NormalFormGame`] bundles what the solver needs to know about a finite
//! game: the players, each player's options, and a payoff over full
//! profiles. It is a plain record: closures are passed in, nothing is
//! subclassed.
//!
//! ```rust
//! use open_games::{utility_maximizer, NormalFormGame, Optimizer};
//!
//! // Stag hunt: hunting stag pays only if both do.
//! let game = NormalFormGame::from_constants(
//!     "stag hunt",
//!     vec!["a", "b"],
//!     vec!["stag", "hare"],
//!     |p: &[&str]| match (p[0], p[1]) {
//!         ("stag", "stag") => vec![4.0, 4.0],
//!         ("stag", _) => vec![0.0, 3.0],
//!         (_, "stag") => vec![3.0, 0.0],
//!         _ => vec![3.0, 3.0],
//!     },
//! );
//!
//! let optimizers: Vec<Box<dyn Optimizer<&str, Vec<f64>>>> = vec![
//!     Box::new(utility_maximizer(0, vec!["stag", "hare"])),
//!     Box::new(utility_maximizer(1, vec!["stag", "hare"])),
//! ];
//! let equilibria = game.nash_equilibria(optimizers).unwrap();
//! assert_eq!(
//!     equilibria.into_vec(),
//!     vec![vec!["stag", "stag"], vec!["hare", "hare"]]
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use open_games_core::StructuralSet;

use crate::best_response::{BestResponse, PayoffFn};
use crate::deviation::{CausalDeviation, OptionProfile};
use crate::optimizer::Optimizer;
use crate::solver::{
    find_nash_equilibria_by_brute_force, get_all_option_profiles, NashSolver, SolveReport,
};
use crate::GameError;

/// Options available to a player.
pub type OptionsFn<Pl, O> = Arc<dyn Fn(&Pl) -> Vec<O> + Send + Sync>;

/// A finite game in normal form.
pub struct NormalFormGame<Pl, O, P> {
    name: String,
    players: Vec<Pl>,
    options: OptionsFn<Pl, O>,
    payoff: PayoffFn<O, P>,
}

impl<Pl, O, P> NormalFormGame<Pl, O, P>
where
    O: Clone + PartialEq + Send + Sync + 'static,
{
    /// Describe a game by its players, an options lookup and a payoff.
    pub fn new<F, G>(name: impl Into<String>, players: Vec<Pl>, options: F, payoff: G) -> Self
    where
        F: Fn(&Pl) -> Vec<O> + Send + Sync + 'static,
        G: Fn(&[O]) -> P + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            players,
            options: Arc::new(options),
            payoff: Arc::new(payoff),
        }
    }

    /// Describe a game in which every player has the same options.
    pub fn from_constants<G>(
        name: impl Into<String>,
        players: Vec<Pl>,
        options: Vec<O>,
        payoff: G,
    ) -> Self
    where
        G: Fn(&[O]) -> P + Send + Sync + 'static,
    {
        Self::new(name, players, move |_: &Pl| options.clone(), payoff)
    }

    /// Display name of the game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Players, in profile order.
    pub fn players(&self) -> &[Pl] {
        &self.players
    }

    /// Options of `player`.
    pub fn options(&self, player: &Pl) -> Vec<O> {
        (self.options)(player)
    }

    /// Every player's options, in player order.
    pub fn option_lists(&self) -> Vec<Vec<O>> {
        self.players.iter().map(|player| self.options(player)).collect()
    }

    /// Payoff of a full profile.
    pub fn payoff(&self, profile: &[O]) -> P {
        (self.payoff)(profile)
    }

    /// The shared payoff function.
    pub fn payoff_fn(&self) -> PayoffFn<O, P> {
        Arc::clone(&self.payoff)
    }

    /// The profile universe, first player slowest.
    pub fn all_option_profiles(&self) -> Vec<OptionProfile<O>> {
        get_all_option_profiles(&self.option_lists())
    }

    /// Best-response function for the given optimizers (one per player, in
    /// player order) under unilateral deviations.
    pub fn best_response(
        &self,
        optimizers: Vec<Box<dyn Optimizer<O, P>>>,
    ) -> Result<BestResponse<O, P>, GameError> {
        BestResponse::new(&self.players, optimizers, self.payoff_fn(), &CausalDeviation)
    }

    /// All pure Nash equilibria, in enumeration order.
    pub fn nash_equilibria(
        &self,
        optimizers: Vec<Box<dyn Optimizer<O, P>>>,
    ) -> Result<StructuralSet<OptionProfile<O>>, GameError> {
        let best_response = self.best_response(optimizers)?;
        find_nash_equilibria_by_brute_force(&self.all_option_profiles(), &best_response)
    }

    /// Solve with a configured solver.
    pub fn solve_with(
        &self,
        solver: &NashSolver,
        optimizers: Vec<Box<dyn Optimizer<O, P>>>,
    ) -> Result<SolveReport<O>, GameError> {
        let best_response = self.best_response(optimizers)?;
        log::debug!("solving {}", self.name);
        solver.solve(&self.all_option_profiles(), &best_response)
    }
}

impl<Pl, O, P> Clone for NormalFormGame<Pl, O, P>
where
    Pl: Clone,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            players: self.players.clone(),
            options: Arc::clone(&self.options),
            payoff: Arc::clone(&self.payoff),
        }
    }
}

impl<Pl: fmt::Debug, O, P> fmt::Debug for NormalFormGame<Pl, O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalFormGame")
            .field("name", &self.name)
            .field("players", &self.players)
            .finish_non_exhaustive()
    }
}
