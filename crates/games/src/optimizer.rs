//! Optimizers: per-player decision procedures.
//!
//! An optimizer is handed a *task*, a function from one player's options to
//! the payoff that option would lead to, and answers with every option that
//! is locally optimal. Ties are kept.
//!
//! ```text
//!             ┌─────────────┐
//!  task ─────▶│  Optimizer  │─────▶ { optimal options }
//!  (O → P)    └─────────────┘
//! ```
//!
//! Optimizers are swappable: the same game can be solved for utility
//! maximisers, for satisficers, or for anything else that picks a set of
//! options from a task.

use std::sync::Arc;

use open_games_core::StructuralSet;

/// A decision procedure over one player's options.
///
/// Implementations must be pure: the same task always yields the same set.
/// Closures of the right shape are optimizers too:
///
/// ```rust
/// use open_games::Optimizer;
/// use open_games_core::StructuralSet;
///
/// let always_zero = |_task: &dyn Fn(&u8) -> f64| StructuralSet::singleton(0u8);
/// assert!(always_zero.optimize(&|o: &u8| *o as f64).contains(&0));
/// ```
pub trait Optimizer<O, P>: Send + Sync {
    /// Every option that is optimal for `task`.
    fn optimize(&self, task: &dyn Fn(&O) -> P) -> StructuralSet<O>;
}

impl<O, P, F> Optimizer<O, P> for F
where
    F: Fn(&dyn Fn(&O) -> P) -> StructuralSet<O> + Send + Sync,
{
    fn optimize(&self, task: &dyn Fn(&O) -> P) -> StructuralSet<O> {
        self(task)
    }
}

// ============================================================================
// Argmax
// ============================================================================

/// Selects the options whose payoff scores highest.
///
/// Tie-break policy: keep a running best score (starting at negative
/// infinity) and a running set. A strictly better option clears the set and
/// becomes its only member, an equally good option joins it, a worse option
/// is ignored. A NaN score never joins the set.
pub struct Argmax<O, P> {
    options: Vec<O>,
    score: Arc<dyn Fn(&P) -> f64 + Send + Sync>,
}

impl<O, P> Argmax<O, P> {
    /// Maximise `score(payoff)` over `options`.
    pub fn new<F>(options: Vec<O>, score: F) -> Self
    where
        F: Fn(&P) -> f64 + Send + Sync + 'static,
    {
        Self {
            options,
            score: Arc::new(score),
        }
    }

    /// The options this optimizer ranges over.
    pub fn options(&self) -> &[O] {
        &self.options
    }
}

impl<O, P> Optimizer<O, P> for Argmax<O, P>
where
    O: Clone + PartialEq + Send + Sync,
{
    fn optimize(&self, task: &dyn Fn(&O) -> P) -> StructuralSet<O> {
        let mut best = f64::NEG_INFINITY;
        let mut optimal = StructuralSet::new();

        for option in &self.options {
            let score = (self.score)(&task(option));
            if score > best {
                optimal.clear();
                optimal.insert(option.clone());
                best = score;
            } else if score == best {
                optimal.insert(option.clone());
            }
        }

        optimal
    }
}

/// Reference optimizer: maximise coordinate `player_index` of a vector payoff.
///
/// A payoff vector that has no such coordinate never counts as optimal.
pub fn utility_maximizer<O>(player_index: usize, options: Vec<O>) -> Argmax<O, Vec<f64>> {
    Argmax::new(options, move |payoff: &Vec<f64>| {
        payoff.get(player_index).copied().unwrap_or(f64::NAN)
    })
}

/// Maximise a scalar payoff.
pub fn scalar_maximizer<O>(options: Vec<O>) -> Argmax<O, f64> {
    Argmax::new(options, |payoff: &f64| *payoff)
}
