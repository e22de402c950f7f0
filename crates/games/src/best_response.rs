//! Best-response construction.
//!
//! Given deviation maps, one optimizer per player and a payoff function, the
//! best response to a profile `p` is computed as follows:
//!
//! 1. For each player `i`, build the task `o ↦ payoff(deviate_i(p, o))`.
//! 2. Ask optimizer `i` for its optimal options on that task.
//! 3. Map each optimal option back to a full profile through `deviate_i(p, ·)`.
//! 4. Intersect the per-player profile sets.
//!
//! What survives the intersection are the profiles reachable by a single
//! player's unilateral deviation that are simultaneously optimal for every
//! player who could have produced them. In particular `p` survives exactly
//! when nobody wants to move, which is the Nash condition.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use open_games_core::StructuralSet;

use crate::deviation::{DeviationMap, DeviationMapGenerator, OptionProfile};
use crate::optimizer::Optimizer;
use crate::GameError;

/// A shared payoff function over full profiles.
pub type PayoffFn<O, P> = Arc<dyn Fn(&[O]) -> P + Send + Sync>;

/// A profile-level best-response correspondence.
pub trait BestResponseFunction<O>: Send + Sync {
    /// Profiles that are jointly optimal unilateral deviations from `profile`.
    fn best_responses(&self, profile: &[O]) -> Result<StructuralSet<OptionProfile<O>>, GameError>;
}

impl<O, F> BestResponseFunction<O> for F
where
    F: Fn(&[O]) -> Result<StructuralSet<OptionProfile<O>>, GameError> + Send + Sync,
{
    fn best_responses(&self, profile: &[O]) -> Result<StructuralSet<OptionProfile<O>>, GameError> {
        self(profile)
    }
}

/// The best-response function built from optimizers, deviations and payoffs.
pub struct BestResponse<O, P> {
    optimizers: Vec<Box<dyn Optimizer<O, P>>>,
    deviations: Vec<Box<dyn DeviationMap<O>>>,
    payoff: PayoffFn<O, P>,
}

impl<O, P> BestResponse<O, P>
where
    O: Clone + PartialEq + Send + Sync + 'static,
{
    /// Wire a best-response function for `players`.
    ///
    /// Fails immediately if the optimizer count does not match the player
    /// count, or if the generator rejects a player index.
    pub fn new<Pl>(
        players: &[Pl],
        optimizers: Vec<Box<dyn Optimizer<O, P>>>,
        payoff: PayoffFn<O, P>,
        generator: &dyn DeviationMapGenerator<O>,
    ) -> Result<Self, GameError> {
        if optimizers.len() != players.len() {
            return Err(GameError::OptimizerCountMismatch {
                players: players.len(),
                optimizers: optimizers.len(),
            });
        }

        let deviations = (0..players.len())
            .map(|player| generator.player_deviation_map(player, players.len()))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("best response wired for {} players", players.len());

        Ok(Self {
            optimizers,
            deviations,
            payoff,
        })
    }

    /// Number of players (and so the required profile length).
    pub fn players(&self) -> usize {
        self.deviations.len()
    }

    /// The profiles player `player` would move `profile` to, before
    /// intersecting with anyone else's. Ties are all kept.
    pub fn unilateral_best_responses(
        &self,
        profile: &[O],
        player: usize,
    ) -> Result<StructuralSet<OptionProfile<O>>, GameError> {
        self.check_arity(profile)?;
        let (deviation, optimizer) = self
            .deviations
            .get(player)
            .zip(self.optimizers.get(player))
            .ok_or(GameError::DeviationIndexOutOfRange {
                index: player,
                players: self.players(),
            })?;
        self.player_best_responses(profile, deviation.as_ref(), optimizer.as_ref())
    }

    fn player_best_responses(
        &self,
        profile: &[O],
        deviation: &dyn DeviationMap<O>,
        optimizer: &dyn Optimizer<O, P>,
    ) -> Result<StructuralSet<OptionProfile<O>>, GameError> {
        // The optimizer still needs a payoff for a failed deviation; the
        // recorded error replaces its answer.
        let failure = RefCell::new(None);
        let task = |option: &O| match deviation.deviate(profile, option) {
            Ok(deviated) => (self.payoff)(&deviated),
            Err(error) => {
                let mut slot = failure.borrow_mut();
                if slot.is_none() {
                    *slot = Some(error);
                }
                (self.payoff)(profile)
            }
        };
        let optimal = optimizer.optimize(&task);
        if let Some(error) = failure.into_inner() {
            return Err(error);
        }

        optimal
            .iter()
            .map(|option| deviation.deviate(profile, option))
            .collect()
    }

    fn check_arity(&self, profile: &[O]) -> Result<(), GameError> {
        if profile.len() != self.players() {
            return Err(GameError::ProfileArity {
                expected: self.players(),
                got: profile.len(),
            });
        }
        Ok(())
    }
}

impl<O, P> BestResponseFunction<O> for BestResponse<O, P>
where
    O: Clone + PartialEq + Send + Sync + 'static,
{
    fn best_responses(&self, profile: &[O]) -> Result<StructuralSet<OptionProfile<O>>, GameError> {
        self.check_arity(profile)?;
        let per_player = self
            .deviations
            .iter()
            .zip(&self.optimizers)
            .map(|(deviation, optimizer)| {
                let responses =
                    self.player_best_responses(profile, deviation.as_ref(), optimizer.as_ref())?;
                log::trace!(
                    "player {} has {} optimal deviations",
                    deviation.player(),
                    responses.len()
                );
                Ok(responses)
            })
            .collect::<Result<Vec<_>, GameError>>()?;
        Ok(StructuralSet::intersection_of_all(per_player))
    }
}

impl<O, P> fmt::Debug for BestResponse<O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestResponse")
            .field("players", &self.deviations.len())
            .finish_non_exhaustive()
    }
}
