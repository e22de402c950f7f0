//! Nash solver: brute-force enumeration of the profile universe.
//!
//! A profile is a Nash equilibrium when it belongs to its own best-response
//! set. The solver tests every profile of the universe once; there is no
//! dominance elimination and no iterative refinement.
//!
//! # Cost
//!
//! The universe has `Π|options_i|` profiles and each test runs every
//! player's optimizer once, so a solve costs
//! `O(Π|options_i| × Σ|options_i| × cost(payoff))`. That is exponential in
//! the number of players, which is why [`NashSolver`] can refuse oversized
//! universes, stop at a deadline or on cancellation, and check profiles in
//! parallel (each test is independent of the others).
//!
//! # Ordering
//!
//! Equilibria are reported in the order of the input universe, in both
//! sequential and parallel mode.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use open_games_core::{cartesian, StructuralSet};
use rayon::prelude::*;

use crate::best_response::BestResponseFunction;
use crate::config::SolverConfig;
use crate::deviation::OptionProfile;
use crate::hooks::{NullHook, SolverHook};
use crate::GameError;

/// `profile ∈ best_response(profile)`, under value equality.
pub fn is_nash_equilibrium<O, B>(profile: &[O], best_response: &B) -> Result<bool, GameError>
where
    O: PartialEq,
    B: BestResponseFunction<O> + ?Sized,
{
    let responses = best_response.best_responses(profile)?;
    Ok(responses
        .iter()
        .any(|candidate| candidate.as_slice() == profile))
}

/// Every option profile: the cartesian product of the players' option lists.
///
/// The first player's option varies slowest. No lists give one empty
/// profile; an empty list gives no profiles.
pub fn get_all_option_profiles<O, L>(option_lists: &[L]) -> Vec<OptionProfile<O>>
where
    O: Clone,
    L: AsRef<[O]>,
{
    cartesian(option_lists)
}

/// Filter `profiles` down to the Nash equilibria, sequentially and without
/// limits.
///
/// `profiles` should be a universe of distinct profiles, such as the output
/// of [`get_all_option_profiles`]; a repeated profile is reported once per
/// occurrence.
pub fn find_nash_equilibria_by_brute_force<O, B>(
    profiles: &[OptionProfile<O>],
    best_response: &B,
) -> Result<StructuralSet<OptionProfile<O>>, GameError>
where
    O: Clone + PartialEq + Send + Sync,
    B: BestResponseFunction<O> + ?Sized,
{
    NashSolver::default()
        .solve(profiles, best_response)
        .map(|report| report.equilibria)
}

// ============================================================================
// Cancellation
// ============================================================================

/// A shared flag that stops a running solve.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every solve holding this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Result of a successful solve.
#[derive(Debug, Clone)]
pub struct SolveReport<O> {
    /// Equilibria, in enumeration order
    pub equilibria: StructuralSet<OptionProfile<O>>,
    /// Number of profiles tested
    pub profiles_checked: usize,
    /// Wall-clock time spent
    pub elapsed: Duration,
}

/// Brute-force Nash solver with optional guards.
pub struct NashSolver {
    config: SolverConfig,
    hook: Arc<dyn SolverHook>,
    cancellation: Option<CancellationToken>,
}

impl NashSolver {
    /// Create a solver, rejecting an invalid config.
    pub fn new(config: SolverConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            hook: Arc::new(NullHook),
            cancellation: None,
        })
    }

    /// Observe solves with `hook`.
    pub fn with_hook<H: SolverHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Arc::new(hook);
        self
    }

    /// Stop solves when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Test every profile of `profiles` against `best_response`.
    ///
    /// Costs one equilibrium test per profile; collecting the equilibria adds
    /// no membership scans, so `profiles` is expected to hold no repeats.
    pub fn solve<O, B>(
        &self,
        profiles: &[OptionProfile<O>],
        best_response: &B,
    ) -> Result<SolveReport<O>, GameError>
    where
        O: Clone + PartialEq + Send + Sync,
        B: BestResponseFunction<O> + ?Sized,
    {
        let result = self.enumerate(profiles, best_response);
        match &result {
            Ok(report) => self.hook.on_solve_end(
                report.profiles_checked,
                report.equilibria.len(),
                report.elapsed,
            ),
            Err(error) => self.hook.on_error(error),
        }
        result
    }

    fn enumerate<O, B>(
        &self,
        profiles: &[OptionProfile<O>],
        best_response: &B,
    ) -> Result<SolveReport<O>, GameError>
    where
        O: Clone + PartialEq + Send + Sync,
        B: BestResponseFunction<O> + ?Sized,
    {
        if let Some(limit) = self.config.max_profiles {
            if profiles.len() > limit {
                return Err(GameError::ProfileLimitExceeded {
                    size: profiles.len(),
                    limit,
                });
            }
        }

        log::debug!(
            "solving {} profiles (parallel = {})",
            profiles.len(),
            self.config.parallel
        );
        self.hook.on_solve_start(profiles.len());

        let start = Instant::now();
        let checked = AtomicUsize::new(0);
        let check = |index: usize, profile: &OptionProfile<O>| -> Result<bool, GameError> {
            self.guard(&checked, start)?;
            let verdict = is_nash_equilibrium(profile, best_response)?;
            checked.fetch_add(1, Ordering::Relaxed);
            self.hook.on_profile_checked(index, verdict);
            Ok(verdict)
        };

        let verdicts: Vec<bool> = if self.config.parallel {
            profiles
                .par_iter()
                .enumerate()
                .map(|(index, profile)| check(index, profile))
                .collect::<Result<_, _>>()?
        } else {
            profiles
                .iter()
                .enumerate()
                .map(|(index, profile)| check(index, profile))
                .collect::<Result<_, _>>()?
        };

        let mut equilibria = Vec::new();
        for (index, (profile, verdict)) in profiles.iter().zip(verdicts).enumerate() {
            if verdict {
                self.hook.on_equilibrium(index);
                equilibria.push(profile.clone());
            }
        }

        Ok(SolveReport {
            equilibria: StructuralSet::from_distinct(equilibria),
            profiles_checked: checked.into_inner(),
            elapsed: start.elapsed(),
        })
    }

    fn guard(&self, checked: &AtomicUsize, start: Instant) -> Result<(), GameError> {
        if let Some(token) = &self.cancellation {
            if token.is_cancelled() {
                return Err(GameError::Cancelled {
                    checked: checked.load(Ordering::Relaxed),
                });
            }
        }
        if let Some(deadline) = self.config.deadline() {
            let elapsed = start.elapsed();
            if elapsed > deadline {
                return Err(GameError::DeadlineExceeded {
                    checked: checked.load(Ordering::Relaxed),
                    elapsed_ms: elapsed.as_millis().try_into().unwrap_or(u64::MAX),
                });
            }
        }
        Ok(())
    }
}

impl Default for NashSolver {
    fn default() -> Self {
        Self {
            config: SolverConfig::default(),
            hook: Arc::new(NullHook),
            cancellation: None,
        }
    }
}

impl fmt::Debug for NashSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NashSolver")
            .field("config", &self.config)
            .field("cancellable", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::CountingHook;

    /// Coordination on the diagonal: (i, i) is an equilibrium for every i.
    fn diagonal(profile: &[u8]) -> Result<StructuralSet<OptionProfile<u8>>, GameError> {
        if profile.len() != 2 {
            return Err(GameError::ProfileArity {
                expected: 2,
                got: profile.len(),
            });
        }
        let target = if profile[0] == profile[1] {
            profile.to_vec()
        } else {
            vec![profile[0], profile[0]]
        };
        Ok(StructuralSet::singleton(target))
    }

    fn universe() -> Vec<OptionProfile<u8>> {
        get_all_option_profiles(&[vec![0u8, 1, 2], vec![0u8, 1, 2]])
    }

    #[test]
    fn test_is_nash_equilibrium() {
        assert!(is_nash_equilibrium(&[1, 1], &diagonal).unwrap());
        assert!(!is_nash_equilibrium(&[1, 2], &diagonal).unwrap());
    }

    #[test]
    fn test_brute_force_keeps_enumeration_order() {
        let equilibria = find_nash_equilibria_by_brute_force(&universe(), &diagonal).unwrap();
        assert_eq!(
            equilibria.into_vec(),
            vec![vec![0, 0], vec![1, 1], vec![2, 2]]
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = NashSolver::default().solve(&universe(), &diagonal).unwrap();
        let parallel = NashSolver::new(SolverConfig::default().with_parallel(true))
            .unwrap()
            .solve(&universe(), &diagonal)
            .unwrap();

        assert_eq!(
            parallel.equilibria.as_slice(),
            sequential.equilibria.as_slice()
        );
        assert_eq!(parallel.profiles_checked, 9);
    }

    #[test]
    fn test_profile_limit() {
        let solver = NashSolver::new(SolverConfig::default().with_max_profiles(8)).unwrap();
        let err = solver.solve(&universe(), &diagonal).unwrap_err();
        assert_eq!(err, GameError::ProfileLimitExceeded { size: 9, limit: 8 });
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let hook = CountingHook::new();
        let solver = NashSolver::default()
            .with_cancellation(token)
            .with_hook(hook.clone());

        let err = solver.solve(&universe(), &diagonal).unwrap_err();
        assert_eq!(err, GameError::Cancelled { checked: 0 });
        assert_eq!(hook.errors(), 1);
        assert_eq!(hook.checked(), 0);
    }

    #[test]
    fn test_cancel_midway() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let best_response = move |profile: &[u8]| {
            if profile == [1, 0] {
                trigger.cancel();
            }
            diagonal(profile)
        };

        let solver = NashSolver::default().with_cancellation(token);
        let err = solver.solve(&universe(), &best_response).unwrap_err();
        // [1, 0] is the fourth profile; it completes, the fifth is refused.
        assert_eq!(err, GameError::Cancelled { checked: 4 });
    }

    #[test]
    fn test_hook_sees_every_profile() {
        let hook = CountingHook::new();
        let report = NashSolver::default()
            .with_hook(hook.clone())
            .solve(&universe(), &diagonal)
            .unwrap();

        assert_eq!(report.profiles_checked, 9);
        assert_eq!(hook.checked(), 9);
        assert_eq!(hook.equilibria(), 3);
    }

    #[test]
    fn test_arity_errors_propagate() {
        let ragged = vec![vec![0u8, 0], vec![1u8]];
        let err = find_nash_equilibria_by_brute_force(&ragged, &diagonal).unwrap_err();
        assert_eq!(err, GameError::ProfileArity { expected: 2, got: 1 });
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(NashSolver::new(SolverConfig::default().with_max_profiles(0)).is_err());
    }

    #[test]
    fn test_whole_universe_in_equilibrium() {
        // Everyone is indifferent, so every profile is its own best response.
        let indifferent =
            |profile: &[u8]| Ok::<_, GameError>(StructuralSet::singleton(profile.to_vec()));
        let options: Vec<Vec<u8>> = (0..5).map(|_| (0u8..5).collect()).collect();
        let universe = get_all_option_profiles(&options);

        let report = NashSolver::default().solve(&universe, &indifferent).unwrap();
        assert_eq!(report.profiles_checked, 3125);
        assert_eq!(report.equilibria.into_vec(), universe);
    }
}
