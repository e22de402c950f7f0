//! Solver hooks for observability.
//!
//! Hooks observe a solve without changing it. Every method has a no-op
//! default, so a hook only implements the events it cares about.
//!
//! ## Events
//!
//! - `on_solve_start`: before enumeration, with the size of the universe
//! - `on_profile_checked`: after each equilibrium test
//! - `on_equilibrium`: for each equilibrium, in enumeration order
//! - `on_solve_end`: after a successful solve
//! - `on_error`: when a solve fails
//!
//! In parallel mode `on_profile_checked` fires from worker threads in no
//! particular order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::GameError;

// ============================================================================
// Solver Hook Trait
// ============================================================================

/// Trait for observing solver events.
pub trait SolverHook: Send + Sync {
    /// Called before enumeration starts.
    fn on_solve_start(&self, _profiles: usize) {}

    /// Called after the profile at `index` has been tested.
    fn on_profile_checked(&self, _index: usize, _is_equilibrium: bool) {}

    /// Called once per equilibrium, with its index in the universe.
    fn on_equilibrium(&self, _index: usize) {}

    /// Called when a solve completes.
    fn on_solve_end(&self, _checked: usize, _equilibria: usize, _elapsed: Duration) {}

    /// Called when a solve fails.
    fn on_error(&self, _error: &GameError) {}
}

/// A no-op hook for when no observation is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHook;

impl SolverHook for NullHook {}

// ============================================================================
// Logging Hook
// ============================================================================

/// A hook that forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook {
    /// Also log every profile check (at trace level)
    pub verbose: bool,
}

impl LoggingHook {
    /// Create a new logging hook.
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Create a hook that also logs each profile check.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl SolverHook for LoggingHook {
    fn on_solve_start(&self, profiles: usize) {
        log::info!("{:<24}{:>12}", "enumerating profiles", profiles);
    }

    fn on_profile_checked(&self, index: usize, is_equilibrium: bool) {
        if self.verbose {
            log::trace!("profile #{} equilibrium={}", index, is_equilibrium);
        }
    }

    fn on_equilibrium(&self, index: usize) {
        log::debug!("profile #{} is a Nash equilibrium", index);
    }

    fn on_solve_end(&self, checked: usize, equilibria: usize, elapsed: Duration) {
        log::info!(
            "{:<24}{:>12} equilibria in {} profiles ({:?})",
            "solve finished",
            equilibria,
            checked,
            elapsed
        );
    }

    fn on_error(&self, error: &GameError) {
        log::warn!("solve failed: {}", error);
    }
}

// ============================================================================
// Counting Hook
// ============================================================================

/// A hook that counts events; handy in tests and progress displays.
#[derive(Debug, Clone, Default)]
pub struct CountingHook {
    checked: Arc<AtomicUsize>,
    equilibria: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl CountingHook {
    /// Create a hook with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Profiles checked so far.
    pub fn checked(&self) -> usize {
        self.checked.load(Ordering::SeqCst)
    }

    /// Equilibria reported so far.
    pub fn equilibria(&self) -> usize {
        self.equilibria.load(Ordering::SeqCst)
    }

    /// Failed solves so far.
    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl SolverHook for CountingHook {
    fn on_profile_checked(&self, _index: usize, _is_equilibrium: bool) {
        self.checked.fetch_add(1, Ordering::SeqCst);
    }

    fn on_equilibrium(&self, _index: usize) {
        self.equilibria.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _error: &GameError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Composite Hook
// ============================================================================

/// A hook that delegates to multiple inner hooks.
#[derive(Default)]
pub struct CompositeHook {
    hooks: Vec<Box<dyn SolverHook>>,
}

impl CompositeHook {
    /// Create a new composite hook.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook to the composite.
    pub fn with<H: SolverHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }
}

impl SolverHook for CompositeHook {
    fn on_solve_start(&self, profiles: usize) {
        for hook in &self.hooks {
            hook.on_solve_start(profiles);
        }
    }

    fn on_profile_checked(&self, index: usize, is_equilibrium: bool) {
        for hook in &self.hooks {
            hook.on_profile_checked(index, is_equilibrium);
        }
    }

    fn on_equilibrium(&self, index: usize) {
        for hook in &self.hooks {
            hook.on_equilibrium(index);
        }
    }

    fn on_solve_end(&self, checked: usize, equilibria: usize, elapsed: Duration) {
        for hook in &self.hooks {
            hook.on_solve_end(checked, equilibria, elapsed);
        }
    }

    fn on_error(&self, error: &GameError) {
        for hook in &self.hooks {
            hook.on_error(error);
        }
    }
}
