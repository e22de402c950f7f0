//! Error types for game construction and solving.

use thiserror::Error;

/// Errors that can occur while building best-response functions or solving.
///
/// The first group are configuration errors: they are raised when a game is
/// wired together, never halfway through a solve. A player with no options
/// is not an error; it simply has no best response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// One optimizer is required per player.
    #[error("Expected one optimizer per player: {players} players, {optimizers} optimizers")]
    OptimizerCountMismatch { players: usize, optimizers: usize },

    /// A deviation map was requested for a player that does not exist.
    #[error("Deviation index {index} out of range for {players} players")]
    DeviationIndexOutOfRange { index: usize, players: usize },

    /// A profile does not have one entry per player.
    #[error("Profile has {got} entries, expected {expected}")]
    ProfileArity { expected: usize, got: usize },

    /// Solver configuration rejected.
    #[error("Invalid solver configuration: {message}")]
    InvalidConfig { message: String },

    /// Enumeration was cancelled through a cancellation token.
    #[error("Solve cancelled after checking {checked} profiles")]
    Cancelled { checked: usize },

    /// Enumeration ran past its deadline.
    #[error("Solve exceeded its deadline after checking {checked} profiles ({elapsed_ms} ms)")]
    DeadlineExceeded { checked: usize, elapsed_ms: u64 },

    /// The profile universe is larger than the configured limit.
    #[error("Profile universe of {size} exceeds the limit of {limit}")]
    ProfileLimitExceeded { size: usize, limit: usize },
}
