//! Solver configuration.
//!
//! Brute-force solving is exponential in the number of players, so the
//! solver can be told to refuse oversized universes, to give up after a
//! deadline, and to spread profile checks across threads. The config is
//! plain data and round-trips through serde:
//!
//! ```rust
//! use open_games::SolverConfig;
//!
//! let config: SolverConfig =
//!     serde_json::from_str(r#"{ "parallel": true, "max_profiles": 10000 }"#).unwrap();
//! assert!(config.parallel);
//! assert_eq!(config.deadline(), None);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Configuration for [`crate::NashSolver`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Check profiles on the rayon thread pool
    pub parallel: bool,
    /// Refuse to enumerate universes larger than this
    pub max_profiles: Option<usize>,
    /// Give up after this many milliseconds
    pub deadline_ms: Option<u64>,
}

impl SolverConfig {
    /// Enable or disable parallel profile checks.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the largest universe the solver will enumerate.
    pub fn with_max_profiles(mut self, max: usize) -> Self {
        self.max_profiles = Some(max);
        self
    }

    /// Set a deadline for a single solve.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// The deadline as a duration.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Reject settings that could never allow a solve.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_profiles == Some(0) {
            return Err(GameError::InvalidConfig {
                message: "max_profiles must be at least 1".to_string(),
            });
        }
        if self.deadline_ms == Some(0) {
            return Err(GameError::InvalidConfig {
                message: "deadline_ms must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
