//! Deviation maps: what happens when one player changes their mind.
//!
//! A deviation map for player `i` takes a base profile and a replacement
//! option and returns the profile in which only entry `i` has changed. The
//! input profile is never mutated.
//!
//! Maps are produced by a [`DeviationMapGenerator`]. The default generator,
//! [`CausalDeviation`], models the usual causal reading of a unilateral
//! deviation: switching your own option has no effect on anybody else's.

use crate::GameError;

/// One chosen option per player, ordered by player position.
pub type OptionProfile<O> = Vec<O>;

/// A per-player deviation map.
pub trait DeviationMap<O>: Send + Sync {
    /// The player whose entry this map replaces.
    fn player(&self) -> usize;

    /// The profile reached from `profile` when this player switches to
    /// `option`.
    ///
    /// Fails with [`GameError::ProfileArity`] if `profile` does not have one
    /// entry per player.
    fn deviate(&self, profile: &[O], option: &O) -> Result<OptionProfile<O>, GameError>;
}

/// Builds the deviation map for each player of a game.
pub trait DeviationMapGenerator<O>: Send + Sync {
    /// Deviation map for `player` in a game with `players` players.
    ///
    /// Fails with [`GameError::DeviationIndexOutOfRange`] if `player` is not
    /// a seat at the table.
    fn player_deviation_map(
        &self,
        player: usize,
        players: usize,
    ) -> Result<Box<dyn DeviationMap<O>>, GameError>;
}

// ============================================================================
// Unilateral Deviation
// ============================================================================

/// Replaces exactly one entry of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnilateralDeviation {
    player: usize,
    players: usize,
}

impl UnilateralDeviation {
    /// Deviation map for `player`, checked against the number of players.
    pub fn new(player: usize, players: usize) -> Result<Self, GameError> {
        if player >= players {
            return Err(GameError::DeviationIndexOutOfRange {
                index: player,
                players,
            });
        }
        Ok(Self { player, players })
    }
}

impl<O: Clone + Send + Sync> DeviationMap<O> for UnilateralDeviation {
    fn player(&self) -> usize {
        self.player
    }

    fn deviate(&self, profile: &[O], option: &O) -> Result<OptionProfile<O>, GameError> {
        if profile.len() != self.players {
            return Err(GameError::ProfileArity {
                expected: self.players,
                got: profile.len(),
            });
        }
        let mut deviated = profile.to_vec();
        deviated[self.player] = option.clone();
        Ok(deviated)
    }
}

/// The default generator: every player deviates unilaterally.
#[derive(Debug, Clone, Copy, Default)]
pub struct CausalDeviation;

impl<O: Clone + Send + Sync + 'static> DeviationMapGenerator<O> for CausalDeviation {
    fn player_deviation_map(
        &self,
        player: usize,
        players: usize,
    ) -> Result<Box<dyn DeviationMap<O>>, GameError> {
        Ok(Box::new(UnilateralDeviation::new(player, players)?))
    }
}

/// Replace entry `player` of `profile` with `option`.
///
/// Fails if `player` is not an index into `profile`.
pub fn deviate<O: Clone + Send + Sync>(
    profile: &[O],
    player: usize,
    option: &O,
) -> Result<OptionProfile<O>, GameError> {
    UnilateralDeviation::new(player, profile.len())?.deviate(profile, option)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviate_replaces_only_one_entry() {
        let profile = vec!['a', 'b', 'c'];
        for player in 0..profile.len() {
            for option in ['x', 'y', 'b'] {
                let deviated = deviate(&profile, player, &option).unwrap();
                assert_eq!(deviated.len(), profile.len());
                for (j, entry) in deviated.iter().enumerate() {
                    if j == player {
                        assert_eq!(*entry, option);
                    } else {
                        assert_eq!(*entry, profile[j]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_deviate_does_not_mutate_input() {
        let profile = vec![1, 2, 3];
        let _ = deviate(&profile, 1, &9).unwrap();
        assert_eq!(profile, vec![1, 2, 3]);
    }

    #[test]
    fn test_index_out_of_range_is_configuration_error() {
        let err = deviate(&[1, 2], 2, &0).unwrap_err();
        assert_eq!(
            err,
            GameError::DeviationIndexOutOfRange {
                index: 2,
                players: 2
            }
        );
    }

    #[test]
    fn test_generator_checks_index() {
        let generator = CausalDeviation;
        let map: Box<dyn DeviationMap<u8>> = generator.player_deviation_map(1, 3).unwrap();
        assert_eq!(map.player(), 1);
        assert_eq!(map.deviate(&[0, 0, 0], &7).unwrap(), vec![0, 7, 0]);

        let err = DeviationMapGenerator::<u8>::player_deviation_map(&generator, 3, 3);
        assert!(err.is_err());
    }

    #[test]
    fn test_short_profile_is_reported() {
        let map: Box<dyn DeviationMap<u8>> = CausalDeviation.player_deviation_map(1, 2).unwrap();
        let err = map.deviate(&[0], &7).unwrap_err();
        assert_eq!(err, GameError::ProfileArity { expected: 2, got: 1 });

        let err = map.deviate(&[0, 0, 0], &7).unwrap_err();
        assert_eq!(err, GameError::ProfileArity { expected: 2, got: 3 });
    }
}
