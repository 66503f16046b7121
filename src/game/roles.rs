//! Random role assignment
//!
//! Picks the requested number of impostors uniformly without replacement
//! and labels everyone else normal. Pure function of roster, count, and
//! RNG; repeated calls with the same seed produce the same roster.

use rand::prelude::*;

use super::{ConfigError, Player, Role, MIN_PLAYERS};

/// Assign roles to a roster, choosing `impostor_count` impostors at random.
pub fn assign(roster: Vec<Player>, impostor_count: usize) -> Result<Vec<Player>, ConfigError> {
    assign_with_rng(roster, impostor_count, &mut rand::rng())
}

/// Assign roles using a specific RNG (for testing/seeding).
///
/// Validates the configuration first:
/// - at least 3 players
/// - at least 1 impostor
/// - impostors strictly under half the roster
pub fn assign_with_rng<R: Rng>(
    mut roster: Vec<Player>,
    impostor_count: usize,
    rng: &mut R,
) -> Result<Vec<Player>, ConfigError> {
    if roster.len() < MIN_PLAYERS {
        return Err(ConfigError::NotEnoughPlayers {
            count: roster.len(),
        });
    }
    if impostor_count == 0 {
        return Err(ConfigError::NoImpostors);
    }
    if impostor_count * 2 >= roster.len() {
        return Err(ConfigError::TooManyImpostors {
            impostors: impostor_count,
            players: roster.len(),
        });
    }

    // Re-roll duplicate picks until the quota is filled. Terminates because
    // the quota is under half the roster, and every remaining index keeps a
    // positive chance on each roll, so all subsets are equally likely.
    let mut picked: Vec<usize> = Vec::with_capacity(impostor_count);
    while picked.len() < impostor_count {
        let index = rng.random_range(0..roster.len());
        if !picked.contains(&index) {
            picked.push(index);
        }
    }

    for (index, player) in roster.iter_mut().enumerate() {
        player.role = if picked.contains(&index) {
            Role::Impostor
        } else {
            Role::Normal
        };
    }

    Ok(roster)
}
