#![allow(dead_code)]
//! Persisted win/loss statistics
//!
//! This module provides:
//! - Per-player lifetime counters keyed by display name
//! - Batched outcome application at game end
//! - A derived global aggregate with win rates
//!
//! All player rows live in one JSON blob under the `playerStats` key. The
//! global games counter is a separate `totalGames` key, incremented once
//! per completed game and never derived from the per-player sum; the two
//! counters are reconciled only by that call pattern and may drift if a
//! caller skips one of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError};

/// Key holding the username -> stats row map
pub const PLAYER_STATS_KEY: &str = "playerStats";

/// Key holding the independent completed-games counter
pub const TOTAL_GAMES_KEY: &str = "totalGames";

/// Which side of the game a stats update counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatRole {
    Impostor,
    Crewmate,
}

/// One per-player outcome from a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatUpdate {
    pub username: String,
    pub role: StatRole,
    pub won: bool,
}

/// Lifetime counters for one player name.
///
/// Every field is monotonically non-decreasing, and
/// `games_played == impostor_games + crewmate_games` holds after every
/// update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub games_played: u32,
    pub impostor_games: u32,
    pub impostor_wins: u32,
    pub crewmate_games: u32,
    pub crewmate_wins: u32,
}

impl PlayerStats {
    /// Fold one game outcome into the row.
    fn apply(&mut self, update: &StatUpdate) {
        self.games_played += 1;
        match update.role {
            StatRole::Impostor => {
                self.impostor_games += 1;
                if update.won {
                    self.impostor_wins += 1;
                }
            }
            StatRole::Crewmate => {
                self.crewmate_games += 1;
                if update.won {
                    self.crewmate_wins += 1;
                }
            }
        }
    }

    pub fn total_wins(&self) -> u32 {
        self.impostor_wins + self.crewmate_wins
    }

    /// Impostor win percentage, 0 when the player never was one.
    pub fn impostor_win_rate(&self) -> f64 {
        percentage(self.impostor_wins, self.impostor_games)
    }

    /// Crewmate win percentage, 0 when the player never was one.
    pub fn crewmate_win_rate(&self) -> f64 {
        percentage(self.crewmate_wins, self.crewmate_games)
    }

    /// Overall win percentage across both roles.
    pub fn win_rate(&self) -> f64 {
        percentage(self.total_wins(), self.games_played)
    }
}

fn percentage(wins: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        f64::from(wins) / f64::from(games) * 100.0
    }
}

/// Aggregate over all persisted player rows.
///
/// `total_games` comes from its own counter, not from the fold, so it can
/// legitimately differ from what the per-role sums suggest.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalStats {
    pub total_games: u64,
    pub impostor_games: u64,
    pub impostor_wins: u64,
    pub impostor_win_rate: f64,
    pub crewmate_games: u64,
    pub crewmate_wins: u64,
    pub crewmate_win_rate: f64,
}

/// Read/write access to the persisted statistics blobs.
///
/// Every read treats a missing or corrupt blob as empty; writes are
/// best-effort and the caller decides whether to care about the error.
pub struct StatsStore<'a> {
    storage: &'a Storage,
}

impl<'a> StatsStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        StatsStore { storage }
    }

    /// All persisted rows, keyed by username.
    pub fn read_all(&self) -> BTreeMap<String, PlayerStats> {
        let json = match self.storage.get(PLAYER_STATS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                log::warn!("failed to read {}: {}", PLAYER_STATS_KEY, e);
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("corrupt {} blob, starting empty: {}", PLAYER_STATS_KEY, e);
            BTreeMap::new()
        })
    }

    /// Fold a batch of game outcomes into the persisted rows.
    ///
    /// Rows are created zeroed on first sight of a username, and repeated
    /// usernames within one batch accumulate into the same row. The write
    /// is a single read-modify-write of the whole blob; a failure can lose
    /// the entire batch but never half-applies a row.
    pub fn apply_batch(&self, updates: &[StatUpdate]) -> Result<(), StorageError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut all = self.read_all();
        for update in updates {
            all.entry(update.username.clone()).or_default().apply(update);
        }

        let json = serde_json::to_string(&all)?;
        self.storage.set(PLAYER_STATS_KEY, &json)
    }

    /// The independent completed-games counter.
    pub fn total_games(&self) -> u64 {
        let json = match self.storage.get(TOTAL_GAMES_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return 0,
            Err(e) => {
                log::warn!("failed to read {}: {}", TOTAL_GAMES_KEY, e);
                return 0;
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("corrupt {} counter, resetting: {}", TOTAL_GAMES_KEY, e);
            0
        })
    }

    /// Bump the completed-games counter. Call exactly once per finished
    /// game.
    pub fn record_game_completed(&self) -> Result<(), StorageError> {
        let next = self.total_games() + 1;
        let json = serde_json::to_string(&next)?;
        self.storage.set(TOTAL_GAMES_KEY, &json)
    }

    /// Derived global aggregate: sums over all rows plus win rates.
    pub fn read_global(&self) -> GlobalStats {
        let all = self.read_all();

        let mut global = GlobalStats {
            total_games: self.total_games(),
            ..GlobalStats::default()
        };
        for stats in all.values() {
            global.impostor_games += u64::from(stats.impostor_games);
            global.impostor_wins += u64::from(stats.impostor_wins);
            global.crewmate_games += u64::from(stats.crewmate_games);
            global.crewmate_wins += u64::from(stats.crewmate_wins);
        }
        if global.impostor_games > 0 {
            global.impostor_win_rate =
                global.impostor_wins as f64 / global.impostor_games as f64 * 100.0;
        }
        if global.crewmate_games > 0 {
            global.crewmate_win_rate =
                global.crewmate_wins as f64 / global.crewmate_games as f64 * 100.0;
        }
        global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(name: &str, role: StatRole, won: bool) -> StatUpdate {
        StatUpdate {
            username: name.to_string(),
            role,
            won,
        }
    }

    #[test]
    fn test_apply_batch_creates_zeroed_rows() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);

        store
            .apply_batch(&[update("Ana", StatRole::Impostor, true)])
            .unwrap();

        let all = store.read_all();
        let ana = all.get("Ana").unwrap();
        assert_eq!(ana.games_played, 1);
        assert_eq!(ana.impostor_games, 1);
        assert_eq!(ana.impostor_wins, 1);
        assert_eq!(ana.crewmate_games, 0);
        assert_eq!(ana.crewmate_wins, 0);
    }

    #[test]
    fn test_separate_batches_accumulate_like_one() {
        let storage1 = Storage::open_in_memory().unwrap();
        let split = StatsStore::new(&storage1);
        split
            .apply_batch(&[update("A", StatRole::Impostor, true)])
            .unwrap();
        split
            .apply_batch(&[update("A", StatRole::Impostor, false)])
            .unwrap();

        let storage2 = Storage::open_in_memory().unwrap();
        let joined = StatsStore::new(&storage2);
        joined
            .apply_batch(&[
                update("A", StatRole::Impostor, true),
                update("A", StatRole::Impostor, false),
            ])
            .unwrap();

        let row_split = *split.read_all().get("A").unwrap();
        let row_joined = *joined.read_all().get("A").unwrap();
        assert_eq!(row_split, row_joined);
        assert_eq!(row_split.games_played, 2);
        assert_eq!(row_split.impostor_games, 2);
        assert_eq!(row_split.impostor_wins, 1);
    }

    #[test]
    fn test_same_name_twice_in_one_batch_folds_into_one_row() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);

        store
            .apply_batch(&[
                update("Dup", StatRole::Impostor, true),
                update("Dup", StatRole::Crewmate, false),
            ])
            .unwrap();

        let all = store.read_all();
        assert_eq!(all.len(), 1);
        let row = all.get("Dup").unwrap();
        assert_eq!(row.games_played, 2);
        assert_eq!(row.impostor_games, 1);
        assert_eq!(row.crewmate_games, 1);
    }

    #[test]
    fn test_games_played_invariant_holds() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);

        store
            .apply_batch(&[
                update("Ana", StatRole::Impostor, true),
                update("Beto", StatRole::Crewmate, false),
            ])
            .unwrap();
        store
            .apply_batch(&[
                update("Ana", StatRole::Crewmate, true),
                update("Beto", StatRole::Crewmate, true),
            ])
            .unwrap();

        for (name, row) in store.read_all() {
            assert_eq!(
                row.games_played,
                row.impostor_games + row.crewmate_games,
                "invariant broken for {}",
                name
            );
        }
    }

    #[test]
    fn test_read_all_is_idempotent() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);
        store
            .apply_batch(&[
                update("Ana", StatRole::Impostor, true),
                update("Beto", StatRole::Crewmate, false),
            ])
            .unwrap();

        assert_eq!(store.read_all(), store.read_all());
    }

    #[test]
    fn test_empty_batch_is_a_noop() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);
        store.apply_batch(&[]).unwrap();
        assert!(store.read_all().is_empty());
        assert_eq!(storage.get(PLAYER_STATS_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_player_stats_reads_as_empty() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set(PLAYER_STATS_KEY, "{not json").unwrap();

        let store = StatsStore::new(&storage);
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_corrupt_total_games_reads_as_zero() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set(TOTAL_GAMES_KEY, "\"many\"").unwrap();

        let store = StatsStore::new(&storage);
        assert_eq!(store.total_games(), 0);
    }

    #[test]
    fn test_total_games_counter_increments() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);

        assert_eq!(store.total_games(), 0);
        store.record_game_completed().unwrap();
        store.record_game_completed().unwrap();
        assert_eq!(store.total_games(), 2);
    }

    #[test]
    fn test_total_games_independent_of_rows() {
        // The counter tracks completed games, not the per-player fold; a
        // caller that only writes rows leaves it untouched.
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);

        store
            .apply_batch(&[update("Ana", StatRole::Impostor, true)])
            .unwrap();
        assert_eq!(store.total_games(), 0);
        assert_eq!(store.read_global().impostor_games, 1);
    }

    #[test]
    fn test_global_aggregate_sums_and_rates() {
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);

        // Game 1: Ana impostor win over Beto and Caro.
        store
            .apply_batch(&[
                update("Ana", StatRole::Impostor, true),
                update("Beto", StatRole::Crewmate, false),
                update("Caro", StatRole::Crewmate, false),
            ])
            .unwrap();
        store.record_game_completed().unwrap();
        // Game 2: crew catches Ana.
        store
            .apply_batch(&[
                update("Ana", StatRole::Impostor, false),
                update("Beto", StatRole::Crewmate, true),
                update("Caro", StatRole::Crewmate, true),
            ])
            .unwrap();
        store.record_game_completed().unwrap();

        let global = store.read_global();
        assert_eq!(global.total_games, 2);
        assert_eq!(global.impostor_games, 2);
        assert_eq!(global.impostor_wins, 1);
        assert_eq!(global.crewmate_games, 4);
        assert_eq!(global.crewmate_wins, 2);
        assert!((global.impostor_win_rate - 50.0).abs() < f64::EPSILON);
        assert!((global.crewmate_win_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_win_rates() {
        let mut row = PlayerStats::default();
        assert_eq!(row.impostor_win_rate(), 0.0);
        assert_eq!(row.win_rate(), 0.0);

        row.apply(&update("x", StatRole::Impostor, true));
        row.apply(&update("x", StatRole::Impostor, false));
        row.apply(&update("x", StatRole::Crewmate, true));

        assert!((row.impostor_win_rate() - 50.0).abs() < f64::EPSILON);
        assert!((row.crewmate_win_rate() - 100.0).abs() < f64::EPSILON);
        assert_eq!(row.total_wins(), 2);
        assert!((row.win_rate() - 2.0 / 3.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_wire_format_field_names() {
        // Persisted blobs use the original camelCase field names.
        let storage = Storage::open_in_memory().unwrap();
        let store = StatsStore::new(&storage);
        store
            .apply_batch(&[update("Ana", StatRole::Impostor, true)])
            .unwrap();

        let json = storage.get(PLAYER_STATS_KEY).unwrap().unwrap();
        assert!(json.contains("\"gamesPlayed\":1"));
        assert!(json.contains("\"impostorGames\":1"));
        assert!(json.contains("\"impostorWins\":1"));
        assert!(json.contains("\"crewmateGames\":0"));
        assert!(json.contains("\"crewmateWins\":0"));
    }
}
