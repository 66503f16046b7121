#![allow(dead_code)]
//! Elimination rounds and win-condition evaluation
//!
//! The engine owns the role-assigned roster for one game. Each accepted
//! elimination either advances the round counter or ends the game; once
//! ended it accepts nothing further until a brand-new setup replaces it.
//! The stats batch for the outcome can be taken exactly once.

use crate::stats::{StatRole, StatUpdate};

use super::{GameSetup, Player, Role};

/// Lifecycle of one game's elimination phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Ended,
}

/// Misuse of the engine by the caller. These never corrupt round state;
/// the UI layer logs them and moves on rather than showing the player an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    UnknownPlayer(u32),
    AlreadyEliminated(u32),
    GameOver,
}

impl std::fmt::Display for RoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundError::UnknownPlayer(id) => write!(f, "no player with id {}", id),
            RoundError::AlreadyEliminated(id) => {
                write!(f, "player {} is already eliminated", id)
            }
            RoundError::GameOver => write!(f, "the game has already ended"),
        }
    }
}

impl std::error::Error for RoundError {}

/// Round-over-round elimination state machine.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    players: Vec<Player>,
    round: u32,
    phase: Phase,
    winners: Vec<Player>,
    losers: Vec<Player>,
    /// Set once when the game ends, drained by `take_updates`
    pending_updates: Option<Vec<StatUpdate>>,
}

impl RoundEngine {
    /// Start the elimination phase from a completed game setup.
    pub fn new(setup: GameSetup) -> Self {
        RoundEngine {
            players: setup.players,
            round: 1,
            phase: Phase::InProgress,
            winners: Vec::new(),
            losers: Vec::new(),
            pending_updates: None,
        }
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// The full roster, elimination flags included.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Ids of players still in the game, in roster order.
    pub fn alive_ids(&self) -> Vec<u32> {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .collect()
    }

    /// How many players are still in the game.
    pub fn remaining(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Winners of the game; empty until the game ends.
    pub fn winners(&self) -> &[Player] {
        &self.winners
    }

    /// Losers of the game; empty until the game ends.
    pub fn losers(&self) -> &[Player] {
        &self.losers
    }

    fn alive_impostors(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.role == Role::Impostor && p.is_alive())
            .count()
    }

    fn alive_normals(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.role == Role::Normal && p.is_alive())
            .count()
    }

    fn win_condition_met(&self) -> bool {
        self.alive_normals() <= 1 || self.alive_impostors() == 0
    }

    /// Eliminate a player by id.
    ///
    /// On success, evaluates the win condition: if the game is over the
    /// engine transitions to `Ended` and freezes the winner/loser
    /// partition; otherwise the round counter advances. Rejected
    /// eliminations change nothing, including the round counter.
    pub fn eliminate(&mut self, player_id: u32) -> Result<(), RoundError> {
        if self.is_ended() {
            return Err(RoundError::GameOver);
        }

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(RoundError::UnknownPlayer(player_id))?;

        if player.eliminated {
            return Err(RoundError::AlreadyEliminated(player_id));
        }
        player.eliminated = true;

        if self.win_condition_met() {
            self.finish();
        } else {
            self.round += 1;
        }
        Ok(())
    }

    /// Manually end the game with the current snapshot ("end the session
    /// early"). A no-op once the game is over, so repeat presses cannot
    /// produce a second stats batch.
    pub fn end_game(&mut self) {
        if self.is_ended() {
            return;
        }
        self.finish();
    }

    /// Take the per-player outcome batch. Yields `Some` exactly once per
    /// completed game; `None` before the end and on every later call.
    pub fn take_updates(&mut self) -> Option<Vec<StatUpdate>> {
        self.pending_updates.take()
    }

    /// Compute the winner/loser partition and the stats batch.
    ///
    /// Impostors surviving to the end win as a team, but an impostor
    /// eliminated along the way still takes a personal loss on their own
    /// stats row. Normal players eliminated before a crew win get no row.
    fn finish(&mut self) {
        self.phase = Phase::Ended;

        let surviving_impostors: Vec<Player> = self
            .players
            .iter()
            .filter(|p| p.role == Role::Impostor && p.is_alive())
            .cloned()
            .collect();
        let eliminated_impostors: Vec<Player> = self
            .players
            .iter()
            .filter(|p| p.role == Role::Impostor && p.eliminated)
            .cloned()
            .collect();

        let mut updates = Vec::new();

        if !surviving_impostors.is_empty() {
            // Impostor win: every normal takes the loss, eliminated or not.
            let all_normals: Vec<Player> = self
                .players
                .iter()
                .filter(|p| p.role == Role::Normal)
                .cloned()
                .collect();

            for winner in &surviving_impostors {
                updates.push(StatUpdate {
                    username: winner.name.clone(),
                    role: StatRole::Impostor,
                    won: true,
                });
            }
            for loser in &all_normals {
                updates.push(StatUpdate {
                    username: loser.name.clone(),
                    role: StatRole::Crewmate,
                    won: false,
                });
            }
            for loser in &eliminated_impostors {
                updates.push(StatUpdate {
                    username: loser.name.clone(),
                    role: StatRole::Impostor,
                    won: false,
                });
            }

            self.winners = surviving_impostors;
            self.losers = all_normals
                .into_iter()
                .chain(eliminated_impostors)
                .collect();
        } else {
            // Crew win: all impostors are out by definition.
            let surviving_normals: Vec<Player> = self
                .players
                .iter()
                .filter(|p| p.role == Role::Normal && p.is_alive())
                .cloned()
                .collect();

            for loser in &eliminated_impostors {
                updates.push(StatUpdate {
                    username: loser.name.clone(),
                    role: StatRole::Impostor,
                    won: false,
                });
            }
            for winner in &surviving_normals {
                updates.push(StatUpdate {
                    username: winner.name.clone(),
                    role: StatRole::Crewmate,
                    won: true,
                });
            }

            self.winners = surviving_normals;
            self.losers = eliminated_impostors;
        }

        self.pending_updates = Some(updates);
    }
}
