//! Game logic: roster building, role assignment, elimination rounds, word catalog

pub mod roles;
pub mod round;
pub mod words;

/// Minimum roster size for a playable game
pub const MIN_PLAYERS: usize = 3;

/// A player's role, fixed for the duration of one game once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Before role assignment
    Unassigned,
    /// Knows there is a secret word but not which one
    Impostor,
    /// Knows the secret word
    Normal,
}

/// A player in the current game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable within one game, assigned in join order
    pub id: u32,
    pub name: String,
    /// Flips to true at most once per game, never back
    pub eliminated: bool,
    pub role: Role,
}

impl Player {
    /// Create a fresh, unassigned player.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            eliminated: false,
            role: Role::Unassigned,
        }
    }

    /// Whether this player is still in the game.
    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }
}

/// Build a roster from display names. Ids are assigned 1..=n in join order.
pub fn build_roster(names: &[String]) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(i as u32 + 1, name.clone()))
        .collect()
}

/// Everything fixed at game start: the role-assigned roster, the secret
/// word, and whether impostors get to see the word's hint.
#[derive(Debug, Clone)]
pub struct GameSetup {
    pub players: Vec<Player>,
    pub word: words::WordEntry,
    pub show_hint: bool,
}

/// Room configuration errors. All of them block game start and are
/// recoverable by correcting the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotEnoughPlayers { count: usize },
    NoImpostors,
    TooManyImpostors { impostors: usize, players: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotEnoughPlayers { count } => {
                write!(f, "need at least {} players, have {}", MIN_PLAYERS, count)
            }
            ConfigError::NoImpostors => write!(f, "need at least one impostor"),
            ConfigError::TooManyImpostors { impostors, players } => {
                write!(
                    f,
                    "{} impostors is too many for {} players (must be under half)",
                    impostors, players
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
