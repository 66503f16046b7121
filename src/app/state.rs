//! Room setup and stats view state
//!
//! The setup form is the mutable pre-game state: roster names, impostor
//! count, category selection, hint toggle. It converts to and from the
//! persisted `RoomConfig` so an in-progress room survives restarts.

use crate::game::words;
use crate::stats::{GlobalStats, PlayerStats};
use crate::storage::RoomConfig;

/// Maximum length of a player name
pub const MAX_NAME_LEN: usize = 16;

/// Which part of the setup screen has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    /// Name input for adding a player
    Name,
    /// Roster list (select/remove)
    Players,
    /// Impostor count
    Impostors,
    /// Category checkboxes
    Categories,
    /// "Show hint to impostors" toggle
    Hint,
    /// Start-game button
    Start,
    /// Statistics button
    Stats,
}

impl SetupField {
    const ORDER: [SetupField; 7] = [
        SetupField::Name,
        SetupField::Players,
        SetupField::Impostors,
        SetupField::Categories,
        SetupField::Hint,
        SetupField::Start,
        SetupField::Stats,
    ];

    pub fn next(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Mutable state of the room setup screen.
#[derive(Debug, Clone)]
pub struct SetupForm {
    /// Roster names in join order
    pub players: Vec<String>,
    /// Name being typed
    pub name_input: String,
    pub impostors: usize,
    /// Every category the catalog knows, in catalog order
    pub all_categories: Vec<String>,
    pub selected_categories: Vec<String>,
    pub show_hint: bool,
    pub focus: SetupField,
    pub player_cursor: usize,
    pub category_cursor: usize,
    /// Inline validation error, shown until the next successful action
    pub error: Option<String>,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupForm {
    /// Fresh form with the first catalog category pre-selected.
    pub fn new() -> Self {
        let all_categories = words::categories();
        let selected_categories = all_categories.first().cloned().into_iter().collect();
        SetupForm {
            players: Vec::new(),
            name_input: String::new(),
            impostors: 1,
            all_categories,
            selected_categories,
            show_hint: false,
            focus: SetupField::Name,
            player_cursor: 0,
            category_cursor: 0,
            error: None,
        }
    }

    /// Rebuild a form from a persisted room, dropping any selected
    /// category the catalog no longer has.
    pub fn from_config(config: RoomConfig) -> Self {
        let mut form = SetupForm::new();
        form.players = config.players;
        form.impostors = config.impostors;
        form.selected_categories = config
            .categories
            .into_iter()
            .filter(|c| form.all_categories.contains(c))
            .collect();
        form.show_hint = config.show_hint;
        form
    }

    /// Snapshot the form as a persistable room configuration.
    pub fn to_config(&self) -> RoomConfig {
        RoomConfig {
            players: self.players.clone(),
            impostors: self.impostors,
            categories: self.selected_categories.clone(),
            show_hint: self.show_hint,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Append a character to the name input, up to the length cap.
    pub fn name_char(&mut self, c: char) {
        if self.name_input.chars().count() < MAX_NAME_LEN {
            self.name_input.push(c);
        }
    }

    pub fn name_backspace(&mut self) {
        self.name_input.pop();
    }

    /// Move the typed name onto the roster. Blank input is ignored;
    /// duplicate names are rejected because stats rows are keyed by name.
    pub fn add_player(&mut self) {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            return;
        }
        if self.players.contains(&name) {
            self.error = Some(format!("\"{}\" is already on the roster", name));
            return;
        }
        self.players.push(name);
        self.name_input.clear();
        self.error = None;
    }

    pub fn player_up(&mut self) {
        if self.player_cursor > 0 {
            self.player_cursor -= 1;
        }
    }

    pub fn player_down(&mut self) {
        if self.player_cursor + 1 < self.players.len() {
            self.player_cursor += 1;
        }
    }

    /// Remove the selected roster entry.
    pub fn remove_selected_player(&mut self) {
        if self.players.is_empty() {
            return;
        }
        let index = self.player_cursor.min(self.players.len() - 1);
        self.players.remove(index);
        if self.player_cursor >= self.players.len() && self.player_cursor > 0 {
            self.player_cursor -= 1;
        }
        self.error = None;
    }

    pub fn increment_impostors(&mut self) {
        self.impostors += 1;
        self.error = None;
    }

    pub fn decrement_impostors(&mut self) {
        self.impostors = self.impostors.saturating_sub(1);
        self.error = None;
    }

    pub fn category_up(&mut self) {
        if self.category_cursor > 0 {
            self.category_cursor -= 1;
        }
    }

    pub fn category_down(&mut self) {
        if self.category_cursor + 1 < self.all_categories.len() {
            self.category_cursor += 1;
        }
    }

    /// Toggle the category under the cursor in or out of the selection.
    pub fn toggle_selected_category(&mut self) {
        let Some(category) = self.all_categories.get(self.category_cursor) else {
            return;
        };
        if let Some(index) = self.selected_categories.iter().position(|c| c == category) {
            self.selected_categories.remove(index);
        } else {
            self.selected_categories.push(category.clone());
        }
        self.error = None;
    }

    pub fn select_all_categories(&mut self) {
        self.selected_categories = self.all_categories.clone();
        self.error = None;
    }

    pub fn clear_categories(&mut self) {
        self.selected_categories.clear();
    }

    pub fn toggle_hint(&mut self) {
        self.show_hint = !self.show_hint;
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.selected_categories.iter().any(|c| c == category)
    }
}

/// Which statistics tab is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTab {
    Global,
    Players,
}

/// Snapshot of the persisted statistics, loaded when the screen opens.
#[derive(Debug, Clone)]
pub struct StatsView {
    pub tab: StatsTab,
    pub global: GlobalStats,
    pub players: Vec<(String, PlayerStats)>,
}

impl Default for StatsView {
    fn default() -> Self {
        StatsView {
            tab: StatsTab::Global,
            global: GlobalStats::default(),
            players: Vec::new(),
        }
    }
}

impl StatsView {
    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            StatsTab::Global => StatsTab::Players,
            StatsTab::Players => StatsTab::Global,
        };
    }
}
