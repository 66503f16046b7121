//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Setup: build the room (roster, impostors, categories, hint)
//! - Reveal: pass-the-device role cards, one player at a time
//! - Round: elimination rounds until a side wins
//! - Stats: persisted global and per-player statistics
//!
//! The coordinator owns the storage handle; every persistence call is
//! best-effort and a missing storage (open failed at launch) only means
//! nothing survives the session.

use crossterm::event::KeyCode;

use crate::game::round::RoundEngine;
use crate::game::words;
use crate::game::{build_roster, roles, GameSetup};
use crate::stats::StatsStore;
use crate::storage::{RoomConfig, Storage};

use super::state::{SetupField, SetupForm, StatsView};

/// The current application screen
pub enum Screen {
    /// Configuring the room before a game
    Setup { form: SetupForm },
    /// Passing the device around to reveal roles
    Reveal {
        setup: GameSetup,
        current: usize,
        card_shown: bool,
    },
    /// Elimination rounds (and the end-of-game result once they finish)
    Round { engine: RoundEngine, cursor: usize },
    /// Statistics view
    Stats { view: StatsView },
}

/// What a setup keypress asks the coordinator to do after the form
/// mutation settles.
enum SetupAction {
    None,
    Persist,
    Start,
    OpenStats,
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    storage: Option<Storage>,
    /// Room snapshot from the last started game, used by "new game"
    last_room: Option<RoomConfig>,
}

impl AppCoordinator {
    /// Create a coordinator starting at the setup screen, prefilled from
    /// the persisted room configuration when one exists.
    pub fn new(storage: Option<Storage>) -> Self {
        let form = storage
            .as_ref()
            .and_then(|s| s.load_room_config())
            .map(SetupForm::from_config)
            .unwrap_or_default();

        Self {
            screen: Screen::Setup { form },
            should_quit: false,
            storage,
            last_room: None,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Route a key press to the current screen.
    pub fn handle_key(&mut self, code: KeyCode) {
        match &self.screen {
            Screen::Setup { .. } => self.setup_key(code),
            Screen::Reveal { .. } => self.reveal_key(code),
            Screen::Round { .. } => self.round_key(code),
            Screen::Stats { .. } => self.stats_key(code),
        }
    }

    // --- Setup screen ---

    fn setup_key(&mut self, code: KeyCode) {
        let Screen::Setup { form } = &mut self.screen else {
            return;
        };

        let action = match code {
            KeyCode::Esc => {
                self.quit();
                return;
            }
            KeyCode::Tab => {
                form.focus_next();
                SetupAction::None
            }
            KeyCode::BackTab => {
                form.focus_prev();
                SetupAction::None
            }
            _ => match form.focus {
                SetupField::Name => match code {
                    KeyCode::Char(c) => {
                        form.name_char(c);
                        SetupAction::None
                    }
                    KeyCode::Backspace => {
                        form.name_backspace();
                        SetupAction::None
                    }
                    KeyCode::Enter => {
                        form.add_player();
                        SetupAction::Persist
                    }
                    _ => SetupAction::None,
                },
                SetupField::Players => match code {
                    KeyCode::Up => {
                        form.player_up();
                        SetupAction::None
                    }
                    KeyCode::Down => {
                        form.player_down();
                        SetupAction::None
                    }
                    KeyCode::Delete | KeyCode::Backspace => {
                        form.remove_selected_player();
                        SetupAction::Persist
                    }
                    _ => SetupAction::None,
                },
                SetupField::Impostors => match code {
                    KeyCode::Left => {
                        form.decrement_impostors();
                        SetupAction::Persist
                    }
                    KeyCode::Right => {
                        form.increment_impostors();
                        SetupAction::Persist
                    }
                    _ => SetupAction::None,
                },
                SetupField::Categories => match code {
                    KeyCode::Up => {
                        form.category_up();
                        SetupAction::None
                    }
                    KeyCode::Down => {
                        form.category_down();
                        SetupAction::None
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        form.toggle_selected_category();
                        SetupAction::Persist
                    }
                    KeyCode::Char('a') => {
                        form.select_all_categories();
                        SetupAction::Persist
                    }
                    KeyCode::Char('c') => {
                        form.clear_categories();
                        SetupAction::Persist
                    }
                    _ => SetupAction::None,
                },
                SetupField::Hint => match code {
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        form.toggle_hint();
                        SetupAction::Persist
                    }
                    _ => SetupAction::None,
                },
                SetupField::Start => match code {
                    KeyCode::Enter => SetupAction::Start,
                    _ => SetupAction::None,
                },
                SetupField::Stats => match code {
                    KeyCode::Enter => SetupAction::OpenStats,
                    _ => SetupAction::None,
                },
            },
        };

        match action {
            SetupAction::None => {}
            SetupAction::Persist => {
                let config = form.to_config();
                self.persist_room(&config);
            }
            SetupAction::Start => self.start_game(),
            SetupAction::OpenStats => self.open_stats(),
        }
    }

    /// Validate the form, assign roles, pick the word, and move to the
    /// reveal screen. Validation failures land in `form.error` and block
    /// the start.
    fn start_game(&mut self) {
        let Screen::Setup { form } = &mut self.screen else {
            return;
        };

        if form.selected_categories.is_empty() {
            form.error = Some("select at least one category".to_string());
            return;
        }

        let roster = build_roster(&form.players);
        let players = match roles::assign(roster, form.impostors) {
            Ok(players) => players,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let word = match words::pick_random(&form.selected_categories) {
            Ok(word) => word,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };

        let show_hint = form.show_hint;
        let config = form.to_config();
        self.persist_room(&config);
        self.last_room = Some(config);
        self.screen = Screen::Reveal {
            setup: GameSetup {
                players,
                word,
                show_hint,
            },
            current: 0,
            card_shown: false,
        };
    }

    // --- Reveal screen ---

    fn reveal_key(&mut self, code: KeyCode) {
        let Screen::Reveal {
            setup,
            current,
            card_shown,
        } = &mut self.screen
        else {
            return;
        };

        match code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char(' ') => *card_shown = !*card_shown,
            KeyCode::Enter => {
                if *current + 1 < setup.players.len() {
                    // Hide the card again before handing the device over
                    *current += 1;
                    *card_shown = false;
                } else {
                    let setup = setup.clone();
                    self.screen = Screen::Round {
                        engine: RoundEngine::new(setup),
                        cursor: 0,
                    };
                }
            }
            _ => {}
        }
    }

    // --- Round screen ---

    fn round_key(&mut self, code: KeyCode) {
        let ended = match &self.screen {
            Screen::Round { engine, .. } => engine.is_ended(),
            _ => return,
        };

        match code {
            KeyCode::Esc => self.quit(),
            KeyCode::Up if !ended => self.round_cursor_move(-1),
            KeyCode::Down if !ended => self.round_cursor_move(1),
            KeyCode::Enter if !ended => self.eliminate_selected(),
            KeyCode::Char('e') if !ended => self.end_game_early(),
            KeyCode::Char('n') => self.new_game(),
            KeyCode::Char('s') if ended => self.open_stats(),
            _ => {}
        }
    }

    fn round_cursor_move(&mut self, delta: isize) {
        let Screen::Round { engine, cursor } = &mut self.screen else {
            return;
        };
        let alive = engine.remaining();
        if alive == 0 {
            return;
        }
        let current = (*cursor).min(alive - 1) as isize;
        *cursor = (current + delta).clamp(0, alive as isize - 1) as usize;
    }

    /// Eliminate the player under the cursor. Engine rejections are
    /// internal-consistency misuse, so they are logged and swallowed
    /// instead of being shown to the player.
    fn eliminate_selected(&mut self) {
        let Screen::Round { engine, cursor } = &mut self.screen else {
            return;
        };

        let alive = engine.alive_ids();
        let Some(&id) = alive.get((*cursor).min(alive.len().saturating_sub(1))) else {
            return;
        };

        if let Err(e) = engine.eliminate(id) {
            log::warn!("ignoring elimination of player {}: {}", id, e);
            return;
        }

        let remaining = engine.remaining();
        if remaining > 0 && *cursor >= remaining {
            *cursor = remaining - 1;
        }

        let ended = engine.is_ended();
        if ended {
            self.record_outcome();
        }
    }

    /// Manual "end the session early" action.
    fn end_game_early(&mut self) {
        let Screen::Round { engine, .. } = &mut self.screen else {
            return;
        };
        engine.end_game();
        let ended = engine.is_ended();
        if ended {
            self.record_outcome();
        }
    }

    /// Persist the finished game's outcome. The engine hands out its
    /// batch at most once, so reaching this twice cannot double-count.
    fn record_outcome(&mut self) {
        let Screen::Round { engine, .. } = &mut self.screen else {
            return;
        };
        let Some(updates) = engine.take_updates() else {
            return;
        };

        let Some(storage) = &self.storage else {
            log::warn!("no storage, dropping stats for {} players", updates.len());
            return;
        };
        let store = StatsStore::new(storage);
        if let Err(e) = store.record_game_completed() {
            log::warn!("failed to bump the games counter: {}", e);
        }
        if let Err(e) = store.apply_batch(&updates) {
            log::warn!("failed to persist the stats batch: {}", e);
        }
    }

    /// Back to setup with the last started room's roster and settings.
    fn new_game(&mut self) {
        let form = match self.last_room.clone() {
            Some(config) => SetupForm::from_config(config),
            None => SetupForm::new(),
        };
        self.screen = Screen::Setup { form };
    }

    // --- Stats screen ---

    fn open_stats(&mut self) {
        // Remember the room so closing the stats view brings it back
        if let Screen::Setup { form } = &self.screen {
            self.last_room = Some(form.to_config());
        }
        let view = match &self.storage {
            Some(storage) => {
                let store = StatsStore::new(storage);
                StatsView {
                    global: store.read_global(),
                    players: store.read_all().into_iter().collect(),
                    ..StatsView::default()
                }
            }
            None => StatsView::default(),
        };
        self.screen = Screen::Stats { view };
    }

    fn stats_key(&mut self, code: KeyCode) {
        let Screen::Stats { view } = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => view.toggle_tab(),
            KeyCode::Esc | KeyCode::Enter => self.new_game(),
            _ => {}
        }
    }

    /// Best-effort room persistence; failures only cost restart comfort.
    fn persist_room(&self, config: &RoomConfig) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_room_config(config) {
                log::warn!("failed to persist room config: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Role;
    use crate::stats::StatsStore;

    fn coordinator_with_roster(names: &[&str], impostors: usize) -> AppCoordinator {
        let mut app = AppCoordinator::new(Some(Storage::open_in_memory().unwrap()));
        for name in names {
            for c in name.chars() {
                app.handle_key(KeyCode::Char(c));
            }
            app.handle_key(KeyCode::Enter);
        }
        if let Screen::Setup { form } = &mut app.screen {
            form.impostors = impostors;
        }
        app
    }

    fn start(app: &mut AppCoordinator) {
        if let Screen::Setup { form } = &mut app.screen {
            form.focus = SetupField::Start;
        }
        app.handle_key(KeyCode::Enter);
    }

    /// Drive the reveal screen to completion: peek and advance for every
    /// player on the roster.
    fn reveal_all(app: &mut AppCoordinator) {
        let total = match &app.screen {
            Screen::Reveal { setup, .. } => setup.players.len(),
            _ => panic!("expected reveal screen"),
        };
        for _ in 0..total {
            app.handle_key(KeyCode::Char(' '));
            app.handle_key(KeyCode::Enter);
        }
    }

    /// Eliminate the first alive player whose role matches.
    fn eliminate_role(app: &mut AppCoordinator, role: Role) {
        let Screen::Round { engine, cursor } = &mut app.screen else {
            panic!("expected round screen");
        };
        let alive = engine.alive_ids();
        let target = engine
            .players()
            .iter()
            .find(|p| p.is_alive() && p.role == role)
            .map(|p| p.id)
            .expect("an alive player with that role");
        *cursor = alive.iter().position(|&id| id == target).unwrap();
        app.handle_key(KeyCode::Enter);
    }

    #[test]
    fn test_typing_and_adding_players() {
        let app = coordinator_with_roster(&["Ana", "Beto"], 1);
        match &app.screen {
            Screen::Setup { form } => {
                assert_eq!(form.players, vec!["Ana".to_string(), "Beto".to_string()]);
            }
            _ => panic!("expected setup screen"),
        }
    }

    #[test]
    fn test_duplicate_name_blocked_at_setup() {
        let app = coordinator_with_roster(&["Ana", "Ana"], 1);
        match &app.screen {
            Screen::Setup { form } => {
                assert_eq!(form.players.len(), 1);
                assert!(form.error.is_some());
            }
            _ => panic!("expected setup screen"),
        }
    }

    #[test]
    fn test_start_blocked_with_small_roster() {
        let mut app = coordinator_with_roster(&["Ana", "Beto"], 1);
        start(&mut app);
        match &app.screen {
            Screen::Setup { form } => assert!(form.error.is_some()),
            _ => panic!("start should be blocked"),
        }
    }

    #[test]
    fn test_start_blocked_with_zero_impostors() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro"], 0);
        start(&mut app);
        assert!(matches!(
            &app.screen,
            Screen::Setup { form } if form.error.is_some()
        ));
    }

    #[test]
    fn test_start_blocked_with_too_many_impostors() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro", "Dan"], 2);
        start(&mut app);
        assert!(matches!(
            &app.screen,
            Screen::Setup { form } if form.error.is_some()
        ));
    }

    #[test]
    fn test_start_blocked_without_categories() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro"], 1);
        if let Screen::Setup { form } = &mut app.screen {
            form.clear_categories();
        }
        start(&mut app);
        assert!(matches!(
            &app.screen,
            Screen::Setup { form } if form.error.is_some()
        ));
    }

    #[test]
    fn test_start_assigns_roles_and_opens_reveal() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro", "Dan"], 1);
        start(&mut app);

        match &app.screen {
            Screen::Reveal {
                setup,
                current,
                card_shown,
            } => {
                assert_eq!(*current, 0);
                assert!(!*card_shown);
                let impostors = setup
                    .players
                    .iter()
                    .filter(|p| p.role == Role::Impostor)
                    .count();
                assert_eq!(impostors, 1);
                assert!(setup.players.iter().all(|p| p.role != Role::Unassigned));
            }
            _ => panic!("expected reveal screen"),
        }
    }

    #[test]
    fn test_reveal_walks_roster_then_opens_round() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro"], 1);
        start(&mut app);
        reveal_all(&mut app);

        match &app.screen {
            Screen::Round { engine, .. } => {
                assert_eq!(engine.round(), 1);
                assert_eq!(engine.remaining(), 3);
            }
            _ => panic!("expected round screen"),
        }
    }

    #[test]
    fn test_full_game_records_stats_once() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro", "Dan"], 1);
        start(&mut app);
        reveal_all(&mut app);

        // Crew finds the impostor straight away.
        eliminate_role(&mut app, Role::Impostor);

        match &app.screen {
            Screen::Round { engine, .. } => {
                assert!(engine.is_ended());
                assert_eq!(engine.winners().len(), 3);
            }
            _ => panic!("expected round screen"),
        }

        // Pressing the early-end action afterwards must not double-count.
        app.handle_key(KeyCode::Char('e'));

        let storage = app.storage.as_ref().unwrap();
        let store = StatsStore::new(storage);
        assert_eq!(store.total_games(), 1);
        let all = store.read_all();
        assert_eq!(all.len(), 4);
        let total_rows: u32 = all.values().map(|s| s.games_played).sum();
        assert_eq!(total_rows, 4);
    }

    #[test]
    fn test_impostor_win_path_records_losses_for_all_normals() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro", "Dan", "Eva"], 1);
        start(&mut app);
        reveal_all(&mut app);

        // Mob turns on the crew until one normal is left.
        eliminate_role(&mut app, Role::Normal);
        eliminate_role(&mut app, Role::Normal);
        eliminate_role(&mut app, Role::Normal);

        let Screen::Round { engine, .. } = &app.screen else {
            panic!("expected round screen");
        };
        assert!(engine.is_ended());
        assert_eq!(engine.winners().len(), 1);

        let store = StatsStore::new(app.storage.as_ref().unwrap());
        let all = store.read_all();
        let impostor_wins: u32 = all.values().map(|s| s.impostor_wins).sum();
        let crewmate_losses: u32 = all
            .values()
            .map(|s| s.crewmate_games - s.crewmate_wins)
            .sum();
        assert_eq!(impostor_wins, 1);
        assert_eq!(crewmate_losses, 4);
    }

    #[test]
    fn test_manual_end_mid_game_hands_win_to_impostors() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro", "Dan", "Eva"], 1);
        start(&mut app);
        reveal_all(&mut app);

        app.handle_key(KeyCode::Char('e'));

        let Screen::Round { engine, .. } = &app.screen else {
            panic!("expected round screen");
        };
        assert!(engine.is_ended());
        assert_eq!(engine.winners().len(), 1);

        let store = StatsStore::new(app.storage.as_ref().unwrap());
        assert_eq!(store.total_games(), 1);
    }

    #[test]
    fn test_new_game_restores_roster() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro"], 1);
        start(&mut app);
        reveal_all(&mut app);
        app.handle_key(KeyCode::Char('n'));

        match &app.screen {
            Screen::Setup { form } => {
                assert_eq!(
                    form.players,
                    vec!["Ana".to_string(), "Beto".to_string(), "Caro".to_string()]
                );
            }
            _ => panic!("expected setup screen"),
        }
    }

    #[test]
    fn test_room_config_persisted_across_coordinators() {
        let storage = Storage::open_in_memory().unwrap();
        {
            let mut app = AppCoordinator::new(Some(storage));
            for c in "Ana".chars() {
                app.handle_key(KeyCode::Char(c));
            }
            app.handle_key(KeyCode::Enter);

            // Hand the storage back for the "restart"
            let storage = app.storage.take().unwrap();
            let restarted = AppCoordinator::new(Some(storage));
            match &restarted.screen {
                Screen::Setup { form } => {
                    assert_eq!(form.players, vec!["Ana".to_string()]);
                }
                _ => panic!("expected setup screen"),
            }
        }
    }

    #[test]
    fn test_stats_screen_roundtrip() {
        let mut app = coordinator_with_roster(&["Ana", "Beto", "Caro", "Dan"], 1);
        if let Screen::Setup { form } = &mut app.screen {
            form.focus = SetupField::Stats;
        }
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.screen, Screen::Stats { .. }));

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Esc);
        match &app.screen {
            Screen::Setup { form } => {
                // The roster survives the stats detour
                assert_eq!(form.players.len(), 4);
            }
            _ => panic!("expected setup screen"),
        }
    }

    #[test]
    fn test_runs_without_storage() {
        let mut app = AppCoordinator::new(None);
        for name in ["Ana", "Beto", "Caro"] {
            for c in name.chars() {
                app.handle_key(KeyCode::Char(c));
            }
            app.handle_key(KeyCode::Enter);
        }
        start(&mut app);
        reveal_all(&mut app);
        eliminate_role(&mut app, Role::Impostor);

        let Screen::Round { engine, .. } = &app.screen else {
            panic!("expected round screen");
        };
        assert!(engine.is_ended());
    }
}
