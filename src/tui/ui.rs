//! UI rendering using ratatui
//!
//! Supports the four screens:
//! - Setup: room configuration form
//! - Reveal: pass-the-device role cards
//! - Round: elimination rounds and the end-of-game result
//! - Stats: global and per-player statistics

use crate::app::{AppCoordinator, Screen, SetupField, SetupForm, StatsTab, StatsView};
use crate::game::round::RoundEngine;
use crate::game::{GameSetup, Role};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Setup { form } => render_setup(frame, form),
        Screen::Reveal {
            setup,
            current,
            card_shown,
        } => render_reveal(frame, setup, *current, *card_shown),
        Screen::Round { engine, cursor } => {
            if engine.is_ended() {
                render_game_over(frame, engine);
            } else {
                render_round(frame, engine, *cursor);
            }
        }
        Screen::Stats { view } => render_stats(frame, view),
    }
}

/// Border style for a form section, highlighted while focused
fn section_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render the room setup screen
fn render_setup(frame: &mut Frame, form: &SetupForm) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(1), // Error line
            Constraint::Min(14),   // Form body
            Constraint::Length(3), // Buttons
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    // Logo
    let logo = r#"
 ___ __  __ ____   ___  ____ _____ ___  ____
|_ _|  \/  |  _ \ / _ \/ ___|_   _/ _ \|  _ \
 | || |\/| | |_) | | | \___ \ | || | | | |_) |
 | || |  | |  __/| |_| |___) || || |_| |  _ <
|___|_|  |_|_|    \___/|____/ |_| \___/|_| \_\
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Red).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    // Error line
    if let Some(error) = &form.error {
        let error_widget = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red).bold())
            .alignment(Alignment::Center);
        frame.render_widget(error_widget, layout[1]);
    }

    // Form body: roster on the left, settings and categories on the right
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[2]);

    render_roster_section(frame, form, body[0]);
    render_settings_section(frame, form, body[1]);

    // Buttons
    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[3]);

    let start = Paragraph::new("[ Start Game ]")
        .style(button_style(form.focus == SetupField::Start))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(
            section_style(form.focus == SetupField::Start),
        ));
    frame.render_widget(start, buttons[0]);

    let stats = Paragraph::new("[ Statistics ]")
        .style(button_style(form.focus == SetupField::Stats))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(
            section_style(form.focus == SetupField::Stats),
        ));
    frame.render_widget(stats, buttons[1]);

    // Footer
    let footer = Paragraph::new("Tab Next section  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

fn button_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    }
}

/// Roster list plus the name input line
fn render_roster_section(frame: &mut Frame, form: &SetupForm, area: Rect) {
    let focused = matches!(form.focus, SetupField::Name | SetupField::Players);
    let title = format!("Players ({})", form.players.len());

    let mut items: Vec<ListItem> = form
        .players
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let selected = form.focus == SetupField::Players && i == form.player_cursor;
            let prefix = if selected { "> " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", prefix, name)).style(style)
        })
        .collect();

    if form.players.is_empty() {
        items.push(
            ListItem::new("  add players to begin")
                .style(Style::default().fg(Color::DarkGray).italic()),
        );
    }

    // Input line at the bottom of the list
    let input_style = if form.focus == SetupField::Name {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor_mark = if form.focus == SetupField::Name { "_" } else { "" };
    items.push(ListItem::new(format!("+ {}{}", form.name_input, cursor_mark)).style(input_style));

    let hint = if form.focus == SetupField::Players {
        " ↑↓ select, Del remove "
    } else {
        " type a name, Enter adds "
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(hint)
            .border_style(section_style(focused)),
    );
    frame.render_widget(list, area);
}

/// Impostor count, hint toggle, and category checkboxes
fn render_settings_section(frame: &mut Frame, form: &SetupForm, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Impostor count
            Constraint::Length(3), // Hint toggle
            Constraint::Min(6),    // Categories
        ])
        .split(area);

    let impostors = Paragraph::new(format!("◂ {} ▸", form.impostors))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Impostors")
                .border_style(section_style(form.focus == SetupField::Impostors)),
        );
    frame.render_widget(impostors, layout[0]);

    let hint_mark = if form.show_hint { "[x]" } else { "[ ]" };
    let hint = Paragraph::new(format!("{} show the hint to impostors", hint_mark))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Hint")
                .border_style(section_style(form.focus == SetupField::Hint)),
        );
    frame.render_widget(hint, layout[1]);

    let items: Vec<ListItem> = form
        .all_categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let selected = form.focus == SetupField::Categories && i == form.category_cursor;
            let prefix = if selected { "> " } else { "  " };
            let mark = if form.is_category_selected(category) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if selected {
                Style::default().fg(Color::Yellow).bold()
            } else if form.is_category_selected(category) {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(format!("{}{} {}", prefix, mark, category)).style(style)
        })
        .collect();

    let categories = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "Categories ({}/{})",
                form.selected_categories.len(),
                form.all_categories.len()
            ))
            .title_bottom(" Space toggle, a all, c none ")
            .border_style(section_style(form.focus == SetupField::Categories)),
    );
    frame.render_widget(categories, layout[2]);
}

/// Render the pass-the-device role card screen
fn render_reveal(frame: &mut Frame, setup: &GameSetup, current: usize, card_shown: bool) {
    let area = frame.area();
    let player = &setup.players[current];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(9),    // Card
            Constraint::Length(1), // Progress
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    // Header
    let header = Paragraph::new(format!("Pass the device to: {}", player.name))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    // Card
    let (card_text, border_color) = if !card_shown {
        (
            Text::from("\n\nPress Space to see your card\n(make sure nobody else is looking)"),
            Color::DarkGray,
        )
    } else if player.role == Role::Impostor {
        let mut lines = vec![
            Line::from(""),
            Line::from(""),
            Line::styled("YOU ARE THE IMPOSTOR", Style::default().fg(Color::Red).bold()),
        ];
        if setup.show_hint {
            lines.push(Line::from(""));
            lines.push(Line::styled(
                format!("hint: {}", setup.word.hint),
                Style::default().fg(Color::Cyan),
            ));
        }
        (Text::from(lines), Color::Red)
    } else {
        let lines = vec![
            Line::from(""),
            Line::from(""),
            Line::from("the word is"),
            Line::styled(
                setup.word.word.clone(),
                Style::default().fg(Color::Green).bold(),
            ),
        ];
        (Text::from(lines), Color::Cyan)
    };

    let card = Paragraph::new(card_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Your card")
                .border_style(Style::default().fg(border_color)),
        );
    frame.render_widget(card, layout[1]);

    // Progress
    let progress = Paragraph::new(format!(
        "player {} of {}",
        current + 1,
        setup.players.len()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(progress, layout[2]);

    // Footer
    let next_label = if current + 1 < setup.players.len() {
        "Enter Next player"
    } else {
        "Enter Start round"
    };
    let footer = Paragraph::new(format!("Space Show/Hide  {}  Esc Quit", next_label))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

/// Render an in-progress elimination round
fn render_round(frame: &mut Frame, engine: &RoundEngine, cursor: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Remaining count
            Constraint::Min(6),    // Player list
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new(format!("Round {}", engine.round()))
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let remaining = Paragraph::new(format!("players remaining: {}", engine.remaining()))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(remaining, layout[1]);

    // Cursor indexes into the alive subset only
    let mut alive_index = 0;
    let items: Vec<ListItem> = engine
        .players()
        .iter()
        .map(|player| {
            if player.eliminated {
                ListItem::new(format!("  ✗ {}", player.name)).style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                let selected = alive_index == cursor;
                alive_index += 1;
                let prefix = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!("{}● {}", prefix, player.name)).style(style)
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Who goes?"));
    frame.render_widget(list, layout[2]);

    let footer = Paragraph::new("↑↓ Select  Enter Eliminate  e End game  n New game  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

/// Render the end-of-game result
fn render_game_over(frame: &mut Frame, engine: &RoundEngine) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Winners
            Constraint::Length(2), // Losers
            Constraint::Min(6),    // Roster with roles revealed
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new(format!("Game over - round {}", engine.round()))
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let winner_names: Vec<&str> = engine.winners().iter().map(|p| p.name.as_str()).collect();
    let winners = Paragraph::new(format!("Winners: {}", winner_names.join(", ")))
        .style(Style::default().fg(Color::Green).bold())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(winners, layout[1]);

    let loser_names: Vec<&str> = engine.losers().iter().map(|p| p.name.as_str()).collect();
    let losers = Paragraph::new(format!("Losers: {}", loser_names.join(", ")))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(losers, layout[2]);

    // Everyone's role comes out at the end
    let items: Vec<ListItem> = engine
        .players()
        .iter()
        .map(|player| {
            let role = match player.role {
                Role::Impostor => "impostor",
                Role::Normal => "crew",
                Role::Unassigned => "?",
            };
            let mark = if player.eliminated { "✗" } else { "●" };
            let style = match player.role {
                Role::Impostor => Style::default().fg(Color::Red),
                _ => Style::default().fg(Color::White),
            };
            ListItem::new(format!("  {} {} - {}", mark, player.name, role)).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Roles"));
    frame.render_widget(list, layout[3]);

    let footer = Paragraph::new("n New game  s Stats  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the statistics screen
fn render_stats(frame: &mut Frame, view: &StatsView) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(1), // Total games
            Constraint::Min(6),    // Body
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    // Tabs
    let tab_line = Line::from(vec![
        Span::styled(" Global ", tab_style(view.tab == StatsTab::Global)),
        Span::raw("  "),
        Span::styled(" Per player ", tab_style(view.tab == StatsTab::Players)),
    ]);
    let tabs = Paragraph::new(tab_line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, layout[0]);

    let total = Paragraph::new(format!("total games: {}", view.global.total_games))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(total, layout[1]);

    match view.tab {
        StatsTab::Global => render_global_tab(frame, view, layout[2]),
        StatsTab::Players => render_players_tab(frame, view, layout[2]),
    }

    let footer = Paragraph::new("Tab Switch  Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

fn tab_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_global_tab(frame: &mut Frame, view: &StatsView, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(area);

    let global = &view.global;
    let summary = Text::from(vec![
        Line::from(format!(
            "impostors: {} games, {} wins ({:.1}%)",
            global.impostor_games, global.impostor_wins, global.impostor_win_rate
        )),
        Line::from(format!(
            "crewmates: {} games, {} wins ({:.1}%)",
            global.crewmate_games, global.crewmate_wins, global.crewmate_win_rate
        )),
    ]);
    let summary_widget = Paragraph::new(summary)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("By role"));
    frame.render_widget(summary_widget, layout[0]);

    // Leaderboard by total wins
    let mut rows: Vec<_> = view.players.iter().collect();
    rows.sort_by(|a, b| b.1.total_wins().cmp(&a.1.total_wins()).then(a.0.cmp(&b.0)));

    let items: Vec<ListItem> = rows
        .iter()
        .map(|(name, stats)| {
            ListItem::new(format!(
                "  {} - {} wins in {} games ({:.1}%)",
                name,
                stats.total_wins(),
                stats.games_played,
                stats.win_rate()
            ))
        })
        .collect();
    let list = list_or_empty(items, "no games recorded yet");
    frame.render_widget(
        list.block(Block::default().borders(Borders::ALL).title("Leaderboard")),
        layout[1],
    );
}

fn render_players_tab(frame: &mut Frame, view: &StatsView, area: Rect) {
    let items: Vec<ListItem> = view
        .players
        .iter()
        .map(|(name, stats)| {
            let line = Line::from(vec![
                Span::styled(format!("  {:<16}", name), Style::default().bold()),
                Span::raw(format!("games {:<4}", stats.games_played)),
                Span::styled(
                    format!("impostor {}/{} ", stats.impostor_wins, stats.impostor_games),
                    Style::default().fg(Color::Red),
                ),
                Span::styled(
                    format!("crew {}/{} ", stats.crewmate_wins, stats.crewmate_games),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("({:.1}%)", stats.win_rate()),
                    Style::default().fg(Color::Green),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = list_or_empty(items, "no games recorded yet");
    frame.render_widget(
        list.block(Block::default().borders(Borders::ALL).title("Players")),
        area,
    );
}

fn list_or_empty<'a>(items: Vec<ListItem<'a>>, empty_label: &str) -> List<'a> {
    if items.is_empty() {
        List::new([ListItem::new(format!("  {}", empty_label))
            .style(Style::default().fg(Color::DarkGray).italic())])
    } else {
        List::new(items)
    }
}
