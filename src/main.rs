//! Impostor - same-room social deduction word game
//!
//! One device, one secret word, somebody bluffing.

mod app;
mod game;
mod stats;
mod storage;
mod tui;

use app::AppCoordinator;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use storage::Storage;
use tui::Tui;

fn main() -> io::Result<()> {
    // Stats and room persistence are comfort features; a failed open only
    // means nothing survives this session.
    let storage = match Storage::open() {
        Ok(storage) => Some(storage),
        Err(e) => {
            log::warn!("running without persistence: {}", e);
            None
        }
    };

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let mut app = AppCoordinator::new(storage);

    // Main event loop
    loop {
        // Render
        terminal.draw(|frame| tui::render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            // Only handle key press events (not release)
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        // Check for quit
        if app.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
