//! Application state and screen flow

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, Screen};
pub use state::{SetupField, SetupForm, StatsTab, StatsView};
