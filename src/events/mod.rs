//! Event handling for the application.
//!
//! Terminal input is polled by [`EventHandler`] and turned into [`Event`]s
//! for `App::update`. Page responses arrive separately on the task channel.

mod handler;
mod keys;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;
pub use keys::{keybindings_grouped, KeyContext, Keybinding};

/// Application events consumed by `App::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Periodic tick for animations and toast expiry.
    Tick,
}
