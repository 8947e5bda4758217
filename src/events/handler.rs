//! Terminal event polling.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// Spinner frames advance at this rate.
const TICK_RATE_MS: u64 = 100;

/// Polls crossterm and converts terminal events into [`Event`]s.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::with_tick_rate(TICK_RATE_MS)
    }

    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait up to one tick for input.
    ///
    /// Returns `Event::Tick` when nothing arrived. Key releases and repeats
    /// reported by some terminals are folded into ticks too.
    pub fn next(&self) -> std::io::Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        let event = match event::read()? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        };
        Ok(event)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tick_rate() {
        let handler = EventHandler::default();
        assert_eq!(handler.tick_rate, Duration::from_millis(TICK_RATE_MS));
    }

    #[test]
    fn test_custom_tick_rate() {
        let handler = EventHandler::with_tick_rate(250);
        assert_eq!(handler.tick_rate, Duration::from_millis(250));
    }
}
