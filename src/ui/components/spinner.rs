//! Animated spinner for in-flight page requests.

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A spinner advanced on every tick while active.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
    active: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or stop the animation. Restarting resets to the first frame.
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.frame = 0;
        }
        self.active = active;
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tick(&mut self) {
        if self.active {
            self.frame = (self.frame + 1) % FRAMES.len();
        }
    }

    /// Current frame, or a blank while stopped.
    pub fn frame(&self) -> &'static str {
        if self.active {
            FRAMES[self.frame]
        } else {
            " "
        }
    }

    /// Spinner followed by a message, for embedding in a row.
    pub fn text(&self, message: &str) -> String {
        format!("{} {}", self.frame(), message)
    }
}
