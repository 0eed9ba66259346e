//! SOS indicator blink

use crate::tick::Tick;

/// Toggles an indicator every `interval` ticks, starting lit
#[derive(Debug, Clone)]
pub struct LedBlink {
    running: bool,
    lit: bool,
    last_toggle: Tick,
}

impl LedBlink {
    pub const fn new() -> Self {
        Self {
            running: false,
            lit: false,
            last_toggle: Tick::ZERO,
        }
    }

    pub fn start(&mut self, now: Tick) {
        self.running = true;
        self.lit = true;
        self.last_toggle = now;
    }

    /// Indicator level at `now`; starts the blink if it is not running
    pub fn update(&mut self, interval: u32, now: Tick) -> bool {
        if !self.running {
            self.start(now);
        } else if now.has_elapsed(self.last_toggle, interval) {
            self.lit = !self.lit;
            self.last_toggle = now;
        }
        self.lit
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.lit = false;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Default for LedBlink {
    fn default() -> Self {
        Self::new()
    }
}
