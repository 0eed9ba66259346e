//! Two-tone SOS siren
//!
//! A square wave on the buzzer line, recomputed every tick from elapsed-time
//! comparisons. The tone alternates between two half-periods every
//! modulation interval, starting on the higher tone.

use crate::config::SirenTiming;
use crate::tick::Tick;

#[derive(Debug, Clone)]
pub struct Siren {
    sounding: bool,
    high_tone: bool,
    last_swap: Tick,
    level: bool,
    last_toggle: Tick,
}

impl Siren {
    pub const fn new() -> Self {
        Self {
            sounding: false,
            high_tone: true,
            last_swap: Tick::ZERO,
            level: false,
            last_toggle: Tick::ZERO,
        }
    }

    /// Buzzer level for this tick of an alarm active since `active_since`
    pub fn update(&mut self, timing: &SirenTiming, active_since: Tick, now: Tick) -> bool {
        if !now.has_elapsed(active_since, timing.start_delay) {
            self.silence();
            return false;
        }

        if !self.sounding {
            self.sounding = true;
            self.high_tone = true;
            self.last_swap = now;
            self.level = true;
            self.last_toggle = now;
            return self.level;
        }

        if now.has_elapsed(self.last_swap, timing.modulation) {
            self.high_tone = !self.high_tone;
            self.last_swap = now;
        }

        let half_period = if self.high_tone {
            timing.high_half_period
        } else {
            timing.low_half_period
        };
        if now.has_elapsed(self.last_toggle, half_period) {
            self.level = !self.level;
            self.last_toggle = now;
        }
        self.level
    }

    pub fn silence(&mut self) {
        self.sounding = false;
        self.high_tone = true;
        self.level = false;
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    /// True while the first (higher) tone plays
    pub fn is_high_tone(&self) -> bool {
        self.high_tone
    }
}

impl Default for Siren {
    fn default() -> Self {
        Self::new()
    }
}
