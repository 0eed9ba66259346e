//! Delayed SOS arming (input node)

use crate::tick::Tick;
use crate::types::SosState;

/// Effect of an SOS button press
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SosPress {
    /// Countdown started
    Armed,
    /// Pending countdown cancelled, nothing will be sent
    Cancelled,
}

/// First press arms, a second press inside the delay cancels, otherwise
/// the alarm is sent once when the delay runs out
#[derive(Debug, Clone)]
pub struct SosArming {
    state: SosState,
    delay: u32,
}

impl SosArming {
    pub const fn new(delay: u32) -> Self {
        Self {
            state: SosState::Idle,
            delay,
        }
    }

    pub fn state(&self) -> SosState {
        self.state
    }

    pub fn press(&mut self, now: Tick) -> SosPress {
        match self.state {
            SosState::Pending(_) => {
                debug!("sos: cancelled");
                self.state = SosState::Idle;
                SosPress::Cancelled
            }
            _ => {
                debug!("sos: armed");
                self.state = SosState::Pending(now);
                SosPress::Armed
            }
        }
    }

    /// True exactly once, when a pending countdown expires
    pub fn check(&mut self, now: Tick) -> bool {
        match self.state {
            SosState::Pending(start) if now.has_elapsed(start, self.delay) => {
                self.state = SosState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn disarm(&mut self) {
        self.state = SosState::Idle;
    }
}
