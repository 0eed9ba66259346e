//! Undo aggregation (display node)
//!
//! Every received `"UNDO"` is timestamped into a fixed ring buffer. When more
//! than a threshold of them land inside a trailing window, the undo indicator
//! lights for a fixed time and the log starts over.

use embedded_hal::digital::OutputPin;
use heapless::Deque;

use crate::config::UndoTiming;
use crate::hal::{HalError, Indicator};
use crate::tick::Tick;

/// Number of undo timestamps retained
pub const UNDO_LOG_CAPACITY: usize = 10;

/// Ring buffer of undo timestamps; the oldest entry is evicted when full
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    entries: Deque<Tick, UNDO_LOG_CAPACITY>,
}

impl UndoLog {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    pub fn record(&mut self, now: Tick) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Room was made above
        let _ = self.entries.push_back(now);
    }

    /// Entries no older than `window` ticks at `now`
    pub fn count_within(&self, now: Tick, window: u32) -> usize {
        self.entries
            .iter()
            .filter(|&&at| !now.has_elapsed(at, window.saturating_add(1)))
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Undo log driving the undo indicator
pub struct UndoIndicator<LED> {
    log: UndoLog,
    led: Indicator<LED>,
    lit_since: Tick,
    timing: UndoTiming,
}

impl<LED> UndoIndicator<LED>
where
    LED: OutputPin,
{
    pub fn new(led: Indicator<LED>, timing: UndoTiming) -> Self {
        Self {
            log: UndoLog::new(),
            led,
            lit_since: Tick::ZERO,
            timing,
        }
    }

    pub fn record(&mut self, now: Tick) {
        self.log.record(now);
        debug!("undo: {} logged", self.log.len());
    }

    /// Run the indicator automaton; called from idle work and the main loop
    pub fn maintain(&mut self, now: Tick) -> Result<(), HalError> {
        if self.led.is_on() {
            if now.has_elapsed(self.lit_since, self.timing.led_on) {
                self.led.set(false)?;
            }
            return Ok(());
        }

        if self.log.count_within(now, self.timing.window) > self.timing.threshold {
            info!("undo: burst, indicator on");
            self.led.set(true)?;
            self.lit_since = now;
            self.log.clear();
        }
        Ok(())
    }

    /// Turn the indicator off and forget logged undos
    pub fn force_off(&mut self) -> Result<(), HalError> {
        self.log.clear();
        self.led.set(false)
    }

    pub fn is_lit(&self) -> bool {
        self.led.is_on()
    }

    pub fn log(&self) -> &UndoLog {
        &self.log
    }

    pub fn release(self) -> LED {
        self.led.release()
    }
}
