//! Button debouncing
//!
//! All buttons share one edge interrupt. The interrupt only sets an
//! [`EdgeLatch`]; the main loop hands the latch to a
//! [`DebouncedInputReader`], which waits one fixed delay after the first edge
//! and then samples every monitored line once.

use portable_atomic::{AtomicBool, Ordering};

use crate::hal::{ButtonBank, HalError};
use crate::tick::Tick;
use crate::types::{ButtonEvents, ButtonMap};

/// Edge flag shared between the button interrupt and the main loop
pub struct EdgeLatch {
    pending: AtomicBool,
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record an edge (interrupt context)
    pub fn signal(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume a recorded edge
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a burst of edges into one sampled set of presses
///
/// Polling never blocks. Edges arriving while the debounce delay runs are
/// absorbed into the same scan; an edge that lands after the scan arms a new
/// delay.
#[derive(Debug, Clone)]
pub struct DebouncedInputReader {
    debounce: u32,
    armed_at: Option<Tick>,
}

impl DebouncedInputReader {
    pub const fn new(debounce: u32) -> Self {
        Self {
            debounce,
            armed_at: None,
        }
    }

    /// True while a debounce delay is running
    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Drop a running delay without sampling
    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    /// Advance the debouncer.
    ///
    /// Returns one role per mapped line that reads pressed once the delay
    /// has passed, in line order; otherwise an empty set.
    pub fn poll<B: ButtonBank>(
        &mut self,
        latch: &EdgeLatch,
        bank: &mut B,
        map: &ButtonMap,
        now: Tick,
    ) -> Result<ButtonEvents, HalError> {
        let edge = latch.take();
        let armed_at = match self.armed_at {
            Some(start) => start,
            None if edge => {
                trace!("debounce: armed at {}", now.raw());
                self.armed_at = Some(now);
                now
            }
            None => return Ok(ButtonEvents::new()),
        };

        if !now.has_elapsed(armed_at, self.debounce) {
            return Ok(ButtonEvents::new());
        }
        self.armed_at = None;

        let mut events = ButtonEvents::new();
        for (line, role) in map.bindings() {
            if line >= bank.line_count() {
                continue;
            }
            if bank.is_pressed(line)? {
                // One role per line and at most MAX_BUTTON_LINES lines
                let _ = events.push(role);
            }
        }
        debug!("debounce: {} press(es)", events.len());
        Ok(events)
    }
}
