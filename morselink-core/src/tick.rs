//! Monotonic tick time base
//!
//! A hardware timer interrupt is the only writer of the tick counter; every
//! other component reads it and compares unsigned differences
//! (`now - start >= threshold`). The counter wraps, and differences stay
//! correct as long as the measured interval is shorter than half its range.

use portable_atomic::{AtomicU32, Ordering};

/// Tick period of the reference system in microseconds
pub const TICK_PERIOD_US: u32 = 100;

/// A point on the wrapping tick timeline
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(u32);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Ticks elapsed since `earlier`, valid across wraparound
    pub const fn since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// True once at least `ticks` have passed since `earlier`
    pub const fn has_elapsed(self, earlier: Tick, ticks: u32) -> bool {
        self.since(earlier) >= ticks
    }

    pub const fn wrapping_add(self, ticks: u32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }
}

/// Anything that can report the current tick
pub trait TickSource {
    fn now(&self) -> Tick;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// Interrupt-driven tick counter
///
/// Place it in a `static` and call [`TickCounter::on_interrupt`] from the
/// periodic timer handler. Reads from the main loop are single atomic loads,
/// so no critical section is needed.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Counter pre-loaded with `raw`, handy for exercising wraparound
    pub const fn starting_at(raw: u32) -> Self {
        Self {
            ticks: AtomicU32::new(raw),
        }
    }

    /// Advance by one tick (timer interrupt only) and return the new value
    ///
    /// The interrupt is the sole writer, so a load/store pair is enough and
    /// works on cores without atomic read-modify-write.
    pub fn on_interrupt(&self) -> Tick {
        let next = self.ticks.load(Ordering::Relaxed).wrapping_add(1);
        self.ticks.store(next, Ordering::Release);
        Tick(next)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for TickCounter {
    fn now(&self) -> Tick {
        Tick(self.ticks.load(Ordering::Acquire))
    }
}
