//! Cooperative busy-wait scheduler
//!
//! There is no preemptive multitasking outside the timer interrupt. Any
//! blocking wait spins here, and on every spin runs the caller's idle work so
//! that debounce, undo and indicator state machines keep advancing while the
//! link or a display hold is busy.

use crate::tick::{Tick, TickSource};

/// Background maintenance run on every busy-wait spin
pub trait IdleWork {
    fn run(&mut self, now: Tick);
}

impl<F> IdleWork for F
where
    F: FnMut(Tick),
{
    fn run(&mut self, now: Tick) {
        self(now)
    }
}

/// Idle work that does nothing
#[derive(Copy, Clone, Debug, Default)]
pub struct NoIdle;

impl IdleWork for NoIdle {
    fn run(&mut self, _now: Tick) {}
}

/// Result of a bounded wait
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    /// Condition became true at this tick
    Ready(Tick),
    /// Timeout expired at this tick
    TimedOut(Tick),
}

/// Busy-wait primitive over a tick source
pub struct BusyWait<C> {
    clock: C,
}

impl<C: TickSource> BusyWait<C> {
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Block for at least `ticks`, running `idle` on every spin.
    ///
    /// Returns the tick observed when the wait completed.
    pub fn wait_ticks<I: IdleWork>(&self, ticks: u32, idle: &mut I) -> Tick {
        let start = self.clock.now();
        loop {
            let now = self.clock.now();
            if now.since(start) >= ticks {
                return now;
            }
            idle.run(now);
        }
    }

    /// Spin until `ready` reports true or `timeout` ticks pass.
    ///
    /// `None` waits forever. The condition is checked before the timeout on
    /// each spin, so a condition that is already true never times out.
    pub fn wait_for<I, E, F>(
        &self,
        timeout: Option<u32>,
        idle: &mut I,
        mut ready: F,
    ) -> Result<WaitOutcome, E>
    where
        I: IdleWork,
        F: FnMut() -> Result<bool, E>,
    {
        let start = self.clock.now();
        loop {
            let now = self.clock.now();
            if ready()? {
                return Ok(WaitOutcome::Ready(now));
            }
            if let Some(limit) = timeout {
                if now.since(start) >= limit {
                    return Ok(WaitOutcome::TimedOut(now));
                }
            }
            idle.run(now);
        }
    }
}
