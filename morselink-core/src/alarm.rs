//! SOS alarm state shared with the timer interrupt (display node)
//!
//! The main loop raises and clears the alarm; the tick interrupt reads it
//! and drives the siren and the SOS indicator through an [`AlertDriver`].

use embedded_hal::digital::OutputPin;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::blink::LedBlink;
use crate::config::{SirenTiming, TimingConfig};
use crate::hal::{HalError, Indicator};
use crate::siren::Siren;
use crate::tick::Tick;
use crate::types::SosState;

/// SOS Active flag and start tick
///
/// Written only from the main loop. The start tick is stored before the flag
/// is raised, so a reader that sees the flag also sees its start.
pub struct SharedAlarm {
    active: AtomicBool,
    since: AtomicU32,
}

impl SharedAlarm {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            since: AtomicU32::new(0),
        }
    }

    /// Enter Active at `now`; returns false if already active
    pub fn activate(&self, now: Tick) -> bool {
        if self.active.load(Ordering::Acquire) {
            return false;
        }
        self.since.store(now.raw(), Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
        true
    }

    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn active_since(&self) -> Option<Tick> {
        if self.active.load(Ordering::Acquire) {
            Some(Tick::from_raw(self.since.load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    pub fn state(&self) -> SosState {
        match self.active_since() {
            Some(since) => SosState::Active(since),
            None => SosState::Idle,
        }
    }
}

impl Default for SharedAlarm {
    fn default() -> Self {
        Self::new()
    }
}

/// Output levels for one tick
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertLevels {
    pub buzzer: bool,
    pub sos_led: bool,
}

/// Siren and SOS indicator automata, serviced once per tick
#[derive(Debug, Clone)]
pub struct AlertDriver {
    siren: Siren,
    blink: LedBlink,
    siren_timing: SirenTiming,
    blink_interval: u32,
    tracking: Option<Tick>,
}

impl AlertDriver {
    pub const fn new(siren_timing: SirenTiming, blink_interval: u32) -> Self {
        Self {
            siren: Siren::new(),
            blink: LedBlink::new(),
            siren_timing,
            blink_interval,
            tracking: None,
        }
    }

    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(config.siren, config.led_blink)
    }

    /// Levels for `now` given the current alarm state
    pub fn service(&mut self, alarm: &SharedAlarm, now: Tick) -> AlertLevels {
        let Some(since) = alarm.active_since() else {
            if self.tracking.take().is_some() {
                self.siren.silence();
                self.blink.reset();
            }
            return AlertLevels::default();
        };

        // A new activation restarts both automata
        if self.tracking != Some(since) {
            self.tracking = Some(since);
            self.siren.silence();
            self.blink.start(now);
        }

        AlertLevels {
            buzzer: self.siren.update(&self.siren_timing, since, now),
            sos_led: self.blink.update(self.blink_interval, now),
        }
    }
}

/// [`AlertDriver`] wired to the buzzer and SOS indicator pins
pub struct AlertOutputs<BUZ, LED> {
    driver: AlertDriver,
    buzzer: Indicator<BUZ>,
    sos_led: Indicator<LED>,
}

impl<BUZ, LED> AlertOutputs<BUZ, LED>
where
    BUZ: OutputPin,
    LED: OutputPin,
{
    pub fn new(driver: AlertDriver, buzzer: Indicator<BUZ>, sos_led: Indicator<LED>) -> Self {
        Self {
            driver,
            buzzer,
            sos_led,
        }
    }

    /// Compute this tick's levels and drive the pins that changed
    pub fn service(&mut self, alarm: &SharedAlarm, now: Tick) -> Result<AlertLevels, HalError> {
        let levels = self.driver.service(alarm, now);
        if self.buzzer.is_on() != levels.buzzer {
            self.buzzer.set(levels.buzzer)?;
        }
        if self.sos_led.is_on() != levels.sos_led {
            self.sos_led.set(levels.sos_led)?;
        }
        Ok(levels)
    }

    /// Force both outputs off
    pub fn shutdown(&mut self) -> Result<(), HalError> {
        self.buzzer.set(false)?;
        self.sos_led.set(false)
    }

    pub fn release(self) -> (BUZ, LED) {
        (self.buzzer.release(), self.sos_led.release())
    }
}
