//! Timing configuration
//!
//! Every duration is a tick count at the system tick period
//! ([`crate::TICK_PERIOD_US`]). Durations must stay below half the tick
//! counter range for wrapping comparisons to hold.

use crate::tick::TICK_PERIOD_US;

/// Longest duration accepted anywhere in the configuration
pub const MAX_DURATION_TICKS: u32 = u32::MAX / 2;

/// Convert milliseconds to ticks
pub const fn ticks_from_ms(ms: u32) -> u32 {
    ticks_from_us(ms.saturating_mul(1000))
}

/// Convert microseconds to ticks, rounding to the nearest tick
pub const fn ticks_from_us(us: u32) -> u32 {
    us.saturating_add(TICK_PERIOD_US / 2) / TICK_PERIOD_US
}

/// Configuration errors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Named duration is zero
    ZeroDuration(&'static str),
    /// Named duration exceeds half the tick range
    DurationTooLong(&'static str),
    /// Undo threshold can never be exceeded with the log capacity
    UnreachableUndoThreshold,
    /// A tone half-period is not shorter than the modulation interval
    ToneSlowerThanModulation,
}

#[cfg(feature = "std")]
impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroDuration(name) => write!(f, "{name} must be at least one tick"),
            ConfigError::DurationTooLong(name) => {
                write!(f, "{name} exceeds half the tick counter range")
            }
            ConfigError::UnreachableUndoThreshold => {
                write!(f, "undo threshold must be below the undo log capacity")
            }
            ConfigError::ToneSlowerThanModulation => {
                write!(f, "tone half-periods must be shorter than the modulation interval")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Bit timing of the two-wire link
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkTiming {
    /// Ticks each clock half-cycle is held by the encoder
    pub bit_ticks: u32,
    /// Longest wait for a clock edge in the decoder, `None` waits forever
    pub edge_timeout: Option<u32>,
}

impl Default for LinkTiming {
    fn default() -> Self {
        Self {
            bit_ticks: 1,
            edge_timeout: Some(ticks_from_ms(100)),
        }
    }
}

/// Two-tone siren timing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SirenTiming {
    /// Delay between SOS activation and the first tone
    pub start_delay: u32,
    /// Interval between tone swaps
    pub modulation: u32,
    /// Half-period of the first (higher) tone
    pub high_half_period: u32,
    /// Half-period of the second (lower) tone
    pub low_half_period: u32,
}

impl Default for SirenTiming {
    fn default() -> Self {
        Self {
            start_delay: ticks_from_ms(2_000),
            modulation: ticks_from_ms(500),
            // ~960 Hz and ~770 Hz
            high_half_period: ticks_from_us(520),
            low_half_period: ticks_from_us(650),
        }
    }
}

/// Undo aggregation timing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UndoTiming {
    /// Trailing window over which undo events are counted
    pub window: u32,
    /// The indicator lights when the count exceeds this
    pub threshold: usize,
    /// How long the indicator stays lit
    pub led_on: u32,
}

impl Default for UndoTiming {
    fn default() -> Self {
        Self {
            window: ticks_from_ms(3_000),
            threshold: 3,
            led_on: ticks_from_ms(2_000),
        }
    }
}

/// Full timing configuration for both nodes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Delay between the button edge and the level scan
    pub debounce: u32,
    /// Inactivity after which a pending sequence is discarded
    pub sequence_timeout: u32,
    /// Delay between arming SOS and sending it
    pub sos_delay: u32,
    pub siren: SirenTiming,
    /// SOS indicator toggle interval
    pub led_blink: u32,
    pub undo: UndoTiming,
    /// How long a normal message stays on the display
    pub display_hold: u32,
    pub link: LinkTiming,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce: ticks_from_ms(50),
            sequence_timeout: ticks_from_ms(5_000),
            sos_delay: ticks_from_ms(3_000),
            siren: SirenTiming::default(),
            led_blink: ticks_from_ms(250),
            undo: UndoTiming::default(),
            display_hold: ticks_from_ms(2_000),
            link: LinkTiming::default(),
        }
    }
}

impl TimingConfig {
    /// Check every duration and cross-field constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("debounce", self.debounce),
            ("sequence_timeout", self.sequence_timeout),
            ("sos_delay", self.sos_delay),
            ("siren.modulation", self.siren.modulation),
            ("siren.high_half_period", self.siren.high_half_period),
            ("siren.low_half_period", self.siren.low_half_period),
            ("led_blink", self.led_blink),
            ("undo.window", self.undo.window),
            ("undo.led_on", self.undo.led_on),
            ("display_hold", self.display_hold),
            ("link.bit_ticks", self.link.bit_ticks),
        ];
        for (name, ticks) in durations {
            check_duration(name, ticks)?;
        }
        if self.siren.start_delay > MAX_DURATION_TICKS {
            return Err(ConfigError::DurationTooLong("siren.start_delay"));
        }
        if let Some(timeout) = self.link.edge_timeout {
            check_duration("link.edge_timeout", timeout)?;
        }

        if self.undo.threshold >= crate::undo::UNDO_LOG_CAPACITY {
            return Err(ConfigError::UnreachableUndoThreshold);
        }
        if self.siren.high_half_period >= self.siren.modulation
            || self.siren.low_half_period >= self.siren.modulation
        {
            return Err(ConfigError::ToneSlowerThanModulation);
        }
        Ok(())
    }

    /// Configuration with validation
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

fn check_duration(name: &'static str, ticks: u32) -> Result<(), ConfigError> {
    if ticks == 0 {
        return Err(ConfigError::ZeroDuration(name));
    }
    if ticks > MAX_DURATION_TICKS {
        return Err(ConfigError::DurationTooLong(name));
    }
    Ok(())
}
