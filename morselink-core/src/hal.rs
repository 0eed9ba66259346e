//! Hardware Abstraction Layer for both nodes
//!
//! Link lines, indicators and the buzzer are plain `embedded-hal` digital
//! pins. The traits here cover what `embedded-hal` does not: a bank of
//! button lines sampled together, and the periodic timer that feeds the
//! tick counter.

use embedded_hal::digital::{InputPin, OutputPin};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Timer period not reachable with the timer clock
    TimingError,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::TimingError => write!(f, "Timer period out of range"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Periodic timer that drives the tick counter
///
/// Implementations arm a hardware interrupt at `period_us`; the handler must
/// call [`crate::TickCounter::on_interrupt`] and finish well inside one period.
pub trait TickTimer {
    fn start(&mut self, period_us: u32) -> Result<(), HalError>;
}

/// Compare value for a timer counting `clock_hz` that fires every `period_us`
///
/// The counter needs at least two cycles per period and must fit in 32 bits.
pub fn timer_reload(clock_hz: u32, period_us: u32) -> Result<u32, HalError> {
    let cycles = u64::from(clock_hz) * u64::from(period_us) / 1_000_000;
    if cycles < 2 {
        return Err(HalError::TimingError);
    }
    u32::try_from(cycles - 1).map_err(|_| HalError::TimingError)
}

/// Button lines sharing one edge interrupt, sampled together after debounce
pub trait ButtonBank {
    /// Number of monitored lines
    fn line_count(&self) -> usize;

    /// Level of `line`, `true` when the button is pressed
    fn is_pressed(&mut self, line: usize) -> Result<bool, HalError>;
}

/// Array of identical active-high input pins
impl<P, const N: usize> ButtonBank for [P; N]
where
    P: InputPin,
{
    fn line_count(&self) -> usize {
        N
    }

    fn is_pressed(&mut self, line: usize) -> Result<bool, HalError> {
        let pin = self.get_mut(line).ok_or(HalError::InvalidConfig)?;
        pin.is_high().map_err(|_| HalError::GpioError)
    }
}

/// On/off output such as an LED or a buzzer line
pub struct Indicator<P> {
    pin: P,
    active_low: bool,
    on: bool,
}

impl<P> Indicator<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            on: false,
        }
    }

    /// Drive the output on or off
    pub fn set(&mut self, on: bool) -> Result<(), HalError> {
        let level = if self.active_low { !on } else { on };
        if level {
            self.pin.set_high().map_err(|_| HalError::GpioError)?;
        } else {
            self.pin.set_low().map_err(|_| HalError::GpioError)?;
        }
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Digital line whose level is shared between clones
    ///
    /// Works as both an input and an output so a test can hold one clone and
    /// hand the other to the code under test.
    #[derive(Clone, Default)]
    pub struct MockLine {
        level: Rc<Cell<bool>>,
        writes: Rc<Cell<usize>>,
    }

    impl MockLine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn level(&self) -> bool {
            self.level.get()
        }

        pub fn set_level(&self, level: bool) {
            self.level.set(level);
        }

        /// Number of times the line has been driven
        pub fn writes(&self) -> usize {
            self.writes.get()
        }
    }

    impl ErrorType for MockLine {
        type Error = Infallible;
    }

    impl InputPin for MockLine {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.get())
        }
    }

    impl OutputPin for MockLine {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.level.set(false);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.level.set(true);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    /// Button bank whose levels the test sets directly
    #[derive(Clone)]
    pub struct MockButtons {
        levels: Rc<RefCell<Vec<bool>>>,
        samples: Rc<Cell<usize>>,
    }

    impl MockButtons {
        pub fn new(lines: usize) -> Self {
            Self {
                levels: Rc::new(RefCell::new(std::vec![false; lines])),
                samples: Rc::new(Cell::new(0)),
            }
        }

        pub fn set(&self, line: usize, pressed: bool) {
            self.levels.borrow_mut()[line] = pressed;
        }

        pub fn release_all(&self) {
            self.levels.borrow_mut().iter_mut().for_each(|level| *level = false);
        }

        /// Number of individual line reads performed so far
        pub fn samples(&self) -> usize {
            self.samples.get()
        }
    }

    impl ButtonBank for MockButtons {
        fn line_count(&self) -> usize {
            self.levels.borrow().len()
        }

        fn is_pressed(&mut self, line: usize) -> Result<bool, HalError> {
            self.samples.set(self.samples.get() + 1);
            self.levels
                .borrow()
                .get(line)
                .copied()
                .ok_or(HalError::InvalidConfig)
        }
    }

    /// Output pin that always fails, for error-path tests
    #[derive(Default)]
    pub struct FaultyLine;

    impl ErrorType for FaultyLine {
        type Error = embedded_hal::digital::ErrorKind;
    }

    impl OutputPin for FaultyLine {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }
    }

    impl InputPin for FaultyLine {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }
    }
}
