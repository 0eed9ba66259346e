#![no_std]

//! Board support shared by the `input-node` and `display-node` binaries

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// Forward to defmt when it is enabled, compile to nothing otherwise
macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

pub mod board;
pub mod phrases;
pub mod screen;
pub mod time_driver;

pub use board::{Buttons, RegInput, RegOutput, SysTickTimer};
pub use phrases::PHRASES;
pub use screen::LogScreen;
pub use time_driver::{on_systick, TICKS};
