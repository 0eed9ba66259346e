#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Morselink Core
//!
//! Shared logic for the two-node Morse gesture link: an input node turns
//! button gestures into framed ASCII messages and clocks them out over a
//! bit-banged CLOCK/DATA pair, a display node clocks them in, validates them
//! and drives the screen, siren and indicator LEDs.
//!
//! Everything is driven by a single wrapping tick counter. Blocking waits go
//! through [`scheduler::BusyWait`], which keeps the background state machines
//! alive by running idle work on every spin.

#[macro_use]
mod fmt;

pub mod tick;
pub mod scheduler;
pub mod hal;
pub mod types;
pub mod config;
pub mod command;
pub mod services;
pub mod link;
pub mod debounce;
pub mod sequence;
pub mod sos;
pub mod siren;
pub mod blink;
pub mod alarm;
pub mod undo;
pub mod input_node;
pub mod display_node;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;


pub use tick::{Tick, TickCounter, TickSource, TICK_PERIOD_US};
pub use scheduler::{BusyWait, IdleWork, NoIdle, WaitOutcome};
pub use hal::{timer_reload, ButtonBank, HalError, Indicator, TickTimer};
pub use types::*;
pub use config::*;
pub use command::Command;
pub use services::{PhraseTable, Screen, StaticPhraseTable};
pub use link::{Frame, FrameParser, LinkDecoder, LinkEncoder, LinkError};
pub use debounce::{DebouncedInputReader, EdgeLatch};
pub use sequence::{Sequence, SequenceInterpreter};
pub use sos::{SosArming, SosPress};
pub use siren::Siren;
pub use blink::LedBlink;
pub use alarm::{AlertDriver, AlertLevels, AlertOutputs, SharedAlarm};
pub use undo::{UndoIndicator, UndoLog};
pub use input_node::InputNode;
pub use display_node::{DisplayEvent, DisplayNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reference timing used by both nodes at the 100 µs tick
pub fn default_config() -> TimingConfig {
    TimingConfig::default()
}
