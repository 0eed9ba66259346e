//! Test utilities for morselink core functionality

pub mod virtual_time {
    //! Virtual tick time for deterministic testing

    use crate::tick::{Tick, TickSource};
    use core::cell::Cell;

    /// Tick source under test control
    ///
    /// Every `now()` call returns the current tick and then advances by
    /// `step`, so busy-waits make progress without a real timer. A step of
    /// zero freezes time.
    #[derive(Debug, Default)]
    pub struct MockClock {
        now: Cell<u32>,
        step: Cell<u32>,
    }

    impl MockClock {
        /// Frozen clock at tick 0
        pub fn new() -> Self {
            Self::default()
        }

        /// Clock at tick 0 advancing `step` ticks per read
        pub fn stepping(step: u32) -> Self {
            Self::starting_at(0, step)
        }

        pub fn starting_at(raw: u32, step: u32) -> Self {
            Self {
                now: Cell::new(raw),
                step: Cell::new(step),
            }
        }

        /// Current tick without advancing
        pub fn peek(&self) -> Tick {
            Tick::from_raw(self.now.get())
        }

        pub fn advance(&self, ticks: u32) {
            self.now.set(self.now.get().wrapping_add(ticks));
        }

        pub fn set(&self, tick: Tick) {
            self.now.set(tick.raw());
        }

        pub fn set_step(&self, step: u32) {
            self.step.set(step);
        }
    }

    impl TickSource for MockClock {
        fn now(&self) -> Tick {
            let now = self.now.get();
            self.now.set(now.wrapping_add(self.step.get()));
            Tick::from_raw(now)
        }
    }
}

pub mod wire {
    //! Recorded CLOCK/DATA pair connecting an encoder to a decoder in one thread

    use crate::link::{Frame, FrameParser};
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Line {
        Clock,
        Data,
    }

    #[derive(Debug, Default)]
    struct WireState {
        clock: bool,
        data: bool,
        /// `(clock, data)` after every write
        trace: Vec<(bool, bool)>,
        /// Next trace entry handed to a clock read
        cursor: usize,
        /// Last entry handed out
        seen: (bool, bool),
    }

    /// Shared two-wire bus
    ///
    /// Writers append a `(clock, data)` snapshot on every pin write. Readers
    /// replay those snapshots: each CLOCK read consumes one, DATA reads return
    /// the data level of the snapshot last consumed. Once the recording is
    /// exhausted the lines hold their final level, which is how a stopped
    /// sender looks to the receiver.
    #[derive(Clone, Default)]
    pub struct Wire {
        state: Rc<RefCell<WireState>>,
    }

    impl Wire {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn clock_out(&self) -> WireOut {
            WireOut {
                state: self.state.clone(),
                line: Line::Clock,
            }
        }

        pub fn data_out(&self) -> WireOut {
            WireOut {
                state: self.state.clone(),
                line: Line::Data,
            }
        }

        pub fn clock_in(&self) -> WireIn {
            WireIn {
                state: self.state.clone(),
                line: Line::Clock,
            }
        }

        pub fn data_in(&self) -> WireIn {
            WireIn {
                state: self.state.clone(),
                line: Line::Data,
            }
        }

        /// Record one clock pulse per bit, as a sender would
        pub fn drive_bits(&self, bits: &[bool]) {
            let mut state = self.state.borrow_mut();
            for &bit in bits {
                state.trace.push((false, bit));
                state.trace.push((true, bit));
                state.trace.push((false, bit));
            }
            state.clock = false;
            if let Some(&last) = bits.last() {
                state.data = last;
            }
        }

        /// Record bytes most significant bit first
        pub fn drive_bytes(&self, bytes: &[u8]) {
            let bits: Vec<bool> = bytes
                .iter()
                .flat_map(|&byte| (0..8).rev().map(move |bit| byte & (1 << bit) != 0))
                .collect();
            self.drive_bits(&bits);
        }

        /// DATA level at every rising CLOCK edge of the recording
        pub fn sampled_bits(&self) -> Vec<bool> {
            let state = self.state.borrow();
            let mut previous = false;
            let mut bits = Vec::new();
            for &(clock, data) in &state.trace {
                if clock && !previous {
                    bits.push(data);
                }
                previous = clock;
            }
            bits
        }

        /// Sampled bits grouped into whole bytes
        pub fn sampled_bytes(&self) -> Vec<u8> {
            self.sampled_bits()
                .chunks_exact(8)
                .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
                .collect()
        }

        /// Every valid frame found in the recording
        pub fn captured_frames(&self) -> Vec<Frame> {
            let mut parser = FrameParser::new();
            self.sampled_bytes()
                .into_iter()
                .filter_map(|byte| parser.feed(byte).ok().flatten())
                .collect()
        }

        /// Current CLOCK level as last driven
        pub fn clock_level(&self) -> bool {
            self.state.borrow().clock
        }

        pub fn data_level(&self) -> bool {
            self.state.borrow().data
        }

        /// Number of snapshots not yet replayed
        pub fn pending(&self) -> usize {
            let state = self.state.borrow();
            state.trace.len().saturating_sub(state.cursor)
        }
    }

    /// Writing end of one line
    pub struct WireOut {
        state: Rc<RefCell<WireState>>,
        line: Line,
    }

    impl WireOut {
        fn drive(&mut self, level: bool) {
            let mut state = self.state.borrow_mut();
            match self.line {
                Line::Clock => state.clock = level,
                Line::Data => state.data = level,
            }
            let snapshot = (state.clock, state.data);
            state.trace.push(snapshot);
        }
    }

    impl ErrorType for WireOut {
        type Error = Infallible;
    }

    impl OutputPin for WireOut {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.drive(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.drive(true);
            Ok(())
        }
    }

    /// Reading end of one line
    pub struct WireIn {
        state: Rc<RefCell<WireState>>,
        line: Line,
    }

    impl ErrorType for WireIn {
        type Error = Infallible;
    }

    impl InputPin for WireIn {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let mut state = self.state.borrow_mut();
            match self.line {
                Line::Clock => {
                    if let Some(&snapshot) = state.trace.get(state.cursor) {
                        state.seen = snapshot;
                        state.cursor += 1;
                    }
                    Ok(state.seen.0)
                }
                Line::Data => Ok(state.seen.1),
            }
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }
}

pub mod screen_capture {
    //! Screen output capture for testing

    use crate::hal::HalError;
    use crate::services::Screen;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::string::{String, ToString};
    use std::vec::Vec;

    /// One call made on the screen
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ScreenOp {
        Render(String),
        Clear,
    }

    /// Screen that records every call; clones share the record
    #[derive(Clone, Default)]
    pub struct ScreenCapture {
        ops: Rc<RefCell<Vec<ScreenOp>>>,
    }

    impl ScreenCapture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ops(&self) -> Vec<ScreenOp> {
            self.ops.borrow().clone()
        }

        /// Text currently on screen
        pub fn current(&self) -> Option<String> {
            match self.ops.borrow().last() {
                Some(ScreenOp::Render(text)) => Some(text.clone()),
                _ => None,
            }
        }

        /// Every text rendered so far, in order
        pub fn rendered(&self) -> Vec<String> {
            self.ops
                .borrow()
                .iter()
                .filter_map(|op| match op {
                    ScreenOp::Render(text) => Some(text.clone()),
                    ScreenOp::Clear => None,
                })
                .collect()
        }

        pub fn clear_log(&self) {
            self.ops.borrow_mut().clear();
        }
    }

    impl Screen for ScreenCapture {
        fn render(&mut self, text: &str) -> Result<(), HalError> {
            self.ops.borrow_mut().push(ScreenOp::Render(text.to_string()));
            Ok(())
        }

        fn clear(&mut self) -> Result<(), HalError> {
            self.ops.borrow_mut().push(ScreenOp::Clear);
            Ok(())
        }
    }
}
