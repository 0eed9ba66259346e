//! Bench wiring shared by the integration tests, the session binary and the
//! throughput benchmark

use morselink_core::hal::mock::{MockButtons, MockLine};
use morselink_core::test_utils::screen_capture::ScreenCapture;
use morselink_core::test_utils::virtual_time::MockClock;
use morselink_core::test_utils::wire::{Wire, WireIn, WireOut};
use morselink_core::{
    AlertDriver, AlertLevels, BusyWait, ButtonMap, ButtonRole, DisplayEvent, DisplayNode,
    EdgeLatch, Indicator, InputNode, LinkDecoder, LinkEncoder, LinkTiming, SharedAlarm,
    SirenTiming, StaticPhraseTable, TimingConfig, UndoTiming,
};

/// Phrases loaded on the bench input node
pub const PHRASES: StaticPhraseTable<'static> = StaticPhraseTable::new(&[
    (".-", "Yes"),
    ("-.", "No"),
    ("...", "Help"),
    ("--", "Water"),
    (".-.-", "Thank you"),
]);

pub type BenchInput<'a> =
    InputNode<'a, &'a MockClock, WireOut, WireOut, MockButtons, StaticPhraseTable<'static>>;

pub type BenchDisplay<'a> =
    DisplayNode<'a, &'a MockClock, WireIn, WireIn, MockLine, ScreenCapture>;

/// Short timings so scenarios run in a few thousand virtual ticks
pub fn bench_config() -> TimingConfig {
    TimingConfig {
        debounce: 10,
        sequence_timeout: 1_000,
        sos_delay: 500,
        siren: SirenTiming {
            start_delay: 100,
            modulation: 50,
            high_half_period: 2,
            low_half_period: 3,
        },
        led_blink: 25,
        undo: UndoTiming {
            window: 5_000,
            threshold: 3,
            led_on: 300,
        },
        display_hold: 200,
        link: LinkTiming {
            bit_ticks: 1,
            edge_timeout: Some(20),
        },
    }
}

/// Both nodes' surroundings on one bench
pub struct Rig {
    pub clock: MockClock,
    pub latch: EdgeLatch,
    pub alarm: SharedAlarm,
    pub wire: Wire,
    pub buttons: MockButtons,
    pub undo_led: MockLine,
    pub screen: ScreenCapture,
    pub config: TimingConfig,
}

impl Default for Rig {
    fn default() -> Self {
        Self::new(bench_config())
    }
}

impl Rig {
    pub fn new(config: TimingConfig) -> Self {
        Self {
            clock: MockClock::stepping(1),
            latch: EdgeLatch::new(),
            alarm: SharedAlarm::new(),
            wire: Wire::new(),
            buttons: MockButtons::new(ButtonRole::ALL.len()),
            undo_led: MockLine::new(),
            screen: ScreenCapture::new(),
            config,
        }
    }

    pub fn input_node(&self) -> BenchInput<'_> {
        InputNode::new(
            BusyWait::new(&self.clock),
            LinkEncoder::new(
                self.wire.clock_out(),
                self.wire.data_out(),
                self.config.link.bit_ticks,
            ),
            self.buttons.clone(),
            ButtonMap::default(),
            &self.latch,
            PHRASES,
            &self.config,
        )
    }

    pub fn display_node(&self) -> BenchDisplay<'_> {
        DisplayNode::new(
            BusyWait::new(&self.clock),
            LinkDecoder::new(
                self.wire.clock_in(),
                self.wire.data_in(),
                self.config.link.edge_timeout,
            ),
            &self.alarm,
            Indicator::new(self.undo_led.clone(), false),
            self.screen.clone(),
            &self.config,
        )
    }

    /// Press and release one button, letting the debounce delay pass
    pub fn press(&self, node: &mut BenchInput<'_>, role: ButtonRole) {
        let Some(line) = ButtonMap::default().line_of(role) else {
            return;
        };
        self.buttons.set(line, true);
        self.latch.signal();
        node.poll().expect("press poll");
        self.clock.advance(self.config.debounce);
        node.poll().expect("debounce poll");
        self.buttons.release_all();
    }

    /// Enter a gesture string of `.` and `-`, then press Send
    pub fn key_in(&self, node: &mut BenchInput<'_>, gesture: &str) {
        for symbol in gesture.chars() {
            match symbol {
                '.' => self.press(node, ButtonRole::Dot),
                '-' => self.press(node, ButtonRole::Dash),
                _ => {}
            }
        }
        self.press(node, ButtonRole::Send);
    }

    /// Let `ticks` pass on the input node while it keeps polling
    pub fn idle_input(&self, node: &mut BenchInput<'_>, ticks: u32, step: u32) {
        let mut waited = 0;
        while waited < ticks {
            self.clock.advance(step);
            node.poll().expect("idle poll");
            waited += step;
        }
    }

    /// Payload text of every frame on the wire so far
    pub fn sent(&self) -> Vec<String> {
        self.wire
            .captured_frames()
            .iter()
            .filter_map(|frame| frame.text().map(String::from))
            .collect()
    }

    /// Poll the display node until the line goes idle
    pub fn drain(&self, node: &mut BenchDisplay<'_>) -> Vec<DisplayEvent> {
        let mut events = Vec::new();
        loop {
            match node.poll().expect("display poll") {
                DisplayEvent::Idle => return events,
                event => events.push(event),
            }
        }
    }

    /// Run the siren and SOS LED automata for `ticks`, one call per tick
    pub fn run_alerts(&self, driver: &mut AlertDriver, ticks: u32) -> Vec<AlertLevels> {
        (0..ticks)
            .map(|_| {
                self.clock.advance(1);
                driver.service(&self.alarm, self.clock.peek())
            })
            .collect()
    }
}
