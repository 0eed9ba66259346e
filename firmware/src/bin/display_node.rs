#![no_std]
#![no_main]

// Logging support
#[cfg(feature = "defmt")]
use defmt::{debug, error, info, warn};
use panic_halt as _;

// Define simple logging macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($arg:tt)*) => {{}};
}

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use morselink_core::{
    default_config, AlertDriver, AlertOutputs, BusyWait, DisplayEvent, DisplayNode, Indicator,
    LinkDecoder, SharedAlarm, TickTimer, TICK_PERIOD_US,
};
use morselink_firmware::board::{
    self, BUZZER_PIN, GPIOC_BASE, GPIOD_BASE, LINK_CLOCK_PIN, LINK_DATA_PIN, SOS_LED_PIN,
    UNDO_LED_PIN,
};
use morselink_firmware::{LogScreen, RegInput, RegOutput, SysTickTimer, TICKS};
use riscv_rt::entry;

const HEARTBEAT: Duration = Duration::from_secs(10);

/// SOS state written by the main loop, read by the SysTick handler
static ALARM: SharedAlarm = SharedAlarm::new();

/// Siren and SOS LED, owned by the SysTick handler once installed
static ALERTS: Mutex<RefCell<Option<AlertOutputs<RegOutput, RegOutput>>>> =
    Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let config = match default_config().validated() {
        Ok(config) => config,
        Err(_error) => {
            error!("display node: bad timing config: {}", _error);
            board::halt();
        }
    };

    board::enable_clocks();
    let clock = RegInput::floating(GPIOD_BASE, LINK_CLOCK_PIN);
    let data = RegInput::floating(GPIOD_BASE, LINK_DATA_PIN);
    let buzzer = RegOutput::push_pull(GPIOC_BASE, BUZZER_PIN);
    let sos_led = RegOutput::push_pull(GPIOC_BASE, SOS_LED_PIN);
    let undo_led = RegOutput::push_pull(GPIOD_BASE, UNDO_LED_PIN);

    let alerts = AlertOutputs::new(
        AlertDriver::from_config(&config),
        Indicator::new(buzzer, false),
        Indicator::new(sos_led, false),
    );
    critical_section::with(|cs| ALERTS.borrow(cs).replace(Some(alerts)));

    let mut systick = SysTickTimer::new(board::HCLK_HZ);
    if systick.start(TICK_PERIOD_US).is_err() {
        error!("display node: SysTick setup failed");
        board::halt();
    }
    unsafe { riscv::interrupt::enable() };

    let mut node = DisplayNode::new(
        BusyWait::new(&TICKS),
        LinkDecoder::new(clock, data, config.link.edge_timeout),
        &ALARM,
        Indicator::new(undo_led, false),
        LogScreen::new(),
        &config,
    );
    if let Err(_error) = node.start() {
        error!("display node: start-up failed: {}", _error);
        board::halt();
    }

    let mut last_heartbeat = Instant::now();
    loop {
        match node.poll() {
            Ok(DisplayEvent::Idle) => {}
            Ok(_event) => debug!("display node: {}", _event),
            Err(_error) => warn!("display node: {}", _error),
        }

        if last_heartbeat.elapsed() >= HEARTBEAT {
            info!(
                "display node: up {}s, sos={}, undo led={}",
                Instant::now().as_secs(),
                ALARM.is_active(),
                node.undo_lit()
            );
            last_heartbeat = Instant::now();
        }
    }
}

// ========================================
// Interrupt Handlers
// ========================================

/// Tick, then siren and SOS LED for this tick
#[no_mangle]
extern "C" fn SysTick() {
    let now = morselink_firmware::on_systick();
    critical_section::with(|cs| {
        if let Some(alerts) = ALERTS.borrow(cs).borrow_mut().as_mut() {
            // Register pins cannot fail
            let _ = alerts.service(&ALARM, now);
        }
    });
}
