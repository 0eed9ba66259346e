#![no_std]
#![no_main]

// Logging support
#[cfg(feature = "defmt")]
use defmt::{error, info, warn};
use panic_halt as _;

// Define simple logging macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! info {
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

use morselink_core::{
    default_config, BusyWait, ButtonMap, EdgeLatch, InputNode, LinkEncoder, TickTimer,
    TICK_PERIOD_US,
};
use morselink_firmware::board::{self, GPIOD_BASE, LINK_CLOCK_PIN, LINK_DATA_PIN};
use morselink_firmware::{Buttons, RegOutput, SysTickTimer, PHRASES, TICKS};
use riscv_rt::entry;

/// Set by the button interrupt, consumed by the debouncer
static BUTTON_EDGE: EdgeLatch = EdgeLatch::new();

#[entry]
fn main() -> ! {
    let config = match default_config().validated() {
        Ok(config) => config,
        Err(_error) => {
            error!("input node: bad timing config: {}", _error);
            board::halt();
        }
    };

    board::enable_clocks();
    let buttons = Buttons::new();
    let clock = RegOutput::push_pull(GPIOD_BASE, LINK_CLOCK_PIN);
    let data = RegOutput::push_pull(GPIOD_BASE, LINK_DATA_PIN);
    board::enable_button_interrupts();

    let mut systick = SysTickTimer::new(board::HCLK_HZ);
    if systick.start(TICK_PERIOD_US).is_err() {
        error!("input node: SysTick setup failed");
        board::halt();
    }
    unsafe { riscv::interrupt::enable() };

    let mut node = InputNode::new(
        BusyWait::new(&TICKS),
        LinkEncoder::new(clock, data, config.link.bit_ticks),
        buttons,
        ButtonMap::default(),
        &BUTTON_EDGE,
        &PHRASES,
        &config,
    );
    if let Err(_error) = node.start() {
        error!("input node: link setup failed: {}", _error);
        board::halt();
    }
    info!("input node: {} phrases loaded", PHRASES.len());

    loop {
        if let Err(_error) = node.poll() {
            warn!("input node: {}", _error);
        }
    }
}

// ========================================
// Interrupt Handlers
// ========================================

#[no_mangle]
extern "C" fn SysTick() {
    morselink_firmware::on_systick();
}

#[no_mangle]
extern "C" fn EXTI7_0_IRQHandler() {
    if board::take_exti_pending(board::BUTTON_LINE_MASK) != 0 {
        BUTTON_EDGE.signal();
    }
}
