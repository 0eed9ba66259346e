//! CH32V003 register access for both nodes
//!
//! Pin assignments:
//! - PC0..PC5: Dot, Dash, Send, Undo, SOS, Reset buttons (active low, pull-up, EXTI0..5)
//! - PD2: link CLOCK (output on the input node, input on the display node)
//! - PD3: link DATA (same direction as CLOCK)
//! - PC6: buzzer (display node, active high)
//! - PC7: SOS LED (display node, active high)
//! - PD4: undo LED (display node, active high)

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use morselink_core::{timer_reload, ButtonBank, HalError, TickTimer};

/// Peripheral base addresses
const RCC_BASE: u32 = 0x4002_1000;
pub const GPIOC_BASE: u32 = 0x4001_1000;
pub const GPIOD_BASE: u32 = 0x4001_1400;
const AFIO_BASE: u32 = 0x4001_0000;
const EXTI_BASE: u32 = 0x4001_0400;
const PFIC_BASE: u32 = 0xE000_E000;
const STK_BASE: u32 = 0xE000_F000;

/// RCC register offsets
const RCC_APB2PCENR: u32 = 0x18;
const RCC_IOPCEN: u32 = 1 << 4;
const RCC_IOPDEN: u32 = 1 << 5;
const RCC_AFIOEN: u32 = 1 << 0;

/// GPIO register offsets
const GPIO_CFGLR: u32 = 0x00;
const GPIO_INDR: u32 = 0x08;
const GPIO_OUTDR: u32 = 0x0C;
const GPIO_BSHR: u32 = 0x10;

/// CFGLR nibbles
const CFG_INPUT_FLOATING: u32 = 0x4;
const CFG_INPUT_PULL: u32 = 0x8;
const CFG_OUTPUT_PUSH_PULL_10MHZ: u32 = 0x1;

/// AFIO / EXTI register offsets
const AFIO_EXTICR: u32 = 0x08;
const EXTICR_PORT_C: u32 = 0b10;
const EXTI_INTENR: u32 = 0x00;
const EXTI_FTENR: u32 = 0x0C;
const EXTI_INTFR: u32 = 0x14;

/// PFIC interrupt enable register and interrupt numbers
const PFIC_IENR1: u32 = 0x100;
const IRQ_SYSTICK: u32 = 12;
const IRQ_EXTI7_0: u32 = 20;

/// SysTick register offsets and control bits
const STK_CTLR: u32 = 0x00;
const STK_SR: u32 = 0x04;
const STK_CNTL: u32 = 0x08;
const STK_CMPLR: u32 = 0x10;
const STK_STE: u32 = 1 << 0;
const STK_STIE: u32 = 1 << 1;
const STK_STCLK_HCLK: u32 = 1 << 2;
const STK_STRE: u32 = 1 << 3;

/// Core clock after reset (HSI 24 MHz)
pub const HCLK_HZ: u32 = 24_000_000;

/// Button lines on port C, in role order
pub const BUTTON_PINS: [u8; 6] = [0, 1, 2, 3, 4, 5];
/// EXTI lines used by the buttons
pub const BUTTON_LINE_MASK: u32 = 0b11_1111;

pub const LINK_CLOCK_PIN: u8 = 2;
pub const LINK_DATA_PIN: u8 = 3;
pub const BUZZER_PIN: u8 = 6;
pub const SOS_LED_PIN: u8 = 7;
pub const UNDO_LED_PIN: u8 = 4;

#[inline]
fn read_reg(addr: u32) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

#[inline]
fn write_reg(addr: u32, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

#[inline]
fn modify_reg(addr: u32, f: impl FnOnce(u32) -> u32) {
    write_reg(addr, f(read_reg(addr)));
}

/// Enable the GPIO C/D and AFIO clocks
pub fn enable_clocks() {
    modify_reg(RCC_BASE + RCC_APB2PCENR, |v| {
        v | RCC_IOPCEN | RCC_IOPDEN | RCC_AFIOEN
    });
}

fn configure_pin(port: u32, pin: u8, cfg: u32) {
    let shift = u32::from(pin) * 4;
    modify_reg(port + GPIO_CFGLR, |v| (v & !(0xF << shift)) | (cfg << shift));
}

/// GPIO input read straight from INDR
pub struct RegInput {
    port: u32,
    pin: u8,
}

impl RegInput {
    /// Input with the internal pull-up enabled
    pub fn pull_up(port: u32, pin: u8) -> Self {
        configure_pin(port, pin, CFG_INPUT_PULL);
        // OUTDR selects pull-up for pulled inputs
        modify_reg(port + GPIO_OUTDR, |v| v | (1 << pin));
        Self { port, pin }
    }

    pub fn floating(port: u32, pin: u8) -> Self {
        configure_pin(port, pin, CFG_INPUT_FLOATING);
        Self { port, pin }
    }

    fn level(&self) -> bool {
        read_reg(self.port + GPIO_INDR) & (1 << self.pin) != 0
    }
}

impl ErrorType for RegInput {
    type Error = Infallible;
}

impl InputPin for RegInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

/// Push-pull output driven through BSHR
pub struct RegOutput {
    port: u32,
    pin: u8,
}

impl RegOutput {
    /// Configure as a push-pull output, initially low
    pub fn push_pull(port: u32, pin: u8) -> Self {
        let mut output = Self { port, pin };
        output.drive(false);
        configure_pin(port, pin, CFG_OUTPUT_PUSH_PULL_10MHZ);
        output
    }

    fn drive(&mut self, high: bool) {
        let bit = if high { 1 << self.pin } else { 1 << (self.pin + 16) };
        write_reg(self.port + GPIO_BSHR, bit);
    }
}

impl ErrorType for RegOutput {
    type Error = Infallible;
}

impl OutputPin for RegOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

/// Six active-low buttons with pull-ups on port C
pub struct Buttons {
    lines: [RegInput; 6],
}

impl Buttons {
    pub fn new() -> Self {
        Self {
            lines: BUTTON_PINS.map(|pin| RegInput::pull_up(GPIOC_BASE, pin)),
        }
    }
}

impl Default for Buttons {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonBank for Buttons {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn is_pressed(&mut self, line: usize) -> Result<bool, HalError> {
        let pin = self.lines.get_mut(line).ok_or(HalError::InvalidConfig)?;
        pin.is_low().map_err(|_| HalError::GpioError)
    }
}

/// Route the button lines to EXTI on the press (falling) edge and unmask EXTI7_0
///
/// Release edges must not re-arm the debouncer: its scan would report every
/// button still held as a fresh press.
pub fn enable_button_interrupts() {
    modify_reg(AFIO_BASE + AFIO_EXTICR, |mut v| {
        for &pin in BUTTON_PINS.iter() {
            let shift = u32::from(pin) * 2;
            v = (v & !(0b11 << shift)) | (EXTICR_PORT_C << shift);
        }
        v
    });
    modify_reg(EXTI_BASE + EXTI_FTENR, |v| v | BUTTON_LINE_MASK);
    write_reg(EXTI_BASE + EXTI_INTFR, BUTTON_LINE_MASK);
    modify_reg(EXTI_BASE + EXTI_INTENR, |v| v | BUTTON_LINE_MASK);
    enable_irq(IRQ_EXTI7_0);
}

/// Read and clear the pending EXTI flags in `mask` (interrupt context)
pub fn take_exti_pending(mask: u32) -> u32 {
    let pending = read_reg(EXTI_BASE + EXTI_INTFR) & mask;
    if pending != 0 {
        write_reg(EXTI_BASE + EXTI_INTFR, pending);
    }
    pending
}

fn enable_irq(irq: u32) {
    write_reg(PFIC_BASE + PFIC_IENR1 + (irq / 32) * 4, 1 << (irq % 32));
}

/// Core SysTick as the tick source
pub struct SysTickTimer {
    hclk_hz: u32,
}

impl SysTickTimer {
    pub const fn new(hclk_hz: u32) -> Self {
        Self { hclk_hz }
    }

    /// Clear the compare flag (SysTick handler only)
    pub fn acknowledge() {
        write_reg(STK_BASE + STK_SR, 0);
    }
}

impl TickTimer for SysTickTimer {
    fn start(&mut self, period_us: u32) -> Result<(), HalError> {
        let reload = timer_reload(self.hclk_hz, period_us)?;

        write_reg(STK_BASE + STK_CTLR, 0);
        write_reg(STK_BASE + STK_CNTL, 0);
        write_reg(STK_BASE + STK_CMPLR, reload);
        write_reg(STK_BASE + STK_SR, 0);
        write_reg(
            STK_BASE + STK_CTLR,
            STK_STE | STK_STIE | STK_STCLK_HCLK | STK_STRE,
        );
        enable_irq(IRQ_SYSTICK);
        Ok(())
    }
}

/// Park the core after an unrecoverable start-up error
pub fn halt() -> ! {
    loop {
        unsafe { riscv::asm::wfi() };
    }
}
