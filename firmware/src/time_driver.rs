//! System tick, embassy time driver and critical section for the CH32V003
//!
//! [`TICKS`] is advanced by the SysTick handler of whichever node binary is
//! linked. The embassy driver reads the same counter, so `embassy_time`
//! instants and the core's [`Tick`]s share one time base.

use embassy_time_driver::{AlarmHandle, Driver};
use morselink_core::{Tick, TickCounter, TickSource, TICK_PERIOD_US};
use portable_atomic::{AtomicU32, Ordering};

/// The tick counter shared by the main loop and the interrupts
pub static TICKS: TickCounter = TickCounter::new();

/// Number of times [`TICKS`] has wrapped, for the 64-bit embassy clock
static EPOCHS: AtomicU32 = AtomicU32::new(0);

const _: () = assert!(
    embassy_time_driver::TICK_HZ == 1_000_000 / TICK_PERIOD_US as u64,
    "embassy tick rate must match the system tick"
);

/// Advance the system tick (SysTick handler only)
#[inline]
pub fn on_systick() -> Tick {
    crate::board::SysTickTimer::acknowledge();
    let now = TICKS.on_interrupt();
    if now == Tick::ZERO {
        EPOCHS.store(EPOCHS.load(Ordering::Relaxed).wrapping_add(1), Ordering::Release);
    }
    now
}

/// Embassy time driver backed by [`TICKS`]
///
/// Alarms are not supported: nothing here awaits timers, embassy time is only
/// used for instants and durations.
pub struct TickDriver;

impl Driver for TickDriver {
    fn now(&self) -> u64 {
        // SysTick cannot run between the two reads
        critical_section::with(|_| {
            let epochs = EPOCHS.load(Ordering::Acquire);
            (u64::from(epochs) << 32) | u64::from(TICKS.now().raw())
        })
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        None
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, _callback: fn(*mut ()), _ctx: *mut ()) {}

    fn set_alarm(&self, _alarm: AlarmHandle, _timestamp: u64) -> bool {
        false
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: TickDriver = TickDriver);

// Critical section implementation for single-core RISC-V
critical_section::set_impl!(RiscvCriticalSection);

struct RiscvCriticalSection;

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> u8 {
        let mut mstatus: usize;
        core::arch::asm!("csrrci {}, mstatus, 8", out(reg) mstatus);
        (mstatus & 8) as u8
    }

    unsafe fn release(was_active: u8) {
        if was_active != 0 {
            core::arch::asm!("csrsi mstatus, 8");
        }
    }
}
