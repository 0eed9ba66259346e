//! Open-loop frame transmitter (input node)

use embedded_hal::digital::OutputPin;

use super::frame::{END_MARKER, MAX_PAYLOAD, START_MARKER};
use super::LinkError;
use crate::hal::HalError;
use crate::scheduler::{BusyWait, IdleWork};
use crate::tick::TickSource;

/// Drives the CLOCK and DATA lines
///
/// There is no acknowledgement: a frame counts as sent once every byte has
/// been clocked out, whatever the receiver did with it.
pub struct LinkEncoder<CLK, DATA> {
    clock: CLK,
    data: DATA,
    bit_ticks: u32,
}

impl<CLK, DATA> LinkEncoder<CLK, DATA>
where
    CLK: OutputPin,
    DATA: OutputPin,
{
    pub fn new(clock: CLK, data: DATA, bit_ticks: u32) -> Self {
        Self {
            clock,
            data,
            bit_ticks,
        }
    }

    /// Park both lines low
    pub fn idle_lines(&mut self) -> Result<(), HalError> {
        self.clock.set_low().map_err(|_| HalError::GpioError)?;
        self.data.set_low().map_err(|_| HalError::GpioError)
    }

    /// Clock out one byte, most significant bit first
    pub fn send_byte<C, I>(
        &mut self,
        scheduler: &BusyWait<C>,
        idle: &mut I,
        byte: u8,
    ) -> Result<(), HalError>
    where
        C: TickSource,
        I: IdleWork,
    {
        for bit in (0..8).rev() {
            if byte & (1 << bit) != 0 {
                self.data.set_high().map_err(|_| HalError::GpioError)?;
            } else {
                self.data.set_low().map_err(|_| HalError::GpioError)?;
            }
            self.clock.set_high().map_err(|_| HalError::GpioError)?;
            scheduler.wait_ticks(self.bit_ticks, idle);
            self.clock.set_low().map_err(|_| HalError::GpioError)?;
            scheduler.wait_ticks(self.bit_ticks, idle);
        }
        Ok(())
    }

    /// Send a complete frame around `payload`
    pub fn transmit_frame<C, I>(
        &mut self,
        scheduler: &BusyWait<C>,
        idle: &mut I,
        payload: &[u8],
    ) -> Result<(), LinkError>
    where
        C: TickSource,
        I: IdleWork,
    {
        if payload.len() > MAX_PAYLOAD {
            return Err(LinkError::PayloadTooLarge);
        }
        let length = payload.len() as u8;

        self.send_byte(scheduler, idle, START_MARKER)?;
        self.send_byte(scheduler, idle, length)?;
        let mut sum = length;
        for &byte in payload {
            self.send_byte(scheduler, idle, byte)?;
            sum = sum.wrapping_add(byte);
        }
        self.send_byte(scheduler, idle, sum)?;
        self.send_byte(scheduler, idle, END_MARKER)?;

        trace!("link: sent frame len={} checksum={=u8:#x}", length, sum);
        Ok(())
    }

    pub fn release(self) -> (CLK, DATA) {
        (self.clock, self.data)
    }
}
