//! Frame receiver (display node)

use embedded_hal::digital::InputPin;

use super::frame::{Frame, FrameParser};
use super::LinkError;
use crate::hal::HalError;
use crate::scheduler::{BusyWait, IdleWork, WaitOutcome};
use crate::tick::TickSource;

/// Samples the CLOCK and DATA lines driven by the input node
///
/// Bits are sampled after the rising clock edge and committed on the falling
/// edge, so sampling always happens strictly between edges. The decoder does
/// not resynchronise mid-byte: a misaligned start shows up as a bad start
/// marker and the frame is dropped.
pub struct LinkDecoder<CLK, DATA> {
    clock: CLK,
    data: DATA,
    edge_timeout: Option<u32>,
    parser: FrameParser,
}

impl<CLK, DATA> LinkDecoder<CLK, DATA>
where
    CLK: InputPin,
    DATA: InputPin,
{
    /// `edge_timeout` bounds every wait for a clock edge; `None` waits forever.
    pub fn new(clock: CLK, data: DATA, edge_timeout: Option<u32>) -> Self {
        Self {
            clock,
            data,
            edge_timeout,
            parser: FrameParser::new(),
        }
    }

    /// Read one byte, most significant bit first
    pub fn read_byte<C, I>(&mut self, scheduler: &BusyWait<C>, idle: &mut I) -> Result<u8, LinkError>
    where
        C: TickSource,
        I: IdleWork,
    {
        self.read_byte_inner(scheduler, idle, false)
    }

    /// Receive and validate one frame.
    ///
    /// Returns [`LinkError::Idle`] when no clock edge arrives before the
    /// first bit; every other error means a frame was started and dropped.
    pub fn receive_frame<C, I>(
        &mut self,
        scheduler: &BusyWait<C>,
        idle: &mut I,
    ) -> Result<Frame, LinkError>
    where
        C: TickSource,
        I: IdleWork,
    {
        self.parser.reset();

        let first = self.read_byte_inner(scheduler, idle, true)?;
        if let Some(frame) = self.parser.feed(first)? {
            return Ok(frame);
        }
        loop {
            let byte = match self.read_byte_inner(scheduler, idle, false) {
                Ok(byte) => byte,
                Err(error) => {
                    self.parser.reset();
                    return Err(error);
                }
            };
            if let Some(frame) = self.parser.feed(byte)? {
                trace!("link: received frame len={}", frame.payload().len());
                return Ok(frame);
            }
        }
    }

    pub fn release(self) -> (CLK, DATA) {
        (self.clock, self.data)
    }

    fn read_byte_inner<C, I>(
        &mut self,
        scheduler: &BusyWait<C>,
        idle: &mut I,
        awaiting_frame: bool,
    ) -> Result<u8, LinkError>
    where
        C: TickSource,
        I: IdleWork,
    {
        let mut byte = 0u8;
        for bit in 0..8 {
            if !self.wait_clock(scheduler, idle, true)? {
                return Err(if awaiting_frame && bit == 0 {
                    LinkError::Idle
                } else {
                    LinkError::EdgeTimeout
                });
            }
            let level = self.data.is_high().map_err(|_| HalError::GpioError)?;
            if !self.wait_clock(scheduler, idle, false)? {
                return Err(LinkError::EdgeTimeout);
            }
            byte = (byte << 1) | level as u8;
        }
        Ok(byte)
    }

    /// Wait for CLOCK to reach `high`; `Ok(false)` on timeout
    fn wait_clock<C, I>(
        &mut self,
        scheduler: &BusyWait<C>,
        idle: &mut I,
        high: bool,
    ) -> Result<bool, LinkError>
    where
        C: TickSource,
        I: IdleWork,
    {
        let clock = &mut self.clock;
        let outcome = scheduler.wait_for(self.edge_timeout, idle, || {
            clock
                .is_high()
                .map(|level| level == high)
                .map_err(|_| HalError::GpioError)
        })?;
        Ok(matches!(outcome, WaitOutcome::Ready(_)))
    }
}
