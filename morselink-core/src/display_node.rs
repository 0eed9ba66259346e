//! Display node orchestration
//!
//! The main loop listens on the link, classifies each accepted payload and
//! updates the screen, the shared SOS alarm and the undo indicator. The
//! siren and SOS indicator are not driven here: the tick interrupt services
//! them from the [`SharedAlarm`].

use embedded_hal::digital::{InputPin, OutputPin};

use crate::alarm::SharedAlarm;
use crate::command::{Command, UNDO_TEXT};
use crate::config::TimingConfig;
use crate::hal::{HalError, Indicator};
use crate::link::{Frame, LinkDecoder, LinkError};
use crate::scheduler::BusyWait;
use crate::services::Screen;
use crate::tick::{Tick, TickSource};
use crate::types::SosState;
use crate::undo::UndoIndicator;

/// Outcome of one listening pass
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent {
    /// No traffic before the edge timeout
    Idle,
    /// A frame was started but discarded
    Dropped(LinkError),
    /// `"RST"`: alarm cleared, undo state cleared, screen blank
    Reset,
    /// `"SOS!!!"` raised the alarm
    SosRaised,
    /// `"UNDO"` logged and shown
    Undo,
    /// Message rendered, held and cleared
    Shown,
    /// Accepted frame with no effect (alarm active, or not text)
    Ignored,
}

pub struct DisplayNode<'a, C, CLK, DATA, LED, S> {
    scheduler: BusyWait<C>,
    decoder: LinkDecoder<CLK, DATA>,
    alarm: &'a SharedAlarm,
    undo: UndoIndicator<LED>,
    screen: S,
    display_hold: u32,
}

impl<'a, C, CLK, DATA, LED, S> DisplayNode<'a, C, CLK, DATA, LED, S>
where
    C: TickSource,
    CLK: InputPin,
    DATA: InputPin,
    LED: OutputPin,
    S: Screen,
{
    pub fn new(
        scheduler: BusyWait<C>,
        decoder: LinkDecoder<CLK, DATA>,
        alarm: &'a SharedAlarm,
        undo_led: Indicator<LED>,
        screen: S,
        config: &TimingConfig,
    ) -> Self {
        Self {
            scheduler,
            decoder,
            alarm,
            undo: UndoIndicator::new(undo_led, config.undo),
            screen,
            display_hold: config.display_hold,
        }
    }

    /// Blank the screen and turn the undo indicator off
    pub fn start(&mut self) -> Result<(), HalError> {
        self.undo.force_off()?;
        self.screen.clear()?;
        info!("display node: listening");
        Ok(())
    }

    /// Listen for one frame and act on it
    pub fn poll(&mut self) -> Result<DisplayEvent, HalError> {
        self.undo.maintain(self.scheduler.now())?;

        let mut fault = None;
        let undo = &mut self.undo;
        let received = self.decoder.receive_frame(&self.scheduler, &mut |now: Tick| {
            if let Err(error) = undo.maintain(now) {
                fault = Some(error);
            }
        });

        // A validated frame is acted on even if the indicator faulted meanwhile
        let event = match received {
            Ok(frame) => self.on_frame(&frame)?,
            Err(LinkError::Idle) => DisplayEvent::Idle,
            Err(LinkError::Hal(error)) => return Err(error),
            Err(error) => {
                warn!("display node: frame dropped: {}", error);
                DisplayEvent::Dropped(error)
            }
        };
        match fault {
            Some(error) => Err(error),
            None => Ok(event),
        }
    }

    fn on_frame(&mut self, frame: &Frame) -> Result<DisplayEvent, HalError> {
        let Some(text) = frame.text() else {
            warn!("display node: payload is not text");
            return Ok(DisplayEvent::Ignored);
        };
        let now = self.scheduler.now();

        match Command::parse(text) {
            Command::Reset => {
                info!("display node: reset");
                self.alarm.clear();
                self.undo.force_off()?;
                self.screen.clear()?;
                Ok(DisplayEvent::Reset)
            }
            _ if self.alarm.is_active() => {
                debug!("display node: SOS active, ignoring {}", text);
                Ok(DisplayEvent::Ignored)
            }
            Command::Sos => {
                info!("display node: SOS");
                self.alarm.activate(now);
                self.screen.clear()?;
                Ok(DisplayEvent::SosRaised)
            }
            Command::Undo => {
                self.undo.record(now);
                self.undo.maintain(now)?;
                self.screen.render(UNDO_TEXT)?;
                Ok(DisplayEvent::Undo)
            }
            message => {
                info!("display node: showing {}", message.as_text());
                self.screen.render(message.as_text())?;
                self.hold()?;
                self.screen.clear()?;
                Ok(DisplayEvent::Shown)
            }
        }
    }

    /// Keep a message on screen with undo maintenance still running
    fn hold(&mut self) -> Result<(), HalError> {
        let mut fault = None;
        let undo = &mut self.undo;
        self.scheduler.wait_ticks(self.display_hold, &mut |now: Tick| {
            if let Err(error) = undo.maintain(now) {
                fault = Some(error);
            }
        });
        fault.map_or(Ok(()), Err)
    }

    pub fn sos_state(&self) -> SosState {
        self.alarm.state()
    }

    pub fn undo_lit(&self) -> bool {
        self.undo.is_lit()
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn scheduler(&self) -> &BusyWait<C> {
        &self.scheduler
    }
}
