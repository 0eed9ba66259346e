//! Input node orchestration
//!
//! One call to [`InputNode::poll`] is one iteration of the cooperative main
//! loop: debounced button events first, then the sequence timeout, then the
//! SOS countdown. Every message leaves through the link encoder and blocks
//! until the last bit is clocked out.

use embedded_hal::digital::OutputPin;

use crate::command::Command;
use crate::config::TimingConfig;
use crate::debounce::{DebouncedInputReader, EdgeLatch};
use crate::hal::ButtonBank;
use crate::link::{LinkEncoder, LinkError};
use crate::scheduler::{BusyWait, NoIdle};
use crate::sequence::SequenceInterpreter;
use crate::services::PhraseTable;
use crate::sos::{SosArming, SosPress};
use crate::tick::{Tick, TickSource};
use crate::types::{ButtonMap, ButtonRole, SosState};

pub struct InputNode<'a, C, CLK, DATA, B, T> {
    scheduler: BusyWait<C>,
    encoder: LinkEncoder<CLK, DATA>,
    buttons: B,
    map: ButtonMap,
    latch: &'a EdgeLatch,
    reader: DebouncedInputReader,
    sequence: SequenceInterpreter,
    sos: SosArming,
    phrases: T,
}

impl<'a, C, CLK, DATA, B, T> InputNode<'a, C, CLK, DATA, B, T>
where
    C: TickSource,
    CLK: OutputPin,
    DATA: OutputPin,
    B: ButtonBank,
    T: PhraseTable,
{
    pub fn new(
        scheduler: BusyWait<C>,
        encoder: LinkEncoder<CLK, DATA>,
        buttons: B,
        map: ButtonMap,
        latch: &'a EdgeLatch,
        phrases: T,
        config: &TimingConfig,
    ) -> Self {
        Self {
            scheduler,
            encoder,
            buttons,
            map,
            latch,
            reader: DebouncedInputReader::new(config.debounce),
            sequence: SequenceInterpreter::new(config.sequence_timeout),
            sos: SosArming::new(config.sos_delay),
            phrases,
        }
    }

    /// Park the link lines before the first poll
    pub fn start(&mut self) -> Result<(), LinkError> {
        self.encoder.idle_lines()?;
        info!("input node: ready");
        Ok(())
    }

    /// Run one main-loop iteration
    pub fn poll(&mut self) -> Result<(), LinkError> {
        let now = self.scheduler.now();
        let events = self
            .reader
            .poll(self.latch, &mut self.buttons, &self.map, now)?;
        for role in events {
            self.on_press(role, now)?;
        }

        let now = self.scheduler.now();
        if let Some(command) = self.sequence.check_timeout(now) {
            self.send(command)?;
        }
        if self.sos.check(now) {
            info!("input node: SOS delay expired");
            self.send(Command::Sos)?;
        }
        Ok(())
    }

    fn on_press(&mut self, role: ButtonRole, now: Tick) -> Result<(), LinkError> {
        match role {
            ButtonRole::Dot | ButtonRole::Dash => {
                if let Some(symbol) = role.symbol() {
                    self.sequence.on_symbol(symbol, now);
                }
                Ok(())
            }
            ButtonRole::Send => {
                let command = self.sequence.on_send(&self.phrases);
                transmit(&mut self.encoder, &self.scheduler, command)
            }
            ButtonRole::Undo => {
                let command = self.sequence.on_undo();
                self.send(command)
            }
            ButtonRole::Sos => {
                match self.sos.press(now) {
                    SosPress::Armed => info!("input node: SOS armed"),
                    SosPress::Cancelled => info!("input node: SOS cancelled"),
                }
                Ok(())
            }
            ButtonRole::Reset => {
                let command = self.sequence.on_reset();
                self.send(command)
            }
        }
    }

    fn send(&mut self, command: Command<'_>) -> Result<(), LinkError> {
        transmit(&mut self.encoder, &self.scheduler, command)
    }

    /// Symbols entered so far
    pub fn sequence(&self) -> &str {
        self.sequence.sequence()
    }

    pub fn sos_state(&self) -> SosState {
        self.sos.state()
    }

    pub fn scheduler(&self) -> &BusyWait<C> {
        &self.scheduler
    }
}

fn transmit<C, CLK, DATA>(
    encoder: &mut LinkEncoder<CLK, DATA>,
    scheduler: &BusyWait<C>,
    command: Command<'_>,
) -> Result<(), LinkError>
where
    C: TickSource,
    CLK: OutputPin,
    DATA: OutputPin,
{
    let text = command.as_text();
    info!("input node: sending {}", text);
    encoder.transmit_frame(scheduler, &mut NoIdle, text.as_bytes())
}
