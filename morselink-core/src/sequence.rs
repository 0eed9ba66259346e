//! Symbol sequence accumulation and command selection (input node)

use heapless::String;

use crate::command::Command;
use crate::services::PhraseTable;
use crate::tick::Tick;
use crate::types::Symbol;

/// Longest sequence kept; later symbols are dropped
pub const MAX_SEQUENCE_LEN: usize = 16;

/// Symbols entered since the last send, undo, reset or timeout
pub type Sequence = String<MAX_SEQUENCE_LEN>;

/// Builds a sequence from symbol presses and decides what to transmit
#[derive(Debug, Clone)]
pub struct SequenceInterpreter {
    sequence: Sequence,
    last_input: Tick,
    timeout: u32,
}

impl SequenceInterpreter {
    /// `timeout` is the inactivity after which a pending sequence is dropped
    pub const fn new(timeout: u32) -> Self {
        Self {
            sequence: String::new(),
            last_input: Tick::ZERO,
            timeout,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Append a symbol and restart the inactivity timer
    pub fn on_symbol(&mut self, symbol: Symbol, now: Tick) {
        self.last_input = now;
        if self.sequence.push(symbol.as_char()).is_err() {
            warn!("sequence: full, symbol dropped");
            return;
        }
        debug!("sequence: {}", self.sequence.as_str());
    }

    /// Look the sequence up and clear it.
    ///
    /// An unknown or empty sequence yields [`Command::NoMatch`].
    pub fn on_send<'t, P>(&mut self, table: &'t P) -> Command<'t>
    where
        P: PhraseTable + ?Sized,
    {
        let command = match table.lookup(&self.sequence) {
            Some(phrase) => Command::Phrase(phrase),
            None => Command::NoMatch,
        };
        self.sequence.clear();
        command
    }

    pub fn on_undo(&mut self) -> Command<'static> {
        self.sequence.clear();
        Command::Undo
    }

    pub fn on_reset(&mut self) -> Command<'static> {
        self.sequence.clear();
        Command::Reset
    }

    /// Drop a stale sequence.
    ///
    /// Returns [`Command::Cleared`] once per abandoned sequence.
    pub fn check_timeout(&mut self, now: Tick) -> Option<Command<'static>> {
        if self.sequence.is_empty() || !now.has_elapsed(self.last_input, self.timeout) {
            return None;
        }
        debug!("sequence: timed out");
        self.sequence.clear();
        Some(Command::Cleared)
    }
}
