//! ASCII command vocabulary carried in frame payloads

/// Clears the sequence on the input node; clears SOS and undo state on the display
pub const RESET_TEXT: &str = "RST";
/// Explicit undo
pub const UNDO_TEXT: &str = "UNDO";
/// Delayed SOS alarm
pub const SOS_TEXT: &str = "SOS!!!";
/// Sent when a sequence is dropped for inactivity
pub const CLEARED_TEXT: &str = "Cleared Sequence";
/// Sent when the sequence has no phrase
pub const NO_MATCH_TEXT: &str = "No match found";

/// A payload classified against the command vocabulary
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    Reset,
    Undo,
    Sos,
    Cleared,
    NoMatch,
    /// Any other text, normally a looked-up phrase
    Phrase(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a received payload by exact match
    pub fn parse(text: &'a str) -> Self {
        match text {
            RESET_TEXT => Command::Reset,
            UNDO_TEXT => Command::Undo,
            SOS_TEXT => Command::Sos,
            CLEARED_TEXT => Command::Cleared,
            NO_MATCH_TEXT => Command::NoMatch,
            phrase => Command::Phrase(phrase),
        }
    }

    /// Payload text to transmit
    pub fn as_text(&self) -> &'a str {
        match *self {
            Command::Reset => RESET_TEXT,
            Command::Undo => UNDO_TEXT,
            Command::Sos => SOS_TEXT,
            Command::Cleared => CLEARED_TEXT,
            Command::NoMatch => NO_MATCH_TEXT,
            Command::Phrase(text) => text,
        }
    }
}
