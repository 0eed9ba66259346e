//! Text output for the display node
//!
//! The reference board has no LCD driver in this crate; messages go to the
//! debug log and the last rendered text is kept for inspection.

use heapless::String;
use morselink_core::{link::MAX_PAYLOAD, HalError, Screen};

#[derive(Default)]
pub struct LogScreen {
    current: String<MAX_PAYLOAD>,
}

impl LogScreen {
    pub const fn new() -> Self {
        Self {
            current: String::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }
}

impl Screen for LogScreen {
    fn render(&mut self, text: &str) -> Result<(), HalError> {
        self.current.clear();
        // Frame payloads never exceed MAX_PAYLOAD bytes
        self.current
            .push_str(text)
            .map_err(|_| HalError::InvalidConfig)?;
        info!("screen: {}", text);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HalError> {
        self.current.clear();
        debug!("screen: cleared");
        Ok(())
    }
}
