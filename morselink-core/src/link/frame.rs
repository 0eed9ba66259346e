//! Frame assembly and byte-fed validation

use heapless::Vec;

use super::LinkError;

/// Frame synchronization byte
pub const START_MARKER: u8 = 0xAA;

/// Frame trailer byte
pub const END_MARKER: u8 = 0x55;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD: usize = 64;

/// Maximum complete frame size (START + LENGTH + MAX_PAYLOAD + CHECKSUM + END)
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD + 4;

/// `(length + sum(payload)) mod 256`
pub fn checksum(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(payload.len() as u8, |sum, &byte| sum.wrapping_add(byte))
}

/// A validated payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Vec<u8, MAX_PAYLOAD>,
}

impl Frame {
    pub fn new(payload: &[u8]) -> Result<Self, LinkError> {
        let payload = Vec::from_slice(payload).map_err(|_| LinkError::PayloadTooLarge)?;
        Ok(Self { payload })
    }

    pub fn from_text(text: &str) -> Result<Self, LinkError> {
        Self::new(text.as_bytes())
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text, `None` if it is not UTF-8
    pub fn text(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }

    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// Full wire image of this frame
    pub fn encode(&self) -> Vec<u8, MAX_FRAME_LEN> {
        let mut bytes = Vec::new();
        // Capacity covers the largest payload, pushes cannot fail
        let _ = bytes.push(START_MARKER);
        let _ = bytes.push(self.payload.len() as u8);
        let _ = bytes.extend_from_slice(&self.payload);
        let _ = bytes.push(self.checksum());
        let _ = bytes.push(END_MARKER);
        bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForLength,
    ReadingPayload,
    WaitingForChecksum,
    WaitingForEnd { received_checksum: u8 },
}

/// State machine validating a frame one byte at a time
///
/// Any error resets the parser so the next byte is treated as a candidate
/// start marker; there is no partial recovery of a damaged frame.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    payload: Vec<u8, MAX_PAYLOAD>,
    expected_length: usize,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            payload: Vec::new(),
            expected_length: 0,
        }
    }

    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.payload.clear();
        self.expected_length = 0;
    }

    /// True when no frame is in progress
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForStart
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(Some(frame))` on a complete valid frame, `Ok(None)` when
    /// more bytes are needed, `Err` when the frame in progress is discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, LinkError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte != START_MARKER {
                    return Err(LinkError::BadStartMarker(byte));
                }
                self.state = ParseState::WaitingForLength;
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if byte as usize > MAX_PAYLOAD {
                    self.reset();
                    return Err(LinkError::LengthOutOfRange(byte));
                }
                self.expected_length = byte as usize;
                self.payload.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Bounded by expected_length <= MAX_PAYLOAD
                let _ = self.payload.push(byte);
                if self.payload.len() == self.expected_length {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                self.state = ParseState::WaitingForEnd {
                    received_checksum: byte,
                };
                Ok(None)
            }
            ParseState::WaitingForEnd { received_checksum } => {
                let computed = checksum(&self.payload);
                let result = if computed != received_checksum {
                    Err(LinkError::ChecksumMismatch {
                        computed,
                        received: received_checksum,
                    })
                } else if byte != END_MARKER {
                    Err(LinkError::BadEndMarker(byte))
                } else {
                    Ok(Some(Frame {
                        payload: self.payload.clone(),
                    }))
                };
                self.reset();
                result
            }
        }
    }

    /// Feed bytes until a frame completes or fails.
    ///
    /// Bytes after that point are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, LinkError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
