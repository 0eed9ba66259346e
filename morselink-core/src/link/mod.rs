//! Bit-banged two-wire link
//!
//! The input node always drives CLOCK and DATA, the display node always
//! reads them. Each byte is eight clock pulses, most significant bit first,
//! with DATA valid while CLOCK is high. Bytes are grouped into frames:
//!
//! ```text
//! 0xAA | length (0..=64) | payload[length] | checksum | 0x55
//! ```
//!
//! `checksum = (length + sum(payload)) mod 256`. The sum detects every
//! single-byte corruption but not compensating two-byte changes or
//! reordering; it is kept as is for wire compatibility.

pub mod frame;
pub mod encoder;
pub mod decoder;

pub use frame::{checksum, Frame, FrameParser, END_MARKER, MAX_FRAME_LEN, MAX_PAYLOAD, START_MARKER};
pub use encoder::LinkEncoder;
pub use decoder::LinkDecoder;

use crate::hal::HalError;

/// Link-layer errors; none of them is fatal
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// No clock activity before the first bit of a frame
    Idle,
    /// First byte was not the start marker; frame aborted
    BadStartMarker(u8),
    /// Length byte above the payload limit; frame aborted
    LengthOutOfRange(u8),
    /// Checksum did not match after a full read
    ChecksumMismatch { computed: u8, received: u8 },
    /// Trailing byte was not the end marker
    BadEndMarker(u8),
    /// Clock stopped mid-frame
    EdgeTimeout,
    /// Payload too long to frame
    PayloadTooLarge,
    /// Pin access failed
    Hal(HalError),
}

impl LinkError {
    /// Errors after which the frame was discarded as a unit
    pub const fn is_discarded_frame(&self) -> bool {
        matches!(
            self,
            LinkError::BadStartMarker(_)
                | LinkError::LengthOutOfRange(_)
                | LinkError::ChecksumMismatch { .. }
                | LinkError::BadEndMarker(_)
                | LinkError::EdgeTimeout
        )
    }
}

impl From<HalError> for LinkError {
    fn from(error: HalError) -> Self {
        LinkError::Hal(error)
    }
}

#[cfg(feature = "std")]
impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinkError::Idle => write!(f, "no link activity"),
            LinkError::BadStartMarker(byte) => write!(f, "bad start marker 0x{byte:02X}"),
            LinkError::LengthOutOfRange(len) => write!(f, "frame length {len} out of range"),
            LinkError::ChecksumMismatch { computed, received } => write!(
                f,
                "checksum mismatch: computed 0x{computed:02X}, received 0x{received:02X}"
            ),
            LinkError::BadEndMarker(byte) => write!(f, "bad end marker 0x{byte:02X}"),
            LinkError::EdgeTimeout => write!(f, "clock stopped mid-frame"),
            LinkError::PayloadTooLarge => write!(f, "payload exceeds {MAX_PAYLOAD} bytes"),
            LinkError::Hal(error) => write!(f, "link pin error: {error}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinkError {}
