//! Wire encoding for control messages
//!
//! Messages are postcard-encoded. The enum tag selects the output kind.

use serde::{Deserialize, Serialize};

use crate::control::{LedControl, RumbleControl, MAX_LED_COUNT, MAX_PULSE_PATTERN_LEN};

/// Upper bound on an encoded message
///
/// Tag, LED switch array, and one full pattern per LED with varint
/// headers.
pub const MAX_MESSAGE_SIZE: usize =
    1 + (1 + MAX_LED_COUNT) + 1 + MAX_LED_COUNT * (1 + 5 + 1 + MAX_PULSE_PATTERN_LEN * 4);

/// Errors that can occur while encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Output buffer too small
    BufferTooSmall,
    /// Input bytes are not a valid message
    InvalidMessage,
}

/// Any inbound feedback request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMessage {
    Rumble(RumbleControl),
    Leds(LedControl),
}

impl ControlMessage {
    /// Encode into `buffer`, returning the used prefix
    pub fn encode<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], CodecError> {
        postcard::to_slice(self, buffer).map_err(|e| match e {
            postcard::Error::SerializeBufferFull => CodecError::BufferTooSmall,
            _ => CodecError::InvalidMessage,
        })
    }

    /// Decode a message from bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        postcard::from_bytes(bytes).map_err(|_| CodecError::InvalidMessage)
    }
}

impl From<RumbleControl> for ControlMessage {
    fn from(control: RumbleControl) -> Self {
        ControlMessage::Rumble(control)
    }
}

impl From<LedControl> for ControlMessage {
    fn from(control: LedControl) -> Self {
        ControlMessage::Leds(control)
    }
}
