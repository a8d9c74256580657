//! Feedback control messages
//!
//! This crate defines the messages a bus listener hands to the feedback
//! node: rumble requests and LED requests. Each output can be switched
//! directly or driven by a timed on/off pattern.
//!
//! # Message Overview
//!
//! ```text
//! ControlMessage
//! ├── Rumble(RumbleControl)
//! │   └── rumble: TimedSwitch { switch_mode, num_cycles, pulse_pattern[] }
//! └── Leds(LedControl)
//!     ├── switch_array[]        (direct set, or sentinel -1 in slot 0)
//!     └── timed_switch_array[]  (one TimedSwitch per LED)
//! ```
//!
//! On the wire, messages are postcard-encoded.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod control;

pub use codec::{CodecError, ControlMessage, MAX_MESSAGE_SIZE};
pub use control::{
    LedControl, RumbleControl, TimedSwitch, LED_PATTERN_SENTINEL, MAX_LED_COUNT,
    MAX_PULSE_PATTERN_LEN, NO_CHANGE, SWITCH_OFF, SWITCH_ON, SWITCH_PULSE_PATTERN,
};
