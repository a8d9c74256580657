//! Feedback requests
//!
//! Validates raw control messages at the boundary and turns them into
//! typed requests. A request that fails validation causes no state change.

use tremolo_protocol::{
    ControlMessage, LedControl, RumbleControl, TimedSwitch, NO_CHANGE, SWITCH_OFF, SWITCH_ON,
    SWITCH_PULSE_PATTERN,
};

use crate::pattern::{OutputPattern, PatternError, PatternSet};
use crate::traits::{LedMask, OutputKind, MAX_LEDS};

/// Reasons a request is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Unrecognized `switch_mode` value
    InvalidMode(i8),
    /// Negative repeat count
    InvalidRepeatCount(i32),
    /// Direct LED value other than on, off or no-change
    InvalidLedState(i8),
    /// LED request with an empty switch array
    EmptyLedRequest,
    /// Malformed pulse pattern
    Pattern(PatternError),
    /// Output kind is not fitted on this device
    Unsupported(OutputKind),
}

impl From<PatternError> for RequestError {
    fn from(e: PatternError) -> Self {
        RequestError::Pattern(e)
    }
}

/// Switch mode of a timed switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchMode {
    On,
    Off,
    PulsePattern,
}

impl SwitchMode {
    /// Parse a wire value
    pub fn from_raw(mode: i8) -> Result<Self, RequestError> {
        match mode {
            SWITCH_ON => Ok(SwitchMode::On),
            SWITCH_OFF => Ok(SwitchMode::Off),
            SWITCH_PULSE_PATTERN => Ok(SwitchMode::PulsePattern),
            other => Err(RequestError::InvalidMode(other)),
        }
    }
}

/// Parse a repeat count, rejecting negatives
fn repeat_count(num_cycles: i32) -> Result<u32, RequestError> {
    u32::try_from(num_cycles).map_err(|_| RequestError::InvalidRepeatCount(num_cycles))
}

/// Rumble motor request
#[derive(Debug, Clone, PartialEq)]
pub enum RumbleRequest {
    /// Switch on until told otherwise
    On,
    /// Switch off
    Off,
    /// Run a pattern
    Pulse(OutputPattern),
    /// Pattern with zero repeats: stop any running pattern, write nothing
    Cancel,
}

impl RumbleRequest {
    /// Validate a rumble control message
    pub fn from_control(control: &RumbleControl) -> Result<Self, RequestError> {
        let switch = &control.rumble;
        match SwitchMode::from_raw(switch.switch_mode)? {
            SwitchMode::On => Ok(RumbleRequest::On),
            SwitchMode::Off => Ok(RumbleRequest::Off),
            SwitchMode::PulsePattern => {
                let repeats = repeat_count(switch.num_cycles)?;
                if repeats == 0 {
                    return Ok(RumbleRequest::Cancel);
                }
                let pattern = OutputPattern::new(&switch.pulse_pattern, repeats)?;
                Ok(RumbleRequest::Pulse(pattern))
            }
        }
    }
}

/// Status LED request
#[derive(Debug, Clone, PartialEq)]
pub enum LedRequest {
    /// Set LEDs directly (`None` leaves an LED unchanged)
    Switch(LedMask),
    /// Drive LEDs from per-LED patterns
    Timed(PatternSet),
}

impl LedRequest {
    /// Validate an LED control message
    pub fn from_control(control: &LedControl) -> Result<Self, RequestError> {
        if control.is_timed() {
            let mut slots: heapless::Vec<Option<OutputPattern>, MAX_LEDS> = heapless::Vec::new();
            for switch in control.timed_switch_array.iter().take(MAX_LEDS) {
                let _ = slots.push(Self::timed_slot(switch)?);
            }
            return Ok(LedRequest::Timed(PatternSet::leds(slots)));
        }

        if control.switch_array.is_empty() {
            return Err(RequestError::EmptyLedRequest);
        }

        let mut mask: LedMask = [None; MAX_LEDS];
        for (slot, value) in mask.iter_mut().zip(control.switch_array.iter()) {
            *slot = match *value {
                SWITCH_ON => Some(true),
                SWITCH_OFF => Some(false),
                NO_CHANGE => None,
                other => return Err(RequestError::InvalidLedState(other)),
            };
        }
        Ok(LedRequest::Switch(mask))
    }

    /// Pattern for one LED, or `None` to leave it alone
    fn timed_slot(switch: &TimedSwitch) -> Result<Option<OutputPattern>, RequestError> {
        if switch.switch_mode == NO_CHANGE || switch.num_cycles == 0 {
            return Ok(None);
        }

        match SwitchMode::from_raw(switch.switch_mode)? {
            SwitchMode::PulsePattern => {
                let repeats = repeat_count(switch.num_cycles)?;
                Ok(Some(OutputPattern::new(&switch.pulse_pattern, repeats)?))
            }
            _ => Err(RequestError::InvalidMode(switch.switch_mode)),
        }
    }

    /// Restrict the request to the first `leds` LEDs
    ///
    /// Returns true if an entry that would have changed an LED was dropped.
    pub fn limit_to(&mut self, leds: usize) -> bool {
        match self {
            LedRequest::Switch(mask) => {
                let mut dropped = false;
                for slot in mask.iter_mut().skip(leds) {
                    dropped |= slot.is_some();
                    *slot = None;
                }
                dropped
            }
            LedRequest::Timed(set) => set.truncate(leds),
        }
    }
}

/// Any validated feedback request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Rumble(RumbleRequest),
    Leds(LedRequest),
}

impl Request {
    /// Validate a control message
    pub fn from_message(message: &ControlMessage) -> Result<Self, RequestError> {
        match message {
            ControlMessage::Rumble(control) => {
                RumbleRequest::from_control(control).map(Request::Rumble)
            }
            ControlMessage::Leds(control) => LedRequest::from_control(control).map(Request::Leds),
        }
    }

    /// Output kind this request targets
    pub fn kind(&self) -> OutputKind {
        match self {
            Request::Rumble(_) => OutputKind::Rumble,
            Request::Leds(_) => OutputKind::Led,
        }
    }
}
