//! Rumble and LED control messages

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Switch the output on
pub const SWITCH_ON: i8 = 1;
/// Switch the output off
pub const SWITCH_OFF: i8 = 0;
/// Run `pulse_pattern` for `num_cycles` repeats
pub const SWITCH_PULSE_PATTERN: i8 = -1;
/// Leave the output as it is
pub const NO_CHANGE: i8 = -2;

/// First `switch_array` value selecting `timed_switch_array` instead
pub const LED_PATTERN_SENTINEL: i8 = -1;

/// Maximum durations in one pulse pattern
pub const MAX_PULSE_PATTERN_LEN: usize = 32;

/// Maximum LEDs addressed by one message
pub const MAX_LED_COUNT: usize = 4;

/// On/off instruction for one output
///
/// `pulse_pattern` holds alternating ON/OFF durations in seconds, starting
/// with ON. It is only read when `switch_mode` is [`SWITCH_PULSE_PATTERN`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedSwitch {
    /// One of the `SWITCH_*` constants or [`NO_CHANGE`]
    pub switch_mode: i8,
    /// Number of times to run the pattern
    pub num_cycles: i32,
    /// Durations in seconds
    pub pulse_pattern: Vec<f32, MAX_PULSE_PATTERN_LEN>,
}

impl TimedSwitch {
    /// Switch without a pattern
    pub fn switch(on: bool) -> Self {
        Self {
            switch_mode: if on { SWITCH_ON } else { SWITCH_OFF },
            num_cycles: 0,
            pulse_pattern: Vec::new(),
        }
    }

    /// Leave the output unchanged
    pub fn no_change() -> Self {
        Self {
            switch_mode: NO_CHANGE,
            num_cycles: 0,
            pulse_pattern: Vec::new(),
        }
    }

    /// Run a pulse pattern
    ///
    /// Durations past [`MAX_PULSE_PATTERN_LEN`] are dropped.
    pub fn pulse(pattern: &[f32], num_cycles: i32) -> Self {
        let len = pattern.len().min(MAX_PULSE_PATTERN_LEN);
        let mut pulse_pattern = Vec::new();
        let _ = pulse_pattern.extend_from_slice(&pattern[..len]);
        Self {
            switch_mode: SWITCH_PULSE_PATTERN,
            num_cycles,
            pulse_pattern,
        }
    }
}

/// Rumble (vibration motor) request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RumbleControl {
    pub rumble: TimedSwitch,
}

impl RumbleControl {
    /// Switch the motor on until told otherwise
    pub fn on() -> Self {
        Self {
            rumble: TimedSwitch::switch(true),
        }
    }

    /// Switch the motor off
    pub fn off() -> Self {
        Self {
            rumble: TimedSwitch::switch(false),
        }
    }

    /// Pulse the motor
    pub fn pulse(pattern: &[f32], num_cycles: i32) -> Self {
        Self {
            rumble: TimedSwitch::pulse(pattern, num_cycles),
        }
    }
}

/// Status LED request
///
/// If `switch_array[0]` is [`LED_PATTERN_SENTINEL`], each LED follows its
/// entry in `timed_switch_array`. Otherwise `switch_array` holds one of
/// [`SWITCH_ON`], [`SWITCH_OFF`] or [`NO_CHANGE`] per LED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedControl {
    pub switch_array: Vec<i8, MAX_LED_COUNT>,
    pub timed_switch_array: Vec<TimedSwitch, MAX_LED_COUNT>,
}

impl LedControl {
    /// Set LEDs directly (`None` leaves an LED unchanged)
    pub fn switch(states: &[Option<bool>]) -> Self {
        let switch_array = states
            .iter()
            .take(MAX_LED_COUNT)
            .map(|state| match state {
                Some(true) => SWITCH_ON,
                Some(false) => SWITCH_OFF,
                None => NO_CHANGE,
            })
            .collect();
        Self {
            switch_array,
            timed_switch_array: Vec::new(),
        }
    }

    /// Drive LEDs from per-LED timed switches
    pub fn timed(switches: &[TimedSwitch]) -> Self {
        let mut switch_array = Vec::new();
        let _ = switch_array.push(LED_PATTERN_SENTINEL);
        let timed_switch_array = switches.iter().take(MAX_LED_COUNT).cloned().collect();
        Self {
            switch_array,
            timed_switch_array,
        }
    }

    /// Check if this request carries timed patterns
    pub fn is_timed(&self) -> bool {
        self.switch_array.first() == Some(&LED_PATTERN_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_truncates_long_patterns() {
        let pattern = [0.1f32; MAX_PULSE_PATTERN_LEN + 4];
        let switch = TimedSwitch::pulse(&pattern, 2);
        assert_eq!(switch.switch_mode, SWITCH_PULSE_PATTERN);
        assert_eq!(switch.num_cycles, 2);
        assert_eq!(switch.pulse_pattern.len(), MAX_PULSE_PATTERN_LEN);
    }

    #[test]
    fn test_led_switch_encoding() {
        let control = LedControl::switch(&[Some(true), None, Some(false)]);
        assert_eq!(&control.switch_array[..], &[SWITCH_ON, NO_CHANGE, SWITCH_OFF]);
        assert!(!control.is_timed());
    }

    #[test]
    fn test_led_timed_sets_sentinel() {
        let control = LedControl::timed(&[TimedSwitch::pulse(&[0.2], 1), TimedSwitch::no_change()]);
        assert!(control.is_timed());
        assert_eq!(control.timed_switch_array.len(), 2);
    }

    #[test]
    fn test_rumble_constructors() {
        assert_eq!(RumbleControl::on().rumble.switch_mode, SWITCH_ON);
        assert_eq!(RumbleControl::off().rumble.switch_mode, SWITCH_OFF);
        let pulse = RumbleControl::pulse(&[0.5, 0.5], 2);
        assert_eq!(&pulse.rumble.pulse_pattern[..], &[0.5, 0.5]);
    }
}
