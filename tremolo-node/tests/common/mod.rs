//! Shared test fixtures

#![allow(dead_code)]

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant};

use tremolo_core::traits::{Actuator, ActuatorError, LedMask, LedStates};
use tremolo_node::pulser::with_actuator;
use tremolo_node::SharedActuator;

/// Tolerance for real-time event checks
pub const SLACK: Duration = Duration::from_millis(40);

/// One accepted device write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Write {
    pub at: Instant,
    /// `None` for rumble, LED index otherwise
    pub led: Option<usize>,
    pub on: bool,
}

/// Device that records every accepted write
pub struct RecordingDevice {
    pub rumble: bool,
    pub leds: LedStates,
    pub writes: Vec<Write>,
    /// Write attempts so far, including failed ones
    pub attempts: usize,
    /// Attempts (0-based) that fail
    pub fail_on: Vec<usize>,
    /// Attempts from this one on report a lost device
    pub disconnect_at: Option<usize>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::with_leds([false; 4])
    }

    pub fn with_leds(leds: LedStates) -> Self {
        Self {
            rumble: false,
            leds,
            writes: Vec::new(),
            attempts: 0,
            fail_on: Vec::new(),
            disconnect_at: None,
        }
    }

    /// Fail the given write attempts
    pub fn failing(mut self, attempts: &[usize]) -> Self {
        self.fail_on = attempts.to_vec();
        self
    }

    /// Report a lost device from the given attempt on
    pub fn disconnecting(mut self, attempt: usize) -> Self {
        self.disconnect_at = Some(attempt);
        self
    }

    fn attempt(&mut self) -> Result<(), ActuatorError> {
        let n = self.attempts;
        self.attempts += 1;
        if self.disconnect_at.is_some_and(|at| n >= at) {
            Err(ActuatorError::Disconnected)
        } else if self.fail_on.contains(&n) {
            Err(ActuatorError::WriteFailed)
        } else {
            Ok(())
        }
    }
}

impl Actuator for RecordingDevice {
    fn set_rumble(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.attempt()?;
        self.rumble = on;
        self.writes.push(Write {
            at: Instant::now(),
            led: None,
            on,
        });
        Ok(())
    }

    fn rumble(&self) -> bool {
        self.rumble
    }

    fn set_leds(&mut self, leds: LedMask) -> Result<(), ActuatorError> {
        self.attempt()?;
        let at = Instant::now();
        for (index, state) in leds.iter().enumerate() {
            if let Some(on) = *state {
                self.leds[index] = on;
                self.writes.push(Write {
                    at,
                    led: Some(index),
                    on,
                });
            }
        }
        Ok(())
    }

    fn leds(&self) -> LedStates {
        self.leds
    }
}

pub type Device = SharedActuator<NoopRawMutex, RecordingDevice>;

pub fn device(inner: RecordingDevice) -> Device {
    Mutex::new(RefCell::new(inner))
}

/// Snapshot of the recorded writes
pub fn writes(device: &Device) -> Vec<Write> {
    with_actuator(device, |d| d.writes.clone())
}

pub fn rumble(device: &Device) -> bool {
    with_actuator(device, |d| d.rumble)
}

pub fn leds(device: &Device) -> LedStates {
    with_actuator(device, |d| d.leds)
}

/// Assert writes match `(offset_ms, led, on)` within [`SLACK`]
pub fn assert_writes(actual: &[Write], start: Instant, expected: &[(u64, Option<usize>, bool)]) {
    assert_eq!(actual.len(), expected.len(), "writes: {:?}", actual);
    for (write, (offset_ms, led, on)) in actual.iter().zip(expected.iter()) {
        let expected_at = start + Duration::from_millis(*offset_ms);
        let early = expected_at.checked_sub(SLACK).unwrap_or(start);
        assert!(
            write.at >= early && write.at <= expected_at + SLACK,
            "write {:?} expected at +{}ms, was at +{}ms",
            write,
            offset_ms,
            (write.at - start).as_millis()
        );
        assert_eq!(write.led, *led, "write {:?}", write);
        assert_eq!(write.on, *on, "write {:?}", write);
    }
}
