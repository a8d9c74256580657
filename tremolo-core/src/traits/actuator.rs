//! Feedback actuator trait
//!
//! A handheld motion controller exposes two kinds of binary feedback
//! outputs: a single vibration (rumble) motor and a small row of status
//! LEDs. The device driver owns their current state; the scheduler only
//! reads it back for flip computation.

/// Maximum number of status LEDs on a device
pub const MAX_LEDS: usize = 4;

/// Per-LED write request: `Some(state)` to switch, `None` to leave unchanged
pub type LedMask = [Option<bool>; MAX_LEDS];

/// Current on/off state of every LED
pub type LedStates = [bool; MAX_LEDS];

/// Kind of feedback output
///
/// Each kind has its own independent scheduler slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputKind {
    /// Vibration motor (one channel)
    Rumble,
    /// Status LEDs (one channel per LED)
    Led,
}

impl OutputKind {
    /// All output kinds, in registry order
    pub const ALL: [OutputKind; 2] = [OutputKind::Rumble, OutputKind::Led];

    /// Index of this kind in per-kind tables
    pub const fn index(self) -> usize {
        match self {
            OutputKind::Rumble => 0,
            OutputKind::Led => 1,
        }
    }
}

/// Errors reported by the device driver when writing outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Device is no longer connected
    Disconnected,
    /// Output report could not be written
    WriteFailed,
}

/// Device driver for the feedback outputs
///
/// Shared by every scheduler and the controller. Writes are fallible and
/// never retried by the caller; reads return the last state the device
/// accepted.
pub trait Actuator {
    /// Switch the rumble motor on or off
    fn set_rumble(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Current rumble motor state
    fn rumble(&self) -> bool;

    /// Switch LEDs; `None` entries leave the respective LED unchanged
    fn set_leds(&mut self, leds: LedMask) -> Result<(), ActuatorError>;

    /// Current LED states
    fn leds(&self) -> LedStates;
}
