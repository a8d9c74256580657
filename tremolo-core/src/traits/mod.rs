//! Hardware abstraction traits
//!
//! These traits define the interface between the pattern scheduler
//! and the device driver that actually switches the outputs.

pub mod actuator;

pub use actuator::{Actuator, ActuatorError, LedMask, LedStates, OutputKind, MAX_LEDS};
