//! Tremolo - Timed feedback patterns on embassy
//!
//! Runtime half of the feedback scheduler. Wires the clock-free sweep logic
//! from `tremolo-core` to embassy timers and signals:
//!
//! - [`pulser::run`] drives one pattern set with an interruptible wait and
//!   switches every touched channel off when it ends, however it ends
//! - [`FeedbackRegistry`] holds one pulser slot per output kind
//! - [`Controller`] serializes requests per kind with cancel-and-wait
//! - [`tasks`] has the long-running pulser and listener loops
//!
//! Everything is generic over the embassy `RawMutex`, so firmware can share
//! the registry between executors with `CriticalSectionRawMutex` while
//! single-executor builds use `NoopRawMutex`. Board crates wrap the loops in
//! their own `#[embassy_executor::task]` functions.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod error;
pub mod pulser;
pub mod registry;
pub mod tasks;

pub use controller::Controller;
pub use error::ControlError;
pub use pulser::{Completion, Outcome, SharedActuator};
pub use registry::{FeedbackRegistry, PulserSlot};
