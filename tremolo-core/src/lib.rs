//! Board-agnostic core logic for Tremolo feedback outputs
//!
//! This crate contains everything about timed feedback patterns that does
//! not depend on a clock or an executor:
//!
//! - Output patterns (per-channel on/off timing programs)
//! - Pattern sets (one optional pattern per physical channel)
//! - The sweep state machine that advances all channels in lockstep
//! - The actuator collaborator trait (rumble motor, status LEDs)
//! - Request decoding and validation
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod pattern;
pub mod pulser;
pub mod request;
pub mod traits;
