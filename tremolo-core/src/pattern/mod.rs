//! Output patterns
//!
//! Declarative on/off timing programs and the per-channel sets a scheduler
//! runs them from.

pub mod output;
pub mod set;

pub use output::{round_to_centis, OutputPattern, PatternError, MAX_PATTERN_LEN};
pub use set::{PatternSet, MAX_CHANNELS};
