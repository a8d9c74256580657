//! Pattern scheduler logic
//!
//! Clock-free half of the pulser: the sweep that turns a pattern set into
//! per-tick channel updates. The runtime supplies the waiting and the
//! cancellation.

pub mod sweep;

pub use sweep::{ChannelAction, Sweep, Tick, Touched};
