//! Long-running feedback loops
//!
//! Each loop runs independently and communicates via the registry signals
//! or an inbound channel. They are generic, so board crates spawn them from
//! thin `#[embassy_executor::task]` wrappers:
//!
//! ```ignore
//! #[embassy_executor::task(pool_size = 2)]
//! async fn pulser_task(kind: OutputKind) {
//!     pulser_loop(kind, &REGISTRY, &DEVICE).await
//! }
//! ```

pub mod listener;
pub mod pulser;

pub use listener::{dispatch, dispatch_bytes, listener_loop};
pub use pulser::pulser_loop;
