//! Configuration types
//!
//! Board-agnostic configuration structures, loaded from TOML text or
//! postcard binary data by the runtime.

pub mod types;

pub use types::*;
