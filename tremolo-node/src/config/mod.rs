//! Configuration loading
//!
//! Loads the feedback configuration from stored TOML text or a postcard
//! blob. Falls back to the embedded defaults if nothing is stored.

pub mod loader;

pub use loader::{encode_binary, load, parse_binary, parse_toml, ConfigError};

/// Embedded default configuration, validated at build time
pub const EMBEDDED_CONFIG: &str = include_str!("../../feedback.toml");
