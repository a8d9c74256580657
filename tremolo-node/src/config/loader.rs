//! Configuration parsing
//!
//! TOML is tried first, then the binary postcard format. Every loaded
//! config is validated before it is returned.

use alloc::vec::Vec;
use core::str;

use tremolo_core::config::{FeedbackConfig, ValidationError};
use tremolo_core::traits::OutputKind;

use super::EMBEDDED_CONFIG;

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// TOML parsing failed
    TomlParse,
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// Parsed but out of range
    Invalid(ValidationError),
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Load configuration from whatever is stored
///
/// Tries `toml` first and falls back to `binary`. With neither present
/// the embedded defaults are used.
pub fn load(toml: Option<&[u8]>, binary: Option<&[u8]>) -> Result<FeedbackConfig, ConfigError> {
    log_info!("Loading feedback configuration...");

    if let Some(bytes) = toml {
        match parse_toml(bytes) {
            Ok(config) => {
                log_info!("Loaded configuration from TOML");
                return Ok(config);
            }
            Err(e) if binary.is_some() => {
                log_warn!("Failed to load TOML config: {:?}, trying binary", e);
            }
            Err(e) => return Err(e),
        }
    }

    match binary {
        Some(bytes) => parse_binary(bytes),
        None => {
            log_debug!("No stored configuration, using embedded defaults");
            parse_toml(EMBEDDED_CONFIG.as_bytes())
        }
    }
}

/// Parse and validate TOML configuration text
pub fn parse_toml(bytes: &[u8]) -> Result<FeedbackConfig, ConfigError> {
    let text = str::from_utf8(bytes).map_err(|_| ConfigError::InvalidUtf8)?;

    let config: FeedbackConfig = toml::from_str(text).map_err(|_| {
        log_warn!("TOML parse error in {} bytes of config", bytes.len());
        ConfigError::TomlParse
    })?;

    check(&config)?;
    Ok(config)
}

/// Parse and validate a postcard-encoded configuration
pub fn parse_binary(bytes: &[u8]) -> Result<FeedbackConfig, ConfigError> {
    log_debug!("Read {} bytes of binary config", bytes.len());

    let config: FeedbackConfig =
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

    check(&config)?;
    Ok(config)
}

/// Encode a configuration for binary storage
pub fn encode_binary(config: &FeedbackConfig) -> Result<Vec<u8>, ConfigError> {
    postcard::to_allocvec(config).map_err(|_| ConfigError::Serialize)
}

/// Validate and log a summary
fn check(config: &FeedbackConfig) -> Result<(), ConfigError> {
    if let Err(e) = config.validate() {
        log_warn!("Configuration rejected: {:?}", e);
        return Err(e.into());
    }

    log_info!("Configuration loaded successfully");
    log_debug!("  {} rumble motor", config.channels(OutputKind::Rumble));
    log_debug!("  {} LEDs", config.channels(OutputKind::Led));
    Ok(())
}
