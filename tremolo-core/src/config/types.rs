//! Configuration type definitions

use crate::traits::{OutputKind, MAX_LEDS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Format version is not [`CONFIG_VERSION`]
    VersionMismatch,
    /// LED count is zero or above [`MAX_LEDS`]
    LedCountOutOfRange,
}

/// Feedback outputs present on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    /// Number of status LEDs
    pub leds: u8,
    /// Device has a vibration motor
    pub rumble: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            leds: MAX_LEDS as u8,
            rumble: true,
        }
    }
}

/// Complete feedback configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedbackConfig {
    /// Config format version
    pub version: u8,
    /// Output hardware
    pub device: DeviceConfig,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            device: DeviceConfig::default(),
        }
    }
}

impl FeedbackConfig {
    /// Check version and hardware limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != CONFIG_VERSION {
            return Err(ValidationError::VersionMismatch);
        }
        if self.device.leds == 0 || self.device.leds as usize > MAX_LEDS {
            return Err(ValidationError::LedCountOutOfRange);
        }
        Ok(())
    }

    /// Number of addressable channels for an output kind
    ///
    /// Zero means the kind is not fitted.
    pub fn channels(&self, kind: OutputKind) -> usize {
        match kind {
            OutputKind::Rumble => usize::from(self.device.rumble),
            OutputKind::Led => (self.device.leds as usize).min(MAX_LEDS),
        }
    }
}
