//! Per-channel pattern sets
//!
//! A pattern set holds one optional pattern per physical channel of an
//! output kind. An absent slot means "leave this channel alone".

use heapless::Vec;

use super::output::OutputPattern;
use crate::traits::{OutputKind, MAX_LEDS};

/// Maximum channels of any output kind
pub const MAX_CHANNELS: usize = MAX_LEDS;

/// Fixed-size collection of optional patterns, indexed by channel
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSet {
    kind: OutputKind,
    slots: Vec<Option<OutputPattern>, MAX_CHANNELS>,
}

impl PatternSet {
    /// Build a set for the single rumble channel
    pub fn rumble(pattern: OutputPattern) -> Self {
        let mut slots = Vec::new();
        // Capacity is at least one
        let _ = slots.push(Some(pattern));
        Self {
            kind: OutputKind::Rumble,
            slots,
        }
    }

    /// Build a set for the status LEDs
    ///
    /// Slot `i` drives LED `i`. Slots beyond [`MAX_LEDS`] are dropped.
    pub fn leds<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = Option<OutputPattern>>,
    {
        let mut slots = Vec::new();
        for pattern in patterns.into_iter().take(MAX_LEDS) {
            let _ = slots.push(pattern);
        }
        Self {
            kind: OutputKind::Led,
            slots,
        }
    }

    /// Output kind this set drives
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Number of channel slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the set has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Pattern for a channel, if present
    pub fn get(&self, channel: usize) -> Option<&OutputPattern> {
        self.slots.get(channel).and_then(Option::as_ref)
    }

    /// Check if a channel has a pattern
    pub fn is_present(&self, channel: usize) -> bool {
        self.get(channel).is_some()
    }

    /// Iterate over slots in channel order
    pub fn iter(&self) -> impl Iterator<Item = Option<&OutputPattern>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Check if at least one channel has a pattern
    pub fn has_patterns(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Drop slots from `channels` onwards
    ///
    /// Returns true if a dropped slot held a pattern.
    pub fn truncate(&mut self, channels: usize) -> bool {
        let dropped = self.slots.iter().skip(channels).any(Option::is_some);
        self.slots.truncate(channels);
        dropped
    }

    /// Mutable access to slots in channel order
    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Option<OutputPattern>> {
        self.slots.iter_mut()
    }
}
