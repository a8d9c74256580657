//! Pulser registry
//!
//! One slot per output kind, holding the signals the controller and that
//! kind's pulser loop use to talk to each other. The controller owns the
//! registry's only writer side, so at most one pulser per kind is ever
//! running.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use tremolo_core::pulser::Sweep;
use tremolo_core::traits::OutputKind;

use crate::pulser::Outcome;

/// Signals between the controller and one pulser loop
pub struct PulserSlot<M: RawMutex> {
    /// Next pattern set to run (controller to pulser)
    pub(crate) job: Signal<M, Sweep>,
    /// Stop the running pattern early (controller to pulser)
    pub(crate) cancel: Signal<M, ()>,
    /// Pattern ended and its channels are off (pulser to controller)
    pub(crate) retired: Signal<M, Outcome>,
}

impl<M: RawMutex> PulserSlot<M> {
    pub const fn new() -> Self {
        Self {
            job: Signal::new(),
            cancel: Signal::new(),
            retired: Signal::new(),
        }
    }
}

impl<M: RawMutex> Default for PulserSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulser slots for every output kind
///
/// Usable as a `static` in firmware:
///
/// ```ignore
/// static REGISTRY: FeedbackRegistry<CriticalSectionRawMutex> = FeedbackRegistry::new();
/// ```
pub struct FeedbackRegistry<M: RawMutex> {
    slots: [PulserSlot<M>; 2],
}

impl<M: RawMutex> FeedbackRegistry<M> {
    pub const fn new() -> Self {
        Self {
            slots: [PulserSlot::new(), PulserSlot::new()],
        }
    }

    /// Slot for an output kind
    pub fn slot(&self, kind: OutputKind) -> &PulserSlot<M> {
        &self.slots[kind.index()]
    }
}

impl<M: RawMutex> Default for FeedbackRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_slots_are_independent() {
        let registry: FeedbackRegistry<NoopRawMutex> = FeedbackRegistry::new();

        registry.slot(OutputKind::Rumble).cancel.signal(());
        assert!(registry.slot(OutputKind::Rumble).cancel.signaled());
        assert!(!registry.slot(OutputKind::Led).cancel.signaled());
    }
}
