//! Sweep state machine
//!
//! Advances every channel of a pattern set against a single sweep clock.
//! The sweep itself never sleeps: the runtime asks for [`Sweep::next_wait`],
//! suspends for that long, then calls [`Sweep::advance`] and applies the
//! resulting [`Tick`] to the device as one batch.

use heapless::Vec;

use crate::pattern::{PatternSet, MAX_CHANNELS};
use crate::traits::{Actuator, ActuatorError, LedMask, OutputKind, MAX_LEDS};

/// What happens to one channel on a sweep tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelAction {
    /// Leave the channel as it is
    Hold,
    /// Force the channel ON (run start or start of a repeat)
    On,
    /// Invert the channel (phase boundary)
    Flip,
}

/// Channel updates produced by one sweep step
///
/// Applied to the device as a single batch: one rumble write, or one LED
/// write covering every LED that changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    kind: OutputKind,
    actions: Vec<ChannelAction, MAX_CHANNELS>,
}

impl Tick {
    /// Action for a channel (`Hold` for channels outside the set)
    pub fn action(&self, channel: usize) -> ChannelAction {
        self.actions
            .get(channel)
            .copied()
            .unwrap_or(ChannelAction::Hold)
    }

    /// Check if the tick changes nothing
    pub fn is_empty(&self) -> bool {
        self.actions.iter().all(|a| *a == ChannelAction::Hold)
    }

    /// Write this tick's updates to the device
    pub fn apply<A: Actuator + ?Sized>(&self, actuator: &mut A) -> Result<(), ActuatorError> {
        if self.is_empty() {
            return Ok(());
        }

        match self.kind {
            OutputKind::Rumble => match self.action(0) {
                ChannelAction::Hold => Ok(()),
                ChannelAction::On => actuator.set_rumble(true),
                ChannelAction::Flip => {
                    let current = actuator.rumble();
                    actuator.set_rumble(!current)
                }
            },
            OutputKind::Led => {
                let current = actuator.leds();
                let mut mask: LedMask = [None; MAX_LEDS];
                for (channel, action) in self.actions.iter().enumerate().take(MAX_LEDS) {
                    mask[channel] = match action {
                        ChannelAction::Hold => None,
                        ChannelAction::On => Some(true),
                        ChannelAction::Flip => Some(!current[channel]),
                    };
                }
                actuator.set_leds(mask)
            }
        }
    }
}

/// Channels a sweep owns, for the guaranteed-off cleanup
///
/// `Copy` so a drop guard can hold it while the sweep keeps mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Touched {
    kind: OutputKind,
    channels: [bool; MAX_CHANNELS],
}

impl Touched {
    /// Output kind of the touched channels
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Check if a channel had a pattern
    pub fn contains(&self, channel: usize) -> bool {
        self.channels.get(channel).copied().unwrap_or(false)
    }

    /// Drive every touched channel OFF
    ///
    /// The rumble motor is always switched off. LEDs without a pattern keep
    /// whatever state they had.
    pub fn release<A: Actuator + ?Sized>(&self, actuator: &mut A) -> Result<(), ActuatorError> {
        match self.kind {
            OutputKind::Rumble => actuator.set_rumble(false),
            OutputKind::Led => {
                if !self.channels.iter().any(|c| *c) {
                    return Ok(());
                }
                let mut mask: LedMask = [None; MAX_LEDS];
                for (slot, touched) in mask.iter_mut().zip(self.channels.iter()) {
                    if *touched {
                        *slot = Some(false);
                    }
                }
                actuator.set_leds(mask)
            }
        }
    }
}

/// Lockstep scheduler over one pattern set
#[derive(Debug, Clone)]
pub struct Sweep {
    set: PatternSet,
    /// Sum of all waits passed to `advance`
    elapsed: f32,
}

impl Sweep {
    /// Create a sweep over a pattern set
    pub fn new(set: PatternSet) -> Self {
        Self { set, elapsed: 0.0 }
    }

    /// Output kind being driven
    pub fn kind(&self) -> OutputKind {
        self.set.kind()
    }

    /// Pattern set being driven
    pub fn patterns(&self) -> &PatternSet {
        &self.set
    }

    /// Channels that will be driven OFF on termination
    pub fn touched(&self) -> Touched {
        let mut channels = [false; MAX_CHANNELS];
        for (flag, pattern) in channels.iter_mut().zip(self.set.iter()) {
            *flag = pattern.is_some();
        }
        Touched {
            kind: self.set.kind(),
            channels,
        }
    }

    /// Updates for the start of the run: every live pattern begins ON
    pub fn start(&self) -> Tick {
        let actions = self
            .set
            .iter()
            .map(|slot| match slot {
                Some(pattern) if !pattern.is_spent() => ChannelAction::On,
                _ => ChannelAction::Hold,
            })
            .collect();
        Tick {
            kind: self.set.kind(),
            actions,
        }
    }

    /// Time until the nearest channel expiry, or `None` when all are spent
    pub fn next_wait(&self) -> Option<f32> {
        self.set
            .iter()
            .flatten()
            .filter_map(|pattern| pattern.time_remaining())
            .fold(None, |nearest: Option<f32>, t| match nearest {
                Some(n) if n <= t => Some(n),
                _ => Some(t),
            })
    }

    /// Advance every channel by `elapsed` seconds
    ///
    /// A channel that just began a repeat is forced ON; a channel whose head
    /// just expired (reduced to exactly zero) is flipped.
    pub fn advance(&mut self, elapsed: f32) -> Tick {
        self.elapsed += elapsed;

        let actions = self
            .set
            .slots_mut()
            .map(|slot| match slot {
                Some(pattern) => {
                    let reduced = pattern.reduce_timer(elapsed);
                    if pattern.start_of_repeat() {
                        ChannelAction::On
                    } else if reduced == Some(0.0) {
                        ChannelAction::Flip
                    } else {
                        ChannelAction::Hold
                    }
                }
                None => ChannelAction::Hold,
            })
            .collect();

        Tick {
            kind: self.set.kind(),
            actions,
        }
    }

    /// Check if every present pattern is spent
    pub fn is_finished(&self) -> bool {
        self.next_wait().is_none()
    }

    /// Total sweep time so far (seconds)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
