//! Feedback controller
//!
//! Serializes requests per output kind. Before anything new touches a kind,
//! its running pulser is cancelled and awaited, so the retiring pulser's
//! cleanup can never land after the new write. Direct on/off requests skip
//! the pulser entirely.

use embassy_sync::blocking_mutex::raw::RawMutex;

use tremolo_core::config::FeedbackConfig;
use tremolo_core::pattern::PatternSet;
use tremolo_core::pulser::Sweep;
use tremolo_core::request::{LedRequest, Request, RequestError, RumbleRequest};
use tremolo_core::traits::{Actuator, ActuatorError, LedMask, OutputKind, MAX_LEDS};

use crate::error::ControlError;
use crate::pulser::{with_actuator, Completion, Outcome, SharedActuator};
use crate::registry::FeedbackRegistry;

/// Request handler owning the pulser registry's control side
pub struct Controller<'a, M: RawMutex, A: Actuator> {
    config: FeedbackConfig,
    registry: &'a FeedbackRegistry<M>,
    actuator: &'a SharedActuator<M, A>,
    /// Kinds with a job handed to their pulser and not yet retired
    active: [bool; 2],
    last_fault: Option<ActuatorError>,
}

impl<'a, M: RawMutex, A: Actuator> Controller<'a, M, A> {
    pub fn new(
        config: FeedbackConfig,
        registry: &'a FeedbackRegistry<M>,
        actuator: &'a SharedActuator<M, A>,
    ) -> Self {
        log_info!(
            "Feedback controller ready: rumble={}, leds={}",
            config.channels(OutputKind::Rumble),
            config.channels(OutputKind::Led)
        );
        Self {
            config,
            registry,
            actuator,
            active: [false; 2],
            last_fault: None,
        }
    }

    /// Check if a pulser of this kind has been started and not yet retired
    pub fn is_active(&self, kind: OutputKind) -> bool {
        self.active[kind.index()]
    }

    /// Last device error reported by a pulser, cleared on read
    pub fn take_fault(&mut self) -> Option<ActuatorError> {
        self.last_fault.take()
    }

    /// Handle any validated request
    pub async fn handle(&mut self, request: Request) -> Result<(), ControlError> {
        match request {
            Request::Rumble(request) => self.handle_rumble(request).await,
            Request::Leds(request) => self.handle_leds(request).await,
        }
    }

    /// Handle a rumble request
    pub async fn handle_rumble(&mut self, request: RumbleRequest) -> Result<(), ControlError> {
        if self.config.channels(OutputKind::Rumble) == 0 {
            log_warn!("Rumble request ignored: device has no rumble motor");
            return Err(RequestError::Unsupported(OutputKind::Rumble).into());
        }

        self.retire(OutputKind::Rumble).await;

        match request {
            RumbleRequest::On => self.write(|a| a.set_rumble(true)),
            RumbleRequest::Off => self.write(|a| a.set_rumble(false)),
            RumbleRequest::Cancel => Ok(()),
            RumbleRequest::Pulse(pattern) => {
                self.start(PatternSet::rumble(pattern));
                Ok(())
            }
        }
    }

    /// Handle an LED request
    ///
    /// Entries past the configured LED count are ignored.
    pub async fn handle_leds(&mut self, mut request: LedRequest) -> Result<(), ControlError> {
        let leds = self.config.channels(OutputKind::Led);
        if request.limit_to(leds) {
            log_warn!("LED request addresses more than {} LEDs, extra entries ignored", leds);
        }

        self.retire(OutputKind::Led).await;

        match request {
            LedRequest::Switch(mask) => self.write(|a| a.set_leds(mask)),
            LedRequest::Timed(set) => {
                if set.has_patterns() {
                    self.start(set);
                } else {
                    log_debug!("Timed LED request without patterns, nothing to run");
                }
                Ok(())
            }
        }
    }

    /// Cancel the running pulser of a kind and wait until it has exited
    ///
    /// Returns the pulser's outcome, or `None` if nothing was running. On
    /// return every channel the pulser touched is off.
    pub async fn retire(&mut self, kind: OutputKind) -> Option<Outcome> {
        if !self.is_active(kind) {
            return None;
        }

        let slot = self.registry.slot(kind);
        slot.cancel.signal(());
        let outcome = slot.retired.wait().await;
        // A pulser that finished before seeing the cancel leaves it set
        slot.cancel.reset();

        Some(self.settle(kind, outcome))
    }

    /// Wait for the running pulser of a kind to finish on its own
    ///
    /// Returns `None` if nothing was running.
    pub async fn wait_idle(&mut self, kind: OutputKind) -> Option<Outcome> {
        if !self.is_active(kind) {
            return None;
        }

        let outcome = self.registry.slot(kind).retired.wait().await;
        Some(self.settle(kind, outcome))
    }

    /// Stop all pulsers and switch every output off
    ///
    /// Every write is attempted; the first failure is returned.
    pub async fn shutdown(&mut self) -> Result<(), ControlError> {
        log_info!("Feedback shutdown");

        for kind in OutputKind::ALL {
            self.retire(kind).await;
        }

        let rumble = if self.config.channels(OutputKind::Rumble) > 0 {
            self.write(|a| a.set_rumble(false))
        } else {
            Ok(())
        };

        let mut mask: LedMask = [None; MAX_LEDS];
        for slot in mask.iter_mut().take(self.config.channels(OutputKind::Led)) {
            *slot = Some(false);
        }
        let leds = self.write(|a| a.set_leds(mask));

        rumble.and(leds)
    }

    /// Hand a pattern set to its kind's pulser
    ///
    /// The previous pulser of this kind must already be retired.
    fn start(&mut self, set: PatternSet) {
        let kind = set.kind();
        log_debug!("Starting {:?} pulser on {} channels", kind, set.len());
        self.registry.slot(kind).job.signal(Sweep::new(set));
        self.active[kind.index()] = true;
    }

    /// Record a retired pulser's outcome
    fn settle(&mut self, kind: OutputKind, outcome: Outcome) -> Outcome {
        self.active[kind.index()] = false;
        match outcome {
            Ok(Completion::Finished) => log_debug!("{:?} pulser finished", kind),
            Ok(Completion::Cancelled) => log_debug!("{:?} pulser cancelled", kind),
            Err(e) => {
                log_error!("{:?} pulser failed: {:?}", kind, e);
                self.last_fault = Some(e);
            }
        }
        outcome
    }

    /// Direct device write
    fn write(
        &mut self,
        f: impl FnOnce(&mut A) -> Result<(), ActuatorError>,
    ) -> Result<(), ControlError> {
        with_actuator(self.actuator, f).map_err(|e| {
            log_error!("Direct output write failed: {:?}", e);
            ControlError::Actuator(e)
        })
    }
}
