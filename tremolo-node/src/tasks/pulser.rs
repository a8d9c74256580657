//! Pulser loop
//!
//! Waits for pattern sets from the controller and runs them one at a time
//! for a single output kind.

use embassy_sync::blocking_mutex::raw::RawMutex;

use tremolo_core::traits::{Actuator, OutputKind};

use crate::pulser::{self, SharedActuator};
use crate::registry::FeedbackRegistry;

/// Pulser loop for one output kind
///
/// Never returns. Each outcome is handed back through the slot's `retired`
/// signal once the touched channels are off.
pub async fn pulser_loop<M, A>(
    kind: OutputKind,
    registry: &FeedbackRegistry<M>,
    actuator: &SharedActuator<M, A>,
) where
    M: RawMutex,
    A: Actuator,
{
    log_info!("{:?} pulser loop started", kind);

    let slot = registry.slot(kind);
    loop {
        let sweep = slot.job.wait().await;
        log_debug!("{:?} pulser running {} channels", kind, sweep.patterns().len());

        let outcome = pulser::run(sweep, actuator, &slot.cancel).await;
        slot.retired.signal(outcome);
    }
}
