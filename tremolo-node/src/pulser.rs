//! Pulser runtime
//!
//! Runs one [`Sweep`] against the shared actuator: sleeps until the nearest
//! channel expiry, applies the resulting tick, and repeats until every
//! pattern is spent or cancellation arrives. The wait is the only
//! suspension point and it races the cancel signal, so a preemption wakes
//! the pulser immediately.
//!
//! Every channel that had a pattern is switched off when the run ends,
//! whether it finished, was cancelled, hit a device error, or had its
//! future dropped mid-wait.

use core::cell::RefCell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

use tremolo_core::pulser::{Sweep, Tick, Touched};
use tremolo_core::traits::{Actuator, ActuatorError};

/// Device handle shared by the pulsers and the controller
pub type SharedActuator<M, A> = Mutex<M, RefCell<A>>;

/// How a pulser run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// Every pattern ran out
    Finished,
    /// Stopped early by the controller
    Cancelled,
}

/// Result of a pulser run, reported back to the controller
pub type Outcome = Result<Completion, ActuatorError>;

/// Run a closure against the shared device
pub fn with_actuator<M, A, R>(actuator: &SharedActuator<M, A>, f: impl FnOnce(&mut A) -> R) -> R
where
    M: RawMutex,
    A: Actuator,
{
    actuator.lock(|cell| f(&mut cell.borrow_mut()))
}

/// Convert a wait in seconds to an embassy duration
fn to_duration(seconds: f32) -> Duration {
    Duration::from_micros((seconds * 1_000_000.0) as u64)
}

/// Switches touched channels off when dropped
///
/// Covers a pulser future dropped while suspended. The normal paths call
/// [`Cleanup::release`] to get the write result.
struct Cleanup<'a, M: RawMutex, A: Actuator> {
    touched: Touched,
    actuator: &'a SharedActuator<M, A>,
    armed: bool,
}

impl<'a, M: RawMutex, A: Actuator> Cleanup<'a, M, A> {
    fn new(touched: Touched, actuator: &'a SharedActuator<M, A>) -> Self {
        Self {
            touched,
            actuator,
            armed: true,
        }
    }

    fn release(mut self) -> Result<(), ActuatorError> {
        self.armed = false;
        with_actuator(self.actuator, |a| self.touched.release(a))
    }
}

impl<M: RawMutex, A: Actuator> Drop for Cleanup<'_, M, A> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let touched = self.touched;
        if let Err(e) = with_actuator(self.actuator, |a| touched.release(a)) {
            log_error!("{:?} cleanup failed on drop: {:?}", touched.kind(), e);
        }
    }
}

/// Run a sweep until it finishes or `cancel` is signaled
///
/// A device error ends the run like a cancellation. Touched channels are
/// switched off exactly once before returning; if that write fails too,
/// the original error is reported.
pub async fn run<M, A>(
    mut sweep: Sweep,
    actuator: &SharedActuator<M, A>,
    cancel: &Signal<M, ()>,
) -> Outcome
where
    M: RawMutex,
    A: Actuator,
{
    let kind = sweep.kind();
    let cleanup = Cleanup::new(sweep.touched(), actuator);

    let result = drive(&mut sweep, actuator, cancel).await;
    let released = cleanup.release();

    match (result, released) {
        (Ok(completion), Ok(())) => {
            log_debug!(
                "{:?} pulser {:?} after {}s",
                kind,
                completion,
                sweep.elapsed()
            );
            Ok(completion)
        }
        (Ok(_), Err(e)) => {
            log_error!("{:?} cleanup failed: {:?}", kind, e);
            Err(e)
        }
        (Err(e), Ok(())) => {
            log_error!("{:?} pulser stopped by device error: {:?}", kind, e);
            Err(e)
        }
        (Err(e), Err(cleanup_err)) => {
            log_error!(
                "{:?} pulser stopped by device error: {:?} (cleanup: {:?})",
                kind,
                e,
                cleanup_err
            );
            Err(e)
        }
    }
}

/// Sweep loop without cleanup
async fn drive<M, A>(
    sweep: &mut Sweep,
    actuator: &SharedActuator<M, A>,
    cancel: &Signal<M, ()>,
) -> Outcome
where
    M: RawMutex,
    A: Actuator,
{
    if cancel.signaled() {
        return Ok(Completion::Cancelled);
    }
    apply(actuator, &sweep.start())?;

    while let Some(wait) = sweep.next_wait() {
        match select(Timer::after(to_duration(wait)), cancel.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => return Ok(Completion::Cancelled),
        }

        let tick = sweep.advance(wait);
        if cancel.signaled() {
            return Ok(Completion::Cancelled);
        }
        log_trace!("{:?} tick at {}s", sweep.kind(), sweep.elapsed());
        apply(actuator, &tick)?;
    }

    Ok(Completion::Finished)
}

/// Write one tick as a single batch
fn apply<M, A>(actuator: &SharedActuator<M, A>, tick: &Tick) -> Result<(), ActuatorError>
where
    M: RawMutex,
    A: Actuator,
{
    with_actuator(actuator, |a| tick.apply(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_duration() {
        assert_eq!(to_duration(0.0), Duration::from_micros(0));
        assert_eq!(to_duration(0.5), Duration::from_millis(500));
        assert_eq!(to_duration(2.0), Duration::from_secs(2));
    }
}
