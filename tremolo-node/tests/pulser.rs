//! Real-time pulser runs on the host clock

mod common;

use embassy_futures::block_on;
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use tremolo_core::pattern::{OutputPattern, PatternSet};
use tremolo_core::pulser::Sweep;
use tremolo_core::traits::ActuatorError;
use tremolo_node::pulser::{self, with_actuator, Completion};

use common::*;

fn rumble_sweep(durations: &[f32], repeats: u32) -> Sweep {
    Sweep::new(PatternSet::rumble(
        OutputPattern::new(durations, repeats).unwrap(),
    ))
}

#[test]
fn test_rumble_pattern_timing() {
    let device = device(RecordingDevice::new());
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();

    let start = Instant::now();
    let outcome = block_on(pulser::run(rumble_sweep(&[0.1, 0.1], 2), &device, &cancel));

    assert_eq!(outcome, Ok(Completion::Finished));
    assert_writes(
        &writes(&device),
        start,
        &[
            (0, None, true),
            (100, None, false),
            (200, None, true),
            (300, None, false),
            // Last OFF phase runs out, then cleanup
            (400, None, false),
        ],
    );
    assert!(!rumble(&device));
}

#[test]
fn test_led_pattern_leaves_untouched_leds() {
    let device = device(RecordingDevice::with_leds([false, true, false, true]));
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();
    let set = PatternSet::leds([
        Some(OutputPattern::new(&[0.04, 0.06], 1).unwrap()),
        None,
        Some(OutputPattern::new(&[0.2], 2).unwrap()),
        None,
    ]);

    let start = Instant::now();
    let outcome = block_on(pulser::run(Sweep::new(set), &device, &cancel));

    assert_eq!(outcome, Ok(Completion::Finished));
    assert_writes(
        &writes(&device),
        start,
        &[
            (0, Some(0), true),
            (0, Some(2), true),
            (40, Some(0), false),
            (200, Some(2), true),
            (400, Some(0), false),
            (400, Some(2), false),
        ],
    );
    assert_eq!(leds(&device), [false, true, false, true]);
}

#[test]
fn test_cancel_wakes_pulser_immediately() {
    let device = device(RecordingDevice::new());
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();

    let start = Instant::now();
    let (outcome, ()) = block_on(join(
        pulser::run(rumble_sweep(&[0.5, 0.5], 2), &device, &cancel),
        async {
            Timer::after_millis(50).await;
            cancel.signal(());
        },
    ));

    assert_eq!(outcome, Ok(Completion::Cancelled));
    assert!(start.elapsed() < Duration::from_millis(300));
    assert_writes(&writes(&device), start, &[(0, None, true), (50, None, false)]);
    assert!(!rumble(&device));
}

#[test]
fn test_pending_cancel_skips_start_but_cleans_up() {
    let device = device(RecordingDevice::with_leds([true, true, true, true]));
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();
    cancel.signal(());

    let set = PatternSet::leds([None, Some(OutputPattern::new(&[1.0], 1).unwrap())]);
    let outcome = block_on(pulser::run(Sweep::new(set), &device, &cancel));

    assert_eq!(outcome, Ok(Completion::Cancelled));
    let writes = writes(&device);
    assert_eq!(writes.len(), 1);
    assert_eq!((writes[0].led, writes[0].on), (Some(1), false));
    assert_eq!(leds(&device), [true, false, true, true]);
}

#[test]
fn test_device_error_still_switches_off() {
    // Attempt 1 is the first flip
    let device = device(RecordingDevice::new().failing(&[1]));
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();

    let start = Instant::now();
    let outcome = block_on(pulser::run(rumble_sweep(&[0.05, 0.05], 3), &device, &cancel));

    assert_eq!(outcome, Err(ActuatorError::WriteFailed));
    assert_writes(&writes(&device), start, &[(0, None, true), (50, None, false)]);
    assert!(!rumble(&device));
}

#[test]
fn test_cleanup_error_is_reported() {
    // Attempt 0 switches on, attempt 1 is the cleanup
    let device = device(RecordingDevice::new().failing(&[1]));
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();
    let set = PatternSet::leds([Some(OutputPattern::new(&[0.03], 1).unwrap())]);

    let outcome = block_on(pulser::run(Sweep::new(set), &device, &cancel));

    assert_eq!(outcome, Err(ActuatorError::WriteFailed));
    assert_eq!(leds(&device), [true, false, false, false]);
}

#[test]
fn test_original_error_wins_over_cleanup_error() {
    // Start fails, then the cleanup finds the device gone
    let device = device(RecordingDevice::new().failing(&[0]).disconnecting(1));
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();

    let outcome = block_on(pulser::run(rumble_sweep(&[0.05], 1), &device, &cancel));

    assert_eq!(outcome, Err(ActuatorError::WriteFailed));
    assert_eq!(with_actuator(&device, |d| d.attempts), 2);
    assert!(writes(&device).is_empty());
}

#[test]
fn test_dropped_pulser_switches_off() {
    let device = device(RecordingDevice::new());
    let cancel: Signal<NoopRawMutex, ()> = Signal::new();

    let result = block_on(select(
        pulser::run(rumble_sweep(&[1.0], 1), &device, &cancel),
        Timer::after_millis(30),
    ));

    assert!(matches!(result, Either::Second(())));
    let writes = writes(&device);
    assert_eq!(writes.len(), 2);
    assert!(writes[0].on);
    assert!(!writes[1].on);
    assert!(!rumble(&device));
}
