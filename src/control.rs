//! The two periodic activities: status reflection and button sampling.
//!
//! Both loops run on their own thread and share nothing but the
//! [`ControlState`] atomics and the termination flag. The per-tick work
//! lives in [`reflect_status`] and [`service_buttons`] so it can run
//! under test without threads or sleeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::buttons::{Button, DebounceGate};
use crate::channel::{Channel, ChannelOutputs};
use crate::clock::TimerClock;
use crate::gpio::{EdgeSource, StatusPanel};
use crate::state::ControlState;

/// How often the status loop reprojects the channels onto the panel.
pub const STATUS_PERIOD: Duration = Duration::from_millis(500);

/// How often the button loop drains pending edges. Kept well under the
/// press-spacing gate so the one-slot edge latches never merge two
/// presses the gate would have accepted.
pub const BUTTON_PERIOD: Duration = Duration::from_millis(100);

/// One status tick: project both channels at a single `now_ms` and drive
/// the panel. Relay transitions are logged by comparing against `last`.
pub fn reflect_status<P: StatusPanel>(
    state: &ControlState,
    panel: &mut P,
    last: &mut [ChannelOutputs; 2],
    now_ms: u64,
) {
    for channel in [Channel::Cool, Channel::Warm] {
        let outputs = state.project(channel, now_ms);
        if outputs.relay_on != last[channel as usize].relay_on {
            info!(
                "{} relay {}",
                channel,
                if outputs.relay_on { "on" } else { "off" }
            );
        }
        debug!(
            "{}: off_at={} now={} relay={}",
            channel,
            state.off_at(channel),
            now_ms,
            outputs.relay_on
        );
        panel.apply(channel, &outputs);
        last[channel as usize] = outputs;
    }
}

/// One button tick: drain pending edges, gate them, and apply the
/// accepted presses to the shared state.
pub fn service_buttons<E: EdgeSource>(
    state: &ControlState,
    edges: &mut E,
    gate: &mut DebounceGate,
    now_ms: u64,
) {
    for button in Button::ALL {
        if !edges.take(button) {
            continue;
        }
        if gate.try_accept(now_ms) {
            state.apply_press(button, now_ms);
            let remaining_secs = state.off_at(button.channel()).saturating_sub(now_ms) / 1000;
            info!(
                "{} accepted, {} runs another {}s",
                button,
                button.channel(),
                remaining_secs
            );
        } else {
            debug!("{} dropped by the spacing gate", button);
        }
    }
}

/// Reflects shared state onto the panel until `term` is set, then hands
/// the panel back for the terminal clear.
pub fn run_status_loop<P: StatusPanel>(
    state: Arc<ControlState>,
    mut panel: P,
    clock: TimerClock,
    term: Arc<AtomicBool>,
) -> P {
    let mut last = [ChannelOutputs::default(); 2];
    while !term.load(Ordering::Relaxed) {
        reflect_status(&state, &mut panel, &mut last, clock.now_ms());
        thread::sleep(STATUS_PERIOD);
    }
    eprintln!("status loop exiting");
    panel
}

/// Drains button edges and applies accepted presses until `term` is set.
pub fn run_button_loop<E: EdgeSource>(
    state: Arc<ControlState>,
    mut edges: E,
    clock: TimerClock,
    term: Arc<AtomicBool>,
) {
    let mut gate = DebounceGate::new();
    while !term.load(Ordering::Relaxed) {
        service_buttons(&state, &mut edges, &mut gate, clock.now_ms());
        thread::sleep(BUTTON_PERIOD);
    }
    eprintln!("button loop exiting");
}
