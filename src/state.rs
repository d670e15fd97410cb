use std::sync::atomic::{AtomicU64, Ordering};

use crate::buttons::Button;
use crate::channel::{self, Channel, ChannelOutputs};
use crate::timer;

/// Shared deadline pair for the two channels.
///
/// One atomic field per channel keeps every update a single atomic store,
/// so the status loop never observes a half-written deadline. The pair is
/// deliberately not updated as a unit: between forcing one channel off
/// and extending the other there is a short window where both project as
/// off, which is harmless at status-tick granularity.
///
/// Deadlines are only mutated from the button loop. The load-then-store
/// in [`apply_press`](ControlState::apply_press) relies on that single
/// writer; the status loop only ever reads.
pub struct ControlState {
    cool_off_ms: AtomicU64,
    warm_off_ms: AtomicU64,
}

impl ControlState {
    /// Both channels start just expired.
    pub fn new(now_ms: u64) -> Self {
        let expired = timer::expired_at(now_ms);
        ControlState {
            cool_off_ms: AtomicU64::new(expired),
            warm_off_ms: AtomicU64::new(expired),
        }
    }

    fn cell(&self, channel: Channel) -> &AtomicU64 {
        match channel {
            Channel::Cool => &self.cool_off_ms,
            Channel::Warm => &self.warm_off_ms,
        }
    }

    pub fn off_at(&self, channel: Channel) -> u64 {
        self.cell(channel).load(Ordering::SeqCst)
    }

    /// Forces a channel to read as expired from `now_ms` on.
    pub fn force_expired(&self, channel: Channel, now_ms: u64) {
        self.cell(channel)
            .store(timer::expired_at(now_ms), Ordering::SeqCst);
    }

    /// Applies one accepted button press: the opposite channel is forced
    /// off first, then the target deadline shifts by the button's delta.
    pub fn apply_press(&self, button: Button, now_ms: u64) {
        let target = button.channel();
        self.force_expired(target.other(), now_ms);

        let cell = self.cell(target);
        let off_at = cell.load(Ordering::SeqCst);
        cell.store(
            timer::extend(off_at, button.delta_ms(), now_ms),
            Ordering::SeqCst,
        );
    }

    /// Relay and LED levels for one channel at `now_ms`.
    pub fn project(&self, channel: Channel, now_ms: u64) -> ChannelOutputs {
        channel::project(self.off_at(channel), now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 500_000;

    #[test]
    fn both_channels_start_expired() {
        let state = ControlState::new(NOW);
        assert!(!state.project(Channel::Cool, NOW).relay_on);
        assert!(!state.project(Channel::Warm, NOW).relay_on);
    }

    #[test]
    fn press_forces_the_opposite_channel_off() {
        let state = ControlState::new(NOW);
        state.apply_press(Button::WarmMore, NOW);
        assert!(state.project(Channel::Warm, NOW).relay_on);

        // A cool press while warm is counting down kills warm at once.
        state.apply_press(Button::CoolMore, NOW + 1_000);
        assert!(state.off_at(Channel::Warm) <= NOW + 1_000);
        assert!(state.project(Channel::Cool, NOW + 1_000).relay_on);
        assert!(!state.project(Channel::Warm, NOW + 1_000).relay_on);
    }

    #[test]
    fn less_press_also_forces_the_opposite_channel_off() {
        let state = ControlState::new(NOW);
        state.apply_press(Button::WarmMore, NOW);
        state.apply_press(Button::CoolLess, NOW + 1_000);

        // Cool was already expired so the press changed nothing there,
        // but warm still went off.
        assert!(!state.project(Channel::Cool, NOW + 1_000).relay_on);
        assert!(!state.project(Channel::Warm, NOW + 1_000).relay_on);
    }

    #[test]
    fn presses_accumulate_on_the_active_channel() {
        let state = ControlState::new(NOW);
        state.apply_press(Button::CoolMore, NOW);
        state.apply_press(Button::CoolMore, NOW + 10_000);
        assert_eq!(state.off_at(Channel::Cool), NOW + 600_000);
    }
}
