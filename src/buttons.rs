use std::fmt;

use crate::channel::Channel;
use crate::timer::TIME_QUANTUM_MS;

/// Minimum spacing between accepted presses, shared across all four
/// buttons.
pub const PRESS_SPACING_MS: u64 = 300;

/// The four operator pushbuttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    CoolMore = 0,
    CoolLess = 1,
    WarmMore = 2,
    WarmLess = 3,
}

impl Button {
    pub const ALL: [Button; 4] = [
        Button::CoolMore,
        Button::CoolLess,
        Button::WarmMore,
        Button::WarmLess,
    ];

    /// The channel this button adjusts.
    pub fn channel(self) -> Channel {
        match self {
            Button::CoolMore | Button::CoolLess => Channel::Cool,
            Button::WarmMore | Button::WarmLess => Channel::Warm,
        }
    }

    /// Signed run-time adjustment for one press.
    pub fn delta_ms(self) -> i64 {
        match self {
            Button::CoolMore | Button::WarmMore => TIME_QUANTUM_MS as i64,
            Button::CoolLess | Button::WarmLess => -(TIME_QUANTUM_MS as i64),
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::CoolMore => f.write_str("cool more"),
            Button::CoolLess => f.write_str("cool less"),
            Button::WarmMore => f.write_str("warm more"),
            Button::WarmLess => f.write_str("warm less"),
        }
    }
}

/// Inter-press spacing gate shared by all four buttons.
///
/// A press landing within [`PRESS_SPACING_MS`] of the last accepted press
/// is dropped outright, so a double-press or rapid alternation between
/// buttons cannot compound. Rejected presses do not move the window.
pub struct DebounceGate {
    last_accepted_ms: Option<u64>,
}

impl DebounceGate {
    pub fn new() -> Self {
        DebounceGate {
            last_accepted_ms: None,
        }
    }

    /// Accepts a press at `now_ms` unless it falls inside the spacing
    /// window of the previously accepted one.
    pub fn try_accept(&mut self, now_ms: u64) -> bool {
        match self.last_accepted_ms {
            Some(last) if now_ms <= last.saturating_add(PRESS_SPACING_MS) => false,
            _ => {
                self.last_accepted_ms = Some(now_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_is_accepted() {
        let mut gate = DebounceGate::new();
        assert!(gate.try_accept(40));
    }

    #[test]
    fn presses_inside_the_spacing_window_are_dropped() {
        let mut gate = DebounceGate::new();
        assert!(gate.try_accept(1_000));
        assert!(!gate.try_accept(1_100));
        // The rejected press did not move the window.
        assert!(gate.try_accept(1_310));
    }

    #[test]
    fn spacing_boundary_is_exclusive() {
        let mut gate = DebounceGate::new();
        assert!(gate.try_accept(1_000));
        assert!(!gate.try_accept(1_300));
        assert!(gate.try_accept(1_301));
    }

    #[test]
    fn buttons_map_to_their_channel_and_delta() {
        assert_eq!(Button::CoolMore.channel(), Channel::Cool);
        assert_eq!(Button::WarmLess.channel(), Channel::Warm);
        assert_eq!(Button::CoolMore.delta_ms(), 300_000);
        assert_eq!(Button::WarmLess.delta_ms(), -300_000);
        for button in Button::ALL {
            assert_eq!(button.delta_ms().unsigned_abs(), TIME_QUANTUM_MS);
        }
    }
}
