use std::fmt;

use crate::timer::TIME_QUANTUM_MS;

/// Remaining run time above which the second tier LED lights.
pub const LED1_THRESHOLD_MS: u64 = TIME_QUANTUM_MS;

/// Remaining run time above which the third tier LED lights.
pub const LED2_THRESHOLD_MS: u64 = 2 * TIME_QUANTUM_MS;

/// One of the two actuation paths. Each has its own relay, three tier
/// LEDs, and a pair of more/less buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Cool = 0,
    Warm = 1,
}

impl Channel {
    /// The channel that gets forced off when this one is adjusted.
    pub fn other(self) -> Channel {
        match self {
            Channel::Cool => Channel::Warm,
            Channel::Warm => Channel::Cool,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Cool => f.write_str("cool"),
            Channel::Warm => f.write_str("warm"),
        }
    }
}

/// Logical output levels for one channel: the relay and its three tier
/// LEDs. Polarity is an adapter concern; `true` always means "lit" or
/// "energized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelOutputs {
    pub relay_on: bool,
    pub led0: bool,
    pub led1: bool,
    pub led2: bool,
}

/// Projects a deadline onto relay and LED levels at `now_ms`.
///
/// The relay and first LED follow "still running"; the second and third
/// LEDs step in above one and two quanta of remaining time.
pub fn project(off_at_ms: u64, now_ms: u64) -> ChannelOutputs {
    let relay_on = off_at_ms > now_ms;
    let remaining_ms = off_at_ms.saturating_sub(now_ms);
    ChannelOutputs {
        relay_on,
        led0: relay_on,
        led1: relay_on && remaining_ms > LED1_THRESHOLD_MS,
        led2: relay_on && remaining_ms > LED2_THRESHOLD_MS,
    }
}
