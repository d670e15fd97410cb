pub mod buttons;
pub mod channel;
pub mod clock;
pub mod config;
pub mod control;
pub mod gpio;
pub mod state;
pub mod timer;

pub use buttons::{Button, DebounceGate};
pub use channel::{Channel, ChannelOutputs};
pub use clock::TimerClock;
pub use config::{ConfigError, PinConfig};
pub use state::ControlState;
