//! Pin assignments, read from the environment at startup.
//!
//! All twelve variables are required; the process refuses to start
//! without a complete pin map.

use std::env;

use thiserror::Error;

use crate::buttons::Button;
use crate::channel::Channel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} is not a BCM pin number: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// BCM pin numbers for one channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelPins {
    pub led0: u8,
    pub led1: u8,
    pub led2: u8,
    pub relay: u8,
    pub more_button: u8,
    pub less_button: u8,
}

/// Full pin map for both channels.
#[derive(Debug, Clone, Copy)]
pub struct PinConfig {
    pub cool: ChannelPins,
    pub warm: ChannelPins,
}

impl PinConfig {
    /// Reads the twelve `MY_*` pin variables from the environment,
    /// failing on the first missing or unparseable one.
    pub fn from_env() -> Result<PinConfig, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<PinConfig, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let pin = |name: &'static str| -> Result<u8, ConfigError> {
            let value = lookup(name).ok_or(ConfigError::Missing(name))?;
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        };

        Ok(PinConfig {
            cool: ChannelPins {
                led0: pin("MY_LED_COOL_0")?,
                led1: pin("MY_LED_COOL_1")?,
                led2: pin("MY_LED_COOL_2")?,
                relay: pin("MY_RELAY_COOL")?,
                more_button: pin("MY_BUTTON_COOL_MORE")?,
                less_button: pin("MY_BUTTON_COOL_LESS")?,
            },
            warm: ChannelPins {
                led0: pin("MY_LED_WARM_0")?,
                led1: pin("MY_LED_WARM_1")?,
                led2: pin("MY_LED_WARM_2")?,
                relay: pin("MY_RELAY_WARM")?,
                more_button: pin("MY_BUTTON_WARM_MORE")?,
                less_button: pin("MY_BUTTON_WARM_LESS")?,
            },
        })
    }

    pub fn channel(&self, channel: Channel) -> &ChannelPins {
        match channel {
            Channel::Cool => &self.cool,
            Channel::Warm => &self.warm,
        }
    }

    pub fn button_pin(&self, button: Button) -> u8 {
        let pins = self.channel(button.channel());
        match button {
            Button::CoolMore | Button::WarmMore => pins.more_button,
            Button::CoolLess | Button::WarmLess => pins.less_button,
        }
    }
}
