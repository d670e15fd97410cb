//! GPIO seam: trait boundary for the control loops plus the rppal-backed
//! adapters that talk to the actual pins.
//!
//! Polarity lives entirely on this side. The relay board is active-low,
//! the LEDs are active-high; the rest of the crate only sees logical
//! on/off.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use rppal::gpio::{Gpio, InputPin, Level, OutputPin, Trigger};

use crate::buttons::Button;
use crate::channel::{Channel, ChannelOutputs};
use crate::clock::TimerClock;
use crate::config::{ChannelPins, PinConfig};

/// Edges closer together than this are switch bounce and collapse into
/// the first one.
pub const BOUNCE_WINDOW_MS: u64 = 300;

/// Output side of the panel: one relay and three tier LEDs per channel.
pub trait StatusPanel {
    /// Drives one channel's relay and LEDs to the given logical levels.
    fn apply(&mut self, channel: Channel, outputs: &ChannelOutputs);

    /// Forces both relays off, then all six LEDs off.
    fn clear(&mut self);
}

/// Input side: debounced falling-edge events, one pending slot per
/// button.
pub trait EdgeSource {
    /// Consumes the pending edge for `button`, if any.
    fn take(&mut self, button: Button) -> bool;
}

fn relay_level(on: bool) -> Level {
    if on {
        Level::Low
    } else {
        Level::High
    }
}

fn led_level(on: bool) -> Level {
    if on {
        Level::High
    } else {
        Level::Low
    }
}

struct PanelPins {
    relay: OutputPin,
    led0: OutputPin,
    led1: OutputPin,
    led2: OutputPin,
}

impl PanelPins {
    fn acquire(gpio: &Gpio, pins: &ChannelPins) -> rppal::gpio::Result<PanelPins> {
        let mut acquired = PanelPins {
            relay: gpio.get(pins.relay)?.into_output(),
            led0: gpio.get(pins.led0)?.into_output(),
            led1: gpio.get(pins.led1)?.into_output(),
            led2: gpio.get(pins.led2)?.into_output(),
        };
        // Leave the cleared levels on the pins when the process exits.
        acquired.relay.set_reset_on_drop(false);
        acquired.led0.set_reset_on_drop(false);
        acquired.led1.set_reset_on_drop(false);
        acquired.led2.set_reset_on_drop(false);
        Ok(acquired)
    }
}

/// Relay and LED outputs for both channels.
pub struct GpioPanel {
    cool: PanelPins,
    warm: PanelPins,
}

impl StatusPanel for GpioPanel {
    fn apply(&mut self, channel: Channel, outputs: &ChannelOutputs) {
        let pins = match channel {
            Channel::Cool => &mut self.cool,
            Channel::Warm => &mut self.warm,
        };
        pins.relay.write(relay_level(outputs.relay_on));
        pins.led0.write(led_level(outputs.led0));
        pins.led1.write(led_level(outputs.led1));
        pins.led2.write(led_level(outputs.led2));
    }

    fn clear(&mut self) {
        // Relays first, so the actuators drop out before the panel goes
        // dark.
        self.cool.relay.write(relay_level(false));
        self.warm.relay.write(relay_level(false));
        for pins in [&mut self.cool, &mut self.warm] {
            pins.led0.write(led_level(false));
            pins.led1.write(led_level(false));
            pins.led2.write(led_level(false));
        }
    }
}

/// One pending-edge slot, written from the interrupt thread and drained
/// by the button loop.
struct EdgeLatch {
    pending: AtomicBool,
    last_edge_ms: AtomicU64,
}

impl EdgeLatch {
    fn new() -> Self {
        EdgeLatch {
            pending: AtomicBool::new(false),
            last_edge_ms: AtomicU64::new(0),
        }
    }

    /// Records a falling edge at `now_ms`, dropping anything inside the
    /// bounce window of the previously recorded edge. Zero doubles as
    /// "no edge seen yet".
    fn record(&self, now_ms: u64) {
        let last = self.last_edge_ms.load(Ordering::SeqCst);
        if last != 0 && now_ms < last.saturating_add(BOUNCE_WINDOW_MS) {
            return;
        }
        self.last_edge_ms.store(now_ms, Ordering::SeqCst);
        self.pending.store(true, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

/// The four button inputs with their interrupt-fed latches.
pub struct GpioButtons {
    // Held so the async interrupts stay registered.
    _pins: Vec<InputPin>,
    latches: [Arc<EdgeLatch>; 4],
}

impl GpioButtons {
    fn acquire(
        gpio: &Gpio,
        config: &PinConfig,
        clock: TimerClock,
    ) -> rppal::gpio::Result<GpioButtons> {
        let latches = [
            Arc::new(EdgeLatch::new()),
            Arc::new(EdgeLatch::new()),
            Arc::new(EdgeLatch::new()),
            Arc::new(EdgeLatch::new()),
        ];
        let mut pins = Vec::with_capacity(Button::ALL.len());
        for button in Button::ALL {
            let mut pin = gpio.get(config.button_pin(button))?.into_input_pullup();
            let latch = Arc::clone(&latches[button as usize]);
            pin.set_async_interrupt(Trigger::FallingEdge, move |_level| {
                debug!("{} falling edge", button);
                latch.record(clock.now_ms());
            })?;
            pins.push(pin);
        }
        Ok(GpioButtons {
            _pins: pins,
            latches,
        })
    }
}

impl EdgeSource for GpioButtons {
    fn take(&mut self, button: Button) -> bool {
        self.latches[button as usize].take()
    }
}

/// Acquires all twelve pins and wires the button interrupts. Outputs are
/// driven to their off levels before this returns.
pub fn setup(
    config: &PinConfig,
    clock: TimerClock,
) -> rppal::gpio::Result<(GpioPanel, GpioButtons)> {
    let gpio = Gpio::new()?;
    let mut panel = GpioPanel {
        cool: PanelPins::acquire(&gpio, &config.cool)?,
        warm: PanelPins::acquire(&gpio, &config.warm)?,
    };
    panel.clear();
    let buttons = GpioButtons::acquire(&gpio, config, clock)?;
    Ok((panel, buttons))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_collapses_bounce_into_one_edge() {
        let latch = EdgeLatch::new();
        latch.record(1_000);
        assert!(latch.take());

        // Bounce inside the window stays dropped even after a drain.
        latch.record(1_050);
        latch.record(1_250);
        assert!(!latch.take());

        // First edge past the window latches again.
        latch.record(1_301);
        assert!(latch.take());
    }

    #[test]
    fn relay_is_active_low_and_leds_active_high() {
        assert_eq!(relay_level(true), Level::Low);
        assert_eq!(relay_level(false), Level::High);
        assert_eq!(led_level(true), Level::High);
        assert_eq!(led_level(false), Level::Low);
    }
}
