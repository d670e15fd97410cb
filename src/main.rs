use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use log::{error, info, LevelFilter};
use syslog::Facility;

use climate_timer::gpio::StatusPanel;
use climate_timer::{control, gpio, ControlState, PinConfig, TimerClock};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = PinConfig::from_env().context("reading pin configuration")?;

    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))
        .context("registering SIGINT handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&term))
        .context("registering SIGTERM handler")?;

    let clock = TimerClock::new();
    let state = Arc::new(ControlState::new(clock.now_ms()));

    let (panel, edges) = gpio::setup(&config, clock).context("setting up GPIO")?;
    info!("pins acquired, outputs cleared, both channels idle");

    let status_thread = {
        let state = Arc::clone(&state);
        let term = Arc::clone(&term);
        thread::spawn(move || control::run_status_loop(state, panel, clock, term))
    };

    let button_thread = {
        let state = Arc::clone(&state);
        let term = Arc::clone(&term);
        thread::spawn(move || control::run_button_loop(state, edges, clock, term))
    };

    if button_thread.join().is_err() {
        error!("button thread panicked");
    }
    match status_thread.join() {
        Ok(mut panel) => {
            // Terminal action, exactly once: relays off, then LEDs off.
            panel.clear();
            info!("outputs cleared, exiting");
        }
        Err(_) => error!("status thread panicked before the final clear"),
    }
    Ok(())
}

fn init_logging() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    if let Err(err) = syslog::init(Facility::LOG_USER, level, Some("climate-timer")) {
        eprintln!("unable to connect to syslog, running without logging: {}", err);
    }
}
