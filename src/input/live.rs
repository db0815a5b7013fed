//! Live capture: polls the system pointer and enumerates monitors.
//!
//! SIGINT/SIGTERM stop tracking and save; SIGUSR1 toggles move recording.

use super::events::MouseButton;
use crate::layout::Monitor;
use crate::output::SaveTarget;
use crate::track::Tracker;
use anyhow::{Context, Result, anyhow};
use device_query::{DeviceQuery, DeviceState};
use display_info::DisplayInfo;
use log::{debug, info};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Asks the OS for the current monitor layout.
pub fn enumerate_monitors() -> Result<Vec<Monitor>> {
    let displays =
        DisplayInfo::all().map_err(|err| anyhow!("monitor enumeration failed: {err}"))?;
    Ok(displays
        .into_iter()
        .map(|d| Monitor::new(d.x, d.y, d.width as i32, d.height as i32, d.is_primary))
        .collect())
}

/// Index of `button` in device_query's `button_pressed` vector.
fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 1,
        // X11 numbers the wheel button 2 and the right button 3
        #[cfg(target_os = "linux")]
        MouseButton::Middle => 2,
        #[cfg(target_os = "linux")]
        MouseButton::Right => 3,
        #[cfg(not(target_os = "linux"))]
        MouseButton::Right => 2,
        #[cfg(not(target_os = "linux"))]
        MouseButton::Middle => 3,
    }
}

/// Runs a tracking session until SIGINT/SIGTERM, then stops and saves.
pub fn run(tracker: &mut Tracker, target: &SaveTarget, poll_interval: Duration) -> Result<PathBuf> {
    let quit = Arc::new(AtomicBool::new(false));
    let toggle_moves = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&quit))
            .context("Failed to register stop signal handler")?;
    }
    signal_hook::flag::register(SIGUSR1, Arc::clone(&toggle_moves))
        .context("Failed to register SIGUSR1 handler")?;

    let device = DeviceState::new();
    let mut held = [false; 3];

    tracker.start()?;
    info!("Tracking pointer; press Ctrl+C to stop and save");

    while !quit.load(Ordering::SeqCst) {
        if toggle_moves.swap(false, Ordering::SeqCst) {
            let settings = tracker.settings();
            let enabled = !settings.move_enabled();
            settings.set_move_enabled(enabled);
            info!("Move recording {}", if enabled { "enabled" } else { "disabled" });
        }

        let mouse = device.get_mouse();
        let (x, y) = mouse.coords;
        tracker.on_move(x, y);

        for (slot, button) in MouseButton::ALL.into_iter().enumerate() {
            let pressed = mouse
                .button_pressed
                .get(button_index(button))
                .copied()
                .unwrap_or(false);
            if pressed != held[slot] {
                held[slot] = pressed;
                if tracker.on_click(x, y, button, pressed) {
                    debug!("{} click marker at ({}, {})", button, x, y);
                }
            }
        }

        thread::sleep(poll_interval);
    }

    info!("Stop requested");
    tracker.stop()?;
    let path = tracker.save(&target.directory, target.create_dir, target.clean)?;
    Ok(path)
}
