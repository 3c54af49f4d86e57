//! Platform abstraction layer
//!
//! Thin adapters between the host and the simulation:
//! - Input events (keyboard, buttons, device tilt) queued into `TickInput`
//! - Haptic patterns for game events

pub mod haptics;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use haptics::{PURCHASE_PATTERN, frame_pattern, vibration_pattern};
pub use input::{InputEvent, InputQueue, TILT_FULL_SCALE_DEG};

/// Route `log` output to the browser console and install the panic hook
#[cfg(target_arch = "wasm32")]
pub fn init_web() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already installed");
    }
}
