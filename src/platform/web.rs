//! Browser bindings
//!
//! The page owns the animation frame loop, canvas and DOM listeners. It
//! forwards raw input here, calls `step` with the elapsed time and draws the
//! returned frame.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::haptics::{PURCHASE_PATTERN, frame_pattern};
use super::input::{InputEvent, InputQueue};
use crate::persistence::LocalStorageStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameSession, ShopItem, Snapshot};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    super::init_web();
    log::info!("Star Dash (web) starting...");
}

/// What the page needs after a step
#[derive(Serialize)]
struct Frame<'a> {
    events: &'a [GameEvent],
    /// Vibration pattern to play, empty for none
    vibrate: Vec<u32>,
    snapshot: Snapshot<'a>,
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    queue: InputQueue,
    haptics: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        let haptics = settings.haptics;
        let session = GameSession::new(&settings, Box::new(LocalStorageStore));
        WebGame {
            session,
            queue: InputQueue::new(),
            haptics,
        }
    }

    /// Difficulty button pressed on the title screen
    pub fn start(&mut self, difficulty: &str) -> bool {
        self.queue.clear();
        self.session.start_with_key(difficulty)
    }

    /// `KeyboardEvent.key`; returns true when the key is a game key
    pub fn key(&mut self, key: &str) -> bool {
        match InputEvent::from_key(key) {
            Some(event) => {
                self.queue.push(event);
                true
            }
            None => false,
        }
    }

    /// `DeviceOrientationEvent` angles (degrees)
    pub fn tilt(&mut self, gamma: f32, beta: f32) {
        self.queue.push(InputEvent::from_tilt(gamma, beta));
    }

    /// Shop item ids currently on offer
    pub fn offers(&self) -> Vec<String> {
        self.session
            .shop_offers()
            .iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    /// Buy by id; returns the vibration pattern to play (empty if refused)
    pub fn purchase(&mut self, id: &str) -> Vec<u32> {
        let Some(item) = ShopItem::from_id(id) else {
            log::warn!("Unknown shop item {id:?}");
            return Vec::new();
        };
        match self.session.purchase(item) {
            Ok(()) if self.haptics => PURCHASE_PATTERN.to_vec(),
            Ok(()) => Vec::new(),
            Err(e) => {
                log::info!("Purchase refused: {e}");
                Vec::new()
            }
        }
    }

    pub fn continue_from_shop(&mut self) -> bool {
        self.session.continue_from_shop()
    }

    /// Advance one frame and return it as JSON
    pub fn step(&mut self, dt_ms: f32) -> String {
        let input = self.queue.sample();
        let events = self.session.step(dt_ms, &input);

        let vibrate = if self.haptics {
            frame_pattern(&events).to_vec()
        } else {
            Vec::new()
        };

        let frame = Frame {
            events: &events,
            vibrate,
            snapshot: self.session.snapshot(),
        };
        serde_json::to_string(&frame).unwrap_or_else(|e| {
            log::warn!("Could not serialize frame: {e}");
            String::from("{}")
        })
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
