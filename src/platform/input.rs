//! Input handling
//!
//! Hosts push discrete `InputEvent`s as they arrive; the frame loop drains
//! them into one `TickInput` per step.

use std::collections::VecDeque;

use crate::sim::{Direction, TickInput};

/// Tilt angle (degrees) that counts as full deflection
pub const TILT_FULL_SCALE_DEG: f32 = 30.0;

/// Default queue capacity, plenty for one frame of input
const DEFAULT_CAPACITY: usize = 32;

/// A single player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Direction(Direction),
    Fire,
    Bomb,
}

impl InputEvent {
    /// Keyboard mapping (`KeyboardEvent.key` style names, case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        let event = match key.to_lowercase().as_str() {
            "w" | "arrowup" => InputEvent::Direction(Direction::Up),
            "s" | "arrowdown" => InputEvent::Direction(Direction::Down),
            "a" | "arrowleft" => InputEvent::Direction(Direction::Left),
            "d" | "arrowright" => InputEvent::Direction(Direction::Right),
            " " | "space" => InputEvent::Fire,
            "b" => InputEvent::Bomb,
            _ => return None,
        };
        Some(event)
    }

    /// Device orientation mapping; the dominant axis wins
    ///
    /// `gamma` tilts left/right, `beta` front/back (degrees). Non-finite
    /// readings count as level.
    pub fn from_tilt(gamma: f32, beta: f32) -> Self {
        let axis = |deg: f32| {
            if deg.is_finite() {
                (deg / TILT_FULL_SCALE_DEG).clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };
        let ax = axis(gamma);
        let ay = axis(beta);

        let direction = if ax.abs() > ay.abs() {
            if ax < 0.0 { Direction::Left } else { Direction::Right }
        } else if ay < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };
        InputEvent::Direction(direction)
    }
}

/// Bounded FIFO of pending input events
#[derive(Debug)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue an event; returns false (and drops it) when full
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= self.capacity {
            log::debug!("Input queue full, dropping {event:?}");
            return false;
        }
        self.events.push_back(event);
        true
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain everything queued into a single step's input
    pub fn sample(&mut self) -> TickInput {
        let mut input = TickInput::default();
        for event in self.events.drain(..) {
            match event {
                InputEvent::Direction(direction) => input.direction = Some(direction),
                InputEvent::Fire => input.fire = true,
                InputEvent::Bomb => input.bomb = true,
            }
        }
        input
    }

    /// Forget pending input (e.g., on focus loss)
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
