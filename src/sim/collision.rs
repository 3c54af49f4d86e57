//! Collision and arena geometry
//!
//! Everything in Star Dash is a circle, and the arena is a torus: anything that
//! leaves one edge (by more than its wrap margin) reappears on the opposite one.

use glam::Vec2;
use rand::Rng;

use super::state::Arena;
use crate::consts::REFERENCE_FRAME_MS;
use crate::settings::ChanceMode;

/// Circle-circle overlap test (strict, touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) < reach * reach
}

/// Wrap a position around the arena edges
///
/// Positions stay within `[-margin, size + margin]` on both axes.
pub fn wrap(pos: &mut Vec2, margin: f32, arena: &Arena) {
    if !pos.x.is_finite() || !pos.y.is_finite() {
        *pos = arena.center();
        return;
    }
    if pos.x < -margin {
        pos.x = arena.width + margin;
    }
    if pos.x > arena.width + margin {
        pos.x = -margin;
    }
    if pos.y < -margin {
        pos.y = arena.height + margin;
    }
    if pos.y > arena.height + margin {
        pos.y = -margin;
    }
}

/// Uniform random value in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn rand_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Random position inside the arena, keeping `margin` away from every edge
pub fn rand_position(rng: &mut impl Rng, arena: &Arena, margin: f32) -> Vec2 {
    Vec2::new(
        rand_range(rng, margin, arena.width - margin),
        rand_range(rng, margin, arena.height - margin),
    )
}

/// -1.0 or 1.0 with equal probability
#[inline]
pub fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 }
}

/// Chance for this step of an event tuned as "probability per 60 Hz frame"
pub fn step_chance(base: f32, dt_ms: f32, mode: ChanceMode) -> f32 {
    let base = base.clamp(0.0, 1.0);
    match mode {
        ChanceMode::PerFrame => base,
        ChanceMode::TimeNormalized => {
            if dt_ms <= 0.0 {
                return 0.0;
            }
            1.0 - (1.0 - base).powf(dt_ms / REFERENCE_FRAME_MS)
        }
    }
}

/// Roll an event tuned as a per-frame probability
#[inline]
pub fn roll(rng: &mut impl Rng, base: f32, dt_ms: f32, mode: ChanceMode) -> bool {
    rng.random::<f32>() < step_chance(base, dt_ms, mode)
}
