//! Star Dash - a top-down arcade shooter on a wrap-around arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, step, game flow)
//! - `ledger`: Persistent progression (coins, best score, weapon tier, unlocks)
//! - `persistence`: Key/value stores backing the ledger
//! - `platform`: Input intents and haptic feedback mapping
//! - `settings`: Runtime configuration

pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use ledger::{Ledger, WeaponTier};
pub use settings::{ChanceMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation accepts (ms)
    pub const MAX_FRAME_MS: f32 = 60.0;
    /// Reference frame length the per-step chances were tuned at (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 640.0;

    /// Speeds (px/s)
    pub const PLAYER_SPEED: f32 = 240.0;
    pub const BULLET_SPEED: f32 = 520.0;
    pub const ENEMY_BULLET_SPEED: f32 = 320.0;
    pub const LASER_SPEED_FACTOR: f32 = 1.2;
    pub const BOSS_RING_SPEED_FACTOR: f32 = 0.8;

    /// Collision radii
    pub const PLAYER_RADIUS: f32 = 12.0;
    pub const ENEMY_RADIUS: f32 = 14.0;
    pub const STAR_RADIUS: f32 = 8.0;
    pub const COIN_RADIUS: f32 = 7.0;
    pub const POWER_UP_RADIUS: f32 = 10.0;
    pub const BOSS_RADIUS: f32 = 26.0;
    pub const BULLET_WRAP_MARGIN: f32 = 4.0;
    /// Extra reach added to the enemy radius for player bullets
    pub const BULLET_ENEMY_MARGIN: f32 = 4.0;
    /// Extra reach added to the boss radius for player bullets
    pub const BULLET_BOSS_MARGIN: f32 = 6.0;
    /// Enemy bullets hit within player radius + this
    pub const ENEMY_BULLET_MARGIN: f32 = 5.0;

    /// Lifetimes (ms)
    pub const BULLET_LIFE_MS: f32 = 1200.0;
    pub const LASER_LIFE_MS: f32 = 1600.0;
    pub const ENEMY_BULLET_LIFE_MS: f32 = 2000.0;
    pub const BOSS_BULLET_LIFE_MS: f32 = 2200.0;
    pub const COIN_LIFE_MS: f32 = 6000.0;
    pub const POWER_UP_LIFE_MS: f32 = 12000.0;

    /// Invulnerability windows (ms)
    pub const LEVEL_START_INVULNERABLE_MS: f32 = 1200.0;
    pub const RESPAWN_INVULNERABLE_MS: f32 = 1500.0;
    pub const SHIELD_INVULNERABLE_MS: f32 = 4000.0;

    /// Levels before the run wraps back to level 1
    pub const LEVEL_CAP: u32 = 15;
    /// Boss appears on every Nth level
    pub const BOSS_EVERY: u32 = 5;
    pub const MAX_LIVES: u32 = 6;
    pub const STARTING_BOMBS: u32 = 1;
}

/// Unit vector for an angle (radians, screen coordinates)
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector (radians)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
