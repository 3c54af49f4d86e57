//! Level generation
//!
//! A level is fully described by its number, the difficulty profile and the
//! random stream; generating twice from the same RNG state gives the same wave.

use glam::Vec2;
use rand::Rng;

use super::collision::{rand_position, random_sign};
use super::difficulty::DifficultyProfile;
use super::state::{Arena, Boss, Enemy, EnemyKind, PowerUp, PowerUpKind, Star};
use crate::consts::{BOSS_EVERY, POWER_UP_LIFE_MS};

/// Stars keep this far from the edges
pub const STAR_MARGIN: f32 = 40.0;
/// Enemies spawn this far from the edges
pub const ENEMY_MARGIN: f32 = 20.0;
/// Chance a level starts with a power-up
pub const POWER_UP_CHANCE: f32 = 0.7;

/// The entity set for one level visit
#[derive(Debug, Clone)]
pub struct Wave {
    pub enemies: Vec<Enemy>,
    pub stars: Vec<Star>,
    pub power_up: Option<PowerUp>,
    pub boss: Option<Boss>,
}

/// Stars needed to clear a level
pub fn star_goal(level: u32) -> u32 {
    2 + level / 3
}

/// Enemies placed on a level
pub fn enemy_count(level: u32, profile: &DifficultyProfile) -> u32 {
    profile.enemy_count + level / 2
}

/// Whether a level has a boss
pub fn is_boss_level(level: u32) -> bool {
    level > 0 && level.is_multiple_of(BOSS_EVERY)
}

/// Build the wave for `level`
pub fn generate_level(
    level: u32,
    profile: &DifficultyProfile,
    arena: &Arena,
    rng: &mut impl Rng,
) -> Wave {
    let stars = (0..star_goal(level))
        .map(|_| Star {
            pos: rand_position(rng, arena, STAR_MARGIN),
        })
        .collect::<Vec<_>>();

    let enemies = (0..enemy_count(level, profile))
        .map(|i| {
            let kind = EnemyKind::ROTATION[i as usize % EnemyKind::ROTATION.len()];
            let pos = rand_position(rng, arena, ENEMY_MARGIN);
            let vel = Vec2::new(random_sign(rng), random_sign(rng)) * profile.enemy_speed;
            Enemy { pos, vel, kind }
        })
        .collect::<Vec<_>>();

    let power_up = if rng.random::<f32>() < POWER_UP_CHANCE {
        let pos = rand_position(rng, arena, STAR_MARGIN);
        let kind = if rng.random::<f32>() < 0.5 {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Bomb
        };
        Some(PowerUp {
            pos,
            kind,
            life_ms: POWER_UP_LIFE_MS,
        })
    } else {
        None
    };

    let boss = is_boss_level(level).then(|| Boss::new(arena.boss_spawn(), level));

    log::info!(
        "Level {}: {} stars, {} enemies, power-up={:?}, boss={}",
        level,
        stars.len(),
        enemies.len(),
        power_up.as_ref().map(|p| p.kind),
        boss.is_some()
    );

    Wave {
        enemies,
        stars,
        power_up,
        boss,
    }
}
