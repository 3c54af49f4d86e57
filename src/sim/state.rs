//! Entity records and core simulation types
//!
//! Plain data. Behaviour lives in `tick`, level construction in `wave`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::rand_range;
use crate::consts::*;
use crate::unit_from_angle;

/// The wrap-around play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Where a boss appears (right of centre)
    #[inline]
    pub fn boss_spawn(&self) -> Vec2 {
        Vec2::new(self.width * 0.75, self.height * 0.5)
    }
}

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a difficulty choice
    Attract,
    /// Active gameplay
    Playing,
    /// Between levels, shop open
    Shop,
}

/// Discrete things that happened during a step or action
///
/// Consumers (haptics, particles, audio) are optional; nothing in the
/// simulation depends on them being read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { tier: crate::WeaponTier },
    BombDetonated { pos: Vec2 },
    EnemyKilled { pos: Vec2, dropped_coin: bool },
    BossHit { pos: Vec2, hp: i32 },
    BossDefeated { pos: Vec2 },
    StarCollected { remaining: usize },
    CoinCollected { balance: u64 },
    PowerUpCollected { kind: PowerUpKind },
    PlayerHit { lives: u32 },
    LevelCleared { level: u32 },
    GameOver { score: u64, best: u64 },
}

/// Cardinal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in screen coordinates (y grows downward)
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Unit vector the ship points (and moves) along
    pub facing: Vec2,
    pub lives: u32,
    pub bombs: u32,
    /// Remaining invulnerability (ms), damage is ignored while > 0
    pub invulnerable_ms: f32,
}

impl Player {
    pub fn new(pos: Vec2, lives: u32) -> Self {
        Self {
            pos,
            facing: Vec2::X,
            lives,
            bombs: STARTING_BOMBS,
            invulnerable_ms: 0.0,
        }
    }

    /// Where bullets leave the ship
    pub fn nose(&self) -> Vec2 {
        self.pos + self.facing * (PLAYER_RADIUS + 4.0)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Extend invulnerability to at least `ms` (never shortens it)
    pub fn shield(&mut self, ms: f32) {
        self.invulnerable_ms = self.invulnerable_ms.max(ms);
    }
}

/// Enemy behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Homes in on the player
    Chaser,
    /// Drifts, occasionally reversing an axis
    Patrol,
    /// Drifts and fires at the player
    Shooter,
}

impl EnemyKind {
    /// Kinds in wave assignment order
    pub const ROTATION: [EnemyKind; 3] = [EnemyKind::Chaser, EnemyKind::Patrol, EnemyKind::Shooter];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: EnemyKind,
}

/// Bullet flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    Standard,
    /// Faster, longer lived, double damage against the boss
    Laser,
}

impl BulletKind {
    /// Damage dealt to the boss per hit
    ///
    /// Matches the weapon tier that fired the bullet: the tier only changes in
    /// the shop, and entering a level clears every bullet in flight.
    pub fn boss_damage(&self) -> i32 {
        match self {
            BulletKind::Standard => 1,
            BulletKind::Laser => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life_ms: f32,
    pub kind: BulletKind,
}

impl Bullet {
    /// Standard player bullet travelling at `angle`
    pub fn player(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            vel: unit_from_angle(angle) * BULLET_SPEED,
            life_ms: BULLET_LIFE_MS,
            kind: BulletKind::Standard,
        }
    }

    /// Laser-tier player bullet
    pub fn laser(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            vel: unit_from_angle(angle) * BULLET_SPEED * LASER_SPEED_FACTOR,
            life_ms: LASER_LIFE_MS,
            kind: BulletKind::Laser,
        }
    }

    /// Enemy bullet aimed from `from` toward `target`
    pub fn aimed(from: Vec2, target: Vec2) -> Self {
        let dir = (target - from).normalize_or(Vec2::X);
        Self {
            pos: from,
            vel: dir * ENEMY_BULLET_SPEED,
            life_ms: ENEMY_BULLET_LIFE_MS,
            kind: BulletKind::Standard,
        }
    }

    /// One bullet of a boss ring
    pub fn ring(from: Vec2, angle: f32) -> Self {
        Self {
            pos: from,
            vel: unit_from_angle(angle) * ENEMY_BULLET_SPEED * BOSS_RING_SPEED_FACTOR,
            life_ms: BOSS_BULLET_LIFE_MS,
            kind: BulletKind::Standard,
        }
    }

    /// Advance and count down; returns false once expired
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.pos += self.vel * (dt_ms / 1000.0);
        self.life_ms -= dt_ms;
        self.life_ms > 0.0
    }
}

/// The level-5n guardian
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// Time alive (ms), drives the motion pattern and ring rotation
    pub elapsed_ms: f32,
    /// Level the boss was spawned for
    pub level: u32,
}

impl Boss {
    /// Hit points for a boss on `level`
    pub fn hp_for_level(level: u32) -> i32 {
        12 + 2 * level as i32
    }

    pub fn new(pos: Vec2, level: u32) -> Self {
        let hp = Self::hp_for_level(level);
        Self {
            pos,
            hp,
            max_hp: hp,
            elapsed_ms: 0.0,
            level,
        }
    }

    /// Remaining health as a 0..=1 fraction (for the health bar)
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp.max(0) as f32 / self.max_hp as f32).min(1.0)
    }
}

/// Level objective collectible
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
}

/// Currency pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life_ms: f32,
}

impl Coin {
    /// Coin dropped by a destroyed enemy, scattering slowly
    pub fn dropped(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(rand_range(rng, -20.0, 20.0), rand_range(rng, -20.0, 20.0)),
            life_ms: COIN_LIFE_MS,
        }
    }
}

/// Per-step velocity damping for coins
pub const COIN_DAMPING: f32 = 0.98;
/// Currency per coin
pub const COIN_VALUE: u64 = 5;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Bomb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub life_ms: f32,
}

/// Score awards
pub const SCORE_ENEMY: u64 = 30;
pub const SCORE_BOSS_HIT: u64 = 5;
pub const SCORE_STAR: u64 = 15;
/// Coins awarded for defeating a boss
pub const BOSS_BOUNTY: u64 = 30;
/// Bomb damage to the boss (never below 1 hp)
pub const BOMB_BOSS_DAMAGE: i32 = 8;

/// All live entities of a level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub boss: Option<Boss>,
    pub stars: Vec<Star>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
}

impl World {
    /// Drop every transient entity
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.boss = None;
        self.stars.clear();
        self.coins.clear();
        self.power_ups.clear();
    }

    /// A level is cleared once every star is collected and no boss remains
    pub fn is_cleared(&self) -> bool {
        self.stars.is_empty() && self.boss.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_hp_formula() {
        assert_eq!(Boss::hp_for_level(5), 22);
        assert_eq!(Boss::hp_for_level(10), 32);
        let boss = Boss::new(Vec2::ZERO, 15);
        assert_eq!(boss.hp, 42);
        assert_eq!(boss.health_fraction(), 1.0);
    }

    #[test]
    fn test_shield_never_shortens() {
        let mut player = Player::new(Vec2::ZERO, 3);
        player.invulnerable_ms = 5000.0;
        player.shield(SHIELD_INVULNERABLE_MS);
        assert_eq!(player.invulnerable_ms, 5000.0);

        player.invulnerable_ms = 100.0;
        player.shield(SHIELD_INVULNERABLE_MS);
        assert_eq!(player.invulnerable_ms, 4000.0);
    }

    #[test]
    fn test_bullet_expiry() {
        let mut bullet = Bullet::player(Vec2::ZERO, 0.0);
        assert!(bullet.advance(1000.0));
        assert!((bullet.pos.x - BULLET_SPEED).abs() < 0.01);
        assert!(!bullet.advance(200.0));
    }

    #[test]
    fn test_laser_is_faster() {
        let laser = Bullet::laser(Vec2::ZERO, 0.0);
        assert_eq!(laser.kind, BulletKind::Laser);
        assert!((laser.vel.length() - 624.0).abs() < 0.01);
        assert_eq!(laser.life_ms, LASER_LIFE_MS);
    }

    #[test]
    fn test_world_cleared() {
        let mut world = World::default();
        assert!(world.is_cleared());
        world.boss = Some(Boss::new(Vec2::ZERO, 5));
        assert!(!world.is_cleared());
        world.boss = None;
        world.stars.push(Star { pos: Vec2::ZERO });
        assert!(!world.is_cleared());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn shield_is_monotonic(
                current in 0.0f32..10_000.0,
                grant in 0.0f32..10_000.0,
            ) {
                let mut player = Player::new(Vec2::ZERO, 3);
                player.invulnerable_ms = current;
                player.shield(grant);
                prop_assert!(player.invulnerable_ms >= current);
                prop_assert!(player.invulnerable_ms >= grant);
            }
        }
    }
}
