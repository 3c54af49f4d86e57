//! Frame step
//!
//! Advances a session by one frame delta. Phases run in a fixed order so a
//! frame is reproducible from the seed and the input sequence:
//!
//! 1. input (facing, fire, bomb)
//! 2. player motion
//! 3. bullets
//! 4. enemy AI
//! 5. player bullets vs enemies, then vs boss
//! 6. boss motion and ring shots
//! 7. stars, coins, power-ups
//! 8. damage to the player
//! 9. level clear check

use glam::Vec2;
use rand::Rng;
use std::f32::consts::FRAC_PI_4;

use super::collision::{circles_overlap, roll, wrap};
use super::session::GameSession;
use super::state::*;
use crate::angle_of;
use crate::consts::*;
use crate::ledger::WeaponTier;

/// Chance a patrol reverses an axis (per 60 Hz frame, per axis)
pub const PATROL_TURN_CHANCE: f32 = 0.01;
/// Chance the boss fires a ring (per 60 Hz frame)
pub const BOSS_RING_CHANCE: f32 = 0.02;
/// Bullets in a boss ring
pub const BOSS_RING_BULLETS: u32 = 8;
/// Chance a destroyed enemy drops a coin
pub const COIN_DROP_CHANCE: f32 = 0.6;
/// Angular offset of the two double-shot bullets (radians)
pub const DOUBLE_SHOT_SPREAD: f32 = 0.08;
/// Angular offset of the outer spread-shot bullets (radians)
pub const SPREAD_SHOT_SPREAD: f32 = 0.18;

/// Input intents for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// New facing (the ship keeps moving along its facing)
    pub direction: Option<Direction>,
    /// Fire the current weapon once
    pub fire: bool,
    /// Detonate a bomb
    pub bomb: bool,
}

/// Clamp a host frame delta: negative or NaN becomes 0, stalls are capped
pub fn clamp_dt(dt_ms: f32, max_ms: f32) -> f32 {
    if dt_ms.is_nan() || dt_ms <= 0.0 {
        0.0
    } else {
        dt_ms.min(max_ms)
    }
}

/// Advance the session by one frame
///
/// Only does anything while `Playing`. Flow transitions for the returned
/// `LevelCleared`/`GameOver` events are applied by `GameSession::step`.
pub fn tick(session: &mut GameSession, input: &TickInput, dt_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.phase != GamePhase::Playing {
        return events;
    }
    let dt = clamp_dt(dt_ms, session.max_frame_ms);

    if let Some(direction) = input.direction {
        session.player.facing = direction.to_vec2();
    }
    if input.fire {
        events.extend(shoot(session));
    }
    if input.bomb {
        events.extend(bomb(session));
    }

    move_player(session, dt);
    advance_bullets(session, dt);
    update_enemies(session, dt);
    bullets_vs_enemies(session, &mut events);
    bullets_vs_boss(session, &mut events);
    update_boss(session, dt);
    collect_stars(session, &mut events);
    update_coins(session, dt, &mut events);
    update_power_ups(session, dt, &mut events);

    if resolve_damage(session, dt, &mut events) {
        return events;
    }

    if session.world.is_cleared() {
        events.push(GameEvent::LevelCleared {
            level: session.level,
        });
    }

    events
}

fn move_player(session: &mut GameSession, dt: f32) {
    let player = &mut session.player;
    let dir = player.facing.normalize_or_zero();
    player.pos += dir * PLAYER_SPEED * (dt / 1000.0);
    wrap(&mut player.pos, PLAYER_RADIUS + 2.0, &session.arena);
}

fn advance_bullets(session: &mut GameSession, dt: f32) {
    let arena = session.arena;
    for bullets in [&mut session.world.bullets, &mut session.world.enemy_bullets] {
        bullets.retain_mut(|b| {
            if !b.advance(dt) {
                return false;
            }
            wrap(&mut b.pos, BULLET_WRAP_MARGIN, &arena);
            true
        });
    }
}

fn update_enemies(session: &mut GameSession, dt: f32) {
    let profile = session.difficulty.profile();
    let level = session.level;
    let target = session.player.pos;
    let mode = session.chance_mode;
    let arena = session.arena;
    let secs = dt / 1000.0;

    let mut shots = Vec::new();
    for enemy in &mut session.world.enemies {
        match enemy.kind {
            EnemyKind::Chaser => {
                let dir = (target - enemy.pos).normalize_or(Vec2::X);
                enemy.vel = dir * profile.chaser_speed(level);
            }
            EnemyKind::Patrol => {
                if roll(&mut session.rng, PATROL_TURN_CHANCE, dt, mode) {
                    enemy.vel.x = -enemy.vel.x;
                }
                if roll(&mut session.rng, PATROL_TURN_CHANCE, dt, mode) {
                    enemy.vel.y = -enemy.vel.y;
                }
            }
            EnemyKind::Shooter => {
                if roll(&mut session.rng, profile.shooter_chance(level), dt, mode) {
                    shots.push(Bullet::aimed(enemy.pos, target));
                }
            }
        }
        enemy.pos += enemy.vel * secs;
        wrap(&mut enemy.pos, ENEMY_RADIUS + 2.0, &arena);
    }
    session.world.enemy_bullets.extend(shots);
}

/// Each enemy is destroyed by at most one bullet, and each bullet destroys
/// at most one enemy
fn bullets_vs_enemies(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let reach = ENEMY_RADIUS + BULLET_ENEMY_MARGIN;
    let world = &mut session.world;

    let mut i = world.enemies.len();
    while i > 0 {
        i -= 1;
        let pos = world.enemies[i].pos;
        let Some(j) = world
            .bullets
            .iter()
            .rposition(|b| circles_overlap(b.pos, pos, reach))
        else {
            continue;
        };

        world.bullets.remove(j);
        world.enemies.remove(i);
        session.score += SCORE_ENEMY;

        let dropped_coin = session.rng.random::<f32>() < COIN_DROP_CHANCE;
        if dropped_coin {
            world.coins.push(Coin::dropped(pos, &mut session.rng));
        }
        events.push(GameEvent::EnemyKilled { pos, dropped_coin });
    }
}

fn bullets_vs_boss(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let Some(boss) = session.world.boss.as_mut() else {
        return;
    };
    let reach = BOSS_RADIUS + BULLET_BOSS_MARGIN;
    let bullets = &mut session.world.bullets;

    let mut j = bullets.len();
    while j > 0 {
        j -= 1;
        if !circles_overlap(bullets[j].pos, boss.pos, reach) {
            continue;
        }
        let bullet = bullets.remove(j);
        boss.hp -= bullet.kind.boss_damage();
        session.score += SCORE_BOSS_HIT;
        events.push(GameEvent::BossHit {
            pos: boss.pos,
            hp: boss.hp,
        });
        if boss.hp <= 0 {
            break;
        }
    }

    if boss.hp <= 0 {
        let pos = boss.pos;
        session.world.boss = None;
        session.ledger.coins += BOSS_BOUNTY;
        session.persist();
        log::info!("Boss defeated on level {}", session.level);
        events.push(GameEvent::BossDefeated { pos });
    }
}

fn update_boss(session: &mut GameSession, dt: f32) {
    let Some(boss) = session.world.boss.as_mut() else {
        return;
    };
    let secs = dt / 1000.0;

    boss.elapsed_ms += dt;
    let t = boss.elapsed_ms;
    boss.pos.x += (t * 0.002).cos() * 60.0 * secs;
    boss.pos.y += (t * 0.0018).sin() * 40.0 * secs;

    if roll(&mut session.rng, BOSS_RING_CHANCE, dt, session.chance_mode) {
        for k in 0..BOSS_RING_BULLETS {
            let angle = k as f32 * FRAC_PI_4 + t * 0.002;
            session.world.enemy_bullets.push(Bullet::ring(boss.pos, angle));
        }
    }

    wrap(&mut boss.pos, BOSS_RADIUS + 4.0, &session.arena);
}

fn collect_stars(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let player = session.player.pos;
    let stars = &mut session.world.stars;

    let mut i = stars.len();
    while i > 0 {
        i -= 1;
        if circles_overlap(stars[i].pos, player, STAR_RADIUS + PLAYER_RADIUS) {
            stars.remove(i);
            session.score += SCORE_STAR;
            events.push(GameEvent::StarCollected {
                remaining: stars.len(),
            });
        }
    }
}

fn update_coins(session: &mut GameSession, dt: f32, events: &mut Vec<GameEvent>) {
    let player = session.player.pos;
    let arena = session.arena;
    let secs = dt / 1000.0;
    let mut collected = false;

    let coins = &mut session.world.coins;
    let mut i = coins.len();
    while i > 0 {
        i -= 1;
        let coin = &mut coins[i];
        coin.pos += coin.vel * secs;
        coin.vel *= COIN_DAMPING;
        coin.life_ms -= dt;
        if coin.life_ms <= 0.0 {
            coins.remove(i);
            continue;
        }
        wrap(&mut coin.pos, COIN_RADIUS + 2.0, &arena);
        if circles_overlap(coin.pos, player, COIN_RADIUS + PLAYER_RADIUS) {
            coins.remove(i);
            session.ledger.coins += COIN_VALUE;
            collected = true;
            events.push(GameEvent::CoinCollected {
                balance: session.ledger.coins,
            });
        }
    }

    if collected {
        session.persist();
    }
}

fn update_power_ups(session: &mut GameSession, dt: f32, events: &mut Vec<GameEvent>) {
    let player = &mut session.player;
    let power_ups = &mut session.world.power_ups;

    let mut i = power_ups.len();
    while i > 0 {
        i -= 1;
        power_ups[i].life_ms -= dt;
        if power_ups[i].life_ms <= 0.0 {
            power_ups.remove(i);
            continue;
        }
        if circles_overlap(power_ups[i].pos, player.pos, POWER_UP_RADIUS + PLAYER_RADIUS) {
            let kind = power_ups.remove(i).kind;
            match kind {
                PowerUpKind::Shield => player.shield(SHIELD_INVULNERABLE_MS),
                PowerUpKind::Bomb => player.bombs += 1,
            }
            events.push(GameEvent::PowerUpCollected { kind });
        }
    }
}

/// Test the player against enemy bullets, enemies and the boss
///
/// Each source category can land at most one hit per frame. Returns true
/// once the run is over, in which case nothing else is checked.
fn resolve_damage(session: &mut GameSession, dt: f32, events: &mut Vec<GameEvent>) -> bool {
    if session.player.invulnerable_ms > 0.0 {
        session.player.invulnerable_ms = (session.player.invulnerable_ms - dt).max(0.0);
    }
    if session.player.is_invulnerable() {
        return false;
    }

    let bullet_reach = PLAYER_RADIUS + ENEMY_BULLET_MARGIN;
    let shot = session
        .world
        .enemy_bullets
        .iter()
        .any(|b| circles_overlap(b.pos, session.player.pos, bullet_reach));
    if shot && take_hit(session, events) {
        return true;
    }

    let enemy_reach = ENEMY_RADIUS + PLAYER_RADIUS;
    let rammed = session
        .world
        .enemies
        .iter()
        .any(|e| circles_overlap(e.pos, session.player.pos, enemy_reach));
    if rammed && take_hit(session, events) {
        return true;
    }

    let boss_reach = BOSS_RADIUS + PLAYER_RADIUS;
    let boss_touch = session
        .world
        .boss
        .as_ref()
        .is_some_and(|boss| circles_overlap(boss.pos, session.player.pos, boss_reach));
    boss_touch && take_hit(session, events)
}

/// Lose a life; respawn at the centre or end the run
///
/// Returns true when that was the last life.
pub fn take_hit(session: &mut GameSession, events: &mut Vec<GameEvent>) -> bool {
    let player = &mut session.player;
    player.lives = player.lives.saturating_sub(1);
    events.push(GameEvent::PlayerHit {
        lives: player.lives,
    });

    if player.lives == 0 {
        events.push(GameEvent::GameOver {
            score: session.score,
            best: session.ledger.best.max(session.score),
        });
        return true;
    }

    player.pos = session.arena.center();
    player.invulnerable_ms = RESPAWN_INVULNERABLE_MS;
    log::debug!("Player hit, {} lives left", player.lives);
    false
}

/// Spawn the bullets for the current weapon tier from the ship's nose
pub fn shoot(session: &mut GameSession) -> Option<GameEvent> {
    if session.phase != GamePhase::Playing {
        return None;
    }
    let angle = angle_of(session.player.facing);
    let nose = session.player.nose();
    let tier = session.ledger.weapon;
    let bullets = &mut session.world.bullets;

    match tier {
        WeaponTier::Single => bullets.push(Bullet::player(nose, angle)),
        WeaponTier::Double => {
            bullets.push(Bullet::player(nose, angle + DOUBLE_SHOT_SPREAD));
            bullets.push(Bullet::player(nose, angle - DOUBLE_SHOT_SPREAD));
        }
        WeaponTier::Spread => {
            bullets.push(Bullet::player(nose, angle));
            bullets.push(Bullet::player(nose, angle + SPREAD_SHOT_SPREAD));
            bullets.push(Bullet::player(nose, angle - SPREAD_SHOT_SPREAD));
        }
        WeaponTier::Laser => bullets.push(Bullet::laser(nose, angle)),
    }
    Some(GameEvent::Fired { tier })
}

/// Clear every enemy and enemy bullet, and wound (never kill) the boss
///
/// Does nothing without a bomb charge.
pub fn bomb(session: &mut GameSession) -> Option<GameEvent> {
    if session.phase != GamePhase::Playing || session.player.bombs == 0 {
        return None;
    }
    session.player.bombs -= 1;
    session.world.enemies.clear();
    session.world.enemy_bullets.clear();
    if let Some(boss) = session.world.boss.as_mut() {
        boss.hp = (boss.hp - BOMB_BOSS_DAMAGE).max(1);
    }
    log::debug!("Bomb detonated, {} left", session.player.bombs);
    Some(GameEvent::BombDetonated {
        pos: session.player.pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, ProgressStore};
    use crate::settings::{ChanceMode, Settings};
    use crate::sim::Difficulty;

    const FRAME: f32 = 1000.0 / 60.0;

    /// A running session with an empty arena except for one far-away star
    fn quiet_session() -> GameSession {
        let settings = Settings {
            seed: Some(12345),
            ..Default::default()
        };
        let mut session = GameSession::new(&settings, Box::new(MemoryStore::new()));
        session.start(Difficulty::Easy);
        session.world.clear();
        session.world.stars.push(Star {
            pos: Vec2::new(40.0, 40.0),
        });
        session.player.invulnerable_ms = 0.0;
        session
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(f32::NAN, 60.0), 0.0);
        assert_eq!(clamp_dt(-5.0, 60.0), 0.0);
        assert_eq!(clamp_dt(500.0, 60.0), 60.0);
        assert_eq!(clamp_dt(f32::INFINITY, 60.0), 60.0);
        assert_eq!(clamp_dt(16.0, 60.0), 16.0);
    }

    #[test]
    fn test_player_moves_along_facing_and_wraps() {
        let mut session = quiet_session();
        let start = session.player.pos;
        let input = TickInput {
            direction: Some(Direction::Up),
            ..Default::default()
        };
        session.step(50.0, &input);
        assert!((session.player.pos.y - (start.y - 12.0)).abs() < 1e-3);
        assert_eq!(session.player.pos.x, start.x);

        session.player.pos = Vec2::new(5.0, -13.0);
        session.step(50.0, &TickInput::default());
        assert_eq!(session.player.pos.y, session.arena.height + 14.0);
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut session = quiet_session();
        let start = session.player.pos;
        session.step(10_000.0, &TickInput::default());
        let moved = session.player.pos.x - start.x;
        assert!((moved - PLAYER_SPEED * 0.06).abs() < 1e-3);
    }

    #[test]
    fn test_negative_dt_changes_nothing_in_motion() {
        let mut session = quiet_session();
        let start = session.player.pos;
        session.world.bullets.push(Bullet::player(Vec2::new(300.0, 300.0), 0.0));
        session.step(-30.0, &TickInput::default());
        assert_eq!(session.player.pos, start);
        assert_eq!(session.world.bullets[0].life_ms, BULLET_LIFE_MS);
    }

    #[test]
    fn test_weapon_patterns() {
        let cases = [
            (WeaponTier::Single, 1),
            (WeaponTier::Double, 2),
            (WeaponTier::Spread, 3),
            (WeaponTier::Laser, 1),
        ];
        for (tier, count) in cases {
            let mut session = quiet_session();
            session.ledger.weapon = tier;
            assert_eq!(session.shoot(), Some(GameEvent::Fired { tier }));
            assert_eq!(session.world.bullets.len(), count, "{tier:?}");
        }

        let mut session = quiet_session();
        session.ledger.weapon = WeaponTier::Spread;
        session.shoot();
        let angles: Vec<f32> = session.world.bullets.iter().map(|b| angle_of(b.vel)).collect();
        assert!(angles[0].abs() < 1e-5);
        assert!((angles[1] - 0.18).abs() < 1e-5);
        assert!((angles[2] + 0.18).abs() < 1e-5);

        let mut session = quiet_session();
        session.ledger.weapon = WeaponTier::Laser;
        session.shoot();
        assert_eq!(session.world.bullets[0].kind, BulletKind::Laser);
    }

    #[test]
    fn test_bullets_leave_from_nose() {
        let mut session = quiet_session();
        session.player.facing = Direction::Down.to_vec2();
        session.shoot();
        let bullet = &session.world.bullets[0];
        assert_eq!(bullet.pos, session.player.pos + Vec2::new(0.0, 16.0));
        assert!(bullet.vel.y > 0.0);
    }

    #[test]
    fn test_bullet_kills_one_enemy() {
        let mut session = quiet_session();
        let pos = Vec2::new(500.0, 100.0);
        session.world.enemies.push(Enemy {
            pos,
            vel: Vec2::ZERO,
            kind: EnemyKind::Patrol,
        });
        session.world.enemies.push(Enemy {
            pos,
            vel: Vec2::ZERO,
            kind: EnemyKind::Patrol,
        });
        session.world.bullets.push(Bullet::player(pos, 0.0));

        let events = session.step(0.0, &TickInput::default());
        let kills = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        assert_eq!(session.world.enemies.len(), 1);
        assert!(session.world.bullets.is_empty());
        assert_eq!(session.score, SCORE_ENEMY);
    }

    #[test]
    fn test_laser_hits_boss_twice_as_hard() {
        let mut session = quiet_session();
        let boss_pos = Vec2::new(700.0, 300.0);
        session.world.boss = Some(Boss::new(boss_pos, 5));
        session.world.bullets.push(Bullet::laser(boss_pos, 0.0));
        session.world.bullets.push(Bullet::player(boss_pos, 0.0));

        let events = session.step(0.0, &TickInput::default());
        assert_eq!(session.world.boss.as_ref().map(|b| b.hp), Some(19));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::BossHit { .. }))
                .count(),
            2
        );
        assert_eq!(session.score, 2 * SCORE_BOSS_HIT);
    }

    #[test]
    fn test_bomb_without_charge_is_noop() {
        let mut session = quiet_session();
        session.player.bombs = 0;
        session.world.enemies.push(Enemy {
            pos: Vec2::new(100.0, 500.0),
            vel: Vec2::ZERO,
            kind: EnemyKind::Chaser,
        });
        let coins = session.ledger.coins;

        assert_eq!(session.bomb(), None);
        assert_eq!(session.world.enemies.len(), 1);
        assert_eq!(session.score, 0);
        assert_eq!(session.ledger.coins, coins);
    }

    #[test]
    fn test_bomb_clears_and_wounds_boss() {
        let mut session = quiet_session();
        session.player.bombs = 2;
        session.world.enemies.push(Enemy {
            pos: Vec2::new(100.0, 500.0),
            vel: Vec2::ZERO,
            kind: EnemyKind::Shooter,
        });
        session
            .world
            .enemy_bullets
            .push(Bullet::aimed(Vec2::ZERO, Vec2::X));
        let mut boss = Boss::new(Vec2::new(700.0, 300.0), 5);
        boss.hp = 5;
        session.world.boss = Some(boss);

        assert!(session.bomb().is_some());
        assert!(session.world.enemies.is_empty());
        assert!(session.world.enemy_bullets.is_empty());
        assert_eq!(session.world.boss.as_ref().map(|b| b.hp), Some(1));
        assert_eq!(session.player.bombs, 1);

        session.bomb();
        assert_eq!(session.world.boss.as_ref().map(|b| b.hp), Some(1));
    }

    #[test]
    fn test_shield_pickup_takes_max() {
        let mut session = quiet_session();
        session.player.invulnerable_ms = 5000.0;
        session.world.power_ups.push(PowerUp {
            pos: session.player.pos,
            kind: PowerUpKind::Shield,
            life_ms: POWER_UP_LIFE_MS,
        });
        let events = session.step(0.0, &TickInput::default());
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::Shield
        }));
        assert_eq!(session.player.invulnerable_ms, 5000.0);
    }

    #[test]
    fn test_bomb_pickup_adds_charge() {
        let mut session = quiet_session();
        let bombs = session.player.bombs;
        session.world.power_ups.push(PowerUp {
            pos: session.player.pos,
            kind: PowerUpKind::Bomb,
            life_ms: POWER_UP_LIFE_MS,
        });
        session.step(0.0, &TickInput::default());
        assert_eq!(session.player.bombs, bombs + 1);
        assert!(session.world.power_ups.is_empty());
    }

    #[test]
    fn test_pickups_expire() {
        let mut session = quiet_session();
        session.world.power_ups.push(PowerUp {
            pos: Vec2::new(50.0, 600.0),
            kind: PowerUpKind::Bomb,
            life_ms: 10.0,
        });
        session.world.coins.push(Coin {
            pos: Vec2::new(50.0, 600.0),
            vel: Vec2::ZERO,
            life_ms: 10.0,
        });
        session.step(FRAME, &TickInput::default());
        assert!(session.world.power_ups.is_empty());
        assert!(session.world.coins.is_empty());
    }

    #[test]
    fn test_coin_pickup_persists() {
        let store = MemoryStore::new();
        let settings = Settings {
            seed: Some(1),
            ..Default::default()
        };
        let mut session = GameSession::new(&settings, Box::new(store.clone()));
        session.start(Difficulty::Easy);
        session.world.clear();
        session.world.stars.push(Star {
            pos: Vec2::new(40.0, 40.0),
        });
        session.world.coins.push(Coin {
            pos: session.player.pos,
            vel: Vec2::ZERO,
            life_ms: COIN_LIFE_MS,
        });

        let events = session.step(0.0, &TickInput::default());
        assert!(events.contains(&GameEvent::CoinCollected { balance: 5 }));
        assert_eq!(store.get("coins").unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn test_coin_velocity_decays() {
        let mut session = quiet_session();
        session.world.coins.push(Coin {
            pos: Vec2::new(100.0, 500.0),
            vel: Vec2::new(20.0, 0.0),
            life_ms: COIN_LIFE_MS,
        });
        session.step(FRAME, &TickInput::default());
        assert!((session.world.coins[0].vel.x - 19.6).abs() < 1e-4);
    }

    #[test]
    fn test_invulnerable_player_ignores_contact() {
        let mut session = quiet_session();
        session.player.invulnerable_ms = 1000.0;
        session.world.enemies.push(Enemy {
            pos: session.player.pos,
            vel: Vec2::ZERO,
            kind: EnemyKind::Patrol,
        });
        let events = session.step(FRAME, &TickInput::default());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
        assert_eq!(session.player.lives, 4);
    }

    #[test]
    fn test_one_hit_per_source_category() {
        let mut session = quiet_session();
        let pos = session.player.pos + Vec2::new(4.0, 0.0);
        for _ in 0..3 {
            session.world.enemy_bullets.push(Bullet {
                pos,
                vel: Vec2::ZERO,
                life_ms: 1000.0,
                kind: BulletKind::Standard,
            });
        }
        let events = session.step(0.0, &TickInput::default());
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(session.player.lives, 3);
        assert_eq!(session.player.invulnerable_ms, RESPAWN_INVULNERABLE_MS);
        assert_eq!(session.player.pos, session.arena.center());
    }

    #[test]
    fn test_chaser_homes_in() {
        let mut session = quiet_session();
        let player = session.player.pos;
        session.world.enemies.push(Enemy {
            pos: player + Vec2::new(-200.0, 0.0),
            vel: Vec2::ZERO,
            kind: EnemyKind::Chaser,
        });
        session.step(FRAME, &TickInput::default());
        let enemy = &session.world.enemies[0];
        let expected = Difficulty::Easy.profile().chaser_speed(session.level);
        assert!(enemy.vel.x > 0.0);
        assert!((enemy.vel.length() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_boss_stays_in_bounds() {
        let mut session = quiet_session();
        session.player.invulnerable_ms = 1_000_000.0;
        session.world.boss = Some(Boss::new(session.arena.boss_spawn(), 5));
        let margin = BOSS_RADIUS + 4.0;
        for _ in 0..2000 {
            session.step(FRAME, &TickInput::default());
            let Some(boss) = session.world.boss.as_ref() else {
                break;
            };
            assert!(boss.pos.x >= -margin && boss.pos.x <= session.arena.width + margin);
            assert!(boss.pos.y >= -margin && boss.pos.y <= session.arena.height + margin);
            for b in &session.world.enemy_bullets {
                assert!(b.life_ms > 0.0);
            }
        }
    }

    /// Quiet session using fixed per-step chances, so zero-length steps
    /// still roll without moving anything
    fn per_frame_session() -> GameSession {
        let mut session = quiet_session();
        session.chance_mode = ChanceMode::PerFrame;
        session
    }

    #[test]
    fn test_shooter_fires_aimed_bullet() {
        let mut session = per_frame_session();
        let player = session.player.pos;
        let from = Vec2::new(100.0, 500.0);
        session.world.enemies.push(Enemy {
            pos: from,
            vel: Vec2::ZERO,
            kind: EnemyKind::Shooter,
        });

        for _ in 0..20_000 {
            update_enemies(&mut session, 0.0);
            if !session.world.enemy_bullets.is_empty() {
                break;
            }
        }

        let bullet = session
            .world
            .enemy_bullets
            .first()
            .expect("shooter never fired");
        let expected = (player - from).normalize() * ENEMY_BULLET_SPEED;
        assert_eq!(bullet.pos, from);
        assert!((bullet.vel - expected).length() < 1e-3);
        assert!((bullet.vel.length() - 320.0).abs() < 1e-3);
        assert_eq!(bullet.life_ms, ENEMY_BULLET_LIFE_MS);
        assert_eq!(bullet.life_ms, 2000.0);
    }

    #[test]
    fn test_patrol_flips_axes() {
        let mut session = per_frame_session();
        let start = Vec2::new(50.0, -30.0);
        let pos = Vec2::new(300.0, 300.0);
        session.world.enemies.push(Enemy {
            pos,
            vel: start,
            kind: EnemyKind::Patrol,
        });

        let mut flipped = false;
        for _ in 0..2000 {
            update_enemies(&mut session, 0.0);
            let enemy = &session.world.enemies[0];
            assert_eq!(enemy.vel.abs(), start.abs());
            assert_eq!(enemy.pos, pos);
            if enemy.vel != start {
                flipped = true;
                break;
            }
        }
        assert!(flipped);
        assert!(session.world.enemy_bullets.is_empty());
    }

    #[test]
    fn test_boss_ring_shot() {
        let mut session = per_frame_session();
        let center = session.arena.center();
        let mut boss = Boss::new(center, 5);
        boss.elapsed_ms = 500.0;
        session.world.boss = Some(boss);

        for _ in 0..2000 {
            update_boss(&mut session, 0.0);
            if !session.world.enemy_bullets.is_empty() {
                break;
            }
        }

        let ring = &session.world.enemy_bullets;
        assert_eq!(ring.len(), BOSS_RING_BULLETS as usize);
        for (k, bullet) in ring.iter().enumerate() {
            let angle = k as f32 * FRAC_PI_4 + 500.0 * 0.002;
            let expected = crate::unit_from_angle(angle) * 256.0;
            assert_eq!(bullet.pos, center);
            assert!((bullet.vel - expected).length() < 1e-2);
            assert_eq!(bullet.life_ms, BOSS_BULLET_LIFE_MS);
            assert_eq!(bullet.life_ms, 2200.0);
        }
    }

    #[test]
    fn test_killed_enemies_drop_coins() {
        let mut session = quiet_session();
        for i in 0..20 {
            let pos = Vec2::new(40.0 + 45.0 * i as f32, 300.0);
            session.world.enemies.push(Enemy {
                pos,
                vel: Vec2::ZERO,
                kind: EnemyKind::Chaser,
            });
            session.world.bullets.push(Bullet::player(pos, 0.0));
        }

        let mut events = Vec::new();
        bullets_vs_enemies(&mut session, &mut events);

        let drops: Vec<Vec2> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::EnemyKilled {
                    pos,
                    dropped_coin: true,
                } => Some(*pos),
                _ => None,
            })
            .collect();
        assert_eq!(events.len(), 20);
        assert!(!drops.is_empty());
        assert_eq!(session.world.coins.len(), drops.len());
        for coin in &session.world.coins {
            assert!(drops.contains(&coin.pos));
            assert!(coin.vel.x.abs() <= 20.0 && coin.vel.y.abs() <= 20.0);
            assert_eq!(coin.life_ms, COIN_LIFE_MS);
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let run = || {
            let settings = Settings {
                seed: Some(777),
                ..Default::default()
            };
            let mut session = GameSession::new(&settings, Box::new(MemoryStore::new()));
            session.start(Difficulty::Hard);
            let inputs = [
                TickInput {
                    direction: Some(Direction::Left),
                    fire: true,
                    ..Default::default()
                },
                TickInput::default(),
                TickInput {
                    direction: Some(Direction::Down),
                    ..Default::default()
                },
            ];
            for i in 0..240 {
                session.step(FRAME, &inputs[i % inputs.len()]);
            }
            (
                session.player.pos,
                session.score,
                session.world.enemies.len(),
                session.world.enemy_bullets.len(),
            )
        };
        assert_eq!(run(), run());
    }
}
