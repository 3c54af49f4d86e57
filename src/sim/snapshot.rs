//! Read-only view of a session for renderers and HUDs

use serde::Serialize;

use super::difficulty::Difficulty;
use super::session::GameSession;
use super::state::{Arena, Boss, Bullet, Coin, Enemy, GamePhase, Player, PowerUp, Star};
use crate::consts::LEVEL_CAP;
use crate::ledger::WeaponTier;

/// Everything a frame needs to be drawn, borrowed from the session
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub level: u32,
    pub level_cap: u32,
    pub score: u64,
    pub best: u64,
    pub lives: u32,
    pub bombs: u32,
    pub coins: u64,
    pub weapon: WeaponTier,
    pub invulnerable_ms: f32,
    pub arena: Arena,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub boss: Option<&'a Boss>,
    pub stars: &'a [Star],
    pub coin_drops: &'a [Coin],
    pub power_ups: &'a [PowerUp],
}

impl GameSession {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            level: self.level,
            level_cap: LEVEL_CAP,
            score: self.score,
            best: self.ledger.best.max(self.score),
            lives: self.player.lives,
            bombs: self.player.bombs,
            coins: self.ledger.coins,
            weapon: self.ledger.weapon,
            invulnerable_ms: self.player.invulnerable_ms,
            arena: self.arena,
            player: &self.player,
            enemies: &self.world.enemies,
            bullets: &self.world.bullets,
            enemy_bullets: &self.world.enemy_bullets,
            boss: self.world.boss.as_ref(),
            stars: &self.world.stars,
            coin_drops: &self.world.coins,
            power_ups: &self.world.power_ups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::settings::Settings;

    #[test]
    fn test_snapshot_serializes() {
        let settings = Settings {
            seed: Some(3),
            ..Default::default()
        };
        let mut session = GameSession::new(&settings, Box::new(MemoryStore::new()));
        session.start(Difficulty::Hard);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.level_cap, 15);
        assert_eq!(snapshot.enemies.len(), session.world.enemies.len());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["difficulty"], "Hard");
        assert_eq!(json["lives"], 2);
        assert_eq!(json["weapon"], "Single");
        assert!(json["boss"].is_null());
        assert_eq!(json["stars"].as_array().unwrap().len(), 2);
    }
}
