//! Difficulty profiles, chosen once per run

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Tuning fixed by a difficulty choice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Base enemy speed (px/s)
    pub enemy_speed: f32,
    /// Enemies on level 0 (grows by one every two levels)
    pub enemy_count: u32,
    /// Per-frame chance that a shooter fires, before the level bonus
    pub shoot_chance: f32,
    pub lives: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a difficulty key, using easy for anything unknown
    pub fn from_key(key: &str) -> Self {
        Self::from_str(key).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {key:?}, using easy");
            Difficulty::Easy
        })
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                enemy_speed: 110.0,
                enemy_count: 2,
                shoot_chance: 0.001,
                lives: 4,
            },
            Difficulty::Medium => DifficultyProfile {
                enemy_speed: 140.0,
                enemy_count: 3,
                shoot_chance: 0.002,
                lives: 3,
            },
            Difficulty::Hard => DifficultyProfile {
                enemy_speed: 170.0,
                enemy_count: 4,
                shoot_chance: 0.003,
                lives: 2,
            },
        }
    }
}

impl DifficultyProfile {
    /// Chaser speed on a given level
    pub fn chaser_speed(&self, level: u32) -> f32 {
        self.enemy_speed * (0.9 + 0.03 * level as f32)
    }

    /// Shooter fire chance on a given level
    pub fn shooter_chance(&self, level: u32) -> f32 {
        self.shoot_chance + 0.0005 * level as f32
    }
}
