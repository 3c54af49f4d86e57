//! Vibration feedback

use crate::sim::GameEvent;

/// Pattern played when a shop purchase goes through
pub const PURCHASE_PATTERN: &[u32] = &[20];

/// Vibration pattern for an event: alternating on/off durations in ms
///
/// An empty slice means no feedback.
pub fn vibration_pattern(event: &GameEvent) -> &'static [u32] {
    match event {
        GameEvent::Fired { .. } => &[10],
        GameEvent::BombDetonated { .. } => &[50, 50, 50],
        GameEvent::StarCollected { .. } => &[15],
        GameEvent::CoinCollected { .. } => &[10],
        GameEvent::PowerUpCollected { .. } => &[20],
        GameEvent::PlayerHit { .. } => &[80, 40, 80],
        GameEvent::EnemyKilled { .. }
        | GameEvent::BossHit { .. }
        | GameEvent::BossDefeated { .. }
        | GameEvent::LevelCleared { .. }
        | GameEvent::GameOver { .. } => &[],
    }
}

/// Pattern for a whole step: the first event that has one
pub fn frame_pattern(events: &[GameEvent]) -> &'static [u32] {
    events
        .iter()
        .map(vibration_pattern)
        .find(|pattern| !pattern.is_empty())
        .unwrap_or_default()
}
