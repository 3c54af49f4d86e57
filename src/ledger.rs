//! Persistent progression ledger
//!
//! Coins, best score, highest unlocked level and weapon tier survive game
//! over. Everything else about a run is thrown away.

use serde::{Deserialize, Serialize};

use crate::persistence::{ProgressStore, StoreError};

/// Weapon upgrade ladder. Tiers only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum WeaponTier {
    #[default]
    Single,
    Double,
    Spread,
    Laser,
}

impl WeaponTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponTier::Single => "single",
            WeaponTier::Double => "double",
            WeaponTier::Spread => "spread",
            WeaponTier::Laser => "laser",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(WeaponTier::Single),
            "double" => Some(WeaponTier::Double),
            "spread" => Some(WeaponTier::Spread),
            "laser" => Some(WeaponTier::Laser),
            _ => None,
        }
    }

    /// The tier an upgrade from this one leads to
    pub fn next(&self) -> Option<Self> {
        match self {
            WeaponTier::Single => Some(WeaponTier::Double),
            WeaponTier::Double => Some(WeaponTier::Spread),
            WeaponTier::Spread => Some(WeaponTier::Laser),
            WeaponTier::Laser => None,
        }
    }
}

/// Persistent progression record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub best: u64,
    pub coins: u64,
    pub weapon: WeaponTier,
    pub level_unlocked: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            best: 0,
            coins: 0,
            weapon: WeaponTier::Single,
            level_unlocked: 1,
        }
    }
}

impl Ledger {
    pub const KEY_BEST: &'static str = "best";
    pub const KEY_COINS: &'static str = "coins";
    pub const KEY_WEAPON: &'static str = "weapon";
    pub const KEY_LEVEL_UNLOCKED: &'static str = "levelUnlocked";

    /// Read the ledger; missing or unreadable values take their defaults
    pub fn load(store: &dyn ProgressStore) -> Result<Self, StoreError> {
        let defaults = Self::default();

        let best = parse_number(store.get(Self::KEY_BEST)?, Self::KEY_BEST).unwrap_or(defaults.best);
        let coins =
            parse_number(store.get(Self::KEY_COINS)?, Self::KEY_COINS).unwrap_or(defaults.coins);
        let level_unlocked = parse_number(store.get(Self::KEY_LEVEL_UNLOCKED)?, Self::KEY_LEVEL_UNLOCKED)
            .map(|level: u32| level.max(1))
            .unwrap_or(defaults.level_unlocked);
        let weapon = match store.get(Self::KEY_WEAPON)? {
            Some(raw) => WeaponTier::from_str(&raw).unwrap_or_else(|| {
                log::warn!("Unknown weapon tier {raw:?}, falling back to single");
                WeaponTier::Single
            }),
            None => defaults.weapon,
        };

        Ok(Self {
            best,
            coins,
            weapon,
            level_unlocked,
        })
    }

    /// Write every key (idempotent)
    pub fn save(&self, store: &mut dyn ProgressStore) -> Result<(), StoreError> {
        store.set(Self::KEY_BEST, &self.best.to_string())?;
        store.set(Self::KEY_COINS, &self.coins.to_string())?;
        store.set(Self::KEY_WEAPON, self.weapon.as_str())?;
        store.set(Self::KEY_LEVEL_UNLOCKED, &self.level_unlocked.to_string())?;
        Ok(())
    }

    /// Raise the best score if `score` beats it
    pub fn record_score(&mut self, score: u64) {
        self.best = self.best.max(score);
    }

    /// Raise the unlocked level if `level` is beyond it
    pub fn unlock(&mut self, level: u32) {
        self.level_unlocked = self.level_unlocked.max(level);
    }

    /// Move the weapon one tier up if it is currently `from`
    pub fn upgrade_weapon(&mut self, from: WeaponTier) -> bool {
        if self.weapon != from {
            return false;
        }
        match from.next() {
            Some(next) => {
                self.weapon = next;
                true
            }
            None => false,
        }
    }
}

/// Numbers may be stored as integers or, by older writers, as floats
fn parse_number<T: TryFrom<u64>>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
        });
    match value.and_then(|v| T::try_from(v).ok()) {
        Some(v) => Some(v),
        None => {
            log::warn!("Ignoring unreadable value {raw:?} for {key}");
            None
        }
    }
}
