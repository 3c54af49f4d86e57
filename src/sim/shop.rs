//! Between-level shop
//!
//! A fixed catalog. Purchases charge the coin balance and apply immediately.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::session::GameSession;
use super::state::GamePhase;
use crate::consts::MAX_LIVES;
use crate::ledger::WeaponTier;

/// Invulnerability added by a shield boost (ms)
pub const SHIELD_BOOST_MS: f32 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    DoubleShot,
    SpreadShot,
    LaserBeam,
    Bomb,
    ShieldBoost,
    ExtraLife,
}

impl ShopItem {
    /// Every item in display order
    pub const CATALOG: [ShopItem; 6] = [
        ShopItem::DoubleShot,
        ShopItem::SpreadShot,
        ShopItem::LaserBeam,
        ShopItem::Bomb,
        ShopItem::ShieldBoost,
        ShopItem::ExtraLife,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ShopItem::DoubleShot => "w_double",
            ShopItem::SpreadShot => "w_spread",
            ShopItem::LaserBeam => "w_laser",
            ShopItem::Bomb => "bomb",
            ShopItem::ShieldBoost => "shield",
            ShopItem::ExtraLife => "heart",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::CATALOG.into_iter().find(|item| item.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::DoubleShot => "Weapon: Double Shot",
            ShopItem::SpreadShot => "Weapon: Spread Shot",
            ShopItem::LaserBeam => "Weapon: Laser Beam",
            ShopItem::Bomb => "+1 Bomb",
            ShopItem::ShieldBoost => "Shield Boost",
            ShopItem::ExtraLife => "+1 Life",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShopItem::DoubleShot => "Two bullets per shot",
            ShopItem::SpreadShot => "Triple spread shot",
            ShopItem::LaserBeam => "Fast beam, double damage to bosses",
            ShopItem::Bomb => "Clear screen / damage boss",
            ShopItem::ShieldBoost => "Longer invulnerability",
            ShopItem::ExtraLife => "Extra life",
        }
    }

    pub fn cost(&self) -> u64 {
        match self {
            ShopItem::DoubleShot => 40,
            ShopItem::SpreadShot => 80,
            ShopItem::LaserBeam => 120,
            ShopItem::Bomb => 30,
            ShopItem::ShieldBoost => 40,
            ShopItem::ExtraLife => 70,
        }
    }

    /// Weapon tier an upgrade item requires
    fn required_tier(&self) -> Option<WeaponTier> {
        match self {
            ShopItem::DoubleShot => Some(WeaponTier::Single),
            ShopItem::SpreadShot => Some(WeaponTier::Double),
            ShopItem::LaserBeam => Some(WeaponTier::Spread),
            _ => None,
        }
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopError {
    /// Purchases only happen between levels
    Closed,
    /// Item not offered right now (wrong weapon tier, lives at the cap)
    Unavailable(ShopItem),
    InsufficientCoins { cost: u64, balance: u64 },
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "the shop is closed"),
            Self::Unavailable(item) => write!(f, "{} is not available", item.name()),
            Self::InsufficientCoins { cost, balance } => {
                write!(f, "not enough coins: need {cost}, have {balance}")
            }
        }
    }
}

impl std::error::Error for ShopError {}

impl GameSession {
    /// Whether `item` is currently offered
    pub fn is_offered(&self, item: ShopItem) -> bool {
        match item.required_tier() {
            Some(tier) => self.ledger.weapon == tier,
            None => item != ShopItem::ExtraLife || self.player.lives < MAX_LIVES,
        }
    }

    /// Items currently offered, in catalog order
    pub fn shop_offers(&self) -> Vec<ShopItem> {
        ShopItem::CATALOG
            .into_iter()
            .filter(|item| self.is_offered(*item))
            .collect()
    }

    /// Buy an item; on error nothing changes
    pub fn purchase(&mut self, item: ShopItem) -> Result<(), ShopError> {
        if self.phase != GamePhase::Shop {
            return Err(ShopError::Closed);
        }
        if !self.is_offered(item) {
            return Err(ShopError::Unavailable(item));
        }
        let cost = item.cost();
        if self.ledger.coins < cost {
            return Err(ShopError::InsufficientCoins {
                cost,
                balance: self.ledger.coins,
            });
        }

        self.ledger.coins -= cost;
        match item {
            ShopItem::DoubleShot | ShopItem::SpreadShot | ShopItem::LaserBeam => {
                if let Some(tier) = item.required_tier() {
                    self.ledger.upgrade_weapon(tier);
                }
            }
            ShopItem::Bomb => self.player.bombs += 1,
            ShopItem::ShieldBoost => self.player.invulnerable_ms += SHIELD_BOOST_MS,
            ShopItem::ExtraLife => self.player.lives += 1,
        }
        self.persist();

        log::debug!(
            "Bought {} for {cost}, {} coins left",
            item.name(),
            self.ledger.coins
        );
        Ok(())
    }
}
