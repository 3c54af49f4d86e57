//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed and the same sequence
//! of inputs and frame times, a session plays out identically:
//! - Frame time is clamped, never trusted
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod session;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{circles_overlap, step_chance, wrap};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use session::GameSession;
pub use shop::{ShopError, ShopItem};
pub use snapshot::Snapshot;
pub use state::{
    Arena, Boss, Bullet, BulletKind, Coin, Direction, Enemy, EnemyKind, GameEvent, GamePhase,
    Player, PowerUp, PowerUpKind, Star, World,
};
pub use tick::{TickInput, tick};
pub use wave::{Wave, generate_level};
