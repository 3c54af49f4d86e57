//! Game session and flow
//!
//! `GameSession` owns everything a run needs: the player, the live entities,
//! the progression ledger and the store it is written to. The host calls
//! `step` once per frame and the flow transitions happen here:
//!
//! ```text
//! Attract --start--> Playing --LevelCleared--> Shop --continue--> Playing
//!    ^                  |
//!    +----GameOver------+
//! ```

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::state::{Arena, GameEvent, GamePhase, Player, World};
use super::tick::{self, TickInput};
use super::wave::generate_level;
use crate::consts::{LEVEL_CAP, LEVEL_START_INVULNERABLE_MS};
use crate::ledger::Ledger;
use crate::persistence::ProgressStore;
use crate::settings::{ChanceMode, Settings};

pub struct GameSession {
    pub phase: GamePhase,
    /// Chosen at `start`, held for the whole run
    pub difficulty: Difficulty,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    pub player: Player,
    pub world: World,
    pub ledger: Ledger,
    pub arena: Arena,
    pub chance_mode: ChanceMode,
    pub max_frame_ms: f32,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    store: Box<dyn ProgressStore>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("difficulty", &self.difficulty)
            .field("level", &self.level)
            .field("score", &self.score)
            .field("lives", &self.player.lives)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Create a session sitting in `Attract`
    pub fn new(settings: &Settings, store: Box<dyn ProgressStore>) -> Self {
        let settings = settings.clone().sanitized();
        let seed = settings.seed.unwrap_or_else(rand::random);
        let arena = Arena::new(settings.arena_width, settings.arena_height);
        let difficulty = Difficulty::from_key(&settings.default_difficulty);

        let mut session = Self {
            phase: GamePhase::Attract,
            difficulty,
            level: 1,
            score: 0,
            player: Player::new(arena.center(), difficulty.profile().lives),
            world: World::default(),
            ledger: Ledger::default(),
            arena,
            chance_mode: settings.chance_mode,
            max_frame_ms: settings.max_frame_ms,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            store,
        };
        session.reload_ledger();
        log::info!(
            "Session created (seed {seed}, arena {}x{}, chances {})",
            arena.width,
            arena.height,
            settings.chance_mode.as_str()
        );
        session
    }

    /// The backing progress store
    pub fn store(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    /// Replace the ledger with what the store holds; keeps the in-memory
    /// ledger if the store cannot be read
    pub fn reload_ledger(&mut self) {
        match Ledger::load(self.store.as_ref()) {
            Ok(ledger) => self.ledger = ledger,
            Err(e) => log::warn!("Could not read progress ({e}), continuing in memory"),
        }
    }

    /// Write the ledger; failures are logged, never fatal
    pub(crate) fn persist(&mut self) {
        if let Err(e) = self.ledger.save(self.store.as_mut()) {
            log::warn!("Could not save progress: {e}");
        }
    }

    /// Attract -> Playing
    ///
    /// Resumes from the highest unlocked level. Ignored outside `Attract`.
    pub fn start(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Attract {
            log::warn!("Ignoring start request during {:?}", self.phase);
            return false;
        }

        self.reload_ledger();
        self.difficulty = difficulty;
        self.score = 0;
        self.player = Player::new(self.arena.center(), difficulty.profile().lives);
        self.level = self.ledger.level_unlocked.clamp(1, LEVEL_CAP);
        self.enter_level();
        self.phase = GamePhase::Playing;

        log::info!(
            "Run started: difficulty={}, level={}, lives={}",
            difficulty.as_str(),
            self.level,
            self.player.lives
        );
        true
    }

    /// `start` from a raw difficulty key (unknown keys play easy)
    pub fn start_with_key(&mut self, key: &str) -> bool {
        self.start(Difficulty::from_key(key))
    }

    /// Shop -> Playing; the next level is already in place
    pub fn continue_from_shop(&mut self) -> bool {
        if self.phase != GamePhase::Shop {
            return false;
        }
        self.phase = GamePhase::Playing;
        log::info!("Leaving shop, level {}", self.level);
        true
    }

    /// Advance one frame and apply resulting flow transitions
    pub fn step(&mut self, dt_ms: f32, input: &TickInput) -> Vec<GameEvent> {
        let events = tick::tick(self, input, dt_ms);
        for event in &events {
            match event {
                GameEvent::LevelCleared { .. } => self.complete_level(),
                GameEvent::GameOver { .. } => self.end_run(),
                _ => {}
            }
        }
        events
    }

    /// Fire the current weapon (outside `Playing` this does nothing)
    pub fn shoot(&mut self) -> Option<GameEvent> {
        tick::shoot(self)
    }

    /// Detonate a bomb if one is held
    pub fn bomb(&mut self) -> Option<GameEvent> {
        tick::bomb(self)
    }

    /// Set up the current level: fresh entities, player re-centred
    pub(crate) fn enter_level(&mut self) {
        if self.level > LEVEL_CAP {
            log::info!("Level cap passed, wrapping to level 1");
            self.level = 1;
        }
        self.ledger.unlock(self.level);

        self.world.clear();
        self.player.pos = self.arena.center();
        self.player.facing = glam::Vec2::X;
        self.player.invulnerable_ms = LEVEL_START_INVULNERABLE_MS;

        let profile = self.difficulty.profile();
        let wave = generate_level(self.level, &profile, &self.arena, &mut self.rng);
        self.world.enemies = wave.enemies;
        self.world.stars = wave.stars;
        self.world.power_ups.extend(wave.power_up);
        self.world.boss = wave.boss;

        self.persist();
    }

    /// Playing -> Shop, with the next level generated behind the shop
    fn complete_level(&mut self) {
        let completed = self.level;
        self.ledger.record_score(self.score);
        self.ledger.unlock(completed);
        self.level += 1;
        self.enter_level();
        self.phase = GamePhase::Shop;
        log::info!(
            "Level {completed} cleared (score {}), shop open with {} coins",
            self.score,
            self.ledger.coins
        );
    }

    /// Playing -> Attract after the last life is lost
    ///
    /// Lives go back to the current profile; `start` sets them again for the
    /// difficulty picked next.
    fn end_run(&mut self) {
        self.ledger.record_score(self.score);
        self.persist();
        log::info!("Game over: score {}, best {}", self.score, self.ledger.best);

        self.score = 0;
        self.level = 1;
        self.world.clear();
        self.player.pos = self.arena.center();
        self.player.facing = glam::Vec2::X;
        self.player.lives = self.difficulty.profile().lives;
        self.player.bombs = crate::consts::STARTING_BOMBS;
        self.player.invulnerable_ms = 0.0;
        self.phase = GamePhase::Attract;
    }
}
