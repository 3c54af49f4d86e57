//! Star Dash entry point
//!
//! The native build runs a headless session driven by a small autopilot,
//! which is handy for soak testing the simulation with real frame timing.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use glam::Vec2;

    use star_dash::persistence::{JsonFileStore, MemoryStore, ProgressStore};
    use star_dash::platform::{InputEvent, InputQueue, vibration_pattern};
    use star_dash::settings::Settings;
    use star_dash::sim::{Difficulty, Direction, GameEvent, GamePhase, GameSession};

    const SETTINGS_PATH: &str = "star_dash_settings.json";
    const SAVE_PATH: &str = "star_dash_save.json";
    const DEFAULT_FRAMES: u32 = 1800;
    const FRAME_BUDGET: Duration = Duration::from_millis(16);
    /// Autopilot fires every N frames
    const FIRE_INTERVAL: u32 = 12;
    /// Autopilot bombs when an enemy gets this close
    const PANIC_DISTANCE: f32 = 48.0;

    /// Steers toward the nearest star (or the boss), firing as it goes
    struct Autopilot {
        frame: u32,
    }

    impl Autopilot {
        fn plan(&mut self, session: &GameSession, queue: &mut InputQueue) {
            self.frame += 1;
            let player = session.player.pos;

            let target = session
                .world
                .stars
                .iter()
                .map(|s| s.pos)
                .chain(session.world.boss.as_ref().map(|b| b.pos))
                .min_by(|a, b| {
                    a.distance_squared(player)
                        .total_cmp(&b.distance_squared(player))
                });
            if let Some(target) = target {
                queue.push(InputEvent::Direction(heading(target - player)));
            }

            if self.frame.is_multiple_of(FIRE_INTERVAL) {
                queue.push(InputEvent::Fire);
            }

            let threatened = session
                .world
                .enemies
                .iter()
                .any(|e| e.pos.distance(player) < PANIC_DISTANCE);
            if threatened && session.player.bombs > 0 && !session.player.is_invulnerable() {
                queue.push(InputEvent::Bomb);
            }
        }
    }

    /// Cardinal direction closest to `delta`
    fn heading(delta: Vec2) -> Direction {
        if delta.x.abs() > delta.y.abs() {
            if delta.x < 0.0 { Direction::Left } else { Direction::Right }
        } else if delta.y < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    fn open_store() -> Box<dyn ProgressStore> {
        match JsonFileStore::open(SAVE_PATH) {
            Ok(store) => {
                log::info!("Progress file: {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("Could not open {SAVE_PATH} ({e}), progress will not be kept");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let settings_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_PATH));
        let frames = args
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let settings = Settings::load(&settings_path);
        if !settings_path.exists() {
            settings.save(&settings_path);
        }
        let difficulty = Difficulty::from_key(&settings.default_difficulty);
        let mut session = GameSession::new(&settings, open_store());
        let mut queue = InputQueue::new();
        let mut pilot = Autopilot { frame: 0 };

        log::info!("Star Dash (native) starting, {frames} frames");
        session.start(difficulty);

        let mut last = Instant::now();
        for _ in 0..frames {
            let now = Instant::now();
            let dt_ms = now.duration_since(last).as_secs_f32() * 1000.0;
            last = now;

            match session.phase {
                GamePhase::Attract => {
                    session.start(difficulty);
                }
                GamePhase::Shop => {
                    for item in session.shop_offers() {
                        if session.purchase(item).is_ok() {
                            log::info!("Autopilot bought {}", item.name());
                        }
                    }
                    session.continue_from_shop();
                }
                GamePhase::Playing => {}
            }

            pilot.plan(&session, &mut queue);
            let input = queue.sample();
            for event in session.step(dt_ms, &input) {
                match event {
                    GameEvent::LevelCleared { level } => log::info!("Cleared level {level}"),
                    GameEvent::GameOver { score, best } => {
                        log::info!("Game over with {score} (best {best})")
                    }
                    other if settings.haptics => {
                        log::debug!("{other:?} vibrate {:?}", vibration_pattern(&other))
                    }
                    other => log::debug!("{other:?}"),
                }
            }

            let spent = now.elapsed();
            if spent < FRAME_BUDGET {
                std::thread::sleep(FRAME_BUDGET - spent);
            }
        }

        let snapshot = session.snapshot();
        log::info!(
            "Finished on level {} with score {}, best {}, {} coins",
            snapshot.level,
            snapshot.score,
            snapshot.best,
            snapshot.coins
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web entry point is `platform::web::wasm_main`, this is just to satisfy the compiler
}
