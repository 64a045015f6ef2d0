//! Neon Stack entry point
//!
//! The native build has no renderer; it runs a headless autoplay session
//! through the same driver/snapshot/persistence path a frontend would use.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use anyhow::Context;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use neon_stack::events::{self, GameEvent, Snapshot};
    use neon_stack::highscores::{FileStore, HighScoreKeeper, HighScoreStore, MemoryStore};
    use neon_stack::sim::{GamePhase, GameState, RandomSource, TickInput};
    use neon_stack::FixedTimestep;

    const DEFAULT_SEED: u64 = 0x5EED_57AC;
    const DEFAULT_ROUNDS: u32 = 3;
    /// Simulated render frame (60 fps)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Safety net so a lucky autopilot can't run forever
    const MAX_FRAMES_PER_ROUND: u32 = 60 * 60 * 5;
    /// Frames to wait on the game-over screen before restarting
    const GAME_OVER_PAUSE_FRAMES: u32 = 30;
    const CLEANUP_EVERY_FRAMES: u32 = 30;

    /// Drops when the sweep comes within a per-block tolerance of the target
    struct Autopilot {
        rng: Pcg32,
        /// (block id, tolerance) for the block being aimed
        aim: Option<(u32, f32)>,
    }

    impl Autopilot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0xA11_0F_A1),
                aim: None,
            }
        }

        fn wants_drop(&mut self, state: &GameState) -> bool {
            let Some(current) = state.current_block else {
                return false;
            };
            let tolerance = match self.aim {
                Some((id, tolerance)) if id == current.id => tolerance,
                _ => {
                    // Mostly tight aim, sometimes sloppy
                    let tolerance = if self.rng.next_unit() < 0.7 {
                        self.rng.range(0.0, 0.12)
                    } else {
                        self.rng.range(0.3, 1.2)
                    };
                    self.aim = Some((current.id, tolerance));
                    tolerance
                }
            };
            let axis = state.moving_axis;
            let offset = current.center_on(axis) - state.top_block().center_on(axis);
            offset.abs() <= tolerance
        }
    }

    fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match std::env::var(key) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("{key} must be a number, got {raw:?}")),
            Err(_) => Ok(default),
        }
    }

    fn open_store() -> Box<dyn HighScoreStore> {
        match FileStore::default_location() {
            Ok(store) => {
                log::info!("High score file: {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("{e}; high score will not survive this process");
                Box::new(MemoryStore::default())
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let seed = env_or("NEON_STACK_SEED", DEFAULT_SEED)?;
        let rounds = env_or("NEON_STACK_ROUNDS", DEFAULT_ROUNDS)?;

        let mut keeper = HighScoreKeeper::new(open_store());
        let mut state = GameState::new(seed, keeper.load_initial());
        let mut driver = FixedTimestep::default();
        let mut pilot = Autopilot::new(seed);
        let mut input = TickInput::default();
        let mut prev = Snapshot::capture(&state);

        for round in 1..=rounds {
            log::info!("Round {round}/{rounds}");
            // Start intent
            input.drop = true;

            let mut frames = 0;
            let mut over_frames = 0;
            while frames < MAX_FRAMES_PER_ROUND {
                frames += 1;

                if state.phase == GamePhase::Playing && pilot.wants_drop(&state) {
                    input.drop = true;
                }
                driver.run_frame(&mut state, &mut input, FRAME_MS);

                if frames % CLEANUP_EVERY_FRAMES == 0 {
                    state.cleanup_falling_pieces();
                }

                let next = Snapshot::capture(&state);
                for event in events::diff(&prev, &next) {
                    match event {
                        GameEvent::StreakMessage(text) => log::info!("{text}"),
                        GameEvent::GameOver {
                            score,
                            new_high_score,
                        } => log::info!(
                            "Round {round} over: score {score}{}",
                            if new_high_score { " (new high score!)" } else { "" }
                        ),
                        other => log::debug!("{other:?}"),
                    }
                }
                prev = next;
                keeper.observe(&state);

                if state.phase == GamePhase::GameOver {
                    over_frames += 1;
                    if over_frames >= GAME_OVER_PAUSE_FRAMES {
                        break;
                    }
                }
            }

            println!(
                "round {round}: score {:>6}  height {:>3}  best {:>6}",
                state.score,
                state.height(),
                state.high_score
            );
            if state.phase == GamePhase::Playing {
                log::warn!("Round {round} hit the frame limit at score {}", state.score);
                // Otherwise the next start intent would land as a drop
                state.reset();
                prev = Snapshot::capture(&state);
            }
            driver.reset();
        }

        state.reset();
        keeper.observe(&state);
        println!("high score: {}", keeper.persisted().max(state.high_score));
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Stack (native) starting headless autoplay...");
    autoplay::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start in the library
}
