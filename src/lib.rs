//! Neon Stack - A reflex stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (slicing, physics, scoring, game state)
//! - `driver`: Fixed-timestep accumulator for variable frame deltas
//! - `events`: Snapshot diffing for presentation/audio collaborators
//! - `highscores`: Persisted high score with pluggable storage

pub mod driver;
pub mod events;
pub mod highscores;
pub mod sim;

pub use driver::FixedTimestep;
pub use events::{GameEvent, Snapshot};
pub use highscores::{HighScoreKeeper, HighScoreRecord, HighScoreStore, StorageError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const SIM_DT_MS: f64 = 16.0;
    /// Frame deltas are clamped to this before accumulation
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Base platform footprint (x and z)
    pub const BASE_BLOCK_SIZE: f32 = 3.0;
    /// Height of every block in the stack
    pub const BLOCK_HEIGHT: f32 = 1.0;

    /// Oscillation half-sweep, world units
    pub const OSCILLATION_AMPLITUDE: f32 = 5.0;
    /// Oscillation angular speed (radians/sec)
    pub const OSCILLATION_SPEED: f32 = 2.0;

    /// Max leftover along the slice axis that still counts as perfect
    pub const PERFECT_TOLERANCE: f32 = 0.1;

    /// Gravity for falling pieces (units/s²)
    pub const GRAVITY: f32 = -20.0;
    /// Falling pieces older than this (ms) get cleaned up
    pub const FALLING_PIECE_LIFETIME_MS: f64 = 3000.0;
    /// Falling pieces below this height get cleaned up
    pub const FALLING_PIECE_MIN_Y: f32 = -20.0;
    /// Outward speed band for a sliced-off piece
    pub const FALL_SPEED_MIN: f32 = 2.0;
    pub const FALL_SPEED_MAX: f32 = 4.0;
    /// Sideways jitter on the orthogonal axis
    pub const FALL_JITTER: f32 = 0.5;

    /// Points for any successful placement
    pub const BASE_POINTS: u64 = 10;
    /// Perfect-streak multiplier base
    pub const STREAK_MULTIPLIER: u64 = 2;
}

/// Convert a millisecond timestamp to simulation seconds
#[inline]
pub fn ms_to_secs(ms: f64) -> f32 {
    (ms / 1000.0) as f32
}

/// Web entry: route `log` to the browser console and panics to console.error
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Neon Stack (wasm) core loaded");
}
