//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, and only for cosmetic fields
//! - No rendering, audio, or platform dependencies

pub mod geometry;
pub mod physics;
pub mod rng;
pub mod scoring;
pub mod state;
pub mod tick;

pub use geometry::{
    Axis, Block, Overlap, SliceResult, calculate_axis_overlap, create_base_block,
    create_moving_block, is_perfect_hit, slice_block,
};
pub use physics::{
    calculate_angular_velocity, calculate_falling_velocity, oscillate_position,
    should_remove_falling_piece, update_block_oscillation, update_falling_piece,
};
pub use rng::RandomSource;
pub use scoring::{calculate_hit_score, get_streak_message, update_perfect_streak};
pub use state::{FallingPiece, GamePhase, GameState};
pub use tick::{TickInput, tick};
