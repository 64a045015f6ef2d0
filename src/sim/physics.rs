//! Oscillation and falling-piece kinematics
//!
//! Simplified kinematics only: no collision between falling pieces and the
//! stack. Everything here is a pure function returning new values.

use glam::Vec3;

use super::geometry::{Axis, Block};
use super::rng::RandomSource;
use super::state::FallingPiece;
use crate::consts::*;

/// Position along the sweep at `elapsed_secs`
///
/// Closed form in time, so any tick can evaluate it without history.
#[inline]
pub fn oscillate_position(
    elapsed_secs: f32,
    amplitude: f32,
    angular_speed: f32,
    center_offset: f32,
) -> f32 {
    center_offset + amplitude * (elapsed_secs * angular_speed).sin()
}

/// Move `block` to its sweep position along `axis`
pub fn update_block_oscillation(
    block: &Block,
    axis: Axis,
    elapsed_secs: f32,
    center_offset: f32,
) -> Block {
    let pos = oscillate_position(
        elapsed_secs,
        OSCILLATION_AMPLITUDE,
        OSCILLATION_SPEED,
        center_offset,
    );
    Block {
        position: axis.with_component(block.position, pos),
        ..*block
    }
}

/// Initial velocity for an overhang: pushed away from the stack along `axis`
pub fn calculate_falling_velocity(
    fallen: &Block,
    base: &Block,
    axis: Axis,
    rng: &mut impl RandomSource,
) -> Vec3 {
    let direction = if fallen.center_on(axis) < base.center_on(axis) {
        -1.0
    } else {
        1.0
    };
    let speed = rng.range(FALL_SPEED_MIN, FALL_SPEED_MAX) * direction;
    let jitter = rng.range(-FALL_JITTER, FALL_JITTER);

    let horizontal = axis.with_component(Vec3::ZERO, speed);
    axis.flip().with_component(horizontal, jitter)
}

/// Tumble rates (rad/s); the piece mostly rolls over the cut edge
///
/// The cut edge runs along the other horizontal axis, so that component
/// dominates.
pub fn calculate_angular_velocity(axis: Axis, rng: &mut impl RandomSource) -> Vec3 {
    let roll = rng.range(2.0, 4.0) * if rng.next_unit() < 0.5 { -1.0 } else { 1.0 };
    let wobble_axis = rng.range(-0.5, 0.5);
    let wobble_y = rng.range(-0.5, 0.5);

    let v = Vec3::new(0.0, wobble_y, 0.0);
    let v = axis.with_component(v, wobble_axis);
    axis.flip().with_component(v, roll)
}

/// Advance a falling piece by `dt` seconds (semi-implicit Euler)
pub fn update_falling_piece(piece: &FallingPiece, dt: f32) -> FallingPiece {
    let mut velocity = piece.velocity;
    velocity.y += GRAVITY * dt;

    FallingPiece {
        block: Block {
            position: piece.block.position + velocity * dt,
            ..piece.block
        },
        velocity,
        rotation: piece.rotation + piece.angular_velocity * dt,
        ..*piece
    }
}

/// Expired by age or fell out of the world
pub fn should_remove_falling_piece(piece: &FallingPiece, current_time_ms: f64) -> bool {
    current_time_ms - piece.created_at_ms > FALLING_PIECE_LIFETIME_MS
        || piece.block.position.y < FALLING_PIECE_MIN_Y
}
