//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::geometry::Block;
use super::physics::{update_block_oscillation, update_falling_piece};
use super::state::{GamePhase, GameState};
use crate::ms_to_secs;

/// Input commands for a single tick (deterministic)
///
/// The core only understands one intent. Keyboard, pointer and touch are all
/// folded into it (and debounced) before they get here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Drop the block, or start a run when not playing
    pub drop: bool,
}

/// Apply input, then advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if input.drop {
        match state.phase {
            GamePhase::Idle | GamePhase::GameOver => state.start_game(),
            GamePhase::Playing => state.drop_block(),
        }
    }

    state.tick(dt_ms);
}

impl GameState {
    /// Advance time by `dt_ms` (only while playing)
    pub fn tick(&mut self, dt_ms: f64) {
        if self.phase != GamePhase::Playing {
            return;
        }

        self.game_time_ms += dt_ms;

        if self.pending_block.is_some() {
            self.spawn_pending_block();
        } else if let Some(current) = self.current_block {
            let axis = self.moving_axis;
            // Sweep is always centered on the landing target
            let center = self.top_block().center_on(axis);
            let moved: Block =
                update_block_oscillation(&current, axis, ms_to_secs(self.game_time_ms), center);
            self.current_block = Some(moved);
        }

        let dt = ms_to_secs(dt_ms);
        for piece in &mut self.falling_pieces {
            *piece = update_falling_piece(piece, dt);
        }
    }
}
