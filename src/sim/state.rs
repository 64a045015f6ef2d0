//! Game state and the action API
//!
//! `GameState` is the single owner of all per-run data. Collaborators read
//! it between actions; only the methods here (and `tick`) change it.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Axis, Block, create_base_block, create_moving_block, slice_block};
use super::physics::{
    calculate_angular_velocity, calculate_falling_velocity, should_remove_falling_piece,
    update_block_oscillation,
};
use super::scoring::{calculate_hit_score, update_perfect_streak};
use crate::ms_to_secs;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first start intent
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended on a miss
    GameOver,
}

/// A sliced-off overhang tumbling away (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingPiece {
    pub id: u32,
    pub block: Block,
    pub velocity: Vec3,
    /// Radians/sec around each axis
    pub angular_velocity: Vec3,
    /// Accumulated Euler rotation (radians)
    pub rotation: Vec3,
    /// Game time the piece was cut off
    pub created_at_ms: f64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for the cosmetic RNG
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Placed blocks, bottom to top
    pub stack: Vec<Block>,
    /// Block currently sweeping over the stack
    pub current_block: Option<Block>,
    /// Next block, created on drop but not yet positioned
    pub pending_block: Option<Block>,
    pub moving_axis: Axis,
    /// Elapsed game time (ms)
    pub game_time_ms: f64,
    pub score: u64,
    pub perfect_streak: u32,
    pub high_score: u64,
    /// High score as it stood when the current run started
    pub run_start_high_score: u64,
    pub falling_pieces: Vec<FallingPiece>,
    /// Whether the most recent placement was perfect (for effects)
    pub last_hit_perfect: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game; `high_score` comes from persistence
    pub fn new(seed: u64, high_score: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            stack: Vec::new(),
            current_block: None,
            pending_block: None,
            moving_axis: Axis::X,
            game_time_ms: 0.0,
            score: 0,
            perfect_streak: 0,
            high_score,
            run_start_high_score: high_score,
            falling_pieces: Vec::new(),
            last_hit_perfect: false,
            next_id: 0,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Highest placed block
    ///
    /// # Panics
    /// If the stack is empty. `start_game` always seeds the base block, so an
    /// empty stack here means the phase bookkeeping is broken.
    pub fn top_block(&self) -> &Block {
        match self.stack.last() {
            Some(block) => block,
            None => panic!("top_block called on an empty stack (phase {:?})", self.phase),
        }
    }

    /// Number of blocks placed by the player (excludes the base)
    pub fn height(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    /// Begin a fresh run from `Idle` or `GameOver`; ignored while playing
    pub fn start_game(&mut self) {
        if self.phase == GamePhase::Playing {
            return;
        }
        self.next_id = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);

        let base = Block {
            id: self.next_entity_id(),
            ..create_base_block()
        };
        self.stack.clear();
        self.stack.push(base);

        self.moving_axis = Axis::X;
        self.game_time_ms = 0.0;
        self.score = 0;
        self.run_start_high_score = self.high_score;
        self.perfect_streak = 0;
        self.last_hit_perfect = false;
        self.falling_pieces.clear();
        self.current_block = None;

        let id = self.next_entity_id();
        self.pending_block = Some(create_moving_block(id, &base, self.moving_axis));
        self.phase = GamePhase::Playing;

        // Time is already known (zero), so position the first block right away
        self.spawn_pending_block();
        log::info!("Game started (seed {}, high score {})", self.seed, self.high_score);
    }

    /// Drop the moving block onto the stack
    pub fn drop_block(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(current) = self.current_block else {
            return;
        };

        let top = *self.top_block();
        let axis = self.moving_axis;
        let result = slice_block(&current, &top, axis);

        let Some(kept) = result.kept else {
            self.phase = GamePhase::GameOver;
            self.current_block = None;
            self.pending_block = None;
            self.last_hit_perfect = false;
            if let Some(fallen) = result.fallen {
                self.spawn_falling_piece(fallen, &top, axis);
            }
            self.high_score = self.high_score.max(self.score);
            log::info!(
                "Game over: score {}, height {}, high score {}",
                self.score,
                self.height(),
                self.high_score
            );
            return;
        };

        let points = calculate_hit_score(self.perfect_streak, result.is_perfect);
        self.perfect_streak = update_perfect_streak(self.perfect_streak, result.is_perfect);
        self.score = self.score.saturating_add(points);
        self.last_hit_perfect = result.is_perfect;
        self.stack.push(kept);

        if let Some(fallen) = result.fallen {
            self.spawn_falling_piece(fallen, &top, axis);
        }

        log::debug!(
            "Placed block {} ({}): +{} points, streak {}",
            kept.id,
            if result.is_perfect { "perfect" } else { "sliced" },
            points,
            self.perfect_streak
        );

        // Next block waits for the next tick to learn its sweep position
        self.moving_axis = axis.flip();
        self.current_block = None;
        let id = self.next_entity_id();
        self.pending_block = Some(create_moving_block(id, &kept, self.moving_axis));

        self.high_score = self.high_score.max(self.score);
    }

    /// Position the pending block at the current game time and make it current
    pub fn spawn_pending_block(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(pending) = self.pending_block.take() else {
            return;
        };

        let center = self.top_block().center_on(self.moving_axis);
        let block = update_block_oscillation(
            &pending,
            self.moving_axis,
            ms_to_secs(self.game_time_ms),
            center,
        );
        log::debug!(
            "Spawned block {} on {:?} at {:.3}",
            block.id,
            self.moving_axis,
            block.center_on(self.moving_axis)
        );
        self.current_block = Some(block);
    }

    /// Drop expired or out-of-world falling pieces
    ///
    /// Age is measured in game time, which only advances while playing. The
    /// piece from a miss therefore stays put through `GameOver` and is cleared
    /// by the next `start_game` or `reset`.
    pub fn cleanup_falling_pieces(&mut self) {
        let now = self.game_time_ms;
        self.falling_pieces
            .retain(|piece| !should_remove_falling_piece(piece, now));
    }

    /// Back to the title screen, keeping only the high score
    pub fn reset(&mut self) {
        let high_score = self.high_score;
        *self = Self::new(self.seed, high_score);
        log::info!("Reset to idle");
    }

    fn spawn_falling_piece(&mut self, fallen: Block, base: &Block, axis: Axis) {
        let velocity = calculate_falling_velocity(&fallen, base, axis, &mut self.rng);
        let angular_velocity = calculate_angular_velocity(axis, &mut self.rng);
        let piece = FallingPiece {
            id: self.next_entity_id(),
            block: fallen,
            velocity,
            angular_velocity,
            rotation: Vec3::ZERO,
            created_at_ms: self.game_time_ms,
        };
        self.falling_pieces.push(piece);
    }
}
