//! Fixed-timestep driver
//!
//! Turns variable render-frame deltas into a whole number of fixed ticks.
//! Frame deltas are clamped before accumulation, and substeps are capped,
//! so a long stall (backgrounded tab, debugger) can't snowball.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS};
use crate::sim::{GameState, TickInput, tick};

/// Accumulator for fixed-step simulation
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    pub step_ms: f64,
    pub max_frame_ms: f64,
    pub max_substeps: u32,
    accumulator_ms: f64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT_MS, MAX_FRAME_MS, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(step_ms: f64, max_frame_ms: f64, max_substeps: u32) -> Self {
        Self {
            step_ms,
            max_frame_ms,
            max_substeps,
            accumulator_ms: 0.0,
        }
    }

    /// Time carried over to the next frame
    pub fn accumulated_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Drop any carried-over time (on restart/load)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }

    /// Feed one frame's delta; calls `step` once per fixed tick.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_ms: f64, mut step: impl FnMut(f64)) -> u32 {
        let frame_ms = frame_ms.clamp(0.0, self.max_frame_ms);
        self.accumulator_ms += frame_ms;

        let mut substeps = 0;
        while self.accumulator_ms >= self.step_ms && substeps < self.max_substeps {
            step(self.step_ms);
            self.accumulator_ms -= self.step_ms;
            substeps += 1;
        }
        substeps
    }

    /// Run a frame against `state`. The one-shot `input` is applied on the
    /// first tick only and then cleared.
    pub fn run_frame(&mut self, state: &mut GameState, input: &mut TickInput, frame_ms: f64) -> u32 {
        self.advance(frame_ms, |dt| {
            tick(state, input, dt);
            // Clear one-shot inputs after processing
            input.drop = false;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut driver = FixedTimestep::new(16.0, 100.0, 8);
        assert_eq!(driver.advance(10.0, |_| {}), 0);
        assert_eq!(driver.advance(10.0, |_| {}), 1);
        assert!((driver.accumulated_ms() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut driver = FixedTimestep::new(16.0, 100.0, 8);
        let mut ticks = 0;
        let ran = driver.advance(10_000.0, |dt| {
            assert_eq!(dt, 16.0);
            ticks += 1;
        });
        assert_eq!(ran, 6);
        assert_eq!(ticks, 6);
        assert!((driver.accumulated_ms() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut driver = FixedTimestep::new(10.0, 1000.0, 3);
        assert_eq!(driver.advance(100.0, |_| {}), 3);
        assert!((driver.accumulated_ms() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut driver = FixedTimestep::default();
        assert_eq!(driver.advance(-50.0, |_| {}), 0);
        assert_eq!(driver.accumulated_ms(), 0.0);
    }

    #[test]
    fn test_run_frame_applies_input_once() {
        let mut driver = FixedTimestep::default();
        let mut state = GameState::new(8, 0);
        let mut input = TickInput { drop: true };

        // Two ticks: first starts the run, second must not drop
        let ran = driver.run_frame(&mut state, &mut input, 2.0 * SIM_DT_MS);
        assert_eq!(ran, 2);
        assert!(!input.drop);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stack.len(), 1);
        assert_eq!(state.game_time_ms, 2.0 * SIM_DT_MS);
    }
}
