//! Snapshot diffing for presentation collaborators
//!
//! The simulation never pushes events. Audio/VFX/HUD layers capture a
//! `Snapshot` after each frame and diff it against the previous one.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, get_streak_message};

/// Observable fields collaborators react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub stack_len: usize,
    pub falling_count: usize,
    /// Highest falling piece id seen, so cleanup doesn't hide new pieces
    pub newest_falling_id: Option<u32>,
    pub last_hit_perfect: bool,
    pub perfect_streak: u32,
    pub score: u64,
    pub high_score: u64,
    /// Record to beat for the current run
    pub run_start_high_score: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            stack_len: state.stack.len(),
            falling_count: state.falling_pieces.len(),
            newest_falling_id: state.falling_pieces.iter().map(|p| p.id).max(),
            last_hit_perfect: state.last_hit_perfect,
            perfect_streak: state.perfect_streak,
            score: state.score,
            high_score: state.high_score,
            run_start_high_score: state.run_start_high_score,
        }
    }
}

/// Something a presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    BlockPlaced { perfect: bool, streak: u32 },
    /// Combo banner text for the new streak
    StreakMessage(String),
    PieceFell,
    GameOver { score: u64, new_high_score: bool },
    ReturnedToIdle,
}

/// Events implied by the change from `prev` to `next`
pub fn diff(prev: &Snapshot, next: &Snapshot) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match (prev.phase, next.phase) {
        (GamePhase::Idle | GamePhase::GameOver, GamePhase::Playing) => {
            events.push(GameEvent::GameStarted);
        }
        (_, GamePhase::Idle) if prev.phase != GamePhase::Idle => {
            events.push(GameEvent::ReturnedToIdle);
            return events;
        }
        _ => {}
    }

    // A restart also resets stack length, so only compare within a run
    let same_run = prev.phase == next.phase || next.phase == GamePhase::GameOver;
    if same_run && next.stack_len > prev.stack_len {
        events.push(GameEvent::BlockPlaced {
            perfect: next.last_hit_perfect,
            streak: next.perfect_streak,
        });
        if next.last_hit_perfect {
            if let Some(text) = get_streak_message(next.perfect_streak) {
                events.push(GameEvent::StreakMessage(text));
            }
        }
    }

    let new_piece = match (prev.newest_falling_id, next.newest_falling_id) {
        (Some(a), Some(b)) => b > a,
        (None, Some(_)) => true,
        _ => false,
    };
    if same_run && new_piece {
        events.push(GameEvent::PieceFell);
    }

    if prev.phase == GamePhase::Playing && next.phase == GamePhase::GameOver {
        events.push(GameEvent::GameOver {
            score: next.score,
            // high_score already tracks the score hit by hit, so compare
            // against the record from before the run
            new_high_score: next.score > next.run_start_high_score,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Block;

    fn aim(state: &mut GameState, offset: f32) {
        let axis = state.moving_axis;
        let target = state.top_block().center_on(axis) + offset;
        let current = state.current_block.unwrap();
        state.current_block = Some(Block {
            position: axis.with_component(current.position, target),
            ..current
        });
    }

    #[test]
    fn test_start_event() {
        let mut state = GameState::new(1, 0);
        let before = Snapshot::capture(&state);
        state.start_game();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(events, vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_slice_events() {
        let mut state = GameState::new(1, 0);
        state.start_game();
        let before = Snapshot::capture(&state);
        aim(&mut state, 1.0);
        state.drop_block();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(
            events,
            vec![
                GameEvent::BlockPlaced {
                    perfect: false,
                    streak: 0
                },
                GameEvent::PieceFell,
            ]
        );
    }

    #[test]
    fn test_streak_message_event() {
        let mut state = GameState::new(1, 0);
        state.start_game();
        aim(&mut state, 0.0);
        state.drop_block();
        state.tick(16.0);

        let before = Snapshot::capture(&state);
        aim(&mut state, 0.0);
        state.drop_block();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(
            events,
            vec![
                GameEvent::BlockPlaced {
                    perfect: true,
                    streak: 2
                },
                GameEvent::StreakMessage("DOUBLE!".to_string()),
            ]
        );
    }

    #[test]
    fn test_game_over_event() {
        let mut state = GameState::new(1, 0);
        state.start_game();
        aim(&mut state, 0.0);
        state.drop_block();
        state.tick(16.0);

        let before = Snapshot::capture(&state);
        aim(&mut state, 9.0);
        state.drop_block();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(
            events,
            vec![
                GameEvent::PieceFell,
                GameEvent::GameOver {
                    score: 10,
                    new_high_score: true
                },
            ]
        );
    }

    #[test]
    fn test_game_over_record_not_beaten() {
        let mut state = GameState::new(1, 100);
        state.start_game();
        aim(&mut state, 0.0);
        state.drop_block();
        state.tick(16.0);

        let before = Snapshot::capture(&state);
        aim(&mut state, 9.0);
        state.drop_block();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 10,
                new_high_score: false
            })
        );
    }

    #[test]
    fn test_miss_on_first_block_is_not_a_record() {
        let mut state = GameState::new(1, 0);
        state.start_game();
        let before = Snapshot::capture(&state);
        aim(&mut state, 9.0);
        state.drop_block();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 0,
                new_high_score: false
            })
        );
    }

    #[test]
    fn test_reset_event() {
        let mut state = GameState::new(1, 0);
        state.start_game();
        let before = Snapshot::capture(&state);
        state.reset();
        let events = diff(&before, &Snapshot::capture(&state));
        assert_eq!(events, vec![GameEvent::ReturnedToIdle]);
    }
}
