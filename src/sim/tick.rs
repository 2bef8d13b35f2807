//! Fixed timestep simulation tick
//!
//! Core loop that advances the run deterministically: same seed, same
//! inputs, same dt sequence produce the same state. Passes run in a
//! fixed order each tick (movement, spawning, collision, boss, stage,
//! score upkeep) so cross-system effects land the same tick they are
//! raised.

use super::state::GameState;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard steering, -1..=1 per axis
    pub move_x: f32,
    pub move_y: f32,
    /// Pointer destination in view coordinates; the ship eases toward it
    /// until the next keyboard input
    pub pointer: Option<glam::Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Accept the stage-transition prompt and enter the next stage
    pub advance: bool,
    /// Restart the run (stage transition, game over, or victory screens)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause && !state.is_game_over && !state.game_completed {
        state.is_paused = !state.is_paused;
    }

    if input.restart && (state.is_game_over || state.game_completed || state.is_stage_transition) {
        state.restart();
        return;
    }
    if input.advance && state.is_stage_transition {
        super::stage::advance(state);
    }

    if state.suspended() {
        return;
    }

    state.time_ms += dt as f64 * 1000.0;

    super::movement::run(state, input, dt);
    super::spawn::run(state);
    super::collision::run(state);
    super::boss::run(state, dt);
    super::stage::run(state);
    super::ledger::run(state);

    state.sweep_registries();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::GameEvent;

    fn run_ticks(state: &mut GameState, input: &TickInput, n: usize) {
        // Surface sim logging in test output when RUST_LOG is set
        let _ = env_logger::builder().is_test(true).try_init();
        for _ in 0..n {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        let input = TickInput {
            move_y: 0.3,
            ..Default::default()
        };
        // One minute of simulation: spawns, shots and collisions included
        run_ticks(&mut a, &input, 3600);
        run_ticks(&mut b, &input, 3600);

        assert_eq!(a.time_ms, b.time_ms);
        assert_eq!(a.score, b.score);
        assert_eq!(a.health, b.health);
        assert_eq!(a.enemies.count_active(), b.enemies.count_active());
        assert_eq!(a.player.pos, b.player.pos);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::new(7);
        run_ticks(&mut state, &TickInput::default(), 60);
        let t = state.time_ms;
        let enemies = state.enemies.count_active();

        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT);
        run_ticks(&mut state, &TickInput::default(), 120);
        assert_eq!(state.time_ms, t);
        assert_eq!(state.enemies.count_active(), enemies);

        tick(&mut state, &toggle, SIM_DT);
        run_ticks(&mut state, &TickInput::default(), 60);
        assert!(state.time_ms > t);
    }

    #[test]
    fn test_spawns_accumulate_over_time() {
        let mut state = GameState::new(3);
        run_ticks(&mut state, &TickInput::default(), 600);
        assert!(state.enemies.count_active() > 0);
    }

    #[test]
    fn test_stage_transition_waits_for_choice() {
        let mut state = GameState::new(5);
        state.stage_clear_pending = true;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.is_stage_transition);

        // Frozen until the host answers the prompt
        let t = state.time_ms;
        run_ticks(&mut state, &TickInput::default(), 120);
        assert_eq!(state.time_ms, t);

        tick(
            &mut state,
            &TickInput {
                advance: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.current_stage, 2);
        assert!(!state.is_stage_transition);
        run_ticks(&mut state, &TickInput::default(), 60);
        assert!(state.time_ms > t);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = GameState::new(9);
        run_ticks(&mut state, &TickInput::default(), 600);
        state.health = 0;
        state.is_game_over = true;
        let seed = state.seed;

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert!(!state.is_game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.time_ms, 0.0);
        assert_eq!(state.seed, seed);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_checkpoint_suspends_ticking() {
        let mut state = GameState::new(11);
        state.quiz.set_enabled(true);
        state
            .quiz
            .load_set(
                r#"{"questions":[
                    {"id":"a","prompt":"1+1?","options":["2","3"],"correctOption":0},
                    {"id":"b","prompt":"2+2?","options":["4","5"],"correctOption":0},
                    {"id":"c","prompt":"3+3?","options":["6","7"],"correctOption":0}
                ]}"#,
            )
            .unwrap();
        crate::sim::ledger::update_score(&mut state, CHECKPOINT_STEP);
        assert!(state.suspended());

        let t = state.time_ms;
        run_ticks(&mut state, &TickInput::default(), 60);
        assert_eq!(state.time_ms, t);

        for _ in 0..3 {
            crate::sim::ledger::answer_checkpoint(&mut state, 0);
        }
        run_ticks(&mut state, &TickInput::default(), 60);
        assert!(state.time_ms > t);
    }

    #[test]
    fn test_events_drain_per_tick() {
        let mut state = GameState::new(13);
        run_ticks(&mut state, &TickInput::default(), 1200);
        let events = state.drain_events();
        // Spawn activity produces sounds well within twenty seconds
        assert!(events.iter().any(|e| matches!(e, GameEvent::Sound(_))));
        assert!(state.events.is_empty());
    }
}
