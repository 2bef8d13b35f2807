//! Score ledger and God-Mode economy
//!
//! Every score mutation funnels through `update_score` so milestone
//! side-effects happen exactly once: the guided-rocket unlock and the
//! checkpoint-quiz boundary check both live here.

use super::quiz::SessionOutcome;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Add to the score and run milestone checks. Score only ever grows;
/// restart is the one path back to zero.
pub fn update_score(state: &mut GameState, delta: u64) {
    let old = state.score;
    state.score = old + delta;

    if !state.has_guided_rockets && state.score >= GUIDED_ROCKET_SCORE {
        state.has_guided_rockets = true;
        state.push_event(GameEvent::Sound("sfx_rockets_online"));
        log::info!("guided rockets unlocked at score {}", state.score);
    }

    // Checkpoint gate: fire once per crossed 5000-point boundary, never
    // while a session is already up
    let crossed = state.score / CHECKPOINT_STEP > old / CHECKPOINT_STEP;
    if crossed && state.quiz.try_start_session(&mut state.rng) {
        state.push_event(GameEvent::CheckpointStarted);
    }
}

/// Attempt to activate God-Mode: a finite per-stage resource behind a hard
/// cooldown from the previous use. Returns whether it activated.
pub fn try_activate_god_mode(state: &mut GameState) -> bool {
    let now = state.time_ms;
    let god = &state.god_mode;
    if god.active || god.uses_remaining == 0 {
        return false;
    }
    let cooldown_left = (god.last_use_ms + GOD_MODE_COOLDOWN_MS - now).max(0.0);
    if cooldown_left > 0.0 {
        log::debug!("god mode on cooldown: {:.0}ms left", cooldown_left);
        return false;
    }

    let god = &mut state.god_mode;
    god.active = true;
    god.end_ms = now + GOD_MODE_DURATION_MS;
    god.uses_remaining -= 1;
    god.last_use_ms = now;
    state.push_event(GameEvent::GodModeActivated);
    state.push_event(GameEvent::Sound("sfx_god_mode"));
    true
}

/// Per-tick ledger upkeep: God-Mode expiry
pub fn run(state: &mut GameState) {
    if state.god_mode.active && state.time_ms >= state.god_mode.end_ms {
        state.god_mode.active = false;
        state.push_event(GameEvent::GodModeExpired);
    }
}

/// Console-style command interface. Returns whether the command was
/// consumed (activation may still be refused by the economy).
pub fn handle_command(state: &mut GameState, text: &str) -> bool {
    match text.trim() {
        "//g" => {
            try_activate_god_mode(state);
            true
        }
        _ => false,
    }
}

/// Runtime quiz toggle from the host; never resets game state
pub fn set_math_questions_enabled(state: &mut GameState, enabled: bool) {
    state.quiz.set_enabled(enabled);
}

/// Host feeds a checkpoint answer through the sim so pass/fail lands in
/// the event stream
pub fn answer_checkpoint(state: &mut GameState, option: usize) -> Option<SessionOutcome> {
    let outcome = state.quiz.answer(option);
    match outcome {
        Some(SessionOutcome::Passed) => state.push_event(GameEvent::CheckpointPassed),
        Some(SessionOutcome::Failed) => state.push_event(GameEvent::CheckpointFailed),
        None => {}
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: &str = r#"{"questions":[
        {"id":"q1","prompt":"2+2?","options":["3","4"],"correctOption":1},
        {"id":"q2","prompt":"3*3?","options":["9","6"],"correctOption":0},
        {"id":"q3","prompt":"10-7?","options":["2","3"],"correctOption":1}
    ]}"#;

    #[test]
    fn test_score_accumulates() {
        let mut state = GameState::new(1);
        update_score(&mut state, 100);
        update_score(&mut state, 250);
        assert_eq!(state.score, 350);
    }

    #[test]
    fn test_rocket_unlock_at_threshold() {
        let mut state = GameState::new(1);
        update_score(&mut state, GUIDED_ROCKET_SCORE - 1);
        assert!(!state.has_guided_rockets);
        update_score(&mut state, 1);
        assert!(state.has_guided_rockets);
    }

    #[test]
    fn test_checkpoint_triggers_once_per_boundary() {
        let mut state = GameState::new(1);
        state.quiz.set_enabled(true);
        state.quiz.load_set(QUESTIONS).unwrap();

        update_score(&mut state, 4999);
        assert!(!state.quiz.session_active());
        update_score(&mut state, 1);
        assert!(state.quiz.session_active());
        let sessions = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CheckpointStarted))
            .count();
        assert_eq!(sessions, 1);

        // Further score while the session is up never stacks a second one
        update_score(&mut state, 10_000);
        let sessions = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CheckpointStarted))
            .count();
        assert_eq!(sessions, 1);
    }

    #[test]
    fn test_checkpoint_disabled_never_triggers() {
        let mut state = GameState::new(1);
        state.quiz.load_set(QUESTIONS).unwrap();
        state.quiz.set_enabled(false);
        update_score(&mut state, 25_000);
        assert!(!state.quiz.session_active());
    }

    #[test]
    fn test_god_mode_duration_and_cooldown() {
        let mut state = GameState::new(1);
        state.time_ms = 1000.0;
        assert!(try_activate_god_mode(&mut state));
        assert!(state.god_mode.active);
        assert_eq!(state.god_mode.uses_remaining, GOD_MODE_USES - 1);
        assert_eq!(state.god_mode.end_ms, 1000.0 + GOD_MODE_DURATION_MS);

        // Expires on schedule
        state.time_ms = 1000.0 + GOD_MODE_DURATION_MS;
        run(&mut state);
        assert!(!state.god_mode.active);

        // Second attempt inside the cooldown is rejected, uses unchanged
        let uses = state.god_mode.uses_remaining;
        state.time_ms = 1000.0 + GOD_MODE_COOLDOWN_MS - 1.0;
        assert!(!try_activate_god_mode(&mut state));
        assert_eq!(state.god_mode.uses_remaining, uses);

        // Past the cooldown it works again
        state.time_ms = 1000.0 + GOD_MODE_COOLDOWN_MS;
        assert!(try_activate_god_mode(&mut state));
    }

    #[test]
    fn test_god_mode_exhausted() {
        let mut state = GameState::new(1);
        state.god_mode.uses_remaining = 0;
        assert!(!try_activate_god_mode(&mut state));
    }

    #[test]
    fn test_handle_command() {
        let mut state = GameState::new(1);
        assert!(handle_command(&mut state, "//g"));
        assert!(state.god_mode.active);
        assert!(handle_command(&mut state, " //g "));
        assert!(!handle_command(&mut state, "//x"));
        assert!(!handle_command(&mut state, "hello"));
    }

    #[test]
    fn test_checkpoint_answer_flow() {
        let mut state = GameState::new(1);
        state.quiz.set_enabled(true);
        state.quiz.load_set(QUESTIONS).unwrap();
        update_score(&mut state, 5000);
        assert!(state.suspended());

        for _ in 0..3 {
            let correct = state.quiz.current_question().unwrap().correct;
            answer_checkpoint(&mut state, correct);
        }
        assert!(!state.quiz.session_active());
        assert!(!state.suspended());
        assert!(state.events.contains(&GameEvent::CheckpointPassed));
    }
}
