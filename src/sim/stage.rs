//! Stage progression
//!
//! A stage ends when its boss finishes its defeat sequence; the boss
//! module raises `stage_clear_pending`, and this pass turns that into
//! either a stage transition (awaiting the host's advance/restart
//! choice) or final victory.

use super::state::{GameEvent, GameState, GodMode};
use crate::consts::*;

pub const FINAL_STAGE: u32 = 2;

/// Consume the boss-defeat signal raised earlier in the same tick
pub fn run(state: &mut GameState) {
    if !state.stage_clear_pending {
        return;
    }
    state.stage_clear_pending = false;

    if state.current_stage >= FINAL_STAGE {
        state.game_completed = true;
        state.push_event(GameEvent::GameCompleted);
        state.push_event(GameEvent::Sound("sfx_victory"));
        log::info!("final boss down, run complete at score {}", state.score);
    } else {
        state.is_stage_transition = true;
        state.push_event(GameEvent::StageCleared);
        state.push_event(GameEvent::Sound("sfx_stage_clear"));
        log::info!("stage {} cleared", state.current_stage);
    }
}

/// Host chose to continue into the next stage. Health, God-Mode uses and
/// cooldown all reset; score carries over.
pub fn advance(state: &mut GameState) {
    if !state.is_stage_transition {
        return;
    }
    state.current_stage += 1;
    state.health = PLAYER_MAX_HEALTH;
    state.god_mode = GodMode::default();
    state.clear_airspace();
    let now = state.time_ms;
    state.spawn.reset(now);
    state.is_stage_transition = false;
    state.push_event(GameEvent::StageAdvanced(state.current_stage));
    log::info!("entering stage {}", state.current_stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::state::EnemyKind;
    use glam::Vec2;

    #[test]
    fn test_stage_clear_opens_transition() {
        let mut state = GameState::new(1);
        state.stage_clear_pending = true;
        run(&mut state);
        assert!(state.is_stage_transition);
        assert!(!state.game_completed);
        assert!(!state.stage_clear_pending);
        assert!(state.events.contains(&GameEvent::StageCleared));
    }

    #[test]
    fn test_final_stage_clear_completes_game() {
        let mut state = GameState::new(1);
        state.current_stage = FINAL_STAGE;
        state.stage_clear_pending = true;
        run(&mut state);
        assert!(state.game_completed);
        assert!(!state.is_stage_transition);
        assert!(state.events.contains(&GameEvent::GameCompleted));
    }

    #[test]
    fn test_advance_resets_per_stage_state() {
        let mut state = GameState::new(1);
        state.health = 40;
        state.god_mode.uses_remaining = 0;
        state.god_mode.last_use_ms = 1000.0;
        let id = state.next_entity_id();
        state.enemies.spawn(
            id,
            super::super::state::Enemy::new(EnemyKind::Basic, Vec2::new(400.0, 300.0), 0.0),
        );
        state.is_stage_transition = true;

        advance(&mut state);

        assert_eq!(state.current_stage, 2);
        assert_eq!(state.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.god_mode.uses_remaining, GOD_MODE_USES);
        assert_eq!(state.enemies.count_active(), 0);
        assert!(!state.is_stage_transition);
        assert!(state.events.contains(&GameEvent::StageAdvanced(2)));
    }

    #[test]
    fn test_advance_requires_transition() {
        let mut state = GameState::new(1);
        advance(&mut state);
        assert_eq!(state.current_stage, 1);
    }
}
