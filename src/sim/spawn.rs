//! Spawn scheduler
//!
//! Per-archetype decreasing-delay timers, population caps as backpressure,
//! directional waves on later stages, and the score-gated boss triggers.
//! All spawning is suppressed while a boss fight is running; the tick-level
//! suspension already covers pause and the quiz gate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, BossKind};
use super::state::{Enemy, EnemyKind, GameEvent, GameState};
use crate::consts::*;

/// Spawn-delay parameters for one archetype
#[derive(Debug, Clone, Copy)]
pub struct SpawnTiming {
    pub base_ms: f64,
    pub floor_ms: f64,
    pub step_ms_per_min: f64,
    /// Concurrent population cap; `None` means unbounded
    pub cap: Option<usize>,
}

impl EnemyKind {
    pub fn spawn_timing(&self) -> SpawnTiming {
        match self {
            EnemyKind::Basic => SpawnTiming { base_ms: 2000.0, floor_ms: 500.0, step_ms_per_min: 150.0, cap: None },
            EnemyKind::Laser => SpawnTiming { base_ms: 15000.0, floor_ms: 5000.0, step_ms_per_min: 1000.0, cap: Some(2) },
            EnemyKind::Missile => SpawnTiming { base_ms: 12000.0, floor_ms: 6000.0, step_ms_per_min: 600.0, cap: Some(2) },
            EnemyKind::Nuker => SpawnTiming { base_ms: 20000.0, floor_ms: 10000.0, step_ms_per_min: 1000.0, cap: Some(2) },
            EnemyKind::Walker => SpawnTiming { base_ms: 15000.0, floor_ms: 8000.0, step_ms_per_min: 700.0, cap: Some(2) },
            EnemyKind::Elite => SpawnTiming { base_ms: 25000.0, floor_ms: 10000.0, step_ms_per_min: 1500.0, cap: Some(1) },
        }
    }
}

/// Current delay for an archetype after `minutes` of play
pub fn spawn_delay(kind: EnemyKind, minutes: u32) -> f64 {
    let t = kind.spawn_timing();
    (t.base_ms - t.step_ms_per_min * minutes as f64).max(t.floor_ms)
}

/// Chance of a bonus basic-enemy spawn after `minutes` of play
pub fn extra_spawn_chance(minutes: u32) -> f64 {
    (0.05 * minutes as f64).min(0.5)
}

/// Per-archetype spawn bookkeeping plus the wave alternator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnClock {
    last_spawn_ms: [f64; 6],
    next_wave_ms: f64,
    wave_from_left: bool,
}

impl SpawnClock {
    pub fn new() -> Self {
        Self {
            last_spawn_ms: [0.0; 6],
            next_wave_ms: WAVE_INTERVAL_MS,
            wave_from_left: false,
        }
    }

    fn kind_slot(kind: EnemyKind) -> usize {
        EnemyKind::ALL.iter().position(|k| *k == kind).unwrap_or(0)
    }

    pub fn last_spawn(&self, kind: EnemyKind) -> f64 {
        self.last_spawn_ms[Self::kind_slot(kind)]
    }

    pub fn mark_spawn(&mut self, kind: EnemyKind, now_ms: f64) {
        self.last_spawn_ms[Self::kind_slot(kind)] = now_ms;
    }

    /// Stage transitions restart every cadence from "now"
    pub fn reset(&mut self, now_ms: f64) {
        self.last_spawn_ms = [now_ms; 6];
        self.next_wave_ms = now_ms + WAVE_INTERVAL_MS;
        self.wave_from_left = false;
    }
}

impl Default for SpawnClock {
    fn default() -> Self {
        Self::new()
    }
}

fn unlocked(kind: EnemyKind, score: u64) -> bool {
    match kind {
        EnemyKind::Elite => score >= ELITE_UNLOCK_SCORE,
        _ => true,
    }
}

fn entry_pos(state: &mut GameState) -> Vec2 {
    let y = state.rng.random_range(50.0..state.view_h - 50.0);
    Vec2::new(state.view_w + 40.0, y)
}

fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
    let now = state.time_ms;
    let id = state.next_entity_id();
    state.enemies.spawn(id, Enemy::new(kind, pos, now));
}

/// One scheduler pass. Runs after movement, before collision.
pub fn run(state: &mut GameState) {
    if state.boss_fight || state.boss.is_some() {
        return;
    }
    if try_boss_trigger(state) {
        return;
    }

    let now = state.time_ms;
    let minutes = state.minutes();

    for kind in EnemyKind::ALL {
        if !unlocked(kind, state.score) {
            continue;
        }
        let timing = kind.spawn_timing();
        if let Some(cap) = timing.cap {
            let live = state.enemies.iter_active().filter(|(_, e)| e.kind == kind).count();
            if live >= cap {
                continue;
            }
        }
        if now <= state.spawn.last_spawn(kind) + spawn_delay(kind, minutes) {
            continue;
        }
        state.spawn.mark_spawn(kind, now);

        let pos = entry_pos(state);
        spawn_enemy(state, kind, pos);

        match kind {
            EnemyKind::Basic => {
                if state.rng.random_bool(extra_spawn_chance(minutes)) {
                    let pos = entry_pos(state);
                    spawn_enemy(state, kind, pos);
                }
            }
            // Nukers arrive in pairs on later stages
            EnemyKind::Nuker if state.current_stage >= 2 => {
                let pos = entry_pos(state);
                spawn_enemy(state, kind, pos);
            }
            _ => {}
        }
    }

    if state.current_stage >= 2 && now > state.spawn.next_wave_ms {
        spawn_wave(state);
    }
}

/// Directional wave: a column of basic enemies entering one side,
/// alternating sides each wave
fn spawn_wave(state: &mut GameState) {
    let from_left = state.spawn.wave_from_left;
    state.spawn.wave_from_left = !from_left;
    state.spawn.next_wave_ms = state.time_ms + WAVE_INTERVAL_MS;

    let x = if from_left { -40.0 } else { state.view_w + 40.0 };
    let vx = if from_left { 180.0 } else { -180.0 };
    let spacing = (state.view_h - 160.0) / (WAVE_SIZE - 1) as f32;

    for i in 0..WAVE_SIZE {
        let now = state.time_ms;
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(EnemyKind::Basic, Vec2::new(x, 80.0 + spacing * i as f32), now);
        enemy.vel.x = vx;
        state.enemies.spawn(id, enemy);
    }
}

/// Score+stage gated, mutually exclusive boss triggers. Firing one clears
/// the contested airspace and flips the sim into boss-fight mode.
fn try_boss_trigger(state: &mut GameState) -> bool {
    let kind = if state.current_stage == 1 && state.score >= STAGE1_BOSS_SCORE {
        BossKind::Firecracker
    } else if state.current_stage == 2 && state.score >= STAGE2_BOSS_SCORE {
        BossKind::Tentacle
    } else {
        return false;
    };

    log::info!("boss trigger: {kind:?} at score {}", state.score);
    state.clear_airspace();
    state.boss_fight = true;
    let boss = Boss::enter(kind, state.view_w, state.view_h, state.time_ms);
    state.boss = Some(boss);
    state.push_event(GameEvent::BossSpawned(kind));
    state.push_event(GameEvent::Sound("sfx_boss_alarm"));
    true
}
