//! Boss controller
//!
//! One boss at a time: `Entering -> Active -> Defeating -> Removed`. While
//! active, the boss's aggression phase (1-4) is recomputed every tick from
//! fight duration and remaining health - never stored. Attack patterns are
//! repeating timers owned by the boss; defeat cancels the whole set before
//! anything else happens, so no attack can fire on a dead boss.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EnemyShot, GameEvent, GameState, PowerUp, ShotKind};
use super::timers::TimerSet;
use crate::consts::*;
use crate::{dir_to_heading, heading_to_dir};

/// Boss roster, one per stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    Firecracker,
    Tentacle,
}

/// Per-boss tuning
#[derive(Debug, Clone, Copy)]
pub struct BossParams {
    pub max_hp: i32,
    pub spread_interval_ms: f64,
    pub spread_damage: i32,
    pub missile_interval_ms: f64,
    pub missile_damage: i32,
    /// Firecracker: bomb burst; Tentacle: debris ring. Phase 3+ only.
    pub heavy_interval_ms: f64,
    pub heavy_damage: i32,
}

impl BossKind {
    pub fn params(&self) -> BossParams {
        match self {
            BossKind::Firecracker => BossParams {
                max_hp: 300,
                spread_interval_ms: 1200.0,
                spread_damage: 15,
                missile_interval_ms: 4000.0,
                missile_damage: 20,
                heavy_interval_ms: 6000.0,
                heavy_damage: 25,
            },
            BossKind::Tentacle => BossParams {
                max_hp: 400,
                spread_interval_ms: 1000.0,
                spread_damage: 15,
                missile_interval_ms: 3500.0,
                missile_damage: 20,
                heavy_interval_ms: 5000.0,
                heavy_damage: 10,
            },
        }
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            BossKind::Firecracker => "boss_firecracker",
            BossKind::Tentacle => "boss_tentacle",
        }
    }
}

/// Aggression phase from fight duration and boss-relative health percent.
/// Pure function; low health overrides a short fight.
pub fn boss_phase(duration_s: f32, health_pct: f32) -> u8 {
    if duration_s < 10.0 && health_pct > 75.0 {
        1
    } else if duration_s < 20.0 && health_pct > 50.0 {
        2
    } else if duration_s < 30.0 && health_pct > 25.0 {
        3
    } else {
        4
    }
}

/// Shots per spread-laser volley by phase
pub fn spread_count(phase: u8) -> u32 {
    match phase {
        1 => 1,
        2 => 3,
        _ => 5,
    }
}

/// Projectile speed scales +10% per phase above the first
pub fn phase_speed(base: f32, phase: u8) -> f32 {
    base * (1.0 + 0.1 * (phase - 1) as f32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAttack {
    SpreadLaser,
    HomingMissiles,
    /// Bomb burst / debris ring depending on the boss
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossStatus {
    /// Flying in from off-screen; not yet attackable
    Entering,
    Active,
    /// Multi-wave explosion sequence running
    Defeating,
}

/// The active boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub status: BossStatus,
    /// Simulation time the fight proper began (phase clock origin)
    pub fight_start_ms: f64,
    pub timers: TimerSet<BossAttack>,
    defeat_waves_left: u8,
    next_defeat_wave_ms: f64,
}

impl Boss {
    /// Spawn off the right edge, entering
    pub fn enter(kind: BossKind, view_w: f32, view_h: f32, now_ms: f64) -> Self {
        let params = kind.params();
        Self {
            kind,
            pos: Vec2::new(view_w + 80.0, view_h * 0.45),
            hp: params.max_hp,
            max_hp: params.max_hp,
            status: BossStatus::Entering,
            fight_start_ms: now_ms,
            timers: TimerSet::new(),
            defeat_waves_left: 0,
            next_defeat_wave_ms: 0.0,
        }
    }

    pub fn health_pct(&self) -> f32 {
        self.hp.max(0) as f32 / self.max_hp as f32 * 100.0
    }

    pub fn phase(&self, now_ms: f64) -> u8 {
        let duration_s = ((now_ms - self.fight_start_ms) / 1000.0).max(0.0) as f32;
        boss_phase(duration_s, self.health_pct())
    }

    /// Damage is only accepted while active
    pub fn attackable(&self) -> bool {
        self.status == BossStatus::Active
    }
}

/// One boss-controller pass. Runs after collision so a killing blow this
/// tick starts the defeat sequence this tick.
pub fn run(state: &mut GameState, dt: f32) {
    let Some(status) = state.boss.as_ref().map(|b| b.status) else {
        return;
    };
    let now = state.time_ms;

    match status {
        BossStatus::Entering => {
            let hold_x = state.view_w * 0.8;
            if let Some(boss) = state.boss.as_mut() {
                boss.pos.x -= 120.0 * dt;
                if boss.pos.x <= hold_x {
                    boss.pos.x = hold_x;
                    boss.status = BossStatus::Active;
                    boss.fight_start_ms = now;
                    let params = boss.kind.params();
                    boss.timers.schedule(BossAttack::SpreadLaser, params.spread_interval_ms, now);
                    boss.timers.schedule(BossAttack::HomingMissiles, params.missile_interval_ms, now);
                    boss.timers.schedule(BossAttack::Heavy, params.heavy_interval_ms, now);
                    log::info!("{:?} engaged", boss.kind);
                }
            }
        }

        BossStatus::Active => {
            let view_h = state.view_h;
            let mut dead = false;
            let mut volley = None;
            if let Some(boss) = state.boss.as_mut() {
                // Vertical drift between the playfield margins
                let t = (now / 1000.0) as f32;
                boss.pos.y = view_h * 0.45 + (t * 0.8).sin() * view_h * 0.25;

                if boss.hp <= 0 {
                    dead = true;
                } else {
                    let phase = boss.phase(now);
                    let fired = boss.timers.fire_due(now);
                    volley = Some((boss.kind, boss.pos, phase, fired));
                }
            }
            if dead {
                begin_defeat(state);
                return;
            }
            if let Some((kind, pos, phase, fired)) = volley {
                for attack in fired {
                    fire_attack(state, kind, pos, phase, attack);
                }
            }
        }

        BossStatus::Defeating => {
            let due = state.boss.as_ref().is_some_and(|b| now >= b.next_defeat_wave_ms);
            if !due {
                return;
            }
            let jitter = Vec2::new(
                state.rng.random_range(-60.0..60.0),
                state.rng.random_range(-60.0..60.0),
            );
            let mut wave_pos = Vec2::ZERO;
            let mut done = false;
            if let Some(boss) = state.boss.as_mut() {
                boss.defeat_waves_left -= 1;
                boss.next_defeat_wave_ms = now + 400.0;
                wave_pos = boss.pos + jitter;
                done = boss.defeat_waves_left == 0;
            }
            state.push_event(GameEvent::Explosion { pos: wave_pos, scale: 2.0 });
            state.push_event(GameEvent::Sound("sfx_explosion_big"));
            if done {
                finish_defeat(state);
            }
        }
    }
}

/// Health hit zero: tear down the attack timers atomically, stop incoming
/// fire, and start the explosion sequence
fn begin_defeat(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.timers.cancel_all();
    boss.status = BossStatus::Defeating;
    boss.defeat_waves_left = 3;
    boss.next_defeat_wave_ms = state.time_ms;
    let kind = boss.kind;
    state.shots.clear();
    log::info!("{kind:?} defeated");
}

fn finish_defeat(state: &mut GameState) {
    let Some(boss) = state.boss.take() else {
        return;
    };
    state.boss_fight = false;
    state.stage_clear_pending = true;
    state.push_event(GameEvent::BossDefeated(boss.kind));
    super::ledger::update_score(state, BOSS_KILL_SCORE);

    // Guaranteed pickup so the stage prompt is reached healthy
    let id = state.next_entity_id();
    state.powerups.spawn(
        id,
        PowerUp { pos: boss.pos, vel: Vec2::new(-60.0, 0.0) },
    );
}

fn fire_attack(state: &mut GameState, kind: BossKind, origin: Vec2, phase: u8, attack: BossAttack) {
    let params = kind.params();
    let player_pos = state.player.pos;
    let bearing = dir_to_heading(player_pos - origin);

    match attack {
        BossAttack::SpreadLaser => {
            let count = spread_count(phase);
            let speed = phase_speed(380.0, phase);
            let spread = 0.18_f32;
            for i in 0..count {
                let offset = (i as f32 - (count as f32 - 1.0) / 2.0) * spread;
                let id = state.next_entity_id();
                state.shots.spawn(
                    id,
                    EnemyShot {
                        kind: ShotKind::Laser,
                        pos: origin,
                        vel: heading_to_dir(bearing + offset) * speed,
                        damage: params.spread_damage,
                        homing: false,
                        speed,
                    },
                );
            }
            state.push_event(GameEvent::Sound("sfx_boss_laser"));
        }

        BossAttack::HomingMissiles => {
            // Firecracker holds its missiles until phase 2
            if kind == BossKind::Firecracker && phase < 2 {
                return;
            }
            let count = match kind {
                BossKind::Firecracker => 1,
                BossKind::Tentacle => 1 + phase as u32 / 2,
            };
            let speed = phase_speed(240.0, phase);
            for i in 0..count {
                let offset = (i as f32 - (count as f32 - 1.0) / 2.0) * 0.5;
                let id = state.next_entity_id();
                state.shots.spawn(
                    id,
                    EnemyShot {
                        kind: ShotKind::Missile,
                        pos: origin + Vec2::new(0.0, -30.0 + 30.0 * i as f32),
                        vel: heading_to_dir(bearing + offset) * speed,
                        damage: params.missile_damage,
                        homing: true,
                        speed,
                    },
                );
            }
            state.push_event(GameEvent::Sound("sfx_boss_missile"));
        }

        BossAttack::Heavy => {
            // Heavy ordnance is suppressed entirely below phase 3
            if phase < 3 {
                return;
            }
            match kind {
                BossKind::Firecracker => {
                    let speed = phase_speed(200.0, phase);
                    for i in 0..3u32 {
                        let offset = (i as f32 - 1.0) * 0.35;
                        let id = state.next_entity_id();
                        state.shots.spawn(
                            id,
                            EnemyShot {
                                kind: ShotKind::Bomb,
                                pos: origin,
                                vel: heading_to_dir(bearing + offset) * speed,
                                damage: params.heavy_damage,
                                homing: false,
                                speed,
                            },
                        );
                    }
                }
                BossKind::Tentacle => {
                    let speed = phase_speed(180.0, phase);
                    for i in 0..8u32 {
                        let theta = std::f32::consts::TAU * i as f32 / 8.0;
                        let id = state.next_entity_id();
                        state.shots.spawn(
                            id,
                            EnemyShot {
                                kind: ShotKind::Debris,
                                pos: origin,
                                vel: heading_to_dir(theta) * speed,
                                damage: params.heavy_damage,
                                homing: false,
                                speed,
                            },
                        );
                    }
                }
            }
            state.push_event(GameEvent::Sound("sfx_boss_heavy"));
        }
    }
}
