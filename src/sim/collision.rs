//! Collision resolver
//!
//! Detects overlaps between entity categories and dispatches the outcome:
//! damage, destruction, score, and loot. This is the only subsystem that
//! writes `health`. All defeat effects run as explicit post-destroy steps,
//! and a destroyed entity is out of every later check in the same tick.

use glam::Vec2;
use rand::Rng;

use super::registry::EntityHandle;
use super::state::{Enemy, EnemyKind, EnemyShot, GameEvent, GameState, PowerUp, ShotKind};
use crate::consts::*;
use crate::heading_to_dir;

/// Contact damage from a walker ramming the player
pub const WALKER_MELEE_DAMAGE: i32 = 5;
/// Melee re-hit cooldown while the walker stays in contact
const WALKER_MELEE_COOLDOWN_MS: f64 = 600.0;

/// Bullet damage against a boss
pub const BULLET_BOSS_DAMAGE: i32 = 2;
pub const ROCKET_BOSS_DAMAGE: i32 = 5;

const BULLET_RADIUS: f32 = 6.0;
const SHOT_RADIUS: f32 = 8.0;
const PLAYER_RADIUS: f32 = 20.0;
const POWER_UP_RADIUS: f32 = 14.0;
const BOSS_RADIUS: f32 = 60.0;

fn enemy_radius(kind: EnemyKind) -> f32 {
    match kind {
        EnemyKind::Basic => 18.0,
        EnemyKind::Laser | EnemyKind::Missile => 22.0,
        EnemyKind::Nuker => 26.0,
        EnemyKind::Walker => 20.0,
        EnemyKind::Elite => 24.0,
    }
}

#[inline]
fn overlaps(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    (a - b).length_squared() <= (ra + rb) * (ra + rb)
}

/// One collision pass. Runs after spawning, before the boss controller.
pub fn run(state: &mut GameState) {
    bullets_vs_enemies(state);
    bullets_vs_boss(state);
    shots_vs_player(state);
    walkers_vs_player(state);
    player_vs_powerups(state);
}

fn bullets_vs_enemies(state: &mut GameState) {
    let mut hits: Vec<(EntityHandle, EntityHandle)> = Vec::new();
    for (bullet_h, bullet) in state.bullets.iter_active() {
        for (enemy_h, enemy) in state.enemies.iter_active() {
            if overlaps(bullet.pos, BULLET_RADIUS, enemy.pos, enemy_radius(enemy.kind)) {
                hits.push((bullet_h, enemy_h));
                break;
            }
        }
    }

    for (bullet_h, enemy_h) in hits {
        // Both sides must still be live: a bullet spent on an earlier
        // enemy, or an enemy already destroyed this tick, resolves nothing
        if state.enemies.get(enemy_h).is_none() {
            continue;
        }
        if !state.bullets.destroy(bullet_h) {
            continue;
        }
        let Some(enemy) = state.enemies.get_mut(enemy_h) else {
            continue;
        };
        enemy.hp -= 1;
        if enemy.hp > 0 {
            state.push_event(GameEvent::Sound("sfx_hit"));
            continue;
        }
        let (kind, pos) = (enemy.kind, enemy.pos);
        state.enemies.destroy(enemy_h);
        on_enemy_defeated(state, kind, pos);
    }
}

/// Archetype-specific defeat effects: score award, bursts, loot rolls
fn on_enemy_defeated(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
    state.push_event(GameEvent::Explosion { pos, scale: 1.0 });
    state.push_event(GameEvent::Sound("sfx_explosion"));
    super::ledger::update_score(state, kind.score_value());

    match kind {
        EnemyKind::Basic | EnemyKind::Missile => {}
        EnemyKind::Laser => raise_firepower(state),
        EnemyKind::Nuker => {
            // Radial debris burst
            for i in 0..8u32 {
                let theta = std::f32::consts::TAU * i as f32 / 8.0;
                let id = state.next_entity_id();
                state.shots.spawn(
                    id,
                    EnemyShot {
                        kind: ShotKind::Debris,
                        pos,
                        vel: heading_to_dir(theta) * 220.0,
                        damage: 10,
                        homing: false,
                        speed: 220.0,
                    },
                );
            }
        }
        EnemyKind::Walker => {
            // Splits into a circular burst of basic enemies
            for i in 0..4u32 {
                let theta = std::f32::consts::TAU * i as f32 / 4.0 + 0.4;
                let spawn_pos = pos + heading_to_dir(theta) * 40.0;
                let now = state.time_ms;
                let id = state.next_entity_id();
                let mut child = Enemy::new(EnemyKind::Basic, spawn_pos, now);
                child.vel = heading_to_dir(theta) * 120.0;
                state.enemies.spawn(id, child);
            }
        }
        EnemyKind::Elite => {
            if state.rng.random_bool(0.2) {
                raise_firepower(state);
            }
        }
    }

    if kind.elite_tier() && state.rng.random_bool(0.5) {
        let id = state.next_entity_id();
        state.powerups.spawn(
            id,
            PowerUp { pos, vel: Vec2::new(-60.0, 0.0) },
        );
    }
}

fn raise_firepower(state: &mut GameState) {
    if state.firepower < 3 {
        state.firepower += 1;
        state.push_event(GameEvent::FirepowerUp(state.firepower));
    }
}

fn bullets_vs_boss(state: &mut GameState) {
    let Some((boss_pos, attackable)) = state.boss.as_ref().map(|b| (b.pos, b.attackable())) else {
        return;
    };
    if !attackable {
        return;
    }

    let mut damage = 0;
    let spent: Vec<EntityHandle> = state
        .bullets
        .iter_active()
        .filter(|(_, b)| overlaps(b.pos, BULLET_RADIUS, boss_pos, BOSS_RADIUS))
        .map(|(h, b)| {
            damage += if b.guided { ROCKET_BOSS_DAMAGE } else { BULLET_BOSS_DAMAGE };
            h
        })
        .collect();
    if spent.is_empty() {
        return;
    }
    for handle in spent {
        state.bullets.destroy(handle);
    }
    if let Some(boss) = state.boss.as_mut() {
        boss.hp = (boss.hp - damage).max(0);
    }
    state.push_event(GameEvent::Sound("sfx_boss_hit"));
}

fn shots_vs_player(state: &mut GameState) {
    let player_pos = state.player.pos;
    let god = state.god_mode.active;

    let mut incoming = 0;
    let consumed: Vec<(EntityHandle, i32)> = state
        .shots
        .iter_active()
        .filter(|(_, s)| overlaps(s.pos, SHOT_RADIUS, player_pos, PLAYER_RADIUS))
        .map(|(h, s)| (h, s.damage))
        .collect();
    for (handle, damage) in consumed {
        // The hit is consumed either way; God-Mode just ignores the damage
        state.shots.destroy(handle);
        if !god {
            incoming += damage;
        }
    }
    if incoming > 0 {
        apply_player_damage(state, incoming);
    }
}

fn walkers_vs_player(state: &mut GameState) {
    let player_pos = state.player.pos;
    let god = state.god_mode.active;
    let now = state.time_ms;

    let mut incoming = 0;
    for (_, enemy) in state.enemies.iter_active_mut() {
        if enemy.kind != EnemyKind::Walker {
            continue;
        }
        if !overlaps(enemy.pos, enemy_radius(EnemyKind::Walker), player_pos, PLAYER_RADIUS) {
            continue;
        }
        if now < enemy.next_attack_ms {
            continue;
        }
        enemy.next_attack_ms = now + WALKER_MELEE_COOLDOWN_MS;
        if !god {
            incoming += WALKER_MELEE_DAMAGE;
        }
    }
    if incoming > 0 {
        apply_player_damage(state, incoming);
    }
}

fn apply_player_damage(state: &mut GameState, damage: i32) {
    state.health = (state.health - damage).max(0);
    state.push_event(GameEvent::Sound("sfx_player_hit"));
    if state.health == 0 && !state.is_game_over {
        state.is_game_over = true;
        state.push_event(GameEvent::Explosion { pos: state.player.pos, scale: 1.5 });
        state.push_event(GameEvent::GameOver {
            score: state.score,
            stage: state.current_stage,
        });
        log::info!("game over: score {} stage {}", state.score, state.current_stage);
    }
}

fn player_vs_powerups(state: &mut GameState) {
    let player_pos = state.player.pos;
    let collected: Vec<EntityHandle> = state
        .powerups
        .iter_active()
        .filter(|(_, p)| overlaps(p.pos, POWER_UP_RADIUS, player_pos, PLAYER_RADIUS))
        .map(|(h, _)| h)
        .collect();
    for handle in collected {
        if !state.powerups.destroy(handle) {
            continue;
        }
        state.health = (state.health + POWER_UP_HEAL).min(PLAYER_MAX_HEALTH);
        state.push_event(GameEvent::PowerUpCollected);
        state.push_event(GameEvent::Sound("sfx_powerup"));
    }
}
