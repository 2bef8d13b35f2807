//! Movement, weapons fire, and bounds
//!
//! Advances the player (keyboard integration or pointer easing), enemy AI
//! patterns, projectile ballistics and bounded-turn homing, then culls
//! everything that drifted past the playfield margin.

use glam::Vec2;

use super::state::{Bullet, EnemyKind, EnemyShot, GameEvent, GameState, ShotKind};
use super::tick::TickInput;
use crate::consts::*;
use crate::{dir_to_heading, heading_to_dir, normalize_angle};

/// Steer a homing projectile: clamp the bearing correction per tick so the
/// pursuit curves instead of snapping
pub fn steer_homing(vel: Vec2, pos: Vec2, target: Vec2, speed: f32, max_turn: f32) -> Vec2 {
    let to_target = target - pos;
    if to_target.length_squared() < 1e-6 {
        return vel;
    }
    let desired = dir_to_heading(to_target);
    let current = if vel.length_squared() > 1e-6 {
        dir_to_heading(vel)
    } else {
        desired
    };
    let delta = normalize_angle(desired - current).clamp(-max_turn, max_turn);
    heading_to_dir(current + delta) * speed
}

/// Walker pursuit speed grows with elapsed time, capped
pub fn walker_speed(minutes: u32) -> f32 {
    150.0 + (10.0 * minutes as f32).min(50.0)
}

/// Pointer easing fraction: farther targets close faster, capped
pub fn pointer_ease(distance: f32) -> f32 {
    (0.15 + distance / 500.0).min(0.35)
}

/// One movement pass. Runs first in the tick.
pub fn run(state: &mut GameState, input: &TickInput, dt: f32) {
    move_player(state, input, dt);
    fire_player_weapons(state);
    update_enemies(state, dt);
    update_bullets(state, dt);
    update_shots(state, dt);
    update_powerups(state, dt);
    cull_offscreen(state);
}

fn move_player(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(target) = input.pointer {
        state.player.pointer_target = Some(target);
    }

    let keyboard = Vec2::new(input.move_x, input.move_y);
    if keyboard.length_squared() > 0.0 {
        // Keyboard takes over from any in-flight pointer move
        state.player.pointer_target = None;
        let step = keyboard.clamp_length_max(1.0) * PLAYER_SPEED * dt;
        state.player.pos += step;
    } else if let Some(target) = state.player.pointer_target {
        let to_target = target - state.player.pos;
        let distance = to_target.length();
        if distance < 2.0 {
            state.player.pointer_target = None;
        } else {
            state.player.pos += to_target * pointer_ease(distance);
        }
    }

    // The top third of the screen stays off-limits
    state.player.pos.x = state
        .player
        .pos
        .x
        .clamp(PLAYER_HALF_W, state.view_w - PLAYER_HALF_W);
    state.player.pos.y = state
        .player
        .pos
        .y
        .clamp(state.view_h * PLAYER_MIN_Y_FRAC, state.view_h - PLAYER_HALF_H);
}

fn fire_player_weapons(state: &mut GameState) {
    let now = state.time_ms;
    let god = state.god_mode.active;
    let interval = if god { FIRE_INTERVAL_MS / 3.0 } else { FIRE_INTERVAL_MS };

    if now >= state.player.next_fire_ms {
        state.player.next_fire_ms = now + interval;
        let origin = state.player.pos + Vec2::new(PLAYER_HALF_W, 0.0);

        let headings: &[f32] = if god {
            // God-Mode overrides the firepower pattern with a 3-way spread
            &[-0.25, 0.0, 0.25]
        } else {
            match state.firepower {
                1 => &[0.0],
                2 => &[-0.08, 0.08],
                _ => &[-0.15, 0.0, 0.15],
            }
        };
        for &theta in headings {
            let id = state.next_entity_id();
            state.bullets.spawn(
                id,
                Bullet {
                    pos: origin,
                    vel: heading_to_dir(theta) * BULLET_SPEED,
                    guided: false,
                    target: None,
                },
            );
        }
        state.push_event(GameEvent::Sound("sfx_shot"));
    }

    if state.has_guided_rockets && now >= state.player.next_rocket_ms {
        state.player.next_rocket_ms = now + ROCKET_INTERVAL_MS;
        let origin = state.player.pos + Vec2::new(PLAYER_HALF_W, -10.0);
        let player_pos = state.player.pos;

        // Lock onto the nearest live enemy; during a boss fight the rocket
        // steers at the boss instead (no registry handle needed)
        let target = state
            .enemies
            .iter_active()
            .min_by(|(_, a), (_, b)| {
                let da = (a.pos - player_pos).length_squared();
                let db = (b.pos - player_pos).length_squared();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(handle, _)| handle);

        let id = state.next_entity_id();
        state.bullets.spawn(
            id,
            Bullet {
                pos: origin,
                vel: Vec2::new(ROCKET_SPEED, 0.0),
                guided: true,
                target,
            },
        );
        state.push_event(GameEvent::Sound("sfx_rocket"));
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let now = state.time_ms;
    let minutes = state.minutes();
    let player_pos = state.player.pos;
    let view_w = state.view_w;
    let mut shots: Vec<EnemyShot> = Vec::new();

    for (_, enemy) in state.enemies.iter_active_mut() {
        match enemy.kind {
            EnemyKind::Walker => {
                let to_player = player_pos - enemy.pos;
                if to_player.length_squared() > 1.0 {
                    enemy.vel = to_player.normalize() * walker_speed(minutes);
                }
            }
            EnemyKind::Laser | EnemyKind::Missile => {
                // Advance to a firing lane, then hover and bob
                let hover_x = view_w * 0.72;
                if enemy.pos.x <= hover_x {
                    enemy.vel.x = 0.0;
                    enemy.hover_phase += dt;
                    enemy.vel.y = (enemy.hover_phase * 2.0).sin() * 40.0;
                }
            }
            _ => {}
        }
        enemy.pos += enemy.vel * dt;

        if now >= enemy.next_attack_ms {
            let (kind, speed, homing, interval) = match enemy.kind {
                EnemyKind::Laser => (ShotKind::Laser, 350.0, false, 2500.0),
                EnemyKind::Missile => (ShotKind::Missile, 250.0, true, 4000.0),
                EnemyKind::Elite => (ShotKind::Laser, 400.0, false, 2000.0),
                _ => continue,
            };
            enemy.next_attack_ms = now + interval;
            let dir = (player_pos - enemy.pos).normalize_or_zero();
            let dir = if dir.length_squared() > 0.0 { dir } else { Vec2::new(-1.0, 0.0) };
            shots.push(EnemyShot {
                kind,
                pos: enemy.pos,
                vel: dir * speed,
                damage: 20,
                homing,
                speed,
            });
        }
    }

    for shot in shots {
        let id = state.next_entity_id();
        state.shots.spawn(id, shot);
    }
}

fn update_bullets(state: &mut GameState, dt: f32) {
    let boss_pos = state.boss.as_ref().map(|b| b.pos);
    // Snapshot target positions to keep the bullet iteration borrow-clean
    let targets: Vec<(super::registry::EntityHandle, Vec2)> = state
        .enemies
        .iter_active()
        .map(|(h, e)| (h, e.pos))
        .collect();

    for (_, bullet) in state.bullets.iter_active_mut() {
        if bullet.guided {
            let aim = bullet
                .target
                .and_then(|h| targets.iter().find(|(th, _)| *th == h).map(|(_, p)| *p))
                .or(boss_pos);
            // A despawned target stops steering the rocket; it flies on
            if let Some(target) = aim {
                bullet.vel =
                    steer_homing(bullet.vel, bullet.pos, target, ROCKET_SPEED, HOMING_MAX_TURN);
            }
        }
        bullet.pos += bullet.vel * dt;
    }
}

fn update_shots(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    for (_, shot) in state.shots.iter_active_mut() {
        if shot.homing {
            shot.vel = steer_homing(shot.vel, shot.pos, player_pos, shot.speed, HOMING_MAX_TURN);
        }
        shot.pos += shot.vel * dt;
    }
}

fn update_powerups(state: &mut GameState, dt: f32) {
    for (_, powerup) in state.powerups.iter_active_mut() {
        powerup.pos += powerup.vel * dt;
    }
}

/// Drop everything beyond the playfield margin
fn cull_offscreen(state: &mut GameState) {
    let max_x = state.view_w + CULL_MARGIN;
    let max_y = state.view_h + CULL_MARGIN;
    let outside = move |pos: Vec2| {
        pos.x < -CULL_MARGIN || pos.x > max_x || pos.y < -CULL_MARGIN || pos.y > max_y
    };
    state.bullets.destroy_where(|b| outside(b.pos));
    state.enemies.destroy_where(|e| outside(e.pos));
    state.shots.destroy_where(|s| outside(s.pos));
    state.powerups.destroy_where(|p| outside(p.pos));
}
