//! Nova Strike - side-scrolling arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, bosses)
//! - `assets`: Symbolic sprite/sound key manifest for the render host
//! - `settings`: Host-facing preferences
//! - `highscores`: Local leaderboard
//!
//! The crate renders nothing and touches no platform APIs. The host drives
//! `sim::tick()` at a fixed timestep, drains `GameState::events` for
//! sound/explosion cues, and draws from the state snapshot.

pub mod assets;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Logical playfield dimensions
    pub const VIEW_W: f32 = 800.0;
    pub const VIEW_H: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_HALF_W: f32 = 24.0;
    pub const PLAYER_HALF_H: f32 = 16.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Top third of the screen is off-limits to the player
    pub const PLAYER_MIN_Y_FRAC: f32 = 0.33;

    /// Autofire cadence (milliseconds between shots)
    pub const FIRE_INTERVAL_MS: f64 = 300.0;
    /// Guided rockets fire on their own cadence once unlocked
    pub const ROCKET_INTERVAL_MS: f64 = 2000.0;
    /// Score threshold that unlocks guided rockets
    pub const GUIDED_ROCKET_SCORE: u64 = 15_000;

    pub const BULLET_SPEED: f32 = 600.0;
    pub const ROCKET_SPEED: f32 = 420.0;
    /// Max bearing correction per tick for homing projectiles (radians)
    pub const HOMING_MAX_TURN: f32 = 0.08;

    /// Entities beyond this margin outside the playfield are culled
    pub const CULL_MARGIN: f32 = 100.0;

    /// Healing from a health power-up (percentage points)
    pub const POWER_UP_HEAL: i32 = 20;

    /// God-Mode economy
    pub const GOD_MODE_USES: u8 = 5;
    pub const GOD_MODE_DURATION_MS: f64 = 30_000.0;
    pub const GOD_MODE_COOLDOWN_MS: f64 = 180_000.0;

    /// Checkpoint quiz triggers on every multiple of this score
    pub const CHECKPOINT_STEP: u64 = 5000;

    /// Boss spawn gates
    pub const STAGE1_BOSS_SCORE: u64 = 20_000;
    pub const STAGE2_BOSS_SCORE: u64 = 60_000;
    /// Flat award for a boss kill
    pub const BOSS_KILL_SCORE: u64 = 10_000;

    /// Elite enemies unlock at this score
    pub const ELITE_UNLOCK_SCORE: u64 = 1000;

    /// Directional wave cadence on stage 2+ (ms) and size
    pub const WAVE_INTERVAL_MS: f64 = 5000.0;
    pub const WAVE_SIZE: u32 = 5;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading angle of a (non-zero) direction vector
#[inline]
pub fn dir_to_heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}
