//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by registry slot)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod ledger;
pub mod movement;
pub mod quiz;
pub mod registry;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;
pub mod timers;

pub use boss::{Boss, BossAttack, BossKind, BossStatus, boss_phase};
pub use quiz::{Question, QuestionLoadError, QuizGate, SessionOutcome};
pub use registry::{EntityHandle, Registry};
pub use state::{
    Bullet, Enemy, EnemyKind, EnemyShot, GameEvent, GameState, GodMode, Player, PowerUp, ShotKind,
};
pub use tick::{TickInput, tick};
pub use timers::{TimerId, TimerSet};
