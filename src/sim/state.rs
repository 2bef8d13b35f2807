//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.
//! `GameState` is the single authoritative record: every subsystem reads it,
//! and each field has exactly one writing subsystem per tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::quiz::QuizGate;
use super::registry::{EntityHandle, Registry};
use super::spawn::SpawnClock;
use crate::consts::*;
use crate::settings::Settings;

/// Enemy archetypes, ordered by when they appear in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Laser,
    Missile,
    Nuker,
    Walker,
    Elite,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Basic,
        EnemyKind::Laser,
        EnemyKind::Missile,
        EnemyKind::Nuker,
        EnemyKind::Walker,
        EnemyKind::Elite,
    ];

    pub fn max_hp(&self) -> i32 {
        match self {
            EnemyKind::Basic => 1,
            EnemyKind::Laser => 3,
            EnemyKind::Missile => 3,
            EnemyKind::Nuker => 4,
            EnemyKind::Walker => 3,
            EnemyKind::Elite => 6,
        }
    }

    pub fn score_value(&self) -> u64 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Laser => 500,
            EnemyKind::Missile => 400,
            EnemyKind::Nuker => 300,
            EnemyKind::Walker => 200,
            EnemyKind::Elite => 500,
        }
    }

    /// Elite-tier enemies roll a health power-up drop on death
    pub fn elite_tier(&self) -> bool {
        !matches!(self, EnemyKind::Basic)
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "enemy_basic",
            EnemyKind::Laser => "enemy_laser",
            EnemyKind::Missile => "enemy_missile",
            EnemyKind::Nuker => "enemy_nuker",
            EnemyKind::Walker => "enemy_walker",
            EnemyKind::Elite => "enemy_elite",
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: i32,
    /// Simulation time of the next shot, for archetypes that fire
    pub next_attack_ms: f64,
    /// Hover oscillation phase (laser/missile enemies bob in place)
    pub hover_phase: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, now_ms: f64) -> Self {
        let (vel, first_attack) = match kind {
            EnemyKind::Basic => (Vec2::new(-180.0, 0.0), f64::INFINITY),
            EnemyKind::Laser => (Vec2::new(-90.0, 0.0), now_ms + 1500.0),
            EnemyKind::Missile => (Vec2::new(-80.0, 0.0), now_ms + 2500.0),
            EnemyKind::Nuker => (Vec2::new(-60.0, 0.0), f64::INFINITY),
            // Walker velocity is recomputed every tick by pursuit steering;
            // its attack clock gates melee contact, ready immediately
            EnemyKind::Walker => (Vec2::ZERO, now_ms),
            EnemyKind::Elite => (Vec2::new(-110.0, 0.0), now_ms + 1200.0),
        };
        Self {
            kind,
            pos,
            vel,
            hp: kind.max_hp(),
            next_attack_ms: first_attack,
            hover_phase: 0.0,
        }
    }
}

/// Enemy projectile categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    Laser,
    Missile,
    Bomb,
    Debris,
}

impl ShotKind {
    pub fn sprite_key(&self) -> &'static str {
        match self {
            ShotKind::Laser => "shot_laser",
            ShotKind::Missile => "shot_missile",
            ShotKind::Bomb => "shot_bomb",
            ShotKind::Debris => "shot_debris",
        }
    }
}

/// A projectile fired at the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyShot {
    pub kind: ShotKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    /// Homing shots re-aim at the player with a bounded turn rate
    pub homing: bool,
    pub speed: f32,
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Guided rockets home on a live enemy and hit bosses harder
    pub guided: bool,
    /// Weak reference to the homing target; a despawned target simply
    /// stops steering the rocket
    pub target: Option<EntityHandle>,
}

/// A floating health power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Pointer-input destination; eased toward each tick while set
    pub pointer_target: Option<Vec2>,
    pub next_fire_ms: f64,
    pub next_rocket_ms: f64,
}

impl Player {
    fn at_start(view_w: f32, view_h: f32) -> Self {
        Self {
            pos: Vec2::new(view_w * 0.15, view_h * 0.6),
            pointer_target: None,
            next_fire_ms: 0.0,
            next_rocket_ms: 0.0,
        }
    }
}

/// God-Mode economy: a finite per-stage resource with a hard cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GodMode {
    pub active: bool,
    pub end_ms: f64,
    pub uses_remaining: u8,
    pub last_use_ms: f64,
}

impl Default for GodMode {
    fn default() -> Self {
        Self {
            active: false,
            end_ms: 0.0,
            uses_remaining: GOD_MODE_USES,
            // Far enough in the past that the first activation is never
            // blocked by the cooldown
            last_use_ms: -GOD_MODE_COOLDOWN_MS,
        }
    }
}

/// Host-consumable outputs of a tick. Drained by the render/audio adapter;
/// never read back by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(&'static str),
    Explosion { pos: Vec2, scale: f32 },
    FirepowerUp(u8),
    PowerUpCollected,
    GodModeActivated,
    GodModeExpired,
    BossSpawned(super::boss::BossKind),
    BossDefeated(super::boss::BossKind),
    /// Boss down; host should present the advance/restart prompt
    StageCleared,
    StageAdvanced(u32),
    GameCompleted,
    GameOver { score: u64, stage: u32 },
    CheckpointStarted,
    CheckpointPassed,
    CheckpointFailed,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; serialized so a restored run continues the same stream
    pub rng: Pcg32,

    /// Logical playfield size (host may resize)
    pub view_w: f32,
    pub view_h: f32,

    /// Monotonic simulation time since run start (milliseconds)
    pub time_ms: f64,
    pub score: u64,
    pub health: i32,
    pub firepower: u8,
    pub current_stage: u32,

    pub is_paused: bool,
    pub is_game_over: bool,
    pub is_stage_transition: bool,
    pub game_completed: bool,
    pub boss_fight: bool,
    /// Raised by the boss controller on defeat, consumed by the stage
    /// controller in the same tick
    pub stage_clear_pending: bool,

    pub has_guided_rockets: bool,
    pub god_mode: GodMode,

    pub player: Player,
    pub bullets: Registry<Bullet>,
    pub enemies: Registry<Enemy>,
    pub shots: Registry<EnemyShot>,
    pub powerups: Registry<PowerUp>,
    pub boss: Option<Boss>,

    pub spawn: SpawnClock,
    pub quiz: QuizGate,

    /// Tick outputs for the host (not part of the snapshot)
    #[serde(skip)]
    pub events: Vec<GameEvent>,

    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, &Settings::default())
    }

    pub fn with_settings(seed: u64, settings: &Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            view_w: VIEW_W,
            view_h: VIEW_H,
            time_ms: 0.0,
            score: 0,
            health: PLAYER_MAX_HEALTH,
            firepower: 1,
            current_stage: 1,
            is_paused: false,
            is_game_over: false,
            is_stage_transition: false,
            game_completed: false,
            boss_fight: false,
            stage_clear_pending: false,
            has_guided_rockets: false,
            god_mode: GodMode::default(),
            player: Player::at_start(VIEW_W, VIEW_H),
            bullets: Registry::new(),
            enemies: Registry::new(),
            shots: Registry::new(),
            powerups: Registry::new(),
            boss: None,
            spawn: SpawnClock::new(),
            quiz: QuizGate::new(settings.math_questions),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Full restart: everything resets except the question pool and the
    /// quiz-gate toggle, which belong to the host session
    pub fn restart(&mut self) {
        let quiz = self.quiz.reset_for_new_run();
        let settings = Settings { math_questions: quiz.enabled(), ..Settings::default() };
        let view = (self.view_w, self.view_h);
        *self = Self::with_settings(self.seed, &settings);
        self.quiz = quiz;
        (self.view_w, self.view_h) = view;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Elapsed whole minutes since run start (difficulty scaling input)
    pub fn minutes(&self) -> u32 {
        (self.time_ms / 60_000.0).floor().max(0.0) as u32
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the accumulated tick outputs; the host drains these once per
    /// frame for audio and visual effects
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current boss health, 0 when no boss is up (HUD convenience)
    pub fn boss_health(&self) -> i32 {
        self.boss.as_ref().map(|b| b.hp.max(0)).unwrap_or(0)
    }

    /// Wipe all non-boss enemies and projectiles (boss intro, stage reset)
    pub fn clear_airspace(&mut self) {
        self.enemies.clear();
        self.shots.clear();
        self.bullets.clear();
        self.powerups.clear();
    }

    /// True while the whole tick should short-circuit
    pub fn suspended(&self) -> bool {
        self.is_paused
            || self.is_game_over
            || self.is_stage_transition
            || self.game_completed
            || self.quiz.session_active()
    }

    /// Compact registries after all passes ran
    pub fn sweep_registries(&mut self) {
        self.bullets.sweep();
        self.enemies.sweep();
        self.shots.sweep();
        self.powerups.sweep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.current_stage, 1);
        assert_eq!(state.firepower, 1);
        assert!(!state.boss_fight);
        assert_eq!(state.god_mode.uses_remaining, GOD_MODE_USES);
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = GameState::new(42);
        state.score = 12_345;
        let id = state.next_entity_id();
        state
            .enemies
            .spawn(id, Enemy::new(EnemyKind::Walker, Vec2::new(700.0, 300.0), 0.0));

        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.score, 12_345);
        assert_eq!(restored.enemies.count_active(), 1);
        assert_eq!(restored.rng, state.rng);
    }

    #[test]
    fn test_restart_preserves_quiz_toggle() {
        let mut state = GameState::new(1);
        state.quiz.set_enabled(true);
        state.score = 9999;
        state.health = 10;
        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.health, PLAYER_MAX_HEALTH);
        assert!(state.quiz.enabled());
    }
}
