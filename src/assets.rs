//! Asset manifest and stage themes
//!
//! The simulation refers to assets only by key; the host preloads the
//! manifest and resolves keys to whatever it loaded. Keys here must
//! cover every key the simulation can emit.

use crate::sim::BossKind;

/// Asset categories, used by the host to route loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Sprite,
    Sound,
    Music,
}

/// One preloadable asset: key, relative path, category
pub type AssetEntry = (&'static str, &'static str, AssetKind);

/// Everything the host should load before the first tick
pub const MANIFEST: &[AssetEntry] = &[
    // Ships and enemies
    ("ship_stage1", "sprites/ship_stage1.png", AssetKind::Sprite),
    ("ship_stage2", "sprites/ship_stage2.png", AssetKind::Sprite),
    ("enemy_basic", "sprites/enemy_basic.png", AssetKind::Sprite),
    ("enemy_laser", "sprites/enemy_laser.png", AssetKind::Sprite),
    ("enemy_missile", "sprites/enemy_missile.png", AssetKind::Sprite),
    ("enemy_nuker", "sprites/enemy_nuker.png", AssetKind::Sprite),
    ("enemy_walker", "sprites/enemy_walker.png", AssetKind::Sprite),
    ("enemy_elite", "sprites/enemy_elite.png", AssetKind::Sprite),
    ("boss_firecracker", "sprites/boss_firecracker.png", AssetKind::Sprite),
    ("boss_tentacle", "sprites/boss_tentacle.png", AssetKind::Sprite),
    // Projectiles and pickups
    ("bullet", "sprites/bullet.png", AssetKind::Sprite),
    ("rocket", "sprites/rocket.png", AssetKind::Sprite),
    ("shot_laser", "sprites/shot_laser.png", AssetKind::Sprite),
    ("shot_missile", "sprites/shot_missile.png", AssetKind::Sprite),
    ("shot_bomb", "sprites/shot_bomb.png", AssetKind::Sprite),
    ("shot_debris", "sprites/shot_debris.png", AssetKind::Sprite),
    ("powerup_health", "sprites/powerup_health.png", AssetKind::Sprite),
    // Backdrops
    ("bg_stage1", "backgrounds/stage1.png", AssetKind::Sprite),
    ("bg_stage2", "backgrounds/stage2.png", AssetKind::Sprite),
    // Sounds
    ("sfx_shot", "audio/shot.ogg", AssetKind::Sound),
    ("sfx_rocket", "audio/rocket.ogg", AssetKind::Sound),
    ("sfx_hit", "audio/hit.ogg", AssetKind::Sound),
    ("sfx_explosion", "audio/explosion.ogg", AssetKind::Sound),
    ("sfx_explosion_big", "audio/explosion_big.ogg", AssetKind::Sound),
    ("sfx_player_hit", "audio/player_hit.ogg", AssetKind::Sound),
    ("sfx_powerup", "audio/powerup.ogg", AssetKind::Sound),
    ("sfx_rockets_online", "audio/rockets_online.ogg", AssetKind::Sound),
    ("sfx_god_mode", "audio/god_mode.ogg", AssetKind::Sound),
    ("sfx_boss_alarm", "audio/boss_alarm.ogg", AssetKind::Sound),
    ("sfx_boss_laser", "audio/boss_laser.ogg", AssetKind::Sound),
    ("sfx_boss_missile", "audio/boss_missile.ogg", AssetKind::Sound),
    ("sfx_boss_heavy", "audio/boss_heavy.ogg", AssetKind::Sound),
    ("sfx_boss_hit", "audio/boss_hit.ogg", AssetKind::Sound),
    ("sfx_stage_clear", "audio/stage_clear.ogg", AssetKind::Sound),
    ("sfx_victory", "audio/victory.ogg", AssetKind::Sound),
    // Music
    ("music_stage1", "audio/music_stage1.ogg", AssetKind::Music),
    ("music_stage2", "audio/music_stage2.ogg", AssetKind::Music),
    ("music_boss", "audio/music_boss.ogg", AssetKind::Music),
];

/// Per-stage presentation: backdrop, ship livery, music, and the boss
/// waiting at the end. Stage advance swaps all of these at once.
#[derive(Debug, Clone, Copy)]
pub struct StageTheme {
    pub background: &'static str,
    pub ship: &'static str,
    pub music: &'static str,
    pub boss: BossKind,
}

/// Theme for a 1-based stage number; stages past the last reuse the final
/// theme so a host asking early never panics
pub fn stage_theme(stage: u32) -> StageTheme {
    match stage {
        0 | 1 => StageTheme {
            background: "bg_stage1",
            ship: "ship_stage1",
            music: "music_stage1",
            boss: BossKind::Firecracker,
        },
        _ => StageTheme {
            background: "bg_stage2",
            ship: "ship_stage2",
            music: "music_stage2",
            boss: BossKind::Tentacle,
        },
    }
}

/// Look up a manifest path by key
pub fn asset_path(key: &str) -> Option<&'static str> {
    MANIFEST
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, path, _)| *path)
}
