//! Events emitted by the simulation
//!
//! The tick never talks to audio or UI directly; it pushes events onto the
//! state and whoever drives the loop drains them.

use serde::{Deserialize, Serialize};

use super::state::EnemyKind;
use super::upgrades::Upgrade;

/// Sound cues, synthesized by the audio sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    Hit,
    Explosion,
    LevelUp,
    BossAlert,
    PowerUp,
}

/// Final numbers of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub wave: u32,
    pub level: u32,
    pub kills: u32,
    pub boss_kills: u32,
    /// Gameplay ticks survived
    pub ticks: u64,
    pub victory: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    PlayerHit { amount: f32, hp: f32 },
    EnemyKilled { kind: EnemyKind, xp: u32 },
    LevelUp { level: u32 },
    UpgradeOffered { elite: bool },
    UpgradeApplied(Upgrade),
    WaveStarted { wave: u32 },
    BossSpawned { wave: u32, name: String },
    BossDefeated { wave: u32 },
    RunEnded(RunSummary),
}
