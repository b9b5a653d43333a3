//! Neon Galaxy - a survivor-style arena shooter
//!
//! Core modules:
//! - `sim`: Real-time simulation (entities, combat, progression, scheduler)
//! - `input`: Input normalization behind the `InputSource` seam
//! - `audio`: Sound cue sink (Web Audio on wasm32, logging elsewhere)
//! - `persistence`: Key-value storage backends
//! - `profile`: Lifetime stats, achievements, ship unlocks, leaderboard
//! - `session`: Wires the simulation to its collaborators

pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod profile;
pub mod session;
pub mod settings;
pub mod ships;
pub mod sim;

pub use error::StorageError;
pub use highscores::HighScores;
pub use session::Session;
pub use settings::{LevelingRule, QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate the frame-based timers are tuned for
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Milliseconds per tick (used to convert wall-clock cadences)
    pub const MS_PER_TICK: f32 = 1000.0 / TICKS_PER_SECOND as f32;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const PLAYER_FIRE_RATE: f32 = 15.0;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const PROJECTILE_SIZE: f32 = 4.0;
    /// Angle between adjacent bullets of a volley (radians)
    pub const VOLLEY_SPREAD: f32 = 0.2;
    pub const ENEMY_PROJECTILE_RADIUS: f32 = 6.0;
    pub const BULLET_BASE_DAMAGE: f32 = 1.0;
    pub const MISSILE_DAMAGE: f32 = 20.0;

    /// Spawning and waves (wall-clock cadences, in ms)
    pub const ENEMY_SPAWN_INTERVAL_MS: f32 = 800.0;
    pub const WAVE_DURATION_MS: f32 = 20_000.0;
    pub const BATCH_SPAWN_STAGGER_MS: f32 = 200.0;
    pub const BOSS_CLEAR_DELAY_MS: f32 = 2000.0;
    pub const ELITE_OFFER_DELAY_MS: f32 = 300.0;
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    /// Clearing the boss of this wave (or later) wins the run
    pub const FINAL_WAVE: u32 = 20;
    /// Distance outside the arena edge where regular enemies appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Progression
    pub const INITIAL_XP_REQUIRED: u32 = 100;
    pub const XP_SCALING: f32 = 1.2;
    pub const DIFFICULTY_STEP: f32 = 0.2;
    pub const UPGRADE_CHOICES: usize = 3;

    /// Contact and area damage
    pub const CONTACT_DAMAGE: f32 = 10.0;
    pub const BOSS_CONTACT_DAMAGE: f32 = 20.0;
    pub const ENEMY_SHOT_DAMAGE: f32 = 10.0;
    pub const EXPLOSION_PLAYER_DAMAGE: f32 = 20.0;
    pub const EXPLOSION_ENEMY_DAMAGE: f32 = 50.0;
    pub const EXPLODER_CONTACT_RADIUS: f32 = 80.0;
    pub const EXPLODER_DEATH_RADIUS: f32 = 40.0;
    pub const CHAIN_RADIUS: f32 = 150.0;
    pub const CHAIN_DAMAGE: f32 = 10.0;
    pub const PLASMA_RADIUS: f32 = 80.0;
    pub const PLASMA_DAMAGE: f32 = 0.2;

    /// Hacked enemies
    pub const HACK_RANGE: f32 = 400.0;
    pub const HACK_CONTACT_DAMAGE: f32 = 0.5;
    pub const HACK_HIT_LIMIT: u32 = 120;

    /// Level-up shockwave
    pub const LEVEL_UP_STUN_RADIUS: f32 = 400.0;
    pub const LEVEL_UP_STUN_TICKS: u32 = 60;

    /// Power-up cadences (ticks)
    pub const REGEN_INTERVAL: u32 = 180;
    pub const HACK_INTERVAL: u32 = 300;
    pub const MISSILE_INTERVAL: u32 = 180;

    /// Missiles
    pub const MISSILE_SIZE: f32 = 6.0;
    pub const MISSILE_LAUNCH_SPEED: f32 = 2.0;
    pub const MISSILE_SEEK_RADIUS: f32 = 400.0;
    pub const MISSILE_STEER: f32 = 0.5;
    pub const MISSILE_DRAG: f32 = 0.95;
    pub const MISSILE_BOOST: f32 = 1.05;

    /// Drones
    pub const DRONE_ORBIT_RADIUS: f32 = 60.0;
    pub const DRONE_ORBIT_SPEED: f32 = 2.0;
    pub const DRONE_RANGE: f32 = 300.0;
    pub const DRONE_SHOT_SPEED: f32 = 10.0;
    pub const DRONE_SHOT_SIZE: f32 = 3.0;
    pub const DRONE_COOLDOWN: f32 = 40.0;

    /// Enemy projectile slow factor while time-shift is owned
    pub const TIME_SHIFT_FACTOR: f32 = 0.6;

    /// Particles
    pub const PARTICLE_DECAY: f32 = 0.05;
    pub const PARTICLE_DAMPING: f32 = 0.98;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle (radians) of the direction from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// True if two circles overlap (strictly)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// True if a point lies outside the `[0, w] x [0, h]` rectangle
#[inline]
pub fn out_of_bounds(pos: Vec2, size: Vec2) -> bool {
    pos.x < 0.0 || pos.x > size.x || pos.y < 0.0 || pos.y > size.y
}

/// Normalized angle to [-π, π)
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
