//! Game state and core simulation types
//!
//! Everything the per-frame tick mutates lives here. Entities are plain data;
//! their update rules live in the sibling modules.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, RunSummary};
use super::progression::{LevelingRule, Progression};
use super::schedule::Scheduler;
use super::upgrades::UpgradeOffer;
use crate::consts::*;
use crate::ships::ShipConfig;

/// Stable handle for an enemy; survives reordering of the enemy list
pub type EntityId = u32;

/// 0xRRGGBB colors used by the simulation
pub mod palette {
    pub const CYAN: u32 = 0x00ffff;
    pub const MAGENTA: u32 = 0xff00ff;
    pub const YELLOW: u32 = 0xffff00;
    pub const GREEN: u32 = 0x00ff00;
    pub const RED: u32 = 0xff3333;
    pub const WHITE: u32 = 0xffffff;
    pub const GOLD: u32 = 0xffd700;
    pub const ORANGE: u32 = 0xffaa00;
    pub const PURPLE: u32 = 0xaa00ff;
    pub const BLOOD: u32 = 0xff0000;
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress (before the first start, or after `stop`)
    Stopped,
    /// Active gameplay
    Playing,
    /// Waiting for the player to pick an upgrade
    Upgrading,
    /// Paused by the player
    Paused,
    /// Player ship destroyed
    GameOver,
    /// Final boss cleared
    Victory,
}

/// A companion drone orbiting the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub pos: Vec2,
    pub orbit_angle: f32,
    pub cooldown: f32,
}

impl Drone {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            orbit_angle: 0.0,
            cooldown: 0.0,
        }
    }
}

impl Default for Drone {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned elite powers. Timed powers carry their frame counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUps {
    pub regen: Option<u32>,
    pub hacking: Option<u32>,
    pub missiles: Option<u32>,
    pub plasma: bool,
    pub chain: bool,
    pub time_shift: bool,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing / aim angle (radians)
    pub angle: f32,
    pub radius: f32,
    pub color: u32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub damage_mult: f32,
    /// Frames between volleys (lower is faster)
    pub fire_rate: f32,
    pub cooldown: f32,
    pub projectile_count: u32,
    pub projectile_size: f32,
    pub drones: Vec<Drone>,
    pub powers: PowerUps,
}

impl Player {
    pub fn new(arena: Vec2, ship: &ShipConfig) -> Self {
        let mut player = Self {
            pos: arena / 2.0,
            angle: -std::f32::consts::FRAC_PI_2,
            radius: PLAYER_RADIUS,
            color: ship.color,
            speed: ship.speed,
            hp: ship.max_hp,
            max_hp: ship.max_hp,
            damage_mult: ship.damage_mult,
            fire_rate: ship.fire_rate,
            cooldown: 0.0,
            projectile_count: ship.projectile_count,
            projectile_size: ship.projectile_size,
            drones: Vec::new(),
            powers: PowerUps::default(),
        };
        player.reset(arena, ship);
        player
    }

    /// Restore baseline stats for a new run
    pub fn reset(&mut self, arena: Vec2, ship: &ShipConfig) {
        self.pos = arena / 2.0;
        self.angle = -std::f32::consts::FRAC_PI_2;
        self.radius = PLAYER_RADIUS;
        self.color = ship.color;
        self.speed = ship.speed.max(f32::EPSILON);
        self.max_hp = ship.max_hp;
        self.hp = ship.max_hp;
        self.damage_mult = ship.damage_mult;
        self.fire_rate = ship.fire_rate;
        self.cooldown = 0.0;
        self.projectile_count = ship.projectile_count;
        self.projectile_size = ship.projectile_size;
        self.drones.clear();
        self.powers = PowerUps::default();
    }

    /// Move by a normalized direction, staying fully inside the arena
    pub fn move_by(&mut self, dir: Vec2, arena: Vec2) {
        let next = self.pos + dir * self.speed;
        self.pos = Vec2::new(
            next.x.clamp(self.radius, (arena.x - self.radius).max(self.radius)),
            next.y.clamp(self.radius, (arena.y - self.radius).max(self.radius)),
        );
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Shooter,
    Exploder,
    Tank,
    Boss,
}

impl EnemyKind {
    /// Kinds that fire at the player
    pub fn shoots(self) -> bool {
        matches!(self, EnemyKind::Shooter | EnemyKind::Boss)
    }

    /// Kinds that survive ramming the player
    pub fn survives_contact(self) -> bool {
        matches!(self, EnemyKind::Tank | EnemyKind::Boss)
    }
}

/// Boss volley shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// 8-way ring
    Normal,
    /// Fast aimed single shots
    Rapid,
    /// 3-way spread
    Shotgun,
    /// 12-way ring
    Final,
}

/// An enemy entity. Bosses use the same record with the optional fields set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EnemyKind,
    pub color: u32,
    pub speed: f32,
    pub hp: f32,
    /// Set for kinds that show a health bar (boss, tank)
    pub max_hp: Option<f32>,
    pub xp_value: u32,
    pub shoot_timer: f32,
    pub hacked: bool,
    /// Frames left where the enemy cannot act
    pub stun_timer: u32,
    pub attack_pattern: Option<AttackPattern>,
    /// Index into the boss archetype table
    pub archetype: Option<usize>,
    /// Contact hits landed while hacked
    pub hack_hits: u32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Health-bar fill for enemies that carry a max HP
    pub fn health_ratio(&self) -> Option<f32> {
        self.max_hp
            .filter(|max| *max > 0.0)
            .map(|max| (self.hp / max).clamp(0.0, 1.0))
    }
}

/// Player projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    DroneShot,
    Missile,
}

/// A player-owned projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub kind: ProjectileKind,
    /// Missile lock; looked up by id and re-validated every frame
    pub target: Option<EntityId>,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, kind: ProjectileKind) -> Self {
        Self {
            pos,
            vel,
            size,
            kind,
            target: None,
        }
    }
}

/// A hostile projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Camera shake requested by impacts (presentation applies the offset)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    pub frames: u32,
}

impl ScreenShake {
    pub fn trigger(&mut self, intensity: f32, duration_ms: f32) {
        self.intensity = intensity;
        self.frames = (duration_ms / 16.0) as u32;
    }

    pub fn update(&mut self) {
        if self.frames > 0 {
            self.frames -= 1;
        }
        if self.frames == 0 {
            self.intensity = 0.0;
        }
    }

    pub fn is_active(&self) -> bool {
        self.frames > 0
    }
}

/// Static parameters of a simulation
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub seed: u64,
    pub arena: Vec2,
    pub max_particles: usize,
    pub leveling: LevelingRule,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            max_particles: 500,
            leveling: LevelingRule::default(),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub config: SimConfig,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Gameplay tick counter (does not advance while paused)
    pub time_ticks: u64,
    pub player: Player,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub progress: Progression,
    /// Open upgrade choice, if any
    pub offer: Option<UpgradeOffer>,
    pub schedule: Scheduler,
    pub shake: ScreenShake,
    /// Where the ship went down
    pub wreckage: Option<Vec2>,
    /// Events emitted since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state with no run in progress
    pub fn new(config: SimConfig, ship: &ShipConfig) -> Self {
        Self {
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            phase: GamePhase::Stopped,
            time_ticks: 0,
            player: Player::new(config.arena, ship),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            particles: Vec::new(),
            progress: Progression::new(),
            offer: None,
            schedule: Scheduler::new(),
            shake: ScreenShake::default(),
            wreckage: None,
            events: Vec::new(),
            next_id: 1,
            config,
        }
    }

    pub fn arena(&self) -> Vec2 {
        self.config.arena
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset every store and begin a fresh run with the given loadout
    pub fn start_run(&mut self, ship: &ShipConfig) {
        self.clear_entities();
        self.player.reset(self.config.arena, ship);
        self.progress = Progression::new();
        self.offer = None;
        self.wreckage = None;
        self.time_ticks = 0;
        self.shake = ScreenShake::default();
        self.schedule.clear();
        self.schedule.arm_run_timers();
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {}, ship {})", self.seed, ship.name);
    }

    /// Stop the game: clear live entities and invalidate timers
    pub fn stop(&mut self) {
        self.clear_entities();
        self.offer = None;
        self.schedule.clear();
        self.phase = GamePhase::Stopped;
    }

    fn clear_entities(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.enemy_projectiles.clear();
        self.particles.clear();
    }

    /// Gameplay is frozen (upgrade selection or explicit pause)
    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GamePhase::Upgrading | GamePhase::Paused)
    }

    /// A run is in progress (possibly paused)
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Upgrading | GamePhase::Paused
        )
    }

    /// The run reached a terminal phase
    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Victory)
    }

    pub fn has_boss(&self) -> bool {
        self.enemies.iter().any(Enemy::is_boss)
    }

    /// Look up a live enemy by id
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id && e.is_alive())
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.progress.score,
            wave: self.progress.wave,
            level: self.progress.level,
            kills: self.progress.kills,
            boss_kills: self.progress.boss_kills,
            ticks: self.time_ticks,
            victory: self.phase == GamePhase::Victory,
        }
    }
}
