//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed 60 Hz tick, frame-counted timers
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod combat;
pub mod enemy;
pub mod events;
pub mod particles;
pub mod powers;
pub mod progression;
pub mod schedule;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use events::{GameEvent, RunSummary, SoundCue};
pub use progression::{LevelingRule, Progression, choose_upgrade};
pub use schedule::{Scheduler, Task};
pub use snapshot::{FrameView, NullPresentation, PresentationSink, build_frame};
pub use spawn::spawn;
pub use state::{
    AttackPattern, Drone, Enemy, EnemyKind, EnemyProjectile, EntityId, GamePhase, GameState,
    Particle, Player, PowerUps, Projectile, ProjectileKind, ScreenShake, SimConfig,
};
pub use tick::{TickInput, tick, toggle_pause};
pub use upgrades::{COMMON_UPGRADES, ELITE_UPGRADES, Upgrade, UpgradeOffer};
