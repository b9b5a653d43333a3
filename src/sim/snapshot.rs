//! Read-only frame snapshots for presentation
//!
//! The simulation never draws. Once per frame a `FrameView` is built from the
//! state and handed to whatever renders it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawn::BOSS_ARCHETYPES;
use super::state::{EnemyKind, GamePhase, GameState, ProjectileKind, ScreenShake};
use super::upgrades::Upgrade;
use crate::consts::PLASMA_RADIUS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub color: u32,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EnemyKind,
    pub color: u32,
    pub hacked: bool,
    pub stunned: bool,
    /// Health-bar fill, boss and tank only
    pub health: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub size: f32,
    pub kind: ProjectileKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: u32,
    pub alpha: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBar {
    pub name: String,
    pub ratio: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferView {
    pub elite: bool,
    pub choices: Vec<OfferChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferChoice {
    pub upgrade: Upgrade,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub wave: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_required: u32,
    pub kills: u32,
    pub boss: Option<BossBar>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameView {
    pub tick: u64,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub drones: Vec<Vec2>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub enemy_projectiles: Vec<Vec2>,
    pub particles: Vec<ParticleView>,
    /// Radius of the plasma ring around the player, if owned
    pub plasma_ring: Option<f32>,
    pub shake: ScreenShake,
    pub wreckage: Option<Vec2>,
    pub hud: HudView,
    pub offer: Option<OfferView>,
}

/// Receives one snapshot per frame
pub trait PresentationSink {
    fn present(&mut self, frame: &FrameView);
}

/// Discards every frame (headless runs)
#[derive(Debug, Default)]
pub struct NullPresentation;

impl PresentationSink for NullPresentation {
    fn present(&mut self, _frame: &FrameView) {}
}

/// Build the snapshot for the current state
pub fn build_frame(state: &GameState) -> FrameView {
    let player = &state.player;
    let boss = state.enemies.iter().find(|e| e.is_boss()).map(|b| BossBar {
        name: b
            .archetype
            .and_then(|i| BOSS_ARCHETYPES.get(i))
            .map_or("BOSS", |a| a.name)
            .to_string(),
        ratio: b.health_ratio().unwrap_or(0.0),
    });

    FrameView {
        tick: state.time_ticks,
        phase: state.phase,
        player: PlayerView {
            pos: player.pos,
            angle: player.angle,
            radius: player.radius,
            color: player.color,
            hp: player.hp,
            max_hp: player.max_hp,
        },
        drones: player.drones.iter().map(|d| d.pos).collect(),
        enemies: state
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                pos: e.pos,
                radius: e.radius,
                kind: e.kind,
                color: e.color,
                hacked: e.hacked,
                stunned: e.stun_timer > 0,
                health: e.health_ratio(),
            })
            .collect(),
        projectiles: state
            .projectiles
            .iter()
            .map(|p| ProjectileView {
                pos: p.pos,
                size: p.size,
                kind: p.kind,
            })
            .collect(),
        enemy_projectiles: state.enemy_projectiles.iter().map(|p| p.pos).collect(),
        particles: state
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                color: p.color,
                alpha: p.life.clamp(0.0, 1.0),
                size: p.size,
            })
            .collect(),
        plasma_ring: player.powers.plasma.then_some(PLASMA_RADIUS),
        shake: state.shake,
        wreckage: state.wreckage,
        hud: HudView {
            score: state.progress.score,
            wave: state.progress.wave,
            level: state.progress.level,
            xp: state.progress.xp,
            xp_required: state.progress.xp_required,
            kills: state.progress.kills,
            boss,
        },
        offer: state.offer.as_ref().map(|offer| OfferView {
            elite: offer.elite,
            choices: offer
                .choices
                .iter()
                .map(|u| OfferChoice {
                    upgrade: *u,
                    name: u.name().to_string(),
                    description: u.description().to_string(),
                })
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{ShipKind, ship_config};
    use crate::sim::spawn::{spawn, spawn_enemy};
    use crate::sim::state::SimConfig;

    #[test]
    fn test_frame_reports_boss_and_flags() {
        let ship = ship_config(ShipKind::Pioneer);
        let mut state = GameState::new(SimConfig::default(), ship);
        state.start_run(ship);
        state.progress.wave = 5;
        spawn(&mut state, 5, true);
        let id = spawn_enemy(&mut state, EnemyKind::Basic, Vec2::new(10.0, 10.0), 5);
        if let Some(e) = state.enemies.iter_mut().find(|e| e.id == id) {
            e.hacked = true;
            e.stun_timer = 3;
        }
        state.player.powers.plasma = true;

        let frame = build_frame(&state);
        let bar = frame.hud.boss.as_ref().unwrap();
        assert_eq!(bar.name, "ALPHA");
        assert_eq!(bar.ratio, 1.0);
        assert_eq!(frame.enemies.len(), 2);
        assert!(frame.enemies[1].hacked && frame.enemies[1].stunned);
        assert!(frame.enemies[1].health.is_none());
        assert_eq!(frame.plasma_ring, Some(PLASMA_RADIUS));
    }

    #[test]
    fn test_frame_serializes_to_json() {
        let ship = ship_config(ShipKind::Pioneer);
        let mut state = GameState::new(SimConfig::default(), ship);
        state.start_run(ship);
        crate::sim::progression::offer_upgrade(&mut state, false);
        let json = serde_json::to_string(&build_frame(&state)).unwrap();
        assert!(json.contains("\"offer\":{\"elite\":false"));
    }
}
