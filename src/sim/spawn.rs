//! Enemy spawning: regular kinds at the arena edge, bosses from the top

use glam::Vec2;
use rand::Rng;

use super::events::{GameEvent, SoundCue};
use super::state::{AttackPattern, EnemyKind, Enemy, EntityId, GameState, palette};
use crate::consts::*;

pub const BOSS_BASE_HP: f32 = 150.0;
pub const BOSS_HP_PER_WAVE: f32 = 15.0;
/// Global reduction applied to every boss
pub const BOSS_HP_SCALE: f32 = 0.7;
pub const BOSS_XP: u32 = 1000;
pub const BOSS_FIRST_SHOT: f32 = 80.0;
/// Bosses enter from above the arena
pub const BOSS_ENTRY_Y: f32 = -100.0;

/// A boss variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossArchetype {
    pub name: &'static str,
    pub color: u32,
    pub hp_mult: f32,
    pub speed: f32,
    pub radius: f32,
    pub pattern: AttackPattern,
}

/// Bosses in order of appearance (waves 5, 10, 15, 20, 25)
pub const BOSS_ARCHETYPES: [BossArchetype; 5] = [
    BossArchetype {
        name: "ALPHA",
        color: palette::MAGENTA,
        hp_mult: 1.0,
        speed: 0.8,
        radius: 50.0,
        pattern: AttackPattern::Normal,
    },
    BossArchetype {
        name: "BETA",
        color: palette::RED,
        hp_mult: 1.2,
        speed: 1.2,
        radius: 45.0,
        pattern: AttackPattern::Rapid,
    },
    BossArchetype {
        name: "GAMMA",
        color: palette::ORANGE,
        hp_mult: 1.5,
        speed: 0.6,
        radius: 60.0,
        pattern: AttackPattern::Shotgun,
    },
    BossArchetype {
        name: "OMEGA",
        color: palette::GOLD,
        hp_mult: 2.0,
        speed: 0.7,
        radius: 70.0,
        pattern: AttackPattern::Final,
    },
    BossArchetype {
        name: "OMEGA PRIME",
        color: palette::WHITE,
        hp_mult: 2.5,
        speed: 0.9,
        radius: 75.0,
        pattern: AttackPattern::Final,
    },
];

/// Archetype slot for a boss wave
pub fn archetype_index(wave: u32) -> usize {
    ((wave / BOSS_WAVE_INTERVAL).saturating_sub(1) % BOSS_ARCHETYPES.len() as u32) as usize
}

pub fn boss_hp(wave: u32, archetype: &BossArchetype) -> f32 {
    (BOSS_BASE_HP + wave as f32 * BOSS_HP_PER_WAVE) * archetype.hp_mult * BOSS_HP_SCALE
}

/// Base stats of a regular kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub radius: f32,
    pub hp: f32,
    pub xp: u32,
    pub color: u32,
}

/// Stat table for regular kinds (HP before the difficulty multiplier).
/// Bosses have no entry; they come from the archetype table.
pub fn regular_stats(kind: EnemyKind, wave: u32) -> Option<EnemyStats> {
    let w = wave as f32;
    let stats = match kind {
        EnemyKind::Shooter => EnemyStats {
            speed: 3.0,
            radius: 12.0,
            hp: 5.0 + w,
            xp: 20,
            color: 0xff4444,
        },
        EnemyKind::Exploder => EnemyStats {
            speed: 5.0,
            radius: 12.0,
            hp: 5.0 + w,
            xp: 20,
            color: 0xffaa00,
        },
        EnemyKind::Tank => EnemyStats {
            speed: 1.5,
            radius: 24.0,
            hp: 20.0 + w,
            xp: 50,
            color: 0x444444,
        },
        EnemyKind::Basic => EnemyStats {
            speed: 3.0 + 0.1 * w,
            radius: 12.0,
            hp: 2.0 + w,
            xp: 10,
            color: 0x00ffaa,
        },
        EnemyKind::Boss => return None,
    };
    Some(stats)
}

/// Pick a regular kind from a uniform roll in [0, 1)
pub fn roll_kind(wave: u32, roll: f32) -> EnemyKind {
    if wave >= 5 && roll < 0.05 {
        EnemyKind::Tank
    } else if wave >= 4 && roll < 0.10 {
        EnemyKind::Exploder
    } else if wave >= 2 && roll < 0.20 {
        EnemyKind::Shooter
    } else {
        EnemyKind::Basic
    }
}

/// Random point just outside one of the arena edges
fn edge_position(state: &mut GameState) -> Vec2 {
    let arena = state.arena();
    let rng = &mut state.rng;
    if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) {
            -SPAWN_MARGIN
        } else {
            arena.x + SPAWN_MARGIN
        };
        Vec2::new(x, rng.random::<f32>() * arena.y)
    } else {
        let y = if rng.random_bool(0.5) {
            -SPAWN_MARGIN
        } else {
            arena.y + SPAWN_MARGIN
        };
        Vec2::new(rng.random::<f32>() * arena.x, y)
    }
}

/// Append exactly one enemy for `wave`
pub fn spawn(state: &mut GameState, wave: u32, is_boss: bool) -> EntityId {
    if is_boss {
        let entry = Vec2::new(state.arena().x / 2.0, BOSS_ENTRY_Y);
        return spawn_boss(state, wave, entry);
    }
    let kind = roll_kind(wave, state.rng.random());
    let pos = edge_position(state);
    spawn_enemy(state, kind, pos, wave)
}

/// Place an enemy of a given kind; bosses get their archetype for `wave`
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2, wave: u32) -> EntityId {
    let Some(stats) = regular_stats(kind, wave) else {
        return spawn_boss(state, wave, pos);
    };
    let hp = stats.hp * state.progress.difficulty;
    let shoot_timer = state.rng.random::<f32>() * 100.0;
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        radius: stats.radius,
        kind,
        color: stats.color,
        speed: stats.speed,
        hp,
        max_hp: (kind == EnemyKind::Tank).then_some(hp),
        xp_value: stats.xp,
        shoot_timer,
        hacked: false,
        stun_timer: 0,
        attack_pattern: None,
        archetype: None,
        hack_hits: 0,
    });
    log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
    id
}

fn spawn_boss(state: &mut GameState, wave: u32, pos: Vec2) -> EntityId {
    let index = archetype_index(wave);
    let archetype = BOSS_ARCHETYPES[index];
    let hp = boss_hp(wave, &archetype);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        radius: archetype.radius,
        kind: EnemyKind::Boss,
        color: archetype.color,
        speed: archetype.speed,
        hp,
        max_hp: Some(hp),
        xp_value: BOSS_XP,
        shoot_timer: BOSS_FIRST_SHOT,
        hacked: false,
        stun_timer: 0,
        attack_pattern: Some(archetype.pattern),
        archetype: Some(index),
        hack_hits: 0,
    });
    log::info!("Boss {} incoming (wave {}, {:.0} HP)", archetype.name, wave, hp);
    state.emit(GameEvent::Sound(SoundCue::BossAlert));
    state.emit(GameEvent::BossSpawned {
        wave,
        name: archetype.name.to_string(),
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{ShipKind, ship_config};
    use crate::sim::state::SimConfig;

    fn state() -> GameState {
        GameState::new(SimConfig::default(), ship_config(ShipKind::Pioneer))
    }

    #[test]
    fn test_roll_kind_thresholds() {
        assert_eq!(roll_kind(1, 0.01), EnemyKind::Basic);
        assert_eq!(roll_kind(2, 0.15), EnemyKind::Shooter);
        assert_eq!(roll_kind(4, 0.07), EnemyKind::Exploder);
        assert_eq!(roll_kind(4, 0.01), EnemyKind::Exploder);
        assert_eq!(roll_kind(5, 0.01), EnemyKind::Tank);
        assert_eq!(roll_kind(9, 0.5), EnemyKind::Basic);
    }

    #[test]
    fn test_regular_spawn_lands_outside_arena() {
        let mut state = state();
        for _ in 0..200 {
            let id = spawn(&mut state, 3, false);
            let e = state.enemy(id).unwrap();
            let a = state.arena();
            let on_vertical = e.pos.x == -SPAWN_MARGIN || e.pos.x == a.x + SPAWN_MARGIN;
            let on_horizontal = e.pos.y == -SPAWN_MARGIN || e.pos.y == a.y + SPAWN_MARGIN;
            assert!(on_vertical || on_horizontal);
            assert!(e.shoot_timer >= 0.0 && e.shoot_timer < 100.0);
        }
        assert_eq!(state.enemies.len(), 200);
    }

    #[test]
    fn test_difficulty_scales_regular_hp() {
        let mut state = state();
        state.progress.difficulty = 1.4;
        let id = spawn_enemy(&mut state, EnemyKind::Tank, Vec2::ZERO, 5);
        let tank = state.enemy(id).unwrap();
        assert!((tank.hp - 25.0 * 1.4).abs() < 1e-4);
        assert_eq!(tank.xp_value, 50);
        assert_eq!(tank.max_hp, Some(tank.hp));
    }

    #[test]
    fn test_boss_stats() {
        let mut state = state();
        state.progress.difficulty = 3.0;
        let id = spawn(&mut state, 10, true);
        let boss = state.enemy(id).unwrap();
        assert_eq!(boss.kind, EnemyKind::Boss);
        assert_eq!(boss.archetype, Some(1));
        assert_eq!(boss.attack_pattern, Some(AttackPattern::Rapid));
        assert!((boss.hp - 300.0 * 1.2 * 0.7).abs() < 1e-3);
        assert_eq!(boss.pos, Vec2::new(state.arena().x / 2.0, BOSS_ENTRY_Y));
        assert_eq!(boss.xp_value, BOSS_XP);
        assert_eq!(boss.shoot_timer, BOSS_FIRST_SHOT);
    }

    #[test]
    fn test_placing_a_boss_uses_its_archetype() {
        let mut state = state();
        let pos = Vec2::new(300.0, 200.0);
        let id = spawn_enemy(&mut state, EnemyKind::Boss, pos, 5);
        let boss = state.enemy(id).unwrap();
        assert_eq!(boss.pos, pos);
        assert_eq!(boss.archetype, Some(0));
        assert!(boss.attack_pattern.is_some());
        assert_eq!(boss.xp_value, BOSS_XP);
        assert!(regular_stats(EnemyKind::Boss, 5).is_none());
    }

    #[test]
    fn test_archetype_order() {
        assert_eq!(archetype_index(5), 0);
        assert_eq!(archetype_index(20), 3);
        assert_eq!(archetype_index(25), 4);
        assert_eq!(archetype_index(30), 0);
    }
}
