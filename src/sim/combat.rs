//! Combat resolution
//!
//! Hit tests are plain circle overlaps. Damage only lowers health; removal
//! and rewards happen in one place, `handle_deaths`, so every death is
//! counted exactly once no matter what dealt the final blow.

use glam::Vec2;

use super::events::{GameEvent, SoundCue};
use super::progression::{self, gain_xp};
use super::schedule::{Task, ms_to_ticks};
use super::state::{Enemy, EnemyKind, GameState, Projectile, ProjectileKind, palette};
use crate::circles_overlap;
use crate::consts::*;

/// Damage a projectile deals on hit
pub fn projectile_damage(projectile: &Projectile, damage_mult: f32) -> f32 {
    match projectile.kind {
        ProjectileKind::Missile => MISSILE_DAMAGE,
        ProjectileKind::Bullet | ProjectileKind::DroneShot => {
            BULLET_BASE_DAMAGE * damage_mult * (projectile.size / PROJECTILE_SIZE)
        }
    }
}

/// Hurt the player. Ignored once the ship is down; reaching zero ends the run.
pub fn damage_player(state: &mut GameState, amount: f32) {
    if !state.is_active() || state.player.is_dead() {
        return;
    }
    state.player.take_damage(amount);
    let pos = state.player.pos;
    let hp = state.player.hp;
    state.shake.trigger(10.0, 300.0);
    state.burst(pos, palette::BLOOD, 10);
    state.emit(GameEvent::Sound(SoundCue::Hit));
    state.emit(GameEvent::PlayerHit { amount, hp });
    log::debug!("Player hit for {:.1} ({:.1} left)", amount, hp);

    if state.player.is_dead() {
        let color = state.player.color;
        state.explosion_ring(pos, color, 60);
        state.emit(GameEvent::Sound(SoundCue::Explosion));
        progression::end_run(state, false);
    }
}

/// Area blast. Hurts the player unless `harmless`, always hurts enemies.
pub fn explode(state: &mut GameState, pos: Vec2, radius: f32, harmless: bool) {
    state.explosion_ring(pos, palette::ORANGE, 20);
    state.shake.trigger(8.0, 250.0);
    state.emit(GameEvent::Sound(SoundCue::Explosion));

    if !harmless && pos.distance(state.player.pos) < radius + state.player.radius {
        damage_player(state, EXPLOSION_PLAYER_DAMAGE);
    }
    for enemy in state.enemies.iter_mut() {
        if enemy.pos.distance(pos) < radius + enemy.radius {
            enemy.hp -= EXPLOSION_ENEMY_DAMAGE;
        }
    }
}

/// Player projectiles against enemies: first overlapping enemy takes the hit
pub fn resolve_projectile_hits(state: &mut GameState) {
    let damage_mult = state.player.damage_mult;
    let enemies = &mut state.enemies;
    let mut hits: Vec<(Vec2, u32)> = Vec::new();

    state.projectiles.retain(|projectile| {
        let target = enemies.iter_mut().find(|e| {
            e.is_alive() && circles_overlap(e.pos, e.radius, projectile.pos, projectile.size)
        });
        let Some(enemy) = target else {
            return true;
        };
        enemy.hp -= projectile_damage(projectile, damage_mult);
        hits.push((projectile.pos, enemy.color));
        false
    });

    for (pos, color) in hits {
        state.burst(pos, color, 3);
    }
}

/// Enemy projectiles against the player
pub fn resolve_enemy_shots(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let mut hits = 0;
    state.enemy_projectiles.retain(|shot| {
        let hit = circles_overlap(shot.pos, ENEMY_PROJECTILE_RADIUS, player_pos, player_radius);
        if hit {
            hits += 1;
        }
        !hit
    });
    for _ in 0..hits {
        damage_player(state, ENEMY_SHOT_DAMAGE);
    }
}

/// Pull every enemy at or below zero health out of the live list
pub fn reap_dead(state: &mut GameState) -> Vec<Enemy> {
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| !e.is_alive());
    state.enemies = alive;
    dead
}

/// Process deaths until none are left. Death effects (exploder blasts,
/// chain reactions) can kill more enemies, which are handled in turn.
pub fn handle_deaths(state: &mut GameState, mut dead: Vec<Enemy>) {
    while !dead.is_empty() {
        for enemy in std::mem::take(&mut dead) {
            on_enemy_death(state, enemy);
        }
        dead = reap_dead(state);
    }
}

fn on_enemy_death(state: &mut GameState, enemy: Enemy) {
    if enemy.kind == EnemyKind::Exploder {
        explode(state, enemy.pos, EXPLODER_DEATH_RADIUS, true);
    }
    if state.player.powers.chain {
        chain_reaction(state, enemy.pos);
    }
    if enemy.is_boss() {
        boss_defeated(state, &enemy);
    } else {
        state.burst(enemy.pos, enemy.color, 8);
    }

    if !state.is_active() {
        return;
    }
    state.progress.score += u64::from(enemy.xp_value);
    state.progress.kills += 1;
    state.player.heal(1.0);
    state.emit(GameEvent::EnemyKilled {
        kind: enemy.kind,
        xp: enemy.xp_value,
    });
    gain_xp(state, enemy.xp_value);
}

/// Radial damage around a victim (not an instant kill)
fn chain_reaction(state: &mut GameState, origin: Vec2) {
    let damage = CHAIN_DAMAGE * state.player.damage_mult;
    let mut struck = Vec::new();
    for enemy in state.enemies.iter_mut() {
        if enemy.is_alive() && enemy.pos.distance(origin) < CHAIN_RADIUS {
            enemy.hp -= damage;
            struck.push(enemy.pos);
        }
    }
    for pos in struck {
        state.burst(pos, palette::CYAN, 3);
    }
}

fn boss_defeated(state: &mut GameState, boss: &Enemy) {
    let wave = state.progress.wave;
    state.progress.boss_killed = true;
    state.progress.boss_kills += 1;
    state.explosion_ring(boss.pos, palette::GOLD, 50);
    state.explosion_ring(boss.pos, boss.color, 30);
    state.shake.trigger(20.0, 500.0);
    state.emit(GameEvent::Sound(SoundCue::Explosion));
    state.emit(GameEvent::BossDefeated { wave });
    log::info!("Boss defeated on wave {}", wave);
    if state.is_active() {
        state.progress.boss_clear_pending = true;
        state
            .schedule
            .after(Task::BossClear, ms_to_ticks(BOSS_CLEAR_DELAY_MS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{ShipKind, ship_config};
    use crate::sim::spawn::spawn_enemy;
    use crate::sim::state::{EnemyProjectile, GamePhase, SimConfig};

    fn playing_state() -> GameState {
        let ship = ship_config(ShipKind::Pioneer);
        let mut state = GameState::new(SimConfig::default(), ship);
        state.start_run(ship);
        state
    }

    fn bullet_at(pos: Vec2) -> Projectile {
        Projectile::new(pos, Vec2::ZERO, PROJECTILE_SIZE, ProjectileKind::Bullet)
    }

    #[test]
    fn test_projectile_damage_scales_with_size() {
        let mut p = bullet_at(Vec2::ZERO);
        assert_eq!(projectile_damage(&p, 1.0), 1.0);
        p.size = 6.0;
        assert!((projectile_damage(&p, 2.0) - 3.0).abs() < 1e-6);
        p.kind = ProjectileKind::Missile;
        assert_eq!(projectile_damage(&p, 2.0), MISSILE_DAMAGE);
    }

    #[test]
    fn test_projectile_hits_first_enemy_only() {
        let mut state = playing_state();
        let a = spawn_enemy(&mut state, EnemyKind::Tank, Vec2::new(100.0, 100.0), 5);
        let b = spawn_enemy(&mut state, EnemyKind::Tank, Vec2::new(105.0, 100.0), 5);
        state.projectiles.push(bullet_at(Vec2::new(102.0, 100.0)));

        resolve_projectile_hits(&mut state);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemy(a).unwrap().hp, 24.0);
        assert_eq!(state.enemy(b).unwrap().hp, 25.0);
    }

    #[test]
    fn test_tank_dies_after_exact_damage_and_pays_once() {
        let mut state = playing_state();
        let id = spawn_enemy(&mut state, EnemyKind::Tank, Vec2::new(100.0, 100.0), 5);
        assert_eq!(state.enemy(id).unwrap().hp, 25.0);

        for _ in 0..24 {
            state.projectiles.push(bullet_at(Vec2::new(100.0, 100.0)));
            resolve_projectile_hits(&mut state);
            let dead = reap_dead(&mut state);
            assert!(dead.is_empty());
        }
        state.projectiles.push(bullet_at(Vec2::new(100.0, 100.0)));
        resolve_projectile_hits(&mut state);
        let dead = reap_dead(&mut state);
        assert_eq!(dead.len(), 1);
        handle_deaths(&mut state, dead);

        assert!(state.enemies.is_empty());
        assert_eq!(state.progress.score, 50);
        assert_eq!(state.progress.xp, 50);
        assert_eq!(state.progress.kills, 1);

        let dead = reap_dead(&mut state);
        handle_deaths(&mut state, dead);
        assert_eq!(state.progress.score, 50);
    }

    #[test]
    fn test_enemy_shot_hits_player() {
        let mut state = playing_state();
        let pos = state.player.pos;
        state.enemy_projectiles.push(EnemyProjectile {
            pos: pos + Vec2::new(10.0, 0.0),
            vel: Vec2::ZERO,
        });
        state.enemy_projectiles.push(EnemyProjectile {
            pos: pos + Vec2::new(200.0, 0.0),
            vel: Vec2::ZERO,
        });
        resolve_enemy_shots(&mut state);
        assert_eq!(state.player.hp, 90.0);
        assert_eq!(state.enemy_projectiles.len(), 1);
    }

    #[test]
    fn test_player_death_ends_run_once() {
        let mut state = playing_state();
        damage_player(&mut state, 500.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.hp, 0.0);
        assert!(state.wreckage.is_some());
        damage_player(&mut state, 10.0);
        let ended = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded(_)))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_harmless_explosion_spares_player() {
        let mut state = playing_state();
        let pos = state.player.pos;
        let id = spawn_enemy(&mut state, EnemyKind::Tank, pos + Vec2::new(30.0, 0.0), 40);
        explode(&mut state, pos, 40.0, true);
        assert_eq!(state.player.hp, 100.0);
        assert_eq!(state.enemy(id).unwrap().hp, 60.0 - EXPLOSION_ENEMY_DAMAGE);

        explode(&mut state, pos, 40.0, false);
        assert_eq!(state.player.hp, 100.0 - EXPLOSION_PLAYER_DAMAGE);
    }

    #[test]
    fn test_exploder_death_cascades() {
        let mut state = playing_state();
        let exploder = spawn_enemy(&mut state, EnemyKind::Exploder, Vec2::new(100.0, 100.0), 1);
        spawn_enemy(&mut state, EnemyKind::Basic, Vec2::new(130.0, 100.0), 1);
        state.enemies.iter_mut().find(|e| e.id == exploder).unwrap().hp = 0.0;

        let dead = reap_dead(&mut state);
        handle_deaths(&mut state, dead);
        assert!(state.enemies.is_empty());
        assert_eq!(state.progress.kills, 2);
        assert_eq!(state.progress.score, 30);
    }

    #[test]
    fn test_chain_reaction_is_radial_damage() {
        let mut state = playing_state();
        state.player.powers.chain = true;
        let victim = spawn_enemy(&mut state, EnemyKind::Basic, Vec2::new(100.0, 100.0), 1);
        let near = spawn_enemy(&mut state, EnemyKind::Tank, Vec2::new(200.0, 100.0), 5);
        let far = spawn_enemy(&mut state, EnemyKind::Tank, Vec2::new(400.0, 100.0), 5);
        state.enemies.iter_mut().find(|e| e.id == victim).unwrap().hp = -1.0;

        let dead = reap_dead(&mut state);
        handle_deaths(&mut state, dead);
        assert_eq!(state.enemy(near).unwrap().hp, 25.0 - CHAIN_DAMAGE);
        assert_eq!(state.enemy(far).unwrap().hp, 25.0);
    }

    #[test]
    fn test_boss_death_schedules_clear() {
        let mut state = playing_state();
        state.progress.wave = 5;
        let id = crate::sim::spawn::spawn(&mut state, 5, true);
        state.enemies.iter_mut().find(|e| e.id == id).unwrap().hp = 0.0;
        let dead = reap_dead(&mut state);
        handle_deaths(&mut state, dead);

        assert!(state.progress.boss_killed);
        assert!(state.progress.boss_clear_pending);
        assert_eq!(state.progress.boss_kills, 1);
        assert_eq!(state.schedule.pending(Task::BossClear), 1);
        assert_eq!(state.progress.score, 1000);
    }

    #[test]
    fn test_kill_heals_player() {
        let mut state = playing_state();
        state.player.hp = 50.0;
        let id = spawn_enemy(&mut state, EnemyKind::Basic, Vec2::ZERO, 1);
        state.enemies.iter_mut().find(|e| e.id == id).unwrap().hp = 0.0;
        let dead = reap_dead(&mut state);
        handle_deaths(&mut state, dead);
        assert_eq!(state.player.hp, 51.0);
    }
}
