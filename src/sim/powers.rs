//! Elite power-ups: regeneration, hacking, missiles, drones, homing

use glam::Vec2;

use super::events::{GameEvent, SoundCue};
use super::state::{Enemy, GameState, Projectile, ProjectileKind, palette};
use crate::consts::*;
use crate::{angle_to, heading};

/// Advance every owned timed power by one frame
pub fn update_powers(state: &mut GameState) {
    update_regen(state);
    update_hacking(state);
    update_missiles(state);
    update_drones(state);
}

fn update_regen(state: &mut GameState) {
    let player = &mut state.player;
    let Some(timer) = player.powers.regen.as_mut() else {
        return;
    };
    *timer += 1;
    if *timer > REGEN_INTERVAL && player.hp < player.max_hp {
        *timer = 0;
        player.heal(1.0);
    }
}

fn update_hacking(state: &mut GameState) {
    let Some(timer) = state.player.powers.hacking.as_mut() else {
        return;
    };
    *timer += 1;
    if *timer <= HACK_INTERVAL {
        return;
    }

    let player_pos = state.player.pos;
    let candidate = state.enemies.iter_mut().find(|e| {
        !e.is_boss() && !e.hacked && e.is_alive() && e.pos.distance(player_pos) < HACK_RANGE
    });
    // No candidate: keep the timer armed and retry next frame
    let Some(enemy) = candidate else {
        return;
    };
    enemy.hacked = true;
    enemy.color = palette::GREEN;
    let pos = enemy.pos;
    log::debug!("Enemy #{} hacked", enemy.id);

    state.player.powers.hacking = Some(0);
    state.burst(pos, palette::GREEN, 10);
    state.emit(GameEvent::Sound(SoundCue::PowerUp));
}

fn update_missiles(state: &mut GameState) {
    let Some(timer) = state.player.powers.missiles.as_mut() else {
        return;
    };
    *timer += 1;
    if *timer <= MISSILE_INTERVAL {
        return;
    }
    *timer = 0;
    let player = &state.player;
    state.projectiles.push(Projectile::new(
        player.pos,
        heading(player.angle) * MISSILE_LAUNCH_SPEED,
        MISSILE_SIZE,
        ProjectileKind::Missile,
    ));
}

/// Orbit drones around the player and fire at the nearest enemy in range
fn update_drones(state: &mut GameState) {
    let count = state.player.drones.len();
    if count == 0 {
        return;
    }
    let center = state.player.pos;
    let seconds = state.time_ticks as f32 / TICKS_PER_SECOND as f32;
    let base = seconds * DRONE_ORBIT_SPEED;
    let enemies = &state.enemies;
    let mut shots = Vec::new();

    for (i, drone) in state.player.drones.iter_mut().enumerate() {
        drone.orbit_angle = base + std::f32::consts::TAU * i as f32 / count as f32;
        drone.pos = center + heading(drone.orbit_angle) * DRONE_ORBIT_RADIUS;

        drone.cooldown -= 1.0;
        if drone.cooldown > 0.0 {
            continue;
        }
        let Some(target) = nearest_enemy(enemies, drone.pos, DRONE_RANGE) else {
            continue;
        };
        let aim = angle_to(drone.pos, target.pos);
        shots.push(Projectile::new(
            drone.pos,
            heading(aim) * DRONE_SHOT_SPEED,
            DRONE_SHOT_SIZE,
            ProjectileKind::DroneShot,
        ));
        drone.cooldown = DRONE_COOLDOWN;
    }
    state.projectiles.extend(shots);
}

fn nearest_enemy(enemies: &[Enemy], from: Vec2, range: f32) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| (e, e.pos.distance(from)))
        .filter(|(_, d)| *d < range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Re-validate or acquire a missile's target and steer toward it.
/// Without a target the missile accelerates straight ahead.
pub fn steer_missile(missile: &mut Projectile, enemies: &[Enemy]) {
    let locked = missile
        .target
        .and_then(|id| enemies.iter().find(|e| e.id == id && e.is_alive()));
    let target = locked.or_else(|| {
        enemies
            .iter()
            .find(|e| e.is_alive() && e.pos.distance(missile.pos) < MISSILE_SEEK_RADIUS)
    });
    missile.target = target.map(|e| e.id);

    match target {
        Some(enemy) => {
            missile.vel += heading(angle_to(missile.pos, enemy.pos)) * MISSILE_STEER;
            missile.vel *= MISSILE_DRAG;
        }
        None => missile.vel *= MISSILE_BOOST,
    }
}
