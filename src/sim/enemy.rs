//! Per-frame enemy behavior
//!
//! Each enemy runs exactly one branch per frame: stunned, hacked, or hunting
//! the player. Enemies that leave play without dying (rammers, exploders that
//! detonate on contact, burnt-out hacked units) are dropped with no reward.

use glam::Vec2;

use super::combat::{damage_player, explode, reap_dead};
use super::events::{GameEvent, SoundCue};
use super::state::{AttackPattern, Enemy, EnemyKind, EnemyProjectile, GameState, palette};
use crate::consts::*;
use crate::{angle_to, circles_overlap, heading};

const SHOOTER_SHOT_SPEED: f32 = 3.0;
const SHOOTER_FIRE_INTERVAL: f32 = 120.0;
const BOSS_FIRE_INTERVAL: f32 = 80.0;

impl AttackPattern {
    /// Frames between boss volleys; the pattern changes the shape, not the cadence
    pub fn fire_interval(self) -> f32 {
        BOSS_FIRE_INTERVAL
    }

    /// Shot velocities of one volley aimed at `aim`
    pub fn volley(self, aim: f32) -> Vec<Vec2> {
        match self {
            AttackPattern::Normal => ring(aim, 8, 4.0),
            AttackPattern::Rapid => vec![heading(aim) * 8.0],
            AttackPattern::Shotgun => [-0.2, 0.0, 0.2]
                .iter()
                .map(|offset| heading(aim + offset) * 5.0)
                .collect(),
            AttackPattern::Final => ring(aim, 12, 6.0),
        }
    }
}

/// Evenly spaced shots, the first one along `aim`
fn ring(aim: f32, count: usize, speed: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| heading(aim + std::f32::consts::TAU * i as f32 / count as f32) * speed)
        .collect()
}

/// Run one frame of enemy behavior.
/// Returns the enemies that died this frame, already removed from play.
pub fn update_enemies(state: &mut GameState) -> Vec<Enemy> {
    let count = state.enemies.len();
    let mut removed = vec![false; count];
    let mut detonations = Vec::new();
    let plasma = state.player.powers.plasma;

    for i in 0..count {
        if state.enemies[i].stun_timer > 0 {
            state.enemies[i].stun_timer -= 1;
            continue;
        }

        if state.enemies[i].hacked {
            update_hacked(state, i, &mut removed);
        } else {
            update_hunting(state, i, &mut removed, &mut detonations);
        }

        if plasma && !removed[i] {
            let player_pos = state.player.pos;
            let enemy = &mut state.enemies[i];
            if enemy.pos.distance(player_pos) < PLASMA_RADIUS {
                enemy.hp -= PLASMA_DAMAGE;
            }
        }
    }

    let mut index = 0;
    state.enemies.retain(|_| {
        let keep = !removed[index];
        index += 1;
        keep
    });

    for pos in detonations {
        explode(state, pos, EXPLODER_CONTACT_RADIUS, false);
    }

    reap_dead(state)
}

/// Hacked: hunt the first other loyal enemy and grind it down
fn update_hacked(state: &mut GameState, i: usize, removed: &mut [bool]) {
    let target = state
        .enemies
        .iter()
        .enumerate()
        .find(|(j, other)| *j != i && !removed[*j] && !other.hacked && other.is_alive())
        .map(|(j, other)| (j, other.pos, other.radius));
    let Some((j, target_pos, target_radius)) = target else {
        return;
    };

    let enemy = &mut state.enemies[i];
    enemy.pos += heading(angle_to(enemy.pos, target_pos)) * enemy.speed;
    if !circles_overlap(enemy.pos, enemy.radius, target_pos, target_radius) {
        return;
    }
    enemy.hack_hits += 1;
    let burnt_out = enemy.hack_hits >= HACK_HIT_LIMIT;
    let (pos, color) = (enemy.pos, enemy.color);

    state.enemies[j].hp -= HACK_CONTACT_DAMAGE;
    state.burst(target_pos, palette::WHITE, 1);
    if burnt_out {
        removed[i] = true;
        state.burst(pos, color, 8);
    }
}

/// Normal: chase the player, shoot if able, ram on contact
fn update_hunting(
    state: &mut GameState,
    i: usize,
    removed: &mut [bool],
    detonations: &mut Vec<Vec2>,
) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    let enemy = &mut state.enemies[i];
    let aim = angle_to(enemy.pos, player_pos);
    enemy.pos += heading(aim) * enemy.speed;

    let mut volley = None;
    if enemy.kind.shoots() {
        enemy.shoot_timer -= 1.0;
        if enemy.shoot_timer <= 0.0 {
            let (shots, interval) = match enemy.attack_pattern {
                Some(pattern) => (pattern.volley(aim), pattern.fire_interval()),
                None => (vec![heading(aim) * SHOOTER_SHOT_SPEED], SHOOTER_FIRE_INTERVAL),
            };
            enemy.shoot_timer = interval;
            volley = Some(shots);
        }
    }

    let (pos, color, kind) = (enemy.pos, enemy.color, enemy.kind);
    let contact = circles_overlap(pos, enemy.radius, player_pos, player_radius);

    if let Some(shots) = volley {
        state
            .enemy_projectiles
            .extend(shots.into_iter().map(|vel| EnemyProjectile { pos, vel }));
        if kind == EnemyKind::Boss {
            state.emit(GameEvent::Sound(SoundCue::BossAlert));
        }
    }

    if !contact {
        return;
    }
    match kind {
        EnemyKind::Exploder => {
            removed[i] = true;
            detonations.push(pos);
        }
        EnemyKind::Boss => damage_player(state, BOSS_CONTACT_DAMAGE),
        EnemyKind::Tank => damage_player(state, CONTACT_DAMAGE),
        EnemyKind::Basic | EnemyKind::Shooter => {
            removed[i] = true;
            damage_player(state, CONTACT_DAMAGE);
            state.burst(pos, color, 8);
        }
    }
}
