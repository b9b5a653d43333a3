//! Fixed timestep simulation tick
//!
//! One call advances the game by one 60 Hz frame. Order within a frame:
//! cosmetics, timers, then (unless paused) player, weapons, powers, enemies,
//! projectiles, collisions and finally deaths and their rewards.

use glam::Vec2;

use super::combat;
use super::enemy::update_enemies;
use super::events::{GameEvent, SoundCue};
use super::particles::update_particles;
use super::powers::{steer_missile, update_powers};
use super::progression;
use super::schedule::Task;
use super::state::{GamePhase, GameState, Projectile, ProjectileKind};
use crate::consts::*;
use crate::{heading, out_of_bounds};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Normalized movement direction (length ≤ 1)
    pub movement: Vec2,
    /// Aim angle in radians
    pub aim_angle: f32,
    pub firing: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        toggle_pause(state);
    }
    if state.phase == GamePhase::Stopped {
        return;
    }

    // Cosmetics keep animating while paused and after the run ends
    update_particles(&mut state.particles);
    state.shake.update();
    if state.is_over() {
        return;
    }

    for task in state.schedule.advance() {
        run_task(state, task);
    }
    if state.is_paused() || !state.is_active() {
        return;
    }

    state.time_ticks += 1;

    update_player(state, input);
    fire_weapons(state, input.firing);
    update_powers(state);

    let died = update_enemies(state);
    move_projectiles(state);
    combat::resolve_projectile_hits(state);
    combat::resolve_enemy_shots(state);

    let mut dead = died;
    dead.extend(combat::reap_dead(state));
    combat::handle_deaths(state, dead);
}

/// Explicit pause. Has no effect during upgrade selection.
pub fn toggle_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            log::info!("Paused");
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
        _ => {}
    }
}

fn run_task(state: &mut GameState, task: Task) {
    match task {
        Task::SpawnTick => progression::on_spawn_tick(state),
        Task::WaveTick => progression::on_wave_tick(state),
        Task::BatchSpawn => progression::on_batch_spawn(state),
        Task::BossClear => progression::on_boss_clear(state),
        Task::EliteOffer => progression::on_elite_offer(state),
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let arena = state.arena();
    let player = &mut state.player;
    player.move_by(input.movement.clamp_length_max(1.0), arena);
    player.angle = input.aim_angle;
}

/// Fire a volley centered on the aim angle when the cooldown allows
fn fire_weapons(state: &mut GameState, firing: bool) {
    let player = &mut state.player;
    if player.cooldown > 0.0 {
        player.cooldown -= 1.0;
    }
    if !firing || player.cooldown > 0.0 {
        return;
    }
    player.cooldown = player.fire_rate;

    let count = player.projectile_count.max(1);
    let start = player.angle - (count - 1) as f32 * VOLLEY_SPREAD / 2.0;
    let volley = (0..count).map(|i| {
        Projectile::new(
            player.pos,
            heading(start + i as f32 * VOLLEY_SPREAD) * PROJECTILE_SPEED,
            player.projectile_size,
            ProjectileKind::Bullet,
        )
    });
    state.projectiles.extend(volley);
    state.emit(GameEvent::Sound(SoundCue::Shoot));
}

/// Move projectiles and cull the ones that left the arena
fn move_projectiles(state: &mut GameState) {
    let arena = state.arena();
    let enemies = &state.enemies;
    for projectile in state.projectiles.iter_mut() {
        if projectile.kind == ProjectileKind::Missile {
            steer_missile(projectile, enemies);
        }
        projectile.pos += projectile.vel;
    }
    state.projectiles.retain(|p| !out_of_bounds(p.pos, arena));

    let factor = if state.player.powers.time_shift {
        TIME_SHIFT_FACTOR
    } else {
        1.0
    };
    for shot in state.enemy_projectiles.iter_mut() {
        shot.pos += shot.vel * factor;
    }
    state.enemy_projectiles.retain(|p| !out_of_bounds(p.pos, arena));
}
