//! Cosmetic particles
//!
//! Particles never affect gameplay, but they draw from the same seeded RNG
//! so a replay with the same seed and inputs looks identical.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle};
use crate::consts::*;
use crate::heading;

impl GameState {
    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.config.max_particles {
            self.particles.push(particle);
        }
    }

    /// Small random spray, used for hits
    pub fn burst(&mut self, pos: Vec2, color: u32, count: usize) {
        for _ in 0..count {
            let vel = Vec2::new(
                self.rng.random_range(-2.5..2.5),
                self.rng.random_range(-2.5..2.5),
            );
            let size = self.rng.random_range(1.0..4.0);
            self.push_particle(Particle {
                pos,
                vel,
                color,
                life: 1.0,
                size,
            });
        }
    }

    /// Radial ring of particles, used for explosions and level-ups
    pub fn explosion_ring(&mut self, pos: Vec2, color: u32, count: usize) {
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
            let speed = self.rng.random_range(2.0..7.0);
            let size = self.rng.random_range(2.0..5.0);
            self.push_particle(Particle {
                pos,
                vel: heading(angle) * speed,
                color,
                life: 1.0,
                size,
            });
        }
    }
}

/// Advance, fade and cull particles
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel *= PARTICLE_DAMPING;
        p.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}
