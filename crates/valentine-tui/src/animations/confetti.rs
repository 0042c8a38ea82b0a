use rand::prelude::SliceRandom;
use rand::Rng;
use valentine_core::Burst;

use super::particles::{Particle, CONFETTI_CHARS};
use crate::theme::rgb;

/// Launch speed range in cells per frame
const MIN_SPEED: f32 = 0.8;
const MAX_SPEED: f32 = 1.8;
/// Terminal cells are about twice as tall as wide
const ASPECT: f32 = 2.0;
const GRAVITY: f32 = 0.06;
const DRAG: f32 = 0.97;

/// Confetti launched by the celebration schedule.
///
/// The schedule decides when bursts happen; this only owns the particles
/// they turn into and moves them each frame.
pub struct ConfettiField {
    particles: Vec<Particle>,
    pub width: u16,
    pub height: u16,
}

impl ConfettiField {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            width: 80,
            height: 24,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Turn one burst into particles at its edge of the screen.
    pub fn spawn(&mut self, burst: &Burst) {
        let mut rng = rand::thread_rng();
        let origin_x = burst.origin_x * (self.width.saturating_sub(1)) as f32;
        let origin_y = self.height as f32 * 0.6;
        let half_spread = burst.spread / 2.0;

        for _ in 0..burst.particle_count {
            let angle = (burst.angle + rng.gen_range(-half_spread..=half_spread)).to_radians();
            let speed = rng.gen_range(MIN_SPEED..MAX_SPEED);
            let color = burst
                .palette
                .choose(&mut rng)
                .copied()
                .unwrap_or((255, 255, 255));
            self.particles.push(Particle {
                x: origin_x,
                y: origin_y,
                vx: angle.cos() * speed * ASPECT,
                // Screen y grows downward
                vy: -angle.sin() * speed,
                char: CONFETTI_CHARS.choose(&mut rng).copied().unwrap_or('*'),
                color: rgb(color),
                lifetime: rng.gen_range(1.5..3.0),
            });
        }
    }

    /// Move particles one frame and drop the dead ones.
    pub fn update(&mut self) {
        let height = self.height as f32;
        self.particles.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= DRAG;
            p.vy = p.vy * DRAG + GRAVITY;
            p.lifetime -= 1.0 / 30.0;
            p.lifetime > 0.0 && p.y < height + 2.0
        });
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Default for ConfettiField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use valentine_core::Celebration;

    fn bursts() -> Vec<Burst> {
        let mut c = Celebration::new();
        c.arm();
        c.tick(Duration::ZERO)
    }

    #[test]
    fn test_spawn_count() {
        let mut field = ConfettiField::new();
        for b in bursts() {
            field.spawn(&b);
        }
        assert_eq!(field.particles().len(), 10);
    }

    #[test]
    fn test_edges_fire_inward() {
        let mut field = ConfettiField::new();
        let b = bursts();
        field.spawn(&b[0]);
        assert!(field
            .particles()
            .iter()
            .all(|p| p.x == 0.0 && p.vx > 0.0 && p.vy < 0.0));

        let mut field = ConfettiField::new();
        field.spawn(&b[1]);
        assert!(field
            .particles()
            .iter()
            .all(|p| p.x == 79.0 && p.vx < 0.0 && p.vy < 0.0));
    }

    #[test]
    fn test_particles_die_out() {
        let mut field = ConfettiField::new();
        for b in bursts() {
            field.spawn(&b);
        }
        for _ in 0..200 {
            field.update();
        }
        assert!(field.is_empty());
    }
}
