//! Confetti particles for the canvas, in logical pixels

use crate::theme::Color;
use valentine_core::{Burst, SimpleRng};

/// Launch speed range in px/s
const MIN_SPEED: f64 = 450.0;
const MAX_SPEED: f64 = 900.0;
/// px/s²
const GRAVITY: f64 = 900.0;
/// Fraction of velocity kept per second
const DRAG: f64 = 0.4;
/// Bursts start at this fraction of the height
const ORIGIN_Y: f64 = 0.6;

/// A single confetti flake
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: Color,
    pub size: f64,
    /// Radians
    pub rotation: f64,
    pub spin: f64,
    /// Seconds left
    pub lifetime: f64,
}

impl Particle {
    pub fn is_visible(&self, width: f64, height: f64) -> bool {
        self.x >= -10.0
            && self.x < width + 10.0
            && self.y >= -10.0
            && self.y < height + 10.0
            && self.lifetime > 0.0
    }

    /// Fades out over the last half second
    pub fn alpha(&self) -> f64 {
        (self.lifetime / 0.5).clamp(0.0, 1.0)
    }
}

/// Particles spawned from celebration bursts
#[derive(Debug, Clone)]
pub struct Confetti {
    particles: Vec<Particle>,
    rng: SimpleRng,
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

impl Confetti {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            rng: SimpleRng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    pub fn spawn(&mut self, burst: &Burst, width: f64, height: f64) {
        let half_spread = burst.spread as f64 / 2.0;
        for _ in 0..burst.particle_count {
            let jitter = self.rng.range_f32(-1.0, 1.0) as f64 * half_spread;
            let angle = (burst.angle as f64 + jitter).to_radians();
            let speed = MIN_SPEED + self.rng.next_f32() as f64 * (MAX_SPEED - MIN_SPEED);
            let color = burst.palette[self.rng.next_usize(burst.palette.len())];
            self.particles.push(Particle {
                x: burst.origin_x as f64 * width,
                y: height * ORIGIN_Y,
                vx: angle.cos() * speed,
                vy: -angle.sin() * speed,
                color: Color::from_tuple(color),
                size: 6.0 + self.rng.next_f32() as f64 * 6.0,
                rotation: self.rng.next_f32() as f64 * std::f64::consts::TAU,
                spin: self.rng.range_f32(-8.0, 8.0) as f64,
                lifetime: 1.5 + self.rng.next_f32() as f64 * 1.5,
            });
        }
    }

    /// Advance by `dt` seconds and drop dead particles.
    pub fn update(&mut self, dt: f64, height: f64) {
        let drag = DRAG.powf(dt);
        self.particles.retain_mut(|p| {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx *= drag;
            p.vy = p.vy * drag + GRAVITY * dt;
            p.rotation += p.spin * dt;
            p.lifetime -= dt;
            p.lifetime > 0.0 && p.y < height + 20.0
        });
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
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
    fn test_bursts_start_at_both_edges() {
        let mut confetti = Confetti::with_seed(4);
        let b = bursts();
        confetti.spawn(&b[0], 800.0, 600.0);
        confetti.spawn(&b[1], 800.0, 600.0);
        let (left, right) = confetti.particles().split_at(5);
        assert!(left.iter().all(|p| p.x == 0.0 && p.vx > 0.0));
        assert!(right.iter().all(|p| p.x == 800.0 && p.vx < 0.0));
        assert!(confetti
            .particles()
            .iter()
            .all(|p| (p.y - 360.0).abs() < 1e-9 && p.vy < 0.0));
    }

    #[test]
    fn test_particles_expire() {
        let mut confetti = Confetti::with_seed(4);
        for b in bursts() {
            confetti.spawn(&b, 800.0, 600.0);
        }
        for _ in 0..240 {
            confetti.update(1.0 / 60.0, 600.0);
        }
        assert!(confetti.is_empty());
    }
}
