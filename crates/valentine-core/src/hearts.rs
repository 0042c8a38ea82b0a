//! Ambient rising hearts.
//!
//! Parameters are drawn once when the field is generated; afterwards the
//! field is only sampled at a point in time. Nothing here reads or writes
//! session state.

use crate::rng::SimpleRng;

/// Default number of hearts in the background
pub const DEFAULT_HEART_COUNT: usize = 20;

/// Distance a heart travels upward over one cycle, in the same units as `size`.
pub const RISE_DISTANCE: f32 = 1200.0;

/// Pastel colors as RGB: pink-300, rose-300, purple-300, violet-300, fuchsia-200.
pub const HEART_PALETTE: [(u8, u8, u8); 5] = [
    (249, 168, 212),
    (253, 164, 175),
    (216, 180, 254),
    (196, 181, 253),
    (245, 208, 254),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heart {
    /// Horizontal position in percent of the surface width, `[0, 100)`.
    pub left: f32,
    /// Seconds before the heart first appears.
    pub delay: f32,
    /// Seconds per rise cycle.
    pub duration: f32,
    pub size: f32,
    pub color: (u8, u8, u8),
}

/// Interpolated pose of a heart at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartFrame {
    /// Horizontal position in percent.
    pub left: f32,
    /// Distance risen above the starting point, `[0, RISE_DISTANCE]`.
    pub rise: f32,
    /// Cycle progress, `[0, 1)`.
    pub progress: f32,
    pub opacity: f32,
    /// Degrees
    pub rotation: f32,
}

impl Heart {
    fn random(rng: &mut SimpleRng) -> Self {
        Self {
            left: rng.range_f32(0.0, 100.0),
            delay: rng.range_f32(0.0, 5.0),
            duration: rng.range_f32(10.0, 20.0),
            size: rng.range_f32(10.0, 35.0),
            color: HEART_PALETTE[rng.next_usize(HEART_PALETTE.len())],
        }
    }

    /// Pose at `t` seconds after the field was mounted, `None` before the delay.
    pub fn sample(&self, t: f32) -> Option<HeartFrame> {
        if t < self.delay {
            return None;
        }
        let progress = ((t - self.delay) / self.duration).fract();
        Some(HeartFrame {
            left: self.left,
            rise: progress * RISE_DISTANCE,
            progress,
            opacity: keyframes(&[0.0, 0.5, 0.0], progress),
            rotation: keyframes(&[0.0, 45.0, -45.0, 0.0], progress),
        })
    }
}

/// Linear interpolation across evenly spaced keyframes.
fn keyframes(values: &[f32], progress: f32) -> f32 {
    match values.len() {
        0 => 0.0,
        1 => values[0],
        n => {
            let scaled = progress.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (scaled.floor() as usize).min(n - 2);
            let local = scaled - i as f32;
            values[i] + (values[i + 1] - values[i]) * local
        }
    }
}

/// Immutable set of hearts generated at mount.
#[derive(Debug, Clone, Default)]
pub struct HeartField {
    hearts: Vec<Heart>,
}

impl HeartField {
    pub fn generate(rng: &mut SimpleRng, count: usize) -> Self {
        Self {
            hearts: (0..count).map(|_| Heart::random(rng)).collect(),
        }
    }

    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }

    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty()
    }

    /// Visible hearts at `t` seconds, paired with their static parameters.
    pub fn sample(&self, t: f32) -> impl Iterator<Item = (&Heart, HeartFrame)> + '_ {
        self.hearts
            .iter()
            .filter_map(move |h| h.sample(t).map(|frame| (h, frame)))
    }
}
