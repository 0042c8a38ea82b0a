use crate::rng::SimpleRng;
use serde::{Deserialize, Serialize};

/// Half-width of the square the dodge control jumps around in.
pub const DODGE_RANGE: f32 = 75.0;

/// Displacement of the "no" control from its resting position.
///
/// Units are abstract; each front end scales them to cells or pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DodgeOffset {
    pub x: f32,
    pub y: f32,
}

impl DodgeOffset {
    pub const ORIGIN: DodgeOffset = DodgeOffset { x: 0.0, y: 0.0 };

    /// Two independent uniform draws over `[-DODGE_RANGE, DODGE_RANGE]`.
    pub fn random(rng: &mut SimpleRng) -> Self {
        Self {
            x: rng.range_f32(-DODGE_RANGE, DODGE_RANGE),
            y: rng.range_f32(-DODGE_RANGE, DODGE_RANGE),
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        self.x.abs() <= DODGE_RANGE && self.y.abs() <= DODGE_RANGE
    }

    /// Offset scaled so that `DODGE_RANGE` maps to `max_x` / `max_y`.
    pub fn scaled(&self, max_x: f32, max_y: f32) -> (f32, f32) {
        (
            self.x / DODGE_RANGE * max_x,
            self.y / DODGE_RANGE * max_y,
        )
    }
}
