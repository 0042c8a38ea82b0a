//! Colors for the canvas UI

use serde::{Deserialize, Serialize};
use valentine_core::Stage;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_tuple(c: (u8, u8, u8)) -> Self {
        Self::new(c.0, c.1, c.2)
    }

    pub fn as_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn as_css_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    pub fn lerp(&self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

pub const WHITE: Color = Color::new(255, 255, 255);
pub const SLATE_800: Color = Color::new(30, 41, 59);
pub const SLATE_500: Color = Color::new(100, 116, 139);
pub const ROSE_500: Color = Color::new(244, 63, 94);
pub const ROSE_400: Color = Color::new(251, 113, 133);
pub const VIOLET_400: Color = Color::new(167, 139, 250);
pub const VIOLET_600: Color = Color::new(124, 58, 237);

/// Paper and ink for the letter
pub const PAPER: Color = Color::new(244, 228, 188);
pub const INK: Color = Color::new(74, 55, 40);
pub const INK_ACCENT: Color = Color::new(139, 69, 19);
pub const ENVELOPE: Color = Color::new(212, 197, 169);
pub const ENVELOPE_FLAP: Color = Color::new(191, 160, 122);
pub const WAX_SEAL: Color = Color::new(139, 0, 0);
pub const LETTER_BUTTON: Color = Color::new(139, 94, 60);

/// Colors for one stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Theme {
    /// Top of the background gradient
    pub bg_top: Color,
    /// Bottom of the background gradient
    pub bg_bottom: Color,
    /// Frosted card fill, drawn with `CARD_ALPHA`
    pub card: Color,
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    pub button_bg: Color,
    pub button_fg: Color,
    pub outline: Color,
}

pub const CARD_ALPHA: f64 = 0.6;

impl Theme {
    pub fn for_stage(stage: Stage) -> Self {
        let (bg_top, bg_bottom) = match stage {
            Stage::Identity => (Color::new(253, 242, 248), Color::new(255, 228, 230)),
            Stage::Denied => (Color::new(252, 231, 243), Color::new(251, 207, 232)),
            Stage::Welcome => (Color::new(252, 231, 243), Color::new(237, 233, 254)),
            Stage::Reasons => (Color::new(245, 243, 255), Color::new(253, 242, 248)),
            Stage::Journey => (Color::new(255, 241, 242), Color::new(248, 250, 252)),
            Stage::Letter => (Color::new(245, 245, 244), Color::new(231, 229, 228)),
            Stage::Question => (Color::new(252, 231, 243), Color::new(233, 213, 255)),
            Stage::Success => (Color::new(255, 228, 230), Color::new(254, 226, 226)),
        };
        let (title, button_bg) = match stage {
            Stage::Identity | Stage::Journey | Stage::Success => (ROSE_500, ROSE_500),
            Stage::Denied => (SLATE_800, SLATE_500),
            Stage::Welcome | Stage::Reasons | Stage::Question => (VIOLET_600, VIOLET_400),
            Stage::Letter => (INK, LETTER_BUTTON),
        };
        Self {
            bg_top,
            bg_bottom,
            card: WHITE,
            title,
            text: SLATE_800,
            muted: SLATE_500,
            button_bg,
            button_fg: WHITE,
            outline: if stage == Stage::Identity { ROSE_400 } else { SLATE_500 },
        }
    }
}
