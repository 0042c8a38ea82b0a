use crossterm::style::Color;
use valentine_core::Stage;

/// Colors for one stage.
///
/// Each stage has its own soft background gradient, drifting from pink
/// through lavender towards purple as the story goes on.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Background at the top row
    pub bg_top: (u8, u8, u8),
    /// Background at the bottom row
    pub bg_bottom: (u8, u8, u8),
    /// Card fill
    pub card: (u8, u8, u8),
    /// Headline color
    pub title: (u8, u8, u8),
    /// Body text color
    pub text: (u8, u8, u8),
    /// Secondary text color
    pub muted: (u8, u8, u8),
    /// Filled button background
    pub button_bg: (u8, u8, u8),
    /// Filled button text
    pub button_fg: (u8, u8, u8),
    /// Outline button text and border
    pub outline: (u8, u8, u8),
}

const SLATE_800: (u8, u8, u8) = (30, 41, 59);
const SLATE_500: (u8, u8, u8) = (100, 116, 139);
const WHITE: (u8, u8, u8) = (255, 255, 255);
const ROSE_500: (u8, u8, u8) = (244, 63, 94);
const ROSE_400: (u8, u8, u8) = (251, 113, 133);
const VIOLET_400: (u8, u8, u8) = (167, 139, 250);
const VIOLET_600: (u8, u8, u8) = (124, 58, 237);

/// Paper and ink for the opened letter
pub const PAPER: (u8, u8, u8) = (244, 228, 188);
pub const INK: (u8, u8, u8) = (74, 55, 40);
pub const INK_ACCENT: (u8, u8, u8) = (139, 69, 19);
pub const ENVELOPE: (u8, u8, u8) = (212, 197, 169);
pub const ENVELOPE_FLAP: (u8, u8, u8) = (191, 160, 122);
pub const WAX_SEAL: (u8, u8, u8) = (139, 0, 0);
pub const LETTER_BUTTON: (u8, u8, u8) = (139, 94, 60);

impl Theme {
    pub fn for_stage(stage: Stage) -> Self {
        let (bg_top, bg_bottom) = match stage {
            Stage::Identity => ((253, 242, 248), (255, 228, 230)),
            Stage::Denied => ((252, 231, 243), (251, 207, 232)),
            Stage::Welcome => ((252, 231, 243), (237, 233, 254)),
            Stage::Reasons => ((245, 243, 255), (253, 242, 248)),
            Stage::Journey => ((255, 241, 242), (248, 250, 252)),
            Stage::Letter => ((245, 245, 244), (231, 229, 228)),
            Stage::Question => ((252, 231, 243), (233, 213, 255)),
            Stage::Success => ((255, 228, 230), (254, 226, 226)),
        };
        let (title, button_bg) = match stage {
            Stage::Identity | Stage::Journey => (ROSE_500, ROSE_500),
            Stage::Denied => (SLATE_800, SLATE_500),
            Stage::Welcome | Stage::Reasons | Stage::Question => (VIOLET_600, VIOLET_400),
            Stage::Letter => (INK, LETTER_BUTTON),
            Stage::Success => (ROSE_500, ROSE_500),
        };
        let outline = match stage {
            Stage::Identity => ROSE_400,
            _ => SLATE_500,
        };
        Self {
            bg_top,
            bg_bottom,
            card: blend(lerp(bg_top, bg_bottom, 0.5), WHITE, 0.45),
            title,
            text: SLATE_800,
            muted: SLATE_500,
            button_bg,
            button_fg: WHITE,
            outline,
        }
    }

    /// Background color of row `y` out of `height`.
    pub fn bg_at(&self, y: u16, height: u16) -> (u8, u8, u8) {
        let t = if height <= 1 {
            0.0
        } else {
            y as f32 / (height - 1) as f32
        };
        lerp(self.bg_top, self.bg_bottom, t)
    }
}

pub fn lerp(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Move `base` towards `target` by `amount`.
pub fn blend(base: (u8, u8, u8), target: (u8, u8, u8), amount: f32) -> (u8, u8, u8) {
    lerp(base, target, amount)
}

pub fn rgb(c: (u8, u8, u8)) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_theme() {
        for &stage in Stage::all() {
            let theme = Theme::for_stage(stage);
            assert_ne!(theme.title, theme.card);
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        let theme = Theme::for_stage(Stage::Identity);
        assert_eq!(theme.bg_at(0, 24), theme.bg_top);
        assert_eq!(theme.bg_at(23, 24), theme.bg_bottom);
        assert_eq!(theme.bg_at(0, 1), theme.bg_top);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp((0, 0, 0), (200, 100, 50), 0.5), (100, 50, 25));
        assert_eq!(lerp((0, 0, 0), (200, 100, 50), 2.0), (200, 100, 50));
    }
}
