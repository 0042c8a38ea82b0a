use crossterm::style::Color;

/// A single confetti particle, in terminal cells
#[derive(Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub char: char,
    pub color: Color,
    pub lifetime: f32,
}

impl Particle {
    pub fn is_visible(&self, width: u16, height: u16) -> bool {
        self.x >= 0.0
            && self.x < width as f32
            && self.y >= 0.0
            && self.y < height as f32
            && self.lifetime > 0.0
    }
}

/// Confetti characters
pub const CONFETTI_CHARS: &[char] = &['*', '✦', '✧', '◆', '◇', '●', '■', '▲', '♥'];

/// Background heart characters, small to large
pub const HEART_CHARS: &[char] = &['·', '♡', '♥'];

/// Pick a heart glyph for a heart of `size` (10..35 in the core's units).
pub fn heart_char(size: f32) -> char {
    if size < 15.0 {
        HEART_CHARS[0]
    } else if size < 25.0 {
        HEART_CHARS[1]
    } else {
        HEART_CHARS[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let mut p = Particle {
            x: 1.0,
            y: 1.0,
            vx: 0.0,
            vy: 0.0,
            char: '*',
            color: Color::White,
            lifetime: 1.0,
        };
        assert!(p.is_visible(10, 10));
        p.y = 10.0;
        assert!(!p.is_visible(10, 10));
        p.y = 1.0;
        p.lifetime = 0.0;
        assert!(!p.is_visible(10, 10));
    }

    #[test]
    fn test_heart_char_by_size() {
        assert_eq!(heart_char(10.0), '·');
        assert_eq!(heart_char(20.0), '♡');
        assert_eq!(heart_char(34.0), '♥');
    }
}
