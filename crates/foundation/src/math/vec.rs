use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Point at `angle` radians (clockwise from 12 o'clock, screen space) and `radius`.
    pub fn polar(angle: f64, radius: f64) -> Self {
        Self::new(radius * angle.sin(), -radius * angle.cos())
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Vec2;

    #[test]
    fn polar_starts_at_twelve_o_clock() {
        let p = Vec2::polar(0.0, 10.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y + 10.0).abs() < 1e-12);

        let q = Vec2::polar(std::f64::consts::FRAC_PI_2, 10.0);
        assert!((q.x - 10.0).abs() < 1e-12);
        assert!(q.y.abs() < 1e-12);
    }
}
