use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit sRGB color. Serialized as `#rrggbb`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Channel factor used by `brighter`/`darker`, same as common web charting kits.
const DARKER: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {:?}", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn brighter(self, k: f64) -> Self {
        self.scale(DARKER.powf(-k))
    }

    pub fn darker(self, k: f64) -> Self {
        self.scale(DARKER.powf(k))
    }

    /// Linear interpolation in sRGB space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| to_channel(a as f64 + (b as f64 - a as f64) * t);
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    fn scale(self, k: f64) -> Self {
        Self::new(
            to_channel(self.r as f64 * k),
            to_channel(self.g as f64 * k),
            to_channel(self.b as f64 * k),
        )
    }
}

fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;

    #[test]
    fn parses_and_prints_hex() {
        let c = Rgb::from_hex("#0066cc").expect("parse");
        assert_eq!(c, Rgb::new(0x00, 0x66, 0xcc));
        assert_eq!(c.to_hex(), "#0066cc");
        assert_eq!(Rgb::from_hex("0066CC").expect("no hash"), c);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgb::from_hex("#06c").is_err());
        assert!(Rgb::from_hex("#zz66cc").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn darker_then_brighter_is_close_to_identity() {
        let c = Rgb::new(120, 80, 40);
        let back = c.darker(1.0).brighter(1.0);
        assert!((back.r as i32 - 120).abs() <= 1);
        assert!((back.g as i32 - 80).abs() <= 1);
        assert!((back.b as i32 - 40).abs() <= 1);
    }

    #[test]
    fn brighter_saturates_at_white() {
        assert_eq!(Rgb::new(250, 250, 250).brighter(2.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 50, 25));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 140, 0)).expect("serialize");
        assert_eq!(json, "\"#ff8c00\"");
    }
}
