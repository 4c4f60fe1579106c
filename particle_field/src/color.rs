//! Particle colour.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const CYAN: Rgb = Rgb::new(0x00, 0xFF, 0xFF);

    /// Colours offered by the in-window picker, in cycling order.
    pub const PALETTE: [Rgb; 8] = [
        Rgb::new(0x00, 0xFF, 0xFF), // cyan
        Rgb::new(0xFF, 0x69, 0xB4), // hot pink
        Rgb::new(0xFF, 0xD7, 0x00), // gold
        Rgb::new(0x7C, 0xFC, 0x00), // lawn green
        Rgb::new(0xFF, 0x45, 0x00), // orange red
        Rgb::new(0x94, 0x00, 0xD3), // violet
        Rgb::new(0x1E, 0x90, 0xFF), // dodger blue
        Rgb::new(0xFF, 0xFF, 0xFF), // white
    ];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Result<Self, FieldError> {
        let bad = || FieldError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| bad())
        };
        match hex.len() {
            3 => Ok(Rgb::new(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
            6 => Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(bad()),
        }
    }

    /// Packed `0xAARRGGBB` with full alpha, the framebuffer format.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// The palette entry after this one; colours outside the palette
    /// restart at its first entry.
    pub fn next_in_palette(self) -> Rgb {
        match Rgb::PALETTE.iter().position(|&c| c == self) {
            Some(i) => Rgb::PALETTE[(i + 1) % Rgb::PALETTE.len()],
            None    => Rgb::PALETTE[0],
        }
    }
}

impl Rgb {
    /// Rotate the hue by `degrees` keeping saturation and value.  Greys have
    /// no hue and come back unchanged.
    pub fn shift_hue(self, degrees: f32) -> Rgb {
        let (h, s, v) = self.to_hsv();
        if s == 0.0 { return self; }
        Rgb::from_hsv((h + degrees).rem_euclid(360.0), s, v)
    }

    fn to_hsv(self) -> (f32, f32, f32) {
        let (r, g, b) = (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0);
        let max = r.max(g).max(b);
        let delta = max - r.min(g).min(b);
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        (h, s, max)
    }

    fn from_hsv(h: f32, s: f32, v: f32) -> Rgb {
        let c = v * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let byte = |ch: f32| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(byte(r), byte(g), byte(b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::CYAN
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_hex() {
        assert_eq!(Rgb::parse_hex("#00ffff"), Ok(Rgb::CYAN));
        assert_eq!(Rgb::parse_hex("0FF"),     Ok(Rgb::CYAN));
        assert_eq!(Rgb::parse_hex("#FF69B4"), Ok(Rgb::new(255, 105, 180)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Rgb::parse_hex("#12345").is_err());
        assert!(Rgb::parse_hex("#gg0000").is_err());
        assert!(Rgb::parse_hex("").is_err());
        assert!(Rgb::parse_hex("#ééé").is_err());
        // from_str_radix alone would take these as signed digits
        assert!(Rgb::parse_hex("#+fffff").is_err());
        assert!(Rgb::parse_hex("+f+f+f").is_err());
        assert!(Rgb::parse_hex("+ff").is_err());
    }

    #[test]
    fn display_round_trips() {
        let c = Rgb::new(0x12, 0xab, 0xef);
        assert_eq!(c.to_string(), "#12abef");
        assert_eq!(c.to_string().parse::<Rgb>(), Ok(c));
    }

    #[test]
    fn argb_is_opaque() {
        assert_eq!(Rgb::CYAN.to_argb(), 0xFF00FFFF);
    }

    #[test]
    fn palette_cycles() {
        let mut c = Rgb::PALETTE[0];
        for _ in 0..Rgb::PALETTE.len() { c = c.next_in_palette(); }
        assert_eq!(c, Rgb::PALETTE[0]);
        assert_eq!(Rgb::new(1, 2, 3).next_in_palette(), Rgb::PALETTE[0]);
    }

    #[test]
    fn hue_shift_walks_the_colour_wheel() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(red.shift_hue(120.0),  Rgb::new(0, 255, 0));
        assert_eq!(red.shift_hue(-120.0), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::CYAN.shift_hue(180.0), red);
        assert_eq!(Rgb::new(0xFF, 0x69, 0xB4).shift_hue(360.0), Rgb::new(0xFF, 0x69, 0xB4));
    }

    #[test]
    fn hue_shift_leaves_greys_alone() {
        assert_eq!(Rgb::new(255, 255, 255).shift_hue(90.0), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::new(40, 40, 40).shift_hue(90.0), Rgb::new(40, 40, 40));
    }

    #[test]
    fn deserializes_from_toml_string() {
        #[derive(Deserialize)]
        struct Doc { color: Rgb }
        let doc: Doc = toml::from_str("color = \"#ff0000\"").unwrap();
        assert_eq!(doc.color, Rgb::new(255, 0, 0));
        assert!(toml::from_str::<Doc>("color = \"red\"").is_err());
    }
}
