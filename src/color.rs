//! Border color parsing.
//!
//! Accepts a named color, `#RRGGBB` or `rgb(r, g, b)`. Parsing never fails:
//! anything unrecognized resolves to [`Color::DEFAULT`].

use std::{convert::Infallible, fmt, str::FromStr};

use image::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: [(&str, Color); 12] = [
    ("white", Color::rgb(255, 255, 255)),
    ("black", Color::rgb(0, 0, 0)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("gray", Color::rgb(128, 128, 128)),
    ("orange", Color::rgb(255, 165, 0)),
    ("pink", Color::rgb(255, 192, 203)),
    ("purple", Color::rgb(128, 0, 128)),
];

impl Color {
    pub const DEFAULT: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    /// Looks up one of the fixed color names (case-sensitive, lowercase).
    pub fn named(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, color)| color)
    }

    /// Parses `#RRGGBB`. Exactly six hex digits are required.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parses `rgb(r, g, b)` with three integer channels in `0..=255`.
    pub fn from_rgb_function(s: &str) -> Option<Self> {
        let body = s.strip_prefix("rgb(")?.strip_suffix(')')?;
        let channels = body
            .split(',')
            .map(|part| part.trim().parse::<u8>().ok())
            .collect::<Option<Vec<_>>>()?;
        match channels.as_slice() {
            &[r, g, b] => Some(Self::rgb(r, g, b)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Resolves a color specification, falling back to white.
pub fn parse_color(spec: &str) -> Color {
    let spec = spec.trim().to_ascii_lowercase();

    Color::named(&spec)
        .or_else(|| Color::from_rgb_function(&spec))
        .or_else(|| Color::from_hex(&spec))
        .unwrap_or_else(|| {
            tracing::debug!(spec = %spec, "unrecognized color, using default");
            Color::DEFAULT
        })
}

impl FromStr for Color {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_color(s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(parse_color("#FF0000"), Color::rgb(255, 0, 0));
        assert_eq!(parse_color("#00a0Ff"), Color::rgb(0, 160, 255));
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(parse_color("rgb(0, 128, 255)"), Color::rgb(0, 128, 255));
        assert_eq!(parse_color("RGB(1,2,3)"), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_named() {
        assert_eq!(parse_color("red"), Color::rgb(255, 0, 0));
        assert_eq!(parse_color("  Orange "), Color::rgb(255, 165, 0));
        assert_eq!(parse_color("purple"), Color::rgb(128, 0, 128));
    }

    #[test]
    fn test_fallback_to_white() {
        let white = Color::rgb(255, 255, 255);
        let cases = [
            "chartreuse",
            "",
            "#FFF",
            "#GG0000",
            "#FF00001",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4)",
            "rgb(256, 0, 0)",
            "rgb(-1, 0, 0)",
            "rgb(a, b, c)",
            "rgb(1, 2, 3",
        ];
        for spec in cases {
            assert_eq!(parse_color(spec), white, "spec: {spec:?}");
        }
    }

    #[test]
    fn test_from_str_is_total() {
        let color: Color = "not a color".parse().unwrap();
        assert_eq!(color, Color::DEFAULT);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(255, 0, 128).to_string(), "#ff0080");
    }
}
