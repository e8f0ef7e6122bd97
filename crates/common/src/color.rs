use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit sRGB color, authored as a hex string (`#RRGGBB`).
///
/// Deserialization never fails: an unparseable string becomes white and a
/// warning is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("expected 3 or 6 hex digits, got {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in {0:?}")]
    BadDigit(String),
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ColorError::BadLength(s.to_string())),
        };
        let packed =
            u32::from_str_radix(&expanded, 16).map_err(|_| ColorError::BadDigit(s.to_string()))?;
        Ok(Self::from_u32(packed))
    }

    /// Parse, falling back to white on malformed input.
    pub fn from_hex_or_default(s: &str) -> Self {
        Self::from_hex(s).unwrap_or_else(|e| {
            tracing::warn!("bad color {s:?}: {e}; using white");
            Self::default()
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Normalized RGBA with the given alpha, ready for a vertex or uniform.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self::from_hex_or_default(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::from_hex("#FFA500").unwrap(), Color::rgb(255, 165, 0));
        assert_eq!(Color::from_hex("4a90e2").unwrap(), Color::rgb(0x4a, 0x90, 0xe2));
        assert_eq!(Color::from_hex("#f00").unwrap(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            Color::from_hex("#12345"),
            Err(ColorError::BadLength(_))
        ));
        assert!(matches!(
            Color::from_hex("#GGGGGG"),
            Err(ColorError::BadDigit(_))
        ));
    }

    #[test]
    fn malformed_json_color_degrades_to_white() {
        let c: Color = serde_json::from_str("\"not-a-color\"").unwrap();
        assert_eq!(c, Color::WHITE);
    }

    #[test]
    fn serializes_as_upper_hex() {
        let json = serde_json::to_string(&Color::from_u32(0x000510)).unwrap();
        assert_eq!(json, "\"#000510\"");
    }

    #[test]
    fn rgba_is_normalized() {
        let rgba = Color::rgb(255, 0, 51).to_rgba(0.5);
        assert_eq!(rgba, [1.0, 0.0, 0.2, 0.5]);
    }
}
