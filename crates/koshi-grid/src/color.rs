//! Color type and hex parsing.
//!
//! Colors are gamma-encoded sRGB with alpha, stored as `f32` components.
//! Cell payloads and theme overrides carry colors as `#rrggbb` / `#rgb`
//! strings; they are resolved here when a renderer needs them.

use palette::{Srgb, Srgba};

/// Render color (sRGB + alpha, 0.0–1.0).
pub type Color = Srgba<f32>;

/// Opaque color from 0–255 components.
pub fn rgb8(r: u8, g: u8, b: u8) -> Color {
    Srgba::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

/// Parse `#rrggbb` or `#rgb` (the `#` is optional).
pub fn parse_hex(s: &str) -> Option<Color> {
    let rgb: Srgb<u8> = s.trim().parse().ok()?;
    let rgb: Srgb<f32> = rgb.into_format();
    Some(Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0))
}

/// Parse a hex color, falling back when it's missing or malformed.
pub fn parse_hex_or(s: Option<&str>, fallback: Color) -> Color {
    s.and_then(parse_hex).unwrap_or(fallback)
}

/// Same color with a different alpha.
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Srgba::new(color.red, color.green, color.blue, alpha.clamp(0.0, 1.0))
}

/// Format as `#rrggbbaa` for logs and recorded draw operations.
pub fn to_hex(color: Color) -> String {
    let c: Srgba<u8> = color.into_format();
    format!("#{:02x}{:02x}{:02x}{:02x}", c.red, c.green, c.blue, c.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short() {
        assert_eq!(parse_hex("#ff0000"), Some(rgb8(255, 0, 0)));
        assert_eq!(parse_hex("0f0"), Some(rgb8(0, 255, 0)));
        assert_eq!(parse_hex("#zzzzzz"), None);
        assert_eq!(parse_hex(""), None);
    }

    #[test]
    fn test_fallback() {
        let fb = rgb8(1, 2, 3);
        assert_eq!(parse_hex_or(None, fb), fb);
        assert_eq!(parse_hex_or(Some("nope"), fb), fb);
        assert_eq!(to_hex(parse_hex_or(Some("#010203"), rgb8(9, 9, 9))), to_hex(fb));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(rgb8(0x7a, 0xa2, 0xf7)), "#7aa2f7ff");
        assert_eq!(to_hex(with_alpha(rgb8(0, 0, 0), 0.0)), "#00000000");
    }
}
