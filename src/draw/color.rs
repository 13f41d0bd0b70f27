//! RGBA color type, hex conversion and predefined color constants.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color with independent (straight) alpha.
///
/// # Examples
///
/// ```
/// use vectorpaint::draw::Color;
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.to_hex(), "#ff0000");
/// assert_eq!(Color::from_hex("#FF0000"), Some(red));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0 = no red, 255 = full red)
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
    /// Alpha/opacity (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns a copy of this color with the alpha channel replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses `#rrggbb` (case-insensitive). The result is always opaque.
    ///
    /// Returns `None` for anything else, including the 3-digit and 8-digit forms.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats the color as lower-case `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Composites `self` over `dst` using straight-alpha source-over.
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => return self,
            0 => return dst,
            _ => {}
        }

        let src_a = self.a as f32 / 255.0;
        let dst_a = dst.a as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return TRANSPARENT;
        }

        let mix = |s: u8, d: u8| {
            let s = s as f32 / 255.0;
            let d = d as f32 / 255.0;
            let value = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            (value * 255.0).round().clamp(0.0, 255.0) as u8
        };

        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self { r, g, b, a }
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba([color.r, color.g, color.b, color.a])
    }
}

/// Maps color name strings to Color values.
///
/// Used by the configuration system and the command line to accept friendly names.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Parses either a named color or a `#rrggbb` hex string.
pub fn parse_color(text: &str) -> Option<Color> {
    let text = text.trim();
    Color::from_hex(text).or_else(|| name_to_color(text))
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const ORANGE: Color = Color::rgb(255, 128, 0);
pub const PINK: Color = Color::rgb(255, 0, 255);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_only_six_digit_form() {
        assert_eq!(Color::from_hex("#00ff7F"), Some(Color::rgb(0, 255, 127)));
        assert!(Color::from_hex("00ff7f").is_none());
        assert!(Color::from_hex("#0f7").is_none());
        assert!(Color::from_hex("#00ff7fff").is_none());
        assert!(Color::from_hex("#00gg7f").is_none());
        assert!(Color::from_hex("none").is_none());
    }

    #[test]
    fn hex_output_is_lower_case() {
        assert_eq!(Color::rgb(0xAB, 0xCD, 0xEF).to_hex(), "#abcdef");
    }

    #[test]
    fn names_and_hex_both_parse() {
        assert_eq!(parse_color("White"), Some(WHITE));
        assert_eq!(parse_color(" #000000 "), Some(BLACK));
        assert!(parse_color("chartreuse").is_none());
    }

    #[test]
    fn over_respects_alpha_extremes() {
        assert_eq!(RED.over(BLUE), RED);
        assert_eq!(RED.with_alpha(0).over(BLUE), BLUE);
    }

    #[test]
    fn over_blends_half_alpha_against_opaque() {
        let out = BLACK.with_alpha(128).over(WHITE);
        assert_eq!(out.a, 255);
        assert!((126..=128).contains(&out.r));
        assert_eq!(out.r, out.g);
        assert_eq!(out.g, out.b);
    }

    #[test]
    fn over_transparent_destination_keeps_source_color() {
        let out = RED.with_alpha(100).over(TRANSPARENT);
        assert_eq!((out.r, out.g, out.b), (255, 0, 0));
        assert_eq!(out.a, 100);
    }
}
