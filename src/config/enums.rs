//! Configuration enum types.

use crate::draw::{Color, color::*};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Document compression preference.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentCompression {
    /// Always plain text
    Off,
    /// Always gzip
    On,
    /// Gzip once the document reaches `auto_compress_threshold_bytes`
    Auto,
}

/// Color specification - either a named color, a hex string or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_border_color = "black"
///
/// # Hex color
/// background = "#fdf6e3"
///
/// # Custom RGB color (0-255 per component)
/// highlight_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to an opaque [`Color`].
    ///
    /// Unknown names fall back to black with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => parse_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using black", name);
                BLACK
            }),
            ColorSpec::Rgb([r, g, b]) => Color::rgb(*r, *g, *b),
        }
    }

    /// True if this spec names a color we can parse.
    pub fn is_known(&self) -> bool {
        match self {
            ColorSpec::Name(name) => parse_color(name).is_some(),
            ColorSpec::Rgb(_) => true,
        }
    }
}
