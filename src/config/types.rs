//! Configuration type definitions.

use super::enums::{ColorSpec, DocumentCompression};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Style applied to shapes that do not carry their own (the document format
/// stores colors but not thickness or antialiasing).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default border color - a named color (red, green, blue, yellow, orange, pink,
    /// white, black), a `#rrggbb` string, or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_border_color")]
    pub default_border_color: ColorSpec,

    /// Default fill color for closed shapes; unset means no fill
    #[serde(default)]
    pub default_fill_color: Option<ColorSpec>,

    /// Default border thickness in pixels (valid range: 1 - 20)
    #[serde(default = "default_thickness")]
    pub default_thickness: u32,

    /// Draw outlines with the antialiased line algorithm
    #[serde(default)]
    pub antialiasing: bool,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_border_color: default_border_color(),
            default_fill_color: None,
            default_thickness: default_thickness(),
            antialiasing: false,
        }
    }
}

/// Output surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Surface width in pixels (valid range: 1 - 16384)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Surface height in pixels (valid range: 1 - 16384)
    #[serde(default = "default_canvas_height")]
    pub height: u32,

    /// Color the surface is cleared to before rendering
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background: default_background(),
        }
    }
}

/// Appearance of clipped segments.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClippingConfig {
    /// Highlight color for visible clipped segments
    #[serde(default = "default_highlight_color")]
    pub highlight_color: ColorSpec,

    /// Highlight line thickness in pixels (valid range: 1 - 20)
    #[serde(default = "default_highlight_thickness")]
    pub highlight_thickness: u32,
}

impl Default for ClippingConfig {
    fn default() -> Self {
        Self {
            highlight_color: default_highlight_color(),
            highlight_thickness: default_highlight_thickness(),
        }
    }
}

/// Document persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentConfig {
    /// Keep the previous document as `<name>.bak` when saving (0 disables, max 1)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,

    /// Gzip documents: "off", "on" or "auto"
    #[serde(default = "default_compression")]
    pub compression: DocumentCompression,

    /// Payload size at which "auto" compression kicks in
    #[serde(default = "default_auto_compress_threshold")]
    pub auto_compress_threshold_bytes: u64,

    /// Documents larger than this are neither loaded nor saved
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Shapes beyond this count are dropped on load (0 = unlimited)
    #[serde(default = "default_max_shapes")]
    pub max_shapes: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            backup_retention: default_backup_retention(),
            compression: default_compression(),
            auto_compress_threshold_bytes: default_auto_compress_threshold(),
            max_file_size_bytes: default_max_file_size(),
            max_shapes: default_max_shapes(),
        }
    }
}

/// Editor overlay preferences.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UiConfig {
    /// Draw control-point and edge-midpoint markers
    #[serde(default)]
    pub show_handles: bool,

    /// Marker radius, also used as the selection radius (valid range: 1 - 10)
    #[serde(default = "default_handle_radius")]
    pub handle_radius: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_handles: false,
            handle_radius: default_handle_radius(),
        }
    }
}

// =============================================================================
// Defaults
// =============================================================================

fn default_border_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_thickness() -> u32 {
    1
}

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_background() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_highlight_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_highlight_thickness() -> u32 {
    3
}

fn default_backup_retention() -> usize {
    1
}

fn default_compression() -> DocumentCompression {
    DocumentCompression::Off
}

fn default_auto_compress_threshold() -> u64 {
    256 * 1024
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_shapes() -> usize {
    10_000
}

fn default_handle_radius() -> u32 {
    3
}
