//! Shape model and software rasterization.
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color with the named palette constants
//! - [`Shape`]: lines, circles, capsules, polygons and rectangles with their [`Style`]
//! - [`Frame`]: ordered shape store that owns the clipping pairs and undo history
//! - [`Surface`]: RGBA pixel buffer every algorithm draws into
//! - Rendering functions turning a frame into pixels

pub mod circle;
pub mod color;
pub mod frame;
pub mod line;
pub mod render;
pub mod scanfill;
pub mod shape;
pub mod surface;
pub mod texture;

pub use color::Color;
pub use frame::{Frame, MAX_UNDO_STEPS, ShapeId};
pub use render::{RenderOptions, rasterize, render_frame, render_shapes};
pub use shape::{
    Capsule, Circle, Interior, Line, Point, Polygon, Rectangle, Shape, ShapeKind, Style,
};
pub use surface::Surface;
pub use texture::{Texture, TextureError};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
