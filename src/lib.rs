//! Rasterization and clipping core for a 2D vector drawing editor.
//!
//! Shapes live in a [`draw::Frame`], are rendered into a [`draw::Surface`] by the
//! line, circle and scanline algorithms in [`draw`], can be clipped against convex
//! polygons with [`clip`], and persist through the text format in [`document`].

pub mod clip;
pub mod command;
pub mod config;
pub mod document;
pub mod draw;
pub mod fill;
pub mod util;

pub use config::Config;
