//! Clipping engine.
//!
//! [`cyrus_beck`] clips one segment against a convex ring; [`ClippingManager`]
//! tracks which shapes clip which and keeps their visible segments current.

pub mod cyrus_beck;
pub mod manager;

pub use cyrus_beck::{clip_line, is_clockwise};
pub use manager::{ClippingManager, ClippingPair, PairError, ShapeLookup};
