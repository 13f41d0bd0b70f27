//! Bookkeeping for (source, clip) shape pairs and their visible segments.

use super::cyrus_beck::clip_line;
use crate::draw::color::RED;
use crate::draw::{Color, Point, Shape, ShapeId};
use thiserror::Error;

/// Read access to shapes by handle.
///
/// The manager never owns shapes; whoever does hands a lookup in whenever
/// segments must be recomputed.
pub trait ShapeLookup {
    fn lookup(&self, id: ShapeId) -> Option<&Shape>;
}

/// Why a pairing request was refused. No state is recorded on any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    #[error("a shape cannot clip itself")]
    SelfPair,

    #[error("clip shape is not a convex polygon")]
    Concave,

    #[error("pair is already registered")]
    Duplicate,

    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),

    #[error("clip polygon needs at least three vertices")]
    DegenerateClip,

    #[error("source shape has no straight edges to clip")]
    UnsupportedSource,
}

/// A registered relationship and the segments it currently produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippingPair {
    source: ShapeId,
    clip: ShapeId,
    clipped_edges: Vec<(Point, Point)>,
}

impl ClippingPair {
    pub fn source(&self) -> ShapeId {
        self.source
    }

    pub fn clip(&self) -> ShapeId {
        self.clip
    }

    /// Visible parts of the source's edges inside the clip polygon.
    pub fn clipped_edges(&self) -> &[(Point, Point)] {
        &self.clipped_edges
    }

    fn involves(&self, id: ShapeId) -> bool {
        self.source == id || self.clip == id
    }

    fn recompute(&mut self, shapes: &impl ShapeLookup) {
        self.clipped_edges.clear();
        let (Some(source), Some(clip)) = (shapes.lookup(self.source), shapes.lookup(self.clip))
        else {
            log::debug!(
                "Clipping pair {} -> {} references a missing shape",
                self.source,
                self.clip
            );
            return;
        };

        let ring = clip.vertices();
        self.clipped_edges = source
            .outline_edges()
            .into_iter()
            .filter_map(|(p1, p2)| clip_line(p1, p2, &ring))
            .collect();
    }
}

/// Tracks every clipping pair and keeps their segments current.
#[derive(Debug, Clone)]
pub struct ClippingManager {
    pairs: Vec<ClippingPair>,
    highlight_color: Color,
    highlight_thickness: u32,
}

impl Default for ClippingManager {
    fn default() -> Self {
        Self::new(RED, 3)
    }
}

impl ClippingManager {
    pub fn new(highlight_color: Color, highlight_thickness: u32) -> Self {
        Self {
            pairs: Vec::new(),
            highlight_color,
            highlight_thickness: highlight_thickness.max(1),
        }
    }

    /// Registers `source` clipped by `clip` and computes its segments.
    pub fn add_pair(
        &mut self,
        source: ShapeId,
        clip: ShapeId,
        shapes: &impl ShapeLookup,
    ) -> Result<(), PairError> {
        let result = self.validate(source, clip, shapes);
        if let Err(err) = &result {
            log::warn!("Rejected clipping pair {source} -> {clip}: {err}");
            return result;
        }

        let mut pair = ClippingPair {
            source,
            clip,
            clipped_edges: Vec::new(),
        };
        pair.recompute(shapes);
        log::debug!(
            "Added clipping pair {source} -> {clip} with {} visible segments",
            pair.clipped_edges.len()
        );
        self.pairs.push(pair);
        Ok(())
    }

    fn validate(
        &self,
        source: ShapeId,
        clip: ShapeId,
        shapes: &impl ShapeLookup,
    ) -> Result<(), PairError> {
        if source == clip {
            return Err(PairError::SelfPair);
        }
        let source_shape = shapes
            .lookup(source)
            .ok_or(PairError::UnknownShape(source))?;
        let clip_shape = shapes.lookup(clip).ok_or(PairError::UnknownShape(clip))?;
        if self.position(source, clip).is_some() {
            return Err(PairError::Duplicate);
        }
        if clip_shape.is_concave() {
            return Err(PairError::Concave);
        }
        if clip_shape.vertices().len() < 3 {
            return Err(PairError::DegenerateClip);
        }
        if source_shape.outline_edges().is_empty() {
            return Err(PairError::UnsupportedSource);
        }
        Ok(())
    }

    fn position(&self, source: ShapeId, clip: ShapeId) -> Option<usize> {
        self.pairs
            .iter()
            .position(|pair| pair.source == source && pair.clip == clip)
    }

    /// Removes one pair. Returns false if it was not registered.
    pub fn remove_pair(&mut self, source: ShapeId, clip: ShapeId) -> bool {
        match self.position(source, clip) {
            Some(index) => {
                self.pairs.remove(index);
                true
            }
            None => false,
        }
    }

    /// True if the shape is the source or the clip of any pair.
    pub fn is_in_clipping_pair(&self, id: ShapeId) -> bool {
        self.pairs.iter().any(|pair| pair.involves(id))
    }

    /// Recomputes one pair. Returns false if it is not registered.
    pub fn update(&mut self, source: ShapeId, clip: ShapeId, shapes: &impl ShapeLookup) -> bool {
        match self.position(source, clip) {
            Some(index) => {
                self.pairs[index].recompute(shapes);
                true
            }
            None => false,
        }
    }

    /// Recomputes every pair; call after any geometry change.
    pub fn update_all(&mut self, shapes: &impl ShapeLookup) {
        for pair in &mut self.pairs {
            pair.recompute(shapes);
        }
    }

    /// Drops every pair that references `id`, returning how many were removed.
    pub fn delete_pairs_for(&mut self, id: ShapeId) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|pair| !pair.involves(id));
        before - self.pairs.len()
    }

    /// Forgets all pairs.
    pub fn reset(&mut self) {
        self.pairs.clear();
    }

    pub fn pairs(&self) -> &[ClippingPair] {
        &self.pairs
    }

    /// All visible segments of all pairs, pair by pair.
    pub fn clipped_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.pairs
            .iter()
            .flat_map(|pair| pair.clipped_edges.iter().copied())
    }

    pub fn highlight_color(&self) -> Color {
        self.highlight_color
    }

    pub fn set_highlight_color(&mut self, color: Color) {
        self.highlight_color = color;
    }

    pub fn highlight_thickness(&self) -> u32 {
        self.highlight_thickness
    }
}
