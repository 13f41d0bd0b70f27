//! Frame container for managing collections of shapes.

use super::shape::{Point, Shape};
use crate::clip::{ClippingManager, PairError, ShapeLookup};
use crate::command::StyleCommand;
use std::collections::VecDeque;
use std::fmt;

/// Stable handle to a shape inside a [`Frame`]. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shapes in draw order, addressed by handle.
#[derive(Debug, Clone, Default)]
struct ShapeStore {
    entries: Vec<(ShapeId, Shape)>,
    next_id: u64,
}

impl ShapeStore {
    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.entries.iter().position(|(entry, _)| *entry == id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.entries
            .iter_mut()
            .find(|(entry, _)| *entry == id)
            .map(|(_, shape)| shape)
    }

    fn push(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, shape));
        id
    }
}

impl ShapeLookup for ShapeStore {
    fn lookup(&self, id: ShapeId) -> Option<&Shape> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, shape)| shape)
    }
}

/// Inverse commands recorded by one user-visible action.
type HistoryEntry = Vec<(ShapeId, StyleCommand)>;

/// Undo steps kept per frame; the oldest step is forgotten first.
pub const MAX_UNDO_STEPS: usize = 100;

/// Container for all shapes of a drawing plus their clipping relationships.
///
/// Shapes are drawn in insertion order (first = bottom layer, last = top
/// layer). The frame owns the [`ClippingManager`]: removing a shape purges its
/// pairs first, and every geometry edit made through the frame recomputes all
/// clipped segments.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    store: ShapeStore,
    clipping: ClippingManager,
    history: VecDeque<HistoryEntry>,
}

impl Frame {
    /// Creates a new empty frame with no shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty frame using the given clipping manager (highlight settings).
    pub fn with_clipping(clipping: ClippingManager) -> Self {
        Self {
            clipping,
            ..Self::default()
        }
    }

    /// Removes all shapes, pairs and undo history.
    pub fn clear(&mut self) {
        self.clipping.reset();
        self.store.entries.clear();
        self.history.clear();
    }

    /// Adds a new shape on top of existing shapes.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.store.push(shape)
    }

    /// Attempts to add a shape, enforcing a maximum shape count when `max` > 0.
    ///
    /// Returns `None` if the limit would be exceeded.
    pub fn try_add_shape(&mut self, shape: Shape, max: usize) -> Option<ShapeId> {
        if max == 0 || self.store.entries.len() < max {
            Some(self.store.push(shape))
        } else {
            None
        }
    }

    /// Removes a shape after dropping every clipping pair that references it.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.store.index_of(id)?;
        let purged = self.clipping.delete_pairs_for(id);
        if purged > 0 {
            log::debug!("Removed {purged} clipping pair(s) with shape {id}");
        }
        for entry in &mut self.history {
            entry.retain(|(target, _)| *target != id);
        }
        self.history.retain(|entry| !entry.is_empty());
        Some(self.store.entries.remove(index).1)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.store.lookup(id)
    }

    /// Shapes with their handles, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.store.entries.iter().map(|(id, shape)| (*id, shape))
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.store.entries.iter().map(|(_, shape)| shape)
    }

    /// Handle of the shape at position `index` in draw order.
    pub fn id_at(&self, index: usize) -> Option<ShapeId> {
        self.store.entries.get(index).map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.store.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.entries.is_empty()
    }

    /// First shape in draw order with a control point within `radius` of `point`.
    pub fn shape_at(&self, point: Point, radius: f64) -> Option<ShapeId> {
        self.iter()
            .find(|(_, shape)| shape.hit_vertex(point, radius).is_some())
            .map(|(id, _)| id)
    }

    /// Runs `edit` on a shape's geometry, then refreshes all clipped segments.
    pub fn edit_geometry<R>(
        &mut self,
        id: ShapeId,
        edit: impl FnOnce(&mut Shape) -> R,
    ) -> Option<R> {
        let shape = self.store.get_mut(id)?;
        let result = edit(shape);
        self.clipping.update_all(&self.store);
        Some(result)
    }

    pub fn move_vertex(&mut self, id: ShapeId, index: usize, delta: Point) -> bool {
        self.edit_geometry(id, |shape| shape.move_vertex(index, delta))
            .unwrap_or(false)
    }

    pub fn move_edge(&mut self, id: ShapeId, index: usize, delta: Point) -> bool {
        self.edit_geometry(id, |shape| shape.move_edge(index, delta))
            .unwrap_or(false)
    }

    pub fn translate(&mut self, id: ShapeId, delta: Point) -> bool {
        self.edit_geometry(id, |shape| shape.translate(delta)).is_some()
    }

    // ------------------------------------------------------------------------
    // Clipping
    // ------------------------------------------------------------------------

    /// Pairs `source` with the convex clip shape `clip`.
    pub fn add_clip_pair(&mut self, source: ShapeId, clip: ShapeId) -> Result<(), PairError> {
        self.clipping.add_pair(source, clip, &self.store)
    }

    pub fn remove_clip_pair(&mut self, source: ShapeId, clip: ShapeId) -> bool {
        self.clipping.remove_pair(source, clip)
    }

    pub fn is_in_clipping_pair(&self, id: ShapeId) -> bool {
        self.clipping.is_in_clipping_pair(id)
    }

    /// Recomputes one pair from the current geometry. Returns false if it is not registered.
    pub fn update_clip_pair(&mut self, source: ShapeId, clip: ShapeId) -> bool {
        self.clipping.update(source, clip, &self.store)
    }

    /// Recomputes every pair from the current geometry.
    pub fn update_clipping(&mut self) {
        self.clipping.update_all(&self.store);
    }

    pub fn reset_clipping(&mut self) {
        self.clipping.reset();
    }

    pub fn clipping(&self) -> &ClippingManager {
        &self.clipping
    }

    /// All visible clipped segments, pair by pair.
    pub fn clipped_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.clipping.clipped_segments()
    }

    // ------------------------------------------------------------------------
    // Style commands
    // ------------------------------------------------------------------------

    /// Applies a style command to one shape and records its inverse.
    ///
    /// Returns false if the shape does not exist.
    pub fn apply(&mut self, id: ShapeId, command: StyleCommand) -> bool {
        let Some(shape) = self.store.get_mut(id) else {
            return false;
        };
        log::debug!("Applying {} to shape {id}", command.name());
        let inverse = command.apply(shape);
        self.record(vec![(id, inverse)]);
        true
    }

    /// Toggles antialiasing on every shape as one undoable step.
    pub fn set_antialiasing_all(&mut self, enabled: bool) {
        let command = StyleCommand::SetAntialiasing(enabled);
        let entry: HistoryEntry = self
            .store
            .entries
            .iter_mut()
            .map(|(id, shape)| (*id, command.apply(shape)))
            .collect();
        if !entry.is_empty() {
            self.record(entry);
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        if self.history.len() == MAX_UNDO_STEPS {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// Reverts the most recent style change. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_back() else {
            return false;
        };
        for (id, inverse) in entry.into_iter().rev() {
            if let Some(shape) = self.store.get_mut(id) {
                inverse.apply(shape);
            }
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn scenario() -> (Frame, ShapeId, ShapeId) {
        let mut frame = Frame::new();
        let line = frame.add_shape(Shape::line(p(-5, 5), p(15, 5)));
        let square = frame.add_shape(Shape::rectangle(p(0, 0), p(10, 10)));
        (frame, line, square)
    }

    #[test]
    fn try_add_shape_respects_limit() {
        let mut frame = Frame::new();
        assert!(frame.try_add_shape(Shape::line(p(0, 0), p(1, 1)), 1).is_some());
        assert!(frame.try_add_shape(Shape::line(p(0, 0), p(2, 2)), 1).is_none());
        assert!(frame.try_add_shape(Shape::line(p(0, 0), p(2, 2)), 0).is_some());
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut frame = Frame::new();
        let first = frame.add_shape(Shape::line(p(0, 0), p(1, 1)));
        frame.remove_shape(first);
        let second = frame.add_shape(Shape::line(p(0, 0), p(1, 1)));
        assert_ne!(first, second);
        assert!(frame.get(first).is_none());
    }

    #[test]
    fn removing_a_shape_purges_its_pairs() {
        let (mut frame, line, square) = scenario();
        frame.add_clip_pair(line, square).unwrap();
        assert!(frame.is_in_clipping_pair(line));

        assert!(frame.remove_shape(square).is_some());
        assert!(!frame.is_in_clipping_pair(line));
        assert_eq!(frame.clipped_segments().count(), 0);
    }

    #[test]
    fn geometry_edits_refresh_clipping() {
        let (mut frame, line, square) = scenario();
        frame.add_clip_pair(line, square).unwrap();
        assert_eq!(
            frame.clipped_segments().collect::<Vec<_>>(),
            vec![(p(0, 5), p(10, 5))]
        );

        // Shrink the clip square from the right.
        assert!(frame.move_edge(square, 1, p(-4, 0)));
        assert_eq!(
            frame.clipped_segments().collect::<Vec<_>>(),
            vec![(p(0, 5), p(6, 5))]
        );

        assert!(frame.translate(line, p(0, 50)));
        assert_eq!(frame.clipped_segments().count(), 0);
    }

    #[test]
    fn shape_at_returns_bottom_most_hit() {
        let (frame, line, _) = scenario();
        assert_eq!(frame.shape_at(p(-4, 6), 3.0), Some(line));
        assert_eq!(frame.shape_at(p(10, 10), 3.0), frame.id_at(1));
        assert_eq!(frame.shape_at(p(50, 50), 3.0), None);
    }

    #[test]
    fn style_commands_are_undoable() {
        let (mut frame, line, _) = scenario();
        assert!(!frame.undo());
        assert!(frame.apply(line, StyleCommand::SetBorderColor(RED)));
        assert_eq!(frame.get(line).unwrap().style().border_color, RED);
        assert!(frame.undo());
        assert_ne!(frame.get(line).unwrap().style().border_color, RED);

        frame.set_antialiasing_all(true);
        assert!(frame.shapes().all(|s| s.style().antialiasing));
        assert!(frame.undo());
        assert!(frame.shapes().all(|s| !s.style().antialiasing));

        assert!(!frame.apply(ShapeId::from_raw(404), StyleCommand::SetThickness(3)));
    }

    #[test]
    fn history_for_removed_shapes_is_dropped() {
        let (mut frame, line, _) = scenario();
        frame.apply(line, StyleCommand::SetThickness(4));
        frame.remove_shape(line);
        assert!(!frame.can_undo());
    }

    #[test]
    fn undo_history_keeps_only_the_latest_steps() {
        let (mut frame, line, _) = scenario();
        for thickness in 1..=150 {
            frame.apply(line, StyleCommand::SetThickness(thickness));
        }
        let mut undone = 0;
        while frame.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_STEPS);
        assert_eq!(frame.get(line).unwrap().style().thickness, 50);
    }

    #[test]
    fn single_pair_can_be_refreshed() {
        let (mut frame, line, square) = scenario();
        frame.add_clip_pair(line, square).unwrap();
        assert!(frame.update_clip_pair(line, square));
        assert_eq!(
            frame.clipped_segments().collect::<Vec<_>>(),
            vec![(p(0, 5), p(10, 5))]
        );
        assert!(!frame.update_clip_pair(square, line));

        frame.remove_clip_pair(line, square);
        assert!(!frame.update_clip_pair(line, square));
    }

    #[test]
    fn far_reaching_line_clips_against_a_small_square() {
        let mut frame = Frame::new();
        let line = frame.add_shape(Shape::line(p(-2_000_000_000, 5), p(2_000_000_000, 5)));
        let square = frame.add_shape(Shape::rectangle(p(0, 0), p(10, 10)));
        frame.add_clip_pair(line, square).unwrap();
        assert_eq!(
            frame.clipped_segments().collect::<Vec<_>>(),
            vec![(p(0, 5), p(10, 5))]
        );
    }
}
