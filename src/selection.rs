use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::command::{Command, PointPosition};
use crate::document::Document;
use crate::shape::ShapeId;

/// What a drag of the selection displaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMode {
    /// Every non-connector point of the selected shapes.
    #[default]
    Point,
    /// The selected shapes as a whole, connectors following their group.
    Shape,
}

/// Selected shapes, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    shapes: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the shape was newly added.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.shapes.push(id);
        true
    }

    /// Returns whether the shape was selected.
    pub fn deselect(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|shape| *shape != id);
        before != self.shapes.len()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains(&id)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn retain(&mut self, keep: impl FnMut(&ShapeId) -> bool) {
        self.shapes.retain(keep);
    }
}

/// Drag state of the selection tool.
///
/// The set of points to move is computed once when the drag starts and
/// dropped when it ends or is cancelled.
#[derive(Debug, Default)]
pub struct MoveEngine {
    points: Vec<ShapeId>,
    start: Vec<PointPosition>,
    last: (f64, f64),
    active: bool,
}

impl MoveEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Points the current drag displaces.
    pub fn points(&self) -> &[ShapeId] {
        &self.points
    }

    fn selected_points(doc: &Document, selection: &Selection) -> Vec<ShapeId> {
        let mut seen = HashSet::new();
        let mut points = Vec::new();
        for id in selection.shapes() {
            if !doc.contains(*id) || doc.is_locked_in_chain(*id) {
                continue;
            }
            for point in doc.get_points(*id) {
                let Some(shape) = doc.get(point) else {
                    continue;
                };
                if shape.state.is_connector() || doc.is_locked_in_chain(point) {
                    continue;
                }
                if seen.insert(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    fn selected_shapes(doc: &Document, selection: &Selection) -> Vec<ShapeId> {
        selection
            .shapes()
            .iter()
            .copied()
            .filter(|id| {
                doc.get(*id).is_some_and(|shape| !shape.state.is_connector()) && !doc.is_locked_in_chain(*id)
            })
            .collect()
    }

    /// Starts a drag at the snapped cursor position `(x, y)`.
    pub fn begin(&mut self, doc: &Document, selection: &Selection, mode: MoveMode, x: f64, y: f64) {
        self.points = match mode {
            MoveMode::Point => Self::selected_points(doc, selection),
            MoveMode::Shape => doc.movable_points(&Self::selected_shapes(doc, selection)),
        };
        let locked = selection
            .shapes()
            .iter()
            .filter(|id| doc.is_locked_in_chain(**id))
            .count();
        if locked > 0 {
            warn!("{locked} locked shapes in the selection stay in place");
        }
        self.start = PointPosition::capture(doc, &self.points);
        self.last = (x, y);
        self.active = true;
        debug!("move started with {} points ({mode:?})", self.points.len());
    }

    /// Moves the cached points by the distance from the previous cursor position.
    pub fn drag(&mut self, doc: &mut Document, x: f64, y: f64) -> bool {
        if !self.active {
            return false;
        }
        let (dx, dy) = (x - self.last.0, y - self.last.1);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        doc.move_points(&self.points, dx, dy);
        self.last = (x, y);
        true
    }

    /// Finishes the drag. Returns the before/after positions when anything
    /// actually moved.
    pub fn end(&mut self, doc: &Document) -> Option<(Command, Command)> {
        if !self.active {
            return None;
        }
        let next = Command::point_positions(doc, &self.points);
        let previous = Command::PointPositions(std::mem::take(&mut self.start));
        self.reset();
        (previous != next).then_some((previous, next))
    }

    /// Puts every cached point back where the drag started.
    pub fn cancel(&mut self, doc: &mut Document) {
        if !self.active {
            return;
        }
        for position in &self.start {
            doc.set_position(position.point, position.x, position.y);
        }
        debug!("move cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        self.points.clear();
        self.start.clear();
        self.active = false;
    }
}
