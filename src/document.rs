//! Arena holding every shape of the drawing plus the layers that list the
//! top-level ones.
//!
//! Shapes refer to each other (children, points, owners) through
//! [`ShapeId`] handles into the arena, so a single point can be shared by
//! several shapes and every mutation is seen by all of them.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EditorError, Result};
use crate::layer::{Layer, LayerId};
use crate::shape::{Property, Shape, ShapeId, ShapeKind};

/// Receives every bindable property of a shape tree.
pub trait PropertyBinder {
    fn bind(&mut self, shape: ShapeId, property: &mut Property);
}

#[derive(Serialize)]
struct SceneSnapshotRef<'a> {
    shapes: &'a [Option<Shape>],
    layers: &'a [Layer],
}

#[derive(Deserialize)]
struct SceneSnapshot {
    shapes: Vec<Option<Shape>>,
    layers: Vec<Layer>,
}

#[derive(Debug, Clone)]
pub struct Document {
    shapes: Vec<Option<Shape>>,
    layers: Vec<Layer>,
    current_layer: LayerId,
    working: Layer,
    helper: Layer,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            layers: vec![Layer::new(LayerId::new(0), "Layer 0")],
            current_layer: LayerId::new(0),
            working: Layer::new(LayerId::WORKING, "Working"),
            helper: Layer::new(LayerId::HELPER, "Helper"),
        }
    }

    // --- arena -------------------------------------------------------------

    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.shapes.len());
        self.shapes.push(Some(shape));
        id
    }

    /// Frees a slot. Only for shapes no layer or history entry refers to.
    pub fn discard(&mut self, id: ShapeId) {
        if let Some(slot) = self.shapes.get_mut(id.index()) {
            *slot = None;
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn shape(&self, id: ShapeId) -> Result<&Shape> {
        self.get(id).ok_or(EditorError::UnknownShape(id))
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape> {
        self.get_mut(id).ok_or(EditorError::UnknownShape(id))
    }

    /// Number of live shapes in the arena.
    pub fn shape_count(&self) -> usize {
        self.shapes.iter().flatten().count()
    }

    // --- points ------------------------------------------------------------

    pub fn position(&self, id: ShapeId) -> Option<(f64, f64)> {
        self.get(id).and_then(Shape::as_point).map(|point| (point.x, point.y))
    }

    /// Places a point, ignoring lock and connector flags. Used by tools on
    /// points they are still constructing.
    pub fn set_position(&mut self, id: ShapeId, x: f64, y: f64) {
        if let Some(shape) = self.get_mut(id) {
            if let Some(point) = shape.as_point_mut() {
                point.x = x;
                point.y = y;
                shape.mark_dirty();
            }
        }
    }

    /// Whether the shape or any shape owning it is locked.
    pub fn is_locked_in_chain(&self, id: ShapeId) -> bool {
        let mut current = Some(id);
        while let Some(shape) = current.and_then(|id| self.get(id)) {
            if shape.state.is_locked() {
                return true;
            }
            current = shape.owner;
        }
        false
    }

    fn is_free_point(&self, id: ShapeId) -> bool {
        self.get(id)
            .is_some_and(|shape| !shape.state.is_locked() && !shape.state.is_connector())
    }

    /// The shape's own points in a fixed order: a point reports itself, a
    /// group reports its children's points followed by its connectors, every
    /// other kind reports its direct point handles.
    pub fn get_points(&self, id: ShapeId) -> Vec<ShapeId> {
        let Some(shape) = self.get(id) else {
            return Vec::new();
        };
        match &shape.kind {
            ShapeKind::Point(_) => vec![id],
            ShapeKind::Group(group) => {
                let mut points: Vec<ShapeId> = group
                    .shapes()
                    .iter()
                    .flat_map(|child| self.get_points(*child))
                    .collect();
                points.extend_from_slice(group.connectors());
                points
            }
            kind => kind.direct_points(),
        }
    }

    /// Swaps a point handle inside `shape` for another point.
    pub fn replace_point(&mut self, shape: ShapeId, old: ShapeId, new: ShapeId) -> bool {
        match self.get_mut(shape) {
            Some(owner) => {
                let replaced = owner.kind.replace_point(old, new);
                if replaced {
                    owner.mark_dirty();
                }
                replaced
            }
            None => false,
        }
    }

    // --- moving ------------------------------------------------------------

    /// Points shared with a locked shape stay where they are.
    fn push_movable(&self, point: ShapeId, out: &mut Vec<ShapeId>, seen: &mut HashSet<ShapeId>) {
        let locked = !self.contains(point) || self.is_locked_in_chain(point);
        if !locked && seen.insert(point) {
            out.push(point);
        }
    }

    fn collect_movable(&self, id: ShapeId, out: &mut Vec<ShapeId>, seen: &mut HashSet<ShapeId>) {
        let Some(shape) = self.get(id) else {
            return;
        };
        if shape.state.is_locked() {
            return;
        }
        match &shape.kind {
            ShapeKind::Point(_) => self.push_movable(id, out, seen),
            ShapeKind::Group(group) => {
                for child in group.shapes() {
                    self.collect_movable(*child, out, seen);
                }
                // Connectors travel with the group that owns them.
                for connector in group.connectors() {
                    self.push_movable(*connector, out, seen);
                }
            }
            kind => {
                for point in kind.direct_points() {
                    let connector = self.get(point).is_some_and(|p| p.state.is_connector());
                    if !connector {
                        self.push_movable(point, out, seen);
                    }
                }
            }
        }
    }

    /// Deduplicated points that moving `ids` as whole shapes would displace.
    pub fn movable_points(&self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for id in ids {
            self.collect_movable(*id, &mut out, &mut seen);
        }
        out
    }

    fn translate_point(&mut self, id: ShapeId, dx: f64, dy: f64) {
        let owner = match self.get_mut(id) {
            Some(shape) if !shape.state.is_locked() => {
                let Some(point) = shape.as_point_mut() else {
                    return;
                };
                point.x += dx;
                point.y += dy;
                shape.mark_dirty();
                shape.owner
            }
            _ => return,
        };
        if let Some(owner) = owner.and_then(|owner| self.get_mut(owner)) {
            owner.mark_dirty();
        }
    }

    /// Moves each point once. Locked points stay put.
    pub fn move_points(&mut self, points: &[ShapeId], dx: f64, dy: f64) {
        for point in points {
            self.translate_point(*point, dx, dy);
        }
    }

    /// Moves a shape by `(dx, dy)`. Connector points referenced by the shape
    /// only move when their owning group moves.
    pub fn move_shape(&mut self, id: ShapeId, dx: f64, dy: f64) {
        self.move_shapes(&[id], dx, dy);
    }

    pub fn move_shapes(&mut self, ids: &[ShapeId], dx: f64, dy: f64) {
        let points = self.movable_points(ids);
        self.move_points(&points, dx, dy);
    }

    /// Pulls the ends of a fixed-length line so it has its configured length.
    pub fn apply_fixed_length(&mut self, id: ShapeId) {
        let Some(ShapeKind::Line(line)) = self.get(id).map(|shape| &shape.kind) else {
            return;
        };
        let Some(fixed) = line.fixed_length else {
            return;
        };
        let (start, end) = (line.start, line.end);
        let (Some((sx, sy)), Some((ex, ey))) = (self.position(start), self.position(end)) else {
            return;
        };
        let length = (ex - sx).hypot(ey - sy);
        if length <= f64::EPSILON {
            debug!("line {id} has no direction, fixed length not applied");
            return;
        }
        let (ux, uy) = ((ex - sx) / length, (ey - sy) / length);
        let delta = fixed.length - length;

        use crate::shape::FixedLengthMode;
        let start_free = self.is_free_point(start);
        let end_free = self.is_free_point(end);
        let (move_start, move_end) = match fixed.mode {
            FixedLengthMode::Start => (start_free, !start_free && end_free),
            FixedLengthMode::End => (!end_free && start_free, end_free),
            FixedLengthMode::Both => (start_free, end_free),
        };
        let (start_share, end_share) = match (move_start, move_end) {
            (true, true) => (delta / 2.0, delta / 2.0),
            (true, false) => (delta, 0.0),
            (false, true) => (0.0, delta),
            (false, false) => {
                warn!("line {id}: both ends are pinned, fixed length not applied");
                return;
            }
        };
        if move_start {
            self.set_position(start, sx - ux * start_share, sy - uy * start_share);
        }
        if move_end {
            self.set_position(end, ex + ux * end_share, ey + uy * end_share);
        }
    }

    // --- properties, binding, dirty tracking -------------------------------

    /// Direct children that share the shape's lifetime: group members or points.
    fn dependents(&self, id: ShapeId) -> Vec<ShapeId> {
        match self.get(id).map(|shape| &shape.kind) {
            Some(ShapeKind::Group(group)) => group.members().collect(),
            Some(kind) => kind.direct_points(),
            None => Vec::new(),
        }
    }

    /// Hands every property of the shape tree to `binder`.
    pub fn bind(&mut self, id: ShapeId, binder: &mut dyn PropertyBinder) {
        if let Some(shape) = self.get_mut(id) {
            for property in &mut shape.properties {
                binder.bind(id, property);
            }
        }
        for child in self.dependents(id) {
            self.bind(child, binder);
        }
    }

    /// Concatenated properties of a group's children and connectors. Cached
    /// until the group's member lists are replaced.
    pub fn shapes_properties(&self, id: ShapeId) -> Result<&[Property]> {
        let group = self.shape(id)?.as_group().ok_or(EditorError::NotAGroup(id))?;
        Ok(group.cached_properties(|| {
            group
                .members()
                .filter_map(|member| self.get(member))
                .flat_map(|member| member.properties.iter().cloned())
                .collect()
        }))
    }

    pub fn is_dirty(&self, id: ShapeId) -> bool {
        self.get(id).is_some_and(Shape::is_dirty)
            || self.dependents(id).into_iter().any(|child| self.is_dirty(child))
    }

    /// Clears the dirty flags of the whole shape tree. Returns whether
    /// anything had changed since the previous call.
    pub fn invalidate(&mut self, id: ShapeId) -> bool {
        let mut changed = self.get_mut(id).is_some_and(Shape::clear_dirty);
        for child in self.dependents(id) {
            changed |= self.invalidate(child);
        }
        changed
    }

    // --- layers ------------------------------------------------------------

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        match id {
            LayerId::WORKING => Some(&self.working),
            LayerId::HELPER => Some(&self.helper),
            _ => self.layers.get(id.index()),
        }
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        match id {
            LayerId::WORKING => Some(&mut self.working),
            LayerId::HELPER => Some(&mut self.helper),
            _ => self.layers.get_mut(id.index()),
        }
    }

    pub fn current_layer_id(&self) -> LayerId {
        self.current_layer
    }

    pub fn set_current_layer(&mut self, id: LayerId) -> Result<()> {
        if id.index() >= self.layers.len() {
            return Err(EditorError::UnknownLayer(id));
        }
        self.current_layer = id;
        Ok(())
    }

    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.current_layer.index()]
    }

    pub fn current_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.current_layer.index()]
    }

    /// Transient layer holding the shape under construction.
    pub fn working_layer(&self) -> &Layer {
        &self.working
    }

    pub fn working_layer_mut(&mut self) -> &mut Layer {
        &mut self.working
    }

    /// Transient layer holding guide lines and handles of the active tool.
    pub fn helper_layer(&self) -> &Layer {
        &self.helper
    }

    pub fn helper_layer_mut(&mut self) -> &mut Layer {
        &mut self.helper
    }

    /// Every layer that requested a redraw since the last call.
    pub fn take_invalidated_layers(&mut self) -> Vec<LayerId> {
        let mut invalidated: Vec<LayerId> = self
            .layers
            .iter_mut()
            .filter_map(|layer| layer.take_redraw().then_some(layer.id))
            .collect();
        for layer in [&mut self.working, &mut self.helper] {
            if layer.take_redraw() {
                invalidated.push(layer.id);
            }
        }
        invalidated
    }

    // --- snapshots ---------------------------------------------------------

    /// Serializes every shape and real layer.
    pub fn snapshot(&self) -> Result<String> {
        let snapshot = SceneSnapshotRef {
            shapes: &self.shapes,
            layers: &self.layers,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Restores shapes and real layers from [`Document::snapshot`] output.
    /// Slots allocated after the snapshot was taken are left alone so their
    /// handles are never handed out twice.
    pub fn restore(&mut self, snapshot: &str) -> Result<()> {
        let SceneSnapshot { shapes, mut layers } = serde_json::from_str(snapshot)?;
        if self.shapes.len() < shapes.len() {
            self.shapes.resize_with(shapes.len(), || None);
        }
        for (index, mut shape) in shapes.into_iter().enumerate() {
            let previous = self.shapes[index].as_ref().map(Shape::version);
            if let (Some(shape), Some(previous)) = (shape.as_mut(), previous) {
                shape.replace_version(previous);
            }
            self.shapes[index] = shape;
        }
        for layer in &mut layers {
            layer.invalidate();
        }
        self.layers = layers;
        if self.current_layer.index() >= self.layers.len() {
            self.current_layer = LayerId::new(0);
        }
        if self.layers.is_empty() {
            self.layers.push(Layer::new(LayerId::new(0), "Layer 0"));
        }
        Ok(())
    }
}
