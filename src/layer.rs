use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shape::ShapeId;

/// A unique identifier for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub usize);

impl LayerId {
    /// The transient layer holding the shape under construction.
    pub const WORKING: LayerId = LayerId(usize::MAX - 1);
    /// The transient layer holding tool decorations.
    pub const HELPER: LayerId = LayerId(usize::MAX);

    /// Creates a new LayerId from an index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Gets the underlying index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LayerId::WORKING => write!(f, "working"),
            LayerId::HELPER => write!(f, "helper"),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// An ordered list of top-level shapes.
///
/// The shape list is treated as a value: `add`/`remove` build a new list and
/// swap it in, so a list handed out earlier (for example to the history) is
/// never changed behind its holder's back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    shapes: Vec<ShapeId>,
    #[serde(skip)]
    needs_redraw: bool,
}

impl Layer {
    pub fn new(id: LayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            visible: true,
            shapes: Vec::new(),
            needs_redraw: true,
        }
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// New list value with `id` appended.
    pub fn with_added(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut shapes = self.shapes.clone();
        shapes.push(id);
        shapes
    }

    /// New list value without `id`.
    pub fn with_removed(&self, id: ShapeId) -> Vec<ShapeId> {
        self.shapes.iter().copied().filter(|shape| *shape != id).collect()
    }

    pub fn replace_shapes(&mut self, shapes: Vec<ShapeId>) {
        self.shapes = shapes;
        self.invalidate();
    }

    pub fn add(&mut self, id: ShapeId) {
        let shapes = self.with_added(id);
        self.replace_shapes(shapes);
    }

    pub fn remove(&mut self, id: ShapeId) {
        let shapes = self.with_removed(id);
        self.replace_shapes(shapes);
    }

    pub fn clear(&mut self) {
        self.replace_shapes(Vec::new());
    }

    /// Request a redraw. Nothing waits on it.
    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns whether a redraw was pending and resets the request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.needs_redraw, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_replaces_list_value() {
        let mut layer = Layer::new(LayerId::new(0), "Layer 0");
        let before = layer.shapes().to_vec();
        layer.add(ShapeId(3));

        assert!(before.is_empty());
        assert_eq!(layer.shapes(), &[ShapeId(3)]);
        assert!(layer.take_redraw());
        assert!(!layer.needs_redraw());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut layer = Layer::new(LayerId::new(0), "Layer 0");
        for n in 0..4 {
            layer.add(ShapeId(n));
        }
        layer.remove(ShapeId(1));
        assert_eq!(layer.shapes(), &[ShapeId(0), ShapeId(2), ShapeId(3)]);
    }
}
