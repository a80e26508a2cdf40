use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

use super::{Property, Shape, ShapeDefaults, ShapeId, ShapeKind, ShapeState};
use crate::error::{EditorError, Result};
use crate::layer::LayerId;

/// Connectable container: child shapes plus the points other shapes wire to.
///
/// `shapes` and `connectors` can only be replaced as whole values; doing so
/// drops the cached concatenation of their properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupShape {
    shapes: Vec<ShapeId>,
    connectors: Vec<ShapeId>,
    #[serde(skip)]
    properties_cache: OnceCell<Vec<Property>>,
}

impl GroupShape {
    pub fn new(shapes: Vec<ShapeId>, connectors: Vec<ShapeId>) -> Self {
        Self {
            shapes,
            connectors,
            properties_cache: OnceCell::new(),
        }
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn connectors(&self) -> &[ShapeId] {
        &self.connectors
    }

    pub fn set_shapes(&mut self, shapes: Vec<ShapeId>) {
        self.shapes = shapes;
        self.properties_cache = OnceCell::new();
    }

    pub fn set_connectors(&mut self, connectors: Vec<ShapeId>) {
        self.connectors = connectors;
        self.properties_cache = OnceCell::new();
    }

    /// Children first, then connectors.
    pub fn members(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().chain(self.connectors.iter()).copied()
    }

    pub(crate) fn cached_properties(&self, build: impl FnOnce() -> Vec<Property>) -> &[Property] {
        self.properties_cache.get_or_init(build)
    }

    pub(crate) fn has_cached_properties(&self) -> bool {
        self.properties_cache.get().is_some()
    }
}

impl crate::document::Document {
    /// Wraps `shapes` in a new group. Points become the group's connectors,
    /// everything else becomes a child. When `source` is given the grouped
    /// shapes leave that layer and the group is appended to it.
    pub fn group(&mut self, shapes: &[ShapeId], name: &str, source: Option<LayerId>) -> Result<ShapeId> {
        let mut children = Vec::new();
        let mut connectors = Vec::new();
        for id in shapes {
            let shape = self.shape(*id)?;
            if shape.state.is_locked() {
                warn!("refusing to group locked shape {id}");
                return Err(EditorError::Locked(*id));
            }
            if shape.is_point() {
                connectors.push(*id);
            } else {
                children.push(*id);
            }
        }
        if let Some(layer) = source {
            self.layer(layer).ok_or(EditorError::UnknownLayer(layer))?;
        }

        let group = Shape::new(
            ShapeKind::Group(GroupShape::new(children.clone(), connectors.clone())),
            &ShapeDefaults::default(),
        )
        .with_name(name);
        let id = self.insert(group);

        for connector in &connectors {
            if let Some(point) = self.get_mut(*connector) {
                point.state.remove(ShapeState::CONNECTOR_FLAGS);
                point.state.insert(ShapeState::CONNECTOR | ShapeState::NONE);
                point.owner = Some(id);
                point.mark_dirty();
            }
        }
        for child in &children {
            if let Some(shape) = self.get_mut(*child) {
                shape.state.remove(ShapeState::STANDALONE);
                shape.owner = Some(id);
                shape.mark_dirty();
            }
        }

        if let Some(layer) = source.and_then(|layer| self.layer_mut(layer)) {
            let mut remaining: Vec<ShapeId> = layer
                .shapes()
                .iter()
                .copied()
                .filter(|shape| !shapes.contains(shape))
                .collect();
            remaining.push(id);
            layer.replace_shapes(remaining);
        }

        info!(
            "grouped {} shapes and {} connectors into {id} \"{name}\"",
            children.len(),
            connectors.len()
        );
        Ok(id)
    }

    /// Dissolves a group, recursing into nested groups. Every leaf is made
    /// standalone again and appended to `source`; the group leaves `source`.
    /// Calling this on a shape that is not a group changes nothing.
    pub fn ungroup(&mut self, id: ShapeId, source: Option<LayerId>) -> Result<()> {
        self.shape(id)?;
        if let Some(layer) = source {
            self.layer(layer).ok_or(EditorError::UnknownLayer(layer))?;
        }
        self.ungroup_shape(id, source, false);
        Ok(())
    }

    fn ungroup_shape(&mut self, id: ShapeId, source: Option<LayerId>, is_from_group: bool) {
        let members = self
            .get(id)
            .and_then(Shape::as_group)
            .map(|group| (group.shapes().to_vec(), group.connectors().to_vec()));

        if let Some((children, connectors)) = members {
            for member in children.into_iter().chain(connectors) {
                self.ungroup_shape(member, source, true);
            }
            if let Some(layer) = source.and_then(|layer| self.layer_mut(layer)) {
                layer.remove(id);
            }
            info!("ungrouped {id}");
            return;
        }

        if !is_from_group {
            debug!("{id} is not a group, nothing to ungroup");
            return;
        }
        if let Some(shape) = self.get_mut(id) {
            if shape.is_point() {
                shape.state.remove(ShapeState::CONNECTOR_FLAGS);
            }
            shape.state.insert(ShapeState::STANDALONE);
            shape.owner = None;
            shape.mark_dirty();
        }
        if let Some(layer) = source.and_then(|layer| self.layer_mut(layer)) {
            layer.add(id);
        }
    }
}
