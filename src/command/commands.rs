use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{EditorError, Result};
use crate::layer::LayerId;
use crate::shape::ShapeId;

/// Saved coordinates of one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPosition {
    pub point: ShapeId,
    pub x: f64,
    pub y: f64,
}

impl PointPosition {
    /// Current coordinates of `points`. Handles that are not points are skipped.
    pub fn capture(doc: &Document, points: &[ShapeId]) -> Vec<Self> {
        points
            .iter()
            .filter_map(|point| doc.position(*point).map(|(x, y)| Self { point: *point, x, y }))
            .collect()
    }
}

/// A captured piece of document state that can be put back as a whole.
///
/// History entries hold two of these, the state before and after a gesture.
/// `apply` overwrites the live state with the captured one, so applying the
/// same command twice leaves the document exactly as applying it once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// The shape list of one layer.
    LayerShapes { layer: LayerId, shapes: Vec<ShapeId> },

    /// Coordinates of a set of points.
    PointPositions(Vec<PointPosition>),

    /// Every shape and layer, serialized.
    Scene(String),
}

impl Command {
    pub fn point_positions(doc: &Document, points: &[ShapeId]) -> Self {
        Command::PointPositions(PointPosition::capture(doc, points))
    }

    pub fn scene(doc: &Document) -> Result<Self> {
        Ok(Command::Scene(doc.snapshot()?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::LayerShapes { .. } => "layer-shapes",
            Command::PointPositions(_) => "point-positions",
            Command::Scene(_) => "scene",
        }
    }

    pub fn apply(&self, doc: &mut Document) -> Result<()> {
        match self {
            Command::LayerShapes { layer, shapes } => {
                doc.layer_mut(*layer)
                    .ok_or(EditorError::UnknownLayer(*layer))?
                    .replace_shapes(shapes.clone());
            }
            Command::PointPositions(positions) => {
                for position in positions {
                    doc.set_position(position.point, position.x, position.y);
                }
            }
            Command::Scene(snapshot) => doc.restore(snapshot)?,
        }
        Ok(())
    }
}
