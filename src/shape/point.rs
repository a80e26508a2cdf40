use serde::{Deserialize, Serialize};

use super::ShapeId;

/// Which side of its owner a point snaps text or connectors to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointAlignment {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

/// A single mutable coordinate. Other shapes refer to points by handle, so a
/// point may be shared between a line endpoint and a group connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointShape {
    pub x: f64,
    pub y: f64,
    pub alignment: PointAlignment,
    /// Shape drawn at this point's location instead of the default handle.
    pub template: Option<ShapeId>,
}

impl PointShape {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            alignment: PointAlignment::None,
            template: None,
        }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}
