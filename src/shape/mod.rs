use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::PathGeometry;

mod group;
mod point;
mod state;

pub use group::GroupShape;
pub use point::{PointAlignment, PointShape};
pub use state::{ConnectorKind, ShapeState};

/// Handle of a shape slot inside a [`crate::Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub usize);

impl ShapeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to a style owned by whoever renders the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleKey(pub String);

impl StyleKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Stroke/fill/style applied to newly created shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeDefaults {
    pub style: Option<StyleKey>,
    pub is_stroked: bool,
    pub is_filled: bool,
}

/// Which end of a fixed-length line gives way when the length is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedLengthMode {
    /// Move the start point, keep the end.
    Start,
    /// Move the end point, keep the start.
    End,
    /// Split the difference evenly between both ends.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFixedLength {
    pub length: f64,
    pub mode: FixedLengthMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub start: ShapeId,
    pub end: ShapeId,
    pub fixed_length: Option<LineFixedLength>,
}

/// Elliptical arc: `point1`/`point2` span the ellipse's bounding box,
/// `point3`/`point4` give the start and end angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
    pub point4: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicBezierShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
    pub point4: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticBezierShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
}

/// Two-corner box used by rectangles and ellipses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
    /// Key the renderer resolves to pixel data.
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub geometry: PathGeometry,
}

/// Every kind of shape the editor knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Point(PointShape),
    Line(LineShape),
    Arc(ArcShape),
    CubicBezier(CubicBezierShape),
    QuadraticBezier(QuadraticBezierShape),
    Rectangle(BoxShape),
    Ellipse(BoxShape),
    Text(TextShape),
    Image(ImageShape),
    Path(PathShape),
    Group(GroupShape),
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Point(_) => "point",
            ShapeKind::Line(_) => "line",
            ShapeKind::Arc(_) => "arc",
            ShapeKind::CubicBezier(_) => "cubic-bezier",
            ShapeKind::QuadraticBezier(_) => "quadratic-bezier",
            ShapeKind::Rectangle(_) => "rectangle",
            ShapeKind::Ellipse(_) => "ellipse",
            ShapeKind::Text(_) => "text",
            ShapeKind::Image(_) => "image",
            ShapeKind::Path(_) => "path",
            ShapeKind::Group(_) => "group",
        }
    }

    /// Point handles held directly by this shape, in the fixed order
    /// `get_points` reports them. Groups hold none directly.
    pub fn direct_points(&self) -> Vec<ShapeId> {
        match self {
            ShapeKind::Point(_) | ShapeKind::Group(_) => Vec::new(),
            ShapeKind::Line(line) => vec![line.start, line.end],
            ShapeKind::Arc(arc) => vec![arc.point1, arc.point2, arc.point3, arc.point4],
            ShapeKind::CubicBezier(bezier) => {
                vec![bezier.point1, bezier.point2, bezier.point3, bezier.point4]
            }
            ShapeKind::QuadraticBezier(bezier) => vec![bezier.point1, bezier.point2, bezier.point3],
            ShapeKind::Rectangle(rect) | ShapeKind::Ellipse(rect) => {
                vec![rect.top_left, rect.bottom_right]
            }
            ShapeKind::Text(text) => vec![text.top_left, text.bottom_right],
            ShapeKind::Image(image) => vec![image.top_left, image.bottom_right],
            ShapeKind::Path(path) => path.geometry.points(),
        }
    }

    /// Swaps every reference to `old` for `new`. Returns whether anything changed.
    pub fn replace_point(&mut self, old: ShapeId, new: ShapeId) -> bool {
        let mut replaced = false;
        let mut swap = |slot: &mut ShapeId| {
            if *slot == old {
                *slot = new;
                replaced = true;
            }
        };
        match self {
            ShapeKind::Point(_) | ShapeKind::Group(_) => {}
            ShapeKind::Line(line) => {
                swap(&mut line.start);
                swap(&mut line.end);
            }
            ShapeKind::Arc(arc) => {
                for slot in [&mut arc.point1, &mut arc.point2, &mut arc.point3, &mut arc.point4] {
                    swap(slot);
                }
            }
            ShapeKind::CubicBezier(bezier) => {
                for slot in [&mut bezier.point1, &mut bezier.point2, &mut bezier.point3, &mut bezier.point4] {
                    swap(slot);
                }
            }
            ShapeKind::QuadraticBezier(bezier) => {
                for slot in [&mut bezier.point1, &mut bezier.point2, &mut bezier.point3] {
                    swap(slot);
                }
            }
            ShapeKind::Rectangle(rect) | ShapeKind::Ellipse(rect) => {
                swap(&mut rect.top_left);
                swap(&mut rect.bottom_right);
            }
            ShapeKind::Text(text) => {
                swap(&mut text.top_left);
                swap(&mut text.bottom_right);
            }
            ShapeKind::Image(image) => {
                swap(&mut image.top_left);
                swap(&mut image.bottom_right);
            }
            ShapeKind::Path(path) => {
                for figure in &mut path.geometry.figures {
                    swap(&mut figure.start_point);
                    for segment in &mut figure.segments {
                        match &mut segment.kind {
                            crate::path::SegmentKind::Line { point }
                            | crate::path::SegmentKind::Arc { point, .. } => swap(point),
                            crate::path::SegmentKind::CubicBezier { point1, point2, point3 } => {
                                swap(point1);
                                swap(point2);
                                swap(point3);
                            }
                            crate::path::SegmentKind::QuadraticBezier { point1, point2 } => {
                                swap(point1);
                                swap(point2);
                            }
                        }
                    }
                }
            }
        }
        replaced
    }
}

fn default_dirty() -> bool {
    true
}

/// A node of the scene graph. Geometry lives in `kind`; the rest is shared
/// bookkeeping every variant carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    pub state: ShapeState,
    pub style: Option<StyleKey>,
    pub is_stroked: bool,
    pub is_filled: bool,
    pub properties: Vec<Property>,
    /// Non-owning back-reference to the containing shape.
    pub owner: Option<ShapeId>,

    #[serde(skip, default = "default_dirty")]
    dirty: bool,
    #[serde(skip)]
    version: u64,
}

impl Shape {
    pub fn new(kind: ShapeKind, defaults: &ShapeDefaults) -> Self {
        Self {
            name: String::new(),
            kind,
            state: ShapeState::STANDALONE_SHAPE,
            style: defaults.style.clone(),
            is_stroked: defaults.is_stroked,
            is_filled: defaults.is_filled,
            properties: Vec::new(),
            owner: None,
            dirty: true,
            version: 0,
        }
    }

    /// A point that belongs to another shape rather than to a layer.
    pub fn child_point(x: f64, y: f64, owner: Option<ShapeId>) -> Self {
        Self {
            name: String::new(),
            kind: ShapeKind::Point(PointShape::new(x, y)),
            state: ShapeState::VISIBLE | ShapeState::PRINTABLE,
            style: None,
            is_stroked: false,
            is_filled: false,
            properties: Vec::new(),
            owner,
            dirty: true,
            version: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn as_point(&self) -> Option<&PointShape> {
        match &self.kind {
            ShapeKind::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointShape> {
        match &mut self.kind {
            ShapeKind::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupShape> {
        match &self.kind {
            ShapeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupShape> {
        match &mut self.kind {
            ShapeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathShape> {
        match &self.kind {
            ShapeKind::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathShape> {
        match &mut self.kind {
            ShapeKind::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self.kind, ShapeKind::Point(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ShapeKind::Group(_))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Flag the shape as changed since the last render pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.version += 1;
    }

    /// Continues the version count of the shape this one replaces.
    pub(crate) fn replace_version(&mut self, previous: u64) {
        self.version = self.version.max(previous);
        self.mark_dirty();
    }

    pub(crate) fn clear_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Factory functions for creating shapes inside a document
pub mod factory {
    use super::*;
    use crate::document::Document;

    fn with_points(
        doc: &mut Document,
        coords: &[(f64, f64)],
        defaults: &ShapeDefaults,
        build: impl FnOnce(&[ShapeId]) -> ShapeKind,
    ) -> ShapeId {
        let points: Vec<ShapeId> = coords
            .iter()
            .map(|&(x, y)| doc.insert(Shape::child_point(x, y, None)))
            .collect();
        let id = doc.insert(Shape::new(build(&points), defaults));
        for point in points {
            if let Some(shape) = doc.get_mut(point) {
                shape.owner = Some(id);
            }
        }
        id
    }

    /// A free point living directly on a layer.
    pub fn create_point(doc: &mut Document, x: f64, y: f64) -> ShapeId {
        doc.insert(Shape::new(
            ShapeKind::Point(PointShape::new(x, y)),
            &ShapeDefaults::default(),
        ))
    }

    pub fn create_line(doc: &mut Document, x0: f64, y0: f64, x1: f64, y1: f64, defaults: &ShapeDefaults) -> ShapeId {
        with_points(doc, &[(x0, y0), (x1, y1)], defaults, |p| {
            ShapeKind::Line(LineShape {
                start: p[0],
                end: p[1],
                fixed_length: None,
            })
        })
    }

    pub fn create_arc(doc: &mut Document, coords: [(f64, f64); 4], defaults: &ShapeDefaults) -> ShapeId {
        with_points(doc, &coords, defaults, |p| {
            ShapeKind::Arc(ArcShape {
                point1: p[0],
                point2: p[1],
                point3: p[2],
                point4: p[3],
            })
        })
    }

    pub fn create_cubic_bezier(doc: &mut Document, coords: [(f64, f64); 4], defaults: &ShapeDefaults) -> ShapeId {
        with_points(doc, &coords, defaults, |p| {
            ShapeKind::CubicBezier(CubicBezierShape {
                point1: p[0],
                point2: p[1],
                point3: p[2],
                point4: p[3],
            })
        })
    }

    pub fn create_quadratic_bezier(doc: &mut Document, coords: [(f64, f64); 3], defaults: &ShapeDefaults) -> ShapeId {
        with_points(doc, &coords, defaults, |p| {
            ShapeKind::QuadraticBezier(QuadraticBezierShape {
                point1: p[0],
                point2: p[1],
                point3: p[2],
            })
        })
    }

    pub fn create_rectangle(doc: &mut Document, x0: f64, y0: f64, x1: f64, y1: f64, defaults: &ShapeDefaults) -> ShapeId {
        with_points(doc, &[(x0, y0), (x1, y1)], defaults, |p| {
            ShapeKind::Rectangle(BoxShape {
                top_left: p[0],
                bottom_right: p[1],
            })
        })
    }

    pub fn create_ellipse(doc: &mut Document, x0: f64, y0: f64, x1: f64, y1: f64, defaults: &ShapeDefaults) -> ShapeId {
        with_points(doc, &[(x0, y0), (x1, y1)], defaults, |p| {
            ShapeKind::Ellipse(BoxShape {
                top_left: p[0],
                bottom_right: p[1],
            })
        })
    }

    pub fn create_text(
        doc: &mut Document,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        text: &str,
        defaults: &ShapeDefaults,
    ) -> ShapeId {
        with_points(doc, &[(x0, y0), (x1, y1)], defaults, |p| {
            ShapeKind::Text(TextShape {
                top_left: p[0],
                bottom_right: p[1],
                text: text.to_string(),
            })
        })
    }

    pub fn create_image(
        doc: &mut Document,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        key: &str,
        defaults: &ShapeDefaults,
    ) -> ShapeId {
        with_points(doc, &[(x0, y0), (x1, y1)], defaults, |p| {
            ShapeKind::Image(ImageShape {
                top_left: p[0],
                bottom_right: p[1],
                key: key.to_string(),
            })
        })
    }

    /// An empty path; figures are opened through its geometry.
    pub fn create_path(doc: &mut Document, geometry: PathGeometry, defaults: &ShapeDefaults) -> ShapeId {
        doc.insert(Shape::new(ShapeKind::Path(PathShape { geometry }), defaults))
    }
}
