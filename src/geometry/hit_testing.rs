use super::curves::outline;
use super::{Bounds, distance_to_polyline};
use crate::document::Document;
use crate::shape::{ShapeId, ShapeKind};

/// Spatial queries the editor delegates to. Candidates are searched topmost
/// (last) first.
pub trait HitTest {
    /// Nearest point reachable from `candidates` within `radius`, skipping `exclude`.
    fn hit_point(
        &self,
        doc: &Document,
        candidates: &[ShapeId],
        x: f64,
        y: f64,
        radius: f64,
        exclude: &[ShapeId],
    ) -> Option<ShapeId>;

    /// Topmost candidate whose geometry lies within `radius` of `(x, y)`.
    fn hit_shape(&self, doc: &Document, candidates: &[ShapeId], x: f64, y: f64, radius: f64) -> Option<ShapeId>;

    /// Candidates whose points all lie inside `bounds`.
    fn shapes_inside(&self, doc: &Document, candidates: &[ShapeId], bounds: &Bounds) -> Vec<ShapeId>;
}

/// Default geometric hit-tester working from point positions and flattened outlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeBounds;

impl ShapeBounds {
    fn reachable_points(doc: &Document, id: ShapeId) -> Vec<ShapeId> {
        match doc.get(id) {
            Some(shape) if shape.is_point() => vec![id],
            Some(_) => doc.get_points(id),
            None => Vec::new(),
        }
    }

    fn contains(doc: &Document, id: ShapeId, x: f64, y: f64, radius: f64) -> bool {
        let Some(shape) = doc.get(id) else {
            return false;
        };
        if !shape.state.is_visible() {
            return false;
        }
        let corners = |a: ShapeId, b: ShapeId| {
            let (x0, y0) = doc.position(a)?;
            let (x1, y1) = doc.position(b)?;
            Some(Bounds::from_corners(x0, y0, x1, y1))
        };
        match &shape.kind {
            ShapeKind::Point(point) => point.distance_to(x, y) <= radius,
            ShapeKind::Rectangle(rect) => corners(rect.top_left, rect.bottom_right)
                .is_some_and(|bounds| bounds.inflate(radius).contains(x, y)),
            ShapeKind::Text(text) => corners(text.top_left, text.bottom_right)
                .is_some_and(|bounds| bounds.inflate(radius).contains(x, y)),
            ShapeKind::Image(image) => corners(image.top_left, image.bottom_right)
                .is_some_and(|bounds| bounds.inflate(radius).contains(x, y)),
            ShapeKind::Ellipse(rect) => corners(rect.top_left, rect.bottom_right).is_some_and(|bounds| {
                let (cx, cy) = bounds.center();
                let rx = bounds.width() / 2.0 + radius;
                let ry = bounds.height() / 2.0 + radius;
                let nx = (x - cx) / rx;
                let ny = (y - cy) / ry;
                nx * nx + ny * ny <= 1.0
            }),
            ShapeKind::Group(group) => group.shapes().iter().any(|child| Self::contains(doc, *child, x, y, radius))
                || group.connectors().iter().any(|connector| {
                    doc.position(*connector)
                        .is_some_and(|(px, py)| (px - x).hypot(py - y) <= radius)
                }),
            ShapeKind::Line(_)
            | ShapeKind::Arc(_)
            | ShapeKind::CubicBezier(_)
            | ShapeKind::QuadraticBezier(_)
            | ShapeKind::Path(_) => outline(doc, id)
                .iter()
                .any(|polyline| distance_to_polyline((x, y), polyline) <= radius),
        }
    }
}

impl HitTest for ShapeBounds {
    fn hit_point(
        &self,
        doc: &Document,
        candidates: &[ShapeId],
        x: f64,
        y: f64,
        radius: f64,
        exclude: &[ShapeId],
    ) -> Option<ShapeId> {
        let mut best: Option<(ShapeId, f64)> = None;
        for candidate in candidates.iter().rev() {
            for point in Self::reachable_points(doc, *candidate) {
                if exclude.contains(&point) {
                    continue;
                }
                let Some((px, py)) = doc.position(point) else {
                    continue;
                };
                let distance = (px - x).hypot(py - y);
                if distance <= radius && best.is_none_or(|(_, d)| distance < d) {
                    best = Some((point, distance));
                }
            }
        }
        best.map(|(point, _)| point)
    }

    fn hit_shape(&self, doc: &Document, candidates: &[ShapeId], x: f64, y: f64, radius: f64) -> Option<ShapeId> {
        candidates
            .iter()
            .rev()
            .copied()
            .find(|id| Self::contains(doc, *id, x, y, radius))
    }

    fn shapes_inside(&self, doc: &Document, candidates: &[ShapeId], bounds: &Bounds) -> Vec<ShapeId> {
        candidates
            .iter()
            .copied()
            .filter(|id| {
                let points = Self::reachable_points(doc, *id);
                !points.is_empty()
                    && points
                        .iter()
                        .all(|point| doc.position(*point).is_some_and(|(x, y)| bounds.contains(x, y)))
            })
            .collect()
    }
}
