//! Curve flattening shared by hit-testing and the egui renderer.

use std::f64::consts::TAU;

use super::Bounds;
use crate::document::Document;
use crate::path::{ArcSize, PathFigure, SegmentKind, SweepDirection};
use crate::shape::{ShapeId, ShapeKind};

pub type Polyline = Vec<(f64, f64)>;

pub const CURVE_STEPS: usize = 24;
pub const ELLIPSE_STEPS: usize = 48;

pub fn sample_cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), steps: usize) -> Polyline {
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let mt = 1.0 - t;
            let a = mt * mt * mt;
            let b = 3.0 * mt * mt * t;
            let c = 3.0 * mt * t * t;
            let d = t * t * t;
            (
                a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
                a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
            )
        })
        .collect()
}

pub fn sample_quadratic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), steps: usize) -> Polyline {
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let mt = 1.0 - t;
            let a = mt * mt;
            let b = 2.0 * mt * t;
            let c = t * t;
            (a * p0.0 + b * p1.0 + c * p2.0, a * p0.1 + b * p1.1 + c * p2.1)
        })
        .collect()
}

fn radii(bounds: &Bounds) -> (f64, f64) {
    (bounds.width() / 2.0, bounds.height() / 2.0)
}

/// Parametric angle of `(x, y)` on the ellipse inscribed in `bounds`.
pub fn ellipse_angle(bounds: &Bounds, x: f64, y: f64) -> f64 {
    let (cx, cy) = bounds.center();
    let (rx, ry) = radii(bounds);
    if rx <= f64::EPSILON || ry <= f64::EPSILON {
        return (y - cy).atan2(x - cx);
    }
    ((y - cy) / ry).atan2((x - cx) / rx)
}

pub fn ellipse_point(bounds: &Bounds, angle: f64) -> (f64, f64) {
    let (cx, cy) = bounds.center();
    let (rx, ry) = radii(bounds);
    (cx + rx * angle.cos(), cy + ry * angle.sin())
}

/// Moves `(x, y)` onto the ellipse along its parametric angle.
pub fn project_on_ellipse(bounds: &Bounds, x: f64, y: f64) -> (f64, f64) {
    ellipse_point(bounds, ellipse_angle(bounds, x, y))
}

pub fn ellipse_points(bounds: &Bounds, steps: usize) -> Polyline {
    (0..steps)
        .map(|i| ellipse_point(bounds, TAU * i as f64 / steps as f64))
        .collect()
}

/// Arc of the ellipse inscribed in `bounds`, from the angle of `start` to the
/// angle of `end`, increasing.
pub fn ellipse_arc_points(bounds: &Bounds, start: (f64, f64), end: (f64, f64), steps: usize) -> Polyline {
    let a0 = ellipse_angle(bounds, start.0, start.1);
    let mut a1 = ellipse_angle(bounds, end.0, end.1);
    if a1 <= a0 {
        a1 += TAU;
    }
    (0..=steps)
        .map(|i| ellipse_point(bounds, a0 + (a1 - a0) * i as f64 / steps as f64))
        .collect()
}

fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    (ux * vy - uy * vx).atan2(ux * vx + uy * vy)
}

/// Flattens an SVG-style endpoint arc. The returned points exclude `from`
/// and end exactly on `to`.
pub fn endpoint_arc_points(
    from: (f64, f64),
    to: (f64, f64),
    size: ArcSize,
    rotation_degrees: f64,
    is_large_arc: bool,
    sweep: SweepDirection,
    steps: usize,
) -> Polyline {
    let (x1, y1) = from;
    let (x2, y2) = to;
    let mut rx = size.width.abs();
    let mut ry = size.height.abs();
    if (x1 == x2 && y1 == y2) || rx <= f64::EPSILON || ry <= f64::EPSILON {
        return vec![to];
    }

    let phi = rotation_degrees.to_radians();
    let (sin, cos) = phi.sin_cos();
    let dx2 = (x1 - x2) / 2.0;
    let dy2 = (y1 - y2) / 2.0;
    let x1p = cos * dx2 + sin * dy2;
    let y1p = -sin * dx2 + cos * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let sweep_positive = sweep == SweepDirection::Clockwise;
    let numerator = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let denominator = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = (numerator / denominator).max(0.0).sqrt();
    if is_large_arc == sweep_positive {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos * cxp - sin * cyp + (x1 + x2) / 2.0;
    let cy = sin * cxp + cos * cyp + (y1 + y2) / 2.0;

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;
    let theta1 = vector_angle(1.0, 0.0, ux, uy);
    let mut delta = vector_angle(ux, uy, vx, vy);
    if !sweep_positive && delta > 0.0 {
        delta -= TAU;
    } else if sweep_positive && delta < 0.0 {
        delta += TAU;
    }

    let mut points: Polyline = (1..=steps)
        .map(|i| {
            let t = theta1 + delta * i as f64 / steps as f64;
            let (sin_t, cos_t) = t.sin_cos();
            (
                cx + rx * cos_t * cos - ry * sin_t * sin,
                cy + rx * cos_t * sin + ry * sin_t * cos,
            )
        })
        .collect();
    if let Some(last) = points.last_mut() {
        *last = to;
    }
    points
}

fn figure_polyline(doc: &Document, figure: &PathFigure) -> Option<Polyline> {
    let start = doc.position(figure.start_point)?;
    let mut polyline = vec![start];
    for (from, segment) in figure.segments_with_start() {
        let from = doc.position(from)?;
        match &segment.kind {
            SegmentKind::Line { point } => polyline.push(doc.position(*point)?),
            SegmentKind::Arc {
                point,
                size,
                rotation_angle,
                is_large_arc,
                sweep,
            } => {
                let to = doc.position(*point)?;
                polyline.extend(endpoint_arc_points(
                    from,
                    to,
                    *size,
                    *rotation_angle,
                    *is_large_arc,
                    *sweep,
                    CURVE_STEPS,
                ));
            }
            SegmentKind::CubicBezier { point1, point2, point3 } => {
                let samples = sample_cubic(
                    from,
                    doc.position(*point1)?,
                    doc.position(*point2)?,
                    doc.position(*point3)?,
                    CURVE_STEPS,
                );
                polyline.extend(samples.into_iter().skip(1));
            }
            SegmentKind::QuadraticBezier { point1, point2 } => {
                let samples = sample_quadratic(from, doc.position(*point1)?, doc.position(*point2)?, CURVE_STEPS);
                polyline.extend(samples.into_iter().skip(1));
            }
        }
    }
    if figure.is_closed {
        polyline.push(start);
    }
    Some(polyline)
}

/// Flattened outline of a geometric shape: one polyline per contour.
/// Points, text, images and groups have no outline of their own.
pub fn outline(doc: &Document, id: ShapeId) -> Vec<Polyline> {
    let Some(shape) = doc.get(id) else {
        return Vec::new();
    };
    let pos = |point: ShapeId| doc.position(point);
    let contours: Option<Vec<Polyline>> = match &shape.kind {
        ShapeKind::Line(line) => pos(line.start).zip(pos(line.end)).map(|(a, b)| vec![vec![a, b]]),
        ShapeKind::Arc(arc) => (|| {
            let (x0, y0) = pos(arc.point1)?;
            let (x1, y1) = pos(arc.point2)?;
            let bounds = Bounds::from_corners(x0, y0, x1, y1);
            Some(vec![ellipse_arc_points(&bounds, pos(arc.point3)?, pos(arc.point4)?, CURVE_STEPS)])
        })(),
        ShapeKind::CubicBezier(bezier) => (|| {
            Some(vec![sample_cubic(
                pos(bezier.point1)?,
                pos(bezier.point2)?,
                pos(bezier.point3)?,
                pos(bezier.point4)?,
                CURVE_STEPS,
            )])
        })(),
        ShapeKind::QuadraticBezier(bezier) => (|| {
            Some(vec![sample_quadratic(
                pos(bezier.point1)?,
                pos(bezier.point2)?,
                pos(bezier.point3)?,
                CURVE_STEPS,
            )])
        })(),
        ShapeKind::Rectangle(rect) => pos(rect.top_left).zip(pos(rect.bottom_right)).map(|((x0, y0), (x1, y1))| {
            let b = Bounds::from_corners(x0, y0, x1, y1);
            vec![vec![
                (b.min_x, b.min_y),
                (b.max_x, b.min_y),
                (b.max_x, b.max_y),
                (b.min_x, b.max_y),
                (b.min_x, b.min_y),
            ]]
        }),
        ShapeKind::Ellipse(rect) => pos(rect.top_left).zip(pos(rect.bottom_right)).map(|((x0, y0), (x1, y1))| {
            let mut points = ellipse_points(&Bounds::from_corners(x0, y0, x1, y1), ELLIPSE_STEPS);
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
            vec![points]
        }),
        ShapeKind::Path(path) => path
            .geometry
            .figures
            .iter()
            .map(|figure| figure_polyline(doc, figure))
            .collect(),
        ShapeKind::Point(_) | ShapeKind::Text(_) | ShapeKind::Image(_) | ShapeKind::Group(_) => None,
    };
    contours.unwrap_or_default()
}
