//! Path geometry: figures built from chained segments.
//!
//! A segment never stores its own start point. The start of every segment is
//! the end of the segment before it (or the figure's `start_point` for the
//! first one), so the "current point" is always derived from the last segment
//! of the last figure instead of being tracked in a separate field.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::shape::ShapeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    EvenOdd,
    Nonzero,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    #[default]
    Clockwise,
    Counterclockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSize {
    pub width: f64,
    pub height: f64,
}

impl ArcSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Radii of a half-circle spanning the chord between two points.
    pub fn half_chord(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let radius = ((x1 - x0).hypot(y1 - y0) / 2.0).max(f64::EPSILON);
        Self::new(radius, radius)
    }
}

/// Geometric payload of a segment. Point handles are listed in declaration
/// order; the last one is the segment's end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentKind {
    Line {
        point: ShapeId,
    },
    Arc {
        point: ShapeId,
        size: ArcSize,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep: SweepDirection,
    },
    CubicBezier {
        point1: ShapeId,
        point2: ShapeId,
        point3: ShapeId,
    },
    QuadraticBezier {
        point1: ShapeId,
        point2: ShapeId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub is_stroked: bool,
    pub is_smooth_join: bool,
}

impl PathSegment {
    /// The point the next segment of the figure starts from.
    pub fn end_point(&self) -> ShapeId {
        match &self.kind {
            SegmentKind::Line { point } => *point,
            SegmentKind::Arc { point, .. } => *point,
            SegmentKind::CubicBezier { point3, .. } => *point3,
            SegmentKind::QuadraticBezier { point2, .. } => *point2,
        }
    }

    pub fn points(&self) -> Vec<ShapeId> {
        match &self.kind {
            SegmentKind::Line { point } => vec![*point],
            SegmentKind::Arc { point, .. } => vec![*point],
            SegmentKind::CubicBezier { point1, point2, point3 } => vec![*point1, *point2, *point3],
            SegmentKind::QuadraticBezier { point1, point2 } => vec![*point1, *point2],
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SegmentKind::Line { .. } => "line",
            SegmentKind::Arc { .. } => "arc",
            SegmentKind::CubicBezier { .. } => "cubic-bezier",
            SegmentKind::QuadraticBezier { .. } => "quadratic-bezier",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathFigure {
    pub start_point: ShapeId,
    pub segments: Vec<PathSegment>,
    pub is_filled: bool,
    pub is_closed: bool,
}

impl PathFigure {
    pub fn new(start_point: ShapeId, is_filled: bool, is_closed: bool) -> Self {
        Self {
            start_point,
            segments: Vec::new(),
            is_filled,
            is_closed,
        }
    }

    /// End point of the last segment, or the start point of an empty figure.
    pub fn current_point(&self) -> ShapeId {
        self.segments
            .last()
            .map(PathSegment::end_point)
            .unwrap_or(self.start_point)
    }

    pub fn remove_last_segment(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// `start_point` followed by each segment's points in declaration order.
    pub fn points(&self) -> Vec<ShapeId> {
        let mut points = vec![self.start_point];
        for segment in &self.segments {
            points.extend(segment.points());
        }
        points
    }

    /// Pairs every segment with the point it starts from.
    pub fn segments_with_start(&self) -> impl Iterator<Item = (ShapeId, &PathSegment)> {
        let mut current = self.start_point;
        self.segments.iter().map(move |segment| {
            let start = current;
            current = segment.end_point();
            (start, segment)
        })
    }
}

/// Ordered list of figures plus the fill rule. Segment appends always target
/// the last figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathGeometry {
    pub figures: Vec<PathFigure>,
    pub fill_rule: FillRule,
}

impl PathGeometry {
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            figures: Vec::new(),
            fill_rule,
        }
    }

    pub fn begin_figure(&mut self, start_point: ShapeId, is_filled: bool, is_closed: bool) {
        self.figures.push(PathFigure::new(start_point, is_filled, is_closed));
    }

    pub fn line_to(&mut self, point: ShapeId, is_stroked: bool, is_smooth_join: bool) {
        self.push_segment(PathSegment {
            kind: SegmentKind::Line { point },
            is_stroked,
            is_smooth_join,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        point: ShapeId,
        size: ArcSize,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep: SweepDirection,
        is_stroked: bool,
        is_smooth_join: bool,
    ) {
        self.push_segment(PathSegment {
            kind: SegmentKind::Arc {
                point,
                size,
                rotation_angle,
                is_large_arc,
                sweep,
            },
            is_stroked,
            is_smooth_join,
        });
    }

    pub fn cubic_bezier_to(
        &mut self,
        point1: ShapeId,
        point2: ShapeId,
        point3: ShapeId,
        is_stroked: bool,
        is_smooth_join: bool,
    ) {
        self.push_segment(PathSegment {
            kind: SegmentKind::CubicBezier { point1, point2, point3 },
            is_stroked,
            is_smooth_join,
        });
    }

    pub fn quadratic_bezier_to(
        &mut self,
        point1: ShapeId,
        point2: ShapeId,
        is_stroked: bool,
        is_smooth_join: bool,
    ) {
        self.push_segment(PathSegment {
            kind: SegmentKind::QuadraticBezier { point1, point2 },
            is_stroked,
            is_smooth_join,
        });
    }

    pub fn last_figure(&self) -> Option<&PathFigure> {
        self.figures.last()
    }

    pub fn last_figure_mut(&mut self) -> Option<&mut PathFigure> {
        self.figures.last_mut()
    }

    /// Current point of the last figure, if any figure has been opened.
    pub fn current_point(&self) -> Option<ShapeId> {
        self.last_figure().map(PathFigure::current_point)
    }

    pub fn remove_last_segment(&mut self) -> Option<PathSegment> {
        self.last_figure_mut().and_then(PathFigure::remove_last_segment)
    }

    pub fn segment_count(&self) -> usize {
        self.figures.iter().map(|figure| figure.segments.len()).sum()
    }

    /// Removes figures that never got a segment. Returns their start points.
    pub fn remove_empty_figures(&mut self) -> Vec<ShapeId> {
        let mut starts = Vec::new();
        self.figures.retain(|figure| {
            let empty = figure.segments.is_empty();
            if empty {
                starts.push(figure.start_point);
            }
            !empty
        });
        starts
    }

    /// Flattens figures in order, each as `start_point` then segment points.
    pub fn points(&self) -> Vec<ShapeId> {
        self.figures.iter().flat_map(PathFigure::points).collect()
    }

    fn push_segment(&mut self, segment: PathSegment) {
        match self.figures.last_mut() {
            Some(figure) => figure.segments.push(segment),
            None => warn!("dropping {} segment: no figure has been opened", segment.kind_name()),
        }
    }
}
