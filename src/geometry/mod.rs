pub mod curves;
pub mod hit_testing;

pub use hit_testing::{HitTest, ShapeBounds};

/// Axis-aligned box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Box spanned by two arbitrary corners.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let mut bounds = Self::from_corners(x, y, x, y);
        for (x, y) in points {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}

/// Distance from a point to a line segment.
pub fn distance_to_line_segment(point: (f64, f64), start: (f64, f64), end: (f64, f64)) -> f64 {
    let (px, py) = point;
    let (ax, ay) = start;
    let (bx, by) = end;
    let line_x = bx - ax;
    let line_y = by - ay;

    let len_sq = line_x * line_x + line_y * line_y;
    if len_sq == 0.0 {
        return (px - ax).hypot(py - ay);
    }

    let t = (((px - ax) * line_x + (py - ay) * line_y) / len_sq).clamp(0.0, 1.0);
    let proj_x = ax + line_x * t;
    let proj_y = ay + line_y * t;
    (px - proj_x).hypot(py - proj_y)
}

/// Distance from a point to the nearest segment of a polyline.
pub fn distance_to_polyline(point: (f64, f64), polyline: &[(f64, f64)]) -> f64 {
    match polyline {
        [] => f64::INFINITY,
        [single] => (point.0 - single.0).hypot(point.1 - single.1),
        _ => polyline
            .windows(2)
            .map(|pair| distance_to_line_segment(point, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
