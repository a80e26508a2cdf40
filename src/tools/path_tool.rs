//! Multi-segment path construction.
//!
//! The path tool keeps one path on the working layer and appends segments
//! to its last figure. Which kind of segment comes next is chosen by the
//! active sub-tool. A finished segment immediately starts the next one of the
//! same kind, so the path grows click by click until the right button ends it.

use log::{debug, info};

use super::builder::Stage;
use super::decorations::{Decoration, Decorations};
use super::{Tool, ToolState};
use crate::context::EditorContext;
use crate::document::Document;
use crate::path::{ArcSize, PathGeometry, SegmentKind, SweepDirection};
use crate::shape::{Shape, ShapeId, factory};

/// Segment kinds the path tool can append, plus starting a new figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathSubTool {
    #[default]
    Line,
    Arc,
    CubicBezier,
    QuadraticBezier,
    /// Opens a new figure at the click position, then hands back to the
    /// segment kind used before it.
    Move,
}

impl PathSubTool {
    pub fn name(&self) -> &'static str {
        match self {
            PathSubTool::Line => "line",
            PathSubTool::Arc => "arc",
            PathSubTool::CubicBezier => "cubic-bezier",
            PathSubTool::QuadraticBezier => "quadratic-bezier",
            PathSubTool::Move => "move",
        }
    }
}

/// Slot 0 of every segment is the figure's current point; the rest are
/// created with the segment and follow the cursor until clicked into place.
struct SegmentSpec {
    new_points: usize,
    follow: &'static [usize],
    stages: &'static [Stage],
}

const fn click(commit: usize, follow: &'static [usize], decorations: &'static [Decoration]) -> Stage {
    Stage {
        commit,
        follow,
        decorations,
    }
}

static LINE_SEGMENT: SegmentSpec = SegmentSpec {
    new_points: 1,
    follow: &[1],
    stages: &[click(1, &[], &[])],
};

static CUBIC_SEGMENT: SegmentSpec = SegmentSpec {
    new_points: 3,
    follow: &[1, 2, 3],
    stages: &[
        click(3, &[1], &[Decoration::Guide(0, 1), Decoration::Handle(1)]),
        click(
            1,
            &[2],
            &[Decoration::Guide(0, 1), Decoration::Guide(2, 3), Decoration::Handle(2)],
        ),
        click(2, &[], &[]),
    ],
};

static QUADRATIC_SEGMENT: SegmentSpec = SegmentSpec {
    new_points: 2,
    follow: &[1, 2],
    stages: &[
        click(
            2,
            &[1],
            &[Decoration::Guide(0, 1), Decoration::Guide(1, 2), Decoration::Handle(1)],
        ),
        click(1, &[], &[]),
    ],
};

fn segment_spec(kind: PathSubTool) -> Option<&'static SegmentSpec> {
    match kind {
        PathSubTool::Line | PathSubTool::Arc => Some(&LINE_SEGMENT),
        PathSubTool::CubicBezier => Some(&CUBIC_SEGMENT),
        PathSubTool::QuadraticBezier => Some(&QUADRATIC_SEGMENT),
        PathSubTool::Move => None,
    }
}

#[derive(Debug)]
struct Segment {
    kind: PathSubTool,
    slots: Vec<ShapeId>,
    /// Per slot: the point belongs to someone else and must not be discarded.
    borrowed: Vec<bool>,
    clicks: usize,
}

fn edit_geometry<R>(doc: &mut Document, path: ShapeId, edit: impl FnOnce(&mut PathGeometry) -> R) -> Option<R> {
    let shape = doc.get_mut(path)?;
    let result = edit(&mut shape.as_path_mut()?.geometry);
    shape.mark_dirty();
    Some(result)
}

#[derive(Debug, Default)]
pub struct PathTool {
    sub_tool: PathSubTool,
    /// Kind of the most recent segment, resumed after a new figure.
    segment_kind: PathSubTool,
    path: Option<ShapeId>,
    segment: Option<Segment>,
    /// Points this tool created for the current path.
    created: Vec<ShapeId>,
    decorations: Decorations,
}

impl PathTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_tool(&self) -> PathSubTool {
        self.sub_tool
    }

    /// Takes effect on the next left click. A segment still being placed
    /// is replaced by one of the new kind at that point.
    pub fn set_sub_tool(&mut self, sub_tool: PathSubTool) {
        if sub_tool != self.sub_tool {
            debug!("path sub-tool {} -> {}", self.sub_tool.name(), sub_tool.name());
            self.sub_tool = sub_tool;
        }
    }

    /// The path under construction.
    pub fn path(&self) -> Option<ShapeId> {
        self.path
    }

    /// Leaves the Move sub-tool for the segment kind it interrupted.
    fn resume_segments(&mut self) -> PathSubTool {
        if self.sub_tool == PathSubTool::Move {
            debug!("path sub-tool move -> {}", self.segment_kind.name());
            self.sub_tool = self.segment_kind;
        }
        self.sub_tool
    }

    /// Segments of the path that are fully placed.
    pub fn completed_segments(&self, doc: &Document) -> usize {
        let total = self
            .path
            .and_then(|path| doc.get(path))
            .and_then(Shape::as_path)
            .map_or(0, |path| path.geometry.segment_count());
        total.saturating_sub(usize::from(self.segment.is_some()))
    }

    /// An existing point to attach to, or a new point owned by `path`.
    fn point_at(&mut self, ctx: &mut EditorContext, path: ShapeId, x: f64, y: f64, exclude: &[ShapeId]) -> (ShapeId, bool) {
        if let Some(existing) = ctx.try_connect(x, y, exclude) {
            debug!("path attached to {existing}");
            return (existing, true);
        }
        let (sx, sy) = ctx.snap(x, y);
        let point = ctx.document.insert(Shape::child_point(sx, sy, Some(path)));
        self.created.push(point);
        (point, false)
    }

    fn begin_path(&mut self, ctx: &mut EditorContext, x: f64, y: f64) -> ShapeId {
        let geometry = PathGeometry::new(ctx.options.default_fill_rule);
        let defaults = ctx.options.shape_defaults();
        let path = factory::create_path(&mut ctx.document, geometry, &defaults);
        ctx.document.working_layer_mut().add(path);
        self.path = Some(path);
        self.begin_figure(ctx, path, x, y);
        info!("path {path} started");
        path
    }

    fn begin_figure(&mut self, ctx: &mut EditorContext, path: ShapeId, x: f64, y: f64) {
        let (start, _) = self.point_at(ctx, path, x, y, &[]);
        let (is_filled, is_closed) = (ctx.options.default_is_filled, ctx.options.default_is_closed);
        edit_geometry(&mut ctx.document, path, |geometry| {
            geometry.begin_figure(start, is_filled, is_closed);
        });
        ctx.document.working_layer_mut().invalidate();
    }

    fn begin_segment(&mut self, ctx: &mut EditorContext, path: ShapeId, kind: PathSubTool, x: f64, y: f64) {
        let Some(spec) = segment_spec(kind) else {
            return;
        };
        self.segment_kind = kind;
        let Some(start) = ctx
            .document
            .get(path)
            .and_then(Shape::as_path)
            .and_then(|shape| shape.geometry.current_point())
        else {
            return;
        };
        let (sx, sy) = ctx.snap(x, y);
        let mut slots = vec![start];
        for _ in 0..spec.new_points {
            let point = ctx.document.insert(Shape::child_point(sx, sy, Some(path)));
            self.created.push(point);
            slots.push(point);
        }

        let is_stroked = ctx.options.default_is_stroked;
        let is_smooth_join = ctx.options.default_is_smooth_join;
        let size = match (ctx.document.position(start), kind) {
            (Some((x0, y0)), PathSubTool::Arc) => ArcSize::half_chord(x0, y0, sx, sy),
            _ => ArcSize::new(0.0, 0.0),
        };
        edit_geometry(&mut ctx.document, path, |geometry| match kind {
            PathSubTool::Line => geometry.line_to(slots[1], is_stroked, is_smooth_join),
            PathSubTool::Arc => geometry.arc_to(
                slots[1],
                size,
                0.0,
                false,
                SweepDirection::Clockwise,
                is_stroked,
                is_smooth_join,
            ),
            PathSubTool::CubicBezier => {
                geometry.cubic_bezier_to(slots[1], slots[2], slots[3], is_stroked, is_smooth_join)
            }
            PathSubTool::QuadraticBezier => {
                geometry.quadratic_bezier_to(slots[1], slots[2], is_stroked, is_smooth_join)
            }
            PathSubTool::Move => {}
        });

        let mut borrowed = vec![false; slots.len()];
        borrowed[0] = true;
        self.segment = Some(Segment {
            kind,
            slots,
            borrowed,
            clicks: 0,
        });
        ctx.document.working_layer_mut().invalidate();
        debug!("path {path}: {} segment begun", kind.name());
    }

    /// Arc segments keep a half-chord radius as their end point moves.
    fn refresh_arc(&self, doc: &mut Document, path: ShapeId) {
        let Some(segment) = self.segment.as_ref().filter(|segment| segment.kind == PathSubTool::Arc) else {
            return;
        };
        let (Some((x0, y0)), Some((x1, y1))) = (doc.position(segment.slots[0]), doc.position(segment.slots[1])) else {
            return;
        };
        edit_geometry(doc, path, |geometry| {
            let last = geometry
                .last_figure_mut()
                .and_then(|figure| figure.segments.last_mut());
            if let Some(SegmentKind::Arc { size, .. }) = last.map(|segment| &mut segment.kind) {
                *size = ArcSize::half_chord(x0, y0, x1, y1);
            }
        });
    }

    fn follow(&mut self, ctx: &mut EditorContext, path: ShapeId, x: f64, y: f64) {
        let Some(segment) = &self.segment else {
            return;
        };
        let Some(spec) = segment_spec(segment.kind) else {
            return;
        };
        let follow = match segment.clicks.checked_sub(1) {
            Some(last) => spec.stages[last].follow,
            None => spec.follow,
        };
        let (sx, sy) = ctx.snap(x, y);
        for index in follow {
            if !segment.borrowed[*index] {
                ctx.document.set_position(segment.slots[*index], sx, sy);
            }
        }
        self.refresh_arc(&mut ctx.document, path);
        ctx.document.working_layer_mut().invalidate();
        ctx.document.helper_layer_mut().invalidate();
    }

    fn advance_segment(&mut self, ctx: &mut EditorContext, path: ShapeId, x: f64, y: f64) {
        let Some((spec, stage)) = self.segment.as_ref().and_then(|segment| {
            let spec = segment_spec(segment.kind)?;
            Some((spec, *spec.stages.get(segment.clicks)?))
        }) else {
            return;
        };
        let Some(mut segment) = self.segment.take() else {
            return;
        };
        self.decorations.clear(&mut ctx.document);

        let slot = segment.slots[stage.commit];
        let exclude = segment.slots[1..].to_vec();
        match ctx.try_connect(x, y, &exclude) {
            Some(existing) if ctx.document.replace_point(path, slot, existing) => {
                ctx.document.discard(slot);
                self.created.retain(|point| *point != slot);
                segment.slots[stage.commit] = existing;
                segment.borrowed[stage.commit] = true;
                debug!("path {path}: attached to {existing}");
            }
            _ => {
                let (sx, sy) = ctx.snap(x, y);
                ctx.document.set_position(slot, sx, sy);
            }
        }
        segment.clicks += 1;
        let kind = segment.kind;
        let done = segment.clicks == spec.stages.len();
        if !done {
            self.decorations
                .show(&mut ctx.document, stage.decorations, &segment.slots);
        }
        self.segment = Some(segment);
        self.follow(ctx, path, x, y);

        if done {
            self.segment = None;
            debug!("path {path}: {} segment placed", kind.name());
            self.begin_segment(ctx, path, kind, x, y);
        }
    }

    /// Drops the segment still being placed together with its new points.
    fn remove_incomplete_segment(&mut self, doc: &mut Document, path: ShapeId) {
        let Some(segment) = self.segment.take() else {
            return;
        };
        self.decorations.clear(doc);
        edit_geometry(doc, path, PathGeometry::remove_last_segment);
        for (slot, borrowed) in segment.slots.iter().zip(&segment.borrowed) {
            if !borrowed {
                doc.discard(*slot);
                self.created.retain(|point| point != slot);
            }
        }
        debug!("path {path}: incomplete {} segment removed", segment.kind.name());
    }

    /// Ends the path: commits it when it has at least one segment,
    /// otherwise throws it away.
    fn finish(&mut self, ctx: &mut EditorContext) {
        let Some(path) = self.path else {
            return;
        };
        self.remove_incomplete_segment(&mut ctx.document, path);
        let empty = edit_geometry(&mut ctx.document, path, PathGeometry::remove_empty_figures).unwrap_or_default();
        for start in empty {
            if self.created.contains(&start) {
                ctx.document.discard(start);
                self.created.retain(|point| *point != start);
            }
        }
        if self.completed_segments(&ctx.document) > 0 {
            ctx.document.working_layer_mut().remove(path);
            ctx.commit_shape(path);
            self.path = None;
            self.created.clear();
        } else {
            self.abort(ctx);
        }
    }
}

impl Tool for PathTool {
    fn name(&self) -> &'static str {
        "path"
    }

    fn state(&self) -> ToolState {
        match (&self.path, &self.segment) {
            (None, _) => ToolState::None,
            (Some(_), None) => ToolState::One,
            (Some(_), Some(segment)) => ToolState::after(segment.clicks + 1),
        }
    }

    /// Switching tools keeps a path that already has segments.
    fn deactivate(&mut self, ctx: &mut EditorContext) {
        self.finish(ctx);
    }

    fn abort(&mut self, ctx: &mut EditorContext) {
        let Some(path) = self.path.take() else {
            return;
        };
        self.segment = None;
        self.decorations.clear(&mut ctx.document);
        ctx.document.working_layer_mut().remove(path);
        for point in self.created.drain(..) {
            ctx.document.discard(point);
        }
        ctx.document.discard(path);
        debug!("path {path} discarded");
    }

    fn left_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        let Some(path) = self.path else {
            let path = self.begin_path(ctx, x, y);
            let kind = self.resume_segments();
            self.begin_segment(ctx, path, kind, x, y);
            return;
        };
        let continuing = self
            .segment
            .as_ref()
            .is_some_and(|segment| segment.kind == self.sub_tool);
        if continuing {
            self.advance_segment(ctx, path, x, y);
            return;
        }
        self.remove_incomplete_segment(&mut ctx.document, path);
        match self.sub_tool {
            PathSubTool::Move => {
                self.begin_figure(ctx, path, x, y);
                let kind = self.resume_segments();
                self.begin_segment(ctx, path, kind, x, y);
            }
            kind => self.begin_segment(ctx, path, kind, x, y),
        }
    }

    fn right_down(&mut self, ctx: &mut EditorContext, _x: f64, _y: f64) {
        self.finish(ctx);
    }

    fn pointer_move(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        match self.path {
            Some(path) => self.follow(ctx, path, x, y),
            None => ctx.hover(x, y),
        }
    }
}
