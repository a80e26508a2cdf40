//! One state machine for every tool that builds a single shape point by point.
//!
//! A [`BuilderSpec`] row says which point each click commits, which points
//! keep following the cursor afterwards and what to show on the helper layer
//! in between. The first click creates the shape with all of its points at
//! the cursor; the last click hands it to the commit path.

use log::debug;

use super::decorations::{Decoration, Decorations};
use super::{Tool, ToolState};
use crate::context::EditorContext;
use crate::document::Document;
use crate::geometry::Bounds;
use crate::geometry::curves::project_on_ellipse;
use crate::options::EditorOptions;
use crate::shape::{ShapeId, ShapeKind, factory};

/// What one click does.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    /// Slot whose position the click fixes.
    pub commit: usize,
    /// Slots that follow the cursor until a later click.
    pub follow: &'static [usize],
    /// Shown after the click until the next one.
    pub decorations: &'static [Decoration],
}

/// The finished shape handed to a finalize hook.
#[derive(Debug)]
pub struct Built<'a> {
    pub shape: ShapeId,
    pub slots: &'a [ShapeId],
    /// Per slot: attached to an existing point instead of a new one.
    pub connected: &'a [bool],
}

pub type CreateFn = fn(&mut Document, (f64, f64), &EditorOptions) -> ShapeId;
pub type FinalizeFn = fn(&mut Document, &EditorOptions, &Built<'_>);

pub struct BuilderSpec {
    pub name: &'static str,
    /// Creates the shape with every point at the given position.
    pub create: CreateFn,
    pub stages: &'static [Stage],
    pub finalize: Option<FinalizeFn>,
}

impl std::fmt::Debug for BuilderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderSpec")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

const fn click(commit: usize, follow: &'static [usize], decorations: &'static [Decoration]) -> Stage {
    Stage {
        commit,
        follow,
        decorations,
    }
}

const TWO_CORNERS: &[Stage] = &[click(0, &[1], &[]), click(1, &[], &[])];

pub static LINE: BuilderSpec = BuilderSpec {
    name: "line",
    create: create_line,
    stages: TWO_CORNERS,
    finalize: Some(finalize_line),
};

pub static ARC: BuilderSpec = BuilderSpec {
    name: "arc",
    create: create_arc,
    stages: &[
        click(0, &[1], &[Decoration::Ellipse(0, 1)]),
        click(1, &[2], &[Decoration::Ellipse(0, 1), Decoration::Handle(2)]),
        click(2, &[3], &[Decoration::Ellipse(0, 1), Decoration::Handle(2), Decoration::Handle(3)]),
        click(3, &[], &[]),
    ],
    finalize: Some(finalize_arc),
};

pub static CUBIC_BEZIER: BuilderSpec = BuilderSpec {
    name: "cubic-bezier",
    create: create_cubic_bezier,
    stages: &[
        click(0, &[1, 2, 3], &[]),
        click(3, &[1], &[Decoration::Guide(0, 1), Decoration::Handle(1)]),
        click(
            1,
            &[2],
            &[Decoration::Guide(0, 1), Decoration::Guide(2, 3), Decoration::Handle(2)],
        ),
        click(2, &[], &[]),
    ],
    finalize: None,
};

pub static QUADRATIC_BEZIER: BuilderSpec = BuilderSpec {
    name: "quadratic-bezier",
    create: create_quadratic_bezier,
    stages: &[
        click(0, &[1, 2], &[]),
        click(
            2,
            &[1],
            &[Decoration::Guide(0, 1), Decoration::Guide(1, 2), Decoration::Handle(1)],
        ),
        click(1, &[], &[]),
    ],
    finalize: None,
};

pub static RECTANGLE: BuilderSpec = BuilderSpec {
    name: "rectangle",
    create: create_rectangle,
    stages: TWO_CORNERS,
    finalize: None,
};

pub static ELLIPSE: BuilderSpec = BuilderSpec {
    name: "ellipse",
    create: create_ellipse,
    stages: TWO_CORNERS,
    finalize: None,
};

pub static TEXT: BuilderSpec = BuilderSpec {
    name: "text",
    create: create_text,
    stages: TWO_CORNERS,
    finalize: None,
};

fn create_line(doc: &mut Document, (x, y): (f64, f64), options: &EditorOptions) -> ShapeId {
    let line = factory::create_line(doc, x, y, x, y, &options.shape_defaults());
    if let Some(ShapeKind::Line(shape)) = doc.get_mut(line).map(|shape| &mut shape.kind) {
        shape.fixed_length = options.line_fixed_length;
    }
    line
}

fn create_arc(doc: &mut Document, position: (f64, f64), options: &EditorOptions) -> ShapeId {
    factory::create_arc(doc, [position; 4], &options.shape_defaults())
}

fn create_cubic_bezier(doc: &mut Document, position: (f64, f64), options: &EditorOptions) -> ShapeId {
    factory::create_cubic_bezier(doc, [position; 4], &options.shape_defaults())
}

fn create_quadratic_bezier(doc: &mut Document, position: (f64, f64), options: &EditorOptions) -> ShapeId {
    factory::create_quadratic_bezier(doc, [position; 3], &options.shape_defaults())
}

fn create_rectangle(doc: &mut Document, (x, y): (f64, f64), options: &EditorOptions) -> ShapeId {
    factory::create_rectangle(doc, x, y, x, y, &options.shape_defaults())
}

fn create_ellipse(doc: &mut Document, (x, y): (f64, f64), options: &EditorOptions) -> ShapeId {
    factory::create_ellipse(doc, x, y, x, y, &options.shape_defaults())
}

fn create_text(doc: &mut Document, (x, y): (f64, f64), options: &EditorOptions) -> ShapeId {
    factory::create_text(doc, x, y, x, y, &options.default_text, &options.shape_defaults())
}

fn finalize_line(doc: &mut Document, _options: &EditorOptions, built: &Built<'_>) {
    doc.apply_fixed_length(built.shape);
}

/// Arc start and end points that are not attached elsewhere are pulled onto
/// the ellipse spanned by the first two points.
fn finalize_arc(doc: &mut Document, _options: &EditorOptions, built: &Built<'_>) {
    let (Some((x0, y0)), Some((x1, y1))) = (doc.position(built.slots[0]), doc.position(built.slots[1])) else {
        return;
    };
    let bounds = Bounds::from_corners(x0, y0, x1, y1);
    for index in [2, 3] {
        if built.connected[index] {
            continue;
        }
        if let Some((x, y)) = doc.position(built.slots[index]) {
            let (px, py) = project_on_ellipse(&bounds, x, y);
            doc.set_position(built.slots[index], px, py);
        }
    }
}

pub fn spec_by_name(name: &str) -> Option<&'static BuilderSpec> {
    [&LINE, &ARC, &CUBIC_BEZIER, &QUADRATIC_BEZIER, &RECTANGLE, &ELLIPSE, &TEXT]
        .into_iter()
        .find(|spec| spec.name == name)
}

pub fn new_shape_tool(name: &str) -> Option<ShapeTool> {
    spec_by_name(name).map(ShapeTool::new)
}

/// Tool driven by a [`BuilderSpec`].
#[derive(Debug)]
pub struct ShapeTool {
    spec: &'static BuilderSpec,
    shape: Option<ShapeId>,
    slots: Vec<ShapeId>,
    connected: Vec<bool>,
    clicks: usize,
    decorations: Decorations,
}

impl ShapeTool {
    pub fn new(spec: &'static BuilderSpec) -> Self {
        Self {
            spec,
            shape: None,
            slots: Vec::new(),
            connected: Vec::new(),
            clicks: 0,
            decorations: Decorations::new(),
        }
    }

    /// The shape under construction.
    pub fn shape(&self) -> Option<ShapeId> {
        self.shape
    }

    fn start(&mut self, ctx: &mut EditorContext, x: f64, y: f64) -> ShapeId {
        let position = ctx.snap(x, y);
        let shape = (self.spec.create)(&mut ctx.document, position, &ctx.options);
        self.slots = ctx.document.get_points(shape);
        self.connected = vec![false; self.slots.len()];
        self.clicks = 0;
        ctx.document.working_layer_mut().add(shape);
        self.shape = Some(shape);
        debug!("{} started {shape}", self.spec.name);
        shape
    }

    /// Fixes one slot: attaches it to an existing point when connecting is
    /// on and one is close enough, otherwise snaps it to the grid.
    fn commit_slot(&mut self, ctx: &mut EditorContext, shape: ShapeId, index: usize, x: f64, y: f64) {
        let Some(slot) = self.slots.get(index).copied() else {
            return;
        };
        if let Some(existing) = ctx.try_connect(x, y, &self.slots) {
            if ctx.document.replace_point(shape, slot, existing) {
                ctx.document.discard(slot);
                self.slots[index] = existing;
                self.connected[index] = true;
                debug!("{} attached slot {index} to {existing}", self.spec.name);
                return;
            }
        }
        let (sx, sy) = ctx.snap(x, y);
        ctx.document.set_position(slot, sx, sy);
    }

    fn follow(&self, ctx: &mut EditorContext, slots: &[usize], x: f64, y: f64) {
        let (sx, sy) = ctx.snap(x, y);
        for index in slots {
            if let Some(slot) = self.slots.get(*index) {
                if !self.connected[*index] {
                    ctx.document.set_position(*slot, sx, sy);
                }
            }
        }
        ctx.document.working_layer_mut().invalidate();
        ctx.document.helper_layer_mut().invalidate();
    }

    fn finish(&mut self, ctx: &mut EditorContext, shape: ShapeId) {
        self.decorations.clear(&mut ctx.document);
        ctx.document.working_layer_mut().remove(shape);
        if let Some(finalize) = self.spec.finalize {
            let built = Built {
                shape,
                slots: &self.slots,
                connected: &self.connected,
            };
            finalize(&mut ctx.document, &ctx.options, &built);
        }
        ctx.commit_shape(shape);
        self.reset();
    }

    fn reset(&mut self) {
        self.shape = None;
        self.slots.clear();
        self.connected.clear();
        self.clicks = 0;
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn state(&self) -> ToolState {
        if self.shape.is_some() {
            ToolState::after(self.clicks)
        } else {
            ToolState::None
        }
    }

    fn abort(&mut self, ctx: &mut EditorContext) {
        let Some(shape) = self.shape else {
            return;
        };
        self.decorations.clear(&mut ctx.document);
        ctx.document.working_layer_mut().remove(shape);
        for (slot, connected) in self.slots.iter().zip(&self.connected) {
            if !connected {
                ctx.document.discard(*slot);
            }
        }
        ctx.document.discard(shape);
        debug!("{} aborted {shape}", self.spec.name);
        self.reset();
    }

    fn left_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        let shape = match self.shape {
            Some(shape) => shape,
            None => self.start(ctx, x, y),
        };
        let Some(stage) = self.spec.stages.get(self.clicks).copied() else {
            return;
        };
        self.decorations.clear(&mut ctx.document);
        self.commit_slot(ctx, shape, stage.commit, x, y);
        self.follow(ctx, stage.follow, x, y);
        self.clicks += 1;

        if self.clicks == self.spec.stages.len() {
            self.finish(ctx, shape);
        } else {
            self.decorations
                .show(&mut ctx.document, stage.decorations, &self.slots);
            debug!("{} -> {:?}", self.spec.name, self.state());
        }
    }

    fn pointer_move(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        if self.shape.is_none() {
            ctx.hover(x, y);
            return;
        }
        if let Some(stage) = self.clicks.checked_sub(1).and_then(|last| self.spec.stages.get(last)) {
            self.follow(ctx, stage.follow, x, y);
        }
    }
}
