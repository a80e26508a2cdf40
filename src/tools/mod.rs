use crate::context::EditorContext;

mod builder;
mod decorations;
mod path_tool;
mod point_tool;
mod selection_tool;

pub use builder::{BuilderSpec, Built, ShapeTool, Stage, new_shape_tool};
pub use decorations::{Decoration, Decorations};
pub use path_tool::{PathSubTool, PathTool};
pub use point_tool::PointTool;
pub use selection_tool::SelectionTool;

/// Progress of a tool through its gesture. `None` means idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolState {
    #[default]
    None,
    One,
    Two,
    Three,
    Four,
}

impl ToolState {
    /// State after `clicks` committed clicks.
    pub fn after(clicks: usize) -> Self {
        match clicks {
            0 => ToolState::None,
            1 => ToolState::One,
            2 => ToolState::Two,
            3 => ToolState::Three,
            _ => ToolState::Four,
        }
    }
}

/// Pointer-driven state machine that builds or edits shapes.
///
/// Coordinates are document coordinates. Tools snap them themselves.
pub trait Tool {
    fn name(&self) -> &'static str;

    fn state(&self) -> ToolState;

    /// Called when the tool becomes active.
    fn activate(&mut self, _ctx: &mut EditorContext) {}

    /// Called when another tool takes over. A gesture in progress is aborted.
    fn deactivate(&mut self, ctx: &mut EditorContext) {
        self.abort(ctx);
    }

    /// Drops the gesture in progress without recording anything.
    fn abort(&mut self, ctx: &mut EditorContext);

    fn left_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64);

    fn left_up(&mut self, _ctx: &mut EditorContext, _x: f64, _y: f64) {}

    fn right_down(&mut self, ctx: &mut EditorContext, _x: f64, _y: f64) {
        self.abort(ctx);
    }

    fn right_up(&mut self, _ctx: &mut EditorContext, _x: f64, _y: f64) {}

    fn pointer_move(&mut self, ctx: &mut EditorContext, x: f64, y: f64);
}

/// Every available tool.
#[derive(Debug)]
pub enum ToolType {
    Selection(SelectionTool),
    Point(PointTool),
    Shape(ShapeTool),
    Path(PathTool),
}

impl ToolType {
    /// Names accepted by [`new_tool`].
    pub const NAMES: &'static [&'static str] = &[
        "selection",
        "point",
        "line",
        "arc",
        "cubic-bezier",
        "quadratic-bezier",
        "rectangle",
        "ellipse",
        "text",
        "path",
    ];

    pub fn as_path_mut(&mut self) -> Option<&mut PathTool> {
        match self {
            Self::Path(tool) => Some(tool),
            _ => None,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Selection(tool) => tool.name(),
            Self::Point(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
            Self::Path(tool) => tool.name(),
        }
    }

    fn state(&self) -> ToolState {
        match self {
            Self::Selection(tool) => tool.state(),
            Self::Point(tool) => tool.state(),
            Self::Shape(tool) => tool.state(),
            Self::Path(tool) => tool.state(),
        }
    }

    fn activate(&mut self, ctx: &mut EditorContext) {
        match self {
            Self::Selection(tool) => tool.activate(ctx),
            Self::Point(tool) => tool.activate(ctx),
            Self::Shape(tool) => tool.activate(ctx),
            Self::Path(tool) => tool.activate(ctx),
        }
    }

    fn deactivate(&mut self, ctx: &mut EditorContext) {
        match self {
            Self::Selection(tool) => tool.deactivate(ctx),
            Self::Point(tool) => tool.deactivate(ctx),
            Self::Shape(tool) => tool.deactivate(ctx),
            Self::Path(tool) => tool.deactivate(ctx),
        }
    }

    fn abort(&mut self, ctx: &mut EditorContext) {
        match self {
            Self::Selection(tool) => tool.abort(ctx),
            Self::Point(tool) => tool.abort(ctx),
            Self::Shape(tool) => tool.abort(ctx),
            Self::Path(tool) => tool.abort(ctx),
        }
    }

    fn left_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        match self {
            Self::Selection(tool) => tool.left_down(ctx, x, y),
            Self::Point(tool) => tool.left_down(ctx, x, y),
            Self::Shape(tool) => tool.left_down(ctx, x, y),
            Self::Path(tool) => tool.left_down(ctx, x, y),
        }
    }

    fn left_up(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        match self {
            Self::Selection(tool) => tool.left_up(ctx, x, y),
            Self::Point(tool) => tool.left_up(ctx, x, y),
            Self::Shape(tool) => tool.left_up(ctx, x, y),
            Self::Path(tool) => tool.left_up(ctx, x, y),
        }
    }

    fn right_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        match self {
            Self::Selection(tool) => tool.right_down(ctx, x, y),
            Self::Point(tool) => tool.right_down(ctx, x, y),
            Self::Shape(tool) => tool.right_down(ctx, x, y),
            Self::Path(tool) => tool.right_down(ctx, x, y),
        }
    }

    fn right_up(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        match self {
            Self::Selection(tool) => tool.right_up(ctx, x, y),
            Self::Point(tool) => tool.right_up(ctx, x, y),
            Self::Shape(tool) => tool.right_up(ctx, x, y),
            Self::Path(tool) => tool.right_up(ctx, x, y),
        }
    }

    fn pointer_move(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        match self {
            Self::Selection(tool) => tool.pointer_move(ctx, x, y),
            Self::Point(tool) => tool.pointer_move(ctx, x, y),
            Self::Shape(tool) => tool.pointer_move(ctx, x, y),
            Self::Path(tool) => tool.pointer_move(ctx, x, y),
        }
    }
}

/// Creates a fresh, idle tool by name.
pub fn new_tool(name: &str) -> Option<ToolType> {
    match name {
        "selection" => Some(ToolType::Selection(SelectionTool::new())),
        "point" => Some(ToolType::Point(PointTool::new())),
        "path" => Some(ToolType::Path(PathTool::new())),
        _ => new_shape_tool(name).map(ToolType::Shape),
    }
}
