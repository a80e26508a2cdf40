use log::debug;

use super::{Tool, ToolState};
use crate::context::EditorContext;
use crate::shape::factory;

/// Places a free point with a single click.
#[derive(Debug, Default)]
pub struct PointTool;

impl PointTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for PointTool {
    fn name(&self) -> &'static str {
        "point"
    }

    fn state(&self) -> ToolState {
        ToolState::None
    }

    fn abort(&mut self, _ctx: &mut EditorContext) {}

    fn left_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        let (sx, sy) = ctx.snap(x, y);
        let point = factory::create_point(&mut ctx.document, sx, sy);
        debug!("point placed at ({sx}, {sy})");
        ctx.commit_shape(point);
    }

    fn pointer_move(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        ctx.hover(x, y);
    }
}
