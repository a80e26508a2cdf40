use log::debug;

use super::{Tool, ToolState};
use crate::context::EditorContext;
use crate::geometry::Bounds;
use crate::selection::MoveEngine;
use crate::shape::{ShapeDefaults, ShapeId, StyleKey, factory};

#[derive(Debug, Clone, Copy, PartialEq)]
struct RubberBand {
    rectangle: ShapeId,
    origin: ShapeId,
    corner: ShapeId,
}

/// Picks shapes and drags them around.
#[derive(Debug, Default)]
pub struct SelectionTool {
    engine: MoveEngine,
    rubber_band: Option<RubberBand>,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_active()
    }

    fn start_rubber_band(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        let defaults = ShapeDefaults {
            style: Some(StyleKey::new("selection")),
            is_stroked: true,
            is_filled: false,
        };
        let rectangle = factory::create_rectangle(&mut ctx.document, x, y, x, y, &defaults);
        let points = ctx.document.get_points(rectangle);
        ctx.document.helper_layer_mut().add(rectangle);
        self.rubber_band = Some(RubberBand {
            rectangle,
            origin: points[0],
            corner: points[1],
        });
    }

    fn drop_rubber_band(&mut self, ctx: &mut EditorContext) -> Option<Bounds> {
        let band = self.rubber_band.take()?;
        let doc = &mut ctx.document;
        let bounds = doc
            .position(band.origin)
            .zip(doc.position(band.corner))
            .map(|((x0, y0), (x1, y1))| Bounds::from_corners(x0, y0, x1, y1));
        doc.helper_layer_mut().remove(band.rectangle);
        for id in [band.origin, band.corner, band.rectangle] {
            doc.discard(id);
        }
        bounds
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "selection"
    }

    fn state(&self) -> ToolState {
        if self.engine.is_active() || self.rubber_band.is_some() {
            ToolState::One
        } else {
            ToolState::None
        }
    }

    fn abort(&mut self, ctx: &mut EditorContext) {
        self.engine.cancel(&mut ctx.document);
        self.drop_rubber_band(ctx);
        ctx.document.current_layer_mut().invalidate();
    }

    fn left_down(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        if self.state() != ToolState::None {
            return;
        }
        let hit = ctx.hit_point(x, y, &[]).or_else(|| ctx.hit_shape(x, y));
        match hit {
            Some(id) => {
                if !ctx.selection.contains(id) {
                    ctx.select_only(id);
                }
                let (sx, sy) = ctx.snap(x, y);
                let mode = ctx.options.move_mode;
                self.engine.begin(&ctx.document, &ctx.selection, mode, sx, sy);
            }
            None => {
                ctx.clear_selection();
                self.start_rubber_band(ctx, x, y);
            }
        }
        ctx.document.current_layer_mut().invalidate();
    }

    fn left_up(&mut self, ctx: &mut EditorContext, _x: f64, _y: f64) {
        if self.engine.is_active() {
            if let Some((previous, next)) = self.engine.end(&ctx.document) {
                ctx.record(previous, next);
            }
            return;
        }
        if let Some(bounds) = self.drop_rubber_band(ctx) {
            let inside = ctx.shapes_inside(&bounds);
            debug!("rubber band picked {} shapes", inside.len());
            for id in inside {
                ctx.select(id);
            }
            ctx.document.current_layer_mut().invalidate();
        }
    }

    fn pointer_move(&mut self, ctx: &mut EditorContext, x: f64, y: f64) {
        if self.engine.is_active() {
            let (sx, sy) = ctx.snap(x, y);
            if self.engine.drag(&mut ctx.document, sx, sy) {
                ctx.document.current_layer_mut().invalidate();
            }
        } else if let Some(band) = self.rubber_band {
            ctx.document.set_position(band.corner, x, y);
            ctx.document.helper_layer_mut().invalidate();
        } else {
            ctx.hover(x, y);
        }
    }
}
