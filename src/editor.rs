use log::{info, warn};

use crate::context::EditorContext;
use crate::error::Result;
use crate::event::EventHandler;
use crate::input::{InputEvent, PointerButton};
use crate::options::EditorOptions;
use crate::renderer::Renderer;
use crate::shape::ShapeId;
use crate::state::EditorState;
use crate::tools::{PathSubTool, Tool, ToolType, new_tool};

/// The editor: a document with its history plus the tool driving it.
///
/// Pointer methods take document coordinates and forward to the active tool.
/// Commands that rewrite the document abort the running gesture first.
#[derive(Debug, Default)]
pub struct Editor {
    pub context: EditorContext,
    state: EditorState,
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            context: EditorContext::new(options),
            state: EditorState::Idle,
        }
    }

    pub fn with_context(context: EditorContext) -> Self {
        Self {
            context,
            state: EditorState::Idle,
        }
    }

    // --- tools -------------------------------------------------------------

    /// Switches to the tool called `name`. Unknown names leave the current tool
    /// in place.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match new_tool(name) {
            Some(tool) => {
                self.set_tool_type(tool);
                true
            }
            None => {
                warn!("unknown tool {name:?}");
                false
            }
        }
    }

    pub fn set_tool_type(&mut self, tool: ToolType) {
        info!("switching to {} tool", tool.name());
        self.state.set_active_tool(tool, &mut self.context);
        self.context.flush_invalidations();
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn active_tool(&self) -> Option<&ToolType> {
        self.state.active_tool()
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut ToolType> {
        self.state.active_tool_mut()
    }

    /// Picks the segment kind the path tool draws next. No-op for other tools.
    pub fn set_path_sub_tool(&mut self, sub_tool: PathSubTool) -> bool {
        match self.state.active_tool_mut().and_then(ToolType::as_path_mut) {
            Some(path) => {
                path.set_sub_tool(sub_tool);
                true
            }
            None => false,
        }
    }

    pub fn abort_tool(&mut self) {
        if let Some(tool) = self.state.active_tool_mut() {
            tool.abort(&mut self.context);
        }
        self.context.flush_invalidations();
    }

    // --- pointer -----------------------------------------------------------

    fn dispatch(&mut self, f: impl FnOnce(&mut ToolType, &mut EditorContext)) {
        if let Some(tool) = self.state.active_tool_mut() {
            f(tool, &mut self.context);
        }
        self.context.flush_invalidations();
    }

    pub fn left_down(&mut self, x: f64, y: f64) {
        self.dispatch(|tool, ctx| tool.left_down(ctx, x, y));
    }

    pub fn left_up(&mut self, x: f64, y: f64) {
        self.dispatch(|tool, ctx| tool.left_up(ctx, x, y));
    }

    pub fn right_down(&mut self, x: f64, y: f64) {
        self.dispatch(|tool, ctx| tool.right_down(ctx, x, y));
    }

    pub fn right_up(&mut self, x: f64, y: f64) {
        self.dispatch(|tool, ctx| tool.right_up(ctx, x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.dispatch(|tool, ctx| tool.pointer_move(ctx, x, y));
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y, button: PointerButton::Left } => self.left_down(x, y),
            InputEvent::PointerDown { x, y, button: PointerButton::Right } => self.right_down(x, y),
            InputEvent::PointerUp { x, y, button: PointerButton::Left } => self.left_up(x, y),
            InputEvent::PointerUp { x, y, button: PointerButton::Right } => self.right_up(x, y),
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
        }
    }

    // --- commands ----------------------------------------------------------

    pub fn undo(&mut self) -> Result<()> {
        self.abort_tool();
        self.context.undo()?;
        self.context.flush_invalidations();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.abort_tool();
        self.context.redo()?;
        self.context.flush_invalidations();
        Ok(())
    }

    pub fn group_selection(&mut self, name: &str) -> Result<Option<ShapeId>> {
        self.abort_tool();
        let group = self.context.group_selection(name)?;
        self.context.flush_invalidations();
        Ok(group)
    }

    pub fn ungroup_selection(&mut self) -> Result<usize> {
        self.abort_tool();
        let count = self.context.ungroup_selection()?;
        self.context.flush_invalidations();
        Ok(count)
    }

    pub fn delete_selection(&mut self) -> usize {
        self.abort_tool();
        let count = self.context.delete_selection();
        self.context.flush_invalidations();
        count
    }

    pub fn options(&self) -> &EditorOptions {
        &self.context.options
    }

    /// Replaces the options after validating them.
    pub fn set_options(&mut self, options: EditorOptions) -> Result<()> {
        options.validate()?;
        self.context.history.set_limit(options.history_limit);
        self.context.options = options;
        Ok(())
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.context.events.subscribe(handler);
    }

    // --- drawing -----------------------------------------------------------

    /// Draws visible layers, then the working and helper layers on top.
    /// Point handles are drawn for the current layer's selection.
    pub fn draw<R: Renderer>(&self, renderer: &mut R, dc: &mut R::DrawContext) {
        let doc = &self.context.document;
        for layer in doc.layers().iter().filter(|layer| layer.visible) {
            for id in layer.shapes() {
                doc.draw(renderer, dc, *id, 0.0, 0.0);
            }
        }
        for layer in [doc.working_layer(), doc.helper_layer()] {
            for id in layer.shapes() {
                doc.draw(renderer, dc, *id, 0.0, 0.0);
            }
        }
        for id in doc.current_layer().shapes() {
            doc.draw_points(renderer, dc, *id, &self.context.selection, 0.0, 0.0);
        }
    }
}
