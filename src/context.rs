use log::{info, warn};

use crate::command::{Command, CommandHistory};
use crate::document::Document;
use crate::error::Result;
use crate::event::{EditorEvent, EventBus, HistoryEvent, SelectionEvent};
use crate::geometry::{Bounds, HitTest, ShapeBounds};
use crate::options::EditorOptions;
use crate::selection::Selection;
use crate::shape::ShapeId;

/// Everything a tool reads or mutates while handling pointer input.
pub struct EditorContext {
    pub document: Document,
    pub history: CommandHistory,
    pub options: EditorOptions,
    pub selection: Selection,
    /// Shape under the cursor while no gesture is running.
    pub hovered: Option<ShapeId>,
    pub events: EventBus,
    hit_test: Box<dyn HitTest>,
}

impl std::fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorContext")
            .field("document", &self.document)
            .field("history", &self.history)
            .field("options", &self.options)
            .field("selection", &self.selection)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl EditorContext {
    pub fn new(options: EditorOptions) -> Self {
        Self::with_hit_test(options, Box::new(ShapeBounds))
    }

    pub fn with_hit_test(options: EditorOptions, hit_test: Box<dyn HitTest>) -> Self {
        Self {
            document: Document::new(),
            history: CommandHistory::with_limit(options.history_limit),
            options,
            selection: Selection::new(),
            hovered: None,
            events: EventBus::new(),
            hit_test,
        }
    }

    pub fn snap(&self, x: f64, y: f64) -> (f64, f64) {
        self.options.snap(x, y)
    }

    // --- hit testing -------------------------------------------------------

    pub fn hit_point(&self, x: f64, y: f64, exclude: &[ShapeId]) -> Option<ShapeId> {
        self.hit_test.hit_point(
            &self.document,
            self.document.current_layer().shapes(),
            x,
            y,
            self.options.hit_threshold,
            exclude,
        )
    }

    pub fn hit_shape(&self, x: f64, y: f64) -> Option<ShapeId> {
        self.hit_test.hit_shape(
            &self.document,
            self.document.current_layer().shapes(),
            x,
            y,
            self.options.hit_threshold,
        )
    }

    pub fn shapes_inside(&self, bounds: &Bounds) -> Vec<ShapeId> {
        self.hit_test
            .shapes_inside(&self.document, self.document.current_layer().shapes(), bounds)
    }

    /// Existing point to attach to at `(x, y)`, when connecting is enabled.
    pub fn try_connect(&self, x: f64, y: f64, exclude: &[ShapeId]) -> Option<ShapeId> {
        if !self.options.try_to_connect {
            return None;
        }
        self.hit_point(x, y, exclude)
    }

    pub fn hover(&mut self, x: f64, y: f64) {
        let hovered = self.hit_shape(x, y);
        if hovered != self.hovered {
            self.hovered = hovered;
            self.document.current_layer_mut().invalidate();
        }
    }

    // --- selection ---------------------------------------------------------

    pub fn select(&mut self, id: ShapeId) {
        if self.selection.select(id) {
            self.emit_selection();
        }
    }

    pub fn select_only(&mut self, id: ShapeId) {
        self.selection.clear();
        self.selection.select(id);
        self.emit_selection();
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.emit(EditorEvent::SelectionChanged(SelectionEvent::Cleared));
        }
    }

    fn emit_selection(&self) {
        let event = if self.selection.is_empty() {
            SelectionEvent::Cleared
        } else {
            SelectionEvent::Modified(self.selection.shapes().to_vec())
        };
        self.events.emit(EditorEvent::SelectionChanged(event));
    }

    // --- history -----------------------------------------------------------

    pub fn record(&mut self, previous: Command, next: Command) {
        self.history.snapshot(previous, next);
        self.events.emit(EditorEvent::HistoryChanged(HistoryEvent::Recorded));
    }

    /// Moves a finished shape from the working layer onto the current layer
    /// and records the change.
    pub fn commit_shape(&mut self, id: ShapeId) {
        self.document.working_layer_mut().remove(id);
        let layer = self.document.current_layer_id();
        let previous = self.document.current_layer().shapes().to_vec();
        self.document.current_layer_mut().add(id);
        let next = self.document.current_layer().shapes().to_vec();
        self.record(
            Command::LayerShapes { layer, shapes: previous },
            Command::LayerShapes { layer, shapes: next },
        );
        info!(
            "committed {} {id} to layer {layer}",
            self.document.get(id).map_or("shape", |shape| shape.kind_name())
        );
        self.events.emit(EditorEvent::ShapeCommitted { layer_id: layer, shape: id });
    }

    fn forget_missing_selection(&mut self) {
        let layer = self.document.current_layer();
        let before = self.selection.len();
        self.selection.retain(|id| layer.contains(*id));
        if before != self.selection.len() {
            self.emit_selection();
        }
        if self.hovered.is_some_and(|id| !layer.contains(id)) {
            self.hovered = None;
        }
    }

    pub fn undo(&mut self) -> Result<()> {
        self.history.undo(&mut self.document)?;
        self.forget_missing_selection();
        self.events.emit(EditorEvent::HistoryChanged(HistoryEvent::Undone));
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.history.redo(&mut self.document)?;
        self.forget_missing_selection();
        self.events.emit(EditorEvent::HistoryChanged(HistoryEvent::Redone));
        Ok(())
    }

    // --- selection commands ------------------------------------------------

    /// Selected shapes in current-layer order.
    fn selected_on_layer(&self) -> Vec<ShapeId> {
        self.document
            .current_layer()
            .shapes()
            .iter()
            .copied()
            .filter(|id| self.selection.contains(*id))
            .collect()
    }

    pub fn group_selection(&mut self, name: &str) -> Result<Option<ShapeId>> {
        let shapes = self.selected_on_layer();
        if shapes.is_empty() {
            warn!("group requested with nothing selected");
            return Ok(None);
        }
        let previous = Command::scene(&self.document)?;
        let layer = self.document.current_layer_id();
        let group = self.document.group(&shapes, name, Some(layer))?;
        let next = Command::scene(&self.document)?;
        self.record(previous, next);
        self.select_only(group);
        Ok(Some(group))
    }

    /// Ungroups every selected group. Returns how many were dissolved.
    pub fn ungroup_selection(&mut self) -> Result<usize> {
        let groups: Vec<ShapeId> = self
            .selected_on_layer()
            .into_iter()
            .filter(|id| self.document.get(*id).is_some_and(|shape| shape.is_group()))
            .collect();
        if groups.is_empty() {
            warn!("ungroup requested without a selected group");
            return Ok(0);
        }
        let previous = Command::scene(&self.document)?;
        let layer = self.document.current_layer_id();
        for group in &groups {
            self.document.ungroup(*group, Some(layer))?;
        }
        let next = Command::scene(&self.document)?;
        self.record(previous, next);
        self.clear_selection();
        Ok(groups.len())
    }

    /// Takes the selected shapes off the current layer. They stay in the
    /// arena so the removal can be undone.
    pub fn delete_selection(&mut self) -> usize {
        let shapes = self.selected_on_layer();
        if shapes.is_empty() {
            return 0;
        }
        let layer = self.document.current_layer_id();
        let previous = self.document.current_layer().shapes().to_vec();
        let next: Vec<ShapeId> = previous
            .iter()
            .copied()
            .filter(|id| !shapes.contains(id))
            .collect();
        self.document.current_layer_mut().replace_shapes(next.clone());
        self.record(
            Command::LayerShapes { layer, shapes: previous },
            Command::LayerShapes { layer, shapes: next },
        );
        self.clear_selection();
        info!("deleted {} shapes from layer {layer}", shapes.len());
        shapes.len()
    }

    /// Emits `LayerInvalidated` for every layer that asked for a redraw.
    pub fn flush_invalidations(&mut self) {
        for layer_id in self.document.take_invalidated_layers() {
            self.events.emit(EditorEvent::LayerInvalidated { layer_id });
        }
    }
}
