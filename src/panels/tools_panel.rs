use crate::DrawApp;
use crate::selection::MoveMode;
use crate::tools::{PathSubTool, Tool, ToolType};

const SUB_TOOLS: [PathSubTool; 5] = [
    PathSubTool::Line,
    PathSubTool::Arc,
    PathSubTool::CubicBezier,
    PathSubTool::QuadraticBezier,
    PathSubTool::Move,
];

pub fn tools_panel(app: &mut DrawApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool_name = app.editor.active_tool().map(|tool| tool.name());
            for &tool_name in ToolType::NAMES {
                let is_selected = active_tool_name == Some(tool_name);
                if ui.selectable_label(is_selected, tool_name).clicked() && !is_selected {
                    log::info!("Tool selected from UI: {}", tool_name);
                    app.editor.set_tool(tool_name);
                }
            }

            let current_sub_tool = match app.editor.active_tool() {
                Some(ToolType::Path(path)) => Some(path.sub_tool()),
                _ => None,
            };
            if let Some(current) = current_sub_tool {
                ui.separator();
                ui.label("Segment");
                for sub_tool in SUB_TOOLS {
                    if ui.selectable_label(current == sub_tool, sub_tool.name()).clicked() {
                        app.editor.set_path_sub_tool(sub_tool);
                    }
                }
            }
            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = app.editor.context.history.can_undo();
                let can_redo = app.editor.context.history.can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });
            ui.horizontal(|ui| {
                let has_selection = !app.editor.context.selection.is_empty();
                if ui.add_enabled(has_selection, egui::Button::new("Group")).clicked() {
                    app.group();
                }
                if ui.add_enabled(has_selection, egui::Button::new("Ungroup")).clicked() {
                    app.ungroup();
                }
                if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
                    app.delete();
                }
            });
            ui.separator();

            let mut options = app.editor.options().clone();
            ui.checkbox(&mut options.snap_to_grid, "Snap to grid");
            ui.checkbox(&mut options.try_to_connect, "Connect to points");
            ui.horizontal(|ui| {
                ui.label("Move");
                ui.selectable_value(&mut options.move_mode, MoveMode::Point, "points");
                ui.selectable_value(&mut options.move_mode, MoveMode::Shape, "shapes");
            });
            ui.checkbox(&mut options.default_is_filled, "Fill new shapes");
            if &options != app.editor.options() {
                let result = app.editor.set_options(options);
                app.report(result);
            }
            ui.separator();

            let history = &app.editor.context.history;
            ui.label(format!("Undo stack size: {}", history.undo_len()));
            ui.label(format!("Redo stack size: {}", history.redo_len()));
            ui.label(format!("Selected: {}", app.editor.context.selection.len()));
            if let Some(status) = &app.status {
                ui.colored_label(egui::Color32::RED, status);
            }
        });
}
