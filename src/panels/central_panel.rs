use crate::DrawApp;

pub fn central_panel(app: &mut DrawApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, mut painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::WHITE);

        app.input.set_canvas_rect(canvas_rect);
        for event in app.input.process_input(ctx) {
            app.editor.handle_input(event);
        }

        app.renderer.origin = canvas_rect.min;
        app.renderer.hovered = app.editor.context.hovered;
        app.editor.draw(&mut app.renderer, &mut painter);
    });
}
