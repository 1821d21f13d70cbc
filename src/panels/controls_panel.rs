use crate::TraitSketchApp;
use crate::color::ColorTarget;
use crate::config::MAX_STROKE_WIDTH;
use crate::stroke::StrokeMode;

pub fn controls_panel(app: &mut TraitSketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("controls_panel")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::Grid::new("controls_buttons")
                .num_columns(2)
                .spacing([8.0, 8.0])
                .show(ui, |ui| {
                    if ui.button("Clear").clicked() {
                        app.controller.clear();
                    }
                    let mode_label = match app.controller.mode() {
                        StrokeMode::Draw => "Erase",
                        StrokeMode::Erase => "Draw",
                    };
                    if ui.button(mode_label).clicked() {
                        app.controller.toggle_erase();
                    }
                    ui.end_row();

                    let can_undo = app.controller.history().can_undo();
                    let can_redo = app.controller.history().can_redo();
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        app.controller.undo().ok();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        app.controller.redo().ok();
                    }
                    ui.end_row();

                    if ui.button("Change Base").clicked() {
                        log::info!("Base drawer opened");
                        app.show_base_drawer = true;
                    }
                    if ui.button("Export").clicked() {
                        app.request_export();
                    }
                    ui.end_row();
                });

            ui.separator();

            let mut width = app.controller.stroke_width();
            ui.label(format!("Stroke width: {}px", width.round() as u32));
            let slider = egui::Slider::new(&mut width, 0.0..=MAX_STROKE_WIDTH)
                .step_by(1.0)
                .show_value(false);
            if ui.add(slider).changed() {
                app.controller.set_stroke_width(width);
            }

            ui.separator();
            ui.label("Stroke Color");
            super::color_row(app, ui, ColorTarget::Stroke);

            if let Some(status) = &app.status {
                ui.separator();
                let color = if status.is_error {
                    ui.visuals().error_fg_color
                } else {
                    ui.visuals().text_color()
                };
                ui.colored_label(color, &status.message);
            }

            let history = app.controller.history();
            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.weak(format!(
                    "{} strokes, {} redoable",
                    history.current().len(),
                    history.future().count()
                ));
            });
        });
}
