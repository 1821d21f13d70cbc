mod base_drawer;
mod central_panel;
mod controls_panel;

pub use base_drawer::base_drawer;
pub use central_panel::central_panel;
pub use controls_panel::controls_panel;

use crate::TraitSketchApp;
use crate::color::{ColorTarget, Fill};

/// Color button, hex field and "Transparent" toggle for one color target
pub(crate) fn color_row(app: &mut TraitSketchApp, ui: &mut egui::Ui, target: ColorTarget) {
    let fill = app.controller.colors().get(target);
    let mut color = fill.to_color32();

    ui.horizontal(|ui| {
        let picked = egui::color_picker::color_edit_button_srgba(
            ui,
            &mut color,
            egui::color_picker::Alpha::OnlyBlend,
        )
        .changed();
        if picked {
            let picked = Fill::from_color32(color);
            app.controller.set_color(target, picked);
            *app.hex_field(target) = picked.to_hex();
        }

        if ui
            .selectable_label(fill == Fill::Transparent, "Transparent")
            .clicked()
        {
            app.controller.set_color(target, Fill::Transparent);
            *app.hex_field(target) = Fill::Transparent.to_hex();
        }
    });

    let response = ui.add(egui::TextEdit::singleline(app.hex_field(target)).desired_width(120.0));
    if response.lost_focus() {
        let input = app.hex_field(target).clone();
        if let Err(err) = app.controller.set_color_hex(target, &input) {
            app.report_error(&err);
            *app.hex_field(target) = app.controller.colors().get(target).to_hex();
        }
    }
}
