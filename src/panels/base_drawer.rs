use egui::load::SizedTexture;
use egui::vec2;

use crate::TraitSketchApp;
use crate::app::BaseTab;
use crate::color::ColorTarget;
use crate::layers::LayerKind;

const THUMBNAIL_SIZE: f32 = 96.0;

/// "Select Base" drawer with Hair, Body and Background tabs
pub fn base_drawer(app: &mut TraitSketchApp, ctx: &egui::Context) {
    let is_open = app.show_base_drawer;
    egui::SidePanel::right("base_drawer")
        .resizable(false)
        .default_width(240.0)
        .show_animated(ctx, is_open, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Select Base");
                if ui.small_button("✖").clicked() {
                    app.show_base_drawer = false;
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.selectable_value(&mut app.base_tab, BaseTab::Hair, "Hair");
                ui.selectable_value(&mut app.base_tab, BaseTab::Body, "Body");
                ui.selectable_value(&mut app.base_tab, BaseTab::Background, "Background");
            });
            ui.separator();

            match app.base_tab {
                BaseTab::Hair => layer_grid(app, ui, LayerKind::Hair),
                BaseTab::Body => layer_grid(app, ui, LayerKind::Body),
                BaseTab::Background => super::color_row(app, ui, ColorTarget::Background),
            }
        });
}

fn layer_grid(app: &mut TraitSketchApp, ui: &mut egui::Ui, kind: LayerKind) {
    let ids = app.controller.compositor().catalog().ids(kind).to_vec();
    let selected = app.controller.compositor().selection().get(kind).clone();

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new(("layer_grid", kind)).num_columns(2).show(ui, |ui| {
            for (index, id) in ids.iter().enumerate() {
                let is_selected = *id == selected;
                let texture_id = app.textures.layer(ui.ctx(), id).map(|texture| texture.id());
                let response = match texture_id {
                    Some(texture_id) => {
                        let image = egui::Image::from_texture(SizedTexture::new(
                            texture_id,
                            vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE),
                        ));
                        ui.add(egui::ImageButton::new(image).selected(is_selected))
                    }
                    None => ui.add_sized(
                        [THUMBNAIL_SIZE, THUMBNAIL_SIZE],
                        egui::SelectableLabel::new(is_selected, id.as_str()),
                    ),
                };

                if response.on_hover_text(id.as_str()).clicked() {
                    if let Err(err) = app.controller.set_layer(kind, id.as_str()) {
                        app.report_error(&err);
                    }
                }
                if index % 2 == 1 {
                    ui.end_row();
                }
            }
        });
    });
}
