use egui::{Color32, Pos2, Rect, Vec2, pos2};

use crate::TraitSketchApp;
use crate::color::{self, Fill};
use crate::input::{self, CanvasEvent};
use crate::layers::BackgroundLayer;
use crate::raster;
use crate::stroke::StrokeMode;

// Semi-transparent white preview for the eraser
const ERASER_PREVIEW: Color32 = Color32::from_rgba_premultiplied(128, 128, 128, 128);
const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

pub fn central_panel(app: &mut TraitSketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let canvas_size = app.controller.canvas().bounds().size();
        let (rect, _response) = ui.allocate_exact_size(canvas_size, egui::Sense::drag());

        // Handle input before drawing so the preview is current
        for event in app.input.process_input(ctx, rect, canvas_size) {
            match event {
                CanvasEvent::PointerDown(pos) => app.controller.pointer_down(pos),
                CanvasEvent::PointerMove(pos) => app.controller.pointer_move(pos),
                CanvasEvent::PointerUp => {
                    app.controller.pointer_up();
                }
                CanvasEvent::Undo => {
                    app.controller.undo().ok();
                }
                CanvasEvent::Redo => {
                    app.controller.redo().ok();
                }
            }
        }

        let painter = ui.painter_at(rect);
        let background = app.controller.colors().background;
        for layer in app.controller.compositor().background(background) {
            match layer {
                BackgroundLayer::Solid(Fill::Solid(rgba)) => {
                    painter.rect_filled(rect, 0.0, color::to_color32(rgba));
                }
                BackgroundLayer::Solid(Fill::Transparent) => {}
                BackgroundLayer::Image { id, .. } => {
                    if let Some(texture) = app.textures.layer(ctx, &id) {
                        let uv = cover_uv(texture.size_vec2(), rect.size());
                        painter.image(texture.id(), rect, uv, Color32::WHITE);
                    }
                }
            }
        }

        let history = app.controller.history();
        let size = app.controller.canvas_size();
        let drawing = app.textures.drawing(ctx, history.revision(), || {
            let strokes = history.current().iter().map(|stroke| stroke.as_ref());
            raster::to_color_image(&raster::render_strokes(size, strokes))
        });
        painter.image(drawing.id(), rect, FULL_UV, Color32::WHITE);

        paint_preview(app, &painter, rect, canvas_size);
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, Color32::GRAY));
    });
}

/// Draw the stroke that is still being drawn
fn paint_preview(app: &TraitSketchApp, painter: &egui::Painter, rect: Rect, canvas_size: Vec2) {
    let Some(stroke) = app.controller.canvas().in_progress() else {
        return;
    };
    let points: Vec<Pos2> = stroke
        .points()
        .iter()
        .map(|point| input::to_screen(*point, rect, canvas_size))
        .collect();
    let scale = rect.width() / canvas_size.x;
    let width = stroke.width() * scale;
    let color = match stroke.mode() {
        StrokeMode::Draw => stroke.color().map_or(Color32::TRANSPARENT, color::to_color32),
        StrokeMode::Erase => ERASER_PREVIEW,
    };

    let radius = (width / 2.0).max(0.5 * scale);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        painter.circle_filled(*first, radius, color);
        painter.circle_filled(*last, radius, color);
    }
    if points.len() > 1 {
        painter.add(egui::Shape::line(points, egui::Stroke::new(width, color)));
    }
}

/// UV rectangle that crops a texture to cover `target` without distortion
fn cover_uv(texture_size: Vec2, target: Vec2) -> Rect {
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        return FULL_UV;
    }
    let scale = (target.x / texture_size.x).max(target.y / texture_size.y);
    let visible = target / (texture_size * scale);
    let min = ((Vec2::splat(1.0) - visible) / 2.0).to_pos2();
    Rect::from_min_size(min, visible)
}
