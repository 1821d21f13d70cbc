use egui::Pos2;
use std::sync::Arc;

use crate::canvas::StrokeCanvas;
use crate::color::{ColorState, ColorTarget, Fill};
use crate::config::{EditorConfig, MAX_STROKE_WIDTH};
use crate::error::EditorResult;
use crate::export::{Exporter, Frame, PendingExport};
use crate::history::HistoryStack;
use crate::layers::{LayerCatalog, LayerCompositor, LayerKind};
use crate::stroke::{StrokeMode, StrokeRef};

/// Owns all editing state and is the only thing that mutates it.
///
/// Every UI action goes through one of these methods, one event at a time.
#[derive(Debug)]
pub struct SessionController {
    canvas: StrokeCanvas,
    history: HistoryStack,
    compositor: LayerCompositor,
    colors: ColorState,
    mode: StrokeMode,
    stroke_width: f32,
    canvas_size: [u32; 2],
}

impl SessionController {
    /// Build from config. Fails if the configured colors or layers are invalid.
    pub fn new(config: &EditorConfig, catalog: Arc<LayerCatalog>) -> EditorResult<Self> {
        let colors = ColorState::default()
            .with_hex(ColorTarget::Stroke, &config.stroke_color)?
            .with_hex(ColorTarget::Background, &config.background_color)?;
        let compositor = LayerCompositor::new(catalog, &config.hair, &config.body)?;

        let mut controller = Self {
            canvas: StrokeCanvas::new(config.canvas_vec2()),
            history: HistoryStack::new(),
            compositor,
            colors,
            mode: StrokeMode::Draw,
            stroke_width: 0.0,
            canvas_size: config.canvas_size,
        };
        controller.set_stroke_width(config.stroke_width);
        Ok(controller)
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    /// Flip between drawing and erasing. Width and color are left alone.
    pub fn toggle_erase(&mut self) -> StrokeMode {
        self.mode = self.mode.toggled();
        log::info!("Mode changed to {:?}", self.mode);
        self.mode
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Clamp to [0, 100] and use for strokes started from now on
    pub fn set_stroke_width(&mut self, width: f32) -> f32 {
        if width.is_nan() {
            log::warn!("Ignoring NaN stroke width");
            return self.stroke_width;
        }
        self.stroke_width = width.clamp(0.0, MAX_STROKE_WIDTH);
        self.stroke_width
    }

    pub fn colors(&self) -> ColorState {
        self.colors
    }

    pub fn set_color(&mut self, target: ColorTarget, fill: Fill) {
        self.colors = self.colors.with_fill(target, fill);
    }

    /// Parse and apply a color. A bad string leaves the colors unchanged.
    pub fn set_color_hex(&mut self, target: ColorTarget, input: &str) -> EditorResult<()> {
        self.colors = self.colors.with_hex(target, input).inspect_err(|err| {
            log::warn!("{}", err);
        })?;
        Ok(())
    }

    pub fn set_layer(&mut self, kind: LayerKind, id: &str) -> EditorResult<()> {
        self.compositor.set_layer(kind, id).inspect_err(|err| {
            log::warn!("Layer selection rejected: {}", err);
        })
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        // A lost pointer-up must not lose the open stroke
        if self.canvas.is_drawing() {
            self.pointer_up();
        }
        let color = self.colors.stroke.rgba();
        self.canvas.begin_stroke(pos, self.stroke_width, self.mode, color);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        self.canvas.extend_stroke(pos);
    }

    /// Finish the current stroke and commit it, returning what was committed
    pub fn pointer_up(&mut self) -> Option<StrokeRef> {
        let stroke = self.canvas.end_stroke()?;
        self.history.commit(Arc::clone(&stroke));
        log::debug!("Committed stroke #{}", self.history.current().len());
        Some(stroke)
    }

    pub fn undo(&mut self) -> EditorResult<&[StrokeRef]> {
        self.history.undo().inspect_err(|err| log::debug!("{}", err))
    }

    pub fn redo(&mut self) -> EditorResult<&[StrokeRef]> {
        self.history.redo().inspect_err(|err| log::debug!("{}", err))
    }

    /// Hard reset of the drawing, including any stroke still being drawn
    pub fn clear(&mut self) {
        self.canvas.cancel();
        self.history.clear();
        log::info!("Canvas cleared");
    }

    pub fn canvas(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    pub fn canvas_size(&self) -> [u32; 2] {
        self.canvas_size
    }

    /// Snapshot of the composited canvas as it looks right now
    pub fn frame(&self) -> Frame {
        Frame::new(
            self.canvas_size,
            self.compositor.background(self.colors.background),
            self.history.session(),
        )
    }

    /// Snapshot now and encode in the background
    pub fn request_export(&self, exporter: &Exporter) -> PendingExport {
        let frame = self.frame();
        log::info!("Export requested ({} strokes)", frame.session().len());
        exporter.request(frame)
    }
}
