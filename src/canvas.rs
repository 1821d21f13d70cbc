use egui::{Pos2, Rect, Vec2};

use crate::color::Rgba8;
use crate::stroke::{MutableStroke, StrokeMode, StrokeRef};

/// Turns pointer input into strokes.
///
/// Owns at most one in-progress stroke. Points are stored in canvas
/// coordinates, clamped to `bounds`.
#[derive(Debug, Clone)]
pub struct StrokeCanvas {
    bounds: Rect,
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<MutableStroke>,
}

impl StrokeCanvas {
    pub fn new(size: Vec2) -> Self {
        Self {
            bounds: Rect::from_min_size(Pos2::ZERO, size),
            current_stroke: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Start a new stroke, replacing any stroke still in progress.
    ///
    /// A non-finite start point still opens the stroke but contributes no point.
    pub fn begin_stroke(&mut self, point: Pos2, width: f32, mode: StrokeMode, color: Rgba8) {
        if let Some(dropped) = self.current_stroke.take() {
            log::warn!(
                "Discarding unfinished stroke with {} points",
                dropped.points().len()
            );
        }

        let mut stroke = MutableStroke::new(width, mode, color);
        if let Some(point) = self.clamp(point) {
            stroke.add_point(point);
        }
        log::debug!("Stroke started: {:?} width={}", mode, width);
        self.current_stroke = Some(stroke);
    }

    pub fn extend_stroke(&mut self, point: Pos2) {
        let Some(point) = self.clamp(point) else {
            return;
        };
        if let Some(stroke) = &mut self.current_stroke {
            stroke.add_point(point);
        }
    }

    /// Finish the in-progress stroke. Strokes without points are discarded.
    pub fn end_stroke(&mut self) -> Option<StrokeRef> {
        let stroke = self.current_stroke.take()?;
        if stroke.is_empty() {
            log::debug!("Discarding empty stroke");
            return None;
        }
        log::debug!("Stroke finished with {} points", stroke.points().len());
        Some(stroke.into_stroke_ref())
    }

    /// Drop the in-progress stroke without producing anything
    pub fn cancel(&mut self) {
        self.current_stroke = None;
    }

    /// The live stroke, for preview rendering
    pub fn in_progress(&self) -> Option<&MutableStroke> {
        self.current_stroke.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.current_stroke.is_some()
    }

    fn clamp(&self, point: Pos2) -> Option<Pos2> {
        if !point.is_finite() {
            log::warn!("Ignoring non-finite pointer position {:?}", point);
            return None;
        }
        Some(self.bounds.clamp(point))
    }
}
