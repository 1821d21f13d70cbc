use egui::Pos2;
use std::sync::Arc;

use crate::color::Rgba8;

/// Whether a stroke paints or erases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeMode {
    #[default]
    Draw,
    Erase,
}

impl StrokeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Draw => Self::Erase,
            Self::Erase => Self::Draw,
        }
    }
}

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Pos2>,
    width: f32,
    mode: StrokeMode,
    color: Option<Rgba8>,
}

// Mutable stroke while the pointer is still down
#[derive(Debug, Clone)]
pub struct MutableStroke {
    points: Vec<Pos2>,
    width: f32,
    mode: StrokeMode,
    color: Option<Rgba8>,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    /// Erase strokes never carry a color
    pub fn new(points: Vec<Pos2>, width: f32, mode: StrokeMode, color: Rgba8) -> Self {
        Self {
            points,
            width,
            mode,
            color: match mode {
                StrokeMode::Draw => Some(color),
                StrokeMode::Erase => None,
            },
        }
    }

    pub fn new_ref(points: Vec<Pos2>, width: f32, mode: StrokeMode, color: Rgba8) -> StrokeRef {
        Arc::new(Self::new(points, width, mode, color))
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    /// `None` for erase strokes
    pub fn color(&self) -> Option<Rgba8> {
        self.color
    }
}

impl MutableStroke {
    pub fn new(width: f32, mode: StrokeMode, color: Rgba8) -> Self {
        Self {
            points: Vec::new(),
            width,
            mode,
            color: match mode {
                StrokeMode::Draw => Some(color),
                StrokeMode::Erase => None,
            },
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // Consume into the shared immutable form
    pub fn into_stroke_ref(self) -> StrokeRef {
        Arc::new(Stroke {
            points: self.points,
            width: self.width,
            mode: self.mode,
            color: self.color,
        })
    }

    // Get a reference to the points for preview
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    pub fn color(&self) -> Option<Rgba8> {
        self.color
    }
}
