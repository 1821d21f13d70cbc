#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod layers;
pub mod panels;
pub mod raster;
pub mod stroke;
pub mod texture_manager;

pub use app::TraitSketchApp;
pub use canvas::StrokeCanvas;
pub use color::{ColorState, ColorTarget, Fill, Rgba8};
pub use config::EditorConfig;
pub use controller::SessionController;
pub use error::{EditorError, EditorResult, HistoryAction};
pub use export::{AssetDirectory, ExportError, Exporter, FileSink, Frame, MemorySink, PendingExport};
pub use history::{HistoryStack, Session};
pub use layers::{BackgroundLayer, LayerCatalog, LayerCompositor, LayerId, LayerKind, LayerSelection};
pub use stroke::{Stroke, StrokeMode, StrokeRef};
