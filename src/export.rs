use futures::channel::oneshot;
use image::{ImageFormat, RgbaImage};
use parking_lot::Mutex;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::history::Session;
use crate::layers::{BackgroundLayer, LayerId};
use crate::raster;

/// Errors that can occur while producing the exported image
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not load layer image {id}: {reason}")]
    MissingLayerImage { id: LayerId, reason: String },

    #[error("export worker stopped before finishing")]
    Interrupted,
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Resolves a layer identifier to its pixels
pub trait LayerImages: Send + Sync {
    fn load(&self, id: &LayerId) -> ExportResult<RgbaImage>;
}

/// Layer images stored as `<root>/<id>.png`
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Status line for a missing asset directory, if it is missing
    pub fn missing_notice(&self) -> Option<String> {
        (!self.root.is_dir()).then(|| {
            format!(
                "Layer images not found: expected <id>.png files in {}",
                self.root.display()
            )
        })
    }
}

impl LayerImages for AssetDirectory {
    fn load(&self, id: &LayerId) -> ExportResult<RgbaImage> {
        let path = id.asset_file(&self.root);
        let image = image::open(&path).map_err(|err| ExportError::MissingLayerImage {
            id: id.clone(),
            reason: format!("expected {}: {}", path.display(), err),
        })?;
        Ok(image.to_rgba8())
    }
}

/// Where finished exports are delivered
pub trait ExportSink: Send + Sync {
    /// Returns a human readable location of the delivered artifact
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> ExportResult<String>;
}

/// Writes exports into a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for FileSink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> ExportResult<String> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path.display().to_string())
    }
}

/// Keeps exports in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<(String, Vec<u8>)> {
        self.artifacts.lock().clone()
    }
}

impl ExportSink for MemorySink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> ExportResult<String> {
        let mut artifacts = self.artifacts.lock();
        artifacts.push((file_name.to_owned(), bytes.to_vec()));
        Ok(format!("memory:{}#{}", file_name, artifacts.len()))
    }
}

/// Immutable snapshot of everything needed to render the composited canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    size: [u32; 2],
    background: Vec<BackgroundLayer>,
    session: Session,
}

impl Frame {
    pub fn new(size: [u32; 2], background: Vec<BackgroundLayer>, session: Session) -> Self {
        Self {
            size,
            background,
            session,
        }
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn background(&self) -> &[BackgroundLayer] {
        &self.background
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Composite background stack and strokes into one image
    pub fn flatten(&self, images: &dyn LayerImages) -> ExportResult<RgbaImage> {
        let [width, height] = self.size;
        let mut canvas = RgbaImage::new(width, height);

        for layer in &self.background {
            match layer {
                BackgroundLayer::Solid(fill) => raster::paint_fill(&mut canvas, *fill),
                BackgroundLayer::Image { id, .. } => {
                    let image = images.load(id)?;
                    raster::overlay(&mut canvas, &raster::fit_cover(&image, width, height));
                }
            }
        }

        let strokes = self.session.strokes().iter().map(|stroke| stroke.as_ref());
        let drawing = raster::render_strokes(self.size, strokes);
        raster::overlay(&mut canvas, &drawing);
        Ok(canvas)
    }
}

pub fn encode_png(image: &RgbaImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub location: String,
    pub byte_len: usize,
}

/// Render, encode and deliver one frame on the current thread
pub fn export_frame(
    frame: &Frame,
    images: &dyn LayerImages,
    sink: &dyn ExportSink,
    file_name: &str,
) -> ExportResult<ExportReceipt> {
    let started = Instant::now();
    let image = frame.flatten(images)?;
    let bytes = encode_png(&image)?;
    let location = sink.deliver(file_name, &bytes)?;
    log::info!(
        "Exported {} strokes to {} ({} bytes) in {:?}",
        frame.session().len(),
        location,
        bytes.len(),
        started.elapsed()
    );
    Ok(ExportReceipt {
        location,
        byte_len: bytes.len(),
    })
}

/// Runs exports on worker threads so the editor keeps responding
#[derive(Clone)]
pub struct Exporter {
    images: Arc<dyn LayerImages>,
    sink: Arc<dyn ExportSink>,
    file_name: String,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

impl Exporter {
    pub fn new(
        images: Arc<dyn LayerImages>,
        sink: Arc<dyn ExportSink>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            images,
            sink,
            file_name: file_name.into(),
        }
    }

    /// Start exporting `frame`. Each call is an independent export.
    pub fn request(&self, frame: Frame) -> PendingExport {
        let (sender, receiver) = oneshot::channel();
        let images = Arc::clone(&self.images);
        let sink = Arc::clone(&self.sink);
        let file_name = self.file_name.clone();

        let spawned = std::thread::Builder::new()
            .name("export".to_owned())
            .spawn(move || {
                let result = export_frame(&frame, images.as_ref(), sink.as_ref(), &file_name);
                if let Err(err) = &result {
                    log::error!("Export failed: {}", err);
                }
                // Nobody may be waiting any more
                let _ = sender.send(result);
            });
        if let Err(err) = spawned {
            // The sender was dropped with the closure, so the handle reports Interrupted
            log::error!("Failed to start export worker: {}", err);
        }

        PendingExport { receiver }
    }
}

/// Handle to an export running in the background
#[derive(Debug)]
pub struct PendingExport {
    receiver: oneshot::Receiver<ExportResult<ExportReceipt>>,
}

impl PendingExport {
    /// Non-blocking check, for calling once per UI frame
    pub fn poll(&mut self) -> Option<ExportResult<ExportReceipt>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ExportError::Interrupted)),
        }
    }

    pub async fn finish(self) -> ExportResult<ExportReceipt> {
        self.receiver.await.unwrap_or(Err(ExportError::Interrupted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Fill, WHITE};
    use crate::layers::LayerKind;
    use crate::stroke::{Stroke, StrokeMode};
    use egui::pos2;
    use image::Rgba;

    struct Missing;

    impl LayerImages for Missing {
        fn load(&self, id: &LayerId) -> ExportResult<RgbaImage> {
            Err(ExportError::MissingLayerImage {
                id: id.clone(),
                reason: "not found".to_owned(),
            })
        }
    }

    #[test]
    fn test_missing_layer_image_fails_export() {
        let frame = Frame::new(
            [8, 8],
            vec![BackgroundLayer::Image {
                kind: LayerKind::Body,
                id: LayerId::new("x_kong_01"),
            }],
            Session::default(),
        );
        let sink = MemorySink::new();
        let err = export_frame(&frame, &Missing, &sink, "traits.png").unwrap_err();
        assert!(matches!(err, ExportError::MissingLayerImage { .. }));
        assert!(sink.artifacts().is_empty());
    }

    #[test]
    fn test_flatten_without_images() {
        let stroke = Stroke::new_ref(vec![pos2(0.0, 4.0), pos2(8.0, 4.0)], 2.0, StrokeMode::Draw, Rgba([255, 0, 0, 255]));
        let frame = Frame::new(
            [8, 8],
            vec![BackgroundLayer::Solid(Fill::Solid(WHITE))],
            Session::new(vec![stroke]),
        );
        let image = frame.flatten(&Missing).unwrap();
        assert_eq!(image.get_pixel(4, 4), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(4, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_missing_asset_names_expected_file() {
        let root = std::env::temp_dir().join(format!("trait_sketch_no_assets_{}", std::process::id()));
        let assets = AssetDirectory::new(&root);
        assert!(assets.missing_notice().unwrap().contains(&root.display().to_string()));

        let err = assets.load(&LayerId::new("x_kaiju_01")).unwrap_err();
        let expected = root.join("x_kaiju_01.png").display().to_string();
        assert!(err.to_string().contains(&expected), "{err}");
    }

    #[test]
    fn test_file_sink_writes() {
        let dir = std::env::temp_dir().join(format!("trait_sketch_export_{}", std::process::id()));
        let sink = FileSink::new(&dir);
        let location = sink.deliver("traits.png", b"png").unwrap();
        assert_eq!(std::fs::read(dir.join("traits.png")).unwrap(), b"png");
        assert!(location.ends_with("traits.png"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
