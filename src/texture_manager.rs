use std::collections::HashMap;
use egui::{ColorImage, Context, TextureHandle, TextureOptions};

use crate::export::{AssetDirectory, LayerImages};
use crate::layers::LayerId;
use crate::raster;

/// Caches GPU textures for layer images and the rasterized drawing
pub struct TextureManager {
    assets: AssetDirectory,
    /// `None` records a load failure so it is reported only once
    layers: HashMap<LayerId, Option<TextureHandle>>,
    /// Drawing layer texture and the history revision it was built from
    drawing: Option<(u64, TextureHandle)>,
}

impl TextureManager {
    pub fn new(assets: AssetDirectory) -> Self {
        Self {
            assets,
            layers: HashMap::new(),
            drawing: None,
        }
    }

    /// Texture for a layer image, loaded on first use
    pub fn layer(&mut self, ctx: &Context, id: &LayerId) -> Option<&TextureHandle> {
        if !self.layers.contains_key(id) {
            let texture = match self.assets.load(id) {
                Ok(image) => {
                    log::debug!("Loaded layer image {} ({}x{})", id, image.width(), image.height());
                    let name = format!("layer_{}", id);
                    Some(ctx.load_texture(name, raster::to_color_image(&image), TextureOptions::LINEAR))
                }
                Err(err) => {
                    log::warn!("{}", err);
                    None
                }
            };
            self.layers.insert(id.clone(), texture);
        }
        self.layers.get(id).and_then(Option::as_ref)
    }

    /// Texture of the drawing layer, regenerated only when `revision` changes
    pub fn drawing<F>(&mut self, ctx: &Context, revision: u64, generator: F) -> &TextureHandle
    where
        F: FnOnce() -> ColorImage,
    {
        let handle = match self.drawing.take() {
            Some((cached, handle)) if cached == revision => handle,
            Some((_, mut handle)) => {
                handle.set(generator(), TextureOptions::LINEAR);
                handle
            }
            None => ctx.load_texture("drawing", generator(), TextureOptions::LINEAR),
        };
        &self.drawing.insert((revision, handle)).1
    }
}
