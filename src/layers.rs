use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::Fill;
use crate::error::{EditorError, EditorResult};

/// The two kinds of base image the silhouette is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Hair,
    Body,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hair => write!(f, "hair"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Identifier of a selectable base image, e.g. `x_kaiju_01`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Image resource for this layer inside `asset_dir`
    pub fn asset_file(&self, asset_dir: &Path) -> PathBuf {
        asset_dir.join(format!("{}.png", self.0))
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const BUILTIN_BODY: &[&str] = &[
    "x_alien_01",
    "y_alien_01",
    "x_kaiju_01",
    "y_kaiju_01",
    "x_kong_01",
    "y_kong_01",
    "x_kraken_01",
    "y_kraken_01",
    "x_shark_01",
    "y_shark_01",
    "x_human_01",
    "x_human_02",
    "x_human_03",
    "x_human_04",
    "x_human_05",
    "x_human_06",
    "y_human_01",
    "y_human_02",
    "y_human_03",
    "y_human_04",
    "y_human_05",
    "y_human_06",
];

const BUILTIN_HAIR: &[&str] = &[
    "x_alien_hair_01",
    "y_alien_hair_01",
    "x_kaiju_hair_01",
    "y_kaiju_hair_01",
    "x_kong_hair_01",
    "y_kong_hair_01",
    "x_kraken_hair_01",
    "y_kraken_hair_01",
    "x_shark_hair_01",
    "y_shark_hair_01",
    "x_human_hair_01",
    "y_human_hair_01",
];

/// Ordered set of selectable identifiers per layer kind.
///
/// Read-only once built; the compositor only checks membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCatalog {
    hair: Vec<LayerId>,
    body: Vec<LayerId>,
}

impl LayerCatalog {
    pub fn new(hair: Vec<LayerId>, body: Vec<LayerId>) -> Self {
        Self { hair, body }
    }

    /// The catalog shipped with the editor
    pub fn builtin() -> Self {
        let ids = |names: &[&str]| names.iter().map(|name| LayerId::new(*name)).collect();
        Self {
            hair: ids(BUILTIN_HAIR),
            body: ids(BUILTIN_BODY),
        }
    }

    /// Parse a manifest of the form `{"hair": [...], "body": [...]}`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn ids(&self, kind: LayerKind) -> &[LayerId] {
        match kind {
            LayerKind::Hair => &self.hair,
            LayerKind::Body => &self.body,
        }
    }

    pub fn lookup(&self, kind: LayerKind, id: &str) -> Option<&LayerId> {
        self.ids(kind).iter().find(|candidate| candidate.as_str() == id)
    }
}

/// The currently chosen hair and body layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSelection {
    pub hair: LayerId,
    pub body: LayerId,
}

impl LayerSelection {
    pub fn get(&self, kind: LayerKind) -> &LayerId {
        match kind {
            LayerKind::Hair => &self.hair,
            LayerKind::Body => &self.body,
        }
    }

    /// Returns a new selection with `kind` replaced
    #[must_use]
    pub fn with_layer(&self, kind: LayerKind, id: LayerId) -> Self {
        match kind {
            LayerKind::Hair => Self { hair: id, body: self.body.clone() },
            LayerKind::Body => Self { hair: self.hair.clone(), body: id },
        }
    }
}

/// One entry of the background render stack
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundLayer {
    Solid(Fill),
    Image { kind: LayerKind, id: LayerId },
}

/// Decides how the base images stack beneath the drawing
#[derive(Debug, Clone)]
pub struct LayerCompositor {
    catalog: Arc<LayerCatalog>,
    selection: LayerSelection,
}

impl LayerCompositor {
    /// Both initial identifiers must exist in the catalog
    pub fn new(catalog: Arc<LayerCatalog>, hair: &str, body: &str) -> EditorResult<Self> {
        let selection = LayerSelection {
            hair: Self::validate(&catalog, LayerKind::Hair, hair)?,
            body: Self::validate(&catalog, LayerKind::Body, body)?,
        };
        Ok(Self { catalog, selection })
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &LayerSelection {
        &self.selection
    }

    /// Select a layer. Unknown identifiers leave the selection unchanged.
    pub fn set_layer(&mut self, kind: LayerKind, id: &str) -> EditorResult<()> {
        let id = Self::validate(&self.catalog, kind, id)?;
        self.selection = self.selection.with_layer(kind, id);
        log::info!("Selected {} layer {}", kind, self.selection.get(kind));
        Ok(())
    }

    /// Render stack, bottom to top: background color, body, hair.
    ///
    /// The session strokes go on top of this and are added by the caller.
    pub fn background(&self, fill: Fill) -> Vec<BackgroundLayer> {
        let image = |kind| BackgroundLayer::Image {
            kind,
            id: self.selection.get(kind).clone(),
        };
        vec![
            BackgroundLayer::Solid(fill),
            image(LayerKind::Body),
            image(LayerKind::Hair),
        ]
    }

    fn validate(catalog: &LayerCatalog, kind: LayerKind, id: &str) -> EditorResult<LayerId> {
        catalog
            .lookup(kind, id)
            .cloned()
            .ok_or_else(|| EditorError::InvalidLayer {
                kind,
                id: id.to_owned(),
            })
    }
}
