use std::fmt;
use thiserror::Error;

use crate::export::ExportError;
use crate::layers::LayerKind;

/// Which history operation found nothing to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => write!(f, "nothing to undo"),
            Self::Redo => write!(f, "nothing to redo"),
        }
    }
}

/// Errors that can occur while editing a session.
///
/// None of these are fatal: the editor recovers locally and stays usable.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Layer identifier is not part of the catalog for this kind
    #[error("unknown {kind} layer: {id}")]
    InvalidLayer { kind: LayerKind, id: String },

    /// Undo or redo with an empty stack
    #[error("{0}")]
    EmptyHistory(HistoryAction),

    /// Color input that is neither a hex color nor "transparent"
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Encoding or delivering the exported image failed
    #[error("export failed: {0}")]
    ExportFailure(#[from] ExportError),
}

pub type EditorResult<T> = Result<T, EditorError>;
