use crate::error::{EditorError, EditorResult, HistoryAction};
use crate::stroke::StrokeRef;

/// The committed strokes that make up the drawing, oldest first.
///
/// Cloning only bumps reference counts, so a clone is a cheap immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    strokes: Vec<StrokeRef>,
}

impl Session {
    pub fn new(strokes: Vec<StrokeRef>) -> Self {
        Self { strokes }
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Manages the committed strokes and undo/redo over them
#[derive(Debug, Default)]
pub struct HistoryStack {
    /// Visible strokes, oldest first
    past: Vec<StrokeRef>,
    /// Undone strokes; the last element is the most recently undone
    future: Vec<StrokeRef>,
    /// Bumped on every change to `past`
    revision: u64,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished stroke. Redo history does not survive a new edit.
    pub fn commit(&mut self, stroke: StrokeRef) {
        self.past.push(stroke);
        if !self.future.is_empty() {
            log::debug!("Dropping {} redoable strokes", self.future.len());
            self.future.clear();
        }
        self.revision += 1;
    }

    /// Undo the most recent stroke and return what is now visible
    pub fn undo(&mut self) -> EditorResult<&[StrokeRef]> {
        let stroke = self
            .past
            .pop()
            .ok_or(EditorError::EmptyHistory(HistoryAction::Undo))?;
        self.future.push(stroke);
        self.revision += 1;
        Ok(&self.past)
    }

    /// Restore the most recently undone stroke
    pub fn redo(&mut self) -> EditorResult<&[StrokeRef]> {
        let stroke = self
            .future
            .pop()
            .ok_or(EditorError::EmptyHistory(HistoryAction::Redo))?;
        self.past.push(stroke);
        self.revision += 1;
        Ok(&self.past)
    }

    /// Hard reset. Not recorded, so it cannot be undone.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.revision += 1;
    }

    pub fn current(&self) -> &[StrokeRef] {
        &self.past
    }

    /// Undone strokes, most recently undone first
    pub fn future(&self) -> impl Iterator<Item = &StrokeRef> {
        self.future.iter().rev()
    }

    pub fn session(&self) -> Session {
        Session::new(self.past.clone())
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
