use std::borrow::Cow;
use std::ops::Range;

use xi_rope::Rope;

use crate::editing::commands::{compile_command, selection_after};
use crate::editing::{Cmd, EditDelta, Patch, Point};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// The base text model the phrase index is kept in sync with.
///
/// ## Single source of truth
/// - The whole document lives in one `xi_rope::Rope`
/// - Saving returns the rope bytes verbatim
///
/// ## Command-based editing
/// - Every mutation is a [`Cmd`] compiled to an xi-rope `Delta`
/// - [`Document::apply`] reports each mutation as row/column [`EditDelta`]s, removal
///   before insertion, which is what the incremental tokenizer consumes
///
/// ```rust
/// # use notetaker_engine::editing::{Cmd, Document, EditAction};
/// let mut doc = Document::new("[cat][C]\n");
/// let patch = doc.apply(Cmd::InsertText { at: 0, text: "a ".to_string() });
///
/// assert_eq!(doc.line(0), "a [cat][C]");
/// assert_eq!(patch.deltas[0].action, EditAction::Insert);
/// ```
#[derive(Clone)]
pub struct Document {
    /// xi-rope buffer containing the entire document as UTF-8
    pub(crate) buffer: Rope,
    /// Current selection/cursor position as byte offsets in buffer
    pub(crate) selection: Range<usize>,
    /// Version counter incremented on each edit
    pub(crate) version: u64,
}

impl Document {
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len, // Start with cursor at end
            version: 0,
        }
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply a command and report what changed.
    ///
    /// Row/column deltas for the removed half are computed against the old
    /// buffer, so they must be built before the xi-rope delta is applied.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = compile_command(self, &cmd);

        let mut deltas = Vec::new();
        if let Some(removed) = cmd.removed() {
            let start = self.point_of_offset(removed.start);
            let end = self.point_of_offset(removed.end);
            deltas.push(EditDelta::remove(start, end));
        }

        // Track changed ranges for the patch
        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                xi_rope::delta::DeltaElement::Copy(_from, to) => {
                    cursor = *to;
                }
                xi_rope::delta::DeltaElement::Insert(inserted) => {
                    let start = cursor;
                    let end = cursor + inserted.len();
                    changed.push(start..end);
                    cursor = end;
                }
            }
        }

        self.buffer = delta.apply(&self.buffer);

        if let Some((at, text)) = cmd.inserted() {
            let at = at.min(self.buffer.len());
            let start = self.point_of_offset(at);
            deltas.push(EditDelta::insert(start, advance_point(start, text)));
        }

        let new_selection = selection_after(&cmd);
        self.selection = self.clamp_range(new_selection.clone());
        self.version += 1;

        Patch {
            changed,
            deltas,
            new_selection,
            version: self.version,
        }
    }

    /// Get the current selection range
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection range, clamped to the buffer
    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = self.clamp_range(selection);
    }

    /// Text covered by the current selection
    pub fn selected_text(&self) -> Cow<'_, str> {
        self.slice_to_cow(self.selection.clone())
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Number of rows; an empty document and a trailing newline both count a final empty row.
    pub fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    /// Text of `row` without its line terminator. Rows past the end are empty.
    pub fn line(&self, row: usize) -> String {
        if row >= self.line_count() {
            return String::new();
        }
        let start = self.buffer.offset_of_line(row);
        let end = self.buffer.offset_of_line(row + 1);
        let raw = self.buffer.slice_to_cow(start..end);
        raw.trim_end_matches(['\n', '\r']).to_string()
    }

    /// Row/column of a byte offset.
    ///
    /// An offset inside a `\r\n` terminator maps to the end of the row's text.
    pub fn point_of_offset(&self, offset: usize) -> Point {
        let offset = offset.min(self.buffer.len());
        let row = self.buffer.line_of_offset(offset);
        let column = offset - self.buffer.offset_of_line(row);
        Point::new(row, column.min(self.line(row).len()))
    }

    /// Byte offset of a row/column, clamped to the row's text
    pub fn offset_of_point(&self, point: Point) -> usize {
        if point.row >= self.line_count() {
            return self.buffer.len();
        }
        let start = self.buffer.offset_of_line(point.row);
        start + point.column.min(self.line(point.row).len())
    }

    /// Slice the buffer to a cow string
    pub(crate) fn slice_to_cow(&self, range: Range<usize>) -> Cow<'_, str> {
        // Clamp range to document bounds to prevent xi-rope panic
        self.buffer.slice_to_cow(self.clamp_range(range))
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        start..end
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.buffer.to_string() == other.buffer.to_string()
            && self.selection == other.selection
            && self.version == other.version
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.buffer.len())
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish()
    }
}

/// Position reached after writing `text` starting at `start`
fn advance_point(start: Point, text: &str) -> Point {
    match text.rfind('\n') {
        Some(last_newline) => Point::new(
            start.row + text.matches('\n').count(),
            text.len() - last_newline - 1,
        ),
        None => Point::new(start.row, start.column + text.len()),
    }
}
