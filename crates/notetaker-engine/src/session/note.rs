use std::ops::Range;

use crate::editing::{
    AbbreviationTable, BracketEngine, BracketOptions, Cmd, Document, EditAction, EditResult,
    InsertRequest, Patch, Point, next_line_indent,
};
use crate::parsing::{LineState, Token};
use crate::phrases::{ExtractError, ListenerId, PhraseIndex, PhraseLink, PhraseListener};

use super::{BackgroundTokenizer, PhraseTracker};

/// Per-session settings supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub abbreviations: AbbreviationTable,
    pub brackets: BracketOptions,
}

/// One open note: the document plus everything derived from it.
///
/// Edits go through [`NoteSession::apply`] or the keystroke helpers, which
/// feed the background tokenizer. Tokenizing, phrase extraction and
/// publishing happen on [`NoteSession::flush`].
///
/// ```rust
/// use notetaker_engine::session::{NoteSession, SessionOptions};
///
/// let mut session = NoteSession::new("buy [milk][M]\n", SessionOptions::default());
/// session.flush()?;
/// assert_eq!(session.phrases()[0].to_string(), "0:4-0:12 [milk][M]");
/// # Ok::<(), notetaker_engine::phrases::ExtractError>(())
/// ```
#[derive(Debug)]
pub struct NoteSession {
    document: Document,
    tokenizer: BackgroundTokenizer,
    tracker: PhraseTracker,
    abbreviations: AbbreviationTable,
    brackets: BracketEngine,
}

impl NoteSession {
    pub fn new(text: &str, options: SessionOptions) -> Self {
        let document = Document::new(text);
        Self::with_document(document, options)
    }

    pub fn with_document(document: Document, options: SessionOptions) -> Self {
        let tokenizer = BackgroundTokenizer::new(document.line_count());
        Self {
            document,
            tokenizer,
            tracker: PhraseTracker::new(),
            abbreviations: options.abbreviations,
            brackets: BracketEngine::new(options.brackets),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn abbreviations(&self) -> &AbbreviationTable {
        &self.abbreviations
    }

    pub fn abbreviations_mut(&mut self) -> &mut AbbreviationTable {
        &mut self.abbreviations
    }

    /// Applies a raw command, bypassing keystroke transforms.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let patch = self.document.apply(cmd);
        for delta in &patch.deltas {
            self.tokenizer.on_change(delta, &mut self.tracker);
        }
        patch
    }

    /// Types `text` at the selection, letting the bracket engine rewrite it.
    pub fn type_text(&mut self, text: &str) -> Patch {
        if let Some((line_start, result)) = self.transform_keystroke(text) {
            return self.apply_result(line_start, result);
        }
        self.replace_selection(text.to_string())
    }

    /// Backspace: deletes the selection or the character before the caret.
    ///
    /// Returns `None` when there is nothing to delete.
    pub fn delete_backward(&mut self) -> Option<Patch> {
        let selection = self.document.selection();
        if !selection.is_empty() {
            return Some(self.apply(Cmd::DeleteRange { range: selection }));
        }
        if selection.start == 0 {
            return None;
        }

        let cursor = self.document.point_of_offset(selection.start);
        let line = self.document.line(cursor.row);
        let line_start = self.line_start(cursor.row);
        if let Some(result) = self.brackets.transform_deletion(cursor, &line) {
            return Some(self.apply_result(line_start, result));
        }

        // read the buffer, not `line`, so a `\r` before the caret is seen
        let head = self.document.slice_to_cow(line_start..selection.start);
        let from = match head.chars().next_back() {
            Some(ch) => selection.start - ch.len_utf8(),
            // join with the previous row, terminator included
            None => {
                let above = cursor.row.saturating_sub(1);
                self.document
                    .offset_of_point(Point::new(above, self.document.line(above).len()))
            }
        };
        Some(self.apply(Cmd::DeleteRange {
            range: from..selection.start,
        }))
    }

    /// Enter: opens a row indented for the current tokenizer state.
    pub fn insert_newline(&mut self) -> Patch {
        let caret = self.document.selection().start;
        let cursor = self.document.point_of_offset(caret);
        let line = self.document.line(cursor.row);
        let (_, state) = self.tokenizer.tokenize_row(&self.document, cursor.row);
        let indent = next_line_indent(state, &line[..cursor.column]);

        if let Some((line_start, mut result)) = self.transform_keystroke("\n") {
            result.text.push_str(&indent);
            result.selection.0 += indent.len();
            result.selection.1 += indent.len();
            return self.apply_result(line_start, result);
        }
        self.replace_selection(format!("\n{indent}"))
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.document.set_selection(range);
    }

    /// Runs the pending tokenizer work, re-extracting and publishing phrases.
    ///
    /// On error the previous snapshot stays published and the failed rows
    /// stay pending.
    pub fn flush(&mut self) -> Result<(), ExtractError> {
        self.tokenizer.flush(&self.document, &mut self.tracker)?;
        Ok(())
    }

    /// Links as of the last successful flush.
    pub fn phrases(&self) -> &[PhraseLink] {
        self.tracker.published()
    }

    /// The live index; between an edit and the next flush it may lack the
    /// edited rows.
    pub fn index(&self) -> &PhraseIndex {
        self.tracker.index()
    }

    pub fn subscribe(&mut self, listener: impl PhraseListener + 'static) -> ListenerId {
        self.tracker.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.tracker.unsubscribe(id)
    }

    pub fn tokens(&self, row: usize) -> Option<&[Token]> {
        self.tokenizer.tokens(row)
    }

    pub fn state(&self, row: usize) -> Option<LineState> {
        self.tokenizer.state(row)
    }

    /// Runs the bracket engine for `text` typed at the current selection.
    ///
    /// Selections spanning rows are never transformed.
    fn transform_keystroke(&mut self, text: &str) -> Option<(usize, EditResult)> {
        let selection = self.document.selection();
        let start = self.document.point_of_offset(selection.start);
        let cursor = self.document.point_of_offset(selection.end);
        if start.row != cursor.row {
            return None;
        }

        let line = self.document.line(cursor.row);
        let (tokens, _) = self.tokenizer.tokenize_row(&self.document, cursor.row);
        let request = InsertRequest {
            action: EditAction::Insert,
            cursor,
            line: &line,
            text,
            selection: start.column..cursor.column,
            tokens: &tokens,
            abbreviations: &self.abbreviations,
        };
        let result = self.brackets.transform(&request)?;
        Some((self.line_start(cursor.row), result))
    }

    fn apply_result(&mut self, line_start: usize, result: EditResult) -> Patch {
        let base = line_start + result.replace.start;
        let range = base..line_start + result.replace.end;
        let cmd = if result.text.is_empty() {
            Cmd::DeleteRange { range }
        } else {
            Cmd::ReplaceRange {
                range,
                text: result.text,
            }
        };

        let mut patch = self.apply(cmd);
        let selection = base + result.selection.0..base + result.selection.1;
        self.document.set_selection(selection.clone());
        patch.new_selection = selection;
        patch
    }

    fn replace_selection(&mut self, text: String) -> Patch {
        let selection = self.document.selection();
        let cmd = if selection.is_empty() {
            Cmd::InsertText {
                at: selection.start,
                text,
            }
        } else {
            Cmd::ReplaceRange {
                range: selection,
                text,
            }
        };
        self.apply(cmd)
    }

    fn line_start(&self, row: usize) -> usize {
        self.document.offset_of_point(Point::new(row, 0))
    }
}
