//! # Electric brackets
//!
//! Rewrites single-character insertions so phrase links can be typed
//! naturally: wrapping a selection, pulling the previous word into a new
//! `[..][]` pair, stepping over auto-inserted closers, and expanding
//! abbreviations at word boundaries.
//!
//! The engine is a pure function of the request plus one piece of state, the
//! [`AutoInsertTracker`]. It never touches the document; callers apply the
//! returned [`EditResult`] themselves.

pub mod matching;
pub mod tracker;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::editing::{AbbreviationTable, EditAction, Point};
use crate::parsing::{Token, TokenKind, token_at};

pub use matching::{find_open_bracket, is_word_boundary, previous_word};
pub use tracker::AutoInsertTracker;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketOptions {
    /// Insert `[]` when `[` is typed without a selection
    pub auto_pair_open_bracket: bool,
}

/// Everything the engine looks at for one keystroke.
#[derive(Debug, Clone)]
pub struct InsertRequest<'a> {
    pub action: EditAction,
    pub cursor: Point,
    /// Text of the cursor's row
    pub line: &'a str,
    pub text: &'a str,
    /// Selected columns on the cursor's row; empty when nothing is selected
    pub selection: Range<usize>,
    pub tokens: &'a [Token],
    pub abbreviations: &'a AbbreviationTable,
}

/// Replacement for a keystroke.
///
/// `replace` is a column range of the current line. `selection` is relative
/// to the start of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub replace: Range<usize>,
    pub text: String,
    pub selection: (usize, usize),
}

impl EditResult {
    fn caret_at_end(replace: Range<usize>, text: String) -> Self {
        let caret = text.len();
        Self {
            replace,
            text,
            selection: (caret, caret),
        }
    }

    /// The line after this result is applied to `line`.
    pub fn apply_to(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() + self.text.len());
        out.push_str(&line[..self.replace.start]);
        out.push_str(&self.text);
        out.push_str(&line[self.replace.end..]);
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct BracketEngine {
    options: BracketOptions,
    tracker: AutoInsertTracker,
}

impl BracketEngine {
    pub fn new(options: BracketOptions) -> Self {
        Self {
            options,
            tracker: AutoInsertTracker::default(),
        }
    }

    pub fn options(&self) -> &BracketOptions {
        &self.options
    }

    pub fn tracker(&self) -> &AutoInsertTracker {
        &self.tracker
    }

    /// Transforms a single-character insertion, or declines with `None`.
    ///
    /// A declined keystroke is inserted verbatim by the caller.
    pub fn transform(&mut self, request: &InsertRequest<'_>) -> Option<EditResult> {
        if request.action != EditAction::Insert {
            return None;
        }
        let mut chars = request.text.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        let line = request.line;
        let column = request.cursor.column;
        if line.get(..column).is_none() || line.get(request.selection.clone()).is_none() {
            return None;
        }
        let has_selection = !request.selection.is_empty();
        let right = line[column..].chars().next();

        if is_word_boundary(ch)
            && !has_selection
            && right != Some(']')
            && let Some(result) = expand_abbreviation(request, ch)
        {
            return Some(result);
        }

        let result = match ch {
            '[' if has_selection => self.wrap_selection(request),
            '[' => self.pair_open_bracket(request),
            _ if has_selection => None,
            ']' | ' ' if right == Some(']') && self.after_completed_code(request) => {
                self.tracker.clear();
                let text = if ch == ']' { "]" } else { "] " };
                Some(EditResult::caret_at_end(column..column + 1, text.to_string()))
            }
            ']' if line[..column].ends_with("][") => relocate_into_pair(line, column),
            ']' => self.electric_close(request),
            _ => None,
        }?;

        log::trace!(
            target: "notetaker::brackets",
            "{:?} at {}:{} -> replace {:?} with {:?}",
            ch,
            request.cursor.row,
            column,
            result.replace,
            result.text
        );
        Some(result)
    }

    /// Handles a backspace at `cursor`.
    ///
    /// Deleting the `[` of an empty `[]` pair whose `]` was auto-inserted
    /// removes both brackets.
    pub fn transform_deletion(&mut self, cursor: Point, line: &str) -> Option<EditResult> {
        let column = cursor.column;
        let head = line.get(..column)?;
        if !head.ends_with('[')
            || !line[column..].starts_with(']')
            || !self.tracker.is_auto_inserted(cursor.row, column, line)
        {
            return None;
        }
        self.tracker.clear();
        Some(EditResult {
            replace: column - 1..column + 1,
            text: String::new(),
            selection: (0, 0),
        })
    }

    fn wrap_selection(&mut self, request: &InsertRequest<'_>) -> Option<EditResult> {
        let selected = &request.line[request.selection.clone()];
        let result = EditResult {
            replace: request.selection.clone(),
            text: format!("[{selected}][]"),
            selection: (selected.len() + 3, selected.len() + 3),
        };
        self.record_closer(request, &result);
        Some(result)
    }

    fn pair_open_bracket(&mut self, request: &InsertRequest<'_>) -> Option<EditResult> {
        if !self.options.auto_pair_open_bracket {
            return None;
        }
        let column = request.cursor.column;
        let result = EditResult {
            replace: column..column,
            text: "[]".to_string(),
            selection: (1, 1),
        };
        self.record_closer(request, &result);
        Some(result)
    }

    /// The caret sits at the end of a phrase link's code, right before a `]`
    /// the engine put there and that closes an opener on this row.
    fn after_completed_code(&self, request: &InsertRequest<'_>) -> bool {
        let column = request.cursor.column;
        let in_code = token_at(request.tokens, column)
            .is_some_and(|token| token.kind == TokenKind::Constant);
        in_code
            && self
                .tracker
                .is_auto_inserted(request.cursor.row, column, request.line)
            && find_open_bracket(request.line, column).is_some()
    }

    fn electric_close(&mut self, request: &InsertRequest<'_>) -> Option<EditResult> {
        let line = request.line;
        let column = request.cursor.column;

        let result = if find_open_bracket(line, column).is_some() {
            // reuse an auto-inserted closer instead of stacking another `]`
            let end = if line[column..].starts_with(']')
                && self.tracker.is_auto_inserted(request.cursor.row, column, line)
            {
                column + 1
            } else {
                column
            };
            EditResult {
                replace: column..end,
                text: "][]".to_string(),
                selection: (2, 2),
            }
        } else {
            let (start, word) = previous_word(line, column)?;
            let text = format!("[{word}][]");
            let caret = text.len() - 1;
            EditResult {
                replace: start..column,
                text,
                selection: (caret, caret),
            }
        };

        self.record_closer(request, &result);
        Some(result)
    }

    /// Marks the final `]` of `result` as auto-inserted.
    fn record_closer(&mut self, request: &InsertRequest<'_>, result: &EditResult) {
        let line = result.apply_to(request.line);
        let closer = result.replace.start + result.text.len() - 1;
        self.tracker.record(request.cursor.row, closer, &line);
    }
}

fn expand_abbreviation(request: &InsertRequest<'_>, ch: char) -> Option<EditResult> {
    let column = request.cursor.column;
    let (start, word) = previous_word(request.line, column)?;
    let expansion = request.abbreviations.get(word)?;
    log::debug!(target: "notetaker::brackets", "expanding {word:?}");
    Some(EditResult::caret_at_end(
        start..column,
        format!("{expansion}{ch}"),
    ))
}

/// `][` then `]`: pull the word before `][` into a fresh `[word][]`.
///
/// An opener matching that `]` is moved down to the word; without one a new
/// opener is inserted. The word ends up selected.
fn relocate_into_pair(line: &str, column: usize) -> Option<EditResult> {
    let anchor = column - 2;
    let (word_start, word) = previous_word(line, anchor)?;

    match find_open_bracket(line, anchor) {
        Some(open) if open < word_start => {
            let moved = &line[open + 1..word_start];
            let text = format!("{moved}[{word}][]");
            let from = moved.len() + 1;
            Some(EditResult {
                replace: open..column,
                text,
                selection: (from, from + word.len()),
            })
        }
        _ => Some(EditResult {
            replace: word_start..column,
            text: format!("[{word}][]"),
            selection: (1, 1 + word.len()),
        }),
    }
}
