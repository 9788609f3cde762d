use std::convert::Infallible;
use std::iter;

use crate::editing::{Document, EditAction, EditDelta, RowSpan};
use crate::parsing::{LineState, LineTokenizer, Token};

/// Extension points of [`BackgroundTokenizer`].
///
/// All methods default to doing nothing.
pub trait TokenizerHooks {
    type Error;

    /// Called once per edit after the row caches were spliced. A returned
    /// span is re-tokenized along with the edited rows.
    fn on_edit_applied(&mut self, delta: &EditDelta) -> Option<RowSpan> {
        let _ = delta;
        None
    }

    /// Called for every re-tokenized row, in row order. An error aborts the
    /// flush and leaves the remaining rows dirty.
    fn on_row_retokenized(&mut self, row: usize, tokens: &[Token]) -> Result<(), Self::Error> {
        let _ = (row, tokens);
        Ok(())
    }

    /// Called once after a flush re-tokenized `span` without error.
    fn on_update_complete(&mut self, span: RowSpan) {
        let _ = span;
    }
}

/// Hooks that observe nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl TokenizerHooks for NoHooks {
    type Error = Infallible;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowCache {
    tokens: Vec<Token>,
    /// State the row was tokenized from
    previous: LineState,
    state: LineState,
}

/// Row-cached tokenizer that defers work until [`BackgroundTokenizer::flush`].
///
/// Edits only splice the caches and widen the pending dirty span. A later
/// edit never queues a second pass: its rows are unioned into the pending
/// span, which is then tokenized once.
#[derive(Debug, Clone, Default)]
pub struct BackgroundTokenizer {
    tokenizer: LineTokenizer,
    rows: Vec<Option<RowCache>>,
    dirty: Option<RowSpan>,
}

impl BackgroundTokenizer {
    /// A tokenizer for a document of `line_count` rows, all of them dirty.
    pub fn new(line_count: usize) -> Self {
        let line_count = line_count.max(1);
        Self {
            tokenizer: LineTokenizer,
            rows: vec![None; line_count],
            dirty: Some(RowSpan::new(0, line_count - 1)),
        }
    }

    pub fn dirty(&self) -> Option<RowSpan> {
        self.dirty
    }

    pub fn tokens(&self, row: usize) -> Option<&[Token]> {
        self.rows
            .get(row)?
            .as_ref()
            .map(|cache| cache.tokens.as_slice())
    }

    pub fn state(&self, row: usize) -> Option<LineState> {
        self.rows.get(row)?.as_ref().map(|cache| cache.state)
    }

    /// Records one document edit and lets `hooks` react to it.
    pub fn on_change<H: TokenizerHooks>(&mut self, delta: &EditDelta, hooks: &mut H) {
        let start = delta.range.start.row;
        let extra = delta.range.extra_rows();

        let edited = match delta.action {
            EditAction::Insert => {
                let at = (start + 1).min(self.rows.len());
                self.rows
                    .splice(at..at, iter::repeat_n(None, extra));
                RowSpan::new(start, start + extra)
            }
            EditAction::Remove => {
                let from = (start + 1).min(self.rows.len());
                let to = (delta.range.end.row + 1).min(self.rows.len());
                self.rows.drain(from..to);
                RowSpan::single(start)
            }
        };

        let pending = self.dirty.map(|span| {
            RowSpan::new(rebase_row(span.first, delta), rebase_row(span.last, delta))
        });
        let mut span = pending.map_or(edited, |pending| pending.union(edited));
        if let Some(extra) = hooks.on_edit_applied(delta) {
            span = span.union(extra);
        }
        self.dirty = Some(span);
    }

    /// Re-tokenizes the pending rows of `document`.
    ///
    /// Tokenizing carries on past the dirty span while the next row was
    /// cached from a different start state. Returns the re-tokenized span, or `None`
    /// when nothing was pending.
    pub fn flush<H: TokenizerHooks>(
        &mut self,
        document: &Document,
        hooks: &mut H,
    ) -> Result<Option<RowSpan>, H::Error> {
        let Some(span) = self.dirty else {
            return Ok(None);
        };

        let line_count = document.line_count();
        self.rows.resize(line_count, None);

        let first = span.first.min(line_count - 1);
        let last = span.last.min(line_count - 1);
        let mut row = first;
        loop {
            let previous = match row {
                0 => LineState::Start,
                _ => self.state(row - 1).unwrap_or_default(),
            };
            let (tokens, state) = self.tokenizer.tokenize(&document.line(row), previous);

            if let Err(err) = hooks.on_row_retokenized(row, &tokens) {
                self.dirty = Some(RowSpan::new(row, last));
                return Err(err);
            }

            self.rows[row] = Some(RowCache {
                tokens,
                previous,
                state,
            });

            if row + 1 >= line_count {
                break;
            }
            let next_is_current = self.rows[row + 1]
                .as_ref()
                .is_some_and(|next| next.previous == state);
            if row >= last && next_is_current {
                break;
            }
            row += 1;
        }

        let done = RowSpan::new(first, row);
        log::debug!(
            target: "notetaker::tokenizer",
            "re-tokenized rows {}..={}",
            done.first,
            done.last
        );
        self.dirty = None;
        hooks.on_update_complete(done);
        Ok(Some(done))
    }

    /// Tokens and end state of `row` as the current text reads, without
    /// touching the caches.
    ///
    /// Starts from the nearest clean cached row above `row`.
    pub fn tokenize_row(&self, document: &Document, row: usize) -> (Vec<Token>, LineState) {
        let mut from = row;
        let mut state = LineState::Start;
        while from > 0 {
            if let Some(clean) = self.clean_state(from - 1) {
                state = clean;
                break;
            }
            from -= 1;
        }

        let mut tokens = Vec::new();
        for r in from..=row {
            (tokens, state) = self.tokenizer.tokenize(&document.line(r), state);
        }
        (tokens, state)
    }

    fn clean_state(&self, row: usize) -> Option<LineState> {
        if self.dirty.is_some_and(|span| span.contains(row)) {
            return None;
        }
        self.state(row)
    }
}

/// Where a pre-edit row lands after `delta`.
fn rebase_row(row: usize, delta: &EditDelta) -> usize {
    let start = delta.range.start.row;
    let extra = delta.range.extra_rows();
    match delta.action {
        EditAction::Insert if row > start => row + extra,
        EditAction::Remove if row > delta.range.end.row => row - extra,
        EditAction::Remove if row > start => start,
        _ => row,
    }
}
