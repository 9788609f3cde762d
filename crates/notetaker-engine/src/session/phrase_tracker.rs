use crate::editing::{EditDelta, RowSpan};
use crate::parsing::Token;
use crate::phrases::{
    ExtractError, ListenerId, PhraseIndex, PhraseLink, PhraseListener, Publisher, apply_edit,
    extract_row,
};

use super::TokenizerHooks;

/// Keeps a [`PhraseIndex`] current by riding on the background tokenizer.
///
/// Edits invalidate through the synchronizer, every re-tokenized row is
/// re-extracted, and a finished cycle is published.
#[derive(Debug, Default)]
pub struct PhraseTracker {
    index: PhraseIndex,
    publisher: Publisher,
}

impl PhraseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> &PhraseIndex {
        &self.index
    }

    /// The links as of the last completed update cycle.
    pub fn published(&self) -> &[PhraseLink] {
        self.publisher.last_published()
    }

    pub fn subscribe(&mut self, listener: impl PhraseListener + 'static) -> ListenerId {
        self.publisher.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.publisher.unsubscribe(id)
    }
}

impl TokenizerHooks for PhraseTracker {
    type Error = ExtractError;

    fn on_edit_applied(&mut self, delta: &EditDelta) -> Option<RowSpan> {
        apply_edit(&mut self.index, delta)
    }

    fn on_row_retokenized(&mut self, row: usize, tokens: &[Token]) -> Result<(), ExtractError> {
        self.index.remove_range(row, row);
        let links = extract_row(row, tokens).inspect_err(|err| {
            log::error!(target: "notetaker::phrases", "extraction failed: {err}");
        })?;
        for link in links {
            self.index.add(link);
        }
        Ok(())
    }

    fn on_update_complete(&mut self, _span: RowSpan) {
        self.publisher.publish(self.index.entries());
    }
}
