use crate::editing::{EditAction, EditDelta, RowSpan};

use super::PhraseIndex;

/// Brings `index` in line with one document edit.
///
/// Entries on the pre-edit rows touched by `delta` are dropped and entries
/// below the edit are moved by the number of rows inserted or removed.
/// Returns the post-edit rows whose entries were dropped; those rows must be
/// re-extracted before the index is read again.
pub fn apply_edit(index: &mut PhraseIndex, delta: &EditDelta) -> Option<RowSpan> {
    let start_row = delta.range.start.row;
    let line_delta = delta.line_delta();

    // pre-edit rows that can hold affected entries
    let edit_end_row = match delta.action {
        EditAction::Insert => start_row,
        EditAction::Remove => delta.range.end.row,
    };
    let window_end = if delta.action == EditAction::Remove && line_delta != 0 {
        edit_end_row + 1
    } else {
        edit_end_row
    };

    let (Some(first), Some(last)) = (index.first(), index.last()) else {
        return None;
    };
    if start_row > last.row() {
        log::trace!(target: "notetaker::phrases", "edit at row {start_row} is past every phrase");
        return None;
    }
    if window_end < first.row() {
        log::trace!(target: "notetaker::phrases", "edit above the first phrase, shifting by {line_delta}");
        index.shift_rows(edit_end_row, line_delta);
        return None;
    }

    let removed = index.remove_range(start_row, window_end);
    index.shift_rows(edit_end_row, line_delta);

    let post_edit_row = |row: usize| match delta.action {
        // the tail of the edited row moved down to the inserted end row
        EditAction::Insert => row,
        EditAction::Remove if row <= edit_end_row => start_row,
        EditAction::Remove => row.saturating_add_signed(line_delta),
    };
    let (Some(first_removed), Some(last_removed)) = (removed.first(), removed.last()) else {
        return None;
    };
    let mut span = RowSpan::new(
        post_edit_row(first_removed.row()),
        post_edit_row(last_removed.row()),
    );
    if delta.action == EditAction::Insert {
        span = span.union(RowSpan::single(delta.range.end.row));
    }

    log::trace!(
        target: "notetaker::phrases",
        "dropped {} phrase(s), re-extract rows {}..={}",
        removed.len(),
        span.first,
        span.last
    );
    Some(span)
}
