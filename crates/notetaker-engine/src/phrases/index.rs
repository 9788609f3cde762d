use std::iter;

use crate::editing::Point;

use super::PhraseLink;

/// Ordered registry of every phrase link in a document.
///
/// Entries are kept sorted by start point and never overlap. Both properties
/// are maintained by [`PhraseIndex::add`]; every other mutation only removes
/// entries or moves whole rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseIndex {
    entries: Vec<PhraseLink>,
}

impl PhraseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binary search for the slot of an entry starting at `point`.
    ///
    /// `Ok(i)` when entry `i` starts exactly at `point`, otherwise `Err(i)`
    /// with the slot where such an entry would be inserted. The search
    /// starts at slot `hint`, which must not lie past the answer.
    pub fn point_index(&self, point: Point, hint: usize) -> Result<usize, usize> {
        let hint = hint.min(self.entries.len());
        self.entries[hint..]
            .binary_search_by(|entry| entry.start().cmp(&point))
            .map(|i| i + hint)
            .map_err(|i| i + hint)
    }

    /// Inserts `entry` in order.
    ///
    /// An entry already starting at the same point is replaced, and any entry
    /// overlapping the new one is dropped.
    pub fn add(&mut self, entry: PhraseLink) {
        if self
            .entries
            .last()
            .is_none_or(|last| last.end() < entry.start())
        {
            self.entries.push(entry);
            return;
        }

        let slot = self.point_index(entry.start(), 0).unwrap_or_else(|i| i);
        let mut first = slot;
        while first > 0 && self.entries[first - 1].overlaps(&entry) {
            first -= 1;
        }
        let mut last = slot;
        while last < self.entries.len() && self.entries[last].overlaps(&entry) {
            last += 1;
        }
        self.entries.splice(first..last, iter::once(entry));
    }

    /// Removes every entry whose start row lies in `start_row..=end_row`.
    pub fn remove_range(&mut self, start_row: usize, end_row: usize) -> Vec<PhraseLink> {
        let (first, last) = self.row_window(start_row, end_row);
        self.entries.drain(first..last).collect()
    }

    /// Adds `delta` to the rows of every entry starting below `after_row`.
    pub fn shift_rows(&mut self, after_row: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let first = self
            .point_index(Point::new(after_row.saturating_add(1), 0), 0)
            .unwrap_or_else(|i| i);
        for entry in &mut self.entries[first..] {
            entry.shift_rows(delta);
        }
    }

    pub fn entries(&self) -> &[PhraseLink] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&PhraseLink> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&PhraseLink> {
        self.entries.last()
    }

    /// Entries on `row`, in column order.
    pub fn row(&self, row: usize) -> &[PhraseLink] {
        let (first, last) = self.row_window(row, row);
        &self.entries[first..last]
    }

    /// The entry covering `point`, if any.
    pub fn entry_at(&self, point: Point) -> Option<&PhraseLink> {
        match self.point_index(point, 0) {
            Ok(i) => self.entries.get(i),
            Err(0) => None,
            Err(i) => self.entries.get(i - 1).filter(|e| e.contains(point)),
        }
    }

    pub fn by_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a PhraseLink> + 'a {
        self.entries.iter().filter(move |e| e.code == code)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn row_window(&self, start_row: usize, end_row: usize) -> (usize, usize) {
        let first = self
            .point_index(Point::new(start_row, 0), 0)
            .unwrap_or_else(|i| i);
        let last = self
            .point_index(Point::new(end_row.saturating_add(1), 0), first)
            .unwrap_or_else(|i| i);
        (first, last)
    }
}
