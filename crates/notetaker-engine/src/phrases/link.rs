use std::fmt;

use serde::Serialize;

use crate::editing::{Point, TextRange};

/// One recognised `[phrase][code]` construct.
///
/// The range runs from the opening `[` of the phrase to the closing `]` of the
/// code, both inclusive, on a single row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhraseLink {
    pub range: TextRange,
    pub phrase: String,
    pub code: String,
}

impl PhraseLink {
    pub fn new(
        row: usize,
        start_column: usize,
        end_column: usize,
        phrase: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            range: TextRange::new(Point::new(row, start_column), Point::new(row, end_column)),
            phrase: phrase.into(),
            code: code.into(),
        }
    }

    pub fn start(&self) -> Point {
        self.range.start
    }

    pub fn end(&self) -> Point {
        self.range.end
    }

    pub fn row(&self) -> usize {
        self.range.start.row
    }

    /// Whether `point` falls on one of the link's characters.
    pub fn contains(&self, point: Point) -> bool {
        self.range.start <= point && point <= self.range.end
    }

    pub fn overlaps(&self, other: &PhraseLink) -> bool {
        self.range.start <= other.range.end && other.range.start <= self.range.end
    }

    /// Moves the link by `delta` rows.
    pub(crate) fn shift_rows(&mut self, delta: isize) {
        let shift = |row: usize| row.saturating_add_signed(delta);
        self.range.start.row = shift(self.range.start.row);
        self.range.end.row = shift(self.range.end.row);
    }
}

impl fmt::Display for PhraseLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{} [{}][{}]",
            self.range.start.row,
            self.range.start.column,
            self.range.end.row,
            self.range.end.column,
            self.phrase,
            self.code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_of_both_brackets() {
        let link = PhraseLink::new(2, 4, 13, "hello", "H1");
        assert!(link.contains(Point::new(2, 4)));
        assert!(link.contains(Point::new(2, 13)));
        assert!(!link.contains(Point::new(2, 14)));
        assert!(!link.contains(Point::new(1, 5)));
    }

    #[test]
    fn overlap_requires_shared_columns_on_the_row() {
        let a = PhraseLink::new(0, 0, 6, "a", "X");
        let b = PhraseLink::new(0, 7, 12, "b", "Y");
        let c = PhraseLink::new(0, 6, 9, "c", "Z");
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn display_lists_range_and_construct() {
        let link = PhraseLink::new(1, 0, 12, "hello", "H1");
        assert_eq!(link.to_string(), "1:0-1:12 [hello][H1]");
    }
}
