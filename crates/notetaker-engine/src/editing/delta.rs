use serde::{Deserialize, Serialize};

/// A position in the document.
///
/// `column` is a byte offset into the row's text, excluding the line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A `start`/`end` pair of points.
///
/// Whether `end` is inclusive depends on the owner: edit deltas use an
/// exclusive end, phrase links an inclusive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Point,
    pub end: Point,
}

impl TextRange {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Number of rows spanned beyond the first one.
    pub fn extra_rows(&self) -> usize {
        self.end.row.saturating_sub(self.start.row)
    }
}

/// Kind of mutation carried by an [`EditDelta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Insert,
    Remove,
}

/// One document mutation, as reported by the document model.
///
/// For [`EditAction::Insert`] the range covers the inserted text in post-edit
/// coordinates. For [`EditAction::Remove`] it covers the removed text in
/// pre-edit coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDelta {
    pub range: TextRange,
    pub action: EditAction,
}

impl EditDelta {
    pub fn insert(start: Point, end: Point) -> Self {
        Self {
            range: TextRange::new(start, end),
            action: EditAction::Insert,
        }
    }

    pub fn remove(start: Point, end: Point) -> Self {
        Self {
            range: TextRange::new(start, end),
            action: EditAction::Remove,
        }
    }

    /// Signed change in the document's line count caused by this edit.
    pub fn line_delta(&self) -> isize {
        let rows = self.range.extra_rows() as isize;
        match self.action {
            EditAction::Insert => rows,
            EditAction::Remove => -rows,
        }
    }
}

/// An inclusive span of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowSpan {
    pub first: usize,
    pub last: usize,
}

impl RowSpan {
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    pub fn single(row: usize) -> Self {
        Self::new(row, row)
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.first..=self.last).contains(&row)
    }

    /// Smallest span covering both.
    pub fn union(self, other: RowSpan) -> RowSpan {
        RowSpan::new(self.first.min(other.first), self.last.max(other.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_delta_for_single_row_edit_is_zero() {
        let delta = EditDelta::insert(Point::new(3, 1), Point::new(3, 4));
        assert_eq!(delta.line_delta(), 0);
    }

    #[test]
    fn line_delta_sign_follows_action() {
        let insert = EditDelta::insert(Point::new(1, 0), Point::new(3, 2));
        let remove = EditDelta::remove(Point::new(1, 0), Point::new(3, 2));
        assert_eq!(insert.line_delta(), 2);
        assert_eq!(remove.line_delta(), -2);
    }

    #[test]
    fn row_span_union_covers_both() {
        let span = RowSpan::single(4).union(RowSpan::new(9, 7));
        assert_eq!(span, RowSpan::new(4, 9));
        assert!(span.contains(6));
        assert!(!span.contains(10));
    }

    #[test]
    fn points_order_by_row_then_column() {
        assert!(Point::new(0, 9) < Point::new(1, 0));
        assert!(Point::new(2, 3) < Point::new(2, 4));
    }
}
