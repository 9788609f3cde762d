/// Remembers the last closing bracket the engine inserted on its own.
///
/// The bracket is identified by its row and the text from it to the end of
/// the row, so typing before it keeps the match while any edit after it
/// forgets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoInsertTracker {
    marker: Option<(usize, String)>,
}

impl AutoInsertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the `]` at `column` of `line` was auto-inserted.
    pub fn record(&mut self, row: usize, column: usize, line: &str) {
        self.marker = line.get(column..).map(|tail| (row, tail.to_string()));
    }

    pub fn is_auto_inserted(&self, row: usize, column: usize, line: &str) -> bool {
        match (&self.marker, line.get(column..)) {
            (Some((marked_row, tail)), Some(rest)) => {
                *marked_row == row && rest.starts_with(']') && rest == tail
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.marker = None;
    }

    pub fn is_empty(&self) -> bool {
        self.marker.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_typing_before_the_bracket() {
        let mut tracker = AutoInsertTracker::new();
        tracker.record(3, 8, "[hello][]");

        assert!(tracker.is_auto_inserted(3, 8, "[hello][]"));
        assert!(tracker.is_auto_inserted(3, 10, "[hello][H1]"));
    }

    #[test]
    fn other_rows_and_changed_tails_do_not_match() {
        let mut tracker = AutoInsertTracker::new();
        tracker.record(0, 8, "[hello][]");

        assert!(!tracker.is_auto_inserted(1, 8, "[hello][]"));
        assert!(!tracker.is_auto_inserted(0, 8, "[hello][] x"));
        assert!(!tracker.is_auto_inserted(0, 7, "[hello][]"));
    }

    #[test]
    fn clear_forgets_the_marker() {
        let mut tracker = AutoInsertTracker::new();
        tracker.record(0, 1, "[]");
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(!tracker.is_auto_inserted(0, 1, "[]"));
    }
}
