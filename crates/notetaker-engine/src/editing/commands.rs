use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;

/// Edit commands understood by [`Document::apply`]. Offsets are bytes into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Cmd {
    /// Range removed from the pre-edit buffer, if any.
    pub(crate) fn removed(&self) -> Option<Range<usize>> {
        match self {
            Cmd::InsertText { .. } => None,
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => {
                (!range.is_empty()).then(|| range.clone())
            }
        }
    }

    /// Text inserted and the pre-edit offset it lands at, if any.
    pub(crate) fn inserted(&self) -> Option<(usize, &str)> {
        match self {
            Cmd::InsertText { at, text } => (!text.is_empty()).then_some((*at, text.as_str())),
            Cmd::ReplaceRange { range, text } => {
                (!text.is_empty()).then_some((range.start, text.as_str()))
            }
            Cmd::DeleteRange { .. } => None,
        }
    }
}

/// Compile a command into a delta over the document's current buffer.
///
/// Offsets are clamped to the buffer so a stale command cannot panic xi-rope.
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    let len = doc.len();
    let clamp = |r: &Range<usize>| {
        let start = r.start.min(len);
        start..r.end.min(len).max(start)
    };

    let mut builder = Builder::new(len);
    match cmd {
        Cmd::InsertText { at, text } => {
            let at = (*at).min(len);
            builder.replace(at..at, Rope::from(text.as_str()));
        }
        Cmd::DeleteRange { range } => {
            builder.delete(clamp(range));
        }
        Cmd::ReplaceRange { range, text } => {
            builder.replace(clamp(range), Rope::from(text.as_str()));
        }
    }
    builder.build()
}

/// Where the caret lands after `cmd` has been applied.
pub(crate) fn selection_after(cmd: &Cmd) -> Range<usize> {
    let caret = match cmd {
        Cmd::InsertText { at, text } => at + text.len(),
        Cmd::DeleteRange { range } => range.start,
        Cmd::ReplaceRange { range, text } => range.start + text.len(),
    };
    caret..caret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_insertion_only() {
        let cmd = Cmd::InsertText {
            at: 3,
            text: "ab".to_string(),
        };
        assert_eq!(cmd.removed(), None);
        assert_eq!(cmd.inserted(), Some((3, "ab")));
        assert_eq!(selection_after(&cmd), 5..5);
    }

    #[test]
    fn replace_reports_both_halves() {
        let cmd = Cmd::ReplaceRange {
            range: 2..4,
            text: "xyz".to_string(),
        };
        assert_eq!(cmd.removed(), Some(2..4));
        assert_eq!(cmd.inserted(), Some((2, "xyz")));
        assert_eq!(selection_after(&cmd), 5..5);
    }

    #[test]
    fn empty_halves_are_ignored() {
        let delete_nothing = Cmd::DeleteRange { range: 4..4 };
        let insert_nothing = Cmd::InsertText {
            at: 0,
            text: String::new(),
        };
        assert_eq!(delete_nothing.removed(), None);
        assert_eq!(insert_nothing.inserted(), None);
    }

    #[test]
    fn compile_clamps_out_of_range_offsets() {
        let doc = Document::new("short");
        let delta = compile_command(&doc, &Cmd::DeleteRange { range: 3..99 });
        let rope = delta.apply(&Rope::from("short"));
        assert_eq!(rope.to_string(), "sho");
    }
}
