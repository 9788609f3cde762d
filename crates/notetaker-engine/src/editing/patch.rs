use crate::editing::EditDelta;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub changed: Vec<std::ops::Range<usize>>,
    /// Row/column deltas in the order the document emitted them (removal first).
    pub deltas: Vec<EditDelta>,
    pub new_selection: std::ops::Range<usize>,
    pub version: u64,
}
