/*!
 * # Editing Core
 *
 * ## Document model
 * - The entire note lives in a single **`xi_rope::Rope`** buffer
 * - All edits are **Commands** (`Cmd`) compiled to xi-rope **Deltas**
 * - Each applied command reports row/column **`EditDelta`**s, which drive the
 *   incremental tokenizer and the phrase index
 *
 * ## Keystroke transforms
 * - **`brackets`**: electric brackets and abbreviation expansion
 * - **`indent`**: indentation of a freshly opened row
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` with the rope buffer and selection
 * - **`commands`**: `Cmd` enum and delta compilation
 * - **`delta`**: `Point`, `TextRange`, `EditDelta`, `RowSpan`
 * - **`patch`**: what an applied command changed
 * - **`abbreviations`**: `AbbreviationTable`
 *
 * ```rust
 * use notetaker_engine::editing::*;
 *
 * let mut doc = Document::new("- [milk][M]");
 * let patch = doc.apply(Cmd::InsertText { at: 0, text: "buy\n".to_string() });
 *
 * assert_eq!(patch.deltas[0].range.end, Point::new(1, 0));
 * assert_eq!(doc.line(1), "- [milk][M]");
 * ```
 */

pub mod abbreviations;
pub mod brackets;
pub mod commands;
pub mod delta;
pub mod document;
pub mod indent;
pub mod patch;

pub use abbreviations::AbbreviationTable;
pub use brackets::{BracketEngine, BracketOptions, EditResult, InsertRequest};
pub use commands::Cmd;
pub use delta::{EditAction, EditDelta, Point, RowSpan, TextRange};
pub use document::{Document, DocumentError};
pub use indent::next_line_indent;
pub use patch::Patch;
