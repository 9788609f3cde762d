pub mod editing;
pub mod parsing;
pub mod phrases;
pub mod session;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, EditAction, EditDelta, Point, RowSpan};
pub use phrases::{PhraseIndex, PhraseLink, PhraseListener};
pub use session::{NoteSession, SessionOptions};
