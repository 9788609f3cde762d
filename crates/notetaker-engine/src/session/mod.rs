//! # Session wiring
//!
//! - **`background`**: row-cached incremental tokenizer with `TokenizerHooks`
//! - **`phrase_tracker`**: the hooks that keep the phrase index and publisher current
//! - **`note`**: `NoteSession`, the composition root a host talks to

pub mod background;
pub mod note;
pub mod phrase_tracker;

pub use background::{BackgroundTokenizer, NoHooks, TokenizerHooks};
pub use note::{NoteSession, SessionOptions};
pub use phrase_tracker::PhraseTracker;
