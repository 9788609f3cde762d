//! # Tokenizer adapter
//!
//! Row tokenization for the notetaker document format: a minimal markdown
//! state machine (headings, list blocks, fenced code) with the phrase-link
//! rule layered on top.
//!
//! - **`tokens`**: `Token`, `TokenKind` and caret lookup (`token_at`)
//! - **`tokenizer`**: `LineTokenizer` and the per-row `LineState`

pub mod tokenizer;
pub mod tokens;

pub use tokenizer::{LineState, LineTokenizer};
pub use tokens::{Token, TokenKind, token_at};
