//! # Phrase links
//!
//! Everything that knows about `[phrase][code]` constructs once the tokenizer
//! has found them:
//!
//! - **`link`**: the `PhraseLink` value
//! - **`extract`**: builds links from a row's tokens
//! - **`index`**: the ordered, non-overlapping registry
//! - **`sync`**: invalidates and re-bases the registry on each edit
//! - **`publish`**: pushes the registry to listener surfaces

pub mod extract;
pub mod index;
pub mod link;
pub mod publish;
pub mod sync;

pub use extract::{ExtractError, extract_row};
pub use index::PhraseIndex;
pub use link::PhraseLink;
pub use publish::{ByCode, ListenerId, PhraseListener, Publisher};
pub use sync::apply_edit;
