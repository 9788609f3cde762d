use std::borrow::Cow;

/// Kind of a row token.
///
/// A phrase link `[phrase][code]` always lexes as the run
/// `… [` `PhraseMarker` `][` `Constant` `] …`, where the surrounding
/// brackets merge into neighbouring [`TokenKind::Text`] tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    /// Leading `#` run of a heading line
    Heading,
    /// Bullet or `N.` marker of a list item, with its trailing whitespace
    ListMarker,
    /// A row inside (or delimiting) a fenced code block
    CodeBlock,
    /// The phrase half of a phrase link, tagged with the link's code
    PhraseMarker { code: String },
    /// The code half of a phrase link
    Constant,
}

impl TokenKind {
    /// Highlighter-facing type tag; phrase markers are tagged `nt_<code>`.
    pub fn tag(&self) -> Cow<'static, str> {
        match self {
            TokenKind::Text => Cow::Borrowed("text"),
            TokenKind::Heading => Cow::Borrowed("markup.heading"),
            TokenKind::ListMarker => Cow::Borrowed("markup.list"),
            TokenKind::CodeBlock => Cow::Borrowed("support.code"),
            TokenKind::PhraseMarker { code } => Cow::Owned(format!("nt_{code}")),
            TokenKind::Constant => Cow::Borrowed("constant"),
        }
    }

    pub fn is_phrase_marker(&self) -> bool {
        matches!(self, TokenKind::PhraseMarker { .. })
    }

    /// Plain kinds may be merged with an adjacent token of the same kind.
    pub(crate) fn is_mergeable(&self) -> bool {
        matches!(
            self,
            TokenKind::Text | TokenKind::Heading | TokenKind::CodeBlock
        )
    }
}

/// A token of one row. Concatenating a row's token values reproduces the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, value)
    }
}

/// The token a caret at `column` sits after.
///
/// A token spanning `(start, end]` owns the column, so the caret at the end of
/// a token belongs to that token; column 0 maps to the first token.
pub fn token_at(tokens: &[Token], column: usize) -> Option<&Token> {
    let mut end = 0;
    for token in tokens {
        end += token.value.len();
        if column <= end {
            return Some(token);
        }
    }
    None
}

/// Appends `token`, merging it into the previous token when both are the same plain kind.
pub(crate) fn push_merged(tokens: &mut Vec<Token>, token: Token) {
    if token.value.is_empty() {
        return;
    }
    if let Some(last) = tokens.last_mut()
        && last.kind == token.kind
        && token.kind.is_mergeable()
    {
        last.value.push_str(&token.value);
        return;
    }
    tokens.push(token);
}
