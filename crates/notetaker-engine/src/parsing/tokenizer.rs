use std::sync::OnceLock;

use regex::Regex;

use super::tokens::{Token, TokenKind, push_merged};

/// Tokenizer state at the end of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineState {
    #[default]
    Start,
    /// Inside a heading row. Headings are single-row, so this never ends a row.
    Header,
    /// A list item and its non-blank continuation rows
    ListBlock,
    /// Between fence delimiters; the phrase-link rule is suspended here
    CodeBlock,
}

impl LineState {
    /// States in which `[phrase][code]` is recognised.
    pub fn allows_phrase_links(self) -> bool {
        matches!(
            self,
            LineState::Start | LineState::Header | LineState::ListBlock
        )
    }
}

/// Phrase link rule: `[` phrase `]` optional space `[` code `]`.
///
/// The phrase may contain balanced single-level `[..]` groups.
fn phrase_link_regex() -> &'static Regex {
    static PHRASE_LINK: OnceLock<Regex> = OnceLock::new();
    PHRASE_LINK.get_or_init(|| {
        Regex::new(r"(\[)((?:\[[^\]]*\]|[^\[\]])*)(\] ?\[)([^\]]*?)(\])")
            .expect("Invalid phrase link regex")
    })
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^#{1,6}").expect("Invalid heading regex"))
}

pub(crate) fn list_marker_regex() -> &'static Regex {
    static LIST_MARKER: OnceLock<Regex> = OnceLock::new();
    LIST_MARKER.get_or_init(|| {
        Regex::new(r"^(\s*)(?:([-+*])|(\d+)\.)(\s+)").expect("Invalid list marker regex")
    })
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Line-at-a-time tokenizer: a small markdown state machine plus the phrase-link rule.
///
/// ```rust
/// # use notetaker_engine::parsing::{LineState, LineTokenizer, TokenKind};
/// let (tokens, state) = LineTokenizer.tokenize("- [cat][C]", LineState::Start);
///
/// assert_eq!(state, LineState::ListBlock);
/// assert_eq!(tokens[2].kind, TokenKind::PhraseMarker { code: "C".to_string() });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTokenizer;

impl LineTokenizer {
    /// Tokenizes one row given the state the previous row ended in.
    pub fn tokenize(&self, line: &str, previous: LineState) -> (Vec<Token>, LineState) {
        let mut tokens = Vec::new();

        if previous == LineState::CodeBlock || is_fence(line) {
            push_merged(&mut tokens, Token::new(TokenKind::CodeBlock, line));
            let end = if previous == LineState::CodeBlock && is_fence(line) {
                LineState::Start
            } else {
                LineState::CodeBlock
            };
            return (tokens, end);
        }

        let (state, end, rest) = if let Some(m) = heading_regex().find(line) {
            push_merged(&mut tokens, Token::new(TokenKind::Heading, m.as_str()));
            (LineState::Header, LineState::Start, &line[m.end()..])
        } else if let Some(m) = list_marker_regex().find(line) {
            push_merged(&mut tokens, Token::new(TokenKind::ListMarker, m.as_str()));
            (LineState::ListBlock, LineState::ListBlock, &line[m.end()..])
        } else if line.trim().is_empty() {
            (LineState::Start, LineState::Start, line)
        } else if previous == LineState::ListBlock {
            (LineState::ListBlock, LineState::ListBlock, line)
        } else {
            (LineState::Start, LineState::Start, line)
        };

        if state.allows_phrase_links() {
            lex_phrase_links(rest, &mut tokens);
        } else {
            push_merged(&mut tokens, Token::text(rest));
        }

        (tokens, end)
    }
}

/// Splits `text` into plain text and phrase-link token runs.
fn lex_phrase_links(text: &str, tokens: &mut Vec<Token>) {
    let mut plain_start = 0;

    for caps in phrase_link_regex().captures_iter(text) {
        let (Some(whole), Some(phrase), Some(separator), Some(code)) =
            (caps.get(0), caps.get(2), caps.get(3), caps.get(4))
        else {
            continue;
        };
        if phrase.is_empty() || code.is_empty() {
            // `[][x]` and `[x][]` are not links; leave them as text
            continue;
        }

        push_merged(tokens, Token::text(&text[plain_start..whole.start()]));
        push_merged(tokens, Token::text("["));
        push_merged(
            tokens,
            Token::new(
                TokenKind::PhraseMarker {
                    code: code.as_str().to_string(),
                },
                phrase.as_str(),
            ),
        );
        push_merged(tokens, Token::text(separator.as_str()));
        push_merged(tokens, Token::new(TokenKind::Constant, code.as_str()));
        push_merged(tokens, Token::text("]"));
        plain_start = whole.end();
    }

    push_merged(tokens, Token::text(&text[plain_start..]));
}
