use crate::parsing::Token;

use super::PhraseLink;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A phrase marker token without its separator and code tokens behind it.
    #[error("phrase token set not long enough at row {row}, column {column}")]
    MalformedPhraseTokens { row: usize, column: usize },
}

/// Builds the phrase links of one row from its tokens.
///
/// Every phrase marker must be followed by a separator token and a code token.
/// Anything shorter means the tokenizer broke its contract, and the pass fails
/// rather than guessing at ranges.
pub fn extract_row(row: usize, tokens: &[Token]) -> Result<Vec<PhraseLink>, ExtractError> {
    let mut links = Vec::new();
    let mut offset = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_phrase_marker() {
            let malformed = ExtractError::MalformedPhraseTokens {
                row,
                column: offset,
            };
            let Some(run) = tokens.get(i..i + 3) else {
                return Err(malformed);
            };
            // the opening bracket sits in the token before the marker
            let Some(start) = offset.checked_sub(1) else {
                return Err(malformed);
            };
            let (phrase, code) = (&run[0].value, &run[2].value);
            if phrase.is_empty() || code.is_empty() {
                return Err(malformed);
            }

            let end = offset + run.iter().map(|t| t.value.len()).sum::<usize>();
            links.push(PhraseLink::new(row, start, end, phrase, code));
        }
        offset += token.value.len();
    }

    Ok(links)
}
