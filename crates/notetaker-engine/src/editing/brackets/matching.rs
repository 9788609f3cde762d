//! Row-local bracket and word scanning.

/// Column of the `[` left unmatched in `line[..before]`, scanning backwards.
///
/// Called with the column of a `]` this finds that bracket's opener.
pub fn find_open_bracket(line: &str, before: usize) -> Option<usize> {
    let head = line.get(..before)?;
    let mut depth = 0usize;
    for (column, ch) in head.char_indices().rev() {
        match ch {
            ']' => depth += 1,
            '[' if depth == 0 => return Some(column),
            '[' => depth -= 1,
            _ => {}
        }
    }
    None
}

pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// The trailing run of word characters in `line[..before]` and its start column.
pub fn previous_word(line: &str, before: usize) -> Option<(usize, &str)> {
    let head = line.get(..before)?;
    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map(|(column, _)| column)?;
    Some((start, &head[start..]))
}

/// Characters that end a word and trigger abbreviation lookup.
pub fn is_word_boundary(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | ',' | '?' | '!' | '.')
}
