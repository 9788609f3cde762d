use crate::parsing::LineState;
use crate::parsing::tokenizer::list_marker_regex;

/// Indentation for the row opened after `line`.
///
/// Inside a list block the bullet is carried over, and numbered bullets count
/// up by one. Elsewhere the line's own leading whitespace is reused.
pub fn next_line_indent(state: LineState, line: &str) -> String {
    if state != LineState::ListBlock {
        return leading_whitespace(line).to_string();
    }

    let Some(caps) = list_marker_regex().captures(line) else {
        return String::new();
    };
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let spacing = caps.get(4).map_or("", |m| m.as_str());
    let marker = match (caps.get(2), caps.get(3)) {
        (Some(bullet), _) => bullet.as_str().to_string(),
        (None, Some(number)) => match number.as_str().parse::<u64>() {
            Ok(n) => format!("{}.", n.saturating_add(1)),
            Err(_) => format!("{}.", number.as_str()),
        },
        (None, None) => String::new(),
    };

    format!("{indent}{marker}{spacing}")
}

fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start().len();
    &line[..end]
}
