//! Placeholder parsing used by the lexer.

use crate::errors::{PatternError, placeholder_error};

/// A `{name}` or `{name:hint}` segment of a step pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pub name: String,
    pub hint: Option<String>,
    pub start: usize,
}

/// Byte offset of the `}` closing the current nesting level of `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '{' => depth = depth.saturating_add(1),
            '}' if depth == 0 => return Some(index),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Parse the placeholder whose opening brace sits at byte `start` of
/// `pattern`, returning the offset just past its closing brace.
///
/// Placeholders without a hint may enclose nested braces; their contents after
/// the name are ignored. Hints must be non-empty and free of whitespace and
/// braces.
pub(crate) fn parse_placeholder(
    pattern: &str,
    start: usize,
) -> Result<(usize, Placeholder), PatternError> {
    let body = pattern.get(start + 1..).unwrap_or_default();
    let name_len = body.find(|ch| !is_name_char(ch)).unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    let invalid = || {
        placeholder_error(
            "invalid placeholder in step pattern",
            start,
            Some(name.to_owned()),
        )
    };
    let unclosed = || {
        placeholder_error(
            "missing closing '}' for placeholder",
            start,
            Some(name.to_owned()),
        )
    };

    let trimmed = rest.trim_start_matches(|ch: char| ch.is_ascii_whitespace());
    if trimmed.len() != rest.len() && trimmed.starts_with([':', '}']) {
        return Err(invalid());
    }
    let offset = start + 1 + name_len + (rest.len() - trimmed.len());

    let Some(tail) = trimmed.strip_prefix(':') else {
        let close = matching_brace(trimmed).ok_or_else(unclosed)?;
        let placeholder = Placeholder {
            name: name.to_owned(),
            hint: None,
            start,
        };
        return Ok((offset + close + 1, placeholder));
    };

    let Some(close) = tail.find('}') else {
        return Err(if tail.contains('{') {
            invalid()
        } else {
            unclosed()
        });
    };
    let hint = tail.get(..close).unwrap_or_default();
    if hint.is_empty() || hint.contains(|ch: char| ch.is_ascii_whitespace() || ch == '{') {
        return Err(invalid());
    }
    let placeholder = Placeholder {
        name: name.to_owned(),
        hint: Some(hint.to_owned()),
        start,
    };
    Ok((offset + 1 + close + 1, placeholder))
}
