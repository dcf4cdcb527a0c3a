//! Line-oriented `key=value` sources

use crate::WiringError;

const SEPARATOR: char = '=';

/// Split a `key=value` text into pairs.
///
/// Empty lines are ignored. Any other line, even one made of whitespace, must
/// contain exactly one separator.
/// Nothing is returned unless the whole text is well-formed.
pub(crate) fn parse_properties(text: &str) -> Result<Vec<(String, String)>, WiringError> {
    let mut pairs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split(SEPARATOR);
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(WiringError::MalformedProperty {
                line: idx + 1,
                content: line.to_owned(),
            });
        };
        pairs.push((key.to_owned(), value.to_owned()));
    }
    Ok(pairs)
}
