use crate::error::{Error, Result};

/// Span of the first `{` through the last `}` in a model reply.
///
/// Greedy on purpose: replies routinely wrap the JSON in commentary.
/// A reply containing stray braces outside the object, or more than one
/// object, defeats this strategy; callers treat the result as untrusted
/// until it has passed parsing and validation.
pub fn extract_object(text: &str) -> Result<&str> {
    span(text, '{', '}').ok_or(Error::Extraction("JSON"))
}

/// Same strategy for a JSON array reply, `[` through `]`.
pub fn extract_array(text: &str) -> Result<&str> {
    span(text, '[', ']').ok_or(Error::Extraction("a JSON array"))
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}
