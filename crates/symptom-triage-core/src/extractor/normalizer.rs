//! Text normalization applied before any matching.
//!
//! - Lowercase
//! - Anything that is not alphanumeric or whitespace becomes a space
//! - Whitespace runs collapse to one space, ends trimmed

/// Normalize free text for matching. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let spaced: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
