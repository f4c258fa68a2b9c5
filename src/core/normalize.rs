use std::collections::HashSet;

/// Fold text into a token-friendly form
///
/// Every character outside `[A-Za-z0-9 ]` becomes a space and the result is
/// lowercased. Tabs and newlines count as "outside" too.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect()
}

/// Whitespace-delimited token set of already normalized text
#[inline]
pub fn token_set(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}
