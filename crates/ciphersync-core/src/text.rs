//! Reply text normalization.

/// Markdown punctuation removed from free-text replies.
pub const MARKDOWN_CHARS: [char; 5] = ['#', '*', '_', '~', '`'];

/// Strip markdown punctuation and surrounding whitespace from a reply.
///
/// Every occurrence of `#`, `*`, `_`, `~` and the backtick is removed, not
/// only paired emphasis markers.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !MARKDOWN_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
