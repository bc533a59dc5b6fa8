//! Input hygiene shared by display names and chat messages.

/// Upper bound, in characters, for any sanitized text.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Drop `<` and `>`, trim surrounding whitespace, and cap the result at
/// [`MAX_TEXT_CHARS`] characters.
///
/// Whitespace is trimmed after the brackets are removed, so `"< a>"` cannot
/// smuggle leading or trailing blanks into the result. This is a minimal
/// markup-injection guard, not HTML escaping.
pub fn sanitize_text(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let truncated: String = stripped.trim().chars().take(MAX_TEXT_CHARS).collect();
    truncated.trim_end().to_owned()
}
