//! Handle validation and username normalization.
//!
//! A handle is a syntactically valid username (`jane_doe`, `@jane_doe`) or
//! hashtag (`#travel`). The normalized form produced by [`normalize_username`]
//! is the only key used for joins and deduplication anywhere in followlens.

/// Maximum length of any candidate handle, in characters.
pub const MAX_HANDLE_LEN: usize = 64;

/// Maximum length of a username once the leading `@` is stripped.
pub const MAX_USERNAME_LEN: usize = 32;

/// Normalize a username for comparison.
///
/// Trims surrounding whitespace, strips one leading `@` or `#` and lowercases
/// the rest. The original casing is kept on the entry for display.
pub fn normalize_username(username: &str) -> String {
    let trimmed = username.trim();
    let stripped = trimmed
        .strip_prefix('@')
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);
    stripped.to_lowercase()
}

/// Check whether a string is a plausible username or hashtag.
pub fn is_valid_handle(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HANDLE_LEN {
        return false;
    }
    if is_absolute_url(trimmed) || trimmed.chars().any(char::is_whitespace) {
        return false;
    }
    if let Some(tag) = trimmed.strip_prefix('#') {
        return !tag.is_empty();
    }

    let name = trimmed.strip_prefix('@').unwrap_or(trimmed);
    !name.is_empty() && name.len() <= MAX_USERNAME_LEN && name.chars().all(is_username_char)
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn is_absolute_url(value: &str) -> bool {
    match value.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
