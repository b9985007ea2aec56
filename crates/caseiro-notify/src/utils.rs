//! Small string helpers shared by the channels and templates.

/// Trims every entry and drops blank ones.
pub fn clean_recipients<S: AsRef<str>>(recipients: &[S]) -> Vec<String> {
    recipients
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a comma-separated recipient field (`"a@x.com, b@x.com"`).
pub fn parse_recipients(field: &str) -> Vec<String> {
    clean_recipients(&field.split(',').collect::<Vec<_>>())
}

/// First `max_chars` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
