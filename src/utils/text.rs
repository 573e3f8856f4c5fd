//! Character-based text helpers. All lengths are counted in `char`s.

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `n`th char, or `text.len()` when `text` is shorter.
pub fn byte_offset_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(idx, _)| idx).unwrap_or(text.len())
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    &text[..byte_offset_of_char(text, max_chars)]
}

/// Replace every whitespace run containing a newline with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending: Option<bool> = None;
    for ch in text.chars() {
        if ch.is_whitespace() {
            let saw_newline = pending.unwrap_or(false) || ch == '\n' || ch == '\r';
            pending = Some(saw_newline);
            if !saw_newline {
                out.push(ch);
            }
            continue;
        }
        if pending.take() == Some(true) {
            let trimmed_len = out.trim_end().len();
            out.truncate(trimmed_len);
            out.push(' ');
        }
        out.push(ch);
    }
    if pending == Some(true) {
        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
        out.push(' ');
    }
    out
}

/// First non-blank line of `text`, trimmed.
pub fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or("")
}
