//! Size-bounded text splitting.
//!
//! Splits text that exceeds a character cap at the best boundary found by
//! searching backward through the first `max_chars` characters. Boundaries, in
//! order of preference:
//!
//! 1. blank line
//! 2. statement terminator followed by a newline (`;\n`)
//! 3. block close followed by a newline (`}\n`)
//! 4. start of a comment line
//! 5. any newline
//!
//! A boundary landing within the first [`MIN_BOUNDARY_OFFSET`] characters is
//! rejected. With no acceptable boundary the text is cut at exactly
//! `max_chars`.

use crate::utils::char_len;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_BOUNDARY_OFFSET: usize = 10;

static COMMENT_LINE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?://|#|/\*|--|\*)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    BlankLine,
    StatementEnd,
    BlockClose,
    CommentStart,
    Newline,
}

const BOUNDARY_PREFERENCE: [Boundary; 5] = [
    Boundary::BlankLine,
    Boundary::StatementEnd,
    Boundary::BlockClose,
    Boundary::CommentStart,
    Boundary::Newline,
];

impl Boundary {
    /// Byte offset just past the last occurrence of this boundary in `window`.
    fn last_split_in(self, window: &str) -> Option<usize> {
        let literal = match self {
            Boundary::BlankLine => "\n\n",
            Boundary::StatementEnd => ";\n",
            Boundary::BlockClose => "}\n",
            Boundary::Newline => "\n",
            Boundary::CommentStart => {
                // Split after the newline so the comment opens the next chunk.
                return COMMENT_LINE_START.find_iter(window).last().map(|m| m.start() + 1);
            }
        };
        window.rfind(literal).map(|idx| idx + literal.len())
    }
}

/// Split `text` into trimmed, non-empty pieces of at most `max_chars` characters.
pub fn split_bounded(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut rest = text.trim();

    while let Some((window_end, _)) = rest.char_indices().nth(max_chars) {
        let window = &rest[..window_end];
        let cut = find_split(window).unwrap_or(window_end);
        push_trimmed(&mut pieces, &rest[..cut]);
        rest = rest[cut..].trim_start();
    }
    push_trimmed(&mut pieces, rest);

    pieces
}

fn find_split(window: &str) -> Option<usize> {
    BOUNDARY_PREFERENCE.iter().find_map(|boundary| {
        boundary
            .last_split_in(window)
            .filter(|&cut| char_len(&window[..cut]) > MIN_BOUNDARY_OFFSET)
    })
}

fn push_trimmed(pieces: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bounded(pieces: &[String], max_chars: usize) {
        for piece in pieces {
            assert!(char_len(piece) <= max_chars, "piece over cap: {piece:?}");
            assert!(!piece.trim().is_empty());
        }
    }

    #[test]
    fn short_text_is_returned_trimmed() {
        assert_eq!(split_bounded("  fn a() {}\n\n", 100), vec!["fn a() {}"]);
        assert!(split_bounded(" \n\t ", 100).is_empty());
    }

    #[test]
    fn prefers_blank_line_over_newline() {
        let text = "let first = 1;\nlet second = 2;\n\nlet third = 3;\nlet fourth = 4;\n";
        let pieces = split_bounded(text, 40);
        assert_eq!(pieces[0], "let first = 1;\nlet second = 2;");
        assert_bounded(&pieces, 40);
    }

    #[test]
    fn prefers_statement_end_over_plain_newline() {
        let text = "call_one(alpha);\ncall_two(beta)\n.chain(gamma)\n.finish(delta)";
        let pieces = split_bounded(text, 45);
        assert_eq!(pieces[0], "call_one(alpha);");
    }

    #[test]
    fn comment_starts_a_new_piece() {
        let text = "value = compute(a, b)\n# explain the next step\nother = 2\n";
        let pieces = split_bounded(text, 40);
        assert_eq!(pieces[0], "value = compute(a, b)");
        assert!(pieces[1].starts_with("# explain"));
    }

    #[test]
    fn boundary_too_close_to_start_is_rejected() {
        let text = format!("x\n{}", "y".repeat(50));
        let pieces = split_bounded(&text, 20);
        assert_eq!(char_len(&pieces[0]), 20);
        assert_bounded(&pieces, 20);
    }

    #[test]
    fn hard_cut_without_boundaries() {
        let text = "z".repeat(95);
        let pieces = split_bounded(&text, 30);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces.concat(), text);
        assert_bounded(&pieces, 30);
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let text = "é".repeat(25);
        let pieces = split_bounded(&text, 7);
        assert_bounded(&pieces, 7);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn cap_of_one_still_terminates() {
        let pieces = split_bounded("abc\ndef", 1);
        assert_eq!(pieces, vec!["a", "b", "c", "d", "e", "f"]);
    }
}
