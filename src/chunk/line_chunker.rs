//! Line-oriented chunking for content without a usable syntax tree.
//!
//! Lines that look like the start of a declaration (definition keywords,
//! top-level assignments, `TODO`/`NOTE`/`FIXME` markers) open a new chunk.
//! A chunk that would grow past the cap is flushed first; a single line that is
//! itself over the cap goes through the size-bounded splitter.

use super::text_splitter::split_bounded;
use crate::utils::char_len;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFINITION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:export|pub(?:\([^)]*\))?|async|default|static|public|private|protected|abstract|final|unsafe|extern)\s+)*(?:def|class|fn|function|func|struct|enum|trait|impl|interface|type|const|let|var|mod|module|namespace|package)\b",
    )
    .unwrap()
});

static TOP_LEVEL_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$.]*\s*(?::[^=]+)?=[^=]").unwrap());

static MARKER_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?://+|#+|/\*+|--|\*)\s*(?:TODO|NOTE|FIXME)\b").unwrap());

pub fn is_declaration_start(line: &str) -> bool {
    DEFINITION_START.is_match(line)
        || TOP_LEVEL_ASSIGNMENT.is_match(line)
        || MARKER_COMMENT.is_match(line)
}

pub struct LineChunker {
    max_chars: usize,
}

impl LineChunker {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars: max_chars.max(1) }
    }

    pub fn chunk(&self, content: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for line in content.split_inclusive('\n') {
            let line_len = char_len(line);
            let opens_declaration = is_declaration_start(line);
            let would_overflow = current_len + line_len > self.max_chars;

            if (opens_declaration || would_overflow) && !current.trim().is_empty() {
                self.flush(&mut chunks, &mut current, &mut current_len);
            }

            current.push_str(line);
            current_len += line_len;

            if current_len > self.max_chars {
                self.flush(&mut chunks, &mut current, &mut current_len);
            }
        }
        self.flush(&mut chunks, &mut current, &mut current_len);

        chunks
    }

    fn flush(&self, chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
        chunks.extend(split_bounded(current, self.max_chars));
        current.clear();
        *current_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_declaration_lines() {
        assert!(is_declaration_start("def handler(event):\n"));
        assert!(is_declaration_start("pub(crate) async fn run() {\n"));
        assert!(is_declaration_start("export default class App {}\n"));
        assert!(is_declaration_start("MAX_RETRIES = 3\n"));
        assert!(is_declaration_start("# TODO: remove this\n"));
        assert!(is_declaration_start("  // FIXME handle errors\n"));
        assert!(!is_declaration_start("    return x\n"));
        assert!(!is_declaration_start("if a == b:\n"));
        assert!(!is_declaration_start("# plain comment\n"));
    }

    #[test]
    fn splits_at_definitions() {
        let content = "import os\n\ndef a():\n    pass\n\ndef b():\n    pass\n";
        let chunks = LineChunker::new(1000).chunk(content);
        assert_eq!(chunks, vec!["import os", "def a():\n    pass", "def b():\n    pass"]);
    }

    #[test]
    fn todo_marker_opens_chunk() {
        let content = "x = 1\nprint(x)\n# NOTE: the next block is slow\nfor i in range(10):\n    slow(i)\n";
        let chunks = LineChunker::new(1000).chunk(content);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].starts_with("# NOTE"));
    }

    #[test]
    fn packs_plain_lines_up_to_cap() {
        let content = "a\n".repeat(2000);
        let chunks = LineChunker::new(100).chunk(&content);
        assert!(chunks.iter().all(|c| char_len(c) <= 100));
        let lines: usize = chunks.iter().map(|c| c.lines().count()).sum();
        assert_eq!(lines, 2000);
    }

    #[test]
    fn long_single_line_is_split() {
        let content = format!("{}\nshort\n", "q".repeat(250));
        let chunks = LineChunker::new(100).chunk(&content);
        assert!(chunks.iter().all(|c| char_len(c) <= 100));
        assert_eq!(chunks.last().map(String::as_str), Some("short"));
    }
}
