//! Shared helpers for file reading and text handling.

pub mod encoding;
pub mod text;

pub use encoding::{read_source_text, SourceText};
pub use text::{char_len, collapse_whitespace, first_line, truncate_chars};
