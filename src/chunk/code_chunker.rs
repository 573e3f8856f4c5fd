//! Syntax-aware extraction of top-level declarations.

use super::{Structure, StructuralSplitter};
use std::path::Path;
use tree_sitter::{Language, Parser};

/// Map a file extension (with or without the leading dot) to a grammar name.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "py" | "pyi" => Some("python"),
        "rs" => Some("rust"),
        "js" | "jsx" | "mjs" | "cjs" => Some("javascript"),
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        "go" => Some("go"),
        _ => None,
    }
}

fn grammar(language: &str) -> Option<Language> {
    let grammar: Language = match language {
        "python" => tree_sitter_python::LANGUAGE.into(),
        "rust" => tree_sitter_rust::LANGUAGE.into(),
        "javascript" => tree_sitter_javascript::LANGUAGE.into(),
        "typescript" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        "tsx" => tree_sitter_typescript::LANGUAGE_TSX.into(),
        "go" => tree_sitter_go::LANGUAGE.into(),
        _ => return None,
    };
    Some(grammar)
}

/// Splits source into the literal text of its top-level syntax nodes.
///
/// Comments directly preceding a node are kept with it. Content that does not
/// parse cleanly is reported as [`Structure::Unavailable`].
pub struct CodeChunker {
    language: Option<&'static str>,
}

impl CodeChunker {
    pub fn new(language: Option<&'static str>) -> Self {
        Self { language }
    }

    pub fn for_path(path: &Path) -> Self {
        let language =
            path.extension().and_then(|e| e.to_str()).and_then(language_for_extension);
        Self::new(language)
    }

    pub fn language(&self) -> Option<&'static str> {
        self.language
    }
}

impl StructuralSplitter for CodeChunker {
    fn split(&self, content: &str) -> Structure {
        let Some(language) = self.language.and_then(grammar) else {
            return Structure::Unavailable;
        };

        let mut parser = Parser::new();
        if parser.set_language(&language).is_err() {
            return Structure::Unavailable;
        }
        let Some(tree) = parser.parse(content, None) else {
            return Structure::Unavailable;
        };

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!("syntax errors in {:?} source; using line heuristics", self.language);
            return Structure::Unavailable;
        }

        let mut declarations = Vec::new();
        let mut pending_comment_start: Option<usize> = None;

        for i in 0..root.named_child_count() {
            let Some(child) = root.named_child(i) else {
                continue;
            };
            if child.kind().contains("comment") {
                pending_comment_start.get_or_insert(child.start_byte());
                continue;
            }
            let start = pending_comment_start.take().unwrap_or(child.start_byte());
            declarations.push(content[start..child.end_byte()].to_string());
        }
        if let Some(start) = pending_comment_start {
            declarations.push(content[start..].to_string());
        }

        if declarations.iter().all(|d| d.trim().is_empty()) {
            return Structure::Unavailable;
        }
        Structure::Declarations(declarations)
    }
}
