//! Box-drawing tree of summaries, one block per lens.

use crate::domain::{is_sentinel, NodeKind, PerLensResult, SummaryNode};
use crate::utils::{first_line, truncate_chars};
use console::style;

pub const SUMMARY_LINE_CHARS: usize = 100;

/// Render every lens tree. With `styled`, sentinel summaries are dimmed.
pub fn render_tree(result: &PerLensResult, styled: bool) -> String {
    let mut lines = Vec::new();
    for (index, (lens, root)) in result.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        let header = format!("[{}]", lens);
        lines.push(if styled { style(header).bold().to_string() } else { header });
        lines.push(node_label(root, styled));
        walk(root, "", styled, &mut lines);
    }
    lines.join("\n") + "\n"
}

fn walk(node: &SummaryNode, prefix: &str, styled: bool, lines: &mut Vec<String>) {
    let total = node.children.len();
    for (idx, child) in node.children.iter().enumerate() {
        let is_last = idx == total - 1;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, connector, node_label(child, styled)));

        if !child.children.is_empty() {
            let extension = if is_last { "    " } else { "│   " };
            walk(child, &format!("{}{}", prefix, extension), styled, lines);
        }
    }
}

fn node_label(node: &SummaryNode, styled: bool) -> String {
    let summary = truncate_chars(first_line(&node.summary), SUMMARY_LINE_CHARS);
    let summary = if styled && is_sentinel(&node.summary) {
        style(summary).dim().to_string()
    } else {
        summary.to_string()
    };

    let name = node.name();
    match (name.is_empty(), node.kind) {
        (true, _) => summary,
        (false, NodeKind::Folder) => format!("{}/: {}", name, summary),
        (false, NodeKind::File) => format!("{}: {}", name, summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEPTH_LIMIT_SUMMARY;
    use std::path::PathBuf;

    #[test]
    fn renders_connectors_and_folder_slashes() {
        let nested = SummaryNode::folder(
            PathBuf::from("/repo/src"),
            "Source tree.\nSecond line is dropped.",
            vec![
                SummaryNode::file(PathBuf::from("/repo/src/a.rs"), "Module a."),
                SummaryNode::depth_limit(NodeKind::Folder),
            ],
        );
        let root = SummaryNode::folder(
            PathBuf::from("/repo"),
            "Whole repo.",
            vec![nested, SummaryNode::file(PathBuf::from("/repo/build.rs"), "Build script.")],
        );
        let mut result = PerLensResult::new();
        result.insert("architecture", root);

        let rendered = render_tree(&result, false);
        let expected = "\
[architecture]
repo/: Whole repo.
├── src/: Source tree.
│   ├── a.rs: Module a.
│   └── [depth limit reached]
└── build.rs: Build script.
";
        similar_asserts::assert_eq!(rendered, expected);
        assert!(!rendered.contains("Second line"));
        assert!(rendered.contains(DEPTH_LIMIT_SUMMARY));
    }

    #[test]
    fn long_summaries_are_truncated() {
        let mut result = PerLensResult::new();
        result.insert("security", SummaryNode::file(PathBuf::from("/r/x.rs"), "z".repeat(300)));
        let rendered = render_tree(&result, false);
        assert!(rendered.contains(&format!("x.rs: {}\n", "z".repeat(SUMMARY_LINE_CHARS))));
        assert!(!rendered.contains(&"z".repeat(SUMMARY_LINE_CHARS + 1)));
    }

    #[test]
    fn lenses_render_in_request_order() {
        let mut result = PerLensResult::new();
        result.insert("security", SummaryNode::file(PathBuf::from("/r/x.rs"), "s"));
        result.insert("data-flow", SummaryNode::file(PathBuf::from("/r/x.rs"), "d"));
        let rendered = render_tree(&result, false);
        assert!(rendered.find("[security]").unwrap() < rendered.find("[data-flow]").unwrap());
    }
}
