//! Prompt templates. Every prompt is parameterized by the lens.

/// Ask the model to rank index-labeled chunk previews.
pub fn rank_prompt(lens: &str, previews: &[String]) -> String {
    let listing: String = previews
        .iter()
        .enumerate()
        .map(|(index, preview)| format!("[{}] {}\n", index, preview))
        .collect();

    format!(
        "You are reviewing source code through the \"{lens}\" lens.\n\
         Rank the following code chunks by how relevant they are to the {lens} lens.\n\
         \n\
         Respond with ONLY a JSON array, no prose and no code fences. Each element must be\n\
         an object {{\"index\": <chunk number>, \"score\": <1-10>, \"reason\": \"<short reason>\"}}.\n\
         Refer to chunks by index only; do not repeat their text.\n\
         \n\
         Chunks:\n\
         {listing}"
    )
}

/// Ask the model to reduce the highest-ranked chunks of one file to a summary.
pub fn file_summary_prompt(lens: &str, ranked_context: &str) -> String {
    format!(
        "Summarize this source file through the \"{lens}\" lens.\n\
         The most relevant excerpts follow, each introduced by \"<score>: <reason>\".\n\
         Write a concise paragraph focused on what matters for the {lens} lens.\n\
         \n\
         {ranked_context}"
    )
}

/// Ask the model to fold child summaries into one folder summary.
pub fn folder_summary_prompt(
    lens: &str,
    folder_name: &str,
    children: &[(String, String)],
) -> String {
    let listing: String =
        children.iter().map(|(name, summary)| format!("- {}: {}\n", name, summary)).collect();

    format!(
        "Summarize the folder \"{folder_name}\" through the \"{lens}\" lens.\n\
         Below are summaries of its files and subfolders. Combine them into one concise\n\
         paragraph describing the folder's role with respect to the {lens} lens.\n\
         \n\
         {listing}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_prompt_labels_every_preview() {
        let prompt = rank_prompt("security", &["fn a()".to_string(), "fn b()".to_string()]);
        assert!(prompt.contains("\"security\" lens"));
        assert!(prompt.contains("[0] fn a()"));
        assert!(prompt.contains("[1] fn b()"));
        assert!(prompt.contains("\"index\""));
    }

    #[test]
    fn folder_prompt_lists_children() {
        let children = vec![("auth.rs".to_string(), "Checks tokens.".to_string())];
        let prompt = folder_summary_prompt("security", "src", &children);
        assert!(prompt.contains("folder \"src\""));
        assert!(prompt.contains("- auth.rs: Checks tokens."));
    }
}
