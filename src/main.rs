//! repo-digest: recursively summarize repositories through analytical lenses
//!
//! Files are chunked, ranked and summarized by a language model, then folded
//! bottom-up into folder and repository summaries, one tree per lens.

use anyhow::Result;

fn main() -> Result<()> {
    repo_digest::cli::run()
}
