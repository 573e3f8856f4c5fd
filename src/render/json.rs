//! JSON document for the per-lens result.

use crate::domain::PerLensResult;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

/// Serialized straight to text: a `serde_json::Value` map would re-sort the lens keys.
#[derive(Serialize)]
struct Document<'a> {
    generated_at: String,
    root: String,
    lenses: &'a PerLensResult,
}

/// `{ "generated_at", "root", "lenses": { <lens>: SummaryNode } }`, lens keys
/// in request order.
pub fn render_json(root: &Path, result: &PerLensResult) -> Result<String> {
    let document = Document {
        generated_at: Utc::now().to_rfc3339(),
        root: root.display().to_string(),
        lenses: result,
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize summary trees")
}
