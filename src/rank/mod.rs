//! Model-driven chunk ranking.
//!
//! One prompt per file lists an index-labeled preview of every chunk. The reply
//! is parsed through [`parse::parse_ranking`]; when both parse tiers fail (or
//! the model call itself fails) the first chunks are returned in source order
//! with a neutral score.

use crate::domain::RankedChunk;
use crate::oracle::ModelOracle;
use crate::prompt::rank_prompt;
use crate::utils::{collapse_whitespace, truncate_chars};
use std::collections::HashSet;

pub mod parse;

pub use parse::{parse_ranking, ParseError, RawRanking, DEFAULT_SCORE, PLACEHOLDER_REASON};

pub const PREVIEW_CHARS: usize = 200;
pub const DEFAULT_RANKING_LEN: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    dedupe_indices: bool,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the first entry for each resolved chunk index.
    pub fn dedupe_indices(mut self, dedupe: bool) -> Self {
        self.dedupe_indices = dedupe;
        self
    }

    pub fn rank(
        &self,
        chunks: &[String],
        lens: &str,
        oracle: &dyn ModelOracle,
    ) -> Vec<RankedChunk> {
        if chunks.is_empty() {
            return Vec::new();
        }

        let previews: Vec<String> = chunks.iter().map(|chunk| preview(chunk)).collect();
        let prompt = rank_prompt(lens, &previews);

        let parsed = oracle
            .generate(&prompt)
            .map_err(|e| ParseError::Oracle(e.to_string()))
            .and_then(|reply| parse_ranking(&reply));

        match parsed {
            Ok(raw) => self.resolve(chunks, raw),
            Err(e) => {
                tracing::warn!("ranking for lens '{}' fell back to source order: {}", lens, e);
                default_ranking(chunks)
            }
        }
    }

    /// Re-associate parsed entries with the original chunk text by index.
    ///
    /// Indices are clamped into range; the chunk text always comes from
    /// `chunks`. Entries are ordered by score, highest first, ties in reply
    /// order.
    pub fn resolve(&self, chunks: &[String], raw: Vec<RawRanking>) -> Vec<RankedChunk> {
        if chunks.is_empty() {
            return Vec::new();
        }
        let last = chunks.len() - 1;
        let mut seen = HashSet::new();

        let mut ranked: Vec<RankedChunk> = raw
            .into_iter()
            .filter_map(|entry| {
                let index = clamp_index(entry.index, last);
                if self.dedupe_indices && !seen.insert(index) {
                    return None;
                }
                Some(RankedChunk {
                    index,
                    chunk: chunks[index].clone(),
                    score: entry.score,
                    reason: entry.reason,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

/// Rank with default options.
pub fn rank_chunks(chunks: &[String], lens: &str, oracle: &dyn ModelOracle) -> Vec<RankedChunk> {
    Ranker::new().rank(chunks, lens, oracle)
}

/// The first `min(10, n)` chunks in source order with a neutral score.
pub fn default_ranking(chunks: &[String]) -> Vec<RankedChunk> {
    chunks
        .iter()
        .take(DEFAULT_RANKING_LEN)
        .enumerate()
        .map(|(index, chunk)| RankedChunk {
            index,
            chunk: chunk.clone(),
            score: DEFAULT_SCORE,
            reason: PLACEHOLDER_REASON.to_string(),
        })
        .collect()
}

fn clamp_index(raw: f64, last: usize) -> usize {
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= last as f64 {
        last
    } else {
        raw as usize
    }
}

fn preview(chunk: &str) -> String {
    let collapsed = collapse_whitespace(chunk);
    truncate_chars(&collapsed, PREVIEW_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, OracleResult};
    use std::sync::Mutex;

    struct Scripted {
        reply: OracleResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn replying(reply: &str) -> Self {
            Self { reply: Ok(reply.to_string()), prompts: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self {
                reply: Err(OracleError::MalformedResponse("boom".into())),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ModelOracle for Scripted {
        fn generate(&self, prompt: &str) -> OracleResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(_) => Err(OracleError::MalformedResponse("boom".into())),
            }
        }
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("fn chunk_{i}() {{\n    body_{i}();\n}}")).collect()
    }

    #[test]
    fn issues_one_prompt_with_collapsed_previews() {
        let oracle = Scripted::replying(r#"[{"index": 0, "score": 8, "reason": "r"}]"#);
        rank_chunks(&chunks(3), "security", &oracle);

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("[2] fn chunk_2() { body_2(); }"));
    }

    #[test]
    fn previews_are_truncated() {
        let long = vec!["x".repeat(1000)];
        let oracle = Scripted::replying(r#"[{"index": 0, "score": 8}]"#);
        rank_chunks(&long, "security", &oracle);
        let prompts = oracle.prompts.lock().unwrap();
        assert!(prompts[0].contains(&format!("[0] {}\n", "x".repeat(PREVIEW_CHARS))));
        assert!(!prompts[0].contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn results_are_sorted_by_score() {
        let oracle = Scripted::replying(
            r#"[{"index": 0, "score": 2, "reason": "a"}, {"index": 2, "score": 9, "reason": "b"}, {"index": 1, "score": 9, "reason": "c"}]"#,
        );
        let ranked = rank_chunks(&chunks(3), "architecture", &oracle);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn out_of_range_indices_are_clamped_to_original_chunks() {
        let input = chunks(3);
        let oracle = Scripted::replying(
            r#"[{"index": 99, "score": 7, "reason": "paraphrased text here"}, {"index": -4, "score": 6}]"#,
        );
        let ranked = rank_chunks(&input, "security", &oracle);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].chunk, input[2]);
        assert_eq!(ranked[1].chunk, input[0]);
        assert!(ranked.iter().all(|r| input.contains(&r.chunk)));
    }

    #[test]
    fn echoed_text_is_ignored() {
        let input = chunks(2);
        let oracle = Scripted::replying(
            r#"[{"index": 1, "score": 7, "chunk": "fn something_else() {}", "reason": "x"}]"#,
        );
        let ranked = rank_chunks(&input, "security", &oracle);
        assert_eq!(ranked[0].chunk, input[1]);
    }

    #[test]
    fn duplicate_indices_are_kept_unless_deduped() {
        let reply =
            r#"[{"index": 1, "score": 7}, {"index": 1, "score": 6}, {"index": 0, "score": 5}]"#;
        let kept = rank_chunks(&chunks(2), "security", &Scripted::replying(reply));
        assert_eq!(kept.len(), 3);

        let deduper = Ranker::new().dedupe_indices(true);
        let deduped = deduper.rank(&chunks(2), "security", &Scripted::replying(reply));
        let order: Vec<usize> = deduped.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn prose_with_embedded_array_recovers_single_entry() {
        let oracle = Scripted::replying(
            r#"I looked at the code. [{"index":0,"score":7,"reason":"x"}] That is all."#,
        );
        let ranked = rank_chunks(&chunks(4), "security", &oracle);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[0].score, 7.0);
        assert_eq!(ranked[0].reason, "x");
    }

    #[test]
    fn unparseable_reply_uses_default_ranking() {
        let input = chunks(12);
        let ranked = rank_chunks(&input, "security", &Scripted::replying("no idea, sorry"));
        assert_eq!(ranked.len(), DEFAULT_RANKING_LEN);
        for (i, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.chunk, input[i]);
            assert_eq!(entry.score, DEFAULT_SCORE);
            assert_eq!(entry.reason, PLACEHOLDER_REASON);
        }
    }

    #[test]
    fn failed_model_call_uses_default_ranking() {
        let ranked = rank_chunks(&chunks(3), "security", &Scripted::failing());
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn no_chunks_means_no_prompt() {
        let oracle = Scripted::replying("[]");
        assert!(rank_chunks(&[], "security", &oracle).is_empty());
        assert!(oracle.prompts.lock().unwrap().is_empty());
    }
}
