//! Parsing of the model's ranking reply.
//!
//! Two fallible tiers, chained with `or_else`:
//! - [`parse_strict`]: the whole reply is a JSON array and every element has a
//!   numeric `index` and `score`
//! - [`parse_embedded`]: a `[...]` span is pulled out of surrounding prose;
//!   elements need only a numeric `index`. Each `[` in the reply is tried in
//!   turn, widest span first, then the shortest one
//!
//! The pure default ranking lives with the ranker, which owns the chunk list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_SCORE: f64 = 5.0;
pub const PLACEHOLDER_REASON: &str = "No reason provided";

static GREEDY_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());
static SHORTEST_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());

/// One ranking entry as the model wrote it. `index` is not yet bounds-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRanking {
    pub index: f64,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply is not a JSON array")]
    NotArray,

    #[error("element {0} has no numeric index")]
    MissingIndex(usize),

    #[error("element {0} has no numeric score")]
    MissingScore(usize),

    #[error("no bracketed array found in reply")]
    NoArray,

    #[error("array contains no usable entries")]
    Empty,

    #[error("model call failed: {0}")]
    Oracle(String),
}

/// Tier 1 then tier 2.
pub fn parse_ranking(reply: &str) -> Result<Vec<RawRanking>, ParseError> {
    parse_strict(reply).or_else(|strict_err| {
        tracing::warn!(
            "ranking reply is not a strict JSON array ({}); scanning for one",
            strict_err
        );
        parse_embedded(reply)
    })
}

pub fn parse_strict(reply: &str) -> Result<Vec<RawRanking>, ParseError> {
    let value: Value = serde_json::from_str(reply.trim())?;
    let elements = value.as_array().ok_or(ParseError::NotArray)?;

    let rankings = elements
        .iter()
        .enumerate()
        .map(|(position, element)| {
            let index = numeric_field(element, "index").ok_or(ParseError::MissingIndex(position))?;
            let score = numeric_field(element, "score").ok_or(ParseError::MissingScore(position))?;
            Ok(RawRanking { index, score, reason: reason_field(element) })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    non_empty(rankings)
}

pub fn parse_embedded(reply: &str) -> Result<Vec<RawRanking>, ParseError> {
    let mut last_err = ParseError::NoArray;

    for (start, _) in reply.match_indices('[') {
        let tail = &reply[start..];
        for pattern in [&*GREEDY_ARRAY, &*SHORTEST_ARRAY] {
            let Some(found) = pattern.find(tail) else {
                continue;
            };
            match lenient_elements(found.as_str()) {
                Ok(rankings) => return Ok(rankings),
                Err(e) => last_err = e,
            }
        }
    }

    Err(last_err)
}

fn lenient_elements(candidate: &str) -> Result<Vec<RawRanking>, ParseError> {
    let value: Value = serde_json::from_str(candidate)?;
    let elements = value.as_array().ok_or(ParseError::NotArray)?;

    let rankings = elements
        .iter()
        .filter_map(|element| {
            let index = numeric_field(element, "index")?;
            let score = numeric_field(element, "score").unwrap_or(DEFAULT_SCORE);
            Some(RawRanking { index, score, reason: reason_field(element) })
        })
        .collect();

    non_empty(rankings)
}

fn numeric_field(element: &Value, field: &str) -> Option<f64> {
    element.get(field).and_then(Value::as_f64)
}

fn reason_field(element: &Value) -> String {
    element
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(PLACEHOLDER_REASON)
        .to_string()
}

fn non_empty(rankings: Vec<RawRanking>) -> Result<Vec<RawRanking>, ParseError> {
    if rankings.is_empty() {
        Err(ParseError::Empty)
    } else {
        Ok(rankings)
    }
}
