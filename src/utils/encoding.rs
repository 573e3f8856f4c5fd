//! Tolerant source-file reading.
//!
//! Files are read whole. Content is classified before decoding:
//! - a NUL byte in the leading sample marks the file as binary
//! - BOM-prefixed and strict UTF-8 content decodes directly
//! - anything else goes through chardetng detection and lossy decoding
//!
//! I/O errors (missing file, permission denied) are returned to the caller;
//! undecodable content never is.

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::path::Path;

const BINARY_SAMPLE_SIZE: usize = 8192;

/// Outcome of reading a candidate source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceText {
    Text(String),
    Binary,
}

pub fn read_source_text(path: &Path) -> Result<SourceText> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(decode_source_bytes(&bytes))
}

pub fn decode_source_bytes(bytes: &[u8]) -> SourceText {
    if let Some(text) = decode_with_bom(bytes) {
        return SourceText::Text(text);
    }

    let sample = &bytes[..bytes.len().min(BINARY_SAMPLE_SIZE)];
    if sample.contains(&0) {
        return SourceText::Binary;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return SourceText::Text(text.to_string());
    }

    SourceText::Text(decode_detected(bytes))
}

fn decode_with_bom(bytes: &[u8]) -> Option<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes)?;
    let (decoded, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    Some(decoded.into_owned())
}

fn decode_detected(bytes: &[u8]) -> String {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    tracing::debug!("decoding non-UTF-8 content as {}", encoding.name());
    let (decoded, _used, _had_errors) = encoding.decode(bytes);
    decoded.into_owned()
}
