//! Char-offset view over a UTF-8 document body.

use sha2::{Digest, Sha256};

use crate::interval::CharSpan;

/// Document text with a precomputed char → byte boundary table.
///
/// All engine positions are char offsets; this makes slicing by them O(1).
#[derive(Debug, Clone)]
pub struct DocumentText<'a> {
    text: &'a str,
    /// Byte offset of every char, plus `text.len()` as the final entry.
    boundaries: Vec<usize>,
}

impl<'a> DocumentText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    /// Document length `N` in chars.
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Text of a char span. Out-of-range ends are clamped.
    pub fn slice(&self, span: CharSpan) -> &'a str {
        let span = span.clamp_to(self.char_len());
        &self.text[self.boundaries[span.start]..self.boundaries[span.end]]
    }

    /// SHA-256 hex digest of a span's text.
    pub fn span_hash(&self, span: CharSpan) -> String {
        sha256_hex(self.slice(span).as_bytes())
    }
}

/// SHA-256 hex digest of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}
