//! Linear fixed-width chunking that tiles the whole document.
//!
//! Coverage chunks are never embedded. They exist so every char offset of the
//! document belongs to exactly one chunk, which is what lets any extracted
//! fact be anchored.

use anchorage_core::{
    chunk_id, ChunkKind, CharSpan, ConfigError, CoverageChunk, DocumentText, EngineConfig,
    EngineError,
};
use tracing::debug;

use crate::tokens::tokens_to_chars;

/// Splits text into fixed-width, non-overlapping windows covering `[0, N)`.
#[derive(Debug, Clone, Copy)]
pub struct CoverageChunker {
    chunk_size_tokens: usize,
    token_to_char_ratio: f64,
    width_chars: usize,
}

impl CoverageChunker {
    pub fn new(chunk_size_tokens: usize, token_to_char_ratio: f64) -> Result<Self, ConfigError> {
        if chunk_size_tokens == 0 {
            return Err(ConfigError::NonPositiveChunkSize);
        }
        if !token_to_char_ratio.is_finite() || token_to_char_ratio <= 0.0 {
            return Err(ConfigError::InvalidRatio(token_to_char_ratio));
        }
        Ok(Self {
            chunk_size_tokens,
            token_to_char_ratio,
            width_chars: tokens_to_chars(chunk_size_tokens, token_to_char_ratio),
        })
    }

    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.coverage_chunk_size_tokens, config.token_to_char_ratio)
    }

    pub fn chunk_size_tokens(&self) -> usize {
        self.chunk_size_tokens
    }

    /// Window width in chars.
    pub fn width_chars(&self) -> usize {
        self.width_chars
    }

    pub fn generate(&self, text: &str, document_id: &str) -> Vec<CoverageChunk> {
        self.generate_indexed(&DocumentText::new(text), document_id)
    }

    /// Walk the text left to right. The last window holds the remainder and
    /// is never dropped. Empty text yields no chunks.
    pub fn generate_indexed(&self, text: &DocumentText<'_>, document_id: &str) -> Vec<CoverageChunk> {
        let n = text.char_len();
        let mut chunks = Vec::with_capacity(n.div_ceil(self.width_chars));
        let mut start = 0usize;

        while start < n {
            let end = (start + self.width_chars).min(n);
            let sequence_index = chunks.len();
            let span = CharSpan::new(start, end);
            chunks.push(CoverageChunk {
                chunk_id: chunk_id(document_id, ChunkKind::Coverage, sequence_index),
                document_id: document_id.to_string(),
                sequence_index,
                char_start: start,
                char_end: end,
                content_hash: text.span_hash(span),
            });
            start = end;
        }

        debug!(
            document_id,
            chars = n,
            width = self.width_chars,
            chunks = chunks.len(),
            "coverage chunks generated"
        );
        chunks
    }
}

/// Check that `chunks` tile `[0, n)` exactly: ordered, gapless, no overlap,
/// contiguous sequence indices.
pub fn verify_tiling(
    document_id: &str,
    chunks: &[CoverageChunk],
    n: usize,
) -> Result<(), EngineError> {
    let fail = |detail: String| EngineError::CoverageTiling {
        document_id: document_id.to_string(),
        detail,
    };

    if chunks.is_empty() {
        return if n == 0 {
            Ok(())
        } else {
            Err(fail(format!("no chunks for {n} chars")))
        };
    }

    let mut expected_start = 0usize;
    for (i, c) in chunks.iter().enumerate() {
        if c.sequence_index != i {
            return Err(fail(format!(
                "chunk {} has sequence_index {}, expected {}",
                c.chunk_id, c.sequence_index, i
            )));
        }
        if c.char_start != expected_start {
            return Err(fail(format!(
                "chunk {} starts at {}, expected {}",
                c.chunk_id, c.char_start, expected_start
            )));
        }
        if c.char_end <= c.char_start {
            return Err(fail(format!("chunk {} is empty", c.chunk_id)));
        }
        expected_start = c.char_end;
    }

    if expected_start != n {
        return Err(fail(format!("last chunk ends at {expected_start}, document has {n} chars")));
    }
    Ok(())
}
