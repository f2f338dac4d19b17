use serde::{Deserialize, Serialize};

use crate::interval::CharSpan;

/// Document identifier supplied by the caller.
pub type DocumentId = String;

/// Deterministic chunk identifier, `{document_id}::{kind}::{sequence_index}`.
pub type ChunkId = String;

/// Which chunk sequence a chunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkKind {
    Coverage,
    Retrieval,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Coverage => "coverage",
            ChunkKind::Retrieval => "retrieval",
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the stable ID for a chunk. Same inputs, same ID, every run.
pub fn chunk_id(document_id: &str, kind: ChunkKind, sequence_index: usize) -> ChunkId {
    format!("{}::{}::{}", document_id, kind, sequence_index)
}

/// Common view over both chunk kinds, used by alignment.
pub trait CharRange {
    fn chunk_id(&self) -> &str;
    fn char_start(&self) -> usize;
    fn char_end(&self) -> usize;

    fn span(&self) -> CharSpan {
        CharSpan::new(self.char_start(), self.char_end())
    }

    fn char_len(&self) -> usize {
        self.char_end() - self.char_start()
    }
}

// ── Coverage ────────────────────────────────────────────────────────────────

/// Gap-free linear segment used as the proof unit for anchors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageChunk {
    pub chunk_id: ChunkId,
    pub document_id: DocumentId,
    /// 0-based, gapless.
    pub sequence_index: usize,
    pub char_start: usize,
    pub char_end: usize,
    /// SHA-256 hex of the chunk text.
    pub content_hash: String,
}

impl CharRange for CoverageChunk {
    fn chunk_id(&self) -> &str {
        &self.chunk_id
    }
    fn char_start(&self) -> usize {
        self.char_start
    }
    fn char_end(&self) -> usize {
        self.char_end
    }
}

// ── Retrieval ───────────────────────────────────────────────────────────────

/// Layout-aware, search-optimized segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalChunk {
    pub chunk_id: ChunkId,
    pub document_id: DocumentId,
    pub sequence_index: usize,
    pub char_start: usize,
    pub char_end: usize,
    /// Estimated token count (chars / token_to_char_ratio, rounded up).
    pub token_count: usize,
    /// Wraps a structural unit that was not split; exempt from the size floor.
    pub is_atomic: bool,
    pub region_type: String,
    /// SHA-256 hex of the chunk text.
    pub content_hash: String,
}

impl CharRange for RetrievalChunk {
    fn chunk_id(&self) -> &str {
        &self.chunk_id
    }
    fn char_start(&self) -> usize {
        self.char_start
    }
    fn char_end(&self) -> usize {
        self.char_end
    }
}
