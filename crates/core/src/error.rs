use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::{ChunkId, DocumentId};
use crate::document::FactId;

/// Rejected configuration. Raised before any chunking starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("coverage_chunk_size_tokens must be > 0")]
    NonPositiveChunkSize,

    #[error("coverage_overlap_tokens must be 0 (got {0}); coverage chunks never overlap")]
    CoverageOverlap(usize),

    #[error("retrieval_target_tokens must be > 0")]
    NonPositiveTarget,

    #[error("retrieval_min_tokens ({min}) must not exceed retrieval_target_tokens ({target})")]
    MinExceedsTarget { min: usize, target: usize },

    #[error("retrieval_overlap_tokens ({overlap}) must be below retrieval_target_tokens ({target})")]
    OverlapNotBelowTarget { overlap: usize, target: usize },

    #[error("token_to_char_ratio must be a finite positive number (got {0})")]
    InvalidRatio(f64),
}

/// Why a fact's claimed span was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidSpanReason {
    NegativeStart,
    EndBeyondDocument,
    EmptyOrInverted,
}

impl std::fmt::Display for InvalidSpanReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidSpanReason::NegativeStart => write!(f, "start is negative"),
            InvalidSpanReason::EndBeyondDocument => write!(f, "end is beyond the document"),
            InvalidSpanReason::EmptyOrInverted => write!(f, "end is not after start"),
        }
    }
}

/// A malformed fact span from the extraction stage.
///
/// Recorded per fact; the fact is skipped and the batch continues.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid span for fact {fact_id} [{char_start}, {char_end}): {reason}")]
pub struct InvalidSpanError {
    pub fact_id: FactId,
    pub char_start: i64,
    pub char_end: i64,
    pub reason: InvalidSpanReason,
}

/// Fatal, per-document failures. Any of these abandons the document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("coverage gap in document {document_id}: no coverage chunk owns offset {char_start} (fact {fact_id})")]
    CoverageGap {
        document_id: DocumentId,
        fact_id: FactId,
        char_start: i64,
    },

    #[error("coverage tiling broken in document {document_id}: {detail}")]
    CoverageTiling {
        document_id: DocumentId,
        detail: String,
    },

    #[error("alignment inconsistency for chunk {chunk_id}: {detail}")]
    AlignmentInconsistency { chunk_id: ChunkId, detail: String },

    #[error("failed to build ingestion manifest for document {document_id}: {detail}")]
    Manifest {
        document_id: DocumentId,
        detail: String,
    },
}

impl EngineError {
    /// Short machine-readable label, used in reports and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Configuration(_) => "ConfigurationError",
            EngineError::CoverageGap { .. } => "CoverageGapError",
            EngineError::CoverageTiling { .. } => "CoverageTilingError",
            EngineError::AlignmentInconsistency { .. } => "AlignmentInconsistencyError",
            EngineError::Manifest { .. } => "ManifestError",
        }
    }
}
