//! Relations produced between chunks and facts.

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkId;
use crate::document::FactId;

/// Weighted link between a coverage chunk and a retrieval chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentEdge {
    pub coverage_chunk_id: ChunkId,
    pub retrieval_chunk_id: ChunkId,
    /// Always > 0.
    pub overlap_chars: usize,
    /// `overlap_chars / coverage chunk length`.
    pub overlap_ratio: f64,
}

/// A fact attached to the coverage chunk containing its start offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRelation {
    pub fact_id: FactId,
    pub coverage_chunk_id: ChunkId,
    /// Relative to the coverage chunk's `char_start`.
    pub span_start_rel: usize,
    /// Relative to the coverage chunk's `char_start`, clipped to the chunk
    /// length. See `char_end` for facts that run past the chunk.
    pub span_end_rel: usize,
    /// Absolute document offsets of the fact, never clipped.
    pub char_start: usize,
    pub char_end: usize,
    pub crosses_boundary: bool,
}

/// How much of a projected fact lies inside the retrieval chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Entirely inside the retrieval chunk.
    Contained,
    /// Partly inside; the relative span is clipped.
    Partial,
    /// Outside the chunk's range, reached through its coverage chunk's
    /// alignment. The relative span is empty.
    Adjacent,
}

/// A fact as seen from a retrieval chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedFact {
    pub fact_id: FactId,
    pub coverage_chunk_id: ChunkId,
    /// Relative to the retrieval chunk's `char_start`, clipped to its length.
    pub span_start_rel: usize,
    pub span_end_rel: usize,
    pub visibility: Visibility,
}
