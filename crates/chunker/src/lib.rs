//! Dual chunking: a gap-free coverage sequence for anchoring facts and a
//! layout-aware retrieval sequence for embedding.
//!
//! The two chunkers are independent of each other. Both derive chunk IDs
//! from `(document_id, kind, sequence_index)`, so re-running on unchanged
//! input yields identical output.

pub mod coverage;
pub mod layout;
pub mod retrieval;
mod tokens;

pub use coverage::{verify_tiling, CoverageChunker};
pub use layout::detect_markdown_regions;
pub use retrieval::RetrievalChunker;
pub use tokens::{estimate_tokens, tokens_to_chars};
