//! Layout-aware retrieval chunking.
//!
//! Consumes the layout regions reported by the structure detector and emits
//! variable-size chunks sized for embedding:
//!
//! - atomic regions (tables, code) become exactly one chunk, whatever their size;
//! - regions over `target_tokens` are split into overlapping windows;
//! - smaller regions meeting `min_tokens` become one chunk each;
//! - fragments under `min_tokens` are merged into a neighbouring region, or
//!   into the nearest window of a neighbouring split region;
//! - fragments with no neighbour to join are dropped.
//!
//! Dropping is what leaves gaps in retrieval coverage. The coverage chunker
//! exists to compensate for them.

mod helpers;
mod strategies;
mod types;

pub use types::RetrievalChunker;
