//! Positional relations between chunk sequences and extracted facts.
//!
//! - [`alignment`]: coverage ↔ retrieval overlap edges.
//! - [`resolver`]: fact span → owning coverage chunk.
//! - [`projector`]: anchors projected through alignment onto retrieval chunks.

pub mod alignment;
pub mod projector;
pub mod resolver;

pub use alignment::{build_alignment, validate_edges};
pub use projector::{project_payloads, PayloadMap};
pub use resolver::{resolve_anchors, resolve_anchors_with_len, AnchorResolution};
