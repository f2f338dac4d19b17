use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use anchorage_anchor::{AnchorResolution, PayloadMap};
use anchorage_core::{
    sha256_hex, AlignmentEdge, AnchorRelation, CoverageChunk, InvalidSpanError, RetrievalChunk,
};

/// Summary of one document's ingestion, for staleness and idempotence checks.
///
/// `output_digest` is a SHA-256 hex digest over the JSON of every produced
/// entity in output order. Two runs on the same input and configuration yield the same
/// digest. There is deliberately no timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionManifest {
    pub document_id: String,
    /// SHA-256 hex of the full document text.
    pub text_sha256: String,
    pub coverage_count: usize,
    pub retrieval_count: usize,
    pub edge_count: usize,
    pub anchor_count: usize,
    pub invalid_span_count: usize,
    pub unresolved_count: usize,
    pub output_digest: String,
    /// Schema version for forward compatibility.
    pub version: u32,
}

impl IngestionManifest {
    pub fn new(
        document_id: &str,
        text: &str,
        coverage: &[CoverageChunk],
        retrieval: &[RetrievalChunk],
        edges: &[AlignmentEdge],
        resolution: &AnchorResolution,
        payloads: &PayloadMap,
    ) -> serde_json::Result<Self> {
        let output_digest = compute_output_digest(&DigestInput {
            document_id,
            coverage_chunks: coverage,
            retrieval_chunks: retrieval,
            alignment_edges: edges,
            anchor_relations: &resolution.relations,
            invalid_spans: &resolution.invalid_spans,
            unresolved_facts: resolution.unresolved,
            payloads,
        })?;
        Ok(Self {
            document_id: document_id.to_string(),
            text_sha256: sha256_hex(text.as_bytes()),
            coverage_count: coverage.len(),
            retrieval_count: retrieval.len(),
            edge_count: edges.len(),
            anchor_count: resolution.relations.len(),
            invalid_span_count: resolution.invalid_spans.len(),
            unresolved_count: resolution.unresolved,
            output_digest,
            version: 1,
        })
    }

    /// Whether `text` is the text this manifest was produced from.
    pub fn is_fresh(&self, text: &str) -> bool {
        self.text_sha256 == sha256_hex(text.as_bytes())
    }
}

/// Everything a document's ingestion produces, minus the manifest itself.
#[derive(Serialize)]
struct DigestInput<'a> {
    document_id: &'a str,
    coverage_chunks: &'a [CoverageChunk],
    retrieval_chunks: &'a [RetrievalChunk],
    alignment_edges: &'a [AlignmentEdge],
    anchor_relations: &'a [AnchorRelation],
    invalid_spans: &'a [InvalidSpanError],
    unresolved_facts: usize,
    payloads: &'a PayloadMap,
}

fn compute_output_digest(input: &DigestInput<'_>) -> serde_json::Result<String> {
    let json = serde_json::to_vec(input)?;
    Ok(format!("{:x}", Sha256::digest(&json)))
}
