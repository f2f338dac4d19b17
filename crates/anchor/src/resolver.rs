//! Fact → coverage chunk anchoring.
//!
//! A fact belongs to the coverage chunk that contains its start offset. Since
//! coverage tiles the document, every valid start has exactly one owner; a
//! missing owner means the tiling is broken and the document is abandoned.

use anchorage_core::{
    AnchorRelation, AnchorStatus, CoverageChunk, EngineError, ExtractedFact, InvalidSpanError,
    InvalidSpanReason,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Result of anchoring one document's facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorResolution {
    /// One relation per valid `Span` fact, in input order.
    pub relations: Vec<AnchorRelation>,
    /// Facts refused because of malformed offsets.
    pub invalid_spans: Vec<InvalidSpanError>,
    /// `Unresolved` facts, skipped without error.
    pub unresolved: usize,
}

fn check_span(fact: &ExtractedFact, doc_chars: usize) -> Option<InvalidSpanReason> {
    if fact.char_start < 0 {
        Some(InvalidSpanReason::NegativeStart)
    } else if fact.char_end <= fact.char_start {
        Some(InvalidSpanReason::EmptyOrInverted)
    } else if fact.char_end > doc_chars as i64 {
        Some(InvalidSpanReason::EndBeyondDocument)
    } else {
        None
    }
}

/// Anchor facts against coverage chunks, taking the document length from the
/// end of the last chunk.
pub fn resolve_anchors(
    document_id: &str,
    facts: &[ExtractedFact],
    coverage: &[CoverageChunk],
) -> Result<AnchorResolution, EngineError> {
    let doc_chars = coverage.last().map(|c| c.char_end).unwrap_or(0);
    resolve_anchors_with_len(document_id, facts, coverage, doc_chars)
}

/// Anchor facts against coverage chunks of a document `doc_chars` long.
///
/// `coverage` must be ordered by position. Passing the real length lets a
/// truncated chunk list surface as a coverage gap instead of silently
/// turning facts into invalid spans.
pub fn resolve_anchors_with_len(
    document_id: &str,
    facts: &[ExtractedFact],
    coverage: &[CoverageChunk],
    doc_chars: usize,
) -> Result<AnchorResolution, EngineError> {
    let mut resolution = AnchorResolution::default();

    for fact in facts {
        if fact.anchor_status == AnchorStatus::Unresolved {
            debug!(document_id, fact_id = %fact.fact_id, "skipping unresolved fact");
            resolution.unresolved += 1;
            continue;
        }

        if let Some(reason) = check_span(fact, doc_chars) {
            warn!(
                document_id,
                fact_id = %fact.fact_id,
                start = fact.char_start,
                end = fact.char_end,
                doc_chars,
                %reason,
                "invalid fact span"
            );
            resolution.invalid_spans.push(InvalidSpanError {
                fact_id: fact.fact_id.clone(),
                char_start: fact.char_start,
                char_end: fact.char_end,
                reason,
            });
            continue;
        }

        // Both offsets are non-negative and within the document here.
        let start = fact.char_start as usize;
        let end = fact.char_end as usize;

        let idx = coverage.partition_point(|c| c.char_start <= start);
        let owner = idx
            .checked_sub(1)
            .map(|i| &coverage[i])
            .filter(|c| start < c.char_end);
        let Some(owner) = owner else {
            error!(document_id, fact_id = %fact.fact_id, start, "no coverage chunk owns fact start");
            return Err(EngineError::CoverageGap {
                document_id: document_id.to_string(),
                fact_id: fact.fact_id.clone(),
                char_start: fact.char_start,
            });
        };

        let crosses_boundary = end > owner.char_end;
        if crosses_boundary {
            debug!(
                document_id,
                fact_id = %fact.fact_id,
                chunk_id = %owner.chunk_id,
                "fact runs past its coverage chunk"
            );
        }

        resolution.relations.push(AnchorRelation {
            fact_id: fact.fact_id.clone(),
            coverage_chunk_id: owner.chunk_id.clone(),
            span_start_rel: start - owner.char_start,
            span_end_rel: end.min(owner.char_end) - owner.char_start,
            char_start: start,
            char_end: end,
            crosses_boundary,
        });
    }

    debug!(
        document_id,
        anchored = resolution.relations.len(),
        invalid = resolution.invalid_spans.len(),
        unresolved = resolution.unresolved,
        "anchors resolved"
    );
    Ok(resolution)
}
