//! Payload projection: the facts each retrieval chunk can see.
//!
//! A retrieval chunk inherits every fact anchored to any coverage chunk it
//! overlaps. The full fact set flows through (no filtering by position), with
//! spans re-expressed relative to the retrieval chunk and clipped to it.

use std::collections::{BTreeMap, HashMap, HashSet};

use anchorage_core::{
    AlignmentEdge, AnchorRelation, CharSpan, ChunkId, EngineError, ProjectedFact, RetrievalChunk,
    Visibility,
};
use tracing::debug;

/// Retrieval chunk id → facts visible from that chunk.
///
/// Holds an entry for every retrieval chunk, empty when nothing projects.
pub type PayloadMap = BTreeMap<ChunkId, Vec<ProjectedFact>>;

fn project_one(anchor: &AnchorRelation, chunk: &RetrievalChunk) -> ProjectedFact {
    let fact = CharSpan::new(anchor.char_start, anchor.char_end);
    let len = chunk.char_end - chunk.char_start;
    let rel = |offset: usize| offset.saturating_sub(chunk.char_start).min(len);

    let visibility = if fact.start >= chunk.char_start && fact.end <= chunk.char_end {
        Visibility::Contained
    } else if fact.overlap(&CharSpan::new(chunk.char_start, chunk.char_end)) > 0 {
        Visibility::Partial
    } else {
        Visibility::Adjacent
    };

    let (span_start_rel, span_end_rel) = match visibility {
        Visibility::Adjacent => {
            // Collapse to the nearer edge of the chunk.
            let edge = if fact.end <= chunk.char_start { 0 } else { len };
            (edge, edge)
        }
        _ => (rel(fact.start), rel(fact.end)),
    };

    ProjectedFact {
        fact_id: anchor.fact_id.clone(),
        coverage_chunk_id: anchor.coverage_chunk_id.clone(),
        span_start_rel,
        span_end_rel,
        visibility,
    }
}

/// Project anchored facts onto retrieval chunks through alignment edges.
///
/// Each list is ordered by absolute fact start, then fact id.
pub fn project_payloads(
    anchors: &[AnchorRelation],
    edges: &[AlignmentEdge],
    retrieval: &[RetrievalChunk],
) -> Result<PayloadMap, EngineError> {
    let mut chunks: HashMap<&str, &RetrievalChunk> = HashMap::with_capacity(retrieval.len());
    for chunk in retrieval {
        if chunks.insert(chunk.chunk_id.as_str(), chunk).is_some() {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: chunk.chunk_id.clone(),
                detail: "retrieval chunk id appears more than once".to_string(),
            });
        }
    }

    let mut coverage_of: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(edges.len());
    for edge in edges {
        let retrieval_id = edge.retrieval_chunk_id.as_str();
        let coverage_id = edge.coverage_chunk_id.as_str();
        if !chunks.contains_key(retrieval_id) {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: edge.retrieval_chunk_id.clone(),
                detail: format!("edge from {coverage_id} targets unknown retrieval chunk"),
            });
        }
        if !seen.insert((coverage_id, retrieval_id)) {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: edge.retrieval_chunk_id.clone(),
                detail: format!("duplicate edge from {coverage_id}"),
            });
        }
        coverage_of.entry(retrieval_id).or_default().push(coverage_id);
    }

    let mut anchored: HashMap<&str, Vec<&AnchorRelation>> = HashMap::new();
    for anchor in anchors {
        anchored
            .entry(anchor.coverage_chunk_id.as_str())
            .or_default()
            .push(anchor);
    }

    let mut payloads = PayloadMap::new();
    let mut projected_total = 0usize;
    for chunk in retrieval {
        let mut visible: Vec<(&AnchorRelation, ProjectedFact)> = coverage_of
            .get(chunk.chunk_id.as_str())
            .into_iter()
            .flatten()
            .filter_map(|coverage_id| anchored.get(coverage_id))
            .flatten()
            .map(|anchor| (*anchor, project_one(anchor, chunk)))
            .collect();
        visible.sort_by(|(a, _), (b, _)| {
            a.char_start
                .cmp(&b.char_start)
                .then_with(|| a.fact_id.cmp(&b.fact_id))
        });

        projected_total += visible.len();
        payloads.insert(
            chunk.chunk_id.clone(),
            visible.into_iter().map(|(_, fact)| fact).collect(),
        );
    }

    debug!(
        retrieval = retrieval.len(),
        anchors = anchors.len(),
        projected = projected_total,
        "payloads projected"
    );
    Ok(payloads)
}
