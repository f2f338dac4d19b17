//! Coverage ↔ retrieval alignment by character-range overlap.
//!
//! Every pair whose ranges share at least one char gets an edge. Touching
//! ranges (`a.end == b.start`) share none and get no edge. There is no top-N
//! truncation: projection downstream must see every relation.

use std::collections::{HashMap, HashSet};

use anchorage_core::{
    AlignmentEdge, CharRange, CharSpan, CoverageChunk, EngineError, RetrievalChunk,
};
use tracing::debug;

/// One positive overlap between `left[left_index]` and `right[right_index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub left_index: usize,
    pub right_index: usize,
    pub chars: usize,
}

/// All positive overlaps between two chunk lists, ordered by
/// `(left_index, right_index)`.
///
/// When `left` is pairwise disjoint (always true for coverage chunks) this is
/// a sorted sweep in O((L + R) log L + E). Otherwise it falls back to the
/// plain double loop.
pub fn overlap_pairs<L: CharRange, R: CharRange>(left: &[L], right: &[R]) -> Vec<Overlap> {
    let mut order: Vec<usize> = (0..left.len()).collect();
    order.sort_by_key(|&i| (left[i].char_start(), left[i].char_end()));
    let disjoint = order
        .windows(2)
        .all(|w| left[w[0]].char_end() <= left[w[1]].char_start());

    let mut out = Vec::new();
    if disjoint {
        for (right_index, r) in right.iter().enumerate() {
            let span = r.span();
            // Ends are sorted too, so skip everything ending at or before span.start.
            let first = order.partition_point(|&i| left[i].char_end() <= span.start);
            for &left_index in &order[first..] {
                let l = &left[left_index];
                if l.char_start() >= span.end {
                    break;
                }
                let chars = l.span().overlap(&span);
                if chars > 0 {
                    out.push(Overlap {
                        left_index,
                        right_index,
                        chars,
                    });
                }
            }
        }
    } else {
        for (left_index, l) in left.iter().enumerate() {
            for (right_index, r) in right.iter().enumerate() {
                let chars = l.span().overlap(&r.span());
                if chars > 0 {
                    out.push(Overlap {
                        left_index,
                        right_index,
                        chars,
                    });
                }
            }
        }
    }

    out.sort_by_key(|o| (o.left_index, o.right_index));
    out
}

/// Build alignment edges between a document's coverage and retrieval chunks.
///
/// Edges are ordered by coverage position, then retrieval position.
pub fn build_alignment(
    coverage: &[CoverageChunk],
    retrieval: &[RetrievalChunk],
) -> Vec<AlignmentEdge> {
    let edges: Vec<AlignmentEdge> = overlap_pairs(coverage, retrieval)
        .into_iter()
        .map(|o| {
            let c = &coverage[o.left_index];
            let r = &retrieval[o.right_index];
            AlignmentEdge {
                coverage_chunk_id: c.chunk_id.clone(),
                retrieval_chunk_id: r.chunk_id.clone(),
                overlap_chars: o.chars,
                overlap_ratio: o.chars as f64 / c.char_len() as f64,
            }
        })
        .collect();

    debug!(
        coverage = coverage.len(),
        retrieval = retrieval.len(),
        edges = edges.len(),
        "alignment built"
    );
    edges
}

fn index_spans<'a, C: CharRange>(
    chunks: &'a [C],
) -> Result<HashMap<&'a str, CharSpan>, EngineError> {
    let mut index = HashMap::with_capacity(chunks.len());
    for c in chunks {
        if index.insert(c.chunk_id(), c.span()).is_some() {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: c.chunk_id().to_string(),
                detail: "chunk id appears more than once".to_string(),
            });
        }
    }
    Ok(index)
}

/// Check that every edge refers to known chunks and records the overlap those
/// chunks actually have.
pub fn validate_edges(
    edges: &[AlignmentEdge],
    coverage: &[CoverageChunk],
    retrieval: &[RetrievalChunk],
) -> Result<(), EngineError> {
    let coverage_spans = index_spans(coverage)?;
    let retrieval_spans = index_spans(retrieval)?;
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(edges.len());

    for edge in edges {
        let Some(c) = coverage_spans.get(edge.coverage_chunk_id.as_str()) else {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: edge.coverage_chunk_id.clone(),
                detail: "edge references unknown coverage chunk".to_string(),
            });
        };
        let Some(r) = retrieval_spans.get(edge.retrieval_chunk_id.as_str()) else {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: edge.retrieval_chunk_id.clone(),
                detail: "edge references unknown retrieval chunk".to_string(),
            });
        };
        if !seen.insert((edge.coverage_chunk_id.as_str(), edge.retrieval_chunk_id.as_str())) {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: edge.retrieval_chunk_id.clone(),
                detail: format!("duplicate edge from {}", edge.coverage_chunk_id),
            });
        }
        let actual = c.overlap(r);
        if actual == 0 || actual != edge.overlap_chars {
            return Err(EngineError::AlignmentInconsistency {
                chunk_id: edge.retrieval_chunk_id.clone(),
                detail: format!(
                    "edge from {} records overlap {} but ranges {} and {} overlap by {}",
                    edge.coverage_chunk_id, edge.overlap_chars, c, r, actual
                ),
            });
        }
    }
    Ok(())
}
