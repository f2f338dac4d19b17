//! The region walk: atomic passthrough, oversized splitting, small-region merging.
//!
//! A fragment under the floor beside an oversized region is folded into the
//! nearest split window rather than dropped.

use anchorage_core::{chunk_id, CharSpan, ChunkKind, DocumentText, LayoutRegion, RetrievalChunk};
use tracing::debug;

use super::helpers::{normalize_regions, split_windows};
use super::types::{Draft, DraftOrigin, Pending, RetrievalChunker};

impl RetrievalChunker {
    /// Chunk `text` guided by `layout_regions`.
    ///
    /// Every emitted chunk has `token_count >= min_tokens` unless it is atomic.
    pub fn generate(
        &self,
        text: &str,
        document_id: &str,
        layout_regions: &[LayoutRegion],
    ) -> Vec<RetrievalChunk> {
        self.generate_indexed(&DocumentText::new(text), document_id, layout_regions)
    }

    pub fn generate_indexed(
        &self,
        text: &DocumentText<'_>,
        document_id: &str,
        layout_regions: &[LayoutRegion],
    ) -> Vec<RetrievalChunk> {
        let regions = normalize_regions(document_id, layout_regions, text.char_len());
        let drafts = self.plan(document_id, &regions);

        let chunks: Vec<RetrievalChunk> = drafts
            .into_iter()
            .enumerate()
            .map(|(sequence_index, draft)| RetrievalChunk {
                chunk_id: chunk_id(document_id, ChunkKind::Retrieval, sequence_index),
                document_id: document_id.to_string(),
                sequence_index,
                char_start: draft.span.start,
                char_end: draft.span.end,
                token_count: self.tokens(draft.span),
                is_atomic: draft.origin == DraftOrigin::Atomic,
                region_type: draft.region_type,
                content_hash: text.span_hash(draft.span),
            })
            .collect();

        debug!(
            document_id,
            regions = regions.len(),
            chunks = chunks.len(),
            "retrieval chunks generated"
        );
        chunks
    }

    /// Walk normalized regions in order and decide the chunk spans.
    pub(crate) fn plan(&self, document_id: &str, regions: &[LayoutRegion]) -> Vec<Draft> {
        let mut drafts: Vec<Draft> = Vec::new();
        let mut pending: Option<Pending> = None;

        for region in regions {
            let span = region.span();

            if region.is_atomic {
                self.flush(document_id, &mut pending, &mut drafts);
                drafts.push(Draft {
                    span,
                    region_type: region.region_type.clone(),
                    origin: DraftOrigin::Atomic,
                });
                continue;
            }

            if self.tokens(span) > self.target_tokens {
                let mut lead = match pending.take() {
                    Some(p) if self.tokens(p.span) < self.min_tokens => Some(p),
                    other => {
                        pending = other;
                        self.flush(document_id, &mut pending, &mut drafts);
                        None
                    }
                };
                let windows =
                    split_windows(span, self.window_chars, self.overlap_chars, self.floor_chars);
                for window in windows {
                    let mut draft = Draft {
                        span: window,
                        region_type: region.region_type.clone(),
                        origin: DraftOrigin::Window,
                    };
                    // Only the first window takes the fragment.
                    if let Some(fragment) = lead.take() {
                        draft.absorb(fragment);
                    }
                    drafts.push(draft);
                }
                continue;
            }

            let absorbed = match pending.as_mut() {
                Some(p) if self.should_absorb(p.span, span) => {
                    p.absorb(span, &region.region_type);
                    true
                }
                _ => false,
            };
            if !absorbed {
                self.flush(document_id, &mut pending, &mut drafts);
                pending = Some(Pending {
                    span,
                    region_type: region.region_type.clone(),
                });
            }
        }
        self.flush(document_id, &mut pending, &mut drafts);
        drafts
    }

    /// A region that meets the floor stays its own chunk. A fragment under
    /// the floor joins its neighbour, preceding or following, provided the
    /// result stays within `target_tokens + min_tokens`.
    fn should_absorb(&self, group: CharSpan, next: CharSpan) -> bool {
        let group_short = self.tokens(group) < self.min_tokens;
        let next_short = self.tokens(next) < self.min_tokens;
        (group_short || next_short)
            && self.tokens(group.union(&next)) <= self.target_tokens + self.min_tokens
    }

    /// Emit the pending merge group. A group still under the floor is folded
    /// into a split window directly before it, and otherwise dropped: with
    /// neither neighbour able to take it, it is isolated.
    fn flush(&self, document_id: &str, pending: &mut Option<Pending>, drafts: &mut Vec<Draft>) {
        let Some(p) = pending.take() else {
            return;
        };

        if self.tokens(p.span) >= self.min_tokens {
            drafts.push(Draft {
                span: p.span,
                region_type: p.region_type,
                origin: DraftOrigin::Merged,
            });
            return;
        }

        if let Some(window) = drafts
            .last_mut()
            .filter(|d| d.origin == DraftOrigin::Window)
        {
            window.absorb(p);
            return;
        }

        debug!(
            document_id,
            start = p.span.start,
            end = p.span.end,
            tokens = self.tokens(p.span),
            min_tokens = self.min_tokens,
            "dropping isolated fragment below token floor"
        );
    }
}
