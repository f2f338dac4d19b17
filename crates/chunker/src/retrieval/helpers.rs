//! Region normalization and window splitting used by the retrieval strategy.

use anchorage_core::{CharSpan, LayoutRegion};
use tracing::warn;

use super::types::FALLBACK_REGION_TYPE;
use crate::tokens::estimate_tokens;

/// Widest window whose estimated token count stays within `target_tokens`,
/// widened if needed so it still reaches `min_tokens`.
pub(crate) fn window_chars_for(
    target_tokens: usize,
    min_tokens: usize,
    token_to_char_ratio: f64,
) -> usize {
    let mut width = ((target_tokens as f64) * token_to_char_ratio).floor().max(1.0) as usize;
    while width > 1 && estimate_tokens(width, token_to_char_ratio) > target_tokens {
        width -= 1;
    }
    while estimate_tokens(width + 1, token_to_char_ratio) <= target_tokens {
        width += 1;
    }
    while estimate_tokens(width, token_to_char_ratio) < min_tokens {
        width += 1;
    }
    width
}

/// Clamp regions to `[0, n)`, drop empty ones and order them by position.
///
/// With no usable regions the whole document becomes one plain-text region.
pub(crate) fn normalize_regions(
    document_id: &str,
    regions: &[LayoutRegion],
    n: usize,
) -> Vec<LayoutRegion> {
    let mut out: Vec<LayoutRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        let span = region.span().clamp_to(n);
        if span.is_empty() {
            warn!(
                document_id,
                start = region.char_start,
                end = region.char_end,
                region_type = %region.region_type,
                "dropping empty or out-of-range layout region"
            );
            continue;
        }
        if span != region.span() {
            warn!(
                document_id,
                start = region.char_start,
                end = region.char_end,
                doc_chars = n,
                "clamping layout region to document bounds"
            );
        }
        out.push(LayoutRegion {
            char_start: span.start,
            char_end: span.end,
            region_type: region.region_type.clone(),
            is_atomic: region.is_atomic,
        });
    }

    if regions.is_empty() && n > 0 {
        out.push(LayoutRegion::new(0, n, FALLBACK_REGION_TYPE, false));
    }

    out.sort_by_key(|r| (r.char_start, r.char_end));
    out
}

/// Cut `span` into windows of `window` chars overlapping by `overlap` chars.
///
/// The final window ends at the span end. When it would add fewer than
/// `floor` new chars it is folded into the window before it instead, so a
/// window may run up to `floor` chars past `window`.
pub(crate) fn split_windows(
    span: CharSpan,
    window: usize,
    overlap: usize,
    floor: usize,
) -> Vec<CharSpan> {
    if span.len() <= window {
        return vec![span];
    }
    let step = window.saturating_sub(overlap).max(1);
    let mut windows: Vec<CharSpan> = Vec::new();
    let mut start = span.start;
    while start + window < span.end {
        windows.push(CharSpan::new(start, start + window));
        start += step;
    }

    let covered = windows.last().map_or(span.start, |w| w.end);
    match windows.last_mut() {
        Some(prev) if span.end - covered < floor => prev.end = span.end,
        _ => windows.push(CharSpan::new(start, span.end)),
    }
    windows
}

/// Narrowest width whose estimated token count reaches `min_tokens`.
pub(crate) fn floor_chars_for(min_tokens: usize, token_to_char_ratio: f64) -> usize {
    let mut width = (((min_tokens as f64) - 1.0) * token_to_char_ratio)
        .floor()
        .max(0.0) as usize;
    while estimate_tokens(width, token_to_char_ratio) < min_tokens {
        width += 1;
    }
    width
}
