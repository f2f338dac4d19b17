//! Retrieval chunker configuration and intermediate plan types.

use anchorage_core::{CharSpan, ConfigError, EngineConfig};

use super::helpers::{floor_chars_for, window_chars_for};
use crate::tokens::{estimate_tokens, tokens_to_chars};

// ── Configuration ───────────────────────────────────────────────────────────

/// Layout-aware chunker. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalChunker {
    pub(crate) min_tokens: usize,
    pub(crate) target_tokens: usize,
    pub(crate) overlap_tokens: usize,
    pub(crate) token_to_char_ratio: f64,
    /// Width of a split window, estimated at `target_tokens`.
    pub(crate) window_chars: usize,
    /// Overlap between consecutive split windows, always below `window_chars`.
    pub(crate) overlap_chars: usize,
    /// Narrowest width that reaches `min_tokens`.
    pub(crate) floor_chars: usize,
}

impl RetrievalChunker {
    pub fn new(
        min_tokens: usize,
        target_tokens: usize,
        overlap_tokens: usize,
        token_to_char_ratio: f64,
    ) -> Result<Self, ConfigError> {
        if target_tokens == 0 {
            return Err(ConfigError::NonPositiveTarget);
        }
        if min_tokens > target_tokens {
            return Err(ConfigError::MinExceedsTarget {
                min: min_tokens,
                target: target_tokens,
            });
        }
        if overlap_tokens >= target_tokens {
            return Err(ConfigError::OverlapNotBelowTarget {
                overlap: overlap_tokens,
                target: target_tokens,
            });
        }
        if !token_to_char_ratio.is_finite() || token_to_char_ratio <= 0.0 {
            return Err(ConfigError::InvalidRatio(token_to_char_ratio));
        }

        let window_chars = window_chars_for(target_tokens, min_tokens, token_to_char_ratio);
        let overlap_chars = if overlap_tokens == 0 {
            0
        } else {
            tokens_to_chars(overlap_tokens, token_to_char_ratio).min(window_chars - 1)
        };

        Ok(Self {
            min_tokens,
            target_tokens,
            overlap_tokens,
            token_to_char_ratio,
            window_chars,
            overlap_chars,
            floor_chars: floor_chars_for(min_tokens, token_to_char_ratio),
        })
    }

    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            config.retrieval_min_tokens,
            config.retrieval_target_tokens,
            config.retrieval_overlap_tokens,
            config.token_to_char_ratio,
        )
    }

    pub fn min_tokens(&self) -> usize {
        self.min_tokens
    }

    pub fn target_tokens(&self) -> usize {
        self.target_tokens
    }

    pub fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }

    pub(crate) fn tokens(&self, span: CharSpan) -> usize {
        estimate_tokens(span.len(), self.token_to_char_ratio)
    }
}

// ── Plan ────────────────────────────────────────────────────────────────────

/// How a planned chunk came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DraftOrigin {
    /// One or more small regions, merged.
    Merged,
    /// A window cut from an oversized region.
    Window,
    /// An atomic region, emitted whole.
    Atomic,
}

/// A chunk before IDs, token counts and hashes are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Draft {
    pub span: CharSpan,
    pub region_type: String,
    pub origin: DraftOrigin,
}

/// Small regions accumulated while walking the layout.
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub span: CharSpan,
    pub region_type: String,
}

impl Pending {
    pub fn absorb(&mut self, span: CharSpan, region_type: &str) {
        self.span = self.span.union(&span);
        mix_region_type(&mut self.region_type, region_type);
    }
}

impl Draft {
    /// Grow a split window over a neighbouring fragment.
    pub fn absorb(&mut self, fragment: Pending) {
        self.span = self.span.union(&fragment.span);
        mix_region_type(&mut self.region_type, &fragment.region_type);
    }
}

fn mix_region_type(current: &mut String, other: &str) {
    if current != other {
        *current = MIXED_REGION_TYPE.to_string();
    }
}

/// Label for chunks merged from regions of different types.
pub(crate) const MIXED_REGION_TYPE: &str = "mixed";

/// Label for the single region used when the detector reports none.
pub(crate) const FALLBACK_REGION_TYPE: &str = "text";
