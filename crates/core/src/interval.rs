//! Half-open character intervals.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range of char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Number of chars shared by both spans. Touching spans share none.
    pub fn overlap(&self, other: &CharSpan) -> usize {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }

    /// Smallest span covering both.
    pub fn union(&self, other: &CharSpan) -> CharSpan {
        CharSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Clamp into `[0, limit)`.
    pub fn clamp_to(&self, limit: usize) -> CharSpan {
        let end = self.end.min(limit);
        CharSpan {
            start: self.start.min(end),
            end,
        }
    }
}

impl std::fmt::Display for CharSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
