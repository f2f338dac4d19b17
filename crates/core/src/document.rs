use serde::{Deserialize, Serialize};

use crate::chunk::DocumentId;
use crate::interval::CharSpan;

/// Identifier assigned to a fact by the extraction stage.
pub type FactId = String;

/// A structural region reported by the layout detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRegion {
    pub char_start: usize,
    pub char_end: usize,
    /// Free-form label ("paragraph", "table", "heading", ...).
    pub region_type: String,
    /// Must not be split (tables, code blocks).
    #[serde(default)]
    pub is_atomic: bool,
}

impl LayoutRegion {
    pub fn new(char_start: usize, char_end: usize, region_type: &str, is_atomic: bool) -> Self {
        Self {
            char_start,
            char_end,
            region_type: region_type.to_string(),
            is_atomic,
        }
    }

    pub fn span(&self) -> CharSpan {
        CharSpan::new(self.char_start, self.char_end)
    }
}

/// Whether the extractor located the fact verbatim in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorStatus {
    /// Found verbatim; carries a character range.
    Span,
    /// Not found; nothing to anchor.
    Unresolved,
}

impl std::fmt::Display for AnchorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnchorStatus::Span => write!(f, "Span"),
            AnchorStatus::Unresolved => write!(f, "Unresolved"),
        }
    }
}

/// A fact produced by the extraction stage.
///
/// Offsets are absolute document char offsets as claimed upstream. They are
/// signed so malformed negative offsets survive deserialization and get
/// reported as invalid spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFact {
    pub fact_id: FactId,
    #[serde(default)]
    pub char_start: i64,
    #[serde(default)]
    pub char_end: i64,
    pub anchor_status: AnchorStatus,
}

impl ExtractedFact {
    pub fn span(fact_id: &str, char_start: i64, char_end: i64) -> Self {
        Self {
            fact_id: fact_id.to_string(),
            char_start,
            char_end,
            anchor_status: AnchorStatus::Span,
        }
    }

    pub fn unresolved(fact_id: &str) -> Self {
        Self {
            fact_id: fact_id.to_string(),
            char_start: 0,
            char_end: 0,
            anchor_status: AnchorStatus::Unresolved,
        }
    }
}

/// Everything the engine needs to ingest one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub document_id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub layout_regions: Vec<LayoutRegion>,
    #[serde(default)]
    pub facts: Vec<ExtractedFact>,
}

impl DocumentInput {
    pub fn new(document_id: &str, text: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            text: text.to_string(),
            layout_regions: Vec::new(),
            facts: Vec::new(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<LayoutRegion>) -> Self {
        self.layout_regions = regions;
        self
    }

    pub fn with_facts(mut self, facts: Vec<ExtractedFact>) -> Self {
        self.facts = facts;
        self
    }
}
