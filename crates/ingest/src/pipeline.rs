//! Per-document ingestion in dependency order, plus parallel batches.
//!
//! ```text
//! coverage ──┬── anchors ───────┐
//!            │                  ├── alignment ── projection ── manifest
//! retrieval ─┴──────────────────┘
//! ```
//!
//! Coverage runs first; retrieval chunking and anchor resolution then run
//! concurrently since neither needs the other's output.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use anchorage_anchor::{
    build_alignment, project_payloads, resolve_anchors_with_len, validate_edges, PayloadMap,
};
use anchorage_chunker::{detect_markdown_regions, verify_tiling, CoverageChunker, RetrievalChunker};
use anchorage_core::{
    AlignmentEdge, AnchorRelation, ConfigError, CoverageChunk, DocumentInput, DocumentText,
    EngineConfig, EngineError, InvalidSpanError, LayoutRegion, RetrievalChunk,
};

use crate::manifest::IngestionManifest;

/// Everything produced for one document. Either all of it or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentIngestion {
    pub document_id: String,
    pub coverage_chunks: Vec<CoverageChunk>,
    pub retrieval_chunks: Vec<RetrievalChunk>,
    pub alignment_edges: Vec<AlignmentEdge>,
    pub anchor_relations: Vec<AnchorRelation>,
    pub invalid_spans: Vec<InvalidSpanError>,
    pub unresolved_facts: usize,
    pub payloads: PayloadMap,
    pub manifest: IngestionManifest,
}

/// Result for one document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Ingested(Box<DocumentIngestion>),
    Failed {
        document_id: String,
        kind: String,
        message: String,
    },
}

impl DocumentOutcome {
    pub fn document_id(&self) -> &str {
        match self {
            DocumentOutcome::Ingested(ingestion) => &ingestion.document_id,
            DocumentOutcome::Failed { document_id, .. } => document_id,
        }
    }

    pub fn is_ingested(&self) -> bool {
        matches!(self, DocumentOutcome::Ingested(_))
    }
}

/// Stateless document processor built from a validated configuration.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    config: EngineConfig,
    coverage: CoverageChunker,
    retrieval: RetrievalChunker,
    detect_layout: bool,
}

impl DocumentPipeline {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            coverage: CoverageChunker::from_config(config)?,
            retrieval: RetrievalChunker::from_config(config)?,
            detect_layout: false,
        })
    }

    /// Run markdown layout detection for documents that arrive without
    /// layout regions.
    pub fn with_layout_detection(mut self, enabled: bool) -> Self {
        self.detect_layout = enabled;
        self
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Ingest one document. The first fatal error abandons it.
    pub fn process(&self, input: &DocumentInput) -> Result<DocumentIngestion, EngineError> {
        let started = Instant::now();
        let document_id = input.document_id.as_str();
        let text = DocumentText::new(&input.text);
        let n = text.char_len();

        let coverage = self.coverage.generate_indexed(&text, document_id);
        verify_tiling(document_id, &coverage, n)?;

        let detected: Vec<LayoutRegion>;
        let regions: &[LayoutRegion] = if input.layout_regions.is_empty() && self.detect_layout {
            detected = detect_markdown_regions(&input.text);
            debug!(document_id, regions = detected.len(), "layout regions detected");
            &detected
        } else {
            &input.layout_regions
        };

        let (retrieval, resolution) = rayon::join(
            || self.retrieval.generate_indexed(&text, document_id, regions),
            || resolve_anchors_with_len(document_id, &input.facts, &coverage, n),
        );
        let resolution = resolution?;

        let edges = build_alignment(&coverage, &retrieval);
        validate_edges(&edges, &coverage, &retrieval)?;
        let payloads = project_payloads(&resolution.relations, &edges, &retrieval)?;

        let manifest = IngestionManifest::new(
            document_id,
            &input.text,
            &coverage,
            &retrieval,
            &edges,
            &resolution,
            &payloads,
        )
        .map_err(|e| EngineError::Manifest {
            document_id: input.document_id.clone(),
            detail: e.to_string(),
        })?;

        info!(
            document_id,
            chars = n,
            coverage = coverage.len(),
            retrieval = retrieval.len(),
            edges = edges.len(),
            anchors = resolution.relations.len(),
            invalid_spans = resolution.invalid_spans.len(),
            unresolved = resolution.unresolved,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "document ingested"
        );

        Ok(DocumentIngestion {
            document_id: input.document_id.clone(),
            coverage_chunks: coverage,
            retrieval_chunks: retrieval,
            alignment_edges: edges,
            anchor_relations: resolution.relations,
            invalid_spans: resolution.invalid_spans,
            unresolved_facts: resolution.unresolved,
            payloads,
            manifest,
        })
    }

    /// Ingest documents in parallel. Outcomes come back in input order and a
    /// failed document does not affect the others.
    pub fn process_batch(&self, inputs: &[DocumentInput]) -> Vec<DocumentOutcome> {
        let outcomes: Vec<DocumentOutcome> = inputs
            .par_iter()
            .map(|input| match self.process(input) {
                Ok(ingestion) => DocumentOutcome::Ingested(Box::new(ingestion)),
                Err(e) => {
                    error!(
                        document_id = %input.document_id,
                        kind = e.kind(),
                        error = %e,
                        "document abandoned"
                    );
                    DocumentOutcome::Failed {
                        document_id: input.document_id.clone(),
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    }
                }
            })
            .collect();

        let ingested = outcomes.iter().filter(|o| o.is_ingested()).count();
        info!(
            documents = inputs.len(),
            ingested,
            failed = inputs.len() - ingested,
            "batch complete"
        );
        outcomes
    }
}
