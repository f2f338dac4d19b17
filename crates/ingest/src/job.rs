//! JSON job files in, JSON reports out.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use anchorage_core::{DocumentInput, EngineConfig};

use crate::pipeline::{DocumentOutcome, DocumentPipeline};

/// A batch of documents to ingest, optionally with its own configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestJob {
    /// Overrides the environment-derived configuration when present.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub documents: Vec<DocumentInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    /// The configuration the batch actually ran with.
    pub config: EngineConfig,
    pub ingested: usize,
    pub failed: usize,
    pub outcomes: Vec<DocumentOutcome>,
}

impl IngestReport {
    pub fn new(config: EngineConfig, outcomes: Vec<DocumentOutcome>) -> Self {
        let ingested = outcomes.iter().filter(|o| o.is_ingested()).count();
        Self {
            config,
            ingested,
            failed: outcomes.len() - ingested,
            outcomes,
        }
    }
}

pub fn read_job(path: &Path) -> anyhow::Result<IngestJob> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read job file {}", path.display()))?;
    let job: IngestJob = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse job file {}", path.display()))?;
    info!(path = %path.display(), documents = job.documents.len(), "loaded ingest job");
    Ok(job)
}

/// Run every document in `job`. The job's own config wins over `fallback`.
pub fn run_job(
    job: &IngestJob,
    fallback: EngineConfig,
    detect_layout: bool,
) -> anyhow::Result<IngestReport> {
    let config = job.config.unwrap_or(fallback);
    let pipeline = DocumentPipeline::new(config)
        .context("invalid engine configuration")?
        .with_layout_detection(detect_layout);
    let outcomes = pipeline.process_batch(&job.documents);
    Ok(IngestReport::new(config, outcomes))
}

pub fn write_report<W: Write>(mut writer: W, report: &IngestReport, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)
    } else {
        serde_json::to_writer(&mut writer, report)
    }
    .context("failed to serialize ingest report")?;
    writeln!(writer).context("failed to write ingest report")?;
    writer.flush().context("failed to flush ingest report")?;
    Ok(())
}

pub fn write_report_file(path: &Path, report: &IngestReport, pretty: bool) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    write_report(std::io::BufWriter::new(file), report, pretty)?;
    info!(path = %path.display(), "report written");
    Ok(())
}
