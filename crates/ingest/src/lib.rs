//! Document ingestion: runs the chunkers, anchoring, alignment and payload
//! projection for each document and summarizes the result in a manifest.

pub mod job;
pub mod manifest;
pub mod pipeline;

pub use job::{read_job, run_job, write_report, write_report_file, IngestJob, IngestReport};
pub use manifest::IngestionManifest;
pub use pipeline::{DocumentIngestion, DocumentOutcome, DocumentPipeline};
