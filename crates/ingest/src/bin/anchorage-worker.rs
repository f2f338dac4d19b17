//! anchorage-worker: batch ingestion of a JSON job file.
//!
//! Reads an `IngestJob`, processes its documents in parallel and writes an
//! `IngestReport` to a file or stdout. Engine settings come from the job when
//! it carries them, otherwise from the environment (`.env` supported).

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use anchorage_core::config::load_dotenv;
use anchorage_core::EngineConfig;
use anchorage_ingest::{read_job, run_job, write_report, write_report_file};

// ── CLI ─────────────────────────────────────────────────────────────

/// Dual chunking and anchor resolution over a batch of documents.
#[derive(Parser, Debug)]
#[command(name = "anchorage-worker", version, about)]
struct Cli {
    /// Path to the job file (JSON).
    #[arg(long, env = "ANCHORAGE_JOB")]
    input: PathBuf,

    /// Where to write the report. Stdout when omitted.
    #[arg(long, env = "ANCHORAGE_REPORT")]
    output: Option<PathBuf>,

    /// Detect markdown layout for documents that carry no layout regions.
    #[arg(long, env = "ANCHORAGE_DETECT_LAYOUT", default_value_t = false)]
    detect_layout: bool,

    /// Worker threads. Defaults to one per core.
    #[arg(long, env = "ANCHORAGE_THREADS")]
    threads: Option<usize>,

    /// Pretty-print the report.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker thread pool")?;
        info!(threads, "worker thread pool configured");
    }

    let job = read_job(&cli.input)?;

    let env_config = EngineConfig::from_env();
    let config = job.config.unwrap_or(env_config);
    if job.config.is_some() {
        info!("using configuration from job file");
    }
    config.log_summary();

    let report = run_job(&job, env_config, cli.detect_layout)?;

    match &cli.output {
        Some(path) => write_report_file(path, &report, cli.pretty)?,
        None => write_report(io::stdout().lock(), &report, cli.pretty)?,
    }

    if report.failed > 0 {
        warn!(
            ingested = report.ingested,
            failed = report.failed,
            "some documents were abandoned"
        );
    } else {
        info!(ingested = report.ingested, "all documents ingested");
    }
    Ok(())
}
