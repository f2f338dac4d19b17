use std::fs;

use anchorage_core::{DocumentInput, EngineConfig, ExtractedFact};
use anchorage_ingest::{
    read_job, run_job, write_report_file, DocumentOutcome, IngestJob, IngestReport,
};

use crate::helpers::{sample_text, small_config};

fn sample_job() -> IngestJob {
    IngestJob {
        config: Some(small_config()),
        documents: vec![
            DocumentInput::new("alpha", &sample_text(900))
                .with_facts(vec![ExtractedFact::span("a1", 10, 30)]),
            DocumentInput::new("beta", "# Notes\n\nShort body that still clears the floor.\n\n| a | b |\n| 1 | 2 |")
                .with_facts(vec![ExtractedFact::span("b1", 9, 14), ExtractedFact::unresolved("b2")]),
        ],
    }
}

#[test]
fn test_job_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    let report_path = dir.path().join("report.json");

    fs::write(&job_path, serde_json::to_string(&sample_job()).unwrap()).unwrap();

    let job = read_job(&job_path).unwrap();
    assert_eq!(job.documents.len(), 2);

    let report = run_job(&job, EngineConfig::default(), false).unwrap();
    assert_eq!(report.ingested, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.config, small_config());

    write_report_file(&report_path, &report, true).unwrap();
    let written: IngestReport =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(written.ingested, report.ingested);
    let manifests = |r: &IngestReport| -> Vec<_> {
        r.outcomes
            .iter()
            .filter_map(|o| match o {
                DocumentOutcome::Ingested(out) => Some(out.manifest.clone()),
                DocumentOutcome::Failed { .. } => None,
            })
            .collect()
    };
    assert_eq!(manifests(&written), manifests(&report));
}

#[test]
fn test_report_tags_outcomes() {
    let report = run_job(&sample_job(), EngineConfig::default(), false).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["outcomes"][0]["status"], "ingested");
    assert_eq!(value["outcomes"][0]["document_id"], "alpha");
    assert_eq!(value["outcomes"][1]["unresolved_facts"], 1);
}

#[test]
fn test_layout_detection_flag() {
    let job = sample_job();

    let plain = run_job(&job, EngineConfig::default(), false).unwrap();
    let detected = run_job(&job, EngineConfig::default(), true).unwrap();

    let region_types = |report: &IngestReport| -> Vec<String> {
        match &report.outcomes[1] {
            DocumentOutcome::Ingested(out) => out
                .retrieval_chunks
                .iter()
                .map(|c| c.region_type.clone())
                .collect(),
            other => panic!("unexpected outcome {other:?}"),
        }
    };
    assert_eq!(region_types(&plain), vec!["text"]);
    assert!(region_types(&detected).contains(&"table".to_string()));
}

#[test]
fn test_missing_job_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_job(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read job file"));
}

#[test]
fn test_malformed_job_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{\"documents\": 3}").unwrap();
    assert!(read_job(&path).is_err());
}
