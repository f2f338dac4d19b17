use anchorage_core::{
    CharRange, DocumentInput, EngineConfig, ExtractedFact, InvalidSpanReason, Visibility,
};
use anchorage_ingest::DocumentPipeline;

use crate::helpers::{config_with_coverage, ingest, paragraph, sample_text, table};

#[test]
fn test_coverage_of_thousand_chars() {
    let input = DocumentInput::new("doc", &sample_text(1000));
    let out = ingest(config_with_coverage(200), &input);

    let spans: Vec<_> = out
        .coverage_chunks
        .iter()
        .map(|c| (c.char_start, c.char_end))
        .collect();
    assert_eq!(spans, vec![(0, 800), (800, 1000)]);
    assert_eq!(out.coverage_chunks[0].chunk_id, "doc::coverage::0");
    assert_eq!(out.coverage_chunks[1].chunk_id, "doc::coverage::1");
}

#[test]
fn test_fact_resolves_to_second_chunk() {
    let input = DocumentInput::new("doc", &sample_text(1000))
        .with_facts(vec![ExtractedFact::span("f1", 850, 870)]);
    let out = ingest(config_with_coverage(200), &input);

    assert_eq!(out.anchor_relations.len(), 1);
    let rel = &out.anchor_relations[0];
    assert_eq!(rel.coverage_chunk_id, "doc::coverage::1");
    assert_eq!(rel.span_start_rel, 50);
    assert_eq!(rel.span_end_rel, 70);
}

#[test]
fn test_small_region_dropped_but_coverage_complete() {
    let text = sample_text(40);
    let input = DocumentInput::new("doc", &text)
        .with_regions(vec![paragraph(0, 40)])
        .with_facts(vec![ExtractedFact::span("f1", 4, 9)]);
    let out = ingest(EngineConfig::default(), &input);

    assert!(out.retrieval_chunks.is_empty());
    assert!(out.alignment_edges.is_empty());
    assert!(out.payloads.is_empty());

    // The fact is still provable through coverage.
    assert_eq!(out.coverage_chunks.len(), 1);
    assert_eq!(out.coverage_chunks[0].span().len(), 40);
    assert_eq!(out.anchor_relations.len(), 1);
    assert_eq!(out.anchor_relations[0].coverage_chunk_id, "doc::coverage::0");
}

#[test]
fn test_retrieval_chunk_spanning_two_coverage_chunks() {
    // 125 tokens at 4 chars/token: coverage [0,500) and [500,1000).
    let input = DocumentInput::new("doc", &sample_text(1000)).with_regions(vec![
        paragraph(0, 300),
        table(300, 700),
        paragraph(700, 1000),
    ]);
    let out = ingest(config_with_coverage(125), &input);

    let middle = out
        .retrieval_chunks
        .iter()
        .find(|r| r.char_start == 300 && r.char_end == 700)
        .unwrap();
    let edges: Vec<_> = out
        .alignment_edges
        .iter()
        .filter(|e| e.retrieval_chunk_id == middle.chunk_id)
        .map(|e| (e.coverage_chunk_id.as_str(), e.overlap_chars))
        .collect();
    assert_eq!(edges, vec![("doc::coverage::0", 200), ("doc::coverage::1", 200)]);
    assert_eq!(out.alignment_edges.len(), 4);
}

#[test]
fn test_negative_fact_start_is_not_fatal() {
    let input = DocumentInput::new("doc", &sample_text(1000)).with_facts(vec![
        ExtractedFact::span("bad", -5, 10),
        ExtractedFact::span("good", 100, 120),
    ]);
    let out = ingest(EngineConfig::default(), &input);

    assert_eq!(out.invalid_spans.len(), 1);
    assert_eq!(out.invalid_spans[0].fact_id, "bad");
    assert_eq!(out.invalid_spans[0].reason, InvalidSpanReason::NegativeStart);
    assert!(out.anchor_relations.iter().all(|r| r.fact_id != "bad"));
    assert_eq!(out.anchor_relations.len(), 1);
    assert_eq!(out.manifest.invalid_span_count, 1);
}

#[test]
fn test_rerun_is_identical() {
    let text = sample_text(5000);
    let input = DocumentInput::new("report", &text)
        .with_regions(vec![
            paragraph(0, 120),
            paragraph(120, 150),
            table(150, 900),
            paragraph(900, 4800),
            paragraph(4800, 4830),
        ])
        .with_facts(vec![
            ExtractedFact::span("a", 10, 40),
            ExtractedFact::span("b", 3190, 3230),
            ExtractedFact::unresolved("c"),
        ]);

    let pipeline = DocumentPipeline::new(EngineConfig::default()).unwrap();
    let first = pipeline.process(&input).unwrap();
    let second = pipeline.process(&input).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.manifest.output_digest, second.manifest.output_digest);
    assert!(first.manifest.is_fresh(&text));
    assert_eq!(first.unresolved_facts, 1);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_straddling_fact_projects_onto_neighbouring_retrieval_chunks() {
    // Coverage [0,500),[500,1000); the fact starts in the first and ends in
    // the second, so it is owned by the first only.
    let input = DocumentInput::new("doc", &sample_text(1000))
        .with_regions(vec![paragraph(0, 480), paragraph(480, 1000)])
        .with_facts(vec![ExtractedFact::span("f", 470, 520)]);
    let out = ingest(config_with_coverage(125), &input);

    let rel = &out.anchor_relations[0];
    assert_eq!(rel.coverage_chunk_id, "doc::coverage::0");
    assert!(rel.crosses_boundary);
    assert_eq!((rel.span_start_rel, rel.span_end_rel), (470, 500));

    let first = &out.payloads["doc::retrieval::0"];
    assert_eq!(first[0].visibility, Visibility::Partial);
    assert_eq!((first[0].span_start_rel, first[0].span_end_rel), (470, 480));

    let second = &out.payloads["doc::retrieval::1"];
    assert_eq!(second[0].visibility, Visibility::Partial);
    assert_eq!((second[0].span_start_rel, second[0].span_end_rel), (0, 40));
}
