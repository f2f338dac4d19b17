use std::collections::{HashMap, HashSet};

use anchorage_anchor::alignment::overlap_pairs;
use anchorage_chunker::{verify_tiling, CoverageChunker, RetrievalChunker};
use anchorage_core::{CharRange, DocumentInput, EngineConfig};

use crate::helpers::{
    ingest, random_facts, random_regions, sample_text, small_config, unicode_text, Rng,
};

#[test]
fn test_coverage_tiles_every_length_and_width() {
    for ratio in [1.0, 2.5, 4.0, 3.7] {
        for tokens in [1, 3, 10, 64, 800] {
            let chunker = CoverageChunker::new(tokens, ratio).unwrap();
            for len in [0, 1, 2, 39, 40, 41, 999, 4097] {
                for text in [sample_text(len), unicode_text(len)] {
                    let chunks = chunker.generate(&text, "doc");
                    verify_tiling("doc", &chunks, len).unwrap();
                    let total: usize = chunks.iter().map(|c| c.char_len()).sum();
                    assert_eq!(total, len);
                }
            }
        }
    }
}

#[test]
fn test_chunkers_are_deterministic() {
    let mut rng = Rng::new(7);
    let retrieval = RetrievalChunker::from_config(small_config()).unwrap();
    let coverage = CoverageChunker::from_config(small_config()).unwrap();
    for _ in 0..50 {
        let len = 1 + rng.below(3000);
        let text = unicode_text(len);
        let regions = random_regions(&mut rng, len);

        assert_eq!(coverage.generate(&text, "d"), coverage.generate(&text, "d"));
        assert_eq!(
            retrieval.generate(&text, "d", &regions),
            retrieval.generate(&text, "d", &regions)
        );
    }
}

#[test]
fn test_every_valid_fact_gets_one_anchor() {
    let mut rng = Rng::new(99);
    for round in 0..40 {
        let len = 1 + rng.below(6000);
        let facts = random_facts(&mut rng, len, 30);
        let input = DocumentInput::new(&format!("doc-{round}"), &sample_text(len))
            .with_regions(random_regions(&mut rng, len))
            .with_facts(facts.clone());
        let out = ingest(small_config(), &input);

        assert!(out.invalid_spans.is_empty());
        assert_eq!(out.anchor_relations.len(), facts.len());

        let lengths: HashMap<&str, usize> = out
            .coverage_chunks
            .iter()
            .map(|c| (c.chunk_id.as_str(), c.char_len()))
            .collect();
        for (rel, fact) in out.anchor_relations.iter().zip(&facts) {
            assert_eq!(rel.fact_id, fact.fact_id);
            let chunk_len = lengths[rel.coverage_chunk_id.as_str()];
            assert!(rel.span_start_rel < chunk_len);
            assert!(rel.span_end_rel <= chunk_len);
            assert!(rel.span_start_rel < rel.span_end_rel);
        }
    }
}

#[test]
fn test_alignment_overlap_is_symmetric() {
    let mut rng = Rng::new(1234);
    for _ in 0..40 {
        let len = 1 + rng.below(5000);
        let input = DocumentInput::new("doc", &sample_text(len))
            .with_regions(random_regions(&mut rng, len));
        let out = ingest(small_config(), &input);

        let forward: HashSet<_> = overlap_pairs(&out.coverage_chunks, &out.retrieval_chunks)
            .into_iter()
            .map(|o| (o.left_index, o.right_index, o.chars))
            .collect();
        let backward: HashSet<_> = overlap_pairs(&out.retrieval_chunks, &out.coverage_chunks)
            .into_iter()
            .map(|o| (o.right_index, o.left_index, o.chars))
            .collect();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), out.alignment_edges.len());

        for edge in &out.alignment_edges {
            assert!(edge.overlap_chars > 0);
            assert!(edge.overlap_ratio > 0.0 && edge.overlap_ratio <= 1.0);
        }
    }
}

#[test]
fn test_anchors_reach_every_aligned_retrieval_chunk() {
    let mut rng = Rng::new(4242);
    for _ in 0..40 {
        let len = 1 + rng.below(5000);
        let input = DocumentInput::new("doc", &sample_text(len))
            .with_regions(random_regions(&mut rng, len))
            .with_facts(random_facts(&mut rng, len, 25));
        let out = ingest(small_config(), &input);

        assert_eq!(out.payloads.len(), out.retrieval_chunks.len());

        for rel in &out.anchor_relations {
            let aligned: Vec<_> = out
                .alignment_edges
                .iter()
                .filter(|e| e.coverage_chunk_id == rel.coverage_chunk_id)
                .collect();
            if aligned.is_empty() {
                continue;
            }
            assert!(out
                .payloads
                .values()
                .any(|facts| facts.iter().any(|f| f.fact_id == rel.fact_id)));
            for edge in aligned {
                assert!(out.payloads[&edge.retrieval_chunk_id]
                    .iter()
                    .any(|f| f.fact_id == rel.fact_id));
            }
        }

        for chunk in &out.retrieval_chunks {
            for fact in &out.payloads[&chunk.chunk_id] {
                assert!(fact.span_start_rel <= fact.span_end_rel);
                assert!(fact.span_end_rel <= chunk.char_len());
            }
        }
    }
}

#[test]
fn test_non_atomic_retrieval_chunks_meet_floor() {
    let mut rng = Rng::new(31337);
    let config = EngineConfig {
        retrieval_min_tokens: 20,
        ..small_config()
    };
    for _ in 0..60 {
        let len = 1 + rng.below(4000);
        let input = DocumentInput::new("doc", &sample_text(len))
            .with_regions(random_regions(&mut rng, len));
        let out = ingest(config, &input);
        for chunk in &out.retrieval_chunks {
            assert!(chunk.is_atomic || chunk.token_count >= config.retrieval_min_tokens);
        }
    }
}
