use anchorage_core::{DocumentInput, EngineConfig, ExtractedFact, LayoutRegion};
use anchorage_ingest::{DocumentIngestion, DocumentPipeline};

/// Default config with a custom coverage width.
pub fn config_with_coverage(chunk_size_tokens: usize) -> EngineConfig {
    EngineConfig {
        coverage_chunk_size_tokens: chunk_size_tokens,
        ..EngineConfig::default()
    }
}

/// Small-scale config so short test documents exercise merging and splitting:
/// coverage 40 chars, retrieval windows 100 chars, floor 20 chars.
pub fn small_config() -> EngineConfig {
    EngineConfig {
        coverage_chunk_size_tokens: 10,
        coverage_overlap_tokens: 0,
        retrieval_target_tokens: 25,
        retrieval_min_tokens: 5,
        retrieval_overlap_tokens: 5,
        token_to_char_ratio: 4.0,
    }
}

/// Deterministic text of exactly `len` chars.
pub fn sample_text(len: usize) -> String {
    "the quick brown fox jumps over the lazy dog "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// Like `sample_text` but with multi-byte chars throughout.
pub fn unicode_text(len: usize) -> String {
    "Grüße aus Köln, naïve café. 日本語のテキスト。 "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

pub fn paragraph(start: usize, end: usize) -> LayoutRegion {
    LayoutRegion::new(start, end, "paragraph", false)
}

pub fn table(start: usize, end: usize) -> LayoutRegion {
    LayoutRegion::new(start, end, "table", true)
}

/// Xorshift generator so property tests are reproducible.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng(seed.max(1))
    }

    pub fn below(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound.max(1) as u64) as usize
    }
}

/// Random layout covering most of `[0, len)` with occasional gaps and atomic
/// regions.
pub fn random_regions(rng: &mut Rng, len: usize) -> Vec<LayoutRegion> {
    let mut regions = Vec::new();
    let mut pos = rng.below(5);
    while pos < len {
        let end = (pos + 1 + rng.below(250)).min(len);
        if rng.below(7) == 0 {
            regions.push(table(pos, end));
        } else {
            regions.push(paragraph(pos, end));
        }
        pos = end + rng.below(4);
    }
    regions
}

/// Random valid facts inside `[0, len)`.
pub fn random_facts(rng: &mut Rng, len: usize, count: usize) -> Vec<ExtractedFact> {
    (0..count)
        .map(|i| {
            let start = rng.below(len);
            let end = (start + 1 + rng.below(60)).min(len);
            ExtractedFact::span(&format!("fact-{i}"), start as i64, end as i64)
        })
        .collect()
}

pub fn ingest(config: EngineConfig, input: &DocumentInput) -> DocumentIngestion {
    DocumentPipeline::new(config)
        .unwrap()
        .process(input)
        .unwrap()
}
