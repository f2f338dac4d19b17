use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f64(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Defaults ──────────────────────────────────────────────────

pub const DEFAULT_COVERAGE_CHUNK_SIZE_TOKENS: usize = 800;
pub const DEFAULT_COVERAGE_OVERLAP_TOKENS: usize = 0;
pub const DEFAULT_RETRIEVAL_TARGET_TOKENS: usize = 256;
pub const DEFAULT_RETRIEVAL_MIN_TOKENS: usize = 50;
pub const DEFAULT_RETRIEVAL_OVERLAP_TOKENS: usize = 64;
pub const DEFAULT_TOKEN_TO_CHAR_RATIO: f64 = 4.0;

// ── Engine config ─────────────────────────────────────────────

/// Immutable configuration shared by every engine component.
///
/// Passed by value into each component's constructor. Components call
/// [`EngineConfig::validate`] before doing any work, so a bad value is
/// rejected before the first chunk is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub coverage_chunk_size_tokens: usize,
    /// Must stay 0: coverage chunks tile the document without overlap.
    pub coverage_overlap_tokens: usize,
    pub retrieval_target_tokens: usize,
    pub retrieval_min_tokens: usize,
    pub retrieval_overlap_tokens: usize,
    pub token_to_char_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coverage_chunk_size_tokens: DEFAULT_COVERAGE_CHUNK_SIZE_TOKENS,
            coverage_overlap_tokens: DEFAULT_COVERAGE_OVERLAP_TOKENS,
            retrieval_target_tokens: DEFAULT_RETRIEVAL_TARGET_TOKENS,
            retrieval_min_tokens: DEFAULT_RETRIEVAL_MIN_TOKENS,
            retrieval_overlap_tokens: DEFAULT_RETRIEVAL_OVERLAP_TOKENS,
            token_to_char_ratio: DEFAULT_TOKEN_TO_CHAR_RATIO,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ANCHORAGE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ANCHORAGE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            coverage_chunk_size_tokens: profiled_env_usize(
                p,
                "COVERAGE_CHUNK_SIZE_TOKENS",
                DEFAULT_COVERAGE_CHUNK_SIZE_TOKENS,
            ),
            coverage_overlap_tokens: profiled_env_usize(
                p,
                "COVERAGE_OVERLAP_TOKENS",
                DEFAULT_COVERAGE_OVERLAP_TOKENS,
            ),
            retrieval_target_tokens: profiled_env_usize(
                p,
                "RETRIEVAL_TARGET_TOKENS",
                DEFAULT_RETRIEVAL_TARGET_TOKENS,
            ),
            retrieval_min_tokens: profiled_env_usize(
                p,
                "RETRIEVAL_MIN_TOKENS",
                DEFAULT_RETRIEVAL_MIN_TOKENS,
            ),
            retrieval_overlap_tokens: profiled_env_usize(
                p,
                "RETRIEVAL_OVERLAP_TOKENS",
                DEFAULT_RETRIEVAL_OVERLAP_TOKENS,
            ),
            token_to_char_ratio: profiled_env_f64(
                p,
                "TOKEN_TO_CHAR_RATIO",
                DEFAULT_TOKEN_TO_CHAR_RATIO,
            ),
        }
    }

    /// Reject configurations the chunkers cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coverage_chunk_size_tokens == 0 {
            return Err(ConfigError::NonPositiveChunkSize);
        }
        if self.coverage_overlap_tokens != 0 {
            return Err(ConfigError::CoverageOverlap(self.coverage_overlap_tokens));
        }
        if self.retrieval_target_tokens == 0 {
            return Err(ConfigError::NonPositiveTarget);
        }
        if self.retrieval_min_tokens > self.retrieval_target_tokens {
            return Err(ConfigError::MinExceedsTarget {
                min: self.retrieval_min_tokens,
                target: self.retrieval_target_tokens,
            });
        }
        if self.retrieval_overlap_tokens >= self.retrieval_target_tokens {
            return Err(ConfigError::OverlapNotBelowTarget {
                overlap: self.retrieval_overlap_tokens,
                target: self.retrieval_target_tokens,
            });
        }
        if !self.token_to_char_ratio.is_finite() || self.token_to_char_ratio <= 0.0 {
            return Err(ConfigError::InvalidRatio(self.token_to_char_ratio));
        }
        Ok(())
    }

    /// Print the effective configuration for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Engine config loaded:");
        tracing::info!(
            "  coverage:   chunk_size_tokens={}, overlap_tokens={}",
            self.coverage_chunk_size_tokens,
            self.coverage_overlap_tokens
        );
        tracing::info!(
            "  retrieval:  target_tokens={}, min_tokens={}, overlap_tokens={}",
            self.retrieval_target_tokens,
            self.retrieval_min_tokens,
            self.retrieval_overlap_tokens
        );
        tracing::info!("  tokens:     token_to_char_ratio={}", self.token_to_char_ratio);
    }
}
