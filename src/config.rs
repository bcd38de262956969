use serde::{Deserialize, Serialize};

use crate::error::{OverlexError, Result};
use crate::intersect::IntersectionMode;
use crate::store::DEFAULT_GROWTH_STEP;

/// Engine settings: strategy selection and store growth
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mode: IntersectionMode,
    /// Slots added when a single value outgrows its bucket
    pub growth_step: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: IntersectionMode::NestedLoops,
            growth_step: DEFAULT_GROWTH_STEP,
        }
    }
}

/// Tokenizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Lowercase tokens before interning; off means case-sensitive
    /// comparison
    pub lowercase: bool,
    pub stem: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            stem: false,
        }
    }
}

/// Report configuration: which match kinds and offset columns to export
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    pub partial_matches: bool,
    pub full_matches: bool,
    /// Suppress stop words in match blocks before classification
    pub filter_stop_words: bool,
    pub char_offsets: bool,
    pub sentence_offsets: bool,
    pub word_offsets: bool,
    /// Keep match blocks with a single surviving token
    pub keep_single_token_results: bool,
    /// Repeat each query list's tokens in its report entry
    pub include_source_tokens: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            partial_matches: true,
            full_matches: true,
            filter_stop_words: true,
            char_offsets: true,
            sentence_offsets: false,
            word_offsets: true,
            keep_single_token_results: false,
            include_source_tokens: true,
        }
    }
}

/// Top-level configuration for an intersection run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OverlexConfig {
    pub engine: EngineConfig,
    pub tokenizer: TokenizerConfig,
    pub report: ReportConfig,
}

impl OverlexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the intersection strategy
    pub fn with_mode(mut self, mode: IntersectionMode) -> Self {
        self.engine.mode = mode;
        self
    }

    /// Override the bucket growth step
    pub fn with_growth_step(mut self, growth_step: usize) -> Self {
        self.engine.growth_step = growth_step;
        self
    }

    /// Toggle stop-word suppression in match blocks
    pub fn with_stop_word_filter(mut self, enabled: bool) -> Self {
        self.report.filter_stop_words = enabled;
        self
    }

    /// Toggle keeping single-token match blocks
    pub fn with_keep_single_token_results(mut self, enabled: bool) -> Self {
        self.report.keep_single_token_results = enabled;
        self
    }

    /// Check the configuration for values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.engine.growth_step == 0 {
            return Err(OverlexError::InvalidConfig("growth_step must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let engine = EngineConfig::default();
        assert_eq!(engine.mode, IntersectionMode::NestedLoops);
        assert_eq!(engine.growth_step, DEFAULT_GROWTH_STEP);

        let tokenizer = TokenizerConfig::default();
        assert!(tokenizer.lowercase);
        assert!(!tokenizer.stem);

        let report = ReportConfig::default();
        assert!(report.partial_matches);
        assert!(report.full_matches);
        assert!(report.filter_stop_words);
        assert!(report.char_offsets);
        assert!(!report.sentence_offsets);
        assert!(report.word_offsets);
        assert!(!report.keep_single_token_results);
    }

    #[test]
    fn test_config_builder() {
        let config = OverlexConfig::new()
            .with_mode(IntersectionMode::HeapsortBinarySearch)
            .with_growth_step(32)
            .with_keep_single_token_results(true);

        assert_eq!(config.engine.mode, IntersectionMode::HeapsortBinarySearch);
        assert_eq!(config.engine.growth_step, 32);
        assert!(config.report.keep_single_token_results);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_growth_step() {
        let config = OverlexConfig::new().with_growth_step(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = OverlexConfig::new().with_mode(IntersectionMode::QuicksortBinarySearch);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: OverlexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.engine.mode, IntersectionMode::QuicksortBinarySearch);
        assert_eq!(parsed.engine.growth_step, config.engine.growth_step);
    }
}
