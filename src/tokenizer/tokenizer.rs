use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizerConfig;

/// One token with its source position.
///
/// Offsets are kept at full width here; the corpus layer narrows them to
/// the overlay types and reports an overflow instead of truncating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub text: String,
    /// Offset of the token's first char, counted in chars
    pub char_offset: u32,
    /// Ordinal of the containing sentence
    pub sentence_index: u32,
    /// Ordinal of the token within the text
    pub word_index: u32,
}

/// Text tokenizer with normalization and a stop word list
///
/// Tokenization keeps every word; stop words are not dropped here because
/// match filtering happens against result buckets, where dropped tokens
/// would corrupt the recorded positions.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(Stemmer::create(Algorithm::English))
        } else {
            None
        };

        let stopwords = get(LANGUAGE::English).into_iter().map(|s| s.to_lowercase()).collect();

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    /// Normalize one token the way `tokenize` would. Pre-tokenized corpora
    /// run their tokens through this so both input paths intern the same
    /// forms.
    pub fn normalize(&self, word: &str) -> String {
        let mut token = word.to_string();
        if self.config.lowercase {
            token = token.to_lowercase();
        }
        if let Some(stemmer) = &self.stemmer {
            token = stemmer.stem(&token).to_string();
        }
        token
    }

    /// Tokenize text into a vector of normalized terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(|word| self.normalize(word)).collect()
    }

    /// Tokenize text and keep the source position of every token
    ///
    /// Char offsets count chars, not bytes. Sentence ordinals follow
    /// Unicode sentence bounds; word ordinals count every token.
    ///
    /// # Example
    ///
    /// ```
    /// use overlex::config::TokenizerConfig;
    /// use overlex::tokenizer::Tokenizer;
    ///
    /// let tokenizer = Tokenizer::new(&TokenizerConfig::default());
    /// let spans = tokenizer.tokenize_with_spans("Hello world. Rust is fast.");
    /// assert_eq!(spans[2].text, "rust");
    /// assert_eq!(spans[2].char_offset, 13);
    /// assert_eq!(spans[2].sentence_index, 1);
    /// assert_eq!(spans[2].word_index, 2);
    /// ```
    pub fn tokenize_with_spans(&self, text: &str) -> Vec<TokenSpan> {
        let sentence_starts: Vec<usize> = text.split_sentence_bound_indices().map(|(start, _)| start).collect();

        let mut spans = Vec::new();
        let mut sentence_cursor = 0;
        let mut consumed_bytes = 0;
        let mut consumed_chars = 0u32;
        let mut word_index = 0u32;

        for (byte_offset, word) in text.unicode_word_indices() {
            consumed_chars += text[consumed_bytes..byte_offset].chars().count() as u32;
            consumed_bytes = byte_offset;

            while sentence_cursor + 1 < sentence_starts.len() && sentence_starts[sentence_cursor + 1] <= byte_offset {
                sentence_cursor += 1;
            }

            spans.push(TokenSpan {
                text: self.normalize(word),
                char_offset: consumed_chars,
                sentence_index: sentence_cursor as u32,
                word_index,
            });
            word_index += 1;
        }

        spans
    }

    /// Check a normalized token against the English stop word list. The
    /// comparison is case-insensitive.
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stopwords.contains(&token.to_lowercase())
    }
}
