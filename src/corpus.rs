//! Token list corpora
//!
//! A corpus is an ordered collection of token lists, one per dataset.
//! Pre-tokenized corpora come as JSON files where each fragment is an
//! object mapping a dataset id to its tokens and, optionally, absolute
//! char offsets. Plain text is tokenized line by line instead.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{OverlexError, Result};
use crate::store::{CharOffset, SentenceOffset, WordOffset};
use crate::tokenizer::Tokenizer;

/// JSON shape of one dataset inside a corpus fragment
#[derive(Debug, Deserialize)]
struct RawTokenList {
    #[serde(default)]
    tokens: Vec<String>,
    #[serde(default)]
    abs_char_offsets: Option<Vec<u64>>,
}

/// One dataset's tokens with their source positions. The three offset
/// vectors always have the same length as `tokens`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList {
    pub id: String,
    pub tokens: Vec<String>,
    pub char_offsets: Vec<CharOffset>,
    pub sentence_offsets: Vec<SentenceOffset>,
    pub word_offsets: Vec<WordOffset>,
}

impl TokenList {
    /// Builds a list from bare tokens, deriving all three offset kinds the
    /// same way JSON loading does when no offsets are present.
    pub fn from_tokens(id: &str, tokens: Vec<String>) -> Result<Self> {
        assert!(!tokens.is_empty(), "token list is empty");
        let (char_offsets, sentence_offsets, word_offsets) = derive_positions(&tokens, None)?;
        Ok(TokenList {
            id: id.to_string(),
            tokens,
            char_offsets,
            sentence_offsets,
            word_offsets,
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Ordered collection of token lists loaded from one source
#[derive(Debug, Clone)]
pub struct TokenListCorpus {
    pub name: String,
    pub lists: Vec<TokenList>,
}

impl TokenListCorpus {
    /// Loads a pre-tokenized JSON corpus. A file may hold several
    /// concatenated JSON fragments; datasets keep their file order.
    /// Datasets without tokens are skipped.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&path.display().to_string(), &json)
    }

    pub fn from_json_str(name: &str, json: &str) -> Result<Self> {
        let mut lists = Vec::new();

        let fragments = serde_json::Deserializer::from_str(json).into_iter::<Map<String, Value>>();
        for fragment in fragments {
            for (id, value) in fragment? {
                let raw: RawTokenList = serde_json::from_value(value)?;
                if raw.tokens.is_empty() {
                    debug!(dataset = %id, "skipping dataset without tokens");
                    continue;
                }

                let (char_offsets, sentence_offsets, word_offsets) =
                    derive_positions(&raw.tokens, raw.abs_char_offsets.as_deref())?;
                lists.push(TokenList {
                    id,
                    tokens: raw.tokens,
                    char_offsets,
                    sentence_offsets,
                    word_offsets,
                });
            }
        }

        if lists.is_empty() {
            return Err(OverlexError::EmptyCorpus(name.to_string()));
        }
        info!(corpus = name, lists = lists.len(), "corpus parsed");
        Ok(TokenListCorpus {
            name: name.to_string(),
            lists,
        })
    }

    /// Tokenizes plain text, one dataset per non-empty line. Line numbers
    /// starting at 1 become the dataset ids.
    pub fn from_text_file(path: impl AsRef<Path>, tokenizer: &Tokenizer) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_text(&path.display().to_string(), &text, tokenizer)
    }

    pub fn from_text(name: &str, text: &str, tokenizer: &Tokenizer) -> Result<Self> {
        let mut lists = Vec::new();

        for (line_index, line) in text.lines().enumerate() {
            let spans = tokenizer.tokenize_with_spans(line);
            if spans.is_empty() {
                continue;
            }

            let mut tokens = Vec::with_capacity(spans.len());
            let mut char_offsets = Vec::with_capacity(spans.len());
            let mut sentence_offsets = Vec::with_capacity(spans.len());
            let mut word_offsets = Vec::with_capacity(spans.len());
            for span in spans {
                char_offsets.push(narrow_char(u64::from(span.char_offset))?);
                sentence_offsets.push(narrow_sentence(u64::from(span.sentence_index))?);
                word_offsets.push(narrow_word(u64::from(span.word_index))?);
                tokens.push(span.text);
            }

            lists.push(TokenList {
                id: (line_index + 1).to_string(),
                tokens,
                char_offsets,
                sentence_offsets,
                word_offsets,
            });
        }

        if lists.is_empty() {
            return Err(OverlexError::EmptyCorpus(name.to_string()));
        }
        info!(corpus = name, lists = lists.len(), "corpus tokenized");
        Ok(TokenListCorpus {
            name: name.to_string(),
            lists,
        })
    }

    /// Length of the longest token list
    pub fn longest_list(&self) -> usize {
        self.lists.iter().map(|list| list.len()).max().unwrap_or(0)
    }

    pub fn total_tokens(&self) -> usize {
        self.lists.iter().map(|list| list.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Derives the three offset kinds for a pre-tokenized list.
///
/// The first token sits at position zero for all three. After that, char
/// offsets come from the absolute array when one is present; otherwise the
/// previous token's char length plus one blank is assumed. A bare "."
/// token ends a sentence. Word ordinals count every token.
fn derive_positions(
    tokens: &[String],
    abs_char_offsets: Option<&[u64]>,
) -> Result<(Vec<CharOffset>, Vec<SentenceOffset>, Vec<WordOffset>)> {
    let mut char_offsets = Vec::with_capacity(tokens.len());
    let mut sentence_offsets = Vec::with_capacity(tokens.len());
    let mut word_offsets = Vec::with_capacity(tokens.len());

    let mut char_position = 0u64;
    let mut sentence_position = 0u64;
    let mut word_position = 0u64;

    for (index, _token) in tokens.iter().enumerate() {
        if index > 0 {
            let previous = &tokens[index - 1];
            char_position = match abs_char_offsets.and_then(|offsets| offsets.get(index)) {
                Some(&absolute) => absolute,
                None => char_position + previous.chars().count() as u64 + 1,
            };
            if previous == "." {
                sentence_position += 1;
            }
            word_position += 1;
        }

        char_offsets.push(narrow_char(char_position)?);
        sentence_offsets.push(narrow_sentence(sentence_position)?);
        word_offsets.push(narrow_word(word_position)?);
    }

    Ok((char_offsets, sentence_offsets, word_offsets))
}

// The type maxima are sentinels, so the largest valid offset is one less.

fn narrow_char(value: u64) -> Result<CharOffset> {
    if value >= u64::from(u16::MAX) {
        return Err(OverlexError::OffsetOverflow {
            kind: "char",
            value,
            limit: u64::from(u16::MAX) - 1,
        });
    }
    Ok(CharOffset::new(value as u16))
}

fn narrow_sentence(value: u64) -> Result<SentenceOffset> {
    if value >= u64::from(u8::MAX) {
        return Err(OverlexError::OffsetOverflow {
            kind: "sentence",
            value,
            limit: u64::from(u8::MAX) - 1,
        });
    }
    Ok(SentenceOffset::new(value as u8))
}

fn narrow_word(value: u64) -> Result<WordOffset> {
    if value >= u64::from(u16::MAX) {
        return Err(OverlexError::OffsetOverflow {
            kind: "word",
            value,
            limit: u64::from(u16::MAX) - 1,
        });
    }
    Ok(WordOffset::new(value as u16))
}
