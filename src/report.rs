//! Match report model
//!
//! The report is the exported end product of a run: per query list, the
//! blocks of reference tokens that also occur in the query, split into
//! partial and full matches, plus run-wide counters and general info.
//! Offset columns serialize unassigned slots as `null`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How completely a match block covers its query list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The block covers part of the query's comparison tokens
    Partial,
    /// The block covers every comparison token of the query
    Full,
}

/// Tokens of one reference list that also occur in the query list, with
/// their source positions. Offset columns are present only when the run
/// was configured to export them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBlock {
    pub reference_id: String,
    pub tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_offsets: Option<Vec<Option<u16>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_offsets: Option<Vec<Option<u8>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_offsets: Option<Vec<Option<u16>>>,
}

/// All match blocks found for one query list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatches {
    pub query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_without_stop_words: Option<Vec<String>>,
    pub partial_matches: Vec<MatchBlock>,
    pub full_matches: Vec<MatchBlock>,
}

/// Run-wide match statistics. Counted for every classified block, even
/// when its kind is not exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounters {
    pub partial_sets: u64,
    pub full_sets: u64,
    pub tokens_in_partial_sets: u64,
    pub tokens_in_full_sets: u64,
}

impl MatchCounters {
    pub fn record(&mut self, kind: MatchKind, token_count: usize) {
        match kind {
            MatchKind::Partial => {
                self.partial_sets += 1;
                self.tokens_in_partial_sets += token_count as u64;
            }
            MatchKind::Full => {
                self.full_sets += 1;
                self.tokens_in_full_sets += token_count as u64;
            }
        }
    }

    pub fn total_sets(&self) -> u64 {
        self.partial_sets + self.full_sets
    }
}

/// Provenance of the report itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub program_version: String,
    pub created_at: String,
    pub reference_corpus: String,
    pub query_corpus: String,
}

impl GeneralInfo {
    pub fn new(reference_corpus: &str, query_corpus: &str) -> Self {
        GeneralInfo {
            program_version: crate::VERSION.to_string(),
            created_at: Utc::now().to_rfc3339(),
            reference_corpus: reference_corpus.to_string(),
            query_corpus: query_corpus.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub general: GeneralInfo,
    pub queries: Vec<QueryMatches>,
    pub counters: MatchCounters,
}

impl MatchReport {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
