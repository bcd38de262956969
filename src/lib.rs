pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod intersect;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod tokenizer;

pub use config::{EngineConfig, OverlexConfig, ReportConfig, TokenizerConfig};
pub use corpus::{TokenList, TokenListCorpus};
pub use dictionary::TokenDictionary;
pub use error::{OverlexError, Result};
pub use intersect::{intersect, IntersectionMode};
pub use pipeline::IntersectionPipeline;
pub use report::{MatchCounters, MatchKind, MatchReport};
pub use store::{CharOffset, MemoryCounters, Provenance, SentenceOffset, TokenId, WordListStore, WordOffset};
pub use tokenizer::{TokenSpan, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
