//! Text tokenization with source positions

mod tokenizer;

pub use tokenizer::{TokenSpan, Tokenizer};
