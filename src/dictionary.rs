//! Token dictionary
//!
//! Maps token strings to dense `TokenId`s in first-seen order and back.
//! Interning the same token twice returns the id assigned the first time.

use std::collections::HashMap;

use crate::store::TokenId;

#[derive(Debug, Clone, Default)]
pub struct TokenDictionary {
    ids: HashMap<String, TokenId>,
    tokens: Vec<String>,
}

impl TokenDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TokenDictionary {
            ids: HashMap::with_capacity(capacity),
            tokens: Vec::with_capacity(capacity),
        }
    }

    /// Returns the id of `token`, assigning the next dense id when the
    /// token is new. `TokenId::MAX` is reserved and never assigned.
    pub fn intern(&mut self, token: &str) -> TokenId {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }

        assert!(self.tokens.len() < TokenId::MAX.as_usize(), "token id space is exhausted");

        let id = TokenId::new(self.tokens.len() as u32);
        self.ids.insert(token.to_string(), id);
        self.tokens.push(token.to_string());
        id
    }

    /// The id of `token`, or `None` when it was never interned.
    pub fn lookup(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    /// The token behind `id`, or `None` when the id was never assigned.
    pub fn resolve(&self, id: TokenId) -> Option<&str> {
        self.tokens.get(id.as_usize()).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
