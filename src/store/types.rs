//! Identifier and offset types shared across the store

use serde::{Deserialize, Serialize};

/// Dictionary-assigned token identifier. Ids are dense and start at zero,
/// in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Reserved sentinel. The dictionary never assigns this id, so it is
    /// free for in-band markers such as suppressed stop words.
    pub const MAX: TokenId = TokenId(u32::MAX);

    pub fn new(id: u32) -> Self {
        TokenId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Character offset of a token in its source text, counted in chars.
/// The type maximum means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharOffset(pub u16);

impl CharOffset {
    pub const NOT_SET: CharOffset = CharOffset(u16::MAX);

    pub fn new(offset: u16) -> Self {
        CharOffset(offset)
    }

    pub fn is_set(&self) -> bool {
        *self != Self::NOT_SET
    }

    /// The offset value, or `None` when the slot was never assigned.
    pub fn get(&self) -> Option<u16> {
        self.is_set().then_some(self.0)
    }
}

/// Ordinal of the sentence a token appeared in. The type maximum means
/// "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentenceOffset(pub u8);

impl SentenceOffset {
    pub const NOT_SET: SentenceOffset = SentenceOffset(u8::MAX);

    pub fn new(offset: u8) -> Self {
        SentenceOffset(offset)
    }

    pub fn is_set(&self) -> bool {
        *self != Self::NOT_SET
    }

    pub fn get(&self) -> Option<u8> {
        self.is_set().then_some(self.0)
    }
}

/// Ordinal of a token within its source text. The type maximum means
/// "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordOffset(pub u16);

impl WordOffset {
    pub const NOT_SET: WordOffset = WordOffset(u16::MAX);

    pub fn new(offset: u16) -> Self {
        WordOffset(offset)
    }

    pub fn is_set(&self) -> bool {
        *self != Self::NOT_SET
    }

    pub fn get(&self) -> Option<u16> {
        self.is_set().then_some(self.0)
    }
}

/// The source position of one token. Result buckets store one of these per
/// element, alongside the token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub char_offset: CharOffset,
    pub sentence_offset: SentenceOffset,
    pub word_offset: WordOffset,
}

impl Provenance {
    pub const NOT_SET: Provenance = Provenance {
        char_offset: CharOffset::NOT_SET,
        sentence_offset: SentenceOffset::NOT_SET,
        word_offset: WordOffset::NOT_SET,
    };

    pub fn new(char_offset: CharOffset, sentence_offset: SentenceOffset, word_offset: WordOffset) -> Self {
        Provenance {
            char_offset,
            sentence_offset,
            word_offset,
        }
    }

    pub fn is_set(&self) -> bool {
        *self != Self::NOT_SET
    }
}

/// Allocation bookkeeping for one store. Release counts stay at zero until
/// the store is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCounters {
    pub allocations: u64,
    pub reallocations: u64,
    pub releases: u64,
}
