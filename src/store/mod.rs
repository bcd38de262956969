//! Bucketed token id storage
//!
//! This module holds the central data structure of the crate: a store of
//! fixed bucket count where each bucket is a growable token id sequence.
//!
//! - `WordListStore`: the bucketed container, plain or with offset overlays
//! - `TokenId` and the offset newtypes: the element and provenance types
//! - `MemoryCounters`: allocation bookkeeping for diagnostics

mod types;
mod word_list;

pub use types::*;
pub use word_list::*;
