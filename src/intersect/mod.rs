//! Intersection strategies over a word list store
//!
//! Three interchangeable strategies compute which elements of each bucket
//! also occur in a query sequence. Every strategy walks the bucket
//! elements in input order and tests membership in the query, so all three
//! produce identical result stores: result buckets inherit the input
//! bucket's order and keep duplicates per occurrence. The sorted variants
//! order a copy of the query; the input store is never modified.

mod sorted;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::{Provenance, TokenId, WordListStore};

/// Strategy used to test bucket elements for query membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionMode {
    /// Linear scan of the query per bucket element.
    NestedLoops,
    /// Query copy sorted with quicksort, then binary search per element.
    QuicksortBinarySearch,
    /// Query copy sorted with heapsort, then binary search per element.
    HeapsortBinarySearch,
}

impl Default for IntersectionMode {
    fn default() -> Self {
        IntersectionMode::NestedLoops
    }
}

impl fmt::Display for IntersectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntersectionMode::NestedLoops => "nested-loops",
            IntersectionMode::QuicksortBinarySearch => "quicksort-binary-search",
            IntersectionMode::HeapsortBinarySearch => "heapsort-binary-search",
        };
        write!(f, "{}", name)
    }
}

/// Intersects every bucket of `store` with `query`.
///
/// The result is a new result store with the same bucket count, advisory
/// maximum, and growth step as the input; its write cursor is copied from
/// the input so the same buckets count as claimed. When the input carries
/// offset overlays, each matched element keeps its source position.
///
/// The query must not be empty and must not exceed the input store's
/// advisory maximum bucket length.
pub fn intersect(store: &WordListStore, query: &[TokenId], mode: IntersectionMode) -> WordListStore {
    assert!(!query.is_empty(), "query is empty");
    assert!(
        query.len() <= store.max_bucket_length(),
        "query length {} exceeds the maximum bucket length {}",
        query.len(),
        store.max_bucket_length()
    );

    let mut result = WordListStore::new_result_store(store.bucket_count(), store.max_bucket_length())
        .with_growth_step(store.growth_step());
    match mode {
        IntersectionMode::NestedLoops => fill_nested_loops(store, query, &mut result),
        IntersectionMode::QuicksortBinarySearch => fill_sorted(store, query, &mut result, sorted::quicksort),
        IntersectionMode::HeapsortBinarySearch => fill_sorted(store, query, &mut result, sorted::heapsort),
    }
    result.set_write_cursor(store.write_cursor());
    result
}

fn fill_nested_loops(store: &WordListStore, query: &[TokenId], result: &mut WordListStore) {
    for bucket in 0..store.bucket_count() {
        for (position, value) in store.bucket_data(bucket).iter().enumerate() {
            if query.contains(value) {
                result.push_value(bucket, *value, carried_offsets(store, bucket, position));
            }
        }
    }
}

fn fill_sorted(store: &WordListStore, query: &[TokenId], result: &mut WordListStore, sort: fn(&mut [TokenId])) {
    let mut sorted_query = query.to_vec();
    sort(&mut sorted_query);

    for bucket in 0..store.bucket_count() {
        for (position, value) in store.bucket_data(bucket).iter().enumerate() {
            if sorted::binary_search(&sorted_query, *value) {
                result.push_value(bucket, *value, carried_offsets(store, bucket, position));
            }
        }
    }
}

/// The source position of one input element, when the input carries
/// overlays.
fn carried_offsets(store: &WordListStore, bucket: usize, position: usize) -> Option<Provenance> {
    let char_offsets = store.bucket_char_offsets(bucket)?;
    let sentence_offsets = store.bucket_sentence_offsets(bucket)?;
    let word_offsets = store.bucket_word_offsets(bucket)?;
    Some(Provenance::new(
        char_offsets[position],
        sentence_offsets[position],
        word_offsets[position],
    ))
}
