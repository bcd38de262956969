//! Store and engine behavior through the public API: the three strategies
//! must be indistinguishable from the outside.

use overlex::{intersect, CharOffset, IntersectionMode, SentenceOffset, TokenId, WordListStore, WordOffset};

const ALL_MODES: [IntersectionMode; 3] = [
    IntersectionMode::NestedLoops,
    IntersectionMode::QuicksortBinarySearch,
    IntersectionMode::HeapsortBinarySearch,
];

fn ids(values: &[u32]) -> Vec<TokenId> {
    values.iter().copied().map(TokenId::new).collect()
}

fn store_from(buckets: &[&[u32]], capacity_hint: usize) -> WordListStore {
    let mut store = WordListStore::new(buckets.len(), capacity_hint);
    for bucket in buckets {
        store.append_sequence(&ids(bucket));
    }
    store
}

/// Deterministic pseudo-random values from a small id universe, so
/// intersections are dense enough to be interesting.
fn scrambled(count: usize, seed: u64) -> Vec<TokenId> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            TokenId::new((state >> 33) as u32 % 512)
        })
        .collect()
}

#[test]
fn two_reference_lists_intersected_with_one_query() {
    let store = store_from(&[&[3, 7, 9, 2], &[5, 7, 2]], 4);
    let query = ids(&[7, 2, 10]);

    for mode in ALL_MODES {
        let result = intersect(&store, &query, mode);
        assert_eq!(result.bucket_data(0), &ids(&[7, 2])[..], "mode {}", mode);
        assert_eq!(result.bucket_data(1), &ids(&[7, 2])[..], "mode {}", mode);
        assert!(result.has_any_data());
        assert_eq!(result.write_cursor(), 2);
    }
}

#[test]
fn disjoint_query_leaves_the_result_empty() {
    let store = store_from(&[&[1, 2, 3], &[9, 8]], 3);

    for mode in ALL_MODES {
        let result = intersect(&store, &ids(&[100, 200]), mode);
        assert!(!result.has_any_data(), "mode {}", mode);
        assert_eq!(result.bucket_len(0), 0);
        assert_eq!(result.bucket_len(1), 0);
        assert_eq!(result.write_cursor(), store.write_cursor());
    }
}

#[test]
fn all_modes_agree_on_scrambled_data() {
    let mut store = WordListStore::new(16, 64);
    for seed in 0..16 {
        store.append_sequence(&scrambled(64, seed + 1));
    }
    let query = scrambled(48, 99);

    let baseline = intersect(&store, &query, IntersectionMode::NestedLoops);
    for mode in [
        IntersectionMode::QuicksortBinarySearch,
        IntersectionMode::HeapsortBinarySearch,
    ] {
        let result = intersect(&store, &query, mode);
        for bucket in 0..store.bucket_count() {
            assert_eq!(result.bucket_data(bucket), baseline.bucket_data(bucket), "mode {}", mode);
        }
    }
}

#[test]
fn offsets_travel_with_their_tokens() {
    let mut store = WordListStore::new_result_store(2, 3);
    store.append_sequence_with_all_offsets(
        &ids(&[3, 7, 2]),
        Some(&[CharOffset::new(0), CharOffset::new(4), CharOffset::new(9)]),
        Some(&[SentenceOffset::new(0), SentenceOffset::new(0), SentenceOffset::new(1)]),
        Some(&[WordOffset::new(0), WordOffset::new(1), WordOffset::new(2)]),
    );
    store.append_sequence_with_all_offsets(
        &ids(&[7]),
        Some(&[CharOffset::new(13)]),
        Some(&[SentenceOffset::new(2)]),
        Some(&[WordOffset::new(5)]),
    );

    for mode in ALL_MODES {
        let result = intersect(&store, &ids(&[7, 2]), mode);

        assert_eq!(result.bucket_data(0), &ids(&[7, 2])[..], "mode {}", mode);
        assert_eq!(
            result.bucket_char_offsets(0),
            Some(&[CharOffset::new(4), CharOffset::new(9)][..]),
            "mode {}",
            mode
        );
        assert_eq!(
            result.bucket_word_offsets(0),
            Some(&[WordOffset::new(1), WordOffset::new(2)][..]),
            "mode {}",
            mode
        );
        assert_eq!(
            result.bucket_sentence_offsets(1),
            Some(&[SentenceOffset::new(2)][..]),
            "mode {}",
            mode
        );
    }
}

#[test]
fn duplicates_in_a_bucket_survive_per_occurrence() {
    let store = store_from(&[&[7, 7, 3, 7, 3]], 5);

    for mode in ALL_MODES {
        let result = intersect(&store, &ids(&[3, 7]), mode);
        assert_eq!(result.bucket_data(0), &ids(&[7, 7, 3, 7, 3])[..], "mode {}", mode);
    }
}

#[test]
fn result_buckets_grow_past_the_capacity_hint() {
    // The result store starts with the input's advisory maximum per
    // bucket; a bucket holding more matches than that must grow.
    let mut store = WordListStore::new(1, 4);
    for value in 0..40u32 {
        store.put_value(TokenId::new(value % 4));
    }
    let expected: Vec<TokenId> = (0..40).map(|value| TokenId::new(value % 4)).collect();

    for mode in ALL_MODES {
        let result = intersect(&store, &ids(&[0, 1, 2, 3]), mode);
        assert_eq!(result.bucket_len(0), 40, "mode {}", mode);
        assert_eq!(result.bucket_data(0), &expected[..], "mode {}", mode);
        assert!(result.bucket_capacity(0) > 4, "mode {}", mode);
    }
}

#[test]
fn growth_is_per_bucket_and_exact_for_sequences() {
    let mut store = WordListStore::new(3, 2);
    store.append_sequence(&ids(&[1, 2]));
    store.append_sequence(&ids(&[1, 2, 3, 4, 5, 6, 7]));
    store.append_sequence(&ids(&[9]));

    assert_eq!(store.bucket_capacity(0), 2);
    assert_eq!(store.bucket_capacity(1), 7);
    assert_eq!(store.bucket_capacity(2), 2);
    assert_eq!(store.max_observed_length(), 7);
    // The advisory maximum keeps its creation value regardless of growth.
    assert_eq!(store.max_bucket_length(), 2);
    assert_eq!(store.counters().reallocations, 1);
}

#[test]
fn put_value_fills_the_open_bucket() {
    let mut store = WordListStore::new(2, 2);
    store.put_value(TokenId::new(5));
    store.put_value(TokenId::new(6));
    store.put_value(TokenId::new(7));

    assert_eq!(store.write_cursor(), 0);
    assert_eq!(store.bucket_data(0), &ids(&[5, 6, 7])[..]);
    assert_eq!(store.bucket_len(1), 0);
    assert!(store.has_any_data());
}

#[test]
fn unassigned_offset_slots_stay_sentinel() {
    let mut store = WordListStore::new_result_store(1, 2);
    store.append_sequence_with_offsets(&ids(&[4, 5]), Some(&[CharOffset::new(2), CharOffset::new(9)]));

    let sentences = store.bucket_sentence_offsets(0).unwrap();
    assert!(sentences.iter().all(|offset| !offset.is_set()));
    assert!(store.bucket_word_offsets(0).unwrap().iter().all(|offset| !offset.is_set()));
    assert_eq!(store.bucket_char_offsets(0).unwrap()[1].get(), Some(9));
}

#[test]
fn display_dump_lists_buckets_and_attributes() {
    let store = store_from(&[&[3, 7, 9, 2], &[5, 7, 2]], 4);
    let dump = store.to_string();
    assert!(dump.contains("{ 3, 7, 9, 2 }"));
    assert!(dump.contains("{ 5, 7, 2 }"));
    assert!(dump.contains("Result store:   NO"));
    assert!(dump.contains("Used buckets:   2"));
}
