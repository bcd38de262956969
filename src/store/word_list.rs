//! Growable multi-bucket store for token id sequences
//!
//! A `WordListStore` holds a fixed number of buckets, each a growable
//! sequence of token ids. Buckets grow by a fixed slot increment rather
//! than doubling, so memory stays proportional to the data even with many
//! buckets. Result stores additionally carry one offset overlay per bucket
//! that records the source position of every element.

use std::fmt;
use std::mem::size_of;

use tracing::trace;

use super::types::{CharOffset, MemoryCounters, Provenance, SentenceOffset, TokenId, WordOffset};

/// Default number of slots added when a single value outgrows its bucket.
pub const DEFAULT_GROWTH_STEP: usize = 15;

/// Offset overlay of one result bucket. The three arrays grow in lockstep
/// with the bucket's data array; slots that were never assigned hold the
/// type-maximum sentinel.
#[derive(Debug, Clone)]
struct OffsetOverlay {
    char_offsets: Vec<CharOffset>,
    sentence_offsets: Vec<SentenceOffset>,
    word_offsets: Vec<WordOffset>,
}

impl OffsetOverlay {
    fn with_capacity(capacity: usize) -> Self {
        OffsetOverlay {
            char_offsets: vec![CharOffset::NOT_SET; capacity],
            sentence_offsets: vec![SentenceOffset::NOT_SET; capacity],
            word_offsets: vec![WordOffset::NOT_SET; capacity],
        }
    }

    fn grow_to(&mut self, capacity: usize) {
        self.char_offsets.resize(capacity, CharOffset::NOT_SET);
        self.sentence_offsets.resize(capacity, SentenceOffset::NOT_SET);
        self.word_offsets.resize(capacity, WordOffset::NOT_SET);
    }

    fn assign(&mut self, position: usize, provenance: Provenance) {
        self.char_offsets[position] = provenance.char_offset;
        self.sentence_offsets[position] = provenance.sentence_offset;
        self.word_offsets[position] = provenance.word_offset;
    }

    fn size_bytes(&self) -> usize {
        self.char_offsets.len() * size_of::<CharOffset>()
            + self.sentence_offsets.len() * size_of::<SentenceOffset>()
            + self.word_offsets.len() * size_of::<WordOffset>()
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    /// Allocated slots. Only the first `len` hold valid elements; the rest
    /// are zero-filled.
    data: Vec<TokenId>,
    len: usize,
    overlay: Option<OffsetOverlay>,
}

impl Bucket {
    fn new(capacity: usize, with_overlay: bool) -> Self {
        Bucket {
            data: vec![TokenId(0); capacity],
            len: 0,
            overlay: with_overlay.then(|| OffsetOverlay::with_capacity(capacity)),
        }
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Fixed set of growable token id buckets.
///
/// Whole sequences are appended through a write cursor that claims one
/// bucket per call; single values land in the bucket under the cursor
/// without advancing it. Both paths share the same growth machinery.
#[derive(Debug)]
pub struct WordListStore {
    buckets: Vec<Bucket>,
    /// Next bucket a whole-sequence append will claim.
    write_cursor: usize,
    /// Advisory upper bound for intersection query lengths, fixed at creation.
    max_bucket_length: usize,
    /// Largest bucket capacity ever reached.
    max_observed_length: usize,
    growth_step: usize,
    is_result_store: bool,
    counters: MemoryCounters,
}

impl WordListStore {
    /// Creates a store with `bucket_count` empty buckets, each starting
    /// with `capacity_hint` pre-allocated slots.
    pub fn new(bucket_count: usize, capacity_hint: usize) -> Self {
        Self::with_layout(bucket_count, capacity_hint, false)
    }

    /// Creates a store whose buckets carry offset overlays. Intersection
    /// results use this layout so every matched token keeps its source
    /// position.
    pub fn new_result_store(bucket_count: usize, capacity_hint: usize) -> Self {
        Self::with_layout(bucket_count, capacity_hint, true)
    }

    fn with_layout(bucket_count: usize, capacity_hint: usize, is_result_store: bool) -> Self {
        assert!(bucket_count > 0, "bucket count must not be zero");
        assert!(capacity_hint > 0, "capacity hint must not be zero");

        let buckets: Vec<Bucket> = (0..bucket_count)
            .map(|_| Bucket::new(capacity_hint, is_result_store))
            .collect();
        let arrays_per_bucket: u64 = if is_result_store { 4 } else { 1 };

        trace!(bucket_count, capacity_hint, is_result_store, "word list store created");

        WordListStore {
            buckets,
            write_cursor: 0,
            max_bucket_length: capacity_hint,
            max_observed_length: capacity_hint,
            growth_step: DEFAULT_GROWTH_STEP,
            is_result_store,
            counters: MemoryCounters {
                allocations: bucket_count as u64 * arrays_per_bucket,
                ..MemoryCounters::default()
            },
        }
    }

    /// Overrides the slot increment used when a single value outgrows its
    /// bucket.
    pub fn with_growth_step(mut self, growth_step: usize) -> Self {
        assert!(growth_step > 0, "growth step must not be zero");
        self.growth_step = growth_step;
        self
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of valid elements in one bucket.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets[index].len
    }

    /// Number of allocated slots in one bucket.
    pub fn bucket_capacity(&self, index: usize) -> usize {
        self.buckets[index].capacity()
    }

    /// Valid elements of one bucket, in insertion order.
    pub fn bucket_data(&self, index: usize) -> &[TokenId] {
        let bucket = &self.buckets[index];
        &bucket.data[..bucket.len]
    }

    /// Char offsets of one bucket's valid elements, or `None` when the
    /// store carries no overlays.
    pub fn bucket_char_offsets(&self, index: usize) -> Option<&[CharOffset]> {
        let bucket = &self.buckets[index];
        bucket.overlay.as_ref().map(|overlay| &overlay.char_offsets[..bucket.len])
    }

    pub fn bucket_sentence_offsets(&self, index: usize) -> Option<&[SentenceOffset]> {
        let bucket = &self.buckets[index];
        bucket
            .overlay
            .as_ref()
            .map(|overlay| &overlay.sentence_offsets[..bucket.len])
    }

    pub fn bucket_word_offsets(&self, index: usize) -> Option<&[WordOffset]> {
        let bucket = &self.buckets[index];
        bucket.overlay.as_ref().map(|overlay| &overlay.word_offsets[..bucket.len])
    }

    pub fn is_result_store(&self) -> bool {
        self.is_result_store
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Advisory upper bound for intersection query lengths. Fixed at
    /// creation; growth never changes it.
    pub fn max_bucket_length(&self) -> usize {
        self.max_bucket_length
    }

    /// Largest bucket capacity ever reached, including initial allocation.
    pub fn max_observed_length(&self) -> usize {
        self.max_observed_length
    }

    /// Slot increment applied when a single value outgrows its bucket.
    pub fn growth_step(&self) -> usize {
        self.growth_step
    }

    pub fn counters(&self) -> MemoryCounters {
        self.counters
    }

    /// Appends one whole sequence into the next free bucket and advances
    /// the write cursor. The bucket grows to exactly the sequence length
    /// when the hint was too small.
    pub fn append_sequence(&mut self, data: &[TokenId]) {
        self.append_sequence_into(data);
    }

    /// Appends a sequence together with the char offsets of its elements.
    /// An absent array leaves the overlay sentinels in place. Only valid on
    /// a result store.
    pub fn append_sequence_with_offsets(&mut self, data: &[TokenId], char_offsets: Option<&[CharOffset]>) {
        self.append_sequence_with_all_offsets(data, char_offsets, None, None);
    }

    /// Appends a sequence together with whichever offset arrays are given.
    /// Absent arrays leave the overlay sentinels in place. Only valid on a
    /// result store.
    pub fn append_sequence_with_all_offsets(
        &mut self,
        data: &[TokenId],
        char_offsets: Option<&[CharOffset]>,
        sentence_offsets: Option<&[SentenceOffset]>,
        word_offsets: Option<&[WordOffset]>,
    ) {
        assert!(self.is_result_store, "offsets require a result store");
        if let Some(offsets) = char_offsets {
            assert_eq!(
                offsets.len(),
                data.len(),
                "char offset count differs from the sequence length"
            );
        }
        if let Some(offsets) = sentence_offsets {
            assert_eq!(
                offsets.len(),
                data.len(),
                "sentence offset count differs from the sequence length"
            );
        }
        if let Some(offsets) = word_offsets {
            assert_eq!(
                offsets.len(),
                data.len(),
                "word offset count differs from the sequence length"
            );
        }

        let index = self.append_sequence_into(data);
        let overlay = self.overlay_mut(index);
        if let Some(offsets) = char_offsets {
            overlay.char_offsets[..data.len()].copy_from_slice(offsets);
        }
        if let Some(offsets) = sentence_offsets {
            overlay.sentence_offsets[..data.len()].copy_from_slice(offsets);
        }
        if let Some(offsets) = word_offsets {
            overlay.word_offsets[..data.len()].copy_from_slice(offsets);
        }
    }

    /// Appends one value to the bucket under the write cursor without
    /// advancing the cursor.
    pub fn put_value(&mut self, value: TokenId) {
        assert!(
            self.write_cursor < self.buckets.len(),
            "all {} buckets are already in use",
            self.buckets.len()
        );
        self.push_value(self.write_cursor, value, None);
    }

    /// Appends one value with its source position to the bucket under the
    /// write cursor. Only valid on a result store.
    pub fn put_value_with_offsets(
        &mut self,
        value: TokenId,
        char_offset: CharOffset,
        sentence_offset: SentenceOffset,
        word_offset: WordOffset,
    ) {
        assert!(self.is_result_store, "offsets require a result store");
        assert!(
            self.write_cursor < self.buckets.len(),
            "all {} buckets are already in use",
            self.buckets.len()
        );
        self.push_value(
            self.write_cursor,
            value,
            Some(Provenance::new(char_offset, sentence_offset, word_offset)),
        );
    }

    /// True when any claimed bucket holds at least one element. Before the
    /// first whole-sequence append the cursor still sits on bucket 0, so
    /// that bucket alone is inspected; values placed by `put_value` stay
    /// visible.
    pub fn has_any_data(&self) -> bool {
        if self.write_cursor == 0 {
            return self.buckets[0].len > 0;
        }
        self.buckets[..self.write_cursor].iter().any(|bucket| bucket.len > 0)
    }

    /// Estimated heap footprint in bytes, including unused slots.
    pub fn allocated_memory_bytes(&self) -> usize {
        let mut bytes = size_of::<Self>();
        bytes += self.buckets.capacity() * size_of::<Bucket>();
        for bucket in &self.buckets {
            bytes += bucket.data.len() * size_of::<TokenId>();
            if let Some(overlay) = bucket.overlay.as_ref() {
                bytes += overlay.size_bytes();
            }
        }
        bytes
    }

    /// Appends one value to an arbitrary bucket, growing the bucket by the
    /// fixed step when it is full. Offsets are recorded when given; on a
    /// result store the slot keeps its sentinel otherwise.
    pub(crate) fn push_value(&mut self, index: usize, value: TokenId, provenance: Option<Provenance>) {
        assert!(index < self.buckets.len(), "bucket {} does not exist", index);
        if provenance.is_some() {
            assert!(self.is_result_store, "offsets require a result store");
        }

        if self.buckets[index].len == self.buckets[index].capacity() {
            let new_capacity = self.buckets[index].capacity() + self.growth_step;
            self.grow_bucket(index, new_capacity);
        }

        let bucket = &mut self.buckets[index];
        let position = bucket.len;
        bucket.data[position] = value;
        if let Some(provenance) = provenance {
            bucket
                .overlay
                .as_mut()
                .expect("result store bucket is missing its offset overlay")
                .assign(position, provenance);
        }
        bucket.len += 1;
    }

    /// Valid elements of one bucket, mutable. Used to overwrite suppressed
    /// entries in place.
    pub(crate) fn bucket_data_mut(&mut self, index: usize) -> &mut [TokenId] {
        let bucket = &mut self.buckets[index];
        &mut bucket.data[..bucket.len]
    }

    pub(crate) fn set_write_cursor(&mut self, cursor: usize) {
        assert!(
            cursor <= self.buckets.len(),
            "cursor {} is past the bucket count {}",
            cursor,
            self.buckets.len()
        );
        self.write_cursor = cursor;
    }

    fn append_sequence_into(&mut self, data: &[TokenId]) -> usize {
        assert!(!data.is_empty(), "appended sequence is empty");
        assert!(
            self.write_cursor < self.buckets.len(),
            "all {} buckets are already in use",
            self.buckets.len()
        );

        let index = self.write_cursor;
        if data.len() > self.buckets[index].capacity() {
            self.grow_bucket(index, data.len());
        }

        let bucket = &mut self.buckets[index];
        bucket.data[..data.len()].copy_from_slice(data);
        bucket.len = data.len();
        self.write_cursor += 1;
        index
    }

    /// Grows one bucket to `new_capacity` slots. New data slots are
    /// zero-filled, new overlay slots sentinel-filled; sibling buckets are
    /// untouched.
    fn grow_bucket(&mut self, index: usize, new_capacity: usize) {
        let overlay_arrays: u64 = if self.is_result_store { 3 } else { 0 };
        let bucket = &mut self.buckets[index];
        let old_capacity = bucket.capacity();

        bucket.data.resize(new_capacity, TokenId(0));
        if let Some(overlay) = bucket.overlay.as_mut() {
            overlay.grow_to(new_capacity);
        }

        self.counters.reallocations += 1 + overlay_arrays;
        if new_capacity > self.max_observed_length {
            self.max_observed_length = new_capacity;
        }
        trace!(bucket = index, old_capacity, new_capacity, "bucket grown");
    }

    fn overlay_mut(&mut self, index: usize) -> &mut OffsetOverlay {
        self.buckets[index]
            .overlay
            .as_mut()
            .expect("result store bucket is missing its offset overlay")
    }
}

impl fmt::Display for WordListStore {
    /// One line per bucket, then the attribute block. Deterministic, so
    /// dumps can be compared across runs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "> Data <")?;
        for (index, bucket) in self.buckets.iter().enumerate() {
            write!(f, "{:>4}: {{", index + 1)?;
            for (position, value) in bucket.data[..bucket.len].iter().enumerate() {
                if position > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {}", value.as_u32())?;
            }
            writeln!(f, " }}")?;
        }
        writeln!(f, "> Attributes <")?;
        writeln!(f, "Result store:   {}", if self.is_result_store { "YES" } else { "NO" })?;
        writeln!(f, "Buckets:        {}", self.buckets.len())?;
        writeln!(f, "Used buckets:   {}", self.write_cursor)?;
        write!(f, "Longest bucket: {}", self.max_observed_length)
    }
}

impl Drop for WordListStore {
    fn drop(&mut self) {
        // Every allocated array is released exactly once; growth reuses
        // the existing arrays.
        self.counters.releases = self.counters.allocations;
        trace!(
            allocations = self.counters.allocations,
            reallocations = self.counters.reallocations,
            releases = self.counters.releases,
            "word list store released"
        );
    }
}
