//! End-to-end intersection pipeline
//!
//! Interns both corpora into one dictionary, encodes the reference corpus
//! as a word list store, intersects it with every query list, and folds
//! the classified match blocks into a report.

use tracing::{debug, info};

use crate::config::OverlexConfig;
use crate::corpus::{TokenList, TokenListCorpus};
use crate::dictionary::TokenDictionary;
use crate::error::{OverlexError, Result};
use crate::intersect::intersect;
use crate::report::{GeneralInfo, MatchBlock, MatchCounters, MatchKind, MatchReport, QueryMatches};
use crate::store::{TokenId, WordListStore};
use crate::tokenizer::Tokenizer;

pub struct IntersectionPipeline {
    config: OverlexConfig,
    tokenizer: Tokenizer,
    dictionary: TokenDictionary,
}

impl IntersectionPipeline {
    pub fn new(config: OverlexConfig) -> Self {
        let tokenizer = Tokenizer::new(&config.tokenizer);
        IntersectionPipeline {
            config,
            tokenizer,
            dictionary: TokenDictionary::new(),
        }
    }

    /// Intersects every query list with every reference list and returns
    /// the classified match report.
    pub fn run(&mut self, reference: &TokenListCorpus, query: &TokenListCorpus) -> Result<MatchReport> {
        self.config.validate()?;
        if reference.is_empty() {
            return Err(OverlexError::EmptyCorpus(reference.name.clone()));
        }
        if query.is_empty() {
            return Err(OverlexError::EmptyCorpus(query.name.clone()));
        }

        self.intern_corpus(reference);
        self.intern_corpus(query);
        debug!(distinct_tokens = self.dictionary.len(), "token dictionary built");

        // Both sides share the capacity hint, so a query list can never be
        // longer than the store's advisory maximum.
        let capacity_hint = reference.longest_list().max(query.longest_list());
        let store = self.encode_reference(reference, capacity_hint)?;
        debug!(
            buckets = store.bucket_count(),
            allocated_bytes = store.allocated_memory_bytes(),
            "reference corpus encoded"
        );

        let mut counters = MatchCounters::default();
        let mut queries = Vec::with_capacity(query.len());
        for query_list in &query.lists {
            queries.push(self.intersect_one(&store, reference, query_list, &mut counters)?);
        }

        info!(
            query_lists = queries.len(),
            partial_sets = counters.partial_sets,
            full_sets = counters.full_sets,
            "intersection run finished"
        );

        Ok(MatchReport {
            general: GeneralInfo::new(&reference.name, &query.name),
            queries,
            counters,
        })
    }

    fn intern_corpus(&mut self, corpus: &TokenListCorpus) {
        for list in &corpus.lists {
            for token in &list.tokens {
                self.dictionary.intern(&self.tokenizer.normalize(token));
            }
        }
    }

    /// Encodes every reference list into one bucket, offsets included.
    fn encode_reference(&self, corpus: &TokenListCorpus, capacity_hint: usize) -> Result<WordListStore> {
        let mut store = WordListStore::new_result_store(corpus.len(), capacity_hint)
            .with_growth_step(self.config.engine.growth_step);
        for list in &corpus.lists {
            let ids = self.map_tokens(&list.tokens)?;
            store.append_sequence_with_all_offsets(
                &ids,
                Some(&list.char_offsets),
                Some(&list.sentence_offsets),
                Some(&list.word_offsets),
            );
        }
        Ok(store)
    }

    fn intersect_one(
        &self,
        store: &WordListStore,
        reference: &TokenListCorpus,
        query_list: &TokenList,
        counters: &mut MatchCounters,
    ) -> Result<QueryMatches> {
        let report_config = &self.config.report;

        let query_ids = self.map_tokens(&query_list.tokens)?;
        let mut result = intersect(store, &query_ids, self.config.engine.mode);

        let query_tokens: Vec<String> = query_ids
            .iter()
            .map(|id| self.resolve_token(*id))
            .collect::<Result<_>>()?;
        let query_tokens_without_stop_words: Vec<String> = query_tokens
            .iter()
            .filter(|token| !self.tokenizer.is_stop_word(token))
            .cloned()
            .collect();

        // A block is a full match when it covers the whole comparison
        // list: the query without stop words when suppression runs, the
        // raw query otherwise.
        let comparison_count = if report_config.filter_stop_words {
            query_tokens_without_stop_words.len()
        } else {
            query_tokens.len()
        };
        let minimum_tokens = if report_config.keep_single_token_results { 1 } else { 2 };

        let mut partial_matches = Vec::new();
        let mut full_matches = Vec::new();

        for bucket in 0..result.bucket_count() {
            if report_config.filter_stop_words {
                self.suppress_stop_words(&mut result, bucket)?;
            }

            let kept: Vec<usize> = result
                .bucket_data(bucket)
                .iter()
                .enumerate()
                .filter(|(_, id)| **id != TokenId::MAX)
                .map(|(position, _)| position)
                .collect();
            if kept.len() < minimum_tokens {
                continue;
            }

            let kind = if kept.len() == comparison_count {
                MatchKind::Full
            } else {
                MatchKind::Partial
            };
            counters.record(kind, kept.len());

            match kind {
                MatchKind::Partial if report_config.partial_matches => {
                    partial_matches.push(self.build_block(&result, bucket, &reference.lists[bucket].id, &kept)?);
                }
                MatchKind::Full if report_config.full_matches => {
                    full_matches.push(self.build_block(&result, bucket, &reference.lists[bucket].id, &kept)?);
                }
                _ => {}
            }
        }

        debug!(
            query = %query_list.id,
            partial = partial_matches.len(),
            full = full_matches.len(),
            "query list intersected"
        );

        Ok(QueryMatches {
            query_id: query_list.id.clone(),
            tokens: report_config.include_source_tokens.then_some(query_tokens),
            tokens_without_stop_words: report_config
                .include_source_tokens
                .then_some(query_tokens_without_stop_words),
            partial_matches,
            full_matches,
        })
    }

    /// Overwrites stop words in one result bucket with the reserved id.
    /// Suppressed slots are skipped at export; their offsets stay in place
    /// but are never read.
    fn suppress_stop_words(&self, result: &mut WordListStore, bucket: usize) -> Result<()> {
        for position in 0..result.bucket_len(bucket) {
            let id = result.bucket_data(bucket)[position];
            if id == TokenId::MAX {
                continue;
            }
            let token = self.resolve_token(id)?;
            if self.tokenizer.is_stop_word(&token) {
                result.bucket_data_mut(bucket)[position] = TokenId::MAX;
            }
        }
        Ok(())
    }

    fn build_block(
        &self,
        result: &WordListStore,
        bucket: usize,
        reference_id: &str,
        kept: &[usize],
    ) -> Result<MatchBlock> {
        let report_config = &self.config.report;
        let data = result.bucket_data(bucket);

        let mut tokens = Vec::with_capacity(kept.len());
        for &position in kept {
            tokens.push(self.resolve_token(data[position])?);
        }

        let char_offsets = match (report_config.char_offsets, result.bucket_char_offsets(bucket)) {
            (true, Some(overlay)) => Some(kept.iter().map(|&position| overlay[position].get()).collect()),
            _ => None,
        };
        let sentence_offsets = match (report_config.sentence_offsets, result.bucket_sentence_offsets(bucket)) {
            (true, Some(overlay)) => Some(kept.iter().map(|&position| overlay[position].get()).collect()),
            _ => None,
        };
        let word_offsets = match (report_config.word_offsets, result.bucket_word_offsets(bucket)) {
            (true, Some(overlay)) => Some(kept.iter().map(|&position| overlay[position].get()).collect()),
            _ => None,
        };

        Ok(MatchBlock {
            reference_id: reference_id.to_string(),
            tokens,
            char_offsets,
            sentence_offsets,
            word_offsets,
        })
    }

    fn map_tokens(&self, tokens: &[String]) -> Result<Vec<TokenId>> {
        tokens
            .iter()
            .map(|token| {
                let normalized = self.tokenizer.normalize(token);
                match self.dictionary.lookup(&normalized) {
                    Some(id) => Ok(id),
                    None => Err(OverlexError::UnknownToken(normalized)),
                }
            })
            .collect()
    }

    fn resolve_token(&self, id: TokenId) -> Result<String> {
        self.dictionary
            .resolve(id)
            .map(str::to_string)
            .ok_or_else(|| OverlexError::UnknownToken(format!("#{}", id.as_u32())))
    }
}
