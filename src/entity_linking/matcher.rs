//! Match selection
//!
//! For each slot (payload order) and each of its sub-terms (term order),
//! look up candidate concepts and return the first sub-term whose best
//! candidate reaches `match_threshold`. Lookups are memoized per call by
//! sub-term text, so a phrase repeated across slots hits the vocabulary
//! index once.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::category::CategoryResolver;
use super::result::LinkResult;
use super::slot::{extract_slots, Slot};
use crate::config::NelConfig;
use crate::error::{LinkerError, Result};
use crate::vocabulary::{load_vocabulary, ConceptMatches, Normalizer, VocabularyIndex};

/// Validated matching parameters
#[derive(Debug, Clone)]
pub struct MatchParams {
    /// NER score floor (exclusive)
    pub ner_threshold: f64,
    /// Labels eligible for linking
    pub valid_labels: HashSet<String>,
    /// Minimum best-candidate score (inclusive)
    pub match_threshold: f64,
    /// Candidate breadth passed to the index
    pub match_margin: f64,
}

/// Candidates already retrieved in the current call, keyed by sub-term
type MatchCache = HashMap<String, ConceptMatches>;

/// Links NER payloads to vocabulary concepts.
///
/// Built once at startup and shared read-only; every call owns its own
/// cache so calls are independent and may run concurrently.
pub struct EntityLinker {
    params: MatchParams,
    categories: CategoryResolver,
    vocabulary: Arc<dyn VocabularyIndex>,
    normalize: Normalizer,
}

impl EntityLinker {
    pub fn new(
        params: MatchParams,
        vocabulary: Arc<dyn VocabularyIndex>,
        normalize: Normalizer,
    ) -> Self {
        Self {
            params,
            categories: CategoryResolver::default(),
            vocabulary,
            normalize,
        }
    }

    /// Replace the label -> category rules
    pub fn with_categories(mut self, categories: CategoryResolver) -> Self {
        self.categories = categories;
        self
    }

    /// Validate the configuration, load the vocabulary and build a linker
    pub fn from_config(config: &NelConfig) -> std::result::Result<Self, LinkerError> {
        let params = config.match_params()?;
        let source = config.vocabulary_source()?;
        let index_params = config.index_params()?;
        let custom_files = config.custom_vocabulary_files()?;

        let table = load_vocabulary(source, &config.vocabulary_file, &custom_files, index_params)
            .inspect_err(|e| {
                tracing::error!(source = %source, error = %e, "Vocabulary load failed");
            })?;
        let normalize = table.normalizer();

        Ok(Self::new(params, Arc::new(table), normalize).with_categories(config.category_resolver()))
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Link a raw NER payload.
    ///
    /// Errors only when the payload is not valid NER output; "no match" is
    /// an empty [`LinkResult`].
    pub fn link(&self, payload: &str) -> Result<LinkResult> {
        let slots = extract_slots(
            payload,
            self.params.ner_threshold,
            &self.params.valid_labels,
        )
        .inspect_err(|e| tracing::warn!(error = %e, "Rejected NER payload"))?;
        Ok(self.link_slots(slots))
    }

    /// Select the first qualifying match among already extracted slots
    pub fn link_slots(&self, slots: Vec<Slot>) -> LinkResult {
        let mut cache = MatchCache::new();

        for mut slot in slots {
            // Sub-terms come from the term as extracted, before normalization
            let sub_terms = slot.sub_terms();

            for sub_term in &sub_terms {
                match cache.entry(sub_term.clone()) {
                    Entry::Occupied(_) => {
                        tracing::debug!(sub_term = %sub_term, "Sub-term cached");
                    }
                    Entry::Vacant(entry) => {
                        let categories = self.categories.resolve(slot.label());
                        let matches =
                            self.vocabulary
                                .lookup(sub_term, self.params.match_margin, categories);
                        tracing::debug!(
                            label = slot.label(),
                            sub_term = %sub_term,
                            candidates = matches.len(),
                            best = matches.max_score(),
                            "Vocabulary lookup"
                        );
                        entry.insert(matches);
                    }
                }
            }

            slot.normalize(self.normalize);

            for sub_term in &sub_terms {
                let Some(matches) = cache.get(sub_term) else {
                    continue;
                };
                if !matches.is_empty() && matches.max_score() >= self.params.match_threshold {
                    tracing::info!(
                        label = slot.label(),
                        sub_term = %sub_term,
                        score = matches.max_score(),
                        "Linked entity"
                    );
                    return LinkResult::from_match(&slot, matches);
                }
            }
        }

        tracing::debug!(lookups = cache.len(), "No qualifying match");
        LinkResult::default()
    }
}
