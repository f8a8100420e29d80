//! In-memory concept table
//!
//! Holds every vocabulary concept with its normalized names and answers
//! lookups in two stages: exact normalized-name hits score 1.0, then a token
//! inverted index pre-filters concepts sharing a word with the query and each
//! is ranked by Jaro-Winkler against its closest name.
//!
//! File format (tab separated, one concept per line, `#` comments):
//!
//! ```text
//! D001943	C04.588.180;C17.800.090.500	Breast Neoplasms	Breast Cancer	Breast Tumors
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use smallvec::SmallVec;

use super::normalize::Normalizer;
use super::source::IndexParams;
use super::traits::{category_of, ConceptCandidate, ConceptMatches, VocabularyIndex};
use crate::entity_linking::CategorySet;
use crate::error::VocabularyError;

/// Index of a concept in the table
type ConceptIdx = usize;

/// A single concept row
#[derive(Debug, Clone)]
pub struct ConceptRecord {
    pub concept_id: String,
    pub tree_numbers: SmallVec<[String; 4]>,
    /// Normalized names (preferred name first)
    pub names: Vec<String>,
}

impl ConceptRecord {
    fn admitted_by(&self, categories: &CategorySet) -> bool {
        categories.is_unrestricted()
            || self
                .tree_numbers
                .iter()
                .any(|tree| categories.admits(category_of(tree)))
    }
}

/// In-memory vocabulary index
#[derive(Debug)]
pub struct ConceptTable {
    concepts: Vec<ConceptRecord>,
    /// Concept id lookup, used to merge rows from several files
    id_index: HashMap<String, ConceptIdx>,
    /// Normalized name -> concepts carrying that name
    name_index: HashMap<String, SmallVec<[ConceptIdx; 4]>>,
    /// Token -> concepts with a name containing that token
    token_index: HashMap<String, SmallVec<[ConceptIdx; 8]>>,
    normalize: Normalizer,
    params: IndexParams,
}

impl ConceptTable {
    pub fn new(normalize: Normalizer, params: IndexParams) -> Self {
        Self {
            concepts: Vec::new(),
            id_index: HashMap::new(),
            name_index: HashMap::new(),
            token_index: HashMap::new(),
            normalize,
            params,
        }
    }

    /// Add a concept, merging names and tree numbers into an existing row
    /// with the same id.
    pub fn insert<T, N>(&mut self, concept_id: &str, tree_numbers: T, names: N)
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let idx = match self.id_index.get(concept_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.concepts.len();
                self.concepts.push(ConceptRecord {
                    concept_id: concept_id.to_string(),
                    tree_numbers: SmallVec::new(),
                    names: Vec::new(),
                });
                self.id_index.insert(concept_id.to_string(), idx);
                idx
            }
        };

        for tree in tree_numbers {
            let tree = tree.as_ref().trim();
            let record = &mut self.concepts[idx];
            if !tree.is_empty() && !record.tree_numbers.iter().any(|t| t == tree) {
                record.tree_numbers.push(tree.to_string());
            }
        }

        for name in names {
            let norm = (self.normalize)(name.as_ref());
            if norm.is_empty() || self.concepts[idx].names.contains(&norm) {
                continue;
            }

            let ids = self.name_index.entry(norm.clone()).or_default();
            if !ids.contains(&idx) {
                ids.push(idx);
            }
            for token in norm.split_whitespace() {
                let ids = self.token_index.entry(token.to_string()).or_default();
                if !ids.contains(&idx) {
                    ids.push(idx);
                }
            }
            self.concepts[idx].names.push(norm);
        }
    }

    /// Load concepts from a tab-separated vocabulary file
    pub fn load_file(&mut self, path: &Path) -> Result<(), VocabularyError> {
        let io_err = |source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(path).map_err(io_err)?);

        let before = self.concepts.len();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(io_err)?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let format_err = |reason: &str| VocabularyError::Format {
                path: path.to_path_buf(),
                line: i + 1,
                reason: reason.to_string(),
            };

            let mut fields = line.split('\t');
            let concept_id = fields.next().map(str::trim).unwrap_or_default();
            if concept_id.is_empty() {
                return Err(format_err("missing concept id"));
            }
            let trees = fields
                .next()
                .ok_or_else(|| format_err("missing tree numbers column"))?;
            let names: Vec<&str> = fields.map(str::trim).filter(|n| !n.is_empty()).collect();
            if names.is_empty() {
                return Err(format_err("concept has no names"));
            }

            self.insert(concept_id, trees.split(';'), names);
        }

        tracing::debug!(
            path = %path.display(),
            added = self.concepts.len() - before,
            "Vocabulary file loaded"
        );
        Ok(())
    }

    /// Number of concepts
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Number of distinct normalized names
    pub fn name_count(&self) -> usize {
        self.name_index.len()
    }

    pub fn get(&self, concept_id: &str) -> Option<&ConceptRecord> {
        self.id_index.get(concept_id).map(|&idx| &self.concepts[idx])
    }

    pub fn normalizer(&self) -> Normalizer {
        self.normalize
    }

    /// Log a summary of the loaded vocabulary
    pub fn info(&self) {
        tracing::info!(
            concepts = self.concepts.len(),
            names = self.name_index.len(),
            tokens = self.token_index.len(),
            lsh_rows = self.params.rows,
            lsh_bands = self.params.bands,
            "Vocabulary ready"
        );
    }

    /// Closest name of a concept to an already normalized query
    fn best_name_score(&self, idx: ConceptIdx, query: &str) -> f64 {
        self.concepts[idx]
            .names
            .iter()
            .map(|name| strsim::jaro_winkler(query, name))
            .fold(0.0, f64::max)
    }
}

impl VocabularyIndex for ConceptTable {
    fn lookup(&self, term: &str, margin: f64, categories: &CategorySet) -> ConceptMatches {
        let query = (self.normalize)(term);
        if query.is_empty() {
            return ConceptMatches::default();
        }

        let mut scores: HashMap<ConceptIdx, f64> = HashMap::new();

        // Fast path: exact normalized name
        if let Some(ids) = self.name_index.get(&query) {
            for &idx in ids {
                scores.insert(idx, 1.0);
            }
        }

        // Slower path: concepts sharing a token, ranked by Jaro-Winkler
        for token in query.split_whitespace() {
            if let Some(ids) = self.token_index.get(token) {
                for &idx in ids {
                    scores
                        .entry(idx)
                        .or_insert_with(|| self.best_name_score(idx, &query));
                }
            }
        }

        scores.retain(|&idx, _| self.concepts[idx].admitted_by(categories));

        let best = scores.values().copied().fold(0.0, f64::max);
        let floor = best - margin;

        let candidates = scores
            .into_iter()
            .filter(|&(_, score)| score >= floor)
            .map(|(idx, score)| {
                let record = &self.concepts[idx];
                ConceptCandidate {
                    concept_id: record.concept_id.clone(),
                    score,
                    tree_numbers: record.tree_numbers.clone(),
                }
            })
            .collect();

        ConceptMatches::new(candidates)
    }
}
