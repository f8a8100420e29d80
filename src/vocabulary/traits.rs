//! Core traits and types for the vocabulary index abstraction
//!
//! This module defines the `VocabularyIndex` trait that allows different
//! concept retrieval backends to be used interchangeably by the matcher.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::entity_linking::CategorySet;

/// A single scored concept returned by an index lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptCandidate {
    /// Vocabulary concept identifier (e.g. MeSH descriptor "D001943")
    pub concept_id: String,
    /// Similarity between the query phrase and the concept
    pub score: f64,
    /// Taxonomy tree numbers (e.g. "C04.588.180")
    pub tree_numbers: SmallVec<[String; 4]>,
}

impl ConceptCandidate {
    pub fn new<I, S>(concept_id: impl Into<String>, score: f64, tree_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            concept_id: concept_id.into(),
            score,
            tree_numbers: tree_numbers.into_iter().map(Into::into).collect(),
        }
    }
}

/// The candidate set produced by one index lookup.
///
/// Candidates are kept sorted by score (highest first), ties broken by
/// concept id so that joined output is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptMatches {
    candidates: Vec<ConceptCandidate>,
}

impl ConceptMatches {
    pub fn new(mut candidates: Vec<ConceptCandidate>) -> Self {
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.concept_id.cmp(&b.concept_id))
        });
        Self { candidates }
    }

    /// Best score in the set, 0.0 when empty
    pub fn max_score(&self) -> f64 {
        self.candidates.first().map(|c| c.score).unwrap_or(0.0)
    }

    pub fn concept_ids(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|c| c.concept_id.as_str())
            .collect()
    }

    /// Tree numbers of every candidate, de-duplicated in first-seen order
    pub fn tree_numbers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tree in self.candidates.iter().flat_map(|c| c.tree_numbers.iter()) {
            if !seen.contains(&tree.as_str()) {
                seen.push(tree);
            }
        }
        seen
    }

    pub fn candidates(&self) -> &[ConceptCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Concept retrieval over a loaded vocabulary
///
/// Implementations are read-only after loading and must be Send + Sync so a
/// single index can serve concurrent matching calls without locking.
pub trait VocabularyIndex: Send + Sync {
    /// Return the concepts plausibly denoted by `term`.
    ///
    /// Only concepts admitted by `categories` are returned. `margin` bounds
    /// breadth: candidates scoring below `best - margin` are dropped.
    fn lookup(&self, term: &str, margin: f64, categories: &CategorySet) -> ConceptMatches;
}

/// Category code of a tree number: its leading letter ("C04.588" -> "C")
pub fn category_of(tree_number: &str) -> &str {
    tree_number
        .char_indices()
        .nth(1)
        .map(|(i, _)| &tree_number[..i])
        .unwrap_or(tree_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sorted_by_score() {
        let matches = ConceptMatches::new(vec![
            ConceptCandidate::new("D002", 0.6, ["C04.1"]),
            ConceptCandidate::new("D001", 0.9, ["C04.2"]),
            ConceptCandidate::new("D000", 0.6, ["C04.3"]),
        ]);

        assert_eq!(matches.concept_ids(), vec!["D001", "D000", "D002"]);
        assert_eq!(matches.max_score(), 0.9);
    }

    #[test]
    fn test_empty_matches() {
        let matches = ConceptMatches::default();
        assert!(matches.is_empty());
        assert_eq!(matches.max_score(), 0.0);
        assert!(matches.tree_numbers().is_empty());
    }

    #[test]
    fn test_tree_numbers_deduplicated() {
        let matches = ConceptMatches::new(vec![
            ConceptCandidate::new("D001", 0.9, ["C04.588", "C17.800"]),
            ConceptCandidate::new("D002", 0.8, ["C17.800", "C04.557"]),
        ]);

        assert_eq!(matches.tree_numbers(), vec!["C04.588", "C17.800", "C04.557"]);
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("C04.588.180"), "C");
        assert_eq!(category_of("M01"), "M");
        assert_eq!(category_of(""), "");
    }
}
