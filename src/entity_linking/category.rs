//! Label to vocabulary-category resolution
//!
//! MeSH tree numbers start with a category letter ("C" diseases, "M"
//! persons, ...). A slot's NER label decides which categories its sub-terms
//! may match; labels without a rule match anything.

use std::collections::{BTreeSet, HashMap};

/// NER label for cancer / oncology entities
pub const CANCER_LABEL: &str = "word_scores:cancer";

/// NER label for gender / demographic entities
pub const GENDER_LABEL: &str = "word_scores:gender";

/// Admissible vocabulary categories. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet(BTreeSet<String>);

impl CategorySet {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn of<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a concept in `category` may be returned
    pub fn admits(&self, category: &str) -> bool {
        self.0.is_empty() || self.0.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Maps NER labels to category sets
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    rules: HashMap<String, CategorySet>,
    default: CategorySet,
}

impl Default for CategoryResolver {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(CANCER_LABEL.to_string(), CategorySet::of(["C"]));
        rules.insert(GENDER_LABEL.to_string(), CategorySet::of(["M"]));
        Self {
            rules,
            default: CategorySet::unrestricted(),
        }
    }
}

impl CategoryResolver {
    /// Build a resolver from explicit label rules
    pub fn new(rules: HashMap<String, Vec<String>>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(label, codes)| (label, CategorySet::of(codes)))
                .collect(),
            default: CategorySet::unrestricted(),
        }
    }

    pub fn resolve(&self, label: &str) -> &CategorySet {
        self.rules.get(label).unwrap_or(&self.default)
    }
}
