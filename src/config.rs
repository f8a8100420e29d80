//! Linker configuration
//!
//! Loads the YAML configuration consumed at startup and validates it into
//! the strongly-typed parameters used by the matcher and vocabulary loader.
//!
//! ```yaml
//! vocabulary_source: mesh
//! vocabulary_file: data/mesh.tsv
//! custom_vocabulary_file: data/custom_files.txt
//! lsh_rows: 5
//! lsh_bands: 20
//! ner_threshold: 0.5
//! valid_labels: "word_scores:cancer,word_scores:gender"
//! match_threshold: 0.7
//! match_margin: 0.05
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::entity_linking::{CategoryResolver, MatchParams};
use crate::error::{ConfigError, VocabularyError};
use crate::vocabulary::{read_file_list, IndexParams, VocabularySource};

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "config/nel.yaml";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct NelConfig {
    /// Main vocabulary file
    pub vocabulary_file: PathBuf,
    /// File listing extra vocabulary files, one per line
    #[serde(default)]
    pub custom_vocabulary_file: Option<PathBuf>,
    /// Vocabulary backend ("mesh" or "umls")
    pub vocabulary_source: String,
    pub lsh_rows: usize,
    pub lsh_bands: usize,
    /// NER score floor; slots must score strictly above it
    pub ner_threshold: f64,
    /// Comma-separated NER labels to link
    pub valid_labels: String,
    /// Minimum best-candidate score for a match
    pub match_threshold: f64,
    /// Candidate breadth passed to the vocabulary index
    pub match_margin: f64,
    /// Label -> category codes, replacing the built-in rules
    #[serde(default)]
    pub label_categories: Option<HashMap<String, Vec<String>>>,
}

impl NelConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: NelConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Check every value without loading anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.match_params()?;
        self.vocabulary_source()?;
        self.index_params()?;
        Ok(())
    }

    pub fn match_params(&self) -> Result<MatchParams, ConfigError> {
        if !(0.0..1.0).contains(&self.ner_threshold) {
            return Err(invalid("ner_threshold", "must be in [0, 1)"));
        }
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err(invalid("match_threshold", "must be in (0, 1]"));
        }
        if !self.match_margin.is_finite() || self.match_margin < 0.0 {
            return Err(invalid("match_margin", "must be a non-negative number"));
        }

        let valid_labels = parse_labels(&self.valid_labels);
        if valid_labels.is_empty() {
            return Err(invalid("valid_labels", "at least one label is required"));
        }

        Ok(MatchParams {
            ner_threshold: self.ner_threshold,
            valid_labels,
            match_threshold: self.match_threshold,
            match_margin: self.match_margin,
        })
    }

    pub fn vocabulary_source(&self) -> Result<VocabularySource, ConfigError> {
        VocabularySource::parse(&self.vocabulary_source)
    }

    pub fn index_params(&self) -> Result<IndexParams, ConfigError> {
        if self.lsh_rows == 0 {
            return Err(invalid("lsh_rows", "must be greater than zero"));
        }
        if self.lsh_bands == 0 {
            return Err(invalid("lsh_bands", "must be greater than zero"));
        }
        Ok(IndexParams {
            rows: self.lsh_rows,
            bands: self.lsh_bands,
        })
    }

    pub fn category_resolver(&self) -> CategoryResolver {
        match &self.label_categories {
            Some(rules) => CategoryResolver::new(rules.clone()),
            None => CategoryResolver::default(),
        }
    }

    /// Resolve the custom vocabulary list, if configured
    pub fn custom_vocabulary_files(&self) -> Result<Vec<PathBuf>, VocabularyError> {
        match &self.custom_vocabulary_file {
            Some(path) => read_file_list(path),
            None => Ok(Vec::new()),
        }
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

/// Split a comma-separated label list, trimming and dropping empties
pub fn parse_labels(s: &str) -> HashSet<String> {
    s.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
