//! Vocabulary source selection and loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::concept_table::ConceptTable;
use super::normalize::{normalize_mesh_term, Normalizer};
use crate::error::{ConfigError, VocabularyError};

/// Which vocabulary backend to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularySource {
    /// Medical Subject Headings; supports custom vocabulary extensions
    Mesh,
    /// UMLS Metathesaurus export
    Umls,
}

impl VocabularySource {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mesh" => Ok(VocabularySource::Mesh),
            "umls" => Ok(VocabularySource::Umls),
            _ => Err(ConfigError::UnknownVocabularySource(s.to_string())),
        }
    }

    /// Normalizer applied to vocabulary names, queries and slot terms
    pub fn normalizer(self) -> Normalizer {
        // UMLS strings are MeSH-style headings as well
        normalize_mesh_term
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VocabularySource::Mesh => "mesh",
            VocabularySource::Umls => "umls",
        }
    }
}

impl FromStr for VocabularySource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VocabularySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index construction parameters (LSH rows and bands)
///
/// Carried through to the loaded index so an LSH-backed implementation can
/// size its signature bands; the in-memory table only reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexParams {
    pub rows: usize,
    pub bands: usize,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self { rows: 5, bands: 20 }
    }
}

/// Read a list of vocabulary file names, one per line.
///
/// Blank lines and `#` comments are skipped. Relative names resolve against
/// the directory of the list file.
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>, VocabularyError> {
    let content = fs::read_to_string(path).map_err(|source| VocabularyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let name = Path::new(line);
            if name.is_absolute() {
                name.to_path_buf()
            } else {
                base.join(name)
            }
        })
        .collect())
}

/// Load a vocabulary into an in-memory concept table
pub fn load_vocabulary(
    source: VocabularySource,
    vocabulary_file: &Path,
    custom_files: &[PathBuf],
    params: IndexParams,
) -> Result<ConceptTable, VocabularyError> {
    tracing::info!(
        source = %source,
        path = %vocabulary_file.display(),
        custom_files = custom_files.len(),
        "Loading vocabulary"
    );

    let mut table = ConceptTable::new(source.normalizer(), params);
    table.load_file(vocabulary_file)?;

    match source {
        VocabularySource::Mesh => {
            for path in custom_files {
                table.load_file(path)?;
            }
        }
        VocabularySource::Umls if !custom_files.is_empty() => {
            tracing::warn!(
                ignored = custom_files.len(),
                "Custom vocabulary files are only supported for MeSH"
            );
        }
        VocabularySource::Umls => {}
    }

    table.info();
    Ok(table)
}
