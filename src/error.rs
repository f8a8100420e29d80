//! Error types for entity linking
//!
//! Per-call errors (`NelError`) abort a single matching call and leave the
//! shared linker untouched. Configuration and vocabulary errors abort startup.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while linking one NER payload
#[derive(Error, Debug)]
pub enum NelError {
    #[error("Payload decode error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Payload is not a label-keyed object")]
    NotAnObject,

    #[error("Malformed NER entry under '{label}' at index {index}: {reason}")]
    MalformedEntry {
        label: String,
        index: usize,
        reason: String,
    },
}

impl NelError {
    pub(crate) fn malformed(label: &str, index: usize, reason: impl Into<String>) -> Self {
        NelError::MalformedEntry {
            label: label.to_string(),
            index,
            reason: reason.into(),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Unknown vocabulary source '{0}'")]
    UnknownVocabularySource(String),
}

/// Vocabulary file loading errors
#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Errors raised while building a linker from configuration
#[derive(Error, Debug)]
pub enum LinkerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),
}

pub type Result<T> = std::result::Result<T, NelError>;
