//! MeSH NEL - Named Entity Linking over a controlled vocabulary
//!
//! Takes entities already extracted by an upstream NER model and grounds
//! each one to a concept in a vocabulary such as MeSH, returning the best
//! concept together with its tree numbers and score.
//!
//! ## Pipeline
//!
//! ```text
//! NER payload ──► extract_slots ──► Slot* ──► sub_terms ──► CategoryResolver
//!                                                               │
//!                                                               ▼
//!                    LinkResult ◄── threshold check ◄── VocabularyIndex::lookup
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mesh_nel::{config::NelConfig, EntityLinker};
//!
//! let config = NelConfig::from_file("config/nel.yaml")?;
//! let linker = EntityLinker::from_config(&config)?;
//! let result = linker.link(r#"{"word_scores:cancer": [["breast cancer", 0.92]]}"#)?;
//! println!("{} -> {}", result.category, result.concepts);
//! # Ok::<(), anyhow::Error>(())
//! ```

// Core error handling
pub mod error;

// Startup configuration
pub mod config;

// Slot extraction and match selection
pub mod entity_linking;

// Vocabulary index seam, normalization and the in-memory concept table
pub mod vocabulary;

pub use entity_linking::{
    extract_slots, CategoryResolver, CategorySet, EntityLinker, LinkResult, MatchParams, Slot,
};
pub use error::{ConfigError, LinkerError, NelError, VocabularyError};
pub use vocabulary::{ConceptCandidate, ConceptMatches, ConceptTable, VocabularyIndex};
