//! Vocabulary index abstraction and backends
//!
//! The matcher only depends on [`VocabularyIndex`] and a [`Normalizer`].
//! [`ConceptTable`] is the in-memory backend used by the binaries; any other
//! index (an LSH service, a remote lookup) plugs in through the same trait.

pub mod concept_table;
pub mod normalize;
pub mod source;
pub mod traits;

pub use concept_table::ConceptTable;
pub use normalize::{normalize_mesh_term, Normalizer};
pub use source::{load_vocabulary, read_file_list, IndexParams, VocabularySource};
pub use traits::{category_of, ConceptCandidate, ConceptMatches, VocabularyIndex};
