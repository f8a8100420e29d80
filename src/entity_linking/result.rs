//! Linking result

use serde::{Deserialize, Serialize};

use super::slot::Slot;
use crate::vocabulary::ConceptMatches;

/// The concept a payload was linked to.
///
/// Field names serialize in PascalCase to keep the established wire shape
/// (`{"Category": ..., "Concepts": ..., "Tree": ..., "Score": ...}`).
/// An empty result (all fields zero/empty) means no slot qualified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinkResult {
    /// Winning slot as `label\tterm\tscore`, with the term normalized
    pub category: String,
    /// Pipe-joined concept ids
    pub concepts: String,
    /// Pipe-joined tree numbers
    pub tree: String,
    /// Best candidate score
    pub score: f64,
}

impl LinkResult {
    pub fn from_match(slot: &Slot, matches: &ConceptMatches) -> Self {
        Self {
            category: slot.to_string(),
            concepts: matches.concept_ids().join("|"),
            tree: matches.tree_numbers().join("|"),
            score: matches.max_score(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::ConceptCandidate;

    #[test]
    fn test_from_match_joins_fields() {
        let slot = Slot::new("word_scores:cancer", "breast cancer", 0.92);
        let matches = ConceptMatches::new(vec![
            ConceptCandidate::new("D001943", 0.81, ["C04.588.180"]),
            ConceptCandidate::new("D018567", 0.78, ["C04.588.180.390"]),
        ]);

        let result = LinkResult::from_match(&slot, &matches);
        assert_eq!(result.category, "word_scores:cancer\tbreast cancer\t0.920");
        assert_eq!(result.concepts, "D001943|D018567");
        assert_eq!(result.tree, "C04.588.180|C04.588.180.390");
        assert_eq!(result.score, 0.81);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        let result = LinkResult::default();
        assert!(result.is_empty());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(LinkResult::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Category": "", "Concepts": "", "Tree": "", "Score": 0.0})
        );
    }
}
