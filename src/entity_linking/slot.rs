//! NER slot extraction
//!
//! The upstream NER model emits a label-keyed object where each label maps
//! to `[term, score]` pairs:
//!
//! ```text
//! {"word_scores:cancer": [["breast and colon cancer", 0.92]],
//!  "word_scores:gender": [["women", 0.81]]}
//! ```
//!
//! Labels are visited in payload order, so the first qualifying slot is
//! stable for a given payload text.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{NelError, Result};
use crate::vocabulary::Normalizer;

/// A parenthesized span, or an unterminated one running to the end
static PARENTHESES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*(\)|$)").unwrap());

/// Connectives separating independently matchable phrases
static CONJUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" and | or |,").unwrap());

/// One NER detection
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    label: String,
    term: String,
    score: f64,
}

impl Slot {
    pub fn new(label: impl Into<String>, term: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            term: term.into(),
            score,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Split the term on " and ", " or " and commas.
    ///
    /// Fragments are trimmed and empty ones dropped; order follows the term.
    pub fn sub_terms(&self) -> Vec<String> {
        CONJUNCTION_RE
            .split(&self.term)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Rewrite the term into its vocabulary-normalized form
    pub fn normalize(&mut self, normalize: Normalizer) {
        self.term = normalize(&self.term);
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{:.3}", self.label, self.term, self.score)
    }
}

/// Remove parenthesized content and trim.
///
/// ```
/// use mesh_nel::entity_linking::strip_parentheticals;
///
/// assert_eq!(strip_parentheticals("tumor (malignant)"), "tumor");
/// assert_eq!(strip_parentheticals("tumor (unterminated"), "tumor");
/// ```
pub fn strip_parentheticals(term: &str) -> String {
    PARENTHESES_RE.replace_all(term, " ").trim().to_string()
}

/// Cleaned term, falling back to the trimmed original when cleanup leaves
/// nothing (e.g. a term that is entirely parenthesized)
fn clean_term(term: &str) -> String {
    let cleaned = strip_parentheticals(term);
    if cleaned.is_empty() {
        term.trim().to_string()
    } else {
        cleaned
    }
}

/// Parse one `[term, score]` pair. Later elements of the same type win.
fn parse_pair(label: &str, index: usize, fields: &Value) -> Result<(String, f64)> {
    let fields = fields
        .as_array()
        .ok_or_else(|| NelError::malformed(label, index, "expected a [term, score] array"))?;

    let mut term = String::new();
    let mut score = 0.0;
    for field in fields {
        match field {
            Value::String(s) => term = s.clone(),
            Value::Number(n) => {
                score = n
                    .as_f64()
                    .ok_or_else(|| NelError::malformed(label, index, "score out of range"))?;
            }
            other => {
                return Err(NelError::malformed(
                    label,
                    index,
                    format!("unexpected value type: {}", other),
                ))
            }
        }
    }
    Ok((term, score))
}

/// Parse an NER payload into slots.
///
/// Pairs under labels outside `valid_labels` are ignored without being
/// inspected. A pair is kept when its score is strictly above
/// `ner_threshold` and its cleaned term is non-empty. A pair holding anything
/// other than strings and numbers rejects the whole payload.
pub fn extract_slots(
    payload: &str,
    ner_threshold: f64,
    valid_labels: &HashSet<String>,
) -> Result<Vec<Slot>> {
    let data: Value = serde_json::from_str(payload)?;
    let object = data.as_object().ok_or(NelError::NotAnObject)?;

    let mut slots = Vec::new();
    for (label, values) in object {
        if !valid_labels.contains(label) {
            continue;
        }

        let pairs = values
            .as_array()
            .ok_or_else(|| NelError::malformed(label, 0, "expected an array of pairs"))?;

        for (index, fields) in pairs.iter().enumerate() {
            let (term, score) = parse_pair(label, index, fields)?;
            let term = clean_term(&term);
            if score > ner_threshold && !term.is_empty() {
                slots.push(Slot::new(label.as_str(), term, score));
            }
        }
    }

    tracing::debug!(slots = slots.len(), "NER slots extracted");
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::normalize_mesh_term;
    use proptest::prelude::*;

    fn labels(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sub_terms_split_on_conjunctions() {
        let slot = Slot::new("l", "breast and colon cancer", 0.9);
        assert_eq!(slot.sub_terms(), vec!["breast", "colon cancer"]);

        let slot = Slot::new("l", "A, B and C", 0.9);
        assert_eq!(slot.sub_terms(), vec!["A", "B", "C"]);

        let slot = Slot::new("l", "lymphoma or leukemia", 0.9);
        assert_eq!(slot.sub_terms(), vec!["lymphoma", "leukemia"]);
    }

    #[test]
    fn test_sub_terms_drop_empty_fragments() {
        let slot = Slot::new("l", ", ,melanoma,, ", 0.9);
        assert_eq!(slot.sub_terms(), vec!["melanoma"]);

        // Connectives must be whole words
        let slot = Slot::new("l", "pandora", 0.9);
        assert_eq!(slot.sub_terms(), vec!["pandora"]);
    }

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(strip_parentheticals("tumor (malignant)"), "tumor");
        assert_eq!(strip_parentheticals("tumor (unterminated"), "tumor");
        assert_eq!(strip_parentheticals("a (x) b (y)"), "a   b");
        assert_eq!(strip_parentheticals("(only)"), "");
    }

    #[test]
    fn test_clean_term_falls_back_to_original() {
        assert_eq!(clean_term("(HER2)"), "(HER2)");
        assert_eq!(clean_term("  "), "");
    }

    #[test]
    fn test_normalize_in_place() {
        let mut slot = Slot::new("word_scores:cancer", "Breast Cancer", 0.92);
        let sub_terms = slot.sub_terms();
        slot.normalize(normalize_mesh_term);

        assert_eq!(sub_terms, vec!["Breast Cancer"]);
        assert_eq!(slot.term(), "breast cancer");
        assert_eq!(slot.to_string(), "word_scores:cancer\tbreast cancer\t0.920");
    }

    #[test]
    fn test_extract_applies_floor_and_labels() {
        let payload = r#"{
            "word_scores:cancer": [["breast cancer (stage II)", 0.92], ["tumor", 0.4]],
            "word_scores:drug": [["tamoxifen", 0.99]]
        }"#;
        let slots = extract_slots(payload, 0.5, &labels(&["word_scores:cancer"])).unwrap();

        assert_eq!(slots, vec![Slot::new("word_scores:cancer", "breast cancer", 0.92)]);
    }

    #[test]
    fn test_extract_floor_is_exclusive() {
        let payload = r#"{"l": [["tumor", 0.5]]}"#;
        assert!(extract_slots(payload, 0.5, &labels(&["l"])).unwrap().is_empty());
    }

    #[test]
    fn test_extract_preserves_payload_order() {
        let payload = r#"{"z": [["first", 0.9]], "a": [["second", 0.9]], "m": [["third", 0.9]]}"#;
        let slots = extract_slots(payload, 0.0, &labels(&["a", "m", "z"])).unwrap();

        let terms: Vec<_> = slots.iter().map(|s| s.term()).collect();
        assert_eq!(terms, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_extract_accepts_score_first_pairs() {
        let payload = r#"{"l": [[0.8, "glioma"]]}"#;
        let slots = extract_slots(payload, 0.5, &labels(&["l"])).unwrap();
        assert_eq!(slots, vec![Slot::new("l", "glioma", 0.8)]);
    }

    #[test]
    fn test_extract_rejects_unexpected_value_type() {
        let payload = r#"{"l": [["glioma", 0.8]], "m": [["x", true]]}"#;
        let err = extract_slots(payload, 0.5, &labels(&["l", "m"])).unwrap_err();

        match err {
            NelError::MalformedEntry { label, index, .. } => {
                assert_eq!(label, "m");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extract_ignores_malformed_unlisted_labels() {
        let payload = r#"{"l": [["glioma", 0.8]], "other": [["x", null]]}"#;
        let slots = extract_slots(payload, 0.5, &labels(&["l"])).unwrap();
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_extract_rejects_bad_payloads() {
        let valid = labels(&["l"]);
        assert!(matches!(
            extract_slots("not json", 0.5, &valid),
            Err(NelError::Payload(_))
        ));
        assert!(matches!(
            extract_slots("[1, 2]", 0.5, &valid),
            Err(NelError::NotAnObject)
        ));
        assert!(matches!(
            extract_slots(r#"{"l": "glioma"}"#, 0.5, &valid),
            Err(NelError::MalformedEntry { .. })
        ));
        assert!(matches!(
            extract_slots(r#"{"l": ["glioma"]}"#, 0.5, &valid),
            Err(NelError::MalformedEntry { .. })
        ));
    }

    proptest! {
        #[test]
        fn sub_terms_are_trimmed_and_non_empty(term in "[a-z ,]{0,40}") {
            let slot = Slot::new("l", term, 1.0);
            for sub in slot.sub_terms() {
                prop_assert!(!sub.is_empty());
                prop_assert_eq!(sub.trim(), sub.as_str());
                prop_assert!(!sub.contains(','));
            }
        }

        #[test]
        fn extracted_slots_clear_the_floor(
            cents in prop::collection::vec(0u32..100, 0..10),
            floor_cents in 0u32..100,
        ) {
            // Two-decimal scores survive the JSON round trip exactly
            let scores: Vec<f64> = cents.iter().map(|c| f64::from(*c) / 100.0).collect();
            let floor = f64::from(floor_cents) / 100.0 + 0.005;

            let pairs: Vec<_> = scores.iter().map(|s| serde_json::json!(["tumor", s])).collect();
            let payload = serde_json::json!({ "l": pairs }).to_string();

            let slots = extract_slots(&payload, floor, &labels(&["l"])).unwrap();
            prop_assert_eq!(slots.len(), scores.iter().filter(|s| **s > floor).count());
            prop_assert!(slots.iter().all(|s| s.score() > floor && !s.term().is_empty()));
        }
    }
}
