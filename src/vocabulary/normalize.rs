//! Text normalization for vocabulary matching
//!
//! Vocabulary names, query phrases and slot terms all pass through the
//! same normalizer so that they compare in one canonical form:
//! - Unicode NFKC normalization
//! - Possessive "'s" removal ("Crohn's disease" -> "crohn disease")
//! - Lowercase conversion
//! - Punctuation stripping (replaced with space)
//! - Whitespace collapsing

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Vocabulary-specific term normalizer
pub type Normalizer = fn(&str) -> String;

/// Possessive suffix, straight or curly apostrophe
static POSSESSIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)['\u{2019}][sS]\b").unwrap());

/// Normalize a term the way MeSH headings are compared.
///
/// # Examples
///
/// ```
/// use mesh_nel::vocabulary::normalize_mesh_term;
///
/// assert_eq!(normalize_mesh_term("Breast Neoplasms"), "breast neoplasms");
/// assert_eq!(normalize_mesh_term("Hodgkin's Disease"), "hodgkin disease");
/// assert_eq!(normalize_mesh_term("  non-small-cell   lung "), "non small cell lung");
/// ```
pub fn normalize_mesh_term(s: &str) -> String {
    // Unicode NFKC normalization
    let folded: String = s.nfkc().collect();
    let folded = POSSESSIVE_RE.replace_all(&folded, "$1");

    // Replace non-alphanumeric with space, lowercase
    let stripped: String = folded
        .chars()
        .flat_map(|c| {
            let c = if c.is_alphanumeric() { c } else { ' ' };
            c.to_lowercase()
        })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_collapse() {
        assert_eq!(normalize_mesh_term("  Breast   Cancer  "), "breast cancer");
    }

    #[test]
    fn test_punctuation_handling() {
        assert_eq!(normalize_mesh_term("Neoplasms, Breast"), "neoplasms breast");
        assert_eq!(normalize_mesh_term("HER2/neu-positive"), "her2 neu positive");
    }

    #[test]
    fn test_possessive_removed() {
        assert_eq!(normalize_mesh_term("Crohn's disease"), "crohn disease");
        assert_eq!(normalize_mesh_term("Crohn\u{2019}s disease"), "crohn disease");
        // Plain apostrophes that are not possessives just split tokens
        assert_eq!(normalize_mesh_term("o'clock"), "o clock");
    }

    #[test]
    fn test_unicode_normalization() {
        // Full-width characters are converted to ASCII by NFKC
        assert_eq!(normalize_mesh_term("ＴＵＭＯＲ"), "tumor");
        // Diacritics are preserved, only case folds
        assert_eq!(normalize_mesh_term("Ménière Disease"), "ménière disease");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_mesh_term(""), "");
        assert_eq!(normalize_mesh_term("(),;"), "");
    }
}
