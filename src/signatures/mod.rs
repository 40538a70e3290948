//! Per-language structural signature catalogues
//!
//! A signature is an immutable structural matcher tied to a known
//! complexity label and a base confidence. Catalogues are grouped per
//! language because the surface syntax of "linear scan", "sort", or
//! "membership test" differs even when the label is identical.
//!
//! The catalogue is built once at engine startup and read-only
//! thereafter.

mod cpp;
mod generic;
mod java;
mod javascript;
mod python;

use crate::models::{ComplexityClass, Language};
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// A named structural matcher with an associated complexity label.
#[derive(Debug, Clone)]
pub struct Signature {
    /// Compiled structural matcher.
    pub pattern: Regex,
    pub time_class: ComplexityClass,
    pub space_class: ComplexityClass,
    pub description: &'static str,
    /// Base confidence in `[0, 1]` when this signature matches.
    pub base_confidence: f64,
}

impl Signature {
    /// Count non-overlapping occurrences of this signature in `code`.
    pub fn occurrences(&self, code: &str) -> usize {
        self.pattern.find_iter(code).count()
    }
}

/// Build one signature, skipping (with a warning) on a bad pattern.
///
/// Patterns are static literals, so a failure here is a programming
/// error in the table; the engine degrades rather than aborting.
pub(crate) fn sig(
    pattern: &str,
    time_class: ComplexityClass,
    space_class: ComplexityClass,
    description: &'static str,
    base_confidence: f64,
) -> Option<Signature> {
    match Regex::new(pattern) {
        Ok(re) => Some(Signature {
            pattern: re,
            time_class,
            space_class,
            description,
            base_confidence: base_confidence.clamp(0.0, 1.0),
        }),
        Err(e) => {
            warn!("skipping malformed signature pattern '{pattern}': {e}");
            None
        }
    }
}

/// The process-wide, read-only signature catalogue.
pub struct SignatureCatalog {
    by_language: HashMap<Language, Vec<Signature>>,
}

impl SignatureCatalog {
    /// Build the full catalogue for every supported language.
    pub fn new() -> Self {
        let mut by_language = HashMap::new();

        by_language.insert(Language::Python, python::signatures());
        by_language.insert(Language::Cpp, cpp::signatures());
        by_language.insert(Language::C, cpp::signatures());
        by_language.insert(Language::Java, java::signatures());
        by_language.insert(Language::JavaScript, javascript::signatures());
        by_language.insert(Language::TypeScript, javascript::signatures());
        by_language.insert(Language::Go, generic::signatures());
        by_language.insert(Language::Rust, generic::signatures());

        Self { by_language }
    }

    /// Signatures for one language, in registration order.
    ///
    /// Registration order is the documented tie-break after base
    /// confidence when two equally specific signatures match.
    pub fn for_language(&self, language: Language) -> &[Signature] {
        self.by_language
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Match every signature for `language` against `code`.
    ///
    /// Returns `(signature, occurrence_count)` pairs in registration
    /// order, skipping signatures that did not fire.
    pub fn matches<'a>(&'a self, code: &str, language: Language) -> Vec<(&'a Signature, usize)> {
        self.for_language(language)
            .iter()
            .filter_map(|s| {
                let count = s.occurrences(code);
                (count > 0).then_some((s, count))
            })
            .collect()
    }
}

impl Default for SignatureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_signatures() {
        let catalog = SignatureCatalog::new();
        for &lang in Language::all() {
            assert!(
                !catalog.for_language(lang).is_empty(),
                "no signatures registered for {lang}"
            );
        }
    }

    #[test]
    fn test_base_confidences_in_range() {
        let catalog = SignatureCatalog::new();
        for &lang in Language::all() {
            for s in catalog.for_language(lang) {
                assert!(
                    (0.0..=1.0).contains(&s.base_confidence),
                    "{}: confidence {} out of range",
                    s.description,
                    s.base_confidence
                );
            }
        }
    }

    #[test]
    fn test_python_sort_matches() {
        let catalog = SignatureCatalog::new();
        let matches = catalog.matches("arr.sort()\n", Language::Python);
        assert!(matches
            .iter()
            .any(|(s, _)| s.time_class == ComplexityClass::Linearithmic));
    }

    #[test]
    fn test_no_match_on_trivial_code() {
        let catalog = SignatureCatalog::new();
        let matches = catalog.matches("x = 1\n", Language::Python);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_malformed_pattern_skipped() {
        assert!(sig(
            "for\\s+(unclosed",
            ComplexityClass::Linear,
            ComplexityClass::Constant,
            "bad",
            0.5
        )
        .is_none());
    }
}
