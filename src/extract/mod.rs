//! Feature extraction
//!
//! Turns one snippet into a [`FeatureSet`]: structural facts from a
//! grammar-aware walk (or the lexical fallback when parsing fails),
//! signature matches from the per-language catalog, and composite
//! pattern flags. The same features feed both estimators so their
//! outputs stay comparable.

pub mod ast;
pub mod composite;
pub mod heuristic;

use crate::models::{ComplexityClass, Language};
use crate::signatures::SignatureCatalog;
use ast::{Extraction, StructuralFacts};
use composite::CompositeFlags;
use tracing::debug;

/// Length of the numeric vector handed to the learned estimator.
pub const NUM_FEATURES: usize = 23;

/// Number of composite-flag slots at the tail of the vector.
pub const NUM_FLAGS: usize = composite::CompositeFlag::ALL.len();

/// Index of the first composite-flag slot.
pub const FLAG_OFFSET: usize = NUM_FEATURES - NUM_FLAGS;

/// How the structural facts were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactsSource {
    /// Grammar-aware parse succeeded.
    Grammar,
    /// Parse failed; facts come from the lexical fallback scan.
    FallbackScan,
}

/// One signature hit, detached from the catalog's lifetime.
#[derive(Debug, Clone)]
pub struct SignatureMatch {
    pub description: &'static str,
    pub time_class: ComplexityClass,
    pub space_class: ComplexityClass,
    pub base_confidence: f64,
    pub occurrences: usize,
}

/// Everything the estimators see about one snippet.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub language: Language,
    pub facts: StructuralFacts,
    pub facts_source: FactsSource,
    pub matches: Vec<SignatureMatch>,
    pub flags: CompositeFlags,
    pub line_count: usize,
    /// Extraction-time observations surfaced in the final breakdown.
    pub notes: Vec<String>,
}

impl FeatureSet {
    /// Ceiling imposed on any estimate built from these features.
    pub fn confidence_ceiling(&self) -> f64 {
        match self.facts_source {
            FactsSource::Grammar => 1.0,
            FactsSource::FallbackScan => heuristic::FALLBACK_CONFIDENCE_CEILING,
        }
    }

    /// Fixed-width numeric encoding for the learned estimator.
    pub fn to_vector(&self) -> [f64; NUM_FEATURES] {
        let mut v = [0.0; NUM_FEATURES];
        v[0] = self.facts.loop_count as f64;
        v[1] = self.facts.nested_loop_count as f64;
        v[2] = if self.facts.recursion_present { 1.0 } else { 0.0 };
        v[3] = self.facts.function_count as f64;
        v[4] = self.facts.branch_count as f64;
        v[5] = self.facts.call_count as f64;
        v[6] = self.line_count as f64 / 100.0;

        v[7] = self.matches.len() as f64;
        v[8] = self
            .matches
            .iter()
            .map(|m| m.base_confidence)
            .fold(0.0, f64::max);

        // One slot per concrete time class: strongest matching signature.
        for m in &self.matches {
            if let Some(idx) = m.time_class.class_index() {
                let slot = 9 + idx;
                if m.base_confidence > v[slot] {
                    v[slot] = m.base_confidence;
                }
            }
        }

        for (i, flag) in composite::CompositeFlag::ALL.iter().enumerate() {
            v[FLAG_OFFSET + i] = if self.flags.contains(*flag) { 1.0 } else { 0.0 };
        }
        v
    }
}

/// Runs the full extraction pipeline.
pub struct Extractor {
    catalog: SignatureCatalog,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            catalog: SignatureCatalog::new(),
        }
    }

    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    pub fn extract(&self, code: &str, language: Language) -> FeatureSet {
        let mut notes = Vec::new();

        let (facts, facts_source) = match ast::extract(code, language) {
            Extraction::Parsed(facts) => (facts, FactsSource::Grammar),
            Extraction::ParseFailed(reason) => {
                debug!(%language, %reason, "parse failed, using lexical fallback");
                notes.push(format!(
                    "Grammar parse failed ({reason}); structure derived from a lexical scan"
                ));
                (heuristic::scan(code, language), FactsSource::FallbackScan)
            }
        };

        let matches: Vec<SignatureMatch> = self
            .catalog
            .matches(code, language)
            .into_iter()
            .map(|(sig, occurrences)| SignatureMatch {
                description: sig.description,
                time_class: sig.time_class,
                space_class: sig.space_class,
                base_confidence: sig.base_confidence,
                occurrences,
            })
            .collect();

        let flags = composite::detect(code, &facts);
        for flag in flags.iter() {
            notes.push(format!("Recognized pattern: {}", flag.describe()));
        }

        FeatureSet {
            language,
            facts,
            facts_source,
            matches,
            flags,
            line_count: code.lines().count(),
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_path_for_valid_python() {
        let ex = Extractor::new();
        let fs = ex.extract("for i in range(n):\n    total += i\n", Language::Python);
        assert_eq!(fs.facts_source, FactsSource::Grammar);
        assert_eq!(fs.facts.loop_count, 1);
        assert!((fs.confidence_ceiling() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fallback_path_for_malformed_python() {
        let ex = Extractor::new();
        let fs = ex.extract("def broken(:\n    for i in range(n)\n", Language::Python);
        assert_eq!(fs.facts_source, FactsSource::FallbackScan);
        assert!(fs.confidence_ceiling() <= heuristic::FALLBACK_CONFIDENCE_CEILING);
        assert!(!fs.notes.is_empty());
    }

    #[test]
    fn test_signature_matches_are_captured() {
        let ex = Extractor::new();
        let fs = ex.extract("arr.sort()\n", Language::Python);
        assert!(fs
            .matches
            .iter()
            .any(|m| m.time_class == ComplexityClass::Linearithmic));
    }

    #[test]
    fn test_vector_layout() {
        let ex = Extractor::new();
        let code = "for i in range(n):\n    for j in range(n):\n        total += 1\n";
        let fs = ex.extract(code, Language::Python);
        let v = fs.to_vector();
        assert_eq!(v.len(), NUM_FEATURES);
        assert!(v[0] >= 2.0);
        assert!(v[1] >= 1.0);
        // Quadratic signature presence lands in its class slot.
        let quad_slot = 9 + ComplexityClass::Quadratic.class_index().unwrap();
        assert!(v[quad_slot] > 0.0);
    }
}
