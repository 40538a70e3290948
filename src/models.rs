//! Core data models for bigo
//!
//! These models are used throughout the codebase for representing
//! complexity classes, analysis languages, estimates, and verdicts.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence ceiling for any estimate whose time class is `Unknown`.
///
/// An estimator that claims to be more than 40% sure of "no evidence"
/// is broken; constructors clamp against this.
pub const UNKNOWN_CONFIDENCE_CEILING: f64 = 0.4;

/// An asymptotic complexity class.
///
/// Concrete classes form a total order used for "pick the worse bound"
/// selection. `Unknown` means "no evidence": it sorts below every
/// concrete class (so `max` naturally ignores it) but is not part of
/// the complexity order proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ComplexityClass {
    #[default]
    Unknown,
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    Cubic,
    Exponential,
    Factorial,
}

impl ComplexityClass {
    /// All concrete classes in ascending order (excludes `Unknown`).
    pub const CONCRETE: [ComplexityClass; 8] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
        ComplexityClass::Cubic,
        ComplexityClass::Exponential,
        ComplexityClass::Factorial,
    ];

    /// Canonical textual form (`O(n log n)`, `O(n²)`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityClass::Unknown => "Unknown",
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n²)",
            ComplexityClass::Cubic => "O(n³)",
            ComplexityClass::Exponential => "O(2ⁿ)",
            ComplexityClass::Factorial => "O(n!)",
        }
    }

    /// True for any class other than `Unknown`.
    pub fn is_known(&self) -> bool {
        !matches!(self, ComplexityClass::Unknown)
    }

    /// Index into the ensemble's class-probability vectors.
    ///
    /// Only defined for concrete classes.
    pub fn class_index(&self) -> Option<usize> {
        Self::CONCRETE.iter().position(|c| c == self)
    }

    /// Inverse of [`ComplexityClass::class_index`].
    pub fn from_class_index(idx: usize) -> Option<ComplexityClass> {
        Self::CONCRETE.get(idx).copied()
    }

    /// Normalize an arbitrary textual label to the canonical class.
    ///
    /// Training data and user input carry inconsistent notations:
    /// `O(n^2)` vs `O(n²)`, `O(nlogn)` vs `O(n log n)`, graph-shaped
    /// labels like `O(V+E)`. Everything maps through here before any
    /// comparison or storage; unrecognized labels become `Unknown`.
    pub fn normalize(label: &str) -> ComplexityClass {
        // Collapse whitespace and case so "O( N Log N )" still matches.
        let compact: String = label
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match compact.as_str() {
            "o(1)" | "o(c)" | "constant" => ComplexityClass::Constant,
            "o(logn)" | "o(log(n))" | "o(lgn)" => ComplexityClass::Logarithmic,
            // Constant factors drop: O(2n) is linear.
            "o(n)" | "o(2n)" | "o(v+e)" | "o(e+v)" | "o(n+m)" | "o(m+n)" | "linear" => {
                ComplexityClass::Linear
            }
            "o(nlogn)" | "o(n*logn)" | "o(nlog(n))" | "o(n*log(n))" | "o(nlgn)" => {
                ComplexityClass::Linearithmic
            }
            "o(n²)" | "o(n^2)" | "o(n2)" | "o(n*n)" | "quadratic" => ComplexityClass::Quadratic,
            "o(n³)" | "o(n^3)" | "o(n3)" => ComplexityClass::Cubic,
            "o(2ⁿ)" | "o(2^n)" | "exponential" => ComplexityClass::Exponential,
            "o(n!)" | "factorial" => ComplexityClass::Factorial,
            _ => ComplexityClass::Unknown,
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComplexityClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComplexityClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ComplexityClass::normalize(&s))
    }
}

/// Error returned when a language name cannot be resolved.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported language: '{0}' (supported: python, javascript, typescript, java, c, cpp, go, rust)")]
pub struct ParseLanguageError(pub String);

/// Source languages the engine understands.
///
/// Each variant has a tree-sitter grammar; anything else is rejected
/// at the boundary before reaching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    C,
    Cpp,
    Go,
    Rust,
}

impl Language {
    /// All supported languages.
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::Go,
            Language::Rust,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    /// Resolve a language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "py" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "go" | "golang" => Ok(Language::Go),
            "rust" | "rs" => Ok(Language::Rust),
            other => Err(ParseLanguageError(other.to_string())),
        }
    }
}

/// Which arbitration branch produced the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodTag {
    /// Ensemble unavailable or faulted; rule-based estimate verbatim.
    RuleBased,
    /// Ensemble adopted at high confidence.
    MlHighConfidence,
    /// Ensemble adopted at moderate confidence.
    MlModerateConfidence,
    /// Ensemble uncertain, rule-based confident.
    RuleBasedFallback,
    /// Neither estimator confident; admitted ignorance.
    Uncertain,
    /// A composite-flag guardrail overrode the chosen estimate.
    GuardrailEnforced,
}

impl fmt::Display for MethodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MethodTag::RuleBased => "rule_based",
            MethodTag::MlHighConfidence => "ml_high_confidence",
            MethodTag::MlModerateConfidence => "ml_moderate_confidence",
            MethodTag::RuleBasedFallback => "rule_based_fallback",
            MethodTag::Uncertain => "uncertain",
            MethodTag::GuardrailEnforced => "guardrail_enforced",
        };
        f.write_str(s)
    }
}

/// One estimator's independent answer.
///
/// Immutable once built; arbitration only combines estimates, it never
/// rewrites them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub time: ComplexityClass,
    pub space: ComplexityClass,
    pub confidence: f64,
    /// Human-readable evidence trail, in firing order.
    pub evidence: Vec<String>,
}

impl Estimate {
    /// Build an estimate, enforcing the confidence invariants.
    ///
    /// Confidence is clamped to `[0, 1]`; an `Unknown` time class is
    /// capped at the uncertainty ceiling.
    pub fn new(
        time: ComplexityClass,
        space: ComplexityClass,
        confidence: f64,
        evidence: Vec<String>,
    ) -> Self {
        let mut confidence = confidence.clamp(0.0, 1.0);
        if time == ComplexityClass::Unknown {
            confidence = confidence.min(UNKNOWN_CONFIDENCE_CEILING);
        }
        Self {
            time,
            space,
            confidence,
            evidence,
        }
    }

    /// "No evidence" estimate at zero confidence.
    pub fn unknown(evidence: Vec<String>) -> Self {
        Self::new(
            ComplexityClass::Unknown,
            ComplexityClass::Unknown,
            0.0,
            evidence,
        )
    }
}

/// The externally visible analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "time_complexity")]
    pub time: ComplexityClass,
    #[serde(rename = "space_complexity")]
    pub space: ComplexityClass,
    pub confidence: f64,
    pub method: MethodTag,
    pub breakdown: Vec<String>,
    pub suggestions: Vec<String>,
}
