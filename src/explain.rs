//! Explanation builder
//!
//! Turns a [`Decision`] plus the features behind it into the breakdown
//! and suggestion lists of the final verdict. All user-facing prose
//! lives here so the estimators stay free of presentation concerns.

use crate::arbiter::Decision;
use crate::extract::{FactsSource, FeatureSet};
use crate::models::{ComplexityClass, Language, MethodTag};

/// Human-readable trace of how the verdict was reached.
pub fn breakdown(features: &FeatureSet, decision: &Decision) -> Vec<String> {
    let mut lines = Vec::new();

    let facts = &features.facts;
    lines.push(format!(
        "Structure: {} loop(s), {} nested, recursion {}",
        facts.loop_count,
        facts.nested_loop_count,
        if facts.recursion_present { "present" } else { "absent" }
    ));
    if features.facts_source == FactsSource::FallbackScan {
        lines.push("Parsing failed; structural facts come from a lexical scan".to_string());
    }

    for m in &features.matches {
        let times = if m.occurrences == 1 {
            String::new()
        } else {
            format!(" (x{})", m.occurrences)
        };
        lines.push(format!("Matched signature: {}{}", m.description, times));
    }

    lines.extend(features.notes.iter().cloned());
    lines.extend(decision.estimate.evidence.iter().cloned());

    lines.push(match decision.method {
        MethodTag::RuleBased => "Verdict from rule-based analysis".to_string(),
        MethodTag::MlHighConfidence => "Verdict from the learned model (high confidence)".to_string(),
        MethodTag::MlModerateConfidence => {
            "Verdict from the learned model (moderate confidence)".to_string()
        }
        MethodTag::RuleBasedFallback => {
            "Learned model was unsure; verdict from rule-based analysis".to_string()
        }
        MethodTag::Uncertain => "No estimator was confident enough to commit".to_string(),
        MethodTag::GuardrailEnforced => {
            "Verdict pinned to a recognized pattern's known complexity".to_string()
        }
    });

    lines.dedup();
    lines
}

/// Improvement hints keyed on the final time class, with
/// language-specific additions where they apply.
pub fn suggestions(features: &FeatureSet, decision: &Decision) -> Vec<String> {
    let mut out = Vec::new();
    let time = decision.estimate.time;

    match time {
        ComplexityClass::Unknown => {
            out.push(
                "Not enough recognizable structure; try analyzing a single \
                 self-contained function"
                    .to_string(),
            );
            return out;
        }
        ComplexityClass::Constant | ComplexityClass::Logarithmic => {
            out.push("Already efficient for growing inputs".to_string());
        }
        ComplexityClass::Linear => {
            out.push(
                "A single pass is usually optimal unless the data is pre-sorted or indexed"
                    .to_string(),
            );
        }
        ComplexityClass::Linearithmic => {
            out.push(
                "Sorting-bound; a hash-based approach may avoid the sort if order is \
                 not needed"
                    .to_string(),
            );
        }
        ComplexityClass::Quadratic => {
            out.push(
                "Consider replacing the inner loop with a hash map or set lookup".to_string(),
            );
            out.push("Sorting first can enable a two-pointer pass".to_string());
        }
        ComplexityClass::Cubic => {
            out.push("Look for a dynamic-programming or divide-and-conquer reformulation".to_string());
            out.push("Precompute prefix aggregates to collapse one loop dimension".to_string());
        }
        ComplexityClass::Exponential => {
            out.push("Memoize overlapping subproblems to bring this down to polynomial".to_string());
            out.push("Convert top-down recursion to an iterative table if possible".to_string());
        }
        ComplexityClass::Factorial => {
            out.push(
                "Full enumeration rarely scales past n = 10; consider pruning, \
                 heuristics, or a different formulation"
                    .to_string(),
            );
        }
    }

    // Language-specific hints tied to what actually matched.
    let mentions = |needle: &str| {
        features
            .matches
            .iter()
            .any(|m| m.description.contains(needle))
    };
    match features.language {
        Language::Python => {
            if mentions("Membership test in a list") {
                out.push("Use a set instead of a list for membership tests".to_string());
            }
            if time >= ComplexityClass::Quadratic && !mentions("comprehension") {
                out.push("Prefer builtins and comprehensions over manual index loops".to_string());
            }
        }
        Language::JavaScript | Language::TypeScript => {
            if mentions("Linear membership scan") {
                out.push("Use a Set or Map instead of repeated array scans".to_string());
            }
            if mentions("Indexed array iteration") {
                out.push("Prefer for...of or array methods over index bookkeeping".to_string());
            }
        }
        Language::Java => {
            if mentions("ArrayList") && time >= ComplexityClass::Quadratic {
                out.push("Check for HashMap/HashSet opportunities to drop inner scans".to_string());
            }
            if mentions("Indexed array iteration") {
                out.push("Prefer the enhanced for loop when the index is not needed".to_string());
            }
        }
        Language::Cpp => {
            if time >= ComplexityClass::Quadratic {
                out.push(
                    "Standard algorithms (std::sort, std::find, range-for) often replace \
                     hand-rolled nested loops"
                        .to_string(),
                );
            }
        }
        _ => {}
    }

    if decision.method == MethodTag::Uncertain {
        out.push("Provide more context or a complete function for a firmer answer".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter;
    use crate::config::Thresholds;
    use crate::estimators::rule_based::RuleBasedEstimator;
    use crate::estimators::Estimator;
    use crate::extract::Extractor;

    fn analyze(code: &str, language: Language) -> (FeatureSet, Decision) {
        let features = Extractor::new().extract(code, language);
        let rule = RuleBasedEstimator.estimate(&features);
        let decision =
            arbiter::arbitrate(rule, None, &features.flags, &Thresholds::default(), false);
        (features, decision)
    }

    #[test]
    fn test_breakdown_mentions_structure_and_method() {
        let (features, decision) = analyze(
            "for i in range(n):\n    for j in range(n):\n        t += 1\n",
            Language::Python,
        );
        let lines = breakdown(&features, &decision);
        assert!(lines.iter().any(|l| l.contains("2 loop(s)")));
        assert!(lines.iter().any(|l| l.contains("rule-based")));
    }

    #[test]
    fn test_quadratic_suggestions() {
        let (features, decision) = analyze(
            "for i in range(n):\n    for j in range(n):\n        t += 1\n",
            Language::Python,
        );
        let tips = suggestions(&features, &decision);
        assert!(tips.iter().any(|t| t.contains("hash map") || t.contains("set lookup")));
    }

    #[test]
    fn test_python_membership_hint() {
        let code = "for x in items:\n    if x in seen_list:\n        dup += 1\n";
        let (features, decision) = analyze(code, Language::Python);
        let tips = suggestions(&features, &decision);
        assert!(tips.iter().any(|t| t.contains("set instead of a list")));
    }

    #[test]
    fn test_unknown_gets_single_generic_hint() {
        let (features, decision) = analyze("", Language::Python);
        let tips = suggestions(&features, &decision);
        assert_eq!(tips.len(), 1);
        assert!(tips[0].contains("self-contained function"));
    }
}
