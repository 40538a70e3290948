//! Rule-based estimator
//!
//! Deterministic reasoning over signature matches, structural facts,
//! and composite flags. Evidence ranks by reliability: a composite
//! flag (a conjunction of cues) outranks raw recursion or loop counts,
//! so a divide-and-conquer sort is never mistaken for blind
//! exponential recursion.

use super::Estimator;
use crate::extract::FeatureSet;
use crate::models::{ComplexityClass, Estimate};

pub struct RuleBasedEstimator;

impl Estimator for RuleBasedEstimator {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn estimate(&self, features: &FeatureSet) -> Estimate {
        let ceiling = features.confidence_ceiling();
        let mut evidence = Vec::new();

        // Composite flags first; conjunctive cues are the strongest
        // structural evidence available.
        if let Some(flag) = features.flags.strongest() {
            let (time, space) = flag.known_labels();
            evidence.push(format!("Matched {}", flag.describe()));
            return Estimate::new(time, space, (0.9_f64).min(ceiling), evidence);
        }

        // Bare recursion without a recognized pattern. Memoization
        // signatures tame it back to linear.
        if features.facts.recursion_present {
            let memoized = features
                .matches
                .iter()
                .any(|m| m.description.contains("Memoized"));
            if memoized {
                evidence.push("Recursion with memoization caches subproblems".to_string());
                return Estimate::new(
                    ComplexityClass::Linear,
                    ComplexityClass::Linear,
                    (0.7_f64).min(ceiling),
                    evidence,
                );
            }
            evidence.push("Unbounded recursion with no caching detected".to_string());
            return Estimate::new(
                ComplexityClass::Exponential,
                ComplexityClass::Linear,
                (0.7_f64).min(ceiling),
                evidence,
            );
        }

        // Structural inference from loop shape.
        let facts = &features.facts;
        let (struct_time, struct_conf, struct_note): (ComplexityClass, f64, &str) = if facts
            .nested_loop_count
            >= 2
        {
            (ComplexityClass::Cubic, 0.65, "Triply nested loops")
        } else if facts.nested_loop_count >= 1 {
            (ComplexityClass::Quadratic, 0.75, "Nested loops over the input")
        } else if facts.loop_count >= 1 {
            (ComplexityClass::Linear, 0.7, "Single pass over the input")
        } else if features.line_count > 0 {
            (ComplexityClass::Constant, 0.6, "No loops or recursion")
        } else {
            (ComplexityClass::Unknown, 0.0, "Empty input")
        };

        // Dominant signature match: the worst time class on record,
        // ties broken by confidence, then first registered.
        let mut dominant: Option<&crate::extract::SignatureMatch> = None;
        for m in &features.matches {
            let better = match dominant {
                None => true,
                Some(d) => {
                    m.time_class > d.time_class
                        || (m.time_class == d.time_class && m.base_confidence > d.base_confidence)
                }
            };
            if better {
                dominant = Some(m);
            }
        }

        // Space accumulates: any match that allocates dominates.
        let sig_space = features
            .matches
            .iter()
            .map(|m| m.space_class)
            .max()
            .unwrap_or(ComplexityClass::Unknown);

        let (time, confidence) = match dominant {
            Some(m) if m.time_class > struct_time => {
                evidence.push(format!("Signature: {}", m.description));
                (m.time_class, m.base_confidence)
            }
            Some(m) if m.time_class == struct_time => {
                evidence.push(struct_note.to_string());
                evidence.push(format!("Signature: {}", m.description));
                (struct_time, struct_conf.max(m.base_confidence))
            }
            _ => {
                evidence.push(struct_note.to_string());
                (struct_time, struct_conf)
            }
        };

        let space = match (time, sig_space) {
            (ComplexityClass::Unknown, _) => ComplexityClass::Unknown,
            (_, ComplexityClass::Unknown) => ComplexityClass::Constant,
            (_, s) => s,
        };

        Estimate::new(time, space, confidence.min(ceiling), evidence)
    }
}
