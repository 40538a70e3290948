//! Arbitration between estimators
//!
//! Pure policy: given both estimators' answers and the thresholds,
//! pick one, tag how it was chosen, and apply the guardrail. No I/O,
//! no feature extraction; everything this module needs arrives as
//! arguments, which keeps the policy testable in isolation.

use crate::config::Thresholds;
use crate::extract::composite::{CompositeFlag, CompositeFlags};
use crate::models::{ComplexityClass, Estimate, MethodTag};
use tracing::debug;

/// The arbiter's chosen answer.
#[derive(Debug, Clone)]
pub struct Decision {
    pub estimate: Estimate,
    pub method: MethodTag,
    /// Set when the guardrail overrode the chosen labels.
    pub guardrail: Option<CompositeFlag>,
}

/// Choose between the rule-based and ensemble estimates.
///
/// Branches, in order:
/// 1. no ensemble: the rule-based answer stands as-is;
/// 2. confident ensemble: take it;
/// 3. weak ensemble but confident rules: fall back to rules;
/// 4. both weak: admit uncertainty rather than guess;
/// 5. otherwise: take the ensemble at moderate confidence.
///
/// The guardrail runs after selection: a low-confidence answer that
/// contradicts a recognized composite pattern is overridden by the
/// pattern's known labels. Strict mode checks the guardrail on every
/// answer and raises its floor.
pub fn arbitrate(
    rule: Estimate,
    ensemble: Option<Estimate>,
    flags: &CompositeFlags,
    thresholds: &Thresholds,
    strict: bool,
) -> Decision {
    let (estimate, method) = match ensemble {
        None => (rule, MethodTag::RuleBased),
        Some(ens) if ens.confidence >= thresholds.ml_high => (ens, MethodTag::MlHighConfidence),
        Some(ens)
            if ens.confidence < thresholds.ml_low
                && rule.confidence >= thresholds.rule_confident =>
        {
            (rule, MethodTag::RuleBasedFallback)
        }
        Some(ens)
            if ens.confidence < thresholds.ml_low && rule.confidence < thresholds.rule_confident =>
        {
            let mut evidence = rule.evidence;
            evidence.extend(ens.evidence);
            evidence.push("Neither estimator reached a usable confidence".to_string());
            let unknown = Estimate::new(
                ComplexityClass::Unknown,
                ComplexityClass::Unknown,
                thresholds.uncertain_confidence,
                evidence,
            );
            (unknown, MethodTag::Uncertain)
        }
        Some(ens) => (ens, MethodTag::MlModerateConfidence),
    };

    debug!(%method, confidence = estimate.confidence, "arbitration selected");
    apply_guardrail(estimate, method, flags, thresholds, strict)
}

fn apply_guardrail(
    estimate: Estimate,
    method: MethodTag,
    flags: &CompositeFlags,
    thresholds: &Thresholds,
    strict: bool,
) -> Decision {
    let should_check = strict || estimate.confidence < thresholds.guardrail_trigger;
    let flag = flags.strongest();
    if let (true, Some(flag)) = (should_check, flag) {
        let (time, space) = flag.known_labels();
        if estimate.time != time || estimate.space != space {
            let floor = if strict {
                thresholds.strict_guardrail_floor
            } else {
                thresholds.guardrail_floor
            };
            let mut evidence = estimate.evidence.clone();
            evidence.push(format!(
                "Guardrail: {} overrides the low-confidence answer",
                flag.describe()
            ));
            let overridden =
                Estimate::new(time, space, estimate.confidence.max(floor), evidence);
            debug!(flag = flag.as_str(), "guardrail enforced");
            return Decision {
                estimate: overridden,
                method: MethodTag::GuardrailEnforced,
                guardrail: Some(flag),
            };
        }
    }
    Decision {
        estimate,
        method,
        guardrail: None,
    }
}
