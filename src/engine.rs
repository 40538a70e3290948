//! Analysis engine
//!
//! Wires extraction, both estimators, arbitration, and the explanation
//! builder into one entry point. Construction fails only on bad
//! configuration; a missing or malformed model file degrades the
//! engine to rules-only with a warning. Analysis itself never fails: a
//! snippet the engine cannot make sense of yields an `Unknown`
//! verdict, not an error.

use crate::arbiter;
use crate::config::EngineConfig;
use crate::estimators::ensemble::EnsembleState;
use crate::estimators::rule_based::RuleBasedEstimator;
use crate::estimators::Estimator;
use crate::explain;
use crate::extract::Extractor;
use crate::models::{Language, Verdict};
use anyhow::Result;
use tracing::{debug, warn};

pub struct Engine {
    extractor: Extractor,
    ensemble: Option<EnsembleState>,
    config: EngineConfig,
}

impl Engine {
    /// Build an engine from configuration, loading the ensemble model
    /// if one is configured.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.arbitration.validate()?;
        let ensemble = match &config.model_path {
            Some(path) => match EnsembleState::load(path) {
                Ok(state) => Some(state),
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %format!("{err:#}"),
                        "could not load ensemble model, continuing with rules only"
                    );
                    None
                }
            },
            None => None,
        };
        Ok(Engine {
            extractor: Extractor::new(),
            ensemble,
            config,
        })
    }

    /// Engine with default thresholds and no learned model.
    pub fn rules_only() -> Self {
        Engine {
            extractor: Extractor::new(),
            ensemble: None,
            config: EngineConfig::default(),
        }
    }

    /// Attach an already-constructed ensemble (used by tests and
    /// callers that train in-process).
    pub fn with_ensemble(mut self, state: EnsembleState) -> Self {
        self.ensemble = Some(state);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one snippet. Infallible: degraded inputs degrade the
    /// verdict's confidence instead of failing.
    pub fn analyze(&self, code: &str, language: Language) -> Verdict {
        let features = self.extractor.extract(code, language);
        let rule = RuleBasedEstimator.estimate(&features);
        let ensemble = self
            .ensemble
            .as_ref()
            .filter(|state| state.is_trained())
            .map(|state| state.estimate(&features));

        debug!(
            %language,
            rule_time = %rule.time,
            rule_confidence = rule.confidence,
            ensemble_available = ensemble.is_some(),
            "estimates ready"
        );

        let decision = arbiter::arbitrate(
            rule,
            ensemble,
            &features.flags,
            &self.config.arbitration,
            self.config.strict,
        );

        let breakdown = explain::breakdown(&features, &decision);
        let suggestions = explain::suggestions(&features, &decision);
        Verdict {
            time: decision.estimate.time,
            space: decision.estimate.space,
            confidence: decision.estimate.confidence,
            method: decision.method,
            breakdown,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplexityClass, MethodTag};

    #[test]
    fn test_rules_only_engine_tags_rule_based() {
        let engine = Engine::rules_only();
        let v = engine.analyze("for i in range(n):\n    total += i\n", Language::Python);
        assert_eq!(v.time, ComplexityClass::Linear);
        assert_eq!(v.method, MethodTag::RuleBased);
        assert!(!v.breakdown.is_empty());
    }

    #[test]
    fn test_missing_model_file_degrades_to_rules_only() {
        let config = EngineConfig {
            model_path: Some("/nonexistent/model.json".into()),
            ..EngineConfig::default()
        };
        let engine = Engine::new(config).unwrap();
        let v = engine.analyze("for i in range(n):\n    total += i\n", Language::Python);
        assert_eq!(v.time, ComplexityClass::Linear);
        assert_eq!(v.method, MethodTag::RuleBased);
    }

    #[test]
    fn test_malformed_model_file_degrades_to_rules_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"time_models":[{"weights":[],"bias":[]}],"space_models":[{"weights":[],"bias":[]}],"time_temperature":1.0,"space_temperature":1.0}"#,
        )
        .unwrap();

        let config = EngineConfig {
            model_path: Some(path),
            ..EngineConfig::default()
        };
        let engine = Engine::new(config).unwrap();
        let v = engine.analyze("for i in range(n):\n    total += i\n", Language::Python);
        assert_eq!(v.method, MethodTag::RuleBased);
    }

    #[test]
    fn test_untrained_ensemble_behaves_like_rules_only() {
        let state = EnsembleState {
            time_models: vec![],
            space_models: vec![],
            time_temperature: 1.0,
            space_temperature: 1.0,
            meta: None,
        };
        let engine = Engine::rules_only().with_ensemble(state);
        let v = engine.analyze("for i in range(n):\n    total += i\n", Language::Python);
        assert_eq!(v.method, MethodTag::RuleBased);
    }

    #[test]
    fn test_verdict_serializes_with_wire_names() {
        let engine = Engine::rules_only();
        let v = engine.analyze("x = 1\n", Language::Python);
        let json = serde_json::to_value(&v).unwrap();
        assert!(json.get("time_complexity").is_some());
        assert!(json.get("space_complexity").is_some());
        assert!(json.get("method").is_some());
    }
}
