//! Configuration for the estimation engine
//!
//! The arbitration thresholds are empirically tuned, not derived; their
//! relative ordering is load-bearing but the exact numbers are
//! configurable through `bigo.toml` rather than hard-coded invariants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Confidence thresholds driving arbitration and guardrails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Ensemble confidence at or above which its estimate is adopted outright.
    pub ml_high: f64,
    /// Ensemble confidence below which it is considered uncertain.
    pub ml_low: f64,
    /// Rule-based confidence at or above which it can back up an uncertain ensemble.
    pub rule_confident: f64,
    /// Chosen-verdict confidence below which guardrails are consulted.
    pub guardrail_trigger: f64,
    /// Minimum confidence a fired guardrail asserts.
    pub guardrail_floor: f64,
    /// Guardrail floor under strict mode.
    pub strict_guardrail_floor: f64,
    /// Confidence reported when both estimators are uncertain.
    pub uncertain_confidence: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ml_high: 0.8,
            ml_low: 0.45,
            rule_confident: 0.6,
            guardrail_trigger: 0.5,
            guardrail_floor: 0.55,
            strict_guardrail_floor: 0.6,
            uncertain_confidence: 0.4,
        }
    }
}

impl Thresholds {
    /// Sanity-check the relative ordering the arbitration policy relies on.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.ml_low < self.ml_high,
            "ml_low ({}) must be below ml_high ({})",
            self.ml_low,
            self.ml_high
        );
        anyhow::ensure!(
            self.guardrail_floor >= self.uncertain_confidence,
            "guardrail_floor ({}) must not be below uncertain_confidence ({})",
            self.guardrail_floor,
            self.uncertain_confidence
        );
        anyhow::ensure!(
            self.strict_guardrail_floor >= self.guardrail_floor,
            "strict_guardrail_floor ({}) must not be below guardrail_floor ({})",
            self.strict_guardrail_floor,
            self.guardrail_floor
        );
        let all = [
            self.ml_high,
            self.ml_low,
            self.rule_confident,
            self.guardrail_trigger,
            self.guardrail_floor,
            self.strict_guardrail_floor,
            self.uncertain_confidence,
        ];
        anyhow::ensure!(
            all.iter().all(|v| (0.0..=1.0).contains(v)),
            "all thresholds must be within [0, 1]"
        );
        Ok(())
    }
}

/// Top-level engine configuration (`bigo.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Arbitration threshold overrides.
    pub arbitration: Thresholds,
    /// Strict mode: guardrails are always consulted, not just for
    /// low-confidence verdicts.
    pub strict: bool,
    /// Path to a trained ensemble state file (JSON).
    pub model_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        config.arbitration.validate()?;
        debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Load `bigo.toml` from a directory if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join("bigo.toml");
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
