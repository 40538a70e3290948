//! Learned ensemble estimator
//!
//! A bank of small softmax models per axis (time, space) over the
//! numeric feature vector. Member predictions are averaged, temperature
//! calibrated, then blended 50/50 with a meta combiner that re-weights
//! the calibrated distribution using the composite flags. Confidence is
//! the mean of the two axes' top probabilities.
//!
//! The whole state serializes to a single JSON file so a trained model
//! ships as data, not code. Loaded state is shape-validated before
//! use; a malformed file counts as untrained, never as a panic source.

use super::calibration::{apply_temperature, fit_temperature};
use super::Estimator;
use crate::extract::{FeatureSet, FLAG_OFFSET, NUM_FEATURES};
use crate::models::{ComplexityClass, Estimate};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Output classes, one per concrete complexity class. `Unknown` is not
/// a model output; it is what the caller reports when no model exists.
pub const NUM_CLASSES: usize = 8;

/// Meta combiner input width: calibrated class probabilities plus the
/// composite-flag slots of the feature vector.
pub const META_INPUTS: usize = NUM_CLASSES + (NUM_FEATURES - FLAG_OFFSET);

const DEFAULT_BANK_SIZE: usize = 5;
const DEFAULT_EPOCHS: usize = 200;
const DEFAULT_LEARNING_RATE: f64 = 0.05;

/// Multinomial logistic regression over a fixed-width input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxModel {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl SoftmaxModel {
    /// Small deterministic random init so bank members diverge.
    pub fn new(inputs: usize, seed: u64) -> Self {
        let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1);
        let mut next = || {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state as f64 / u64::MAX as f64 - 0.5) * 0.1
        };
        let weights = (0..NUM_CLASSES)
            .map(|_| (0..inputs).map(|_| next()).collect())
            .collect();
        let bias = vec![0.0; NUM_CLASSES];
        SoftmaxModel { weights, bias }
    }

    /// Expected shape for a model over `inputs` features.
    pub fn well_formed(&self, inputs: usize) -> bool {
        self.weights.len() == NUM_CLASSES
            && self.bias.len() == NUM_CLASSES
            && self.weights.iter().all(|row| row.len() == inputs)
    }

    /// Class distribution for one input.
    ///
    /// Indexing is bounds-checked by construction: rows beyond the
    /// class count are ignored and missing rows contribute a zero
    /// logit, so even a malformed model cannot panic here.
    pub fn predict(&self, x: &[f64]) -> [f64; NUM_CLASSES] {
        let mut logits = [0.0; NUM_CLASSES];
        for (c, logit) in logits.iter_mut().enumerate() {
            let Some(row) = self.weights.get(c) else {
                continue;
            };
            let dot: f64 = row.iter().zip(x.iter()).map(|(w, v)| w * v).sum();
            *logit = self.bias.get(c).copied().unwrap_or(0.0) + dot;
        }
        softmax(&logits)
    }

    /// One SGD step of cross-entropy; returns the example's loss.
    pub fn train_step(&mut self, x: &[f64], label: usize, lr: f64) -> f64 {
        let probs = self.predict(x);
        for (c, row) in self.weights.iter_mut().enumerate().take(NUM_CLASSES) {
            let err = probs[c] - if c == label { 1.0 } else { 0.0 };
            for (w, v) in row.iter_mut().zip(x.iter()) {
                *w -= lr * err * v;
            }
            if let Some(b) = self.bias.get_mut(c) {
                *b -= lr * err;
            }
        }
        -probs.get(label).copied().unwrap_or(0.0).max(1e-12).ln()
    }
}

fn softmax(logits: &[f64; NUM_CLASSES]) -> [f64; NUM_CLASSES] {
    let max = logits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let mut out = [0.0; NUM_CLASSES];
    let mut sum = 0.0;
    for (o, l) in out.iter_mut().zip(logits.iter()) {
        *o = (l - max).exp();
        sum += *o;
    }
    for o in &mut out {
        *o /= sum;
    }
    out
}

/// Second-stage model blended 50/50 with the calibrated bank output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaCombiner {
    pub time: SoftmaxModel,
    pub space: SoftmaxModel,
}

/// One labeled snippet for training.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub vector: [f64; NUM_FEATURES],
    pub time_label: ComplexityClass,
    pub space_label: ComplexityClass,
}

/// Everything needed to reproduce the ensemble's predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleState {
    pub time_models: Vec<SoftmaxModel>,
    pub space_models: Vec<SoftmaxModel>,
    pub time_temperature: f64,
    pub space_temperature: f64,
    #[serde(default)]
    pub meta: Option<MetaCombiner>,
}

impl EnsembleState {
    /// Structural sanity of the whole state: non-empty banks, rows of
    /// the right width, positive finite temperatures, well-formed meta.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.time_models.is_empty() && !self.space_models.is_empty(),
            "model bank is empty"
        );
        anyhow::ensure!(
            self.time_models
                .iter()
                .chain(self.space_models.iter())
                .all(|m| m.well_formed(NUM_FEATURES)),
            "model bank has wrong-shaped weights (expected {NUM_CLASSES} x {NUM_FEATURES})"
        );
        anyhow::ensure!(
            self.time_temperature.is_finite()
                && self.time_temperature > 0.0
                && self.space_temperature.is_finite()
                && self.space_temperature > 0.0,
            "calibration temperatures must be positive"
        );
        if let Some(meta) = &self.meta {
            anyhow::ensure!(
                meta.time.well_formed(META_INPUTS) && meta.space.well_formed(META_INPUTS),
                "meta combiner has wrong-shaped weights (expected {NUM_CLASSES} x {META_INPUTS})"
            );
        }
        Ok(())
    }

    /// True when the state is usable for prediction. A hand-built or
    /// corrupted state with a bad shape reports untrained rather than
    /// risking a panic downstream.
    pub fn is_trained(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model file {}", path.display()))?;
        let state: EnsembleState = serde_json::from_str(&raw)
            .with_context(|| format!("invalid model file {}", path.display()))?;
        state
            .validate()
            .with_context(|| format!("malformed model state in {}", path.display()))?;
        info!(
            path = %path.display(),
            bank = state.time_models.len(),
            meta = state.meta.is_some(),
            "loaded ensemble model"
        );
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("failed to serialize model")?;
        std::fs::write(path, raw)
            .with_context(|| format!("failed to write model file {}", path.display()))?;
        Ok(())
    }

    /// Train a fresh bank per axis, fit calibration temperatures on the
    /// last fifth of the examples, then train the meta combiner on the
    /// calibrated outputs.
    pub fn train(examples: &[TrainingExample]) -> Result<Self> {
        anyhow::ensure!(!examples.is_empty(), "cannot train on an empty dataset");

        let labels = |pick: fn(&TrainingExample) -> ComplexityClass| -> Result<Vec<usize>> {
            examples
                .iter()
                .map(|ex| {
                    pick(ex)
                        .class_index()
                        .context("training labels must be concrete classes")
                })
                .collect()
        };
        let time_labels = labels(|ex| ex.time_label)?;
        let space_labels = labels(|ex| ex.space_label)?;

        let train_bank = |labels: &[usize], seed_base: u64| -> Vec<SoftmaxModel> {
            (0..DEFAULT_BANK_SIZE)
                .map(|i| {
                    let mut model = SoftmaxModel::new(NUM_FEATURES, seed_base + i as u64);
                    for _ in 0..DEFAULT_EPOCHS {
                        for (ex, &label) in examples.iter().zip(labels.iter()) {
                            model.train_step(&ex.vector, label, DEFAULT_LEARNING_RATE);
                        }
                    }
                    model
                })
                .collect()
        };
        let time_models = train_bank(&time_labels, 1);
        let space_models = train_bank(&space_labels, 101);

        // Calibrate on the tail of the dataset.
        let holdout_start = examples.len().saturating_sub((examples.len() / 5).max(1));
        let bank_probs = |bank: &[SoftmaxModel]| -> Vec<[f64; NUM_CLASSES]> {
            examples[holdout_start..]
                .iter()
                .map(|ex| average_bank(bank, &ex.vector))
                .collect()
        };
        let time_temperature =
            fit_temperature(&bank_probs(&time_models), &time_labels[holdout_start..]);
        let space_temperature =
            fit_temperature(&bank_probs(&space_models), &space_labels[holdout_start..]);

        // Meta combiner: re-weight the calibrated distribution using
        // the composite-flag slots as extra evidence.
        let train_meta = |bank: &[SoftmaxModel], temperature: f64, labels: &[usize], seed: u64| {
            let mut model = SoftmaxModel::new(META_INPUTS, seed);
            for _ in 0..DEFAULT_EPOCHS {
                for (ex, &label) in examples.iter().zip(labels.iter()) {
                    let calibrated =
                        apply_temperature(&average_bank(bank, &ex.vector), temperature);
                    let input = meta_input(&calibrated, &ex.vector[FLAG_OFFSET..]);
                    model.train_step(&input, label, DEFAULT_LEARNING_RATE);
                }
            }
            model
        };
        let meta = Some(MetaCombiner {
            time: train_meta(&time_models, time_temperature, &time_labels, 1001),
            space: train_meta(&space_models, space_temperature, &space_labels, 1101),
        });

        info!(
            examples = examples.len(),
            time_temperature, space_temperature, "trained ensemble"
        );
        Ok(EnsembleState {
            time_models,
            space_models,
            time_temperature,
            space_temperature,
            meta,
        })
    }

    fn predict_axis(
        &self,
        bank: &[SoftmaxModel],
        meta: Option<&SoftmaxModel>,
        temperature: f64,
        x: &[f64; NUM_FEATURES],
    ) -> [f64; NUM_CLASSES] {
        let calibrated = apply_temperature(&average_bank(bank, x), temperature);
        let Some(meta) = meta else {
            return calibrated;
        };
        let meta_probs = meta.predict(&meta_input(&calibrated, &x[FLAG_OFFSET..]));
        let mut blended = [0.0; NUM_CLASSES];
        for ((b, c), m) in blended
            .iter_mut()
            .zip(calibrated.iter())
            .zip(meta_probs.iter())
        {
            *b = 0.5 * (c + m);
        }
        blended
    }

    /// Calibrated class distributions for both axes.
    pub fn predict(&self, x: &[f64; NUM_FEATURES]) -> ([f64; NUM_CLASSES], [f64; NUM_CLASSES]) {
        let time = self.predict_axis(
            &self.time_models,
            self.meta.as_ref().map(|m| &m.time),
            self.time_temperature,
            x,
        );
        let space = self.predict_axis(
            &self.space_models,
            self.meta.as_ref().map(|m| &m.space),
            self.space_temperature,
            x,
        );
        (time, space)
    }
}

fn meta_input(probs: &[f64; NUM_CLASSES], flags: &[f64]) -> Vec<f64> {
    let mut input = Vec::with_capacity(META_INPUTS);
    input.extend_from_slice(probs);
    input.extend_from_slice(flags);
    input
}

fn average_bank(bank: &[SoftmaxModel], x: &[f64]) -> [f64; NUM_CLASSES] {
    let mut avg = [0.0; NUM_CLASSES];
    for model in bank {
        let p = model.predict(x);
        for (a, v) in avg.iter_mut().zip(p.iter()) {
            *a += v;
        }
    }
    let n = bank.len().max(1) as f64;
    for a in &mut avg {
        *a /= n;
    }
    avg
}

fn argmax(probs: &[f64; NUM_CLASSES]) -> (usize, f64) {
    let mut best = 0;
    for (i, p) in probs.iter().enumerate() {
        if *p > probs[best] {
            best = i;
        }
    }
    (best, probs[best])
}

impl Estimator for EnsembleState {
    fn name(&self) -> &'static str {
        "ensemble"
    }

    fn estimate(&self, features: &FeatureSet) -> Estimate {
        if !self.is_trained() {
            return Estimate::unknown(vec!["No trained ensemble available".to_string()]);
        }
        let x = features.to_vector();
        let (time_probs, space_probs) = self.predict(&x);
        let (time_idx, time_p) = argmax(&time_probs);
        let (space_idx, space_p) = argmax(&space_probs);

        let time = ComplexityClass::from_class_index(time_idx).unwrap_or(ComplexityClass::Unknown);
        let space =
            ComplexityClass::from_class_index(space_idx).unwrap_or(ComplexityClass::Unknown);
        let confidence = ((time_p + space_p) / 2.0).min(features.confidence_ceiling());

        // Per-class agreement: how many bank members' own argmax
        // landed on the final class.
        let agree = |bank: &[SoftmaxModel], class: usize| {
            bank.iter()
                .filter(|m| argmax(&m.predict(&x)).0 == class)
                .count()
        };
        let evidence = vec![format!(
            "Ensemble: {}/{} models agreed on {} time, {}/{} on {} space \
             (calibrated {:.0}% / {:.0}%)",
            agree(&self.time_models, time_idx),
            self.time_models.len(),
            time,
            agree(&self.space_models, space_idx),
            self.space_models.len(),
            space,
            time_p * 100.0,
            space_p * 100.0
        )];
        Estimate::new(time, space, confidence, evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;
    use crate::models::Language;
    use tempfile::tempdir;

    fn vector_for(code: &str) -> [f64; NUM_FEATURES] {
        Extractor::new().extract(code, Language::Python).to_vector()
    }

    fn toy_dataset() -> Vec<TrainingExample> {
        let linear = "for i in range(n):\n    total += i\n";
        let quadratic = "for i in range(n):\n    for j in range(n):\n        total += 1\n";
        let constant = "x = a + b\n";
        let mut out = Vec::new();
        for _ in 0..4 {
            out.push(TrainingExample {
                vector: vector_for(linear),
                time_label: ComplexityClass::Linear,
                space_label: ComplexityClass::Constant,
            });
            out.push(TrainingExample {
                vector: vector_for(quadratic),
                time_label: ComplexityClass::Quadratic,
                space_label: ComplexityClass::Constant,
            });
            out.push(TrainingExample {
                vector: vector_for(constant),
                time_label: ComplexityClass::Constant,
                space_label: ComplexityClass::Constant,
            });
        }
        out
    }

    fn empty_state() -> EnsembleState {
        EnsembleState {
            time_models: vec![],
            space_models: vec![],
            time_temperature: 1.0,
            space_temperature: 1.0,
            meta: None,
        }
    }

    #[test]
    fn test_train_and_predict_separable_classes() {
        let state = EnsembleState::train(&toy_dataset()).unwrap();
        assert!(state.is_trained());

        let est = {
            let features = Extractor::new().extract(
                "for i in range(n):\n    for j in range(n):\n        x += 1\n",
                Language::Python,
            );
            state.estimate(&features)
        };
        assert_eq!(est.time, ComplexityClass::Quadratic);
        assert!(est.confidence > 0.0);
    }

    #[test]
    fn test_training_builds_a_meta_combiner() {
        let state = EnsembleState::train(&toy_dataset()).unwrap();
        let meta = state.meta.as_ref().expect("meta combiner trained");
        assert!(meta.time.well_formed(META_INPUTS));
        assert!(meta.space.well_formed(META_INPUTS));

        // The blend still yields a proper distribution.
        let x = vector_for("for i in range(n):\n    total += i\n");
        let (time_probs, space_probs) = state.predict(&x);
        for probs in [time_probs, space_probs] {
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_meta_blend_averages_with_calibrated_output() {
        let state = EnsembleState::train(&toy_dataset()).unwrap();
        let x = vector_for("for i in range(n):\n    total += i\n");

        let mut without_meta = state.clone();
        without_meta.meta = None;
        let (calibrated, _) = without_meta.predict(&x);
        let (blended, _) = state.predict(&x);

        let meta = state.meta.as_ref().unwrap();
        let meta_probs = meta.time.predict(&meta_input(&calibrated, &x[FLAG_OFFSET..]));
        for ((b, c), m) in blended.iter().zip(calibrated.iter()).zip(meta_probs.iter()) {
            assert!((b - 0.5 * (c + m)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_untrained_state_reports_unknown() {
        let state = empty_state();
        let features = Extractor::new().extract("x = 1\n", Language::Python);
        let est = state.estimate(&features);
        assert_eq!(est.time, ComplexityClass::Unknown);
        assert!((est.confidence - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrong_shaped_bank_counts_as_untrained() {
        // Valid JSON, wrong shape: one member with empty weight rows.
        let raw = r#"{
            "time_models": [{"weights": [], "bias": []}],
            "space_models": [{"weights": [], "bias": []}],
            "time_temperature": 1.0,
            "space_temperature": 1.0
        }"#;
        let state: EnsembleState = serde_json::from_str(raw).unwrap();
        assert!(!state.is_trained());
        assert!(state.validate().is_err());

        // Even if forced through, prediction must not panic.
        let features = Extractor::new().extract("x = 1\n", Language::Python);
        let est = state.estimate(&features);
        assert_eq!(est.time, ComplexityClass::Unknown);
    }

    #[test]
    fn test_load_rejects_wrong_shaped_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"time_models":[{"weights":[],"bias":[]}],"space_models":[{"weights":[],"bias":[]}],"time_temperature":1.0,"space_temperature":1.0}"#,
        )
        .unwrap();
        let err = EnsembleState::load(&path).unwrap_err();
        assert!(err.to_string().contains("malformed model state"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let state = EnsembleState::train(&toy_dataset()).unwrap();
        state.save(&path).unwrap();

        let loaded = EnsembleState::load(&path).unwrap();
        assert_eq!(loaded.time_models.len(), state.time_models.len());
        assert_eq!(loaded.meta.is_some(), state.meta.is_some());
        let x = vector_for("for i in range(n):\n    total += i\n");
        let (a, _) = state.predict(&x);
        let (b, _) = loaded.predict(&x);
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).abs() < 1e-9);
        }
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(EnsembleState::load(Path::new("/nonexistent/model.json")).is_err());
    }

    #[test]
    fn test_ceiling_applies_to_fallback_features() {
        let state = EnsembleState::train(&toy_dataset()).unwrap();
        let features =
            Extractor::new().extract("def broken(:\n    for i in range(n)\n", Language::Python);
        let est = state.estimate(&features);
        assert!(est.confidence <= 0.4);
    }
}
