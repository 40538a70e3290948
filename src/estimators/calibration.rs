//! Temperature calibration
//!
//! Raw softmax outputs from a small model trained on few examples are
//! overconfident. A single scalar temperature, fit on held-out
//! examples by grid search over negative log-likelihood, flattens the
//! distribution without changing the argmax.

use super::ensemble::NUM_CLASSES;

/// Sharpen or flatten a distribution: `p^(1/T)`, renormalized.
///
/// `T > 1` flattens (less confident), `T < 1` sharpens. `T = 1` is the
/// identity. Argmax is preserved for any positive temperature.
pub fn apply_temperature(probs: &[f64; NUM_CLASSES], temperature: f64) -> [f64; NUM_CLASSES] {
    if (temperature - 1.0).abs() < 1e-9 {
        return *probs;
    }
    let inv = 1.0 / temperature.max(1e-6);
    let mut scaled = [0.0; NUM_CLASSES];
    let mut sum = 0.0;
    for (out, p) in scaled.iter_mut().zip(probs.iter()) {
        *out = p.max(1e-12).powf(inv);
        sum += *out;
    }
    for out in &mut scaled {
        *out /= sum;
    }
    scaled
}

/// Fit a temperature by grid search, minimizing NLL on held-out pairs.
///
/// Returns 1.0 when the holdout is empty.
pub fn fit_temperature(probs: &[[f64; NUM_CLASSES]], labels: &[usize]) -> f64 {
    if probs.is_empty() || probs.len() != labels.len() {
        return 1.0;
    }
    let mut best_t = 1.0;
    let mut best_nll = f64::INFINITY;
    let mut t = 0.25;
    while t <= 4.0 + 1e-9 {
        let nll: f64 = probs
            .iter()
            .zip(labels.iter())
            .map(|(p, &label)| {
                let calibrated = apply_temperature(p, t);
                -calibrated[label].max(1e-12).ln()
            })
            .sum();
        if nll < best_nll {
            best_nll = nll;
            best_t = t;
        }
        t += 0.25;
    }
    best_t
}
