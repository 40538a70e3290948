//! Complexity estimators
//!
//! Two independent estimators look at the same [`FeatureSet`]: a
//! rule-based one that reasons over signatures and structure, and a
//! learned ensemble over the numeric feature vector. Arbitration
//! decides between their answers; neither estimator sees the other's.

pub mod calibration;
pub mod ensemble;
pub mod rule_based;

use crate::extract::FeatureSet;
use crate::models::Estimate;

/// A source of complexity estimates.
///
/// Implementations must be infallible: when an estimator has nothing
/// to say it returns an `Unknown` estimate rather than an error.
pub trait Estimator {
    fn name(&self) -> &'static str;
    fn estimate(&self, features: &FeatureSet) -> Estimate;
}
