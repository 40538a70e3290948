//! bigo - Hybrid complexity estimation
//!
//! Estimates the time and space complexity of code snippets across
//! eight languages. A rule-based estimator (signature tables, grammar
//! -aware structure, composite pattern flags) and a learned ensemble
//! each produce an answer; an arbitration policy picks one and
//! guardrails it against recognized algorithm patterns.

pub mod arbiter;
pub mod config;
pub mod engine;
pub mod estimators;
pub mod explain;
pub mod extract;
pub mod models;
pub mod signatures;

pub use config::{EngineConfig, Thresholds};
pub use engine::Engine;
pub use models::{ComplexityClass, Estimate, Language, MethodTag, Verdict};
