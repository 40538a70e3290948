//! End-to-end tests for the analysis engine
//!
//! Each test feeds a realistic snippet through the full pipeline
//! (extraction, both estimators, arbitration, explanation) and checks
//! the verdict a user would see.

use bigo::config::EngineConfig;
use bigo::engine::Engine;
use bigo::estimators::ensemble::{EnsembleState, TrainingExample};
use bigo::extract::Extractor;
use bigo::models::{ComplexityClass, Language, MethodTag};

const NESTED_LOOPS_PY: &str = "\
def pairs(items):
    out = []
    for i in range(len(items)):
        for j in range(len(items)):
            out.append((items[i], items[j]))
    return out
";

const BINARY_SEARCH_PY: &str = "\
def search(a, target):
    low, high = 0, len(a) - 1
    while low <= high:
        mid = (low + high) // 2
        if a[mid] == target:
            return mid
        if a[mid] < target:
            low = mid + 1
        else:
            high = mid - 1
    return -1
";

const MERGE_SORT_PY: &str = "\
def merge_sort(a):
    if len(a) <= 1:
        return a
    mid = len(a) // 2
    left = merge_sort(a[:mid])
    right = merge_sort(a[mid:])
    return merge(left, right)
";

const FIB_PY: &str = "\
def fib(n):
    if n <= 1:
        return n
    return fib(n - 1) + fib(n - 2)
";

fn toy_ensemble() -> EnsembleState {
    let extractor = Extractor::new();
    let vec_for = |code: &str| extractor.extract(code, Language::Python).to_vector();
    let mut examples = Vec::new();
    for _ in 0..4 {
        examples.push(TrainingExample {
            vector: vec_for("for i in range(n):\n    total += i\n"),
            time_label: ComplexityClass::Linear,
            space_label: ComplexityClass::Constant,
        });
        examples.push(TrainingExample {
            vector: vec_for(NESTED_LOOPS_PY),
            time_label: ComplexityClass::Quadratic,
            space_label: ComplexityClass::Linear,
        });
        examples.push(TrainingExample {
            vector: vec_for("x = a + b\n"),
            time_label: ComplexityClass::Constant,
            space_label: ComplexityClass::Constant,
        });
    }
    EnsembleState::train(&examples).expect("toy training")
}

const BUBBLE_SORT_PY: &str = "\
def bubble(a):
    n = len(a)
    for i in range(n):
        for j in range(0, n - i - 1):
            if a[j] > a[j + 1]:
                a[j], a[j + 1] = a[j + 1], a[j]
";

#[test]
fn trivial_code_is_constant_time_and_space() {
    let v = Engine::rules_only().analyze("x = a + b\n", Language::Python);
    assert_eq!(v.time, ComplexityClass::Constant);
    assert_eq!(v.space, ComplexityClass::Constant);
}

#[test]
fn analysis_is_idempotent() {
    let engine = Engine::rules_only();
    let a = engine.analyze(MERGE_SORT_PY, Language::Python);
    let b = engine.analyze(MERGE_SORT_PY, Language::Python);
    assert_eq!(a.time, b.time);
    assert_eq!(a.space, b.space);
    assert_eq!(a.method, b.method);
    assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
    assert_eq!(a.breakdown, b.breakdown);
}

#[test]
fn worst_construct_dominates_mixed_code() {
    // A sort next to a nested scan: the quadratic part wins.
    let code = "\
def dedupe_pairs(items):
    items.sort()
    out = []
    for i in range(len(items)):
        for j in range(len(items)):
            if items[i] == items[j]:
                out.append(i)
    return out
";
    let v = Engine::rules_only().analyze(code, Language::Python);
    assert_eq!(v.time, ComplexityClass::Quadratic);
}

#[test]
fn bubble_sort_is_quadratic_constant_space() {
    let v = Engine::rules_only().analyze(BUBBLE_SORT_PY, Language::Python);
    assert_eq!(v.time, ComplexityClass::Quadratic);
    assert_eq!(v.space, ComplexityClass::Constant);
}

#[test]
fn nested_loops_are_quadratic() {
    let v = Engine::rules_only().analyze(NESTED_LOOPS_PY, Language::Python);
    assert_eq!(v.time, ComplexityClass::Quadratic);
    assert_eq!(v.method, MethodTag::RuleBased);
    assert!(v.confidence >= 0.7);
    assert!(v.suggestions.iter().any(|s| s.contains("hash map")));
}

#[test]
fn binary_search_is_logarithmic_constant_space() {
    let v = Engine::rules_only().analyze(BINARY_SEARCH_PY, Language::Python);
    assert_eq!(v.time, ComplexityClass::Logarithmic);
    assert_eq!(v.space, ComplexityClass::Constant);
}

#[test]
fn merge_sort_is_not_mistaken_for_exponential_recursion() {
    let v = Engine::rules_only().analyze(MERGE_SORT_PY, Language::Python);
    assert_eq!(v.time, ComplexityClass::Linearithmic);
    assert_eq!(v.space, ComplexityClass::Linear);
}

#[test]
fn naive_fibonacci_is_exponential() {
    let v = Engine::rules_only().analyze(FIB_PY, Language::Python);
    assert_eq!(v.time, ComplexityClass::Exponential);
    assert_eq!(v.space, ComplexityClass::Linear);
}

#[test]
fn malformed_source_degrades_instead_of_failing() {
    let v = Engine::rules_only().analyze("def broken(:\n    for i in range(n)\n", Language::Python);
    assert!(v.confidence <= 0.4);
    assert!(v
        .breakdown
        .iter()
        .any(|line| line.contains("lexical scan")));
}

#[test]
fn unstructured_input_is_unknown_with_a_hint() {
    let v = Engine::rules_only().analyze("", Language::Python);
    assert_eq!(v.time, ComplexityClass::Unknown);
    assert!(v.confidence <= 0.4);
    assert!(!v.suggestions.is_empty());
}

#[test]
fn trained_ensemble_agrees_on_separable_input() {
    let engine = Engine::rules_only().with_ensemble(toy_ensemble());
    let v = engine.analyze(NESTED_LOOPS_PY, Language::Python);
    // Whichever estimator wins arbitration, the class is clear-cut.
    assert_eq!(v.time, ComplexityClass::Quadratic);
    assert!(v.confidence > 0.4);
}

#[test]
fn strict_mode_pins_recognized_patterns() {
    let config = EngineConfig {
        strict: true,
        ..EngineConfig::default()
    };
    let engine = Engine::new(config)
        .expect("engine")
        .with_ensemble(toy_ensemble());
    // The toy model has never seen a halving loop; strict mode pins the
    // verdict to the recognized pattern regardless of what it guesses.
    let v = engine.analyze(BINARY_SEARCH_PY, Language::Python);
    assert_eq!(v.time, ComplexityClass::Logarithmic);
    assert_eq!(v.space, ComplexityClass::Constant);
}

#[test]
fn verdict_json_uses_canonical_labels_and_wire_names() {
    let v = Engine::rules_only().analyze(NESTED_LOOPS_PY, Language::Python);
    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(json["time_complexity"], "O(n²)");
    assert_eq!(json["method"], "rule_based");
    assert!(json["confidence"].as_f64().unwrap() > 0.0);
}

#[test]
fn labels_normalize_across_notations() {
    for raw in ["O(n^2)", "o(n2)", "O( N * N )"] {
        assert_eq!(ComplexityClass::normalize(raw), ComplexityClass::Quadratic);
    }
    assert_eq!(ComplexityClass::normalize("O(V+E)"), ComplexityClass::Linear);
    assert_eq!(
        ComplexityClass::normalize("something odd"),
        ComplexityClass::Unknown
    );
}

#[test]
fn languages_cover_all_grammars() {
    for language in Language::all() {
        let v = Engine::rules_only().analyze("", *language);
        assert_eq!(v.time, ComplexityClass::Unknown);
    }
}
