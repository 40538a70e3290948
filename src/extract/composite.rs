//! Composite pattern flags
//!
//! Each flag fires only when ALL of its cues are present in the
//! snippet. A single keyword never trips a flag; conjunction is what
//! makes these reliable enough to back guardrail overrides.

use super::ast::StructuralFacts;
use crate::models::ComplexityClass;
use regex::Regex;
use std::sync::OnceLock;

/// Conjunctive structural patterns, ordered by reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeFlag {
    MergeSort,
    BinarySearch,
    DpTripleLoop,
    Dp2dTable,
    TriangularNested,
    PermutationBacktracking,
}

impl CompositeFlag {
    /// All flags in arbitration priority order.
    pub const ALL: [CompositeFlag; 6] = [
        CompositeFlag::MergeSort,
        CompositeFlag::BinarySearch,
        CompositeFlag::DpTripleLoop,
        CompositeFlag::Dp2dTable,
        CompositeFlag::TriangularNested,
        CompositeFlag::PermutationBacktracking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeFlag::MergeSort => "merge_sort",
            CompositeFlag::BinarySearch => "binary_search",
            CompositeFlag::DpTripleLoop => "dp_triple_loop",
            CompositeFlag::Dp2dTable => "dp_2d_table",
            CompositeFlag::TriangularNested => "triangular_nested",
            CompositeFlag::PermutationBacktracking => "permutation_backtracking",
        }
    }

    /// The (time, space) labels this pattern is known to have.
    pub fn known_labels(&self) -> (ComplexityClass, ComplexityClass) {
        match self {
            CompositeFlag::MergeSort => {
                (ComplexityClass::Linearithmic, ComplexityClass::Linear)
            }
            CompositeFlag::BinarySearch => {
                (ComplexityClass::Logarithmic, ComplexityClass::Constant)
            }
            CompositeFlag::DpTripleLoop => {
                (ComplexityClass::Cubic, ComplexityClass::Quadratic)
            }
            CompositeFlag::Dp2dTable => {
                (ComplexityClass::Quadratic, ComplexityClass::Quadratic)
            }
            CompositeFlag::TriangularNested => {
                (ComplexityClass::Quadratic, ComplexityClass::Constant)
            }
            CompositeFlag::PermutationBacktracking => {
                (ComplexityClass::Factorial, ComplexityClass::Linear)
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            CompositeFlag::MergeSort => "divide-and-conquer sort (split, recurse, merge)",
            CompositeFlag::BinarySearch => "halving search over a sorted range",
            CompositeFlag::DpTripleLoop => "dynamic programming with three nested loops",
            CompositeFlag::Dp2dTable => "dynamic programming over a 2-D table",
            CompositeFlag::TriangularNested => "nested loops over a shrinking inner range",
            CompositeFlag::PermutationBacktracking => "permutation enumeration via backtracking",
        }
    }
}

/// Flags detected for one snippet.
#[derive(Debug, Clone, Default)]
pub struct CompositeFlags {
    fired: Vec<CompositeFlag>,
}

impl CompositeFlags {
    pub fn contains(&self, flag: CompositeFlag) -> bool {
        self.fired.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CompositeFlag> + '_ {
        self.fired.iter().copied()
    }

    /// Highest-priority flag among those that fired.
    pub fn strongest(&self) -> Option<CompositeFlag> {
        CompositeFlag::ALL.iter().copied().find(|f| self.contains(*f))
    }
}

fn has_any(code: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| code.contains(cue))
}

// A loop whose condition compares two bounds with `<=`, the shape of
// `while low <= high` in every supported language.
fn bounded_loop_condition(code: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:while|for)\s*\(?\s*\w+\s*<=\s*\w+").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(code))
}

/// Run every flag's cue conjunction against one snippet.
pub fn detect(code: &str, facts: &StructuralFacts) -> CompositeFlags {
    let lower = code.to_lowercase();
    let mut fired = Vec::new();

    // Binary search: a midpoint computation AND a bound that halves
    // AND a loop bounded by a `low <= high` comparison.
    let midpoint = has_any(&lower, &["(low + high) / 2", "(left + right) / 2", "(lo + hi) / 2"])
        || has_any(&lower, &["// 2", ">> 1", "/ 2;", "/ 2\n", "/2)"]) && lower.contains("mid");
    let halving_bounds = has_any(&lower, &["high = mid", "hi = mid", "right = mid", "low = mid", "lo = mid", "left = mid"])
        || has_any(&lower, &["high = mid - 1", "low = mid + 1"]);
    if midpoint && halving_bounds && bounded_loop_condition(&lower) && facts.loop_count >= 1 {
        fired.push(CompositeFlag::BinarySearch);
    }

    // Merge sort: recursion AND a split at the midpoint AND a merge step.
    let split = has_any(&lower, &["len() / 2", "len / 2", "length / 2", "// 2", "size / 2", "/ 2]"]);
    let merge = has_any(&lower, &["merge", "while", "extend", "push"]);
    if facts.recursion_present && split && merge && lower.contains("merge") {
        fired.push(CompositeFlag::MergeSort);
    }

    // Triangular nesting: inner loop whose start tracks the outer index.
    let triangular = has_any(&lower, &[
        "range(i + 1", "range(i+1", "range(i,", "j = i + 1", "j = i+1", "j := i + 1", "j := i+1",
        "n - i - 1", "n-i-1", "len(a) - i - 1",
    ]);
    if triangular && facts.nested_loop_count >= 1 {
        fired.push(CompositeFlag::TriangularNested);
    }

    // 2-D DP: a table indexed on two dimensions AND doubly nested loops.
    let table = has_any(&lower, &["dp[i][j]", "dp[i - 1]", "dp[i-1]", "table[i][j]", "memo[i][j]"]);
    let table_alloc = has_any(&lower, &[
        "[[0", "vec![vec!", "new int[", "array.from", "[[false", "[[none",
    ]);
    if (table || table_alloc && lower.contains("dp")) && facts.nested_loop_count >= 1 {
        if facts.loop_count >= 3 && has_any(&lower, &["dp[i][j]", "dp[i][k]", "dist[i][j]", "k"])
            && triple_nesting(facts)
        {
            fired.push(CompositeFlag::DpTripleLoop);
        } else {
            fired.push(CompositeFlag::Dp2dTable);
        }
    }

    // Permutation backtracking: recursion AND choose/undo around the
    // recursive call AND an exhausted-choices base case.
    let choose_undo = (has_any(&lower, &["push", "append", "add("])
        && has_any(&lower, &["pop", "remove", "undo"]))
        || lower.contains("swap");
    let enumerates = has_any(&lower, &["permut", "backtrack", "remaining", "used["]);
    if facts.recursion_present && choose_undo && enumerates {
        fired.push(CompositeFlag::PermutationBacktracking);
    }

    CompositeFlags { fired }
}

// Three loops with at least two nesting relations is the structural
// shape of a triple loop; lexical cues alone cannot establish depth.
fn triple_nesting(facts: &StructuralFacts) -> bool {
    facts.loop_count >= 3 && facts.nested_loop_count >= 2
}
