//! Python signature table
//!
//! Scripting-style idioms: `for x in range(n)`, slice-based recursion,
//! built-in sort, set/list membership. Ordering matters only as the
//! documented tie-break; more specific patterns are registered before
//! their generic counterparts.

use super::{sig, Signature};
use crate::models::ComplexityClass::*;

pub(crate) fn signatures() -> Vec<Signature> {
    [
        sig(
            r"for\s+\w+\s+in\s+range\s*\(\s*[^)]*\)\s*:\s*\n\s+for\s+\w+\s+in\s+range\s*\(",
            Quadratic,
            Constant,
            "Nested range loops",
            0.95,
        ),
        sig(
            r"return\s+\w+\s*\(\s*\w+\s*-\s*1\s*\)\s*\+\s*\w+\s*\(\s*\w+\s*-\s*2\s*\)",
            Exponential,
            Linear,
            "Fibonacci-like double recursion",
            0.9,
        ),
        sig(
            r"\.sort\s*\(\s*\)|\bsorted\s*\(",
            Linearithmic,
            Constant,
            "Built-in sort",
            0.95,
        ),
        sig(
            r"\w+\s*=\s*\(\s*\w+\s*\+\s*\w+\s*\)\s*//\s*2",
            Logarithmic,
            Constant,
            "Binary-search midpoint computation",
            0.8,
        ),
        sig(
            r"while\s+\w+\s*<=\s*\w+\s*:",
            Logarithmic,
            Constant,
            "Bounded while loop (binary-search shape)",
            0.75,
        ),
        sig(
            r"for\s+\w+\s+in\s+range\s*\(",
            Linear,
            Constant,
            "Single loop over a range",
            0.9,
        ),
        sig(
            r"for\s+\w+\s+in\s+\w+",
            Linear,
            Constant,
            "Loop over an iterable",
            0.8,
        ),
        sig(
            r"@lru_cache|\bmemo\s*\[|\bcache\s*\[",
            Linear,
            Linear,
            "Memoized recursion",
            0.7,
        ),
        sig(
            r"\bin\s+set\s*\(",
            Constant,
            Linear,
            "Membership test in a set",
            0.9,
        ),
        sig(
            r"\bin\s+\w+\s*[:\)]",
            Linear,
            Constant,
            "Membership test in a list",
            0.7,
        ),
        sig(
            r"\[\s*\w*\s*for\s+\w+\s+in\s+",
            Linear,
            Linear,
            "List comprehension",
            0.8,
        ),
        sig(
            r"\.append\s*\(",
            Constant,
            Constant,
            "List append",
            0.6,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
