//! C / C++ signature table
//!
//! Brace-and-pointer idioms: counted for loops, pointer-chasing
//! traversals, STL sort, container declarations. Shared by C and C++;
//! the STL patterns simply never fire on plain C.

use super::{sig, Signature};
use crate::models::ComplexityClass::*;

pub(crate) fn signatures() -> Vec<Signature> {
    [
        sig(
            r"for\s*\([^)]*\)\s*\{[^{}]*for\s*\(",
            Quadratic,
            Constant,
            "Nested for loops",
            0.95,
        ),
        sig(
            r"\bsort\s*\(\s*\w+\.begin\s*\(\s*\)\s*,\s*\w+\.end\s*\(\s*\)",
            Linearithmic,
            Constant,
            "STL sort",
            0.95,
        ),
        sig(
            r"\w+\s*=\s*\w+\s*\+\s*\(\s*\w+\s*-\s*\w+\s*\)\s*/\s*2|\w+\s*=\s*\(\s*\w+\s*\+\s*\w+\s*\)\s*/\s*2",
            Logarithmic,
            Constant,
            "Binary-search midpoint computation",
            0.8,
        ),
        sig(
            r"while\s*\(\s*\w+\s*<=\s*\w+\s*\)",
            Logarithmic,
            Constant,
            "Bounded while loop (binary-search shape)",
            0.75,
        ),
        sig(
            r"for\s*\(\s*(?:int|size_t|auto|unsigned)\s+\w+\s*=\s*\w+\s*;\s*\w+\s*<=?\s*[^;]+;\s*[^)]*\)",
            Linear,
            Constant,
            "Counted for loop",
            0.9,
        ),
        sig(
            r"for\s*\(\s*(?:auto|const auto)\s*&?&?\s*\w+\s*:\s*\w+\s*\)",
            Linear,
            Constant,
            "Range-based for loop",
            0.9,
        ),
        sig(
            r"while\s*\(\s*\w+(?:\s*->\s*\w+)?\s*!=\s*(?:nullptr|NULL)\s*\)",
            Linear,
            Constant,
            "Pointer-chasing traversal",
            0.9,
        ),
        sig(
            r"\bvector\s*<\s*vector\s*<",
            Constant,
            Quadratic,
            "2-D vector declaration",
            0.8,
        ),
        sig(
            r"\bvector\s*<\s*\w+\s*>\s+\w+",
            Constant,
            Linear,
            "Vector declaration",
            0.8,
        ),
        sig(
            r"\b(?:unordered_map|unordered_set|map|set)\s*<",
            Constant,
            Linear,
            "Associative container declaration",
            0.7,
        ),
        sig(
            r"\bnew\s+\w+\s*\[\s*\w+\s*\]",
            Constant,
            Linear,
            "Dynamic array allocation",
            0.8,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
