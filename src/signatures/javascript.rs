//! JavaScript / TypeScript signature table

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
            r"\.sort\s*\(",
            Linearithmic,
            Constant,
            "Array sort",
            0.95,
        ),
        sig(
            r"\w+\s*=\s*Math\.floor\s*\(\s*\(\s*\w+\s*\+\s*\w+\s*\)\s*/\s*2\s*\)|\w+\s*=\s*\(\s*\w+\s*\+\s*\w+\s*\)\s*>>\s*1",
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
            r"for\s*\(\s*(?:let|var|const)\s+\w+\s*=\s*\w+\s*;\s*\w+\s*<=?\s*[^;]+;\s*[^)]*\)",
            Linear,
            Constant,
            "Indexed array iteration",
            0.9,
        ),
        sig(
            r"for\s*\(\s*(?:const|let|var)\s+\w+\s+of\s+\w+\s*\)",
            Linear,
            Constant,
            "for...of loop",
            0.9,
        ),
        sig(
            r"\.forEach\s*\(|\.map\s*\(|\.filter\s*\(|\.reduce\s*\(",
            Linear,
            Linear,
            "Array iteration method",
            0.85,
        ),
        sig(
            r"\.includes\s*\(|\.indexOf\s*\(",
            Linear,
            Constant,
            "Linear membership scan",
            0.8,
        ),
        sig(
            r"new\s+(?:Set|Map)\s*\(|\.has\s*\(",
            Constant,
            Linear,
            "Hash-based collection usage",
            0.8,
        ),
        sig(
            r"\.push\s*\(",
            Constant,
            Constant,
            "Array push",
            0.6,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
