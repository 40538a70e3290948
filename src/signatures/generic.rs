//! Iterator-style signature table (Go, Rust)
//!
//! These languages share enough loop/sort surface syntax that one
//! table covers both; patterns that only exist in one of them simply
//! never fire on the other.

use super::{sig, Signature};
use crate::models::ComplexityClass::*;

pub(crate) fn signatures() -> Vec<Signature> {
    [
        sig(
            r"for\s+[^{\n]*\{[^{}]*\bfor\s+[^{\n]*\{",
            Quadratic,
            Constant,
            "Nested loops",
            0.9,
        ),
        sig(
            r"\.sort\s*\(\s*\)|\.sort_unstable\s*\(|\bsort\.(?:Slice|Ints|Strings)\s*\(|\.sort_by\s*\(",
            Linearithmic,
            Constant,
            "Library sort",
            0.95,
        ),
        sig(
            r"\w+\s*:?=\s*\w+\s*\+\s*\(\s*\w+\s*-\s*\w+\s*\)\s*/\s*2|\w+\s*:?=\s*\(\s*\w+\s*\+\s*\w+\s*\)\s*/\s*2",
            Logarithmic,
            Constant,
            "Binary-search midpoint computation",
            0.8,
        ),
        sig(
            r"(?:while|for)\s+\w+\s*<=\s*\w+\s*\{",
            Logarithmic,
            Constant,
            "Bounded loop (binary-search shape)",
            0.75,
        ),
        sig(
            r"for\s+[\w,\s]+\s*:?=\s*range\s+\w+",
            Linear,
            Constant,
            "Range loop",
            0.9,
        ),
        sig(
            r"for\s+\w+\s+in\s+[\w.&]+",
            Linear,
            Constant,
            "Iterator loop",
            0.9,
        ),
        sig(
            r"\.iter\s*\(\s*\)|\.into_iter\s*\(\s*\)",
            Linear,
            Constant,
            "Iterator chain",
            0.7,
        ),
        sig(
            r"\.collect\s*(?:::<[^>]*>)?\s*\(",
            Linear,
            Linear,
            "Iterator collect",
            0.7,
        ),
        sig(
            r"make\s*\(\s*map\[|HashMap::new\s*\(|HashSet::new\s*\(",
            Constant,
            Linear,
            "Hash-based collection usage",
            0.8,
        ),
        sig(
            r"make\s*\(\s*\[\]\w+|Vec::with_capacity\s*\(|vec!\[",
            Constant,
            Linear,
            "Slice/vector allocation",
            0.7,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComplexityClass;

    #[test]
    fn test_go_range_loop() {
        let code = "for i, v := range items {\n\tsum += v\n}\n";
        assert!(signatures()
            .iter()
            .any(|s| s.description == "Range loop" && s.occurrences(code) > 0));
    }

    #[test]
    fn test_rust_iterator_loop() {
        let code = "for x in values {\n    total += x;\n}\n";
        assert!(signatures()
            .iter()
            .any(|s| s.description == "Iterator loop" && s.occurrences(code) > 0));
    }

    #[test]
    fn test_sorts_across_both_languages() {
        let sigs = signatures();
        let sort = sigs
            .iter()
            .find(|s| s.description == "Library sort")
            .unwrap();
        assert_eq!(sort.time_class, ComplexityClass::Linearithmic);
        assert!(sort.occurrences("v.sort_unstable();") > 0);
        assert!(sort.occurrences("sort.Ints(nums)") > 0);
    }
}
