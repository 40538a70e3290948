//! Java signature table

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
            r"Arrays\.sort\s*\(|Collections\.sort\s*\(",
            Linearithmic,
            Constant,
            "Library sort",
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
            r"for\s*\(\s*\w+(?:\s*<[^>]*>)?\s+\w+\s*:\s*\w+\s*\)",
            Linear,
            Constant,
            "Enhanced for loop",
            0.9,
        ),
        sig(
            r"for\s*\(\s*int\s+\w+\s*=\s*\w+\s*;\s*\w+\s*<=?\s*[^;]+;\s*[^)]*\)",
            Linear,
            Constant,
            "Indexed array iteration",
            0.9,
        ),
        sig(
            r"\.containsKey\s*\(|\.containsValue\s*\(|HashSet\s*<[^>]*>\s*\w+|HashMap\s*<",
            Constant,
            Linear,
            "Hash-based collection usage",
            0.8,
        ),
        sig(
            r"ArrayList\s*<\s*\w+\s*>\s+\w+|new\s+ArrayList\s*<",
            Constant,
            Linear,
            "ArrayList declaration",
            0.8,
        ),
        sig(
            r"new\s+\w+\s*\[\s*\w+\s*\]\s*\[\s*\w+\s*\]",
            Constant,
            Quadratic,
            "2-D array allocation",
            0.8,
        ),
        sig(
            r"new\s+\w+\s*\[\s*\w+\s*\]",
            Constant,
            Linear,
            "Array allocation",
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
    fn test_enhanced_for_loop() {
        let code = "for (String item : items) { process(item); }";
        assert!(signatures()
            .iter()
            .any(|s| s.description == "Enhanced for loop" && s.occurrences(code) > 0));
    }

    #[test]
    fn test_arrays_sort() {
        let sigs = signatures();
        let sort = sigs
            .iter()
            .find(|s| s.description == "Library sort")
            .unwrap();
        assert_eq!(sort.time_class, ComplexityClass::Linearithmic);
        assert_eq!(sort.occurrences("Arrays.sort(nums);"), 1);
    }

    #[test]
    fn test_2d_array_space() {
        let sigs = signatures();
        let table = sigs
            .iter()
            .find(|s| s.description == "2-D array allocation")
            .unwrap();
        assert_eq!(table.space_class, ComplexityClass::Quadratic);
        assert_eq!(table.occurrences("int[][] dp = new int[n][m];"), 1);
    }
}
