//! Lexical fallback scan
//!
//! When grammar-aware extraction fails (malformed input) the same
//! structural facts are derived from keyword counts and indentation.
//! This path is strictly less reliable; estimates built on it are
//! capped at [`FALLBACK_CONFIDENCE_CEILING`] no matter how many
//! signals fire.

use super::ast::StructuralFacts;
use crate::models::Language;
use tracing::debug;

/// Hard confidence ceiling for fallback-derived facts.
pub const FALLBACK_CONFIDENCE_CEILING: f64 = 0.4;

fn loop_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &["for ", "while "],
        Language::Go => &["for "],
        Language::Rust => &["for ", "while ", "loop {", "loop{"],
        _ => &["for ", "for(", "while ", "while(", "do {", "do{"],
    }
}

fn function_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &["def "],
        Language::JavaScript | Language::TypeScript => &["function ", "=> {"],
        Language::Go => &["func "],
        Language::Rust => &["fn "],
        // C-family snippets rarely carry an unambiguous keyword; a
        // return-type-plus-paren line is close enough for a fallback.
        Language::Java | Language::C | Language::Cpp => &["("],
    }
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Derive structural facts from lexical counts alone.
pub fn scan(code: &str, language: Language) -> StructuralFacts {
    let mut facts = StructuralFacts::default();
    let loops = loop_keywords(language);
    let defs = function_keywords(language);

    // Function names defined so far, for the recursion heuristic.
    let mut defined_names: Vec<String> = Vec::new();
    // Indentation of each loop line seen so far.
    let mut loop_indents: Vec<usize> = Vec::new();

    for line in code.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
            continue;
        }

        if loops.iter().any(|kw| trimmed.starts_with(kw)) {
            facts.loop_count += 1;
            let indent = indent_width(line);
            if loop_indents.iter().any(|&prev| prev < indent) {
                facts.nested_loop_count += 1;
            }
            loop_indents.push(indent);
        }

        if trimmed.starts_with("if ") || trimmed.starts_with("if(") || trimmed.starts_with("if (")
        {
            facts.branch_count += 1;
        }

        if defs.iter().any(|kw| trimmed.contains(kw)) {
            if let Some(name) = definition_name(trimmed, language) {
                facts.function_count += 1;
                defined_names.push(name);
            }
        }

        if trimmed.contains('(') && !defs.iter().any(|kw| trimmed.starts_with(kw)) {
            facts.call_count += 1;
        }

        // Recursion heuristic: a return statement calling a function
        // that was defined earlier in the snippet.
        if trimmed.starts_with("return") {
            for name in &defined_names {
                if trimmed.contains(&format!("{name}(")) {
                    facts.recursion_present = true;
                }
            }
        }
    }

    debug!(?facts, %language, "fallback lexical scan");
    facts
}

/// Pull the defined name out of a definition line.
fn definition_name(line: &str, language: Language) -> Option<String> {
    let after_keyword = match language {
        Language::Python => line.strip_prefix("def ")?,
        Language::Go => line.strip_prefix("func ")?,
        Language::Rust => line.strip_prefix("fn ").or_else(|| {
            line.strip_prefix("pub fn ")
        })?,
        Language::JavaScript | Language::TypeScript => line.strip_prefix("function ")?,
        // C-family: take the identifier directly before the paren.
        Language::Java | Language::C | Language::Cpp => {
            let paren = line.find('(')?;
            let head = &line[..paren];
            let name = head.rsplit(|c: char| !c.is_alphanumeric() && c != '_').next()?;
            if name.is_empty() || name.chars().next()?.is_numeric() {
                return None;
            }
            return Some(name.to_string());
        }
    };

    let name: String = after_keyword
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
