//! Grammar-aware structural fact extraction using tree-sitter
//!
//! Walks the syntax tree counting loop constructs, tracking nesting
//! depth, and flagging self-recursive calls (a call whose target name
//! matches an enclosing function definition's name).
//!
//! Parse failure is a value, not an exception: callers branch on
//! [`Extraction`] and fall back to the lexical scan.

use crate::models::Language;
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Structural facts about one snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralFacts {
    pub loop_count: usize,
    /// Loops whose entry depth was already >= 1.
    pub nested_loop_count: usize,
    pub recursion_present: bool,
    pub function_count: usize,
    pub branch_count: usize,
    pub call_count: usize,
}

/// Outcome of the grammar-aware pass.
#[derive(Debug, Clone)]
pub enum Extraction {
    Parsed(StructuralFacts),
    /// Why the grammar pass gave up (malformed source, parser error).
    ParseFailed(String),
}

/// Loop constructs across the supported grammars.
const LOOP_KINDS: &[&str] = &[
    "for_statement",
    "while_statement",
    "do_statement",
    "for_in_statement",
    "enhanced_for_statement",
    "for_range_loop",
    "for_expression",
    "while_expression",
    "loop_expression",
];

/// Function definition constructs across the supported grammars.
const FUNCTION_KINDS: &[&str] = &[
    "function_definition",
    "function_declaration",
    "method_definition",
    "method_declaration",
    "function_item",
];

/// Call constructs across the supported grammars.
const CALL_KINDS: &[&str] = &["call", "call_expression", "method_invocation"];

/// Branch constructs, counted for the ensemble feature vector.
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "if_expression",
    "conditional_expression",
    "match_expression",
    "switch_statement",
    "switch_expression",
];

fn grammar(language: Language) -> tree_sitter::Language {
    match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        Language::Go => tree_sitter_go::LANGUAGE.into(),
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
    }
}

/// Extract structural facts from `code`, or report why parsing failed.
pub fn extract(code: &str, language: Language) -> Extraction {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&grammar(language)) {
        return Extraction::ParseFailed(format!("grammar unavailable for {language}: {e}"));
    }

    let tree = match parser.parse(code, None) {
        Some(tree) => tree,
        None => return Extraction::ParseFailed(format!("parser produced no tree for {language}")),
    };

    let root = tree.root_node();
    if root.has_error() {
        return Extraction::ParseFailed(format!("syntax errors in {language} source"));
    }

    let mut facts = StructuralFacts::default();
    let mut enclosing = Vec::new();
    walk(root, code.as_bytes(), 0, &mut enclosing, &mut facts);
    debug!(?facts, %language, "grammar-aware extraction");
    Extraction::Parsed(facts)
}

fn walk(
    node: Node,
    source: &[u8],
    loop_depth: usize,
    enclosing: &mut Vec<String>,
    facts: &mut StructuralFacts,
) {
    let kind = node.kind();

    if LOOP_KINDS.contains(&kind) {
        facts.loop_count += 1;
        if loop_depth >= 1 {
            facts.nested_loop_count += 1;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            walk(child, source, loop_depth + 1, enclosing, facts);
        }
        return;
    }

    if FUNCTION_KINDS.contains(&kind) {
        facts.function_count += 1;
        let name = function_name(node, source);
        if let Some(ref name) = name {
            enclosing.push(name.clone());
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            walk(child, source, loop_depth, enclosing, facts);
        }
        if name.is_some() {
            enclosing.pop();
        }
        return;
    }

    if CALL_KINDS.contains(&kind) {
        facts.call_count += 1;
        if let Some(target) = call_target(node, source) {
            if enclosing.iter().any(|f| f == &target) {
                facts.recursion_present = true;
            }
        }
    } else if BRANCH_KINDS.contains(&kind) {
        facts.branch_count += 1;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, loop_depth, enclosing, facts);
    }
}

/// Name of a function definition node.
///
/// Most grammars expose a `name` field; C/C++ bury the identifier
/// inside the declarator, so we descend to the first identifier.
fn function_name(node: Node, source: &[u8]) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return name.utf8_text(source).ok().map(str::to_string);
    }
    let declarator = node.child_by_field_name("declarator")?;
    first_identifier(declarator, source)
}

fn first_identifier(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() == "identifier" || node.kind() == "field_identifier" {
        return node.utf8_text(source).ok().map(str::to_string);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(name) = first_identifier(child, source) {
            return Some(name);
        }
    }
    None
}

/// Simple name of a call's target.
///
/// Qualified targets (`self.merge`, `Solver::permute`) reduce to the
/// final segment so self-recursion through a method still matches.
fn call_target(node: Node, source: &[u8]) -> Option<String> {
    let callee = node
        .child_by_field_name("function")
        .or_else(|| node.child_by_field_name("name"))?;
    let text = callee.utf8_text(source).ok()?;
    let simple = text
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(text)
        .trim();
    if simple.is_empty() {
        None
    } else {
        Some(simple.to_string())
    }
}
