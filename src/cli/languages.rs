//! Languages command - list what the engine understands

use anyhow::Result;
use bigo::models::Language;
use console::style;

fn extensions(language: Language) -> &'static str {
    match language {
        Language::Python => ".py .pyi",
        Language::JavaScript => ".js .jsx .mjs .cjs",
        Language::TypeScript => ".ts .tsx",
        Language::Java => ".java",
        Language::C => ".c .h",
        Language::Cpp => ".cpp .cc .cxx .hpp",
        Language::Go => ".go",
        Language::Rust => ".rs",
    }
}

pub fn run() -> Result<()> {
    println!("{}", style("Supported languages:").bold());
    for language in Language::all() {
        println!("  {:<12} {}", language.as_str(), style(extensions(*language)).dim());
    }
    Ok(())
}
