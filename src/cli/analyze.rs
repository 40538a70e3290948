//! Analyze command - run the engine over files or an inline snippet

use anyhow::{bail, Context, Result};
use bigo::config::EngineConfig;
use bigo::engine::Engine;
use bigo::models::{Language, Verdict};
use console::style;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct Args {
    pub files: Vec<PathBuf>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub format: String,
    pub strict: bool,
    pub model: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// One analyzed input, ready for serialization.
#[derive(Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    language: Language,
    #[serde(flatten)]
    verdict: Verdict,
}

pub fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::discover(Path::new("."))?,
    };
    if args.strict {
        config.strict = true;
    }
    if let Some(model) = &args.model {
        config.model_path = Some(model.clone());
    }
    let engine = Engine::new(config)?;

    let forced_language = args
        .language
        .as_deref()
        .map(|s| s.parse::<Language>())
        .transpose()?;

    let reports = if let Some(code) = &args.code {
        if code.trim().is_empty() {
            bail!("--code is empty; nothing to analyze");
        }
        let language =
            forced_language.context("--code requires --language to be set")?;
        vec![Report {
            file: None,
            language,
            verdict: engine.analyze(code, language),
        }]
    } else {
        if args.files.is_empty() {
            bail!("provide one or more files, or --code with --language");
        }
        args.files
            .par_iter()
            .map(|path| analyze_file(&engine, path, forced_language))
            .collect::<Result<Vec<_>>>()?
    };

    match args.format.as_str() {
        "json" => print_json(&reports)?,
        _ => {
            for report in &reports {
                print_text(report);
            }
        }
    }
    Ok(())
}

fn analyze_file(engine: &Engine, path: &Path, forced: Option<Language>) -> Result<Report> {
    let language = match forced {
        Some(language) => language,
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Language::from_extension)
            .with_context(|| {
                format!(
                    "cannot infer language for {}; pass --language",
                    path.display()
                )
            })?,
    };
    let code = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if code.trim().is_empty() {
        bail!("{} is empty; nothing to analyze", path.display());
    }
    Ok(Report {
        file: Some(path.display().to_string()),
        language,
        verdict: engine.analyze(&code, language),
    })
}

fn print_json(reports: &[Report]) -> Result<()> {
    // A single snippet prints as one object, batches as an array.
    let out = if reports.len() == 1 && reports[0].file.is_none() {
        serde_json::to_string_pretty(&reports[0])?
    } else {
        serde_json::to_string_pretty(reports)?
    };
    println!("{out}");
    Ok(())
}

fn print_text(report: &Report) {
    if let Some(file) = &report.file {
        println!("{}", style(file).bold().underlined());
    }
    let v = &report.verdict;
    println!(
        "  {} {}   {} {}   {} {:.0}%   {} {}",
        style("time:").bold(),
        style(v.time).cyan(),
        style("space:").bold(),
        style(v.space).cyan(),
        style("confidence:").bold(),
        v.confidence * 100.0,
        style("method:").bold(),
        style(v.method).dim(),
    );
    if !v.breakdown.is_empty() {
        println!("  {}", style("Breakdown:").bold());
        for line in &v.breakdown {
            println!("    - {line}");
        }
    }
    if !v.suggestions.is_empty() {
        println!("  {}", style("Suggestions:").bold());
        for line in &v.suggestions {
            println!("    - {line}");
        }
    }
    println!();
}
