//! Implementation of the `msgfmt coverage` command.
//!
//! Compares translation catalogs against a source catalog. A translation is
//! incomplete when it lacks a message code, or when one of its templates
//! drops a `{name}` placeholder or `#name` reference the source template
//! uses.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use msgfmt::expression::parse_expression;
use msgfmt::parser::{parse_catalog, parse_template};
use serde::Serialize;
use tracing::debug;

use crate::output::table::{format_coverage_table, DroppedReferences, LanguageCoverage};
use crate::output::CatalogDiagnostic;

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Source catalog that translations are measured against.
    #[arg(long)]
    pub source: PathBuf,

    /// Languages to report on, comma-separated (e.g. `ja,de`).
    #[arg(long, value_delimiter = ',')]
    pub lang: Vec<String>,

    /// Directory holding `<lang>.properties`. Defaults to the source's directory.
    #[arg(long)]
    pub translations: Option<PathBuf>,

    /// Fail when a code is missing or a template drops a reference.
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CoverageJson<'a> {
    language: &'a str,
    translated: usize,
    total: usize,
    missing: &'a [String],
    dropped: BTreeMap<&'a str, &'a [String]>,
}

/// Message code to template text.
type Messages = BTreeMap<String, String>;

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let source = load_messages(&args.source)?;
    let dir = args
        .translations
        .clone()
        .or_else(|| args.source.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut report = Vec::with_capacity(args.lang.len());
    for language in &args.lang {
        let path = dir.join(format!("{language}.properties"));
        let translation = if path.exists() {
            load_messages(&path)?
        } else {
            debug!(path = %path.display(), "no translation file");
            Messages::new()
        };
        report.push(compare(language, &source, &translation));
    }

    if args.json {
        let json: Vec<CoverageJson<'_>> = report
            .iter()
            .map(|c| CoverageJson {
                language: &c.language,
                translated: c.translated,
                total: source.len(),
                missing: &c.missing,
                dropped: c
                    .dropped
                    .iter()
                    .map(|d| (d.code.as_str(), d.references.as_slice()))
                    .collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    } else {
        println!("{}", format_coverage_table(source.len(), &report));
        for coverage in &report {
            print_details(coverage);
        }
    }

    let incomplete = report.iter().any(LanguageCoverage::is_incomplete);
    Ok(if args.strict && incomplete {
        exitcode::DATAERR
    } else {
        exitcode::OK
    })
}

fn print_details(coverage: &LanguageCoverage) {
    if !coverage.missing.is_empty() {
        println!("\nMissing in {}:", coverage.language);
        for code in &coverage.missing {
            println!("  - {code}");
        }
    }
    if !coverage.dropped.is_empty() {
        println!("\nDropped references in {}:", coverage.language);
        for dropped in &coverage.dropped {
            println!("  - {}: {}", dropped.code, dropped.references.join(", "));
        }
    }
}

fn load_messages(path: &Path) -> Result<Messages> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read {}: {}", path.display(), e))?;
    let entries = parse_catalog(&content)
        .map_err(|e| CatalogDiagnostic::from_parse_error(path, &content, &e))?;
    Ok(entries.into_iter().map(|e| (e.code, e.text)).collect())
}

/// Compare one translation against the source catalog.
fn compare(language: &str, source: &Messages, translation: &Messages) -> LanguageCoverage {
    let mut missing = Vec::new();
    let mut dropped = Vec::new();

    for (code, text) in source {
        let Some(translated) = translation.get(code) else {
            missing.push(code.clone());
            continue;
        };
        let kept = references(translated);
        let lost: Vec<String> = references(text).difference(&kept).cloned().collect();
        if !lost.is_empty() {
            dropped.push(DroppedReferences {
                code: code.clone(),
                references: lost,
            });
        }
    }

    LanguageCoverage {
        language: language.to_string(),
        translated: source.len() - missing.len(),
        missing,
        dropped,
    }
}

/// Placeholder names (`{name}`) and expression variables (`#name`) a
/// template uses. Expressions that fail to parse contribute nothing.
fn references(text: &str) -> BTreeSet<String> {
    let template = parse_template(text);
    let mut names: BTreeSet<String> = template
        .placeholder_names()
        .map(|name| format!("{{{name}}}"))
        .collect();
    for expression in template.expressions() {
        if let Ok(expr) = parse_expression(expression) {
            names.extend(expr.variables().into_iter().map(|v| format!("#{v}")));
        }
    }
    names
}
