//! Implementation of the `msgfmt check` command.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic, Report, Result};
use msgfmt::parser::{parse_catalog, parse_template};
use msgfmt::{ExpressionError, ExpressionEvaluator, StandardEvaluator};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;

use crate::output::table::{format_check_table, FileSummary};
use crate::output::CatalogDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Catalog files to check (.properties)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct CheckJson {
    file: String,
    messages: usize,
    placeholders: usize,
    expressions: usize,
    errors: Vec<String>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let evaluator = StandardEvaluator::new();
    let mut results = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let (summary, diagnostics) = check_file(path, &evaluator)?;
        debug!(file = %summary.file, errors = diagnostics.len(), "checked catalog");
        results.push((summary, diagnostics));
    }

    let error_count: usize = results.iter().map(|(_, d)| d.len()).sum();

    if args.json {
        let json: Vec<CheckJson> = results
            .iter()
            .map(|(summary, diagnostics)| CheckJson {
                file: summary.file.clone(),
                messages: summary.entries,
                placeholders: summary.placeholders,
                expressions: summary.expressions,
                errors: diagnostics.iter().map(ToString::to_string).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    } else {
        let mut summaries = Vec::with_capacity(results.len());
        for (summary, diagnostics) in results {
            for diagnostic in diagnostics {
                eprintln!("{:?}", Report::new(diagnostic));
            }
            summaries.push(summary);
        }
        println!("{}", format_check_table(&summaries));
        if error_count == 0 {
            println!("{}", "All templates are valid".green());
        } else {
            println!("{}", format!("{error_count} error(s) found").red());
        }
    }

    if error_count == 0 {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}

/// Parse one catalog and syntax-check every expression placeholder in it.
fn check_file(
    path: &Path,
    evaluator: &StandardEvaluator,
) -> Result<(FileSummary, Vec<CatalogDiagnostic>)> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read {}: {}", path.display(), e))?;

    let mut summary = FileSummary {
        file: path.display().to_string(),
        entries: 0,
        placeholders: 0,
        expressions: 0,
        errors: 0,
    };

    let entries = match parse_catalog(&content) {
        Ok(entries) => entries,
        Err(e) => {
            summary.errors = 1;
            let diagnostic = CatalogDiagnostic::from_parse_error(path, &content, &e);
            return Ok((summary, vec![diagnostic]));
        }
    };

    let mut diagnostics = Vec::new();
    summary.entries = entries.len();
    for entry in &entries {
        let template = parse_template(&entry.text);
        summary.placeholders += template.placeholder_names().count();
        for expression in template.expressions() {
            summary.expressions += 1;
            if let Err(ExpressionError::Syntax(e)) = evaluator.check(expression) {
                diagnostics.push(CatalogDiagnostic::from_syntax_error(
                    path,
                    &content,
                    entry.line,
                    &entry.code,
                    &e,
                ));
            }
        }
    }
    summary.errors = diagnostics.len();

    Ok((summary, diagnostics))
}
