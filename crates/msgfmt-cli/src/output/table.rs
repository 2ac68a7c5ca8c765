//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};

/// Coverage of one translation against the source catalog.
pub struct LanguageCoverage {
    pub language: String,
    /// Source codes present in the translation.
    pub translated: usize,
    /// Source codes absent from the translation.
    pub missing: Vec<String>,
    pub dropped: Vec<DroppedReferences>,
}

impl LanguageCoverage {
    pub fn is_incomplete(&self) -> bool {
        !self.missing.is_empty() || !self.dropped.is_empty()
    }
}

/// References a translated template no longer uses.
pub struct DroppedReferences {
    pub code: String,
    /// `{name}` placeholders and `#name` variables, sorted.
    pub references: Vec<String>,
}

/// Check results for a single catalog file.
pub struct FileSummary {
    pub file: String,
    pub entries: usize,
    pub placeholders: usize,
    pub expressions: usize,
    pub errors: usize,
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Format coverage data as an ASCII table.
pub fn format_coverage_table(source_count: usize, coverage: &[LanguageCoverage]) -> Table {
    let mut table = new_table(vec!["Language", "Coverage", "Missing", "Dropped references"]);

    for lang in coverage {
        let dropped: usize = lang.dropped.iter().map(|d| d.references.len()).sum();
        table.add_row(vec![
            lang.language.clone(),
            format!("{}/{}", lang.translated, source_count),
            lang.missing.len().to_string(),
            dropped.to_string(),
        ]);
    }

    table
}

/// Format per-file check results as an ASCII table.
pub fn format_check_table(files: &[FileSummary]) -> Table {
    let mut table = new_table(vec![
        "File",
        "Messages",
        "Placeholders",
        "Expressions",
        "Errors",
    ]);

    for file in files {
        table.add_row(vec![
            file.file.clone(),
            file.entries.to_string(),
            file.placeholders.to_string(),
            file.expressions.to_string(),
            file.errors.to_string(),
        ]);
    }

    table
}
