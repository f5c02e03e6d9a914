//! Error report rendering.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One failed input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    /// Input file name
    pub file: String,

    /// What went wrong
    pub problem: String,
}

impl FileError {
    /// Create a new file error.
    pub fn new(file: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            problem: problem.into(),
        }
    }
}

/// Error report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Comma-separated values with a `file,problem` header
    #[default]
    Csv,
    /// Markdown table
    Markdown,
}

impl ReportFormat {
    /// Pick the format from a file extension (`.md`/`.markdown` -> Markdown).
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("md") | Some("markdown") => ReportFormat::Markdown,
            _ => ReportFormat::Csv,
        }
    }
}

/// Render errors sorted by file name.
pub fn render_report(errors: &[FileError], format: ReportFormat) -> Result<String> {
    let mut sorted = errors.to_vec();
    sorted.sort_by(|a, b| a.file.cmp(&b.file));

    match format {
        ReportFormat::Csv => to_csv(&sorted),
        ReportFormat::Markdown => Ok(to_markdown_table(&sorted)),
    }
}

/// Write the report to `path`, format chosen by extension.
pub fn write_report(errors: &[FileError], path: &Path) -> Result<()> {
    let content = render_report(errors, ReportFormat::from_path(path))?;
    std::fs::write(path, content)?;
    Ok(())
}

fn to_csv(errors: &[FileError]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if errors.is_empty() {
        writer.write_record(["file", "problem"])?;
    }
    for error in errors {
        writer.serialize(error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Render(format!("CSV report error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Render(e.to_string()))
}

fn to_markdown_table(errors: &[FileError]) -> String {
    let mut lines = vec!["| file | problem |".to_string(), "| --- | --- |".to_string()];
    for error in errors {
        lines.push(format!(
            "| {} | {} |",
            escape_cell(&error.file),
            escape_cell(&error.problem)
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
