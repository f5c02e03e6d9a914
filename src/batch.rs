//! Batch driver: runs extraction over many files and collects failures.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::{Extraction, Extractor};
use crate::parser::{ParseOptions, TeiParser};
use crate::render::{to_xml, FileError, XmlFormat};

/// What happened to one input file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Output written to the given path
    Written {
        /// Output path
        path: PathBuf,
        /// Number of excerpts extracted
        segments: usize,
    },
    /// No qualifying excerpts; nothing written
    Skipped,
    /// Processing failed; nothing written
    Failed(Error),
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written
    pub written: Vec<PathBuf>,

    /// Inputs skipped for lack of excerpts
    pub skipped: Vec<PathBuf>,

    /// Failed inputs, sorted by file name
    pub errors: Vec<FileError>,
}

impl BatchReport {
    /// Whether every input was either written or skipped.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total inputs seen.
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.errors.len()
    }
}

/// Options for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Parser options
    pub parse: ParseOptions,

    /// Output serialization format
    pub format: XmlFormat,
}

/// Output path for an input: same base name under `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .ok_or_else(|| Error::Other(format!("{} has no file name", input.display())))?;
    Ok(output_dir.join(name))
}

/// Display name used in the error report.
fn report_name(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

/// Parse, extract and write one file.
pub fn process_file(
    extractor: &Extractor<'_>,
    input: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> FileOutcome {
    let doc = match TeiParser::open_with_options(input, options.parse.clone())
        .and_then(|parser| parser.parse())
    {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Failed to load {}: {}", input.display(), e);
            return FileOutcome::Failed(e);
        }
    };

    let extraction = match extractor.extract(&doc) {
        Ok(Some(extraction)) => extraction,
        Ok(None) => return FileOutcome::Skipped,
        Err(e) => {
            log::error!("Failed to process {}: {}", input.display(), e);
            return FileOutcome::Failed(e);
        }
    };

    match write_extraction(&extraction, input, output_dir, options.format) {
        Ok(path) => {
            log::info!(
                "Extracted {} excerpts -> {}",
                extraction.stats.segment_count,
                path.display()
            );
            FileOutcome::Written {
                path,
                segments: extraction.stats.segment_count,
            }
        }
        Err(e) => {
            log::error!("Failed to write output for {}: {}", input.display(), e);
            FileOutcome::Failed(e)
        }
    }
}

fn write_extraction(
    extraction: &Extraction,
    input: &Path,
    output_dir: &Path,
    format: XmlFormat,
) -> Result<PathBuf> {
    let path = output_path(input, output_dir)?;
    std::fs::write(&path, to_xml(&extraction.document, format))?;
    Ok(path)
}

/// Run the extractor over every input, writing results into `output_dir`.
///
/// `progress` is called once per input after it has been handled. Failures
/// are recorded in the report and never stop the batch.
pub fn run_batch<F>(
    extractor: &Extractor<'_>,
    inputs: &[PathBuf],
    output_dir: &Path,
    options: &BatchOptions,
    mut progress: F,
) -> BatchReport
where
    F: FnMut(&Path, &FileOutcome),
{
    let mut report = BatchReport::default();

    for input in inputs {
        let outcome = process_file(extractor, input, output_dir, options);
        progress(input, &outcome);
        match outcome {
            FileOutcome::Written { path, .. } => report.written.push(path),
            FileOutcome::Skipped => report.skipped.push(input.clone()),
            FileOutcome::Failed(e) => report
                .errors
                .push(FileError::new(report_name(input), e.to_string())),
        }
    }

    report.errors.sort_by(|a, b| a.file.cmp(&b.file));
    report
}
