//! # teixcerpt
//!
//! Excerpt extraction and metadata enrichment for TEI-encoded manuscripts.
//!
//! This library selects the excerpt segments of TEI documents, reassembles
//! them into standalone documents with gap markers for the omitted text, and
//! rewrites the header from metadata joined out of instance, work and person
//! tables.
//!
//! ## Quick Start
//!
//! ```no_run
//! use teixcerpt::lookup::{LookupTables, MetadataResolver};
//! use teixcerpt::Teixcerpt;
//!
//! fn main() -> teixcerpt::Result<()> {
//!     let tables = LookupTables::load("data/instances.csv", "data/works.csv", None)?;
//!     let resolver = MetadataResolver::new(tables)?;
//!
//!     if let Some(xml) = Teixcerpt::new().extract_file("manuscript.xml", &resolver)? {
//!         println!("{}", xml);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Document-order selection**: excerpt segments filtered by status
//! - **Gap markers**: omitted content is marked with `<gap reason="omitted"/>`
//! - **Metadata join**: title, author and physical description from lookup tables
//! - **Safe relation parsing**: JSON or Python-literal relation cells, never evaluated
//! - **Batch processing**: per-file failures are collected, never fatal

pub mod batch;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport, FileOutcome};
pub use error::{Error, Result};
pub use extract::{
    ExtractOptions, Extraction, ExtractionStats, Extractor, GapPolicy, LeadingGapScope,
    RespStmtPolicy,
};
pub use lookup::{
    sep_label_and_id, LookupOptions, LookupTables, MetadataResolver, MetadataSource, Table,
};
pub use model::{Element, Node, ResolvedMetadata, TeiDocument, TEI_NS};
pub use parser::{ParseOptions, TeiParser};
pub use render::{FileError, JsonFormat, ReportFormat, XmlFormat};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse a TEI file and return its document tree.
///
/// # Example
///
/// ```no_run
/// use teixcerpt::parse_file;
///
/// let doc = parse_file("manuscript.xml").unwrap();
/// println!("Has body: {}", doc.body().is_some());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<TeiDocument> {
    let parser = TeiParser::open(path)?;
    parser.parse()
}

/// Parse a TEI file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<TeiDocument> {
    let parser = TeiParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a TEI document from a string.
///
/// # Example
///
/// ```
/// let doc = teixcerpt::parse_str("<TEI><teiHeader/><text><body/></text></TEI>").unwrap();
/// assert!(doc.header().is_some());
/// ```
pub fn parse_str(xml: &str) -> Result<TeiDocument> {
    TeiParser::from_str_with_options(xml, ParseOptions::default()).parse()
}

/// Parse a TEI document from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<TeiDocument> {
    let parser = TeiParser::from_bytes(data)?;
    parser.parse()
}

/// Parse a TEI document from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<TeiDocument> {
    let parser = TeiParser::from_reader(reader)?;
    parser.parse()
}

/// Serialize a document as indented XML with declaration.
pub fn to_xml_string(doc: &TeiDocument) -> String {
    render::to_xml(doc, XmlFormat::Pretty)
}

/// Builder for extracting TEI excerpts.
///
/// # Example
///
/// ```no_run
/// use teixcerpt::{GapPolicy, Teixcerpt};
/// use teixcerpt::lookup::{LookupTables, MetadataResolver};
/// use std::path::Path;
///
/// let tables = LookupTables::load("instances.csv", "works.csv", None)?;
/// let resolver = MetadataResolver::new(tables)?;
///
/// let report = Teixcerpt::new()
///     .without_status_filter()
///     .with_gap_policy(GapPolicy::WhenSeparated)
///     .run(&["a.xml".into(), "b.xml".into()], Path::new("out"), &resolver);
/// println!("{} written, {} failed", report.written.len(), report.errors.len());
/// # Ok::<(), teixcerpt::Error>(())
/// ```
pub struct Teixcerpt {
    parse_options: ParseOptions,
    extract_options: ExtractOptions,
    format: XmlFormat,
}

impl Teixcerpt {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            extract_options: ExtractOptions::default(),
            format: XmlFormat::default(),
        }
    }

    /// Select excerpts regardless of status.
    pub fn without_status_filter(mut self) -> Self {
        self.extract_options = self.extract_options.without_status_filter();
        self
    }

    /// Produce output even for documents without excerpts.
    pub fn keep_empty(mut self) -> Self {
        self.extract_options = self.extract_options.with_skip_empty(false);
        self
    }

    /// Set the gap policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.extract_options = self.extract_options.with_gap_policy(policy);
        self
    }

    /// Set the leading gap scope.
    pub fn with_leading_gap_scope(mut self, scope: LeadingGapScope) -> Self {
        self.extract_options = self.extract_options.with_leading_gap_scope(scope);
        self
    }

    /// Set the responsibility-statement policy.
    pub fn with_resp_stmt_policy(mut self, policy: RespStmtPolicy) -> Self {
        self.extract_options = self.extract_options.with_resp_stmt_policy(policy);
        self
    }

    /// Set the idno type used as lookup key.
    pub fn with_idno_type(mut self, idno_type: impl Into<String>) -> Self {
        self.extract_options = self.extract_options.with_idno_type(idno_type);
        self
    }

    /// Replace all extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: XmlFormat) -> Self {
        self.format = format;
        self
    }

    /// Extract one file and return the serialized output document, or
    /// `None` if the document has no qualifying excerpts.
    pub fn extract_file<P: AsRef<Path>>(
        &self,
        path: P,
        source: &dyn MetadataSource,
    ) -> Result<Option<String>> {
        let doc = parse_file_with_options(path, self.parse_options.clone())?;
        let extractor = Extractor::new(source, self.extract_options.clone());
        Ok(extractor
            .extract(&doc)?
            .map(|extraction| render::to_xml(&extraction.document, self.format)))
    }

    /// Run a batch over `inputs`, writing into `output_dir`.
    pub fn run(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        source: &dyn MetadataSource,
    ) -> BatchReport {
        let extractor = Extractor::new(source, self.extract_options.clone());
        let options = BatchOptions {
            parse: self.parse_options.clone(),
            format: self.format,
        };
        run_batch(&extractor, inputs, output_dir, &options, |_, _| {})
    }
}

impl Default for Teixcerpt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let builder = Teixcerpt::new()
            .without_status_filter()
            .keep_empty()
            .with_gap_policy(GapPolicy::WhenSeparated)
            .with_idno_type("catalogue")
            .with_format(XmlFormat::Compact);

        assert!(!builder.extract_options.filter_by_status);
        assert!(!builder.extract_options.skip_empty);
        assert_eq!(builder.extract_options.gap_policy, GapPolicy::WhenSeparated);
        assert_eq!(builder.extract_options.idno_type, "catalogue");
        assert_eq!(builder.format, XmlFormat::Compact);
    }

    #[test]
    fn test_builder_default() {
        let builder = Teixcerpt::default();
        assert!(builder.extract_options.filter_by_status);
        assert!(builder.parse_options.require_tei_root);
    }

    #[test]
    fn test_parse_str_invalid() {
        assert!(parse_str("").is_err());
        assert!(parse_str("<TEI>").is_err());
        assert!(matches!(parse_str("<html/>"), Err(Error::NotTei(_))));
    }

    #[test]
    fn test_parse_bytes() {
        let doc = parse_bytes(b"<TEI><teiHeader/></TEI>").unwrap();
        assert!(doc.header().is_some());
    }
}
