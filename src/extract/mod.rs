//! Excerpt extraction: selection, body reassembly and header rewriting.
//!
//! # Example
//!
//! ```no_run
//! use teixcerpt::extract::{ExtractOptions, Extractor};
//! use teixcerpt::lookup::{LookupTables, MetadataResolver};
//!
//! fn main() -> teixcerpt::Result<()> {
//!     let tables = LookupTables::load("data/instances.csv", "data/works.csv", None)?;
//!     let resolver = MetadataResolver::new(tables)?;
//!     let extractor = Extractor::new(&resolver, ExtractOptions::default());
//!
//!     let doc = teixcerpt::parse_file("manuscript.xml")?;
//!     if let Some(extraction) = extractor.extract(&doc)? {
//!         println!("{} excerpts", extraction.stats.segment_count);
//!     }
//!     Ok(())
//! }
//! ```

mod body;
mod header;
mod options;
mod result;
mod selector;

pub use body::{gap, reassemble_body, BodyStats, GAP_REASON};
pub use header::{
    collect_idnos, physical_description, resolve_candidates, transform_header, HeaderOutcome,
    UNKNOWN,
};
pub use options::{ExtractOptions, GapPolicy, LeadingGapScope, RespStmtPolicy, DEFAULT_STATUSES};
pub use result::{Extraction, ExtractionStats};
pub use selector::{excerpt_status_counts, is_excerpt, select_excerpts, select_in_body, Segment};

use crate::error::{Error, Result};
use crate::lookup::MetadataSource;
use crate::model::TeiDocument;

/// Runs the extraction passes over parsed documents.
pub struct Extractor<'a> {
    source: &'a dyn MetadataSource,
    options: ExtractOptions,
}

impl<'a> Extractor<'a> {
    /// Create an extractor resolving identifiers through `source`.
    pub fn new(source: &'a dyn MetadataSource, options: ExtractOptions) -> Self {
        Self { source, options }
    }

    /// The extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract one document.
    ///
    /// Returns `Ok(None)` when the document has no selected excerpts and
    /// [`ExtractOptions::skip_empty`] is set. The source is not modified.
    pub fn extract(&self, doc: &TeiDocument) -> Result<Option<Extraction>> {
        let src_header = doc
            .header()
            .ok_or_else(|| Error::MissingSection("teiHeader".into()))?;
        if doc.body().is_none() {
            return Err(Error::MissingSection("text/body".into()));
        }

        let segments = select_excerpts(doc, &self.options);
        if segments.is_empty() && self.options.skip_empty {
            log::debug!("No qualifying excerpts; skipping document");
            return Ok(None);
        }

        let (text, body_stats) = reassemble_body(&segments, &self.options);
        let outcome = transform_header(src_header, self.source, &self.options)?;

        let word_count = segments
            .iter()
            .map(|s| s.element.text().split_whitespace().count())
            .sum();

        let stats = ExtractionStats {
            segment_count: body_stats.blocks,
            gap_count: body_stats.gaps,
            rejected_idnos: outcome.rejected,
            word_count,
        };

        let document = TeiDocument::assemble(outcome.header, text, &doc.namespace_declarations());

        Ok(Some(Extraction {
            document,
            idno: outcome.idno,
            metadata: outcome.metadata,
            stats,
        }))
    }
}
