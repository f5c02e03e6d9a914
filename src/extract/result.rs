//! Extraction result with metadata and statistics.

use serde::{Deserialize, Serialize};

use crate::model::{ResolvedMetadata, TeiDocument};

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The reassembled document
    pub document: TeiDocument,

    /// Identifier the header was resolved with
    pub idno: String,

    /// Metadata joined into the header
    pub metadata: ResolvedMetadata,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

/// Statistics collected during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Excerpt segments selected
    pub segment_count: usize,

    /// Gap markers inserted
    pub gap_count: usize,

    /// Identifier candidates rejected before one resolved
    pub rejected_idnos: Vec<String>,

    /// Approximate word count of the extracted text
    pub word_count: usize,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}
