//! Parsing options and configuration.

/// Options for parsing TEI documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Reject documents whose root element is not `TEI`
    pub require_tei_root: bool,

    /// Keep comments in the tree
    pub keep_comments: bool,

    /// Keep processing instructions found inside the root element
    pub keep_processing_instructions: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept any root element.
    pub fn lenient(mut self) -> Self {
        self.require_tei_root = false;
        self
    }

    /// Enable or disable comment retention.
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Enable or disable processing-instruction retention.
    pub fn with_processing_instructions(mut self, keep: bool) -> Self {
        self.keep_processing_instructions = keep;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_tei_root: true,
            keep_comments: true,
            keep_processing_instructions: true,
        }
    }
}
