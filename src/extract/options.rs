//! Extraction options and configuration.

/// Statuses accepted by default when status filtering is on.
pub const DEFAULT_STATUSES: [&str; 3] = ["finalized", "reviewed", "edited"];

/// Options controlling excerpt selection, body reassembly and header rewriting.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Only select segments whose `status` is in `accepted_statuses`
    pub filter_by_status: bool,

    /// Statuses accepted when filtering
    pub accepted_statuses: Vec<String>,

    /// Produce no output for documents without selected excerpts
    pub skip_empty: bool,

    /// When to insert a gap between consecutive blocks
    pub gap_policy: GapPolicy,

    /// Which text counts as "preceding" for the leading gap
    pub leading_gap_scope: LeadingGapScope,

    /// How principal/funder are wrapped into responsibility statements
    pub resp_stmt_policy: RespStmtPolicy,

    /// `type` attribute of the header idnos used as lookup keys
    pub idno_type: String,

    /// Prefix for the `ref` attribute written on the author element
    pub author_ref_prefix: String,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable status filtering.
    pub fn with_status_filter(mut self, filter: bool) -> Self {
        self.filter_by_status = filter;
        self
    }

    /// Select every excerpt segment regardless of status.
    pub fn without_status_filter(self) -> Self {
        self.with_status_filter(false)
    }

    /// Set the accepted statuses.
    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable skipping of documents without excerpts.
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Set the gap policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Set the leading gap scope.
    pub fn with_leading_gap_scope(mut self, scope: LeadingGapScope) -> Self {
        self.leading_gap_scope = scope;
        self
    }

    /// Set the responsibility-statement policy.
    pub fn with_resp_stmt_policy(mut self, policy: RespStmtPolicy) -> Self {
        self.resp_stmt_policy = policy;
        self
    }

    /// Set the idno type used for lookups.
    pub fn with_idno_type(mut self, idno_type: impl Into<String>) -> Self {
        self.idno_type = idno_type.into();
        self
    }

    /// Set the author reference prefix.
    pub fn with_author_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.author_ref_prefix = prefix.into();
        self
    }

    /// Whether a segment with this status is selected.
    pub fn accepts_status(&self, status: Option<&str>) -> bool {
        if !self.filter_by_status {
            return true;
        }
        status.is_some_and(|s| self.accepted_statuses.iter().any(|a| a == s))
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            filter_by_status: true,
            accepted_statuses: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
            skip_empty: true,
            gap_policy: GapPolicy::Always,
            leading_gap_scope: LeadingGapScope::Document,
            resp_stmt_policy: RespStmtPolicy::WhenPresent,
            idno_type: "TibSchol".to_string(),
            author_ref_prefix: "tibschol:".to_string(),
        }
    }
}

/// When a gap is inserted between two consecutive excerpt blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Between every pair of blocks
    #[default]
    Always,
    /// Only when non-whitespace text separates the two segments in the source
    WhenSeparated,
}

/// Which source text is considered when deciding on a leading gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadingGapScope {
    /// Any text earlier in the document, header included
    #[default]
    Document,
    /// Only text earlier in the body
    Body,
}

/// How principal investigator and funder become responsibility statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RespStmtPolicy {
    /// One `respStmt` per field that is present
    #[default]
    WhenPresent,
    /// One `respStmt` per field, empty when the field is absent
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .without_status_filter()
            .with_skip_empty(false)
            .with_gap_policy(GapPolicy::WhenSeparated)
            .with_leading_gap_scope(LeadingGapScope::Body)
            .with_resp_stmt_policy(RespStmtPolicy::Always)
            .with_idno_type("catalogue")
            .with_author_ref_prefix("tib:");

        assert!(!options.filter_by_status);
        assert!(!options.skip_empty);
        assert_eq!(options.gap_policy, GapPolicy::WhenSeparated);
        assert_eq!(options.leading_gap_scope, LeadingGapScope::Body);
        assert_eq!(options.resp_stmt_policy, RespStmtPolicy::Always);
        assert_eq!(options.idno_type, "catalogue");
        assert_eq!(options.author_ref_prefix, "tib:");
        assert_eq!(ExtractOptions::default().author_ref_prefix, "tibschol:");
    }

    #[test]
    fn test_accepts_status() {
        let options = ExtractOptions::default();
        assert!(options.accepts_status(Some("finalized")));
        assert!(options.accepts_status(Some("reviewed")));
        assert!(options.accepts_status(Some("edited")));
        assert!(!options.accepts_status(Some("draft")));
        assert!(!options.accepts_status(None));

        let options = options.without_status_filter();
        assert!(options.accepts_status(Some("draft")));
        assert!(options.accepts_status(None));
    }

    #[test]
    fn test_custom_statuses() {
        let options = ExtractOptions::new().with_statuses(["draft"]);
        assert!(options.accepts_status(Some("draft")));
        assert!(!options.accepts_status(Some("finalized")));
    }
}
