//! Error types for teixcerpt library.

use std::io;
use thiserror::Error;

/// Result type alias for teixcerpt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting excerpts and resolving metadata.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document is not well-formed XML.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// The document parsed, but its root is not a TEI element.
    #[error("Not a TEI document: root element is <{0}>")]
    NotTei(String),

    /// A required section of the document is missing.
    #[error("Missing required section: {0}")]
    MissingSection(String),

    /// The header carries no identifier of the configured type.
    #[error("No idno of type '{0}' found in teiHeader")]
    MissingIdentifier(String),

    /// Zero or several instance rows match an identifier.
    #[error("Found {count} instances with reference {idno}")]
    AmbiguousOrMissingInstance { idno: String, count: usize },

    /// Every identifier candidate was rejected.
    #[error("Could not resolve any idno; bad idnos: {}", .bad.join(", "))]
    UnresolvedIdentifier { bad: Vec<String> },

    /// The instance row has no "has as an instance" relation naming a work.
    #[error("Instance {idno} has no work relation")]
    MissingWorkRelation { idno: String },

    /// The work referenced by an instance has no row in the works table.
    #[error("No work found with id {work_id}")]
    AuthorResolutionFailure { work_id: String },

    /// A relations cell could not be parsed.
    #[error("Relation parsing error: {0}")]
    RelationParse(String),

    /// A lookup table is malformed or lacks a required column.
    #[error("Lookup table error: {0}")]
    Table(String),

    /// Error while serializing output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this failure rejects only the current identifier candidate,
    /// so the next candidate may still be tried.
    pub fn is_candidate_failure(&self) -> bool {
        matches!(self, Error::AmbiguousOrMissingInstance { .. })
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::XmlParse(err.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(e) => Error::Io(e),
                other => Error::Table(format!("{:?}", other)),
            }
        } else {
            Error::Table(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::RelationParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AmbiguousOrMissingInstance {
            idno: "T001".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "Found 2 instances with reference T001");

        let err = Error::UnresolvedIdentifier {
            bad: vec!["A1".to_string(), "B2".to_string()],
        };
        assert_eq!(err.to_string(), "Could not resolve any idno; bad idnos: A1, B2");
    }

    #[test]
    fn test_candidate_failure() {
        let err = Error::AmbiguousOrMissingInstance {
            idno: "T001".to_string(),
            count: 0,
        };
        assert!(err.is_candidate_failure());
        assert!(!Error::AuthorResolutionFailure {
            work_id: "12".to_string()
        }
        .is_candidate_failure());
        assert!(!Error::MissingIdentifier("TibSchol".to_string()).is_candidate_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
