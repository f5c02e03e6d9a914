//! Document model types for TEI content representation.
//!
//! The parser produces an owned node tree; the extraction passes read the
//! source tree and build fresh trees for their output, so a source document
//! is never modified.

mod document;
mod metadata;
mod node;

pub use document::{TeiDocument, TEI_NS};
pub use metadata::ResolvedMetadata;
pub(crate) use metadata::set_once;
pub use node::{is_blank, local_part, Descendants, Element, Node};
