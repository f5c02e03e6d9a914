//! Rendering module for writing documents, metadata and error reports.

mod json;
mod report;
mod xml;

pub use json::{to_json, JsonFormat};
pub use report::{render_report, write_report, FileError, ReportFormat};
pub use xml::{element_to_xml, to_xml, XmlFormat, XML_DECLARATION};
