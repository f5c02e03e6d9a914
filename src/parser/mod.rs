//! TEI parsing module.

mod options;
mod tei_parser;

pub use options::ParseOptions;
pub use tei_parser::TeiParser;
