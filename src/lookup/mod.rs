//! Metadata lookup: joins an identifier against the instance, work and
//! person tables.
//!
//! # Example
//!
//! ```no_run
//! use teixcerpt::lookup::{LookupTables, MetadataResolver, MetadataSource};
//!
//! fn main() -> teixcerpt::Result<()> {
//!     let tables = LookupTables::load("data/instances.csv", "data/works.csv", None)?;
//!     let resolver = MetadataResolver::new(tables)?;
//!     let meta = resolver.resolve("T001")?;
//!     println!("{:?} by {:?}", meta.work_name, meta.author_name);
//!     Ok(())
//! }
//! ```

mod label;
mod relation;
mod resolver;
mod table;

pub use label::sep_label_and_id;
pub use relation::{parse_relations, python_literal_to_json, Relation, RelationEnd};
pub use resolver::{
    LookupOptions, LookupTables, MetadataResolver, MetadataSource, AUTHOR_RELATION,
    PLACE_RELATION, RELATED_PERSON_RELATION, SCRIBE_RELATION, SOURCE_INSTANCE_RELATION,
    WORK_RELATION,
};
pub use table::Table;
