//! Identifier resolution against the instance, work and person tables.

use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{set_once, ResolvedMetadata};

use super::label::sep_label_and_id;
use super::relation::{parse_relations, Relation};
use super::table::Table;

/// Relation labels matched (by substring) on instance rows.
pub const WORK_RELATION: &str = "has as an instance";
/// Place-of-writing relation label. The misspelling is the dataset's own.
pub const PLACE_RELATION: &str = "writen at";
/// Scribe relation label.
pub const SCRIBE_RELATION: &str = "scribe of";
/// Other-person relation label.
pub const RELATED_PERSON_RELATION: &str = "has other relation with";
/// Copy-source relation label.
pub const SOURCE_INSTANCE_RELATION: &str = "is copied from";
/// Authorship relation label, matched on work rows.
pub const AUTHOR_RELATION: &str = "author of";

/// Anything that can turn an identifier into resolved metadata.
pub trait MetadataSource {
    /// Resolve one identifier.
    ///
    /// Errors for which [`Error::is_candidate_failure`] is true reject only
    /// this identifier; any other error is fatal for the document.
    fn resolve(&self, idno: &str) -> Result<ResolvedMetadata>;
}

/// Column names used by the resolver.
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Instance column holding the reference identifiers
    pub reference_column: String,

    /// Column holding serialized relations (instances and works)
    pub relations_column: String,

    /// URL-like column ending in `/<id>/` (works and persons)
    pub url_column: String,

    /// Optional instance column with an item description
    pub item_description_column: String,

    /// Optional instance column with the dimensions
    pub dimension_column: String,
}

impl LookupOptions {
    /// Create lookup options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference column.
    pub fn with_reference_column(mut self, column: impl Into<String>) -> Self {
        self.reference_column = column.into();
        self
    }

    /// Set the relations column.
    pub fn with_relations_column(mut self, column: impl Into<String>) -> Self {
        self.relations_column = column.into();
        self
    }

    /// Set the URL column.
    pub fn with_url_column(mut self, column: impl Into<String>) -> Self {
        self.url_column = column.into();
        self
    }

    /// Set the item description column.
    pub fn with_item_description_column(mut self, column: impl Into<String>) -> Self {
        self.item_description_column = column.into();
        self
    }

    /// Set the dimension column.
    pub fn with_dimension_column(mut self, column: impl Into<String>) -> Self {
        self.dimension_column = column.into();
        self
    }
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            reference_column: "tibschol_ref".to_string(),
            relations_column: "relations".to_string(),
            url_column: "url".to_string(),
            item_description_column: "item_description".to_string(),
            dimension_column: "dimension".to_string(),
        }
    }
}

/// The three lookup tables, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    /// Instance rows
    pub instances: Table,

    /// Work rows
    pub works: Table,

    /// Person rows, if a persons table was supplied
    pub persons: Option<Table>,
}

impl LookupTables {
    /// Bundle already-loaded tables.
    pub fn new(instances: Table, works: Table, persons: Option<Table>) -> Self {
        Self {
            instances,
            works,
            persons,
        }
    }

    /// Load tables from CSV files.
    pub fn load(
        instances: impl AsRef<Path>,
        works: impl AsRef<Path>,
        persons: Option<&Path>,
    ) -> Result<Self> {
        Ok(Self {
            instances: Table::from_path(instances)?,
            works: Table::from_path(works)?,
            persons: persons.map(Table::from_path).transpose()?,
        })
    }
}

/// Resolves identifiers by joining the lookup tables.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    tables: LookupTables,
    options: LookupOptions,
}

impl MetadataResolver {
    /// Create a resolver with default column names.
    ///
    /// Fails if a table lacks a column the resolver needs.
    pub fn new(tables: LookupTables) -> Result<Self> {
        Self::with_options(tables, LookupOptions::default())
    }

    /// Create a resolver with custom column names.
    pub fn with_options(tables: LookupTables, options: LookupOptions) -> Result<Self> {
        tables.instances.require_column(&options.reference_column)?;
        tables.instances.require_column(&options.relations_column)?;
        tables.works.require_column(&options.url_column)?;
        tables.works.require_column(&options.relations_column)?;
        if let Some(persons) = &tables.persons {
            persons.require_column(&options.url_column)?;
        }
        Ok(Self { tables, options })
    }

    /// The loaded tables.
    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Rows of the instance table whose reference column contains `idno`
    /// as a whole word.
    pub fn matching_instances(&self, idno: &str) -> Result<Vec<usize>> {
        let pattern = Regex::new(&format!(r"(^|[\s,]){}($|[\s,])", regex::escape(idno)))
            .map_err(|e| Error::Other(format!("invalid identifier pattern: {}", e)))?;
        let instances = &self.tables.instances;
        let column = instances.require_column(&self.options.reference_column)?;
        Ok(instances.rows_where(column, |cell| pattern.is_match(cell)))
    }

    fn instance_relations(&self, row: usize) -> Result<Vec<Relation>> {
        parse_relations(
            self.tables
                .instances
                .cell_by_name(row, &self.options.relations_column),
        )
    }

    /// Resolve the author of a work by its numeric id.
    ///
    /// Returns `(name, id)`, or `None` if the work exists but names no author.
    pub fn resolve_author(&self, work_id: &str) -> Result<Option<(String, String)>> {
        let works = &self.tables.works;
        let url_column = works.require_column(&self.options.url_column)?;
        let suffix = format!("/{}/", work_id);

        let row = works
            .rows_where(url_column, |url| url.ends_with(&suffix))
            .into_iter()
            .next()
            .ok_or_else(|| Error::AuthorResolutionFailure {
                work_id: work_id.to_string(),
            })?;

        let relations = parse_relations(works.cell_by_name(row, &self.options.relations_column))?;
        Ok(relations
            .iter()
            .find(|rel| rel.label_contains(AUTHOR_RELATION))
            .map(|rel| sep_label_and_id(&rel.subj.label)))
    }

    fn person_url(&self, person_id: &str) -> Option<String> {
        let persons = self.tables.persons.as_ref()?;
        let column = persons.column(&self.options.url_column)?;
        let suffix = format!("/{}/", person_id);
        persons
            .rows_where(column, |url| url.ends_with(&suffix))
            .first()
            .map(|&row| persons.cell(row, column).to_string())
    }
}

impl MetadataSource for MetadataResolver {
    fn resolve(&self, idno: &str) -> Result<ResolvedMetadata> {
        let rows = self.matching_instances(idno)?;
        if rows.len() != 1 {
            return Err(Error::AmbiguousOrMissingInstance {
                idno: idno.to_string(),
                count: rows.len(),
            });
        }
        let row = rows[0];

        let mut meta = ResolvedMetadata::new();
        for rel in self.instance_relations(row)? {
            if rel.label_contains(WORK_RELATION) && meta.work_id.is_none() {
                let (name, id) = sep_label_and_id(&rel.subj.label);
                meta.work_name = Some(name);
                meta.work_id = Some(id);
            }
            if rel.label_contains(PLACE_RELATION) {
                set_once(&mut meta.place, rel.obj.label.clone());
            }
            if rel.label_contains(SCRIBE_RELATION) {
                set_once(&mut meta.scribe, rel.subj.label.clone());
            }
            if rel.label_contains(RELATED_PERSON_RELATION) {
                set_once(&mut meta.related_person, rel.subj.label.clone());
            }
            if rel.label_contains(SOURCE_INSTANCE_RELATION) {
                set_once(&mut meta.source_instance, rel.obj.label.clone());
            }
        }

        let work_id = match meta.work_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(Error::MissingWorkRelation {
                    idno: idno.to_string(),
                })
            }
        };

        match self.resolve_author(&work_id)? {
            Some((name, id)) => {
                meta.author_url = self.person_url(&id);
                meta.author_name = Some(name);
                meta.author_id = Some(id);
            }
            None => log::warn!("Work {} has no '{}' relation", work_id, AUTHOR_RELATION),
        }

        let instances = &self.tables.instances;
        meta.item_description =
            non_blank(instances.cell_by_name(row, &self.options.item_description_column));
        meta.dimension = non_blank(instances.cell_by_name(row, &self.options.dimension_column));

        log::debug!(
            "Resolved {} -> work {:?}, author {:?}",
            idno,
            meta.work_name,
            meta.author_name
        );

        Ok(meta)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
