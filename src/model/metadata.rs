//! Metadata resolved from the lookup tables.

use serde::{Deserialize, Serialize};

/// Fields joined from the instance, work and person tables for one identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// Work title, from the "has as an instance" relation
    pub work_name: Option<String>,

    /// Numeric work id
    pub work_id: Option<String>,

    /// Place of writing
    pub place: Option<String>,

    /// Scribe label
    pub scribe: Option<String>,

    /// Person with another relation to the instance
    pub related_person: Option<String>,

    /// Instance this one was copied from
    pub source_instance: Option<String>,

    /// Author name, from the work's "author of" relation
    pub author_name: Option<String>,

    /// Numeric author id
    pub author_id: Option<String>,

    /// URL of the author's person record, when the persons table has one
    pub author_url: Option<String>,

    /// Free-text item description
    pub item_description: Option<String>,

    /// Physical dimensions (width × height, cm)
    pub dimension: Option<String>,
}

impl ResolvedMetadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an author was resolved.
    pub fn has_author(&self) -> bool {
        self.author_name.is_some() || self.author_id.is_some()
    }
}

/// Fill `slot` only if it is still empty.
pub(crate) fn set_once(slot: &mut Option<String>, value: impl Into<String>) {
    if slot.is_none() {
        *slot = Some(value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_once_keeps_first() {
        let mut slot = None;
        set_once(&mut slot, "Sa skya");
        set_once(&mut slot, "Lhasa");
        assert_eq!(slot.as_deref(), Some("Sa skya"));
    }

    #[test]
    fn test_has_author() {
        let mut meta = ResolvedMetadata::new();
        assert!(!meta.has_author());
        meta.author_id = Some("481".to_string());
        assert!(meta.has_author());
    }

    #[test]
    fn test_serializes_all_fields() {
        let json = serde_json::to_string(&ResolvedMetadata::new()).unwrap();
        assert!(json.contains("\"work_name\":null"));
        assert!(json.contains("\"dimension\":null"));
    }
}
