//! Catalog record trait - common interface for catalog entities

use serde::{de::DeserializeOwned, Serialize};

/// Common trait for records supplied by the catalog
pub trait CatalogRecord: Serialize + DeserializeOwned {
    /// The record kind used in diagnostics (e.g., "cabinet", "material")
    const KIND: &'static str;

    /// Get the record's catalog id
    fn id(&self) -> &str;

    /// Get the record's display name
    fn name(&self) -> &str;
}

/// Find a record by id (exact match first, then case-insensitive)
pub fn find_record<'a, T: CatalogRecord>(records: &'a [T], id: &str) -> Option<&'a T> {
    records
        .iter()
        .find(|r| r.id() == id)
        .or_else(|| records.iter().find(|r| r.id().eq_ignore_ascii_case(id)))
}
