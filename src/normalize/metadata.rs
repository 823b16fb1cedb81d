//! Metadata scrubbing.

use crate::model::{Document, MetadataField};

/// Fields cleared by [`scrub_metadata`].
pub const SCRUBBED_FIELDS: [MetadataField; 5] = [
    MetadataField::Author,
    MetadataField::Comments,
    MetadataField::Keywords,
    MetadataField::LastModifiedBy,
    MetadataField::Title,
];

/// Clear identifying metadata fields to empty. Returns the fields that had a value.
pub fn scrub_metadata(doc: &mut Document) -> Vec<MetadataField> {
    let cleared: Vec<MetadataField> = SCRUBBED_FIELDS
        .into_iter()
        .filter(|f| doc.metadata.get(*f).is_some_and(|v| !v.is_empty()))
        .collect();
    for field in SCRUBBED_FIELDS {
        doc.metadata.clear(field);
    }
    log::info!("Cleared {} metadata fields", cleared.len());
    cleared
}
